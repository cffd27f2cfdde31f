//! Per-subsystem error types. Each fallible subsystem gets its own enum
//! so callers can match on the specific failure instead of threading a
//! single catch-all error type through the whole crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("failed to read dictionary file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum GuardError {
    #[error("poll() on stdin failed: {0}")]
    Poll(#[source] std::io::Error),
    #[error("stdin closed while waiting for a macro to finish")]
    StreamClosed,
}

#[derive(Error, Debug)]
pub enum IpcError {
    #[error("failed to bind control socket at {path}: {source}")]
    Bind {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("bad argument for {command}: {value}")]
    BadArgument { command: String, value: String },
}

#[derive(Error, Debug)]
pub enum DaemonError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ipc(#[from] IpcError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
