//! The control-plane Unix socket: a tiny textual protocol for toggling
//! the daemon, reloading its config, and checking its status from the
//! command line, without tearing down the input pipeline to do it.

use crate::error::{ConfigError, IpcError};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::io::AsRawFd;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_SOCKET_PATH: &str = "/var/run/layoutguardd.sock";
const ACCEPT_POLL_TIMEOUT: Duration = Duration::from_millis(500);
const MAX_COMMAND_LINE_BYTES: usize = 256;

#[derive(Debug, Clone)]
pub struct ReloadReport {
    pub message: String,
}

pub type ReloadCallback = Box<dyn Fn(&str) -> Result<ReloadReport, ConfigError> + Send + Sync>;

pub struct ControlServer {
    listener: UnixListener,
    socket_path: std::path::PathBuf,
    enabled: Arc<AtomicBool>,
    reload: ReloadCallback,
    running: Arc<AtomicBool>,
}

impl ControlServer {
    pub fn bind(
        socket_path: &Path,
        enabled: Arc<AtomicBool>,
        reload: ReloadCallback,
    ) -> Result<Self, IpcError> {
        if socket_path.exists() {
            let _ = std::fs::remove_file(socket_path);
        }
        let listener = UnixListener::bind(socket_path).map_err(|e| IpcError::Bind {
            path: socket_path.display().to_string(),
            source: e,
        })?;
        listener.set_nonblocking(true).map_err(|e| IpcError::Bind {
            path: socket_path.display().to_string(),
            source: e,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(socket_path, std::fs::Permissions::from_mode(0o666));
        }

        Ok(ControlServer {
            listener,
            socket_path: socket_path.to_path_buf(),
            enabled,
            reload,
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    /// A handle the owning thread can use to ask the accept loop to stop
    /// within one poll interval.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Runs the accept loop until `stop_handle()` is cleared. Polls the
    /// listening socket with a timeout rather than blocking forever in
    /// `accept`, so the loop notices the stop request promptly.
    pub fn run(&self) {
        while self.running.load(Ordering::Acquire) {
            let fd = self.listener.as_raw_fd();
            let mut pfd = libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            };
            let rc = unsafe {
                libc::poll(&mut pfd, 1, ACCEPT_POLL_TIMEOUT.as_millis() as i32)
            };
            if rc <= 0 {
                continue;
            }
            match self.listener.accept() {
                Ok((stream, _)) => self.handle_client(stream),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => continue,
                Err(e) => log::warn!("control: accept failed: {e}"),
            }
        }
    }

    fn handle_client(&self, stream: UnixStream) {
        let mut reader = BufReader::new(match stream.try_clone() {
            Ok(s) => s,
            Err(e) => {
                log::warn!("control: failed to clone client stream: {e}");
                return;
            }
        });
        let mut writer = stream;

        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => return,
            Ok(_) => {}
            Err(e) => {
                log::warn!("control: failed to read command: {e}");
                return;
            }
        }
        if line.len() > MAX_COMMAND_LINE_BYTES {
            line.truncate(MAX_COMMAND_LINE_BYTES);
        }

        let response = match execute(line.trim(), &self.enabled, &self.reload) {
            Ok(msg) => format!("OK {msg}\n"),
            Err(e) => format!("ERROR {e}\n"),
        };
        if let Err(e) = writer.write_all(response.as_bytes()) {
            log::warn!("control: failed to write response: {e}");
        }
    }
}

impl Drop for ControlServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

fn execute(
    line: &str,
    enabled: &AtomicBool,
    reload: &ReloadCallback,
) -> Result<String, IpcError> {
    let mut parts = line.splitn(2, ' ');
    let command = parts.next().unwrap_or("").to_uppercase();
    let arg = parts.next().unwrap_or("").trim();

    match command.as_str() {
        "GET_STATUS" => {
            let status = if enabled.load(Ordering::Acquire) {
                "enabled"
            } else {
                "disabled"
            };
            Ok(status.to_string())
        }
        "SET_STATUS" => {
            let value = parse_bool_arg(&command, arg)?;
            enabled.store(value, Ordering::Release);
            Ok(if value { "enabled" } else { "disabled" }.to_string())
        }
        "RELOAD" => match reload(arg) {
            Ok(report) => Ok(report.message),
            Err(e) => Err(IpcError::BadArgument {
                command: "RELOAD".to_string(),
                value: e.to_string(),
            }),
        },
        "SHUTDOWN" => Err(IpcError::BadArgument {
            command: "SHUTDOWN".to_string(),
            value: "shutdown is not permitted over the control socket".to_string(),
        }),
        "" => Err(IpcError::UnknownCommand(line.to_string())),
        other => Err(IpcError::UnknownCommand(other.to_string())),
    }
}

fn parse_bool_arg(command: &str, arg: &str) -> Result<bool, IpcError> {
    match arg {
        "1" | "true" | "on" => Ok(true),
        "0" | "false" | "off" => Ok(false),
        other => Err(IpcError::BadArgument {
            command: command.to_string(),
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_status_reports_enabled() {
        let enabled = AtomicBool::new(true);
        let reload: ReloadCallback = Box::new(|_| {
            Ok(ReloadReport {
                message: "reloaded".to_string(),
            })
        });
        assert_eq!(execute("GET_STATUS", &enabled, &reload).unwrap(), "enabled");
    }

    #[test]
    fn set_status_accepts_on_off_aliases() {
        let enabled = AtomicBool::new(true);
        let reload: ReloadCallback = Box::new(|_| {
            Ok(ReloadReport {
                message: String::new(),
            })
        });
        execute("SET_STATUS off", &enabled, &reload).unwrap();
        assert!(!enabled.load(Ordering::Acquire));
        execute("SET_STATUS 1", &enabled, &reload).unwrap();
        assert!(enabled.load(Ordering::Acquire));
    }

    #[test]
    fn set_status_rejects_bad_argument() {
        let enabled = AtomicBool::new(true);
        let reload: ReloadCallback = Box::new(|_| {
            Ok(ReloadReport {
                message: String::new(),
            })
        });
        assert!(execute("SET_STATUS maybe", &enabled, &reload).is_err());
    }

    #[test]
    fn shutdown_is_always_refused() {
        let enabled = AtomicBool::new(true);
        let reload: ReloadCallback = Box::new(|_| {
            Ok(ReloadReport {
                message: String::new(),
            })
        });
        assert!(execute("SHUTDOWN", &enabled, &reload).is_err());
    }

    #[test]
    fn reload_delegates_to_callback() {
        let enabled = AtomicBool::new(true);
        let reload: ReloadCallback = Box::new(|path| {
            Ok(ReloadReport {
                message: format!("reloaded from {path}"),
            })
        });
        assert_eq!(
            execute("RELOAD /tmp/x.yaml", &enabled, &reload).unwrap(),
            "reloaded from /tmp/x.yaml"
        );
    }

    #[test]
    fn unknown_command_is_rejected() {
        let enabled = AtomicBool::new(true);
        let reload: ReloadCallback = Box::new(|_| {
            Ok(ReloadReport {
                message: String::new(),
            })
        });
        assert!(execute("FROBNICATE", &enabled, &reload).is_err());
    }
}
