//! Reads kernel `input_event` records from stdin, rewrites the stream
//! where a word was typed on the wrong keyboard layout, and writes the
//! result to stdout — built to sit inside an interception-tools pipeline.
//!
//! # Architecture
//!
//! [`Router`] is the single state machine every event passes through; it
//! owns the word buffer, modifier tracking, and the macro planner it
//! calls into when a switch is warranted. [`control::ControlServer`] runs
//! on its own thread and mutates [`router::SharedState`] through
//! `ArcSwap` snapshots, so a config reload or an enable/disable toggle
//! never blocks the router's hot path with a lock.
//!
//! # Thread Safety
//!
//! The router thread is the only reader of stdin and the only writer of
//! stdout. The control thread only ever touches `SharedState`'s atomics
//! and `ArcSwap` slots. Neither thread blocks on the other.

pub mod buffer;
pub mod bypass;
pub mod cli;
pub mod config;
pub mod control;
pub mod decision;
pub mod dictionary;
pub mod error;
pub mod event;
pub mod guard;
pub mod keymap;
pub mod macros;
pub mod modifiers;
pub mod ngram;
pub mod router;
pub mod scancode;
pub mod selection;
pub mod session;
pub mod sound;
pub mod text_transform;

use error::DaemonError;
use event::{read_event, WriterSink};
use router::{Router, SharedState};
use std::io::{self};
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Runs the daemon to completion: reads the config, builds the shared
/// state, optionally starts the control-plane thread, then pumps stdin
/// to the router until the pipe closes.
pub fn run(args: cli::Args) -> Result<(), DaemonError> {
    let home = std::env::var("HOME").ok();
    let home_path = home.as_deref().map(Path::new);

    let cfg = match &args.config {
        Some(path) => config::load_path(Path::new(path))?,
        None => config::load(home_path)?,
    };
    log::info!("run: loaded config, hotkey={:?}", cfg.hotkey);

    let dictionary = dictionary::Dictionary::load_default();
    let shared = SharedState::new(cfg, dictionary);

    let mut control_handle = None;
    if !args.no_ipc {
        let socket_path = args
            .socket
            .clone()
            .unwrap_or_else(|| control::DEFAULT_SOCKET_PATH.to_string());
        control_handle = Some(spawn_control_thread(socket_path, shared.clone(), home)?);
    }

    let result = pump_stdin(shared);

    if let Some((join_handle, running)) = control_handle {
        running.store(false, Ordering::Release);
        if let Err(e) = join_handle.join() {
            log::warn!("run: control thread panicked: {e:?}");
        }
    }

    result
}

fn spawn_control_thread(
    socket_path: String,
    shared: Arc<SharedState>,
    home: Option<String>,
) -> Result<
    (
        std::thread::JoinHandle<()>,
        Arc<std::sync::atomic::AtomicBool>,
    ),
    DaemonError,
> {
    let enabled = shared.enabled.clone();
    let reload_shared = shared.clone();
    let reload: control::ReloadCallback = Box::new(move |arg| {
        let result = if arg.is_empty() {
            config::load(home.as_deref().map(Path::new))
        } else {
            config::load_path(Path::new(arg))
        };
        result.map(|cfg| {
            reload_shared
                .enabled
                .store(cfg.auto_switch.enabled, Ordering::Release);
            reload_shared.config.store(Arc::new(cfg));
            control::ReloadReport {
                message: "config reloaded".to_string(),
            }
        })
    });

    let server = control::ControlServer::bind(Path::new(&socket_path), enabled, reload)
        .map_err(DaemonError::Ipc)?;
    let running = server.stop_handle();
    let join_handle = std::thread::spawn(move || server.run());
    Ok((join_handle, running))
}

fn pump_stdin(shared: Arc<SharedState>) -> Result<(), DaemonError> {
    let mut router = Router::new(shared);
    let stdin = io::stdin();
    let fd = stdin.as_raw_fd();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut sink = WriterSink(stdout.lock());

    loop {
        match read_event(&mut reader)? {
            Some(ev) => router.handle_event(ev, &mut sink, fd, &mut reader)?,
            None => return Ok(()),
        }
    }
}
