//! Buffers upstream key events that arrive while a macro is being
//! injected, so they can be replayed once the macro finishes instead of
//! being lost or interleaved mid-macro.

use crate::error::GuardError;
use crate::event::{read_event, RawEvent};
use std::collections::VecDeque;
use std::io::Read;
use std::os::unix::io::RawFd;
use std::time::Duration;

const MAX_QUEUED_EVENTS: usize = 1000;

#[derive(Debug, Default)]
pub struct InputGuard {
    queue: VecDeque<RawEvent>,
    macro_in_progress: bool,
}

impl InputGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_macro(&mut self) {
        self.macro_in_progress = true;
    }

    pub fn end_macro(&mut self) {
        self.macro_in_progress = false;
    }

    pub fn is_macro_in_progress(&self) -> bool {
        self.macro_in_progress
    }

    pub fn push(&mut self, ev: RawEvent) {
        if self.queue.len() < MAX_QUEUED_EVENTS {
            self.queue.push_back(ev);
        }
    }

    /// Removes and returns all buffered events, oldest first, so the
    /// caller can re-enter the router on each one exactly as if they had
    /// just arrived on stdin.
    pub fn drain(&mut self) -> Vec<RawEvent> {
        self.queue.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Blocks for up to `timeout`, buffering any events that arrive on `fd`
/// in the meantime instead of letting them sit in the kernel's pipe
/// buffer. This is the "cooperative pump" the macro planner calls
/// between its own timed delays: a plain `thread::sleep` would let a
/// user's keystrokes pile up invisibly until the macro ends, so instead
/// we poll the descriptor and drain whatever shows up.
pub fn sleep_or_buffer<R: Read>(
    fd: RawFd,
    reader: &mut R,
    guard: &mut InputGuard,
    timeout: Duration,
) -> Result<(), GuardError> {
    let deadline = std::time::Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(std::time::Instant::now());
        if remaining.is_zero() {
            return Ok(());
        }

        let mut pfd = libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let timeout_ms = remaining.as_millis().min(i32::MAX as u128) as i32;
        let rc = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
        if rc < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                continue;
            }
            return Err(GuardError::Poll(err));
        }
        if rc == 0 {
            return Ok(());
        }

        match read_event(reader).map_err(GuardError::Poll)? {
            Some(ev) => guard.push(ev),
            None => return Err(GuardError::StreamClosed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_respects_capacity() {
        let mut guard = InputGuard::new();
        for i in 0..2000 {
            guard.push(RawEvent::key(30, i % 2));
        }
        assert_eq!(guard.drain().len(), MAX_QUEUED_EVENTS);
    }

    #[test]
    fn drain_empties_the_queue() {
        let mut guard = InputGuard::new();
        guard.push(RawEvent::key(30, 1));
        guard.push(RawEvent::key(30, 0));
        let drained = guard.drain();
        assert_eq!(drained.len(), 2);
        assert!(guard.is_empty());
    }

    #[test]
    fn macro_flag_round_trips() {
        let mut guard = InputGuard::new();
        assert!(!guard.is_macro_in_progress());
        guard.begin_macro();
        assert!(guard.is_macro_in_progress());
        guard.end_macro();
        assert!(!guard.is_macro_in_progress());
    }
}
