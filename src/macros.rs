//! Synthesizes the backspace/retype/hotkey-chord event sequences that
//! correct a word typed on the wrong layout, and the shared key-tap
//! primitives those sequences are built from.
//!
//! Every primitive delay goes through `InputGuard::sleep_or_buffer`
//! rather than a plain `thread::sleep`, so upstream keystrokes that
//! arrive mid-macro are captured instead of lost or interleaved with the
//! macro's own injected events.

use crate::config::DelayConfig;
use crate::event::EventSink;
use crate::guard::{sleep_or_buffer, InputGuard};
use crate::scancode::*;
use std::io::Read;
use std::os::unix::io::RawFd;
use std::time::Duration;

const SHIFT_PRESS_HOLD: Duration = Duration::from_millis(10);
const SHIFT_RELEASE_DELAY: Duration = Duration::from_millis(5);
const BACKSPACE_HOLD: Duration = Duration::from_millis(12);
const HOTKEY_EXTENDED_HOLD: Duration = Duration::from_millis(50);

pub struct MacroPlanner {
    delays: DelayConfig,
}

impl MacroPlanner {
    pub fn new(delays: DelayConfig) -> Self {
        MacroPlanner { delays }
    }

    pub fn set_delays(&mut self, delays: DelayConfig) {
        self.delays = delays;
    }

    fn delay<R: Read>(
        &self,
        d: Duration,
        fd: RawFd,
        reader: &mut R,
        guard: &mut InputGuard,
    ) -> std::io::Result<()> {
        sleep_or_buffer(fd, reader, guard, d).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })
    }

    fn key_press_delay(&self, turbo: bool) -> Duration {
        if turbo {
            self.delays.turbo_key_press
        } else {
            self.delays.key_press
        }
    }

    fn retype_delay(&self, turbo: bool) -> Duration {
        if turbo {
            self.delays.turbo_retype
        } else {
            self.delays.retype
        }
    }

    /// Presses and releases a single scancode, holding Shift first if
    /// `shifted` is set.
    pub fn tap_key<R: Read>(
        &self,
        code: Scancode,
        shifted: bool,
        turbo: bool,
        sink: &mut dyn EventSink,
        fd: RawFd,
        reader: &mut R,
        guard: &mut InputGuard,
    ) -> std::io::Result<()> {
        if shifted {
            sink.emit_key(KEY_LEFTSHIFT, KEY_PRESS)?;
            self.delay(SHIFT_PRESS_HOLD, fd, reader, guard)?;
        }

        sink.emit_key(code, KEY_PRESS)?;
        self.delay(self.key_press_delay(turbo), fd, reader, guard)?;
        sink.emit_key(code, KEY_RELEASE)?;

        if shifted {
            self.delay(SHIFT_RELEASE_DELAY, fd, reader, guard)?;
            sink.emit_key(KEY_LEFTSHIFT, KEY_RELEASE)?;
            self.delay(SHIFT_RELEASE_DELAY, fd, reader, guard)?;
        }

        self.delay(self.retype_delay(turbo), fd, reader, guard)
    }

    /// Sends `count` backspaces, each held briefly and separated by half
    /// a retype delay.
    pub fn send_backspace<R: Read>(
        &self,
        count: usize,
        turbo: bool,
        sink: &mut dyn EventSink,
        fd: RawFd,
        reader: &mut R,
        guard: &mut InputGuard,
    ) -> std::io::Result<()> {
        for _ in 0..count {
            sink.emit_key(KEY_BACKSPACE, KEY_PRESS)?;
            self.delay(BACKSPACE_HOLD, fd, reader, guard)?;
            sink.emit_key(KEY_BACKSPACE, KEY_RELEASE)?;
            self.delay(self.retype_delay(turbo) / 2, fd, reader, guard)?;
        }
        Ok(())
    }

    /// Replays buffered trailing keys verbatim with no extra hold delay
    /// beyond the retype delay between keys, used to restore text that
    /// was typed after the word being corrected.
    pub fn retype_trailing<R: Read>(
        &self,
        entries: &[KeyEntry],
        turbo: bool,
        sink: &mut dyn EventSink,
        fd: RawFd,
        reader: &mut R,
        guard: &mut InputGuard,
    ) -> std::io::Result<()> {
        for entry in entries {
            if entry.shifted {
                sink.emit_key(KEY_LEFTSHIFT, KEY_PRESS)?;
            }
            sink.emit_key(entry.code, KEY_PRESS)?;
            sink.emit_key(entry.code, KEY_RELEASE)?;
            if entry.shifted {
                sink.emit_key(KEY_LEFTSHIFT, KEY_RELEASE)?;
            }
            self.delay(self.retype_delay(turbo), fd, reader, guard)?;
        }
        Ok(())
    }

    /// Sends the configured modifier+key chord that the desktop
    /// environment is bound to for switching layout, holding the key a
    /// little longer than a typed key so the binding reliably triggers.
    pub fn send_layout_hotkey<R: Read>(
        &self,
        modifier: Scancode,
        key: Scancode,
        sink: &mut dyn EventSink,
        fd: RawFd,
        reader: &mut R,
        guard: &mut InputGuard,
    ) -> std::io::Result<()> {
        sink.emit_key(modifier, KEY_PRESS)?;
        self.delay(self.delays.key_press, fd, reader, guard)?;
        sink.emit_key(key, KEY_PRESS)?;
        self.delay(HOTKEY_EXTENDED_HOLD, fd, reader, guard)?;
        sink.emit_key(key, KEY_RELEASE)?;
        self.delay(self.delays.key_press, fd, reader, guard)?;
        sink.emit_key(modifier, KEY_RELEASE)?;
        self.delay(self.delays.layout_switch, fd, reader, guard)
    }

    /// Releases all eight tracked modifiers, used before a macro starts
    /// so a held Shift/Ctrl from the triggering keystroke can't bleed
    /// into the synthesized sequence.
    pub fn release_all_modifiers<R: Read>(
        &self,
        sink: &mut dyn EventSink,
        fd: RawFd,
        reader: &mut R,
        guard: &mut InputGuard,
    ) -> std::io::Result<()> {
        for code in [
            KEY_LEFTSHIFT,
            KEY_RIGHTSHIFT,
            KEY_LEFTCTRL,
            KEY_RIGHTCTRL,
            KEY_LEFTALT,
            KEY_RIGHTALT,
            KEY_LEFTMETA,
            KEY_RIGHTMETA,
        ] {
            sink.emit_key(code, KEY_RELEASE)?;
        }
        self.delay(self.delays.key_press, fd, reader, guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RecordingSink;

    fn planner() -> MacroPlanner {
        MacroPlanner::new(DelayConfig {
            key_press: Duration::from_millis(1),
            layout_switch: Duration::from_millis(1),
            retype: Duration::from_millis(1),
            turbo_key_press: Duration::from_millis(1),
            turbo_retype: Duration::from_millis(1),
        })
    }

    #[test]
    fn tap_key_emits_press_then_release() {
        let planner = planner();
        let mut sink = RecordingSink::default();
        let mut guard = InputGuard::new();
        let mut reader: &[u8] = &[];
        planner
            .tap_key(30, false, true, &mut sink, -1, &mut reader, &mut guard)
            .unwrap();
        let key_events: Vec<_> = sink
            .events
            .iter()
            .filter(|e| e.type_ == crate::event::EV_KEY)
            .collect();
        assert_eq!(key_events[0].value, KEY_PRESS);
        assert_eq!(key_events.last().unwrap().value, KEY_RELEASE);
    }

    #[test]
    fn tap_key_wraps_in_shift_when_shifted() {
        let planner = planner();
        let mut sink = RecordingSink::default();
        let mut guard = InputGuard::new();
        let mut reader: &[u8] = &[];
        planner
            .tap_key(30, true, true, &mut sink, -1, &mut reader, &mut guard)
            .unwrap();
        let codes: Vec<_> = sink
            .events
            .iter()
            .filter(|e| e.type_ == crate::event::EV_KEY)
            .map(|e| e.code)
            .collect();
        assert_eq!(codes.first(), Some(&KEY_LEFTSHIFT));
        assert_eq!(codes.last(), Some(&KEY_LEFTSHIFT));
    }

    #[test]
    fn send_backspace_emits_one_press_release_pair_per_count() {
        let planner = planner();
        let mut sink = RecordingSink::default();
        let mut guard = InputGuard::new();
        let mut reader: &[u8] = &[];
        planner
            .send_backspace(3, true, &mut sink, -1, &mut reader, &mut guard)
            .unwrap();
        let presses = sink
            .events
            .iter()
            .filter(|e| e.code == KEY_BACKSPACE && e.value == KEY_PRESS)
            .count();
        assert_eq!(presses, 3);
    }

    #[test]
    fn release_all_modifiers_releases_all_eight() {
        let planner = planner();
        let mut sink = RecordingSink::default();
        let mut guard = InputGuard::new();
        let mut reader: &[u8] = &[];
        planner
            .release_all_modifiers(&mut sink, -1, &mut reader, &mut guard)
            .unwrap();
        let released: Vec<_> = sink.events.iter().map(|e| e.code).collect();
        assert_eq!(released.len(), 8);
    }
}
