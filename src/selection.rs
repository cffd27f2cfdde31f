//! The Ctrl+Shift+hotkey selection transform: copy the current
//! selection, run a text transform over it, paste it back.
//!
//! The X11 clipboard-owner protocol needed to actually read and write a
//! selection is out of this crate's scope (see SPEC_FULL.md §4.9); the
//! seam here is a trait so the router and macro planner can be fully
//! exercised against `NullSelectionBackend` without an X server, with a
//! real backend plugging in at the same boundary.

use crate::event::EventSink;
use crate::guard::InputGuard;
use crate::macros::MacroPlanner;
use crate::scancode::{KEY_C, KEY_LEFTCTRL, KEY_RELEASE, KEY_PRESS, KEY_V};
use std::io::Read;
use std::os::unix::io::RawFd;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Primary,
    Clipboard,
}

pub trait SelectionBackend {
    fn is_terminal_focused(&self) -> bool;
    fn get_text(&self, selection: Selection) -> Option<String>;
    fn set_text(&self, selection: Selection, text: &str);
}

/// Stand-in used wherever no real desktop selection backend is wired up.
#[derive(Debug, Default)]
pub struct NullSelectionBackend;

impl SelectionBackend for NullSelectionBackend {
    fn is_terminal_focused(&self) -> bool {
        false
    }

    fn get_text(&self, _selection: Selection) -> Option<String> {
        None
    }

    fn set_text(&self, _selection: Selection, _text: &str) {}
}

/// Runs `transform` over the current selection: synthesizes a copy
/// keystroke, reads the resulting clipboard text through `backend`,
/// writes the transformed text back, and synthesizes a paste. Declines
/// to do anything if a terminal has focus, since Ctrl+Shift+C/V there
/// usually means something other than copy/paste.
pub fn process_selection<R: Read>(
    backend: &dyn SelectionBackend,
    transform: impl Fn(&str) -> String,
    planner: &MacroPlanner,
    sink: &mut dyn EventSink,
    fd: RawFd,
    reader: &mut R,
    guard: &mut InputGuard,
) -> std::io::Result<()> {
    if backend.is_terminal_focused() {
        return Ok(());
    }

    sink.emit_key(KEY_LEFTCTRL, KEY_PRESS)?;
    sink.emit_key(KEY_C, KEY_PRESS)?;
    sink.emit_key(KEY_C, KEY_RELEASE)?;
    sink.emit_key(KEY_LEFTCTRL, KEY_RELEASE)?;

    let Some(text) = backend.get_text(Selection::Clipboard) else {
        return Ok(());
    };

    let transformed = transform(&text);
    backend.set_text(Selection::Clipboard, &transformed);

    planner.release_all_modifiers(sink, fd, reader, guard)?;
    sink.emit_key(KEY_LEFTCTRL, KEY_PRESS)?;
    sink.emit_key(KEY_V, KEY_PRESS)?;
    sink.emit_key(KEY_V, KEY_RELEASE)?;
    sink.emit_key(KEY_LEFTCTRL, KEY_RELEASE)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DelayConfig;
    use crate::event::RecordingSink;
    use std::cell::RefCell;
    use std::time::Duration;

    struct FakeBackend {
        terminal: bool,
        text: RefCell<Option<String>>,
    }

    impl SelectionBackend for FakeBackend {
        fn is_terminal_focused(&self) -> bool {
            self.terminal
        }

        fn get_text(&self, _selection: Selection) -> Option<String> {
            self.text.borrow().clone()
        }

        fn set_text(&self, _selection: Selection, text: &str) {
            *self.text.borrow_mut() = Some(text.to_string());
        }
    }

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
    fn terminal_focus_skips_everything() {
        let backend = FakeBackend {
            terminal: true,
            text: RefCell::new(Some("hi".to_string())),
        };
        let mut sink = RecordingSink::default();
        let mut guard = InputGuard::new();
        let mut reader: &[u8] = &[];
        process_selection(
            &backend,
            |s| s.to_uppercase(),
            &planner(),
            &mut sink,
            -1,
            &mut reader,
            &mut guard,
        )
        .unwrap();
        assert!(sink.events.is_empty());
    }

    #[test]
    fn transform_is_applied_and_written_back() {
        let backend = FakeBackend {
            terminal: false,
            text: RefCell::new(Some("hello".to_string())),
        };
        let mut sink = RecordingSink::default();
        let mut guard = InputGuard::new();
        let mut reader: &[u8] = &[];
        process_selection(
            &backend,
            |s| s.to_uppercase(),
            &planner(),
            &mut sink,
            -1,
            &mut reader,
            &mut guard,
        )
        .unwrap();
        assert_eq!(backend.get_text(Selection::Clipboard).as_deref(), Some("HELLO"));
        assert!(!sink.events.is_empty());
    }
}
