//! The event router: the single state machine every kernel event passes
//! through. Tracks modifiers and the word being typed, watches for the
//! Pause hotkey and the configured OS layout-switch chord, and drives
//! the macro planner and decision engine when one of them needs to act.

use crate::buffer::InputBuffer;
use crate::config::ConfigSnapshot;
use crate::decision::{self, DecisionOutcome, LayoutId};
use crate::dictionary::Dictionary;
use crate::event::{
    EventSink, RawEvent, EV_KEY, EV_SYN, KEY_PRESS, KEY_RELEASE, KEY_REPEAT, SYN_REPORT,
};
use crate::guard::InputGuard;
use crate::keymap::char_for;
use crate::macros::MacroPlanner;
use crate::modifiers::ModifierState;
use crate::ngram::NgramTables;
use crate::scancode::{is_word_boundary, KeyEntry, KEY_BACKSPACE, KEY_PAUSE};
use crate::selection::{process_selection, NullSelectionBackend, SelectionBackend};
use crate::session::ActiveSession;
use crate::sound;
use crate::text_transform;
use arc_swap::ArcSwap;
use std::io::Read;
use std::os::unix::io::RawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The five actions the Pause key can trigger, decoded from the
/// modifiers held at the moment it's pressed (see
/// `Router::determine_hotkey_action`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HotkeyAction {
    InvertLayoutWord,
    InvertCaseWord,
    InvertLayoutSelection,
    InvertCaseSelection,
    TranslitSelection,
}

/// Shared, hot-swappable state the control thread mutates and the
/// router reads once per event. Stored behind `ArcSwap` rather than a
/// `Mutex` so a reload never blocks the router's hot path. `enabled` is
/// its own `Arc<AtomicBool>` rather than a bare `AtomicBool` so the
/// control plane can hold the exact same atomic the router reads,
/// instead of a copy nothing ever writes back to.
pub struct SharedState {
    pub enabled: Arc<AtomicBool>,
    pub config: ArcSwap<ConfigSnapshot>,
    pub ngram_tables: ArcSwap<NgramTables>,
    pub dictionary: ArcSwap<Dictionary>,
}

impl SharedState {
    pub fn new(config: ConfigSnapshot, dictionary: Dictionary) -> Arc<Self> {
        Arc::new(SharedState {
            enabled: Arc::new(AtomicBool::new(true)),
            config: ArcSwap::from_pointee(config),
            ngram_tables: ArcSwap::from_pointee(NgramTables::new()),
            dictionary: ArcSwap::from_pointee(dictionary),
        })
    }
}

pub struct Router {
    shared: Arc<SharedState>,
    buffer: InputBuffer,
    modifiers: ModifierState,
    os_layout: LayoutId,
    guard: InputGuard,
    planner: MacroPlanner,
    session: ActiveSession,
    selection_backend: Box<dyn SelectionBackend>,
}

impl Router {
    pub fn new(shared: Arc<SharedState>) -> Self {
        let delays = shared.config.load().delays;
        Router {
            shared,
            buffer: InputBuffer::new(),
            modifiers: ModifierState::new(),
            os_layout: LayoutId::English,
            guard: InputGuard::new(),
            planner: MacroPlanner::new(delays),
            session: ActiveSession::from_env(),
            selection_backend: Box::new(NullSelectionBackend),
        }
    }

    pub fn set_selection_backend(&mut self, backend: Box<dyn SelectionBackend>) {
        self.selection_backend = backend;
    }

    /// Processes one kernel event, writing passthrough and any
    /// synthesized events to `sink`. `fd`/`reader` are the stdin
    /// descriptor and stream macros use to buffer upstream input while
    /// they run.
    pub fn handle_event<R: Read>(
        &mut self,
        ev: RawEvent,
        sink: &mut dyn EventSink,
        fd: RawFd,
        reader: &mut R,
    ) -> std::io::Result<()> {
        if self.guard.is_macro_in_progress() {
            self.guard.push(ev);
            return Ok(());
        }

        if ev.type_ == EV_SYN && ev.code == SYN_REPORT {
            return sink.emit(ev);
        }

        if ev.type_ != EV_KEY {
            return sink.emit(ev);
        }

        let pressed = ev.value == KEY_PRESS;
        let released = ev.value == KEY_RELEASE;

        if self.modifiers.update(ev.code, pressed || ev.value == KEY_REPEAT) {
            return sink.emit(ev);
        }

        let cfg = self.shared.config.load();

        if ev.code == KEY_PAUSE && pressed {
            self.planner.set_delays(cfg.delays);
            let action = self.determine_hotkey_action();
            return self.dispatch_hotkey(action, &cfg, sink, fd, reader);
        }

        if pressed && self.any_non_shift_modifier() {
            if ev.code == cfg.hotkey.key && self.modifiers_hold_hotkey(&cfg) {
                self.os_layout = self.os_layout.other();
            }
            self.buffer.reset_current();
            return sink.emit(ev);
        }

        if !self.shared.enabled.load(Ordering::Acquire) {
            return sink.emit(ev);
        }

        if pressed {
            if ev.code == KEY_BACKSPACE {
                self.buffer.pop_char();
                self.buffer.reset_trailing();
            } else if is_word_boundary(ev.code) {
                self.on_word_boundary(&cfg, fd, reader, sink)?;
            } else if let Some(_ch) = char_for(ev.code, self.modifiers.any_shift()) {
                self.buffer
                    .push_char(KeyEntry::new(ev.code, self.modifiers.any_shift()));
            } else {
                self.buffer.reset_current();
            }
        } else if released {
            // release events don't change the buffer; only presses do.
        }

        sink.emit(ev)
    }

    fn any_non_shift_modifier(&self) -> bool {
        self.modifiers.any_ctrl() || self.modifiers.any_alt() || self.modifiers.any_meta()
    }

    fn modifiers_hold_hotkey(&self, cfg: &ConfigSnapshot) -> bool {
        use crate::scancode::{KEY_LEFTALT, KEY_LEFTCTRL, KEY_LEFTMETA, KEY_RIGHTALT};
        match cfg.hotkey.modifier {
            KEY_LEFTCTRL => self.modifiers.any_ctrl(),
            KEY_LEFTALT | KEY_RIGHTALT => self.modifiers.any_alt(),
            KEY_LEFTMETA => self.modifiers.any_meta(),
            _ => self.modifiers.any_ctrl(),
        }
    }

    /// Decodes the Pause key's action from the modifiers held at the
    /// moment it's pressed:
    ///
    /// | Modifier set | Action |
    /// |---|---|
    /// | left-ctrl & left-alt | TranslitSelection |
    /// | any shift | InvertLayoutSelection |
    /// | any alt (no shift) | InvertCaseSelection |
    /// | any ctrl (no shift, no alt) | InvertCaseWord |
    /// | none | InvertLayoutWord |
    fn determine_hotkey_action(&self) -> HotkeyAction {
        let m = &self.modifiers;
        if m.left_ctrl && m.left_alt {
            HotkeyAction::TranslitSelection
        } else if m.any_shift() {
            HotkeyAction::InvertLayoutSelection
        } else if m.any_alt() {
            HotkeyAction::InvertCaseSelection
        } else if m.any_ctrl() {
            HotkeyAction::InvertCaseWord
        } else {
            HotkeyAction::InvertLayoutWord
        }
    }

    fn dispatch_hotkey<R: Read>(
        &mut self,
        action: HotkeyAction,
        cfg: &ConfigSnapshot,
        sink: &mut dyn EventSink,
        fd: RawFd,
        reader: &mut R,
    ) -> std::io::Result<()> {
        self.guard.begin_macro();
        let result = self.run_hotkey_action(action, cfg, sink, fd, reader);
        self.guard.end_macro();
        for buffered in self.guard.drain() {
            self.handle_event(buffered, sink, fd, reader)?;
        }
        result
    }

    fn run_hotkey_action<R: Read>(
        &mut self,
        action: HotkeyAction,
        cfg: &ConfigSnapshot,
        sink: &mut dyn EventSink,
        fd: RawFd,
        reader: &mut R,
    ) -> std::io::Result<()> {
        match action {
            HotkeyAction::InvertLayoutWord => self.invert_layout_active_word(cfg, sink, fd, reader),
            HotkeyAction::InvertCaseWord => self.invert_case_active_word(sink, fd, reader),
            HotkeyAction::InvertLayoutSelection => process_selection(
                self.selection_backend.as_ref(),
                text_transform::invert_layout,
                &self.planner,
                sink,
                fd,
                reader,
                &mut self.guard,
            ),
            HotkeyAction::InvertCaseSelection => process_selection(
                self.selection_backend.as_ref(),
                text_transform::invert_case,
                &self.planner,
                sink,
                fd,
                reader,
                &mut self.guard,
            ),
            HotkeyAction::TranslitSelection => process_selection(
                self.selection_backend.as_ref(),
                text_transform::transliterate,
                &self.planner,
                sink,
                fd,
                reader,
                &mut self.guard,
            ),
        }
    }

    /// Manual layout-invert of the active word: backspaces the word and
    /// any trailing whitespace, toggles the tracked OS layout, sends the
    /// layout-switch chord, then retypes the *same* scancodes. The point
    /// of the layout switch is that those physical keys now produce the
    /// other script, so the fix is a verbatim retype, never a
    /// character-by-character transform.
    fn invert_layout_active_word<R: Read>(
        &mut self,
        cfg: &ConfigSnapshot,
        sink: &mut dyn EventSink,
        fd: RawFd,
        reader: &mut R,
    ) -> std::io::Result<()> {
        let word: Vec<KeyEntry> = self.buffer.active_word().to_vec();
        if word.is_empty() {
            return Ok(());
        }
        let trailing: Vec<KeyEntry> = self.buffer.trailing().to_vec();

        self.planner
            .release_all_modifiers(sink, fd, reader, &mut self.guard)?;
        self.planner.send_backspace(
            word.len() + trailing.len(),
            false,
            sink,
            fd,
            reader,
            &mut self.guard,
        )?;
        self.os_layout = self.os_layout.other();
        self.planner.send_layout_hotkey(
            cfg.hotkey.modifier,
            cfg.hotkey.key,
            sink,
            fd,
            reader,
            &mut self.guard,
        )?;
        self.planner
            .retype_trailing(&word, false, sink, fd, reader, &mut self.guard)?;
        self.planner
            .retype_trailing(&trailing, false, sink, fd, reader, &mut self.guard)?;
        self.buffer.commit_word();
        Ok(())
    }

    /// Manual case-invert of the active word: backspaces the word and
    /// trailing whitespace, then retypes each key with its shift state
    /// flipped — the same scancode, held under the opposite case.
    fn invert_case_active_word<R: Read>(
        &mut self,
        sink: &mut dyn EventSink,
        fd: RawFd,
        reader: &mut R,
    ) -> std::io::Result<()> {
        let word: Vec<KeyEntry> = self.buffer.active_word().to_vec();
        if word.is_empty() {
            return Ok(());
        }
        let trailing: Vec<KeyEntry> = self.buffer.trailing().to_vec();

        self.planner
            .release_all_modifiers(sink, fd, reader, &mut self.guard)?;
        self.planner.send_backspace(
            word.len() + trailing.len(),
            false,
            sink,
            fd,
            reader,
            &mut self.guard,
        )?;
        for entry in &word {
            self.planner.tap_key(
                entry.code,
                !entry.shifted,
                false,
                sink,
                fd,
                reader,
                &mut self.guard,
            )?;
        }
        self.planner
            .retype_trailing(&trailing, false, sink, fd, reader, &mut self.guard)?;
        self.buffer.reset_current();
        Ok(())
    }

    fn on_word_boundary<R: Read>(
        &mut self,
        cfg: &ConfigSnapshot,
        fd: RawFd,
        reader: &mut R,
        sink: &mut dyn EventSink,
    ) -> std::io::Result<()> {
        self.buffer.commit_word();
        let word: Vec<KeyEntry> = self.buffer.last_word().to_vec();
        if word.is_empty() {
            return Ok(());
        }

        let dict = self.shared.dictionary.load();
        let tables = self.shared.ngram_tables.load();
        let outcome = decision::decide(&word, self.os_layout, &cfg.auto_switch, &dict, &tables);

        if let DecisionOutcome::Switch(new_layout) = outcome {
            self.guard.begin_macro();
            self.planner
                .release_all_modifiers(sink, fd, reader, &mut self.guard)?;
            self.planner
                .send_backspace(word.len(), true, sink, fd, reader, &mut self.guard)?;
            self.os_layout = new_layout;
            self.planner.send_layout_hotkey(
                cfg.hotkey.modifier,
                cfg.hotkey.key,
                sink,
                fd,
                reader,
                &mut self.guard,
            )?;
            self.planner
                .retype_trailing(&word, true, sink, fd, reader, &mut self.guard)?;
            self.guard.end_macro();
            sound::play_for_layout(new_layout, &cfg.sound, &self.session);
            for buffered in self.guard.drain() {
                self.handle_event(buffered, sink, fd, reader)?;
            }
        }
        Ok(())
    }
}
