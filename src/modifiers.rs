//! Tracks which modifier keys are currently held, from raw key events.

use crate::scancode::{
    Scancode, KEY_LEFTALT, KEY_LEFTCTRL, KEY_LEFTMETA, KEY_LEFTSHIFT, KEY_RIGHTALT, KEY_RIGHTCTRL,
    KEY_RIGHTMETA, KEY_RIGHTSHIFT,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModifierState {
    pub left_shift: bool,
    pub right_shift: bool,
    pub left_ctrl: bool,
    pub right_ctrl: bool,
    pub left_alt: bool,
    pub right_alt: bool,
    pub left_meta: bool,
    pub right_meta: bool,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the tracked state for a key event, if the key is one of the
    /// eight tracked modifiers. Returns whether the event was consumed.
    pub fn update(&mut self, code: Scancode, pressed: bool) -> bool {
        let slot = match code {
            KEY_LEFTSHIFT => &mut self.left_shift,
            KEY_RIGHTSHIFT => &mut self.right_shift,
            KEY_LEFTCTRL => &mut self.left_ctrl,
            KEY_RIGHTCTRL => &mut self.right_ctrl,
            KEY_LEFTALT => &mut self.left_alt,
            KEY_RIGHTALT => &mut self.right_alt,
            KEY_LEFTMETA => &mut self.left_meta,
            KEY_RIGHTMETA => &mut self.right_meta,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    pub fn any_shift(&self) -> bool {
        self.left_shift || self.right_shift
    }

    pub fn any_ctrl(&self) -> bool {
        self.left_ctrl || self.right_ctrl
    }

    pub fn any_alt(&self) -> bool {
        self.left_alt || self.right_alt
    }

    pub fn any_meta(&self) -> bool {
        self.left_meta || self.right_meta
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KEY_PRESS, KEY_RELEASE};

    #[test]
    fn tracks_independent_shift_keys() {
        let mut m = ModifierState::new();
        assert!(m.update(KEY_LEFTSHIFT, KEY_PRESS != 0));
        assert!(m.any_shift());
        assert!(m.update(KEY_RIGHTSHIFT, KEY_RELEASE != 0));
        assert!(m.any_shift());
        m.update(KEY_LEFTSHIFT, false);
        assert!(!m.any_shift());
    }

    #[test]
    fn non_modifier_key_is_not_consumed() {
        let mut m = ModifierState::new();
        assert!(!m.update(30, true));
    }

    #[test]
    fn clear_resets_everything() {
        let mut m = ModifierState::new();
        m.update(KEY_LEFTCTRL, true);
        m.update(KEY_LEFTMETA, true);
        m.clear();
        assert!(!m.any_ctrl());
        assert!(!m.any_meta());
    }
}
