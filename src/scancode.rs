//! Scancode-level types shared by the buffer, router and macro planner.

pub type Scancode = u16;

/// One key captured into the active word, along with whether Shift was
/// held at the moment it went down. The shifted flag is what lets the
/// decision engine and the macro planner reconstruct case without
/// re-deriving it from the live modifier state later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEntry {
    pub code: Scancode,
    pub shifted: bool,
}

impl KeyEntry {
    pub fn new(code: Scancode, shifted: bool) -> Self {
        KeyEntry { code, shifted }
    }
}

pub const KEY_ESC: Scancode = 1;
pub const KEY_BACKSPACE: Scancode = 14;
pub const KEY_TAB: Scancode = 15;
pub const KEY_ENTER: Scancode = 28;
pub const KEY_LEFTCTRL: Scancode = 29;
pub const KEY_LEFTSHIFT: Scancode = 42;
pub const KEY_RIGHTSHIFT: Scancode = 54;
pub const KEY_LEFTALT: Scancode = 56;
pub const KEY_SPACE: Scancode = 57;
pub const KEY_CAPSLOCK: Scancode = 58;
pub const KEY_RIGHTCTRL: Scancode = 97;
pub const KEY_RIGHTALT: Scancode = 100;
pub const KEY_LEFTMETA: Scancode = 125;
pub const KEY_RIGHTMETA: Scancode = 126;
pub const KEY_PAUSE: Scancode = 119;

pub const KEY_C: Scancode = 46;
pub const KEY_V: Scancode = 47;

/// True for the scancodes that end a word: whitespace and the common
/// ASCII delimiters recognised by `determine_hotkey_action`'s
/// auto-invert path.
pub fn is_word_boundary(code: Scancode) -> bool {
    matches!(code, KEY_SPACE | KEY_ENTER | KEY_TAB)
}
