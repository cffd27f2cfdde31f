//! US QWERTY scancode → character table. This is the physical-key layer
//! everything else is built on: the dictionary's Cyrillic lookup maps
//! Russian words onto the sequence of *these* characters a Russian
//! layout's physical keys would produce, and the decision engine's
//! bypass rules need to see punctuation the way a person reading the
//! buffer would.

use crate::scancode::*;

const LOWER: &[(Scancode, char)] = &[
    (2, '1'),
    (3, '2'),
    (4, '3'),
    (5, '4'),
    (6, '5'),
    (7, '6'),
    (8, '7'),
    (9, '8'),
    (10, '9'),
    (11, '0'),
    (12, '-'),
    (13, '='),
    (16, 'q'),
    (17, 'w'),
    (18, 'e'),
    (19, 'r'),
    (20, 't'),
    (21, 'y'),
    (22, 'u'),
    (23, 'i'),
    (24, 'o'),
    (25, 'p'),
    (26, '['),
    (27, ']'),
    (30, 'a'),
    (31, 's'),
    (32, 'd'),
    (33, 'f'),
    (34, 'g'),
    (35, 'h'),
    (36, 'j'),
    (37, 'k'),
    (38, 'l'),
    (39, ';'),
    (40, '\''),
    (41, '`'),
    (43, '\\'),
    (44, 'z'),
    (45, 'x'),
    (46, 'c'),
    (47, 'v'),
    (48, 'b'),
    (49, 'n'),
    (50, 'm'),
    (51, ','),
    (52, '.'),
    (53, '/'),
    (KEY_SPACE, ' '),
];

const UPPER: &[(Scancode, char)] = &[
    (2, '!'),
    (3, '@'),
    (4, '#'),
    (5, '$'),
    (6, '%'),
    (7, '^'),
    (8, '&'),
    (9, '*'),
    (10, '('),
    (11, ')'),
    (12, '_'),
    (13, '+'),
    (26, '{'),
    (27, '}'),
    (39, ':'),
    (40, '"'),
    (41, '~'),
    (43, '|'),
    (51, '<'),
    (52, '>'),
    (53, '?'),
];

/// The physical-key correspondence between a Cyrillic (ЙЦУКЕН) layout and
/// a Latin (QWERTY) layout: each pair names the lowercase Cyrillic letter
/// and the lowercase Latin character produced by the same physical key.
/// Both `dictionary` and `text_transform` key off this single table so
/// the position mapping can't drift between the two call sites.
pub const CYRILLIC_QWERTY_POSITIONS: &[(char, char)] = &[
    ('а', 'f'),
    ('б', ','),
    ('в', 'd'),
    ('г', 'u'),
    ('д', 'l'),
    ('е', 't'),
    ('ж', ';'),
    ('з', 'p'),
    ('и', 'b'),
    ('й', 'q'),
    ('к', 'r'),
    ('л', 'k'),
    ('м', 'v'),
    ('н', 'y'),
    ('о', 'j'),
    ('п', 'g'),
    ('р', 'h'),
    ('с', 'c'),
    ('т', 'n'),
    ('у', 'e'),
    ('ф', 'a'),
    ('х', '['),
    ('ц', 'w'),
    ('ч', 'x'),
    ('ш', 'i'),
    ('щ', 'o'),
    ('ъ', ']'),
    ('ы', 's'),
    ('ь', 'm'),
    ('э', '\''),
    ('ю', '.'),
    ('я', 'z'),
    ('ё', '`'),
];

fn lookup(table: &[(Scancode, char)], code: Scancode) -> Option<char> {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, ch)| *ch)
}

/// Resolves a scancode plus shift state to the character a US QWERTY
/// layout would produce. Letters fold through `to_ascii_uppercase`
/// instead of a second table since they're the only shifted characters
/// that are a pure case transform of their unshifted form.
pub fn char_for(code: Scancode, shifted: bool) -> Option<char> {
    if let Some(ch) = lookup(LOWER, code) {
        if shifted {
            return Some(if ch.is_ascii_alphabetic() {
                ch.to_ascii_uppercase()
            } else {
                lookup(UPPER, code).unwrap_or(ch)
            });
        }
        return Some(ch);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_shift_to_uppercase() {
        assert_eq!(char_for(30, false), Some('a'));
        assert_eq!(char_for(30, true), Some('A'));
    }

    #[test]
    fn punctuation_shifts_to_its_own_symbol() {
        assert_eq!(char_for(3, false), Some('2'));
        assert_eq!(char_for(3, true), Some('@'));
        assert_eq!(char_for(12, true), Some('_'));
    }

    #[test]
    fn unmapped_scancode_is_none() {
        assert_eq!(char_for(1, false), None);
    }
}
