//! UTF-8 text transforms applied to clipboard selections: case
//! inversion, QWERTY layout inversion, and phonetic transliteration
//! between Cyrillic and Latin.
//!
//! Layout inversion and transliteration are deliberately different
//! tables. Layout inversion maps a word typed on the *wrong* physical
//! layout back onto the letters that layout's keys actually sit under
//! (the same position mapping `dictionary` uses); transliteration
//! instead renders the *sound* of a word in the other script, which is
//! why `щ` becomes `shch` there but a single QWERTY key here.

const CYRILLIC_LOWER: &str = "абвгдежзийклмнопрстуфхцчшщъыьэюяё";
const CYRILLIC_UPPER: &str = "АБВГДЕЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯЁ";

fn cyrillic_to_qwerty_table() -> &'static [(char, char)] {
    crate::keymap::CYRILLIC_QWERTY_POSITIONS
}

fn is_cyrillic(c: char) -> bool {
    CYRILLIC_LOWER.contains(c) || CYRILLIC_UPPER.contains(c)
}

fn is_predominantly_cyrillic(text: &str) -> bool {
    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.is_empty() {
        return false;
    }
    let cyrillic_count = letters.iter().filter(|c| is_cyrillic(**c)).count();
    cyrillic_count * 2 > letters.len()
}

/// Positional EN→RU: every QWERTY character becomes whichever Cyrillic
/// letter sits under the same key.
fn en_to_ru_char(c: char) -> char {
    let table = cyrillic_to_qwerty_table();
    let lower = c.to_lowercase().next().unwrap_or(c);
    match table.iter().find(|(_, q)| *q == lower) {
        Some((cyr, _)) => {
            if c.is_uppercase() {
                cyr.to_uppercase().next().unwrap_or(*cyr)
            } else {
                *cyr
            }
        }
        None => c,
    }
}

/// Positional RU→EN: the inverse of the table above.
fn ru_to_en_char(c: char) -> char {
    let table = cyrillic_to_qwerty_table();
    let lower = c.to_lowercase().next().unwrap_or(c);
    match table.iter().find(|(cyr, _)| *cyr == lower) {
        Some((_, q)) => {
            if c.is_uppercase() {
                q.to_uppercase().next().unwrap_or(*q)
            } else {
                *q
            }
        }
        None => c,
    }
}

/// Inverts the QWERTY layout a selection was typed on: Cyrillic text is
/// converted back to the Latin characters the same keys would produce,
/// and vice versa.
pub fn invert_layout(text: &str) -> String {
    if is_predominantly_cyrillic(text) {
        text.chars().map(ru_to_en_char).collect()
    } else {
        text.chars().map(en_to_ru_char).collect()
    }
}

fn invert_case_char(c: char) -> char {
    if c.is_uppercase() {
        c.to_lowercase().next().unwrap_or(c)
    } else if c.is_lowercase() {
        c.to_uppercase().next().unwrap_or(c)
    } else {
        c
    }
}

pub fn invert_case(text: &str) -> String {
    text.chars().map(invert_case_char).collect()
}

/// Single-character phonetic transliteration table, Latin → Cyrillic.
/// Letters needing more than one Latin character (ж, ч, ш, щ, ъ, э, ю, я)
/// are handled separately in `lat_to_cyr`/`cyr_to_lat`.
const LAT_TO_CYR_SINGLE: &[(char, char)] = &[
    ('a', 'а'),
    ('b', 'б'),
    ('v', 'в'),
    ('g', 'г'),
    ('d', 'д'),
    ('e', 'е'),
    ('z', 'з'),
    ('i', 'и'),
    ('j', 'й'),
    ('k', 'к'),
    ('l', 'л'),
    ('m', 'м'),
    ('n', 'н'),
    ('o', 'о'),
    ('p', 'п'),
    ('r', 'р'),
    ('s', 'с'),
    ('t', 'т'),
    ('u', 'у'),
    ('f', 'ф'),
    ('h', 'х'),
    ('c', 'ц'),
    ('y', 'ы'),
];

const LAT_TO_CYR_MULTI: &[(&str, &str)] = &[
    ("shch", "щ"),
    ("sch", "щ"),
    ("zh", "ж"),
    ("ch", "ч"),
    ("sh", "ш"),
    ("yu", "ю"),
    ("ya", "я"),
    ("eh", "э"),
];

const CYR_TO_LAT_MULTI: &[(char, &str)] = &[
    ('ж', "zh"),
    ('ч', "ch"),
    ('ш', "sh"),
    ('щ', "shch"),
    ('ъ', ""),
    ('э', "e"),
    ('ю', "yu"),
    ('я', "ya"),
    ('ё', "yo"),
];

pub fn lat_to_cyr(text: &str) -> String {
    let lower = text.to_lowercase();
    let chars: Vec<char> = lower.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let mut matched = false;
        for (pat, repl) in LAT_TO_CYR_MULTI {
            let pat_len = pat.chars().count();
            if chars[i..].iter().collect::<String>().starts_with(pat) {
                out.push_str(repl);
                i += pat_len;
                matched = true;
                break;
            }
        }
        if matched {
            continue;
        }
        if chars[i] == '\'' {
            out.push('ь');
            i += 1;
            continue;
        }
        match LAT_TO_CYR_SINGLE.iter().find(|(l, _)| *l == chars[i]) {
            Some((_, cyr)) => out.push(*cyr),
            None => out.push(chars[i]),
        }
        i += 1;
    }
    out
}

pub fn cyr_to_lat(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let lower = c.to_lowercase().next().unwrap_or(c);
        if let Some((_, repl)) = CYR_TO_LAT_MULTI.iter().find(|(cy, _)| *cy == lower) {
            out.push_str(repl);
            continue;
        }
        if lower == 'ь' {
            out.push('\'');
            continue;
        }
        match LAT_TO_CYR_SINGLE.iter().find(|(_, cy)| *cy == lower) {
            Some((lat, _)) => out.push(*lat),
            None => out.push(c),
        }
    }
    out
}

/// Phonetic transliteration dispatched by the selection's predominant
/// script, same direction-picking rule as `invert_layout`.
pub fn transliterate(text: &str) -> String {
    if is_predominantly_cyrillic(text) {
        cyr_to_lat(text)
    } else {
        lat_to_cyr(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_predominantly_cyrillic_text() {
        assert!(is_predominantly_cyrillic("привет"));
        assert!(!is_predominantly_cyrillic("hello"));
    }

    #[test]
    fn invert_layout_round_trips_through_qwerty_positions() {
        let ru = "привет";
        let as_qwerty = invert_layout(ru);
        assert_eq!(invert_layout(&as_qwerty), ru);
    }

    #[test]
    fn invert_case_handles_ascii_and_cyrillic() {
        assert_eq!(invert_case("Hello"), "hELLO");
        assert_eq!(invert_case("Привет"), "пРИВЕТ");
    }

    #[test]
    fn transliterate_handles_multichar_letters() {
        assert_eq!(lat_to_cyr("shchuka"), "щука");
        assert_eq!(cyr_to_lat("щука"), "shchuka");
    }

    #[test]
    fn transliterate_picks_direction_from_script() {
        assert_eq!(transliterate("privet"), "привет");
        assert_eq!(transliterate("привет"), "privet");
    }
}
