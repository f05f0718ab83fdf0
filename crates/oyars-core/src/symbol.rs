// Oyars Symbol Tables
// Static lookups between physical keys, grid positions and output characters

use crate::key::{codes::*, Key};
use crate::mapping::GridPos;

/// A resolved output keystroke: the key to press and whether it must be
/// wrapped in an internal shift press/release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub key: Key,
    pub shift: bool,
}

impl KeyStroke {
    pub fn plain(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

/// Grid position of a physical key within the 4-row main block.
///
/// Only the remap-eligible keys appear here: digit row (with the JIS yen
/// key), two letter rows and the bottom row (with the JIS ro key).
/// Modifier, function and navigation keys are deliberately absent and
/// always pass through untranslated.
pub fn grid_position(key: Key) -> Option<GridPos> {
    let (row, col) = match key {
        KEY_1 => (0, 0),
        KEY_2 => (0, 1),
        KEY_3 => (0, 2),
        KEY_4 => (0, 3),
        KEY_5 => (0, 4),
        KEY_6 => (0, 5),
        KEY_7 => (0, 6),
        KEY_8 => (0, 7),
        KEY_9 => (0, 8),
        KEY_0 => (0, 9),
        KEY_MINUS => (0, 10),
        KEY_EQUAL => (0, 11),
        KEY_YEN => (0, 12),
        KEY_Q => (1, 0),
        KEY_W => (1, 1),
        KEY_E => (1, 2),
        KEY_R => (1, 3),
        KEY_T => (1, 4),
        KEY_Y => (1, 5),
        KEY_U => (1, 6),
        KEY_I => (1, 7),
        KEY_O => (1, 8),
        KEY_P => (1, 9),
        KEY_LEFTBRACE => (1, 10),
        KEY_RIGHTBRACE => (1, 11),
        KEY_A => (2, 0),
        KEY_S => (2, 1),
        KEY_D => (2, 2),
        KEY_F => (2, 3),
        KEY_G => (2, 4),
        KEY_H => (2, 5),
        KEY_J => (2, 6),
        KEY_K => (2, 7),
        KEY_L => (2, 8),
        KEY_SEMICOLON => (2, 9),
        KEY_APOSTROPHE => (2, 10),
        KEY_BACKSLASH => (2, 11),
        KEY_Z => (3, 0),
        KEY_X => (3, 1),
        KEY_C => (3, 2),
        KEY_V => (3, 3),
        KEY_B => (3, 4),
        KEY_N => (3, 5),
        KEY_M => (3, 6),
        KEY_COMMA => (3, 7),
        KEY_DOT => (3, 8),
        KEY_SLASH => (3, 9),
        KEY_RO => (3, 10),
        _ => return None,
    };
    Some(GridPos::new(row, col))
}

/// Unshifted label character of a physical key.
///
/// Per-key layer sections (`<x>`) in the keymap file name their layer key
/// by this character.
pub fn key_label(key: Key) -> Option<char> {
    let label = match key {
        KEY_1 => '1',
        KEY_2 => '2',
        KEY_3 => '3',
        KEY_4 => '4',
        KEY_5 => '5',
        KEY_6 => '6',
        KEY_7 => '7',
        KEY_8 => '8',
        KEY_9 => '9',
        KEY_0 => '0',
        KEY_MINUS => '-',
        KEY_EQUAL => '=',
        KEY_Q => 'q',
        KEY_W => 'w',
        KEY_E => 'e',
        KEY_R => 'r',
        KEY_T => 't',
        KEY_Y => 'y',
        KEY_U => 'u',
        KEY_I => 'i',
        KEY_O => 'o',
        KEY_P => 'p',
        KEY_LEFTBRACE => '[',
        KEY_RIGHTBRACE => ']',
        KEY_A => 'a',
        KEY_S => 's',
        KEY_D => 'd',
        KEY_F => 'f',
        KEY_G => 'g',
        KEY_H => 'h',
        KEY_J => 'j',
        KEY_K => 'k',
        KEY_L => 'l',
        KEY_SEMICOLON => ';',
        KEY_APOSTROPHE => '\'',
        KEY_BACKSLASH => '\\',
        KEY_Z => 'z',
        KEY_X => 'x',
        KEY_C => 'c',
        KEY_V => 'v',
        KEY_B => 'b',
        KEY_N => 'n',
        KEY_M => 'm',
        KEY_COMMA => ',',
        KEY_DOT => '.',
        KEY_SLASH => '/',
        _ => return None,
    };
    Some(label)
}

/// Keystroke for an output character.
///
/// Covers ASCII letters, digits and punctuation (shifted and unshifted)
/// plus the command kanji the keymap grammar permits. A miss means the
/// character cannot be typed and is skipped by the translator.
pub fn char_keystroke(c: char) -> Option<KeyStroke> {
    if c.is_ascii_lowercase() {
        return Some(KeyStroke::plain(letter_key(c)));
    }
    if c.is_ascii_uppercase() {
        return Some(KeyStroke::shifted(letter_key(c.to_ascii_lowercase())));
    }
    if c.is_ascii_digit() {
        return Some(KeyStroke::plain(digit_key(c)));
    }

    let stroke = match c {
        // unshifted punctuation
        '-' => KeyStroke::plain(KEY_MINUS),
        '=' => KeyStroke::plain(KEY_EQUAL),
        '[' => KeyStroke::plain(KEY_LEFTBRACE),
        ']' => KeyStroke::plain(KEY_RIGHTBRACE),
        ';' => KeyStroke::plain(KEY_SEMICOLON),
        '\'' => KeyStroke::plain(KEY_APOSTROPHE),
        '`' => KeyStroke::plain(KEY_GRAVE),
        '\\' => KeyStroke::plain(KEY_BACKSLASH),
        ',' => KeyStroke::plain(KEY_COMMA),
        '.' => KeyStroke::plain(KEY_DOT),
        '/' => KeyStroke::plain(KEY_SLASH),
        ' ' => KeyStroke::plain(KEY_SPACE),
        // shifted digit-row punctuation
        '!' => KeyStroke::shifted(KEY_1),
        '@' => KeyStroke::shifted(KEY_2),
        '#' => KeyStroke::shifted(KEY_3),
        '$' => KeyStroke::shifted(KEY_4),
        '%' => KeyStroke::shifted(KEY_5),
        '^' => KeyStroke::shifted(KEY_6),
        '&' => KeyStroke::shifted(KEY_7),
        '*' => KeyStroke::shifted(KEY_8),
        '(' => KeyStroke::shifted(KEY_9),
        ')' => KeyStroke::shifted(KEY_0),
        // other shifted punctuation
        '_' => KeyStroke::shifted(KEY_MINUS),
        '+' => KeyStroke::shifted(KEY_EQUAL),
        '{' => KeyStroke::shifted(KEY_LEFTBRACE),
        '}' => KeyStroke::shifted(KEY_RIGHTBRACE),
        ':' => KeyStroke::shifted(KEY_SEMICOLON),
        '"' => KeyStroke::shifted(KEY_APOSTROPHE),
        '~' => KeyStroke::shifted(KEY_GRAVE),
        '|' => KeyStroke::shifted(KEY_BACKSLASH),
        '<' => KeyStroke::shifted(KEY_COMMA),
        '>' => KeyStroke::shifted(KEY_DOT),
        '?' => KeyStroke::shifted(KEY_SLASH),
        // command glyphs
        '逃' => KeyStroke::plain(KEY_ESC),
        '入' => KeyStroke::plain(KEY_ENTER),
        '空' => KeyStroke::plain(KEY_SPACE),
        '後' => KeyStroke::plain(KEY_BACKSPACE),
        '消' => KeyStroke::plain(KEY_DELETE),
        '挿' => KeyStroke::plain(KEY_INSERT),
        '上' => KeyStroke::plain(KEY_UP),
        '左' => KeyStroke::plain(KEY_LEFT),
        '右' => KeyStroke::plain(KEY_RIGHT),
        '下' => KeyStroke::plain(KEY_DOWN),
        '家' => KeyStroke::plain(KEY_HOME),
        '終' => KeyStroke::plain(KEY_END),
        '前' => KeyStroke::plain(KEY_PAGEUP),
        '次' => KeyStroke::plain(KEY_PAGEDOWN),
        _ => return None,
    };
    Some(stroke)
}

fn letter_key(c: char) -> Key {
    match c {
        'a' => KEY_A,
        'b' => KEY_B,
        'c' => KEY_C,
        'd' => KEY_D,
        'e' => KEY_E,
        'f' => KEY_F,
        'g' => KEY_G,
        'h' => KEY_H,
        'i' => KEY_I,
        'j' => KEY_J,
        'k' => KEY_K,
        'l' => KEY_L,
        'm' => KEY_M,
        'n' => KEY_N,
        'o' => KEY_O,
        'p' => KEY_P,
        'q' => KEY_Q,
        'r' => KEY_R,
        's' => KEY_S,
        't' => KEY_T,
        'u' => KEY_U,
        'v' => KEY_V,
        'w' => KEY_W,
        'x' => KEY_X,
        'y' => KEY_Y,
        'z' => KEY_Z,
        _ => unreachable!("letter_key called with non-letter"),
    }
}

fn digit_key(c: char) -> Key {
    match c {
        '1' => KEY_1,
        '2' => KEY_2,
        '3' => KEY_3,
        '4' => KEY_4,
        '5' => KEY_5,
        '6' => KEY_6,
        '7' => KEY_7,
        '8' => KEY_8,
        '9' => KEY_9,
        '0' => KEY_0,
        _ => unreachable!("digit_key called with non-digit"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_position_corners() {
        assert_eq!(grid_position(KEY_1), Some(GridPos::new(0, 0)));
        assert_eq!(grid_position(KEY_YEN), Some(GridPos::new(0, 12)));
        assert_eq!(grid_position(KEY_Q), Some(GridPos::new(1, 0)));
        assert_eq!(grid_position(KEY_Z), Some(GridPos::new(3, 0)));
        assert_eq!(grid_position(KEY_RO), Some(GridPos::new(3, 10)));
    }

    #[test]
    fn test_grid_position_excludes_non_block_keys() {
        assert_eq!(grid_position(KEY_ENTER), None);
        assert_eq!(grid_position(KEY_SPACE), None);
        assert_eq!(grid_position(KEY_LEFTSHIFT), None);
        assert_eq!(grid_position(KEY_MUHENKAN), None);
        assert_eq!(grid_position(KEY_UP), None);
    }

    #[test]
    fn test_key_label() {
        assert_eq!(key_label(KEY_K), Some('k'));
        assert_eq!(key_label(KEY_SEMICOLON), Some(';'));
        assert_eq!(key_label(KEY_1), Some('1'));
        assert_eq!(key_label(KEY_ENTER), None);
    }

    #[test]
    fn test_char_keystroke_letters() {
        assert_eq!(char_keystroke('a'), Some(KeyStroke::plain(KEY_A)));
        assert_eq!(char_keystroke('A'), Some(KeyStroke::shifted(KEY_A)));
        assert_eq!(char_keystroke('7'), Some(KeyStroke::plain(KEY_7)));
    }

    #[test]
    fn test_char_keystroke_punctuation() {
        assert_eq!(char_keystroke('!'), Some(KeyStroke::shifted(KEY_1)));
        assert_eq!(char_keystroke(','), Some(KeyStroke::plain(KEY_COMMA)));
        assert_eq!(char_keystroke('?'), Some(KeyStroke::shifted(KEY_SLASH)));
    }

    #[test]
    fn test_char_keystroke_command_glyphs() {
        assert_eq!(char_keystroke('入'), Some(KeyStroke::plain(KEY_ENTER)));
        assert_eq!(char_keystroke('後'), Some(KeyStroke::plain(KEY_BACKSPACE)));
        assert_eq!(char_keystroke('左'), Some(KeyStroke::plain(KEY_LEFT)));
    }

    #[test]
    fn test_char_keystroke_miss() {
        assert_eq!(char_keystroke('き'), None);
        assert_eq!(char_keystroke('無'), None);
        assert_eq!(char_keystroke('゛'), None);
    }
}
