// Oyars Key Type
// A single key code from Linux input-event-codes.h

use std::fmt;
use std::str::FromStr;

/// A keyboard key code.
///
/// Newtype wrapper around u16 for type safety; the numeric values match
/// Linux input-event-codes.h definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Key(pub u16);

impl Key {
    /// Get the raw numeric code value
    pub fn code(self) -> u16 {
        self.0
    }

    /// Get the display name of this key
    pub fn name(self) -> &'static str {
        key_name(self.0)
    }
}

impl From<u16> for Key {
    fn from(code: u16) -> Self {
        Key(code)
    }
}

impl From<Key> for u16 {
    fn from(key: Key) -> Self {
        key.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        key_from_name(s).ok_or_else(|| format!("Unknown key: {}", s))
    }
}

/// Key code constants for the keys the remapper deals with.
///
/// Modifier keys, the JIS extra keys and the main alphanumeric block.
pub mod codes {
    use super::Key;

    pub const KEY_ESC: Key = Key(1);
    pub const KEY_1: Key = Key(2);
    pub const KEY_2: Key = Key(3);
    pub const KEY_3: Key = Key(4);
    pub const KEY_4: Key = Key(5);
    pub const KEY_5: Key = Key(6);
    pub const KEY_6: Key = Key(7);
    pub const KEY_7: Key = Key(8);
    pub const KEY_8: Key = Key(9);
    pub const KEY_9: Key = Key(10);
    pub const KEY_0: Key = Key(11);
    pub const KEY_MINUS: Key = Key(12);
    pub const KEY_EQUAL: Key = Key(13);
    pub const KEY_BACKSPACE: Key = Key(14);
    pub const KEY_TAB: Key = Key(15);
    pub const KEY_Q: Key = Key(16);
    pub const KEY_W: Key = Key(17);
    pub const KEY_E: Key = Key(18);
    pub const KEY_R: Key = Key(19);
    pub const KEY_T: Key = Key(20);
    pub const KEY_Y: Key = Key(21);
    pub const KEY_U: Key = Key(22);
    pub const KEY_I: Key = Key(23);
    pub const KEY_O: Key = Key(24);
    pub const KEY_P: Key = Key(25);
    pub const KEY_LEFTBRACE: Key = Key(26);
    pub const KEY_RIGHTBRACE: Key = Key(27);
    pub const KEY_ENTER: Key = Key(28);
    pub const KEY_LEFTCTRL: Key = Key(29);
    pub const KEY_A: Key = Key(30);
    pub const KEY_S: Key = Key(31);
    pub const KEY_D: Key = Key(32);
    pub const KEY_F: Key = Key(33);
    pub const KEY_G: Key = Key(34);
    pub const KEY_H: Key = Key(35);
    pub const KEY_J: Key = Key(36);
    pub const KEY_K: Key = Key(37);
    pub const KEY_L: Key = Key(38);
    pub const KEY_SEMICOLON: Key = Key(39);
    pub const KEY_APOSTROPHE: Key = Key(40);
    pub const KEY_GRAVE: Key = Key(41);
    pub const KEY_LEFTSHIFT: Key = Key(42);
    pub const KEY_BACKSLASH: Key = Key(43);
    pub const KEY_Z: Key = Key(44);
    pub const KEY_X: Key = Key(45);
    pub const KEY_C: Key = Key(46);
    pub const KEY_V: Key = Key(47);
    pub const KEY_B: Key = Key(48);
    pub const KEY_N: Key = Key(49);
    pub const KEY_M: Key = Key(50);
    pub const KEY_COMMA: Key = Key(51);
    pub const KEY_DOT: Key = Key(52);
    pub const KEY_SLASH: Key = Key(53);
    pub const KEY_RIGHTSHIFT: Key = Key(54);
    pub const KEY_LEFTALT: Key = Key(56);
    pub const KEY_SPACE: Key = Key(57);
    pub const KEY_RO: Key = Key(89);
    pub const KEY_HENKAN: Key = Key(92);
    pub const KEY_MUHENKAN: Key = Key(94);
    pub const KEY_RIGHTCTRL: Key = Key(97);
    pub const KEY_RIGHTALT: Key = Key(100);
    pub const KEY_HOME: Key = Key(102);
    pub const KEY_UP: Key = Key(103);
    pub const KEY_PAGEUP: Key = Key(104);
    pub const KEY_LEFT: Key = Key(105);
    pub const KEY_RIGHT: Key = Key(106);
    pub const KEY_END: Key = Key(107);
    pub const KEY_DOWN: Key = Key(108);
    pub const KEY_PAGEDOWN: Key = Key(109);
    pub const KEY_INSERT: Key = Key(110);
    pub const KEY_DELETE: Key = Key(111);
    pub const KEY_YEN: Key = Key(124);
}

/// Display name for a key code
pub fn key_name(code: u16) -> &'static str {
    match code {
        1 => "ESC",
        2 => "1",
        3 => "2",
        4 => "3",
        5 => "4",
        6 => "5",
        7 => "6",
        8 => "7",
        9 => "8",
        10 => "9",
        11 => "0",
        12 => "MINUS",
        13 => "EQUAL",
        14 => "BACKSPACE",
        15 => "TAB",
        16 => "Q",
        17 => "W",
        18 => "E",
        19 => "R",
        20 => "T",
        21 => "Y",
        22 => "U",
        23 => "I",
        24 => "O",
        25 => "P",
        26 => "LEFT_BRACE",
        27 => "RIGHT_BRACE",
        28 => "ENTER",
        29 => "LEFT_CTRL",
        30 => "A",
        31 => "S",
        32 => "D",
        33 => "F",
        34 => "G",
        35 => "H",
        36 => "J",
        37 => "K",
        38 => "L",
        39 => "SEMICOLON",
        40 => "APOSTROPHE",
        41 => "GRAVE",
        42 => "LEFT_SHIFT",
        43 => "BACKSLASH",
        44 => "Z",
        45 => "X",
        46 => "C",
        47 => "V",
        48 => "B",
        49 => "N",
        50 => "M",
        51 => "COMMA",
        52 => "DOT",
        53 => "SLASH",
        54 => "RIGHT_SHIFT",
        56 => "LEFT_ALT",
        57 => "SPACE",
        89 => "RO",
        92 => "HENKAN",
        94 => "MUHENKAN",
        97 => "RIGHT_CTRL",
        100 => "RIGHT_ALT",
        102 => "HOME",
        103 => "UP",
        104 => "PAGE_UP",
        105 => "LEFT",
        106 => "RIGHT",
        107 => "END",
        108 => "DOWN",
        109 => "PAGE_DOWN",
        110 => "INSERT",
        111 => "DELETE",
        124 => "YEN",
        _ => "UNKNOWN",
    }
}

/// Try to parse a key name to a key code
pub fn key_from_name(name: &str) -> Option<Key> {
    let name_upper = name.to_uppercase();
    for code in 1..=248u16 {
        let candidate = key_name(code);
        if candidate != "UNKNOWN" && candidate == name_upper {
            return Some(Key(code));
        }
    }
    None
}
