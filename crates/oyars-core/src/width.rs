// Oyars Glyph Width Conversion
// Full-width to half-width folding and kana-to-romaji expansion

/// Fold a full-width character to its half-width ASCII counterpart.
///
/// Covers the U+FF01..U+FF5E block by offset, the typographic quote
/// variants the keymap grammar permits, and the Japanese punctuation that
/// a romaji-mode IME re-widens on input. Characters without a half-width
/// counterpart are returned unchanged.
pub fn to_halfwidth(c: char) -> char {
    match c {
        '\u{ff01}'..='\u{ff5e}' => {
            char::from_u32(c as u32 - 0xff01 + 0x21).unwrap_or(c)
        }
        '”' => '"',
        '’' => '\'',
        '‘' => '`',
        '￥' => '\\',
        '　' => ' ',
        '、' => ',',
        '。' => '.',
        '「' => '[',
        '」' => ']',
        'ー' => '-',
        '・' => '/',
        _ => c,
    }
}

/// Romaji keystroke sequence for a kana character.
///
/// The daemon types romaji below a romaji-mode IME, so every kana the
/// keymap grammar permits expands to the ASCII sequence that composes it.
pub fn kana_to_romaji(c: char) -> Option<&'static str> {
    let romaji = match c {
        'あ' => "a",
        'い' => "i",
        'う' => "u",
        'え' => "e",
        'お' => "o",
        'か' => "ka",
        'き' => "ki",
        'く' => "ku",
        'け' => "ke",
        'こ' => "ko",
        'さ' => "sa",
        'し' => "si",
        'す' => "su",
        'せ' => "se",
        'そ' => "so",
        'た' => "ta",
        'ち' => "ti",
        'つ' => "tu",
        'て' => "te",
        'と' => "to",
        'な' => "na",
        'に' => "ni",
        'ぬ' => "nu",
        'ね' => "ne",
        'の' => "no",
        'は' => "ha",
        'ひ' => "hi",
        'ふ' => "hu",
        'へ' => "he",
        'ほ' => "ho",
        'ま' => "ma",
        'み' => "mi",
        'む' => "mu",
        'め' => "me",
        'も' => "mo",
        'や' => "ya",
        'ゆ' => "yu",
        'よ' => "yo",
        'ら' => "ra",
        'り' => "ri",
        'る' => "ru",
        'れ' => "re",
        'ろ' => "ro",
        'わ' => "wa",
        'を' => "wo",
        'ん' => "nn",
        'が' => "ga",
        'ぎ' => "gi",
        'ぐ' => "gu",
        'げ' => "ge",
        'ご' => "go",
        'ざ' => "za",
        'じ' => "zi",
        'ず' => "zu",
        'ぜ' => "ze",
        'ぞ' => "zo",
        'だ' => "da",
        'ぢ' => "di",
        'づ' => "du",
        'で' => "de",
        'ど' => "do",
        'ば' => "ba",
        'び' => "bi",
        'ぶ' => "bu",
        'べ' => "be",
        'ぼ' => "bo",
        'ぱ' => "pa",
        'ぴ' => "pi",
        'ぷ' => "pu",
        'ぺ' => "pe",
        'ぽ' => "po",
        'ぁ' => "xa",
        'ぃ' => "xi",
        'ぅ' => "xu",
        'ぇ' => "xe",
        'ぉ' => "xo",
        'っ' => "xtu",
        'ゃ' => "xya",
        'ゅ' => "xyu",
        'ょ' => "xyo",
        'ヴ' => "vu",
        _ => return None,
    };
    Some(romaji)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fullwidth_block_folds_by_offset() {
        assert_eq!(to_halfwidth('Ａ'), 'A');
        assert_eq!(to_halfwidth('ｚ'), 'z');
        assert_eq!(to_halfwidth('０'), '0');
        assert_eq!(to_halfwidth('！'), '!');
        assert_eq!(to_halfwidth('～'), '~');
    }

    #[test]
    fn test_quote_variants() {
        assert_eq!(to_halfwidth('”'), '"');
        assert_eq!(to_halfwidth('’'), '\'');
        assert_eq!(to_halfwidth('‘'), '`');
        assert_eq!(to_halfwidth('￥'), '\\');
    }

    #[test]
    fn test_kana_punctuation() {
        assert_eq!(to_halfwidth('、'), ',');
        assert_eq!(to_halfwidth('。'), '.');
        assert_eq!(to_halfwidth('「'), '[');
        assert_eq!(to_halfwidth('」'), ']');
        assert_eq!(to_halfwidth('ー'), '-');
        assert_eq!(to_halfwidth('・'), '/');
    }

    #[test]
    fn test_unconvertible_passes_through() {
        assert_eq!(to_halfwidth('a'), 'a');
        assert_eq!(to_halfwidth('き'), 'き');
        assert_eq!(to_halfwidth('゛'), '゛');
    }

    #[test]
    fn test_kana_to_romaji() {
        assert_eq!(kana_to_romaji('き'), Some("ki"));
        assert_eq!(kana_to_romaji('あ'), Some("a"));
        assert_eq!(kana_to_romaji('ん'), Some("nn"));
        assert_eq!(kana_to_romaji('っ'), Some("xtu"));
        assert_eq!(kana_to_romaji('ヴ'), Some("vu"));
    }

    #[test]
    fn test_non_kana_has_no_romaji() {
        assert_eq!(kana_to_romaji('a'), None);
        assert_eq!(kana_to_romaji('、'), None);
        assert_eq!(kana_to_romaji('無'), None);
    }
}
