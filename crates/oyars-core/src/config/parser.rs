// Oyars Keymap Grammar Parser
// Parses the section/row keymap text format into a KeymapTable

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::mapping::{InputMode, KeymapTable, LayerGrid, LayerKind, LAYER_ROWS};

/// Every character a keymap cell may contain: hiragana, kana punctuation,
/// full-width Latin/digits/punctuation and the command kanji.
const VALID_GLYPHS: &str = "ぁあぃいぅうぇえぉおかがきぎくぐけげこごさざしじすずせぜそぞただちぢっつづてでとどなにぬねのはばぱひびぴふぶぷへべぺほぼぽまみむめもゃやゅゆょよらりるれろわをんヴ、。゛゜「」ー・！”＃＄％＆’（）＊＋，－．／０１２３４５６７８９：；＜＝＞？＠ＡＢＣＤＥＦＧＨＩＪＫＬＭＮＯＰＱＲＳＴＵＶＷＸＹＺ［￥］＾＿｀‘ａｂｃｄｅｆｇｈｉｊｋｌｍｎｏｐｑｒｓｔｕｖｗｘｙｚ｛｜｝～逃入空後消挿上左右下家終前次無";

static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(.*)\]$").expect("section pattern"));
static KEY_SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<(.)>$").expect("key section pattern"));

/// Keymap configuration errors. Line and column are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown section label [{label}] at line {line}")]
    UnknownSection { line: usize, label: String },

    #[error("unexpected row outside a section at line {line}: a section holds exactly 4 rows")]
    TooManyRows { line: usize },

    #[error("invalid token '{fragment}' at line {line}, col {col}")]
    InvalidToken {
        line: usize,
        col: usize,
        fragment: char,
    },
}

/// The (mode, layer) pair a fixed section label selects.
fn section_target(label: &str) -> Option<(InputMode, LayerKind)> {
    let target = match label {
        "ローマ字シフト無し" => (InputMode::Kana, LayerKind::NoShift),
        "ローマ字小指シフト" => (InputMode::Kana, LayerKind::Shift),
        "ローマ字左親指シフト" => (InputMode::Kana, LayerKind::LeftOyaShift),
        "ローマ字右親指シフト" => (InputMode::Kana, LayerKind::RightOyaShift),
        "英数シフト無し" => (InputMode::Eisu, LayerKind::NoShift),
        "英数小指シフト" => (InputMode::Eisu, LayerKind::Shift),
        "英数左親指シフト" => (InputMode::Eisu, LayerKind::LeftOyaShift),
        "英数右親指シフト" => (InputMode::Eisu, LayerKind::RightOyaShift),
        _ => return None,
    };
    Some(target)
}

fn is_valid_glyph(c: char) -> bool {
    VALID_GLYPHS.contains(c)
}

/// A section being accumulated while its rows are read.
enum SectionHeader {
    Fixed(InputMode, LayerKind),
    KeyLayer(char),
}

struct PendingSection {
    header: SectionHeader,
    rows: Vec<Vec<String>>,
}

impl PendingSection {
    fn complete(self, table: &mut KeymapTable) {
        let mut rows: [Vec<String>; LAYER_ROWS] = Default::default();
        for (i, row) in self.rows.into_iter().enumerate().take(LAYER_ROWS) {
            rows[i] = row;
        }
        let grid = LayerGrid::new(rows);
        match self.header {
            SectionHeader::Fixed(mode, kind) => table.insert_layer(mode, kind, grid),
            SectionHeader::KeyLayer(label) => table.insert_key_layer(label, grid),
        }
    }
}

/// Parse keymap text into a `KeymapTable`.
///
/// Blank lines and lines starting with `;` are skipped. Every section
/// header must be followed by exactly 4 row lines; a trailing section with
/// fewer rows at end of input is silently dropped.
pub fn parse_keymap_str(text: &str) -> Result<KeymapTable, ConfigError> {
    let mut table = KeymapTable::new();
    let mut pending: Option<PendingSection> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;

        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        // A full section closes before the next line is interpreted.
        if pending
            .as_ref()
            .is_some_and(|p| p.rows.len() >= LAYER_ROWS)
        {
            pending.take().expect("checked above").complete(&mut table);
        }

        if let Some(section) = pending.as_mut() {
            section.rows.push(parse_row(line, line_no)?);
        } else if let Some(caps) = SECTION_RE.captures(line) {
            let label = &caps[1];
            let (mode, kind) =
                section_target(label).ok_or_else(|| ConfigError::UnknownSection {
                    line: line_no,
                    label: label.to_string(),
                })?;
            pending = Some(PendingSection {
                header: SectionHeader::Fixed(mode, kind),
                rows: Vec::with_capacity(LAYER_ROWS),
            });
        } else if let Some(caps) = KEY_SECTION_RE.captures(line) {
            let label = caps[1].chars().next().expect("single-char capture");
            pending = Some(PendingSection {
                header: SectionHeader::KeyLayer(label),
                rows: Vec::with_capacity(LAYER_ROWS),
            });
        } else {
            return Err(ConfigError::TooManyRows { line: line_no });
        }
    }

    if let Some(section) = pending.take() {
        if section.rows.len() >= LAYER_ROWS {
            section.complete(&mut table);
        }
        // fewer than 4 rows at EOF: section dropped without error
    }

    Ok(table)
}

/// Parse a keymap file into a `KeymapTable`.
pub fn parse_keymap_path<P: AsRef<Path>>(path: P) -> Result<KeymapTable, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    parse_keymap_str(&text)
}

/// Tokenize one row line into its cells.
///
/// A cell is either a quoted single character `'X'` (which may be any
/// character, including the separator comma) or a run of permitted glyphs;
/// cells are separated by `,`.
fn parse_row(line: &str, line_no: usize) -> Result<Vec<String>, ConfigError> {
    let chars: Vec<char> = line.chars().collect();
    let n = chars.len();
    let mut cells = Vec::new();
    let mut i = 0;

    while i < n {
        let quoted = chars[i] == '\''
            && i + 2 < n
            && chars[i + 2] == '\''
            && (i + 3 == n || chars[i + 3] == ',');
        if quoted {
            cells.push(chars[i + 1].to_string());
            i += 4;
        } else if is_valid_glyph(chars[i]) && (i + 1 == n || chars[i + 1] == ',') {
            cells.push(chars[i].to_string());
            i += 2;
        } else if is_valid_glyph(chars[i]) && i + 1 < n && is_valid_glyph(chars[i + 1]) {
            let mut cell = String::new();
            cell.push(chars[i]);
            let mut j = i + 1;
            loop {
                if j < n && is_valid_glyph(chars[j]) {
                    cell.push(chars[j]);
                    j += 1;
                } else if j == n || chars[j] == ',' {
                    j += 1;
                    break;
                } else {
                    return Err(ConfigError::InvalidToken {
                        line: line_no,
                        col: j + 1,
                        fragment: chars[j],
                    });
                }
            }
            cells.push(cell);
            i = j;
        } else {
            return Err(ConfigError::InvalidToken {
                line: line_no,
                col: i + 1,
                fragment: chars[i],
            });
        }
    }

    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::GridPos;

    fn kana_no_shift_header() -> &'static str {
        "[ローマ字シフト無し]"
    }

    #[test]
    fn test_row_roundtrip() {
        let source = "あ,い,う,え,お,か,き,く,け,こ";
        let text = format!("{}\n{}\nた,ち,つ,て,と\nな,に,ぬ\nは,ひ\n", kana_no_shift_header(), source);
        let table = parse_keymap_str(&text).unwrap();
        let grid = table.layer(InputMode::Kana, LayerKind::NoShift).unwrap();
        for (col, glyph) in "あいうえおかきくけこ".chars().enumerate() {
            assert_eq!(grid.cell(GridPos::new(0, col)), Some(glyph.to_string().as_str()));
        }
        assert_eq!(grid.cell(GridPos::new(1, 4)), Some("と"));
        assert_eq!(grid.cell(GridPos::new(3, 1)), Some("ひ"));
    }

    #[test]
    fn test_quoted_comma_literal() {
        let cells = parse_row("','", 1).unwrap();
        assert_eq!(cells, vec![",".to_string()]);
    }

    #[test]
    fn test_quoted_literal_among_cells() {
        let cells = parse_row("あ,'!',い", 1).unwrap();
        assert_eq!(cells, vec!["あ".to_string(), "!".to_string(), "い".to_string()]);
    }

    #[test]
    fn test_multi_glyph_cell() {
        let cells = parse_row("きゃ,き,っと", 1).unwrap();
        assert_eq!(
            cells,
            vec!["きゃ".to_string(), "き".to_string(), "っと".to_string()]
        );
    }

    #[test]
    fn test_invalid_token_position() {
        let err = parse_row("あ,い,漢", 3).unwrap_err();
        match err {
            ConfigError::InvalidToken { line, col, fragment } => {
                assert_eq!(line, 3);
                assert_eq!(col, 5);
                assert_eq!(fragment, '漢');
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_token_inside_cell() {
        let err = parse_row("きゃQ,い", 2).unwrap_err();
        match err {
            ConfigError::InvalidToken { line, col, .. } => {
                assert_eq!(line, 2);
                assert_eq!(col, 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_eight_sections_parse() {
        let labels = [
            "ローマ字シフト無し",
            "ローマ字小指シフト",
            "ローマ字左親指シフト",
            "ローマ字右親指シフト",
            "英数シフト無し",
            "英数小指シフト",
            "英数左親指シフト",
            "英数右親指シフト",
        ];
        let mut text = String::new();
        for label in labels {
            text.push_str(&format!("[{}]\nあ,い\nう,え\nお,か\nき,く\n", label));
        }
        let table = parse_keymap_str(&text).unwrap();
        assert_eq!(table.layer_count(), 8);
        assert_eq!(table.key_layer_count(), 0);
    }

    #[test]
    fn test_unknown_section() {
        let err = parse_keymap_str("[未知のセクション]\nあ\nい\nう\nえ\n").unwrap_err();
        match err {
            ConfigError::UnknownSection { line, label } => {
                assert_eq!(line, 1);
                assert_eq!(label, "未知のセクション");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_fifth_row_is_an_error() {
        let text = format!("{}\nあ\nい\nう\nえ\nお\n", kana_no_shift_header());
        let err = parse_keymap_str(&text).unwrap_err();
        match err {
            ConfigError::TooManyRows { line } => assert_eq!(line, 6),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_comments_and_blanks_skipped() {
        let text = format!(
            "; layout file\n\n{}\n; digit row\nあ,い\nう,え\n\nお,か\nき,く\n",
            kana_no_shift_header()
        );
        let table = parse_keymap_str(&text).unwrap();
        assert_eq!(table.layer_count(), 1);
    }

    #[test]
    fn test_short_trailing_section_dropped() {
        let text = format!("{}\nあ\nい\n", kana_no_shift_header());
        let table = parse_keymap_str(&text).unwrap();
        assert_eq!(table.layer_count(), 0);
    }

    #[test]
    fn test_key_layer_section() {
        let text = "<k>\nら,り\nる,れ\nろ,わ\nを,ん\n";
        let table = parse_keymap_str(text).unwrap();
        assert_eq!(table.key_layer_count(), 1);
        let grid = table.key_layer('k').unwrap();
        assert_eq!(grid.cell(GridPos::new(0, 1)), Some("り"));
    }

    #[test]
    fn test_back_to_back_sections() {
        let text = format!(
            "{}\nあ\nい\nう\nえ\n<d>\nか\nき\nく\nけ\n",
            kana_no_shift_header()
        );
        let table = parse_keymap_str(&text).unwrap();
        assert_eq!(table.layer_count(), 1);
        assert_eq!(table.key_layer_count(), 1);
    }

    #[test]
    fn test_garbage_before_any_section() {
        let err = parse_keymap_str("こんにちは\n").unwrap_err();
        assert!(matches!(err, ConfigError::TooManyRows { line: 1 }));
    }
}
