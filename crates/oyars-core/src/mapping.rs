// Oyars Keymap Model
// Layered keymap tables selected by input mode and shift layer

use std::collections::HashMap;

use strum_macros::Display;

/// Number of keyboard rows a layer covers: digit row, top letter row,
/// home row, bottom row.
pub const LAYER_ROWS: usize = 4;

/// Glyph that is consumed without producing any output event.
pub const NO_OUTPUT_GLYPH: char = '無';

/// Top-level input mode, toggled at runtime by hotkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum InputMode {
    /// Kana remapping active; cells produce kana via romaji keystrokes
    Kana,
    /// Alphanumeric layout; cells substitute key codes, values pass through
    Eisu,
}

impl InputMode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            InputMode::Kana => InputMode::Eisu,
            InputMode::Eisu => InputMode::Kana,
        }
    }
}

/// Shift layer of a keymap, derived from live modifier state per keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum LayerKind {
    NoShift,
    Shift,
    LeftOyaShift,
    RightOyaShift,
}

/// Address of a physical key within the 4-row remap-eligible block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// One layer of the keymap: 4 rows of cells.
///
/// A cell holds zero or more output glyphs; rows may be shorter than the
/// physical keyboard row, in which case the missing columns simply have no
/// remapping.
#[derive(Debug, Clone, Default)]
pub struct LayerGrid {
    rows: [Vec<String>; LAYER_ROWS],
}

impl LayerGrid {
    pub fn new(rows: [Vec<String>; LAYER_ROWS]) -> Self {
        Self { rows }
    }

    /// Look up the cell at a grid position.
    ///
    /// Returns `None` when the column is beyond the row's width or the
    /// cell is empty, both meaning "no remapping".
    pub fn cell(&self, pos: GridPos) -> Option<&str> {
        self.rows
            .get(pos.row)
            .and_then(|row| row.get(pos.col))
            .map(String::as_str)
            .filter(|cell| !cell.is_empty())
    }

    /// Row accessor for diagnostics and tests
    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }
}

/// True when a cell consists only of the no-output glyph.
pub fn is_no_output_cell(cell: &str) -> bool {
    !cell.is_empty() && cell.chars().all(|c| c == NO_OUTPUT_GLYPH)
}

/// The complete layered keymap built from the configuration file.
///
/// Holds the eight fixed (mode, layer) sections plus any number of
/// per-key layers (`<X>` sections) used for two-key combination lookups.
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct KeymapTable {
    layers: HashMap<(InputMode, LayerKind), LayerGrid>,
    key_layers: HashMap<char, LayerGrid>,
}

impl KeymapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed-layer lookup
    pub fn layer(&self, mode: InputMode, kind: LayerKind) -> Option<&LayerGrid> {
        self.layers.get(&(mode, kind))
    }

    /// Per-key layer lookup, keyed by the key's unshifted label character
    pub fn key_layer(&self, label: char) -> Option<&LayerGrid> {
        self.key_layers.get(&label)
    }

    pub fn insert_layer(&mut self, mode: InputMode, kind: LayerKind, grid: LayerGrid) {
        self.layers.insert((mode, kind), grid);
    }

    pub fn insert_key_layer(&mut self, label: char, grid: LayerGrid) {
        self.key_layers.insert(label, grid);
    }

    /// Number of fixed (mode, layer) sections loaded
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Number of per-key layer sections loaded
    pub fn key_layer_count(&self) -> usize {
        self.key_layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.key_layers.is_empty()
    }
}
