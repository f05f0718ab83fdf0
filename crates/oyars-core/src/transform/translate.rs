// Oyars Event Translation
// Expands one keymap cell into synthetic output event records

use smallvec::SmallVec;

use crate::input::event::{RawEvent, KEY_PRESS, KEY_RELEASE};
use crate::key::{codes::KEY_LEFTSHIFT, Key};
use crate::mapping::{is_no_output_cell, InputMode, KeymapTable, NO_OUTPUT_GLYPH};
use crate::modifier::ModifierState;
use crate::symbol::{self, KeyStroke};
use crate::width;

/// Synthetic event records produced for one input event.
pub type OutputEvents = SmallVec<[RawEvent; 8]>;

/// Translate a key event against the keymap.
///
/// Returns `None` when the event is not handled and must be forwarded
/// unchanged: ctrl held, key outside the remap block, or no usable cell.
/// An empty (but `Some`) result means the event was consumed without
/// producing output (a no-output cell).
///
/// `override_key` carries the held key of an in-flight chord; in Kana mode
/// it first selects the per-key layer named by either chord member before
/// the ordinary modifier-derived layer applies.
pub fn translate(
    table: &KeymapTable,
    mods: &ModifierState,
    mode: InputMode,
    key: Key,
    value: i32,
    override_key: Option<Key>,
) -> Option<OutputEvents> {
    if mods.ctrl {
        return None;
    }
    symbol::grid_position(key)?;

    let cell = match (mode, override_key) {
        (InputMode::Kana, Some(layer_key)) => combo_cell(table, layer_key, key)
            .or_else(|| fixed_cell(table, mods, mode, key)),
        _ => fixed_cell(table, mods, mode, key),
    }?;

    expand_cell(cell, mode, value)
}

/// Ordinary lookup: the modifier-derived layer, at the key's own position.
fn fixed_cell<'a>(
    table: &'a KeymapTable,
    mods: &ModifierState,
    mode: InputMode,
    key: Key,
) -> Option<&'a str> {
    let layer = table.layer(mode, mods.resolve_layer())?;
    layer.cell(symbol::grid_position(key)?)
}

/// Two-key combination lookup.
///
/// Tries the layer named by the held key at the pressed key's position,
/// then the reverse assignment, so chord order does not matter. A missing
/// or no-output cell falls through.
fn combo_cell<'a>(table: &'a KeymapTable, held: Key, pressed: Key) -> Option<&'a str> {
    key_layer_cell(table, held, pressed).or_else(|| key_layer_cell(table, pressed, held))
}

fn key_layer_cell<'a>(table: &'a KeymapTable, layer_key: Key, pos_key: Key) -> Option<&'a str> {
    let label = symbol::key_label(layer_key)?;
    let grid = table.key_layer(label)?;
    grid.cell(symbol::grid_position(pos_key)?)
        .filter(|cell| !is_no_output_cell(cell))
}

/// Expand every glyph of a cell into key events.
///
/// Returns `None` when not a single glyph could be acted on; unmappable
/// glyphs inside an otherwise usable cell are skipped silently.
fn expand_cell(cell: &str, mode: InputMode, value: i32) -> Option<OutputEvents> {
    let mut events = OutputEvents::new();
    let mut handled = false;

    for glyph in cell.chars() {
        if glyph == NO_OUTPUT_GLYPH {
            handled = true;
            continue;
        }

        if let Some(stroke) = symbol::char_keystroke(glyph) {
            emit_stroke(&mut events, stroke, mode, value);
            handled = true;
            continue;
        }

        if let Some(romaji) = width::kana_to_romaji(glyph) {
            for c in romaji.chars() {
                if let Some(stroke) = symbol::char_keystroke(c) {
                    emit_stroke(&mut events, stroke, mode, value);
                    handled = true;
                }
            }
            continue;
        }

        let folded = width::to_halfwidth(glyph);
        if let Some(stroke) = symbol::char_keystroke(folded) {
            emit_stroke(&mut events, stroke, mode, value);
            handled = true;
        }
    }

    handled.then_some(events)
}

fn emit_stroke(events: &mut OutputEvents, stroke: KeyStroke, mode: InputMode, value: i32) {
    match mode {
        InputMode::Kana => {
            // output key-up timing is decoupled from the physical key:
            // every resolved key is a clean press+release pair
            if stroke.shift {
                push_shift(events, KEY_PRESS);
            }
            events.push(RawEvent::key(stroke.key.code(), KEY_PRESS));
            events.push(RawEvent::syn());
            events.push(RawEvent::key(stroke.key.code(), KEY_RELEASE));
            events.push(RawEvent::syn());
            if stroke.shift {
                push_shift(events, KEY_RELEASE);
            }
        }
        InputMode::Eisu => {
            // physical value passes through with the code substituted
            let wrap = stroke.shift && value == KEY_PRESS;
            if wrap {
                push_shift(events, KEY_PRESS);
            }
            events.push(RawEvent::key(stroke.key.code(), value));
            events.push(RawEvent::syn());
            if wrap {
                push_shift(events, KEY_RELEASE);
            }
        }
    }
}

fn push_shift(events: &mut OutputEvents, value: i32) {
    events.push(RawEvent::key(KEY_LEFTSHIFT.code(), value));
    events.push(RawEvent::syn());
    events.push(RawEvent::scan_marker());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_keymap_str;
    use crate::input::event::EV_KEY;
    use crate::key::codes::*;

    fn kana_table(rows: &str) -> KeymapTable {
        parse_keymap_str(&format!("[ローマ字シフト無し]\n{}\n", rows)).unwrap()
    }

    fn pressed_codes(events: &OutputEvents) -> Vec<(u16, i32)> {
        events
            .iter()
            .filter(|e| e.event_type == EV_KEY)
            .map(|e| (e.code, e.value))
            .collect()
    }

    #[test]
    fn test_kana_single_vowel() {
        // あ in the Q position
        let table = kana_table("ー\nあ\nー\nー");
        let mods = ModifierState::new();
        let events = translate(&table, &mods, InputMode::Kana, KEY_Q, KEY_PRESS, None).unwrap();
        assert_eq!(
            pressed_codes(&events),
            vec![(KEY_A.code(), 1), (KEY_A.code(), 0)]
        );
    }

    #[test]
    fn test_kana_two_stroke_expansion() {
        // き expands to the k,i romaji pair
        let table = kana_table("ー\nき\nー\nー");
        let mods = ModifierState::new();
        let events = translate(&table, &mods, InputMode::Kana, KEY_Q, KEY_PRESS, None).unwrap();
        assert_eq!(
            pressed_codes(&events),
            vec![
                (KEY_K.code(), 1),
                (KEY_K.code(), 0),
                (KEY_I.code(), 1),
                (KEY_I.code(), 0)
            ]
        );
    }

    #[test]
    fn test_fullwidth_latin_shift_wrap() {
        let table = kana_table("ー\nＡ\nー\nー");
        let mods = ModifierState::new();
        let events = translate(&table, &mods, InputMode::Kana, KEY_Q, KEY_PRESS, None).unwrap();
        assert_eq!(
            pressed_codes(&events),
            vec![
                (KEY_LEFTSHIFT.code(), 1),
                (KEY_A.code(), 1),
                (KEY_A.code(), 0),
                (KEY_LEFTSHIFT.code(), 0)
            ]
        );
        // shift press and release both carry a scan marker
        let markers = events
            .iter()
            .filter(|e| *e == &RawEvent::scan_marker())
            .count();
        assert_eq!(markers, 2);
    }

    #[test]
    fn test_no_output_cell_is_handled_silently() {
        let table = kana_table("ー\n無\nー\nー");
        let mods = ModifierState::new();
        let events = translate(&table, &mods, InputMode::Kana, KEY_Q, KEY_PRESS, None).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_ctrl_short_circuits() {
        let table = kana_table("ー\nあ\nー\nー");
        let mut mods = ModifierState::new();
        mods.ctrl = true;
        assert!(translate(&table, &mods, InputMode::Kana, KEY_Q, KEY_PRESS, None).is_none());
    }

    #[test]
    fn test_unmapped_position_is_not_handled() {
        let table = kana_table("ー\nあ\nー\nー");
        let mods = ModifierState::new();
        // W is at (1, 1), beyond the single-cell row
        assert!(translate(&table, &mods, InputMode::Kana, KEY_W, KEY_PRESS, None).is_none());
        // ENTER has no grid position at all
        assert!(translate(&table, &mods, InputMode::Kana, KEY_ENTER, KEY_PRESS, None).is_none());
    }

    #[test]
    fn test_command_glyph() {
        let table = kana_table("ー\n後\nー\nー");
        let mods = ModifierState::new();
        let events = translate(&table, &mods, InputMode::Kana, KEY_Q, KEY_PRESS, None).unwrap();
        assert_eq!(
            pressed_codes(&events),
            vec![(KEY_BACKSPACE.code(), 1), (KEY_BACKSPACE.code(), 0)]
        );
    }

    #[test]
    fn test_eisu_forwards_value() {
        let table = parse_keymap_str("[英数シフト無し]\nー\nｂ\nー\nー\n").unwrap();
        let mods = ModifierState::new();
        let press = translate(&table, &mods, InputMode::Eisu, KEY_Q, KEY_PRESS, None).unwrap();
        assert_eq!(pressed_codes(&press), vec![(KEY_B.code(), 1)]);
        let release = translate(&table, &mods, InputMode::Eisu, KEY_Q, KEY_RELEASE, None).unwrap();
        assert_eq!(pressed_codes(&release), vec![(KEY_B.code(), 0)]);
    }

    #[test]
    fn test_combo_layer_lookup_both_directions() {
        // <f> layer defines き at the D position only; the chord works
        // with either member held
        let text = "<f>\nー\nー\nー,ー,き\nー\n";
        let table = parse_keymap_str(text).unwrap();
        let mods = ModifierState::new();

        let forward = translate(&table, &mods, InputMode::Kana, KEY_D, KEY_PRESS, Some(KEY_F));
        assert!(forward.is_some());

        let reverse = translate(&table, &mods, InputMode::Kana, KEY_F, KEY_PRESS, Some(KEY_D));
        assert!(reverse.is_some());
        assert_eq!(
            pressed_codes(&forward.unwrap()),
            pressed_codes(&reverse.unwrap())
        );
    }

    #[test]
    fn test_combo_falls_back_to_fixed_layer() {
        // no <x> layers at all: the override falls back to the plain layer
        let table = kana_table("ー\nあ\nー\nー");
        let mods = ModifierState::new();
        let events =
            translate(&table, &mods, InputMode::Kana, KEY_Q, KEY_PRESS, Some(KEY_K)).unwrap();
        assert_eq!(
            pressed_codes(&events),
            vec![(KEY_A.code(), 1), (KEY_A.code(), 0)]
        );
    }

    #[test]
    fn test_combo_skips_no_output_cell_in_key_layer() {
        // <f> holds 無 at the D position; the chord falls through to the
        // fixed layer, which maps D to そ
        let text = "<f>\nー\nー\nー,ー,無\nー\n[ローマ字シフト無し]\nー\nー\nー,ー,そ\nー\n";
        let table = parse_keymap_str(text).unwrap();
        let mods = ModifierState::new();
        let events =
            translate(&table, &mods, InputMode::Kana, KEY_D, KEY_PRESS, Some(KEY_F)).unwrap();
        assert_eq!(
            pressed_codes(&events),
            vec![
                (KEY_S.code(), 1),
                (KEY_S.code(), 0),
                (KEY_O.code(), 1),
                (KEY_O.code(), 0)
            ]
        );
    }

    #[test]
    fn test_shift_layer_selected_by_modifier() {
        let text = "[ローマ字シフト無し]\nー\nあ\nー\nー\n[ローマ字小指シフト]\nー\nい\nー\nー\n";
        let table = parse_keymap_str(text).unwrap();
        let mut mods = ModifierState::new();
        mods.left_shift = true;
        let events = translate(&table, &mods, InputMode::Kana, KEY_Q, KEY_PRESS, None).unwrap();
        assert_eq!(
            pressed_codes(&events),
            vec![(KEY_I.code(), 1), (KEY_I.code(), 0)]
        );
    }
}
