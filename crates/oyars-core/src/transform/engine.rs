// Oyars Remap Engine
// Per-event decision pipeline: modifiers, hotkeys, holding, translation

use std::time::{Duration, Instant};

use super::translate::{translate, OutputEvents};
use crate::holding::{HoldingState, PressOutcome, ReleaseOutcome, DEFAULT_HOLDING_WINDOW_MS};
use crate::input::event::{RawEvent, KEY_PRESS, KEY_RELEASE, KEY_REPEAT};
use crate::key::{codes::*, Key};
use crate::mapping::{InputMode, KeymapTable};
use crate::modifier::{modifier_key, ModifierState};
use crate::output::PressedKeyState;
use crate::symbol;

/// Decision for one input event.
#[derive(Debug, Default)]
pub struct EngineOutput {
    /// Synthetic records to emit, in order
    pub events: OutputEvents,
    /// Forward the input event unchanged (after `events`)
    pub forward: bool,
    /// The shutdown chord fired
    pub shutdown: bool,
}

/// The event translation engine.
///
/// Owns every piece of remapping state: the immutable keymap, live
/// modifier booleans, the holding disambiguator and the set of presses
/// whose releases must be swallowed. Strictly single-threaded; the
/// ingestion queue upstream guarantees one event at a time.
pub struct RemapEngine {
    table: KeymapTable,
    modifiers: ModifierState,
    holding: HoldingState,
    consumed: PressedKeyState,
    mode: InputMode,
    window: Duration,
}

impl RemapEngine {
    pub fn new(table: KeymapTable) -> Self {
        Self {
            table,
            modifiers: ModifierState::new(),
            holding: HoldingState::new(),
            consumed: PressedKeyState::new(),
            mode: InputMode::Eisu,
            window: Duration::from_millis(DEFAULT_HOLDING_WINDOW_MS),
        }
    }

    /// Override the holding disambiguation window.
    pub fn set_holding_window(&mut self, window: Duration) {
        self.window = window;
    }

    /// Current input mode
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Force the input mode (also resets any pending hold)
    pub fn set_mode(&mut self, mode: InputMode) {
        self.holding.reset();
        self.mode = mode;
    }

    /// Current modifier state snapshot
    pub fn modifiers(&self) -> &ModifierState {
        &self.modifiers
    }

    /// Process one input event.
    ///
    /// `now` is the arrival time; holding-window expiry is evaluated here
    /// and nowhere else, so a pending hold resolves no earlier than the
    /// next event.
    pub fn process_event(&mut self, event: RawEvent, now: Instant) -> EngineOutput {
        let mut out = EngineOutput::default();

        if !event.is_key() {
            out.forward = true;
            return out;
        }

        let key = Key::from(event.code);

        // lazy expiry of a hold whose release was deferred
        if self.mode == InputMode::Kana {
            if let Some(tap) = self.holding.take_expired(now, self.window) {
                self.emit_tap(tap, &mut out);
            }
        }

        if let Some(modifier) = modifier_key(key) {
            self.modifiers.apply(modifier, event.value != KEY_RELEASE);
            if modifier.is_oya() && self.mode == InputMode::Kana {
                // thumb keys are pure layer selectors while remapping
                return out;
            }
            out.forward = true;
            return out;
        }

        // fixed chords, checked before ordinary translation
        if event.value == KEY_PRESS {
            if self.is_shutdown_chord(key) {
                out.shutdown = true;
                return out;
            }
            if self.is_toggle_chord(key) {
                if let Some(tap) = self.holding.flush_pending_tap() {
                    self.emit_tap(tap, &mut out);
                }
                self.holding.reset();
                self.mode = self.mode.toggled();
                log::info!("input mode switched to {}", self.mode);
                return out;
            }
        }

        // no remapping of any kind while ctrl is held
        if self.modifiers.ctrl {
            out.forward = true;
            return out;
        }

        match self.mode {
            InputMode::Eisu => self.process_eisu(key, event.value, &mut out),
            InputMode::Kana => self.process_kana(key, event.value, now, &mut out),
        }

        out
    }

    fn is_shutdown_chord(&self, key: Key) -> bool {
        key == KEY_C && self.modifiers.ctrl && self.modifiers.alt && self.modifiers.shift()
    }

    fn is_toggle_chord(&self, key: Key) -> bool {
        (key == KEY_SPACE && self.modifiers.ctrl)
            || (key == KEY_M && self.modifiers.ctrl && self.modifiers.alt && self.modifiers.shift())
    }

    fn process_eisu(&mut self, key: Key, value: i32, out: &mut EngineOutput) {
        match translate(&self.table, &self.modifiers, self.mode, key, value, None) {
            Some(events) => out.events.extend(events),
            None => out.forward = true,
        }
    }

    fn process_kana(&mut self, key: Key, value: i32, now: Instant, out: &mut EngineOutput) {
        match value {
            KEY_PRESS => self.process_kana_press(key, now, out),
            KEY_RELEASE => match self.holding.on_release(key, now, self.window) {
                ReleaseOutcome::Deferred => {}
                ReleaseOutcome::Ended { tap } => {
                    if let Some(tap) = tap {
                        self.emit_tap(tap, out);
                    }
                }
                ReleaseOutcome::NotHeld => {
                    if !self.consumed.remove(key) {
                        out.forward = true;
                    }
                }
            },
            KEY_REPEAT => {
                // repeats of remapped keys are meaningless downstream
                let involved = self.holding.held_key() == Some(key)
                    || self.consumed.is_pressed(key)
                    || symbol::grid_position(key).is_some();
                if !involved {
                    out.forward = true;
                }
            }
            _ => out.forward = true,
        }
    }

    fn process_kana_press(&mut self, key: Key, now: Instant, out: &mut EngineOutput) {
        if symbol::grid_position(key).is_none() {
            // a pending unresolved hold can no longer combine; flush it
            // first so output preserves input order
            if let Some(tap) = self.holding.flush_pending_tap() {
                self.emit_tap(tap, out);
            }
            out.forward = true;
            return;
        }

        match self.holding.on_grid_press(key, now, self.window) {
            PressOutcome::Held => {}
            PressOutcome::Combo { layer_key } => {
                match translate(
                    &self.table,
                    &self.modifiers,
                    self.mode,
                    key,
                    KEY_PRESS,
                    Some(layer_key),
                ) {
                    Some(events) => {
                        out.events.extend(events);
                        self.consumed.add(key);
                    }
                    None => out.forward = true,
                }
            }
            PressOutcome::TapThenHold { tap } => {
                if let Some(tap) = tap {
                    self.emit_tap(tap, out);
                }
            }
        }
    }

    /// Flush a resolved hold as an ordinary tap: a synthesized
    /// press+release, decoupled from the physical key-up timing.
    fn emit_tap(&mut self, key: Key, out: &mut EngineOutput) {
        match translate(&self.table, &self.modifiers, self.mode, key, KEY_PRESS, None) {
            Some(events) => out.events.extend(events),
            None => {
                out.events.extend([
                    RawEvent::key(key.code(), KEY_PRESS),
                    RawEvent::syn(),
                    RawEvent::key(key.code(), KEY_RELEASE),
                    RawEvent::syn(),
                ]);
            }
        }
    }
}
