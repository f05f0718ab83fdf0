// Oyars Modifier Tracking
// Live modifier state and per-keystroke shift-layer resolution

use crate::key::{codes::*, Key};
use crate::mapping::LayerKind;

/// Physical modifier role of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierKey {
    Ctrl,
    LeftShift,
    RightShift,
    /// Muhenkan, the left thumb-shift key
    LeftOya,
    /// Henkan, the right thumb-shift key
    RightOya,
    Alt,
}

impl ModifierKey {
    /// True for the two thumb-shift keys
    pub fn is_oya(self) -> bool {
        matches!(self, ModifierKey::LeftOya | ModifierKey::RightOya)
    }
}

/// Classify a physical key as a modifier, if it is one.
pub fn modifier_key(key: Key) -> Option<ModifierKey> {
    let kind = match key {
        KEY_LEFTCTRL | KEY_RIGHTCTRL => ModifierKey::Ctrl,
        KEY_LEFTSHIFT => ModifierKey::LeftShift,
        KEY_RIGHTSHIFT => ModifierKey::RightShift,
        KEY_MUHENKAN => ModifierKey::LeftOya,
        KEY_HENKAN => ModifierKey::RightOya,
        KEY_LEFTALT | KEY_RIGHTALT => ModifierKey::Alt,
        _ => return None,
    };
    Some(kind)
}

/// Live modifier booleans, mutated only by the physical key events that
/// represent those keys and read on every other key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    pub ctrl: bool,
    pub left_shift: bool,
    pub right_shift: bool,
    pub left_oya: bool,
    pub right_oya: bool,
    pub alt: bool,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a press/release of a modifier key.
    pub fn apply(&mut self, modifier: ModifierKey, pressed: bool) {
        match modifier {
            ModifierKey::Ctrl => self.ctrl = pressed,
            ModifierKey::LeftShift => self.left_shift = pressed,
            ModifierKey::RightShift => self.right_shift = pressed,
            ModifierKey::LeftOya => self.left_oya = pressed,
            ModifierKey::RightOya => self.right_oya = pressed,
            ModifierKey::Alt => self.alt = pressed,
        }
    }

    /// Either character-shift key held
    pub fn shift(&self) -> bool {
        self.left_shift || self.right_shift
    }

    /// Resolve the shift layer for the current modifier state.
    ///
    /// Thumb-shift keys win over the character shift keys; when both thumb
    /// keys are held, the left one wins. Ctrl is not consulted here: the
    /// caller skips remapping entirely while ctrl is held.
    pub fn resolve_layer(&self) -> LayerKind {
        if self.left_oya {
            LayerKind::LeftOyaShift
        } else if self.right_oya {
            LayerKind::RightOyaShift
        } else if self.shift() {
            LayerKind::Shift
        } else {
            LayerKind::NoShift
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_key_classification() {
        assert_eq!(modifier_key(KEY_LEFTCTRL), Some(ModifierKey::Ctrl));
        assert_eq!(modifier_key(KEY_RIGHTCTRL), Some(ModifierKey::Ctrl));
        assert_eq!(modifier_key(KEY_MUHENKAN), Some(ModifierKey::LeftOya));
        assert_eq!(modifier_key(KEY_HENKAN), Some(ModifierKey::RightOya));
        assert_eq!(modifier_key(KEY_A), None);
    }

    #[test]
    fn test_apply_and_release() {
        let mut state = ModifierState::new();
        state.apply(ModifierKey::LeftShift, true);
        assert!(state.shift());
        state.apply(ModifierKey::LeftShift, false);
        assert!(!state.shift());
    }

    #[test]
    fn test_layer_no_shift() {
        let state = ModifierState::new();
        assert_eq!(state.resolve_layer(), LayerKind::NoShift);
    }

    #[test]
    fn test_layer_shift() {
        let mut state = ModifierState::new();
        state.apply(ModifierKey::RightShift, true);
        assert_eq!(state.resolve_layer(), LayerKind::Shift);
    }

    #[test]
    fn test_oya_beats_shift() {
        let mut state = ModifierState::new();
        state.apply(ModifierKey::LeftShift, true);
        state.apply(ModifierKey::RightOya, true);
        assert_eq!(state.resolve_layer(), LayerKind::RightOyaShift);
    }

    #[test]
    fn test_both_oya_resolves_left() {
        let mut state = ModifierState::new();
        state.apply(ModifierKey::LeftOya, true);
        state.apply(ModifierKey::RightOya, true);
        assert_eq!(state.resolve_layer(), LayerKind::LeftOyaShift);
    }
}
