// Oyars Holding Disambiguator
// Time-windowed tap-vs-chord resolution for simultaneous key input

use std::time::{Duration, Instant};

use crate::key::Key;

/// Default disambiguation window.
pub const DEFAULT_HOLDING_WINDOW_MS: u64 = 140;

/// An in-flight ambiguous keypress: the key may turn out to be a transient
/// layer selector for a second key, or an ordinary tap of itself.
///
/// At most one hold exists at a time; the machine models two-key chords
/// only. Expiry is evaluated lazily when the next event arrives, never by
/// a background timer.
#[derive(Debug, Clone)]
struct Hold {
    key: Key,
    started_at: Instant,
    /// Set when the held key's own release arrived inside the window;
    /// resolution is deferred until the window runs out.
    ending_at: Option<Instant>,
    /// The held key was consumed as a layer selector for at least one
    /// other key; it must not produce a tap of its own.
    combo_resolved: bool,
}

impl Hold {
    fn new(key: Key, now: Instant) -> Self {
        Self {
            key,
            started_at: now,
            ending_at: None,
            combo_resolved: false,
        }
    }

    fn expired(&self, now: Instant, window: Duration) -> bool {
        now.duration_since(self.started_at) > window
    }

    fn pending_tap(&self) -> Option<Key> {
        (!self.combo_resolved).then_some(self.key)
    }
}

/// Outcome of feeding a grid-key press into the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// The key became (or stays) the held key; the press is buffered.
    Held,
    /// A chord: translate the pressed key using `layer_key` as the
    /// overriding layer selector.
    Combo { layer_key: Key },
    /// The previous hold could no longer combine; `tap` (if any) must be
    /// flushed as an ordinary tap, and the pressed key is now held.
    TapThenHold { tap: Option<Key> },
}

/// Outcome of feeding a key release into the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Not the held key; the caller decides what to do with the release.
    NotHeld,
    /// Release arrived inside the window; the hold stays pending.
    Deferred,
    /// The hold is over; `tap` (if any) must be flushed as an ordinary tap.
    Ended { tap: Option<Key> },
}

/// The holding state machine.
#[derive(Debug, Default)]
pub struct HoldingState {
    hold: Option<Hold>,
}

impl HoldingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently held key, if any.
    pub fn held_key(&self) -> Option<Key> {
        self.hold.as_ref().map(|h| h.key)
    }

    /// True when a combo has already formed on the current hold.
    pub fn combo_resolved(&self) -> bool {
        self.hold.as_ref().is_some_and(|h| h.combo_resolved)
    }

    /// Lazy expiry check, run when any event arrives.
    ///
    /// A hold whose release was deferred resolves here once the window has
    /// run out; the returned key (if any) must be flushed as a tap.
    pub fn take_expired(&mut self, now: Instant, window: Duration) -> Option<Key> {
        let resolved = self
            .hold
            .as_ref()
            .is_some_and(|h| h.ending_at.is_some() && h.expired(now, window));
        if !resolved {
            return None;
        }
        self.hold.take().expect("checked above").pending_tap()
    }

    /// Feed a press of a remap-eligible key.
    pub fn on_grid_press(&mut self, key: Key, now: Instant, window: Duration) -> PressOutcome {
        let Some(hold) = self.hold.as_mut() else {
            self.hold = Some(Hold::new(key, now));
            return PressOutcome::Held;
        };

        if hold.key == key {
            if hold.ending_at.is_some() {
                // released earlier, pressed again: the first press was a tap
                let tap = hold.pending_tap();
                *hold = Hold::new(key, now);
                return PressOutcome::TapThenHold { tap };
            }
            // duplicate press without release; keep holding
            return PressOutcome::Held;
        }

        if hold.combo_resolved {
            // the held key keeps selecting the layer until it is released
            return PressOutcome::Combo { layer_key: hold.key };
        }

        if !hold.expired(now, window) {
            hold.combo_resolved = true;
            return PressOutcome::Combo { layer_key: hold.key };
        }

        // window ran out with no combo: tap the old key, hold the new one
        let tap = Some(hold.key);
        *hold = Hold::new(key, now);
        PressOutcome::TapThenHold { tap }
    }

    /// Feed a key release.
    pub fn on_release(&mut self, key: Key, now: Instant, window: Duration) -> ReleaseOutcome {
        let Some(hold) = self.hold.as_mut() else {
            return ReleaseOutcome::NotHeld;
        };
        if hold.key != key {
            return ReleaseOutcome::NotHeld;
        }

        if hold.expired(now, window) {
            let tap = self.hold.take().expect("checked above").pending_tap();
            return ReleaseOutcome::Ended { tap };
        }

        hold.ending_at = Some(now);
        ReleaseOutcome::Deferred
    }

    /// Give up on an unresolved hold, returning the key that still needs
    /// an ordinary tap. A combo-resolved hold is left in place: the held
    /// key keeps acting as a layer selector until it is released.
    pub fn flush_pending_tap(&mut self) -> Option<Key> {
        if self.hold.as_ref().is_some_and(|h| !h.combo_resolved) {
            return self.hold.take().map(|h| h.key);
        }
        None
    }

    /// Drop any hold without flushing.
    pub fn reset(&mut self) {
        self.hold = None;
    }
}
