//! Keybind capture sessions.
//!
//! ```text
//! Idle ──begin(slot)──▶ Capturing { slot, preview }
//!                            │  key-down → preview = chord
//!                            ▼
//!         Accept / Unbind / Cancel ──▶ Idle
//! ```
//!
//! The session remembers the [`KeybindSlot`] it was opened for, so resolving
//! it writes straight into that field of [`Settings`].

use mouselook_core::{Keybind, KeybindSlot, Settings};

/// How the user closed the capture popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Store the previewed chord.
    Accept,
    /// Clear the slot.
    Unbind,
    /// Leave the slot unchanged.
    Cancel,
}

/// An open capture for one keybind slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSession {
    slot: KeybindSlot,
    preview: Option<Keybind>,
}

impl CaptureSession {
    pub fn new(slot: KeybindSlot) -> Self {
        Self {
            slot,
            preview: None,
        }
    }

    pub fn slot(&self) -> KeybindSlot {
        self.slot
    }

    /// The most recent chord pressed since the session opened.
    pub fn preview(&self) -> Option<Keybind> {
        self.preview
    }

    pub fn record(&mut self, chord: Keybind) {
        self.preview = Some(chord);
    }

    /// Applies `outcome` to `settings` and reports whether the slot changed.
    ///
    /// Accepting with nothing captured leaves the slot as it was.
    pub fn resolve(self, outcome: CaptureOutcome, settings: &mut Settings) -> bool {
        let value = match (outcome, self.preview) {
            (CaptureOutcome::Accept, Some(chord)) => chord,
            (CaptureOutcome::Unbind, _) => Keybind::UNBOUND,
            (CaptureOutcome::Accept, None) | (CaptureOutcome::Cancel, _) => return false,
        };
        let slot = self.slot.get_mut(settings);
        let changed = *slot != value;
        *slot = value;
        changed
    }
}
