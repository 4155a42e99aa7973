//! KeystrokeEncoder: turns a [`Keybind`] into an ordered burst of posted
//! keyboard messages.
//!
//! # Ordering
//!
//! ```text
//! press:   [Alt↓] ~ [Ctrl↓] ~ [Shift↓] ~ Key↓
//! release: Key↑ ~ [Alt↑] ~ [Ctrl↑] ~ [Shift↑]
//! ```
//!
//! `~` is [`MODIFIER_DELAY`].  The game samples input on its own tick and
//! drops a modifier that arrives in the same instant as the main key, so each
//! modifier edge gets a short pause next to it.  Alt travels as a system key
//! message (`WM_SYSKEYDOWN`/`WM_SYSKEYUP`), the rest as plain key messages.
//!
//! The encoder depends only on two traits, [`KeystrokeSink`] for delivery and
//! [`KeyboardLayout`] for scan code translation, so it is fully unit-testable.

use std::sync::Arc;
use std::time::Duration;

use mouselook_core::keymap::virtual_keys::{VK_CONTROL, VK_MENU, VK_SHIFT};
use mouselook_core::{
    Keybind, KeyboardLayout, KeyMessageKind, KeystrokeParams, Modifiers, WindowHandle,
};
use thiserror::Error;
use tracing::debug;

/// Pause around each modifier edge.
pub const MODIFIER_DELAY: Duration = Duration::from_millis(5);

/// Alt → Ctrl → Shift, with the virtual key and whether it is a system key.
const MODIFIER_ORDER: [(u8, u32, bool); 3] = [
    (Modifiers::ALT, VK_MENU, true),
    (Modifiers::CTRL, VK_CONTROL, false),
    (Modifiers::SHIFT, VK_SHIFT, false),
];

/// Error type for message delivery.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("platform error: {0}")]
    Platform(String),
}

/// One keyboard message ready to be posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostedKey {
    pub kind: KeyMessageKind,
    pub virtual_key: u32,
    /// Packed keystroke parameter block.
    pub params: u32,
}

/// Delivery of synthesized messages to the game window.
///
/// The Windows implementation posts with `PostMessageW` and sleeps; the test
/// implementation records both.
pub trait KeystrokeSink: Send + Sync {
    /// Posts one message to the window's queue.
    fn post(&self, window: WindowHandle, key: PostedKey) -> Result<(), EmitError>;

    /// Blocks for `delay` so the game can observe the previous message.
    fn settle(&self, delay: Duration);
}

/// Builds and posts press/release sequences.
pub struct KeystrokeEncoder {
    sink: Arc<dyn KeystrokeSink>,
    layout: Arc<dyn KeyboardLayout>,
    modifier_delay: Duration,
}

impl KeystrokeEncoder {
    pub fn new(sink: Arc<dyn KeystrokeSink>, layout: Arc<dyn KeyboardLayout>) -> Self {
        Self {
            sink,
            layout,
            modifier_delay: MODIFIER_DELAY,
        }
    }

    /// Emits the key-down sequence for `chord`.
    ///
    /// Returns `Ok(false)` without posting anything if the chord is unbound.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError`] if posting a message fails; messages already
    /// posted are not rolled back.
    pub fn press(&self, window: WindowHandle, chord: &Keybind) -> Result<bool, EmitError> {
        if !chord.is_bound() {
            return Ok(false);
        }
        let modifiers = chord.modifiers();
        for (flag, virtual_key, system) in MODIFIER_ORDER {
            if modifiers.0 & flag != 0 {
                self.post_modifier(window, virtual_key, system, false)?;
                self.sink.settle(self.modifier_delay);
            }
        }
        self.post_primary(window, chord.key, false)?;
        debug!(key = chord.key, ?modifiers, "pressed keybind");
        Ok(true)
    }

    /// Emits the key-up sequence for `chord`.
    ///
    /// Returns `Ok(false)` without posting anything if the chord is unbound.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError`] if posting a message fails.
    pub fn release(&self, window: WindowHandle, chord: &Keybind) -> Result<bool, EmitError> {
        if !chord.is_bound() {
            return Ok(false);
        }
        self.post_primary(window, chord.key, true)?;
        let modifiers = chord.modifiers();
        for (flag, virtual_key, system) in MODIFIER_ORDER {
            if modifiers.0 & flag != 0 {
                self.sink.settle(self.modifier_delay);
                self.post_modifier(window, virtual_key, system, true)?;
            }
        }
        debug!(key = chord.key, ?modifiers, "released keybind");
        Ok(true)
    }

    fn post_primary(&self, window: WindowHandle, scan_code: u16, key_up: bool) -> Result<(), EmitError> {
        self.sink.post(
            window,
            PostedKey {
                kind: KeyMessageKind::for_keystroke(key_up, false),
                virtual_key: self.layout.scan_to_virtual_key(scan_code),
                params: KeystrokeParams::for_keystroke(scan_code, key_up).pack(),
            },
        )
    }

    fn post_modifier(
        &self,
        window: WindowHandle,
        virtual_key: u32,
        system: bool,
        key_up: bool,
    ) -> Result<(), EmitError> {
        let scan_code = self.layout.virtual_key_to_scan(virtual_key);
        self.sink.post(
            window,
            PostedKey {
                kind: KeyMessageKind::for_keystroke(key_up, system),
                virtual_key,
                params: KeystrokeParams::for_keystroke(scan_code, key_up).pack(),
            },
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
