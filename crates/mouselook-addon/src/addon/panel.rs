//! Operations behind the settings panel.
//!
//! The widgets are drawn by the host's UI; they call into these methods.
//! Every change is persisted before the method returns.

use mouselook_core::{Keybind, KeybindSlot, Settings};
use tracing::info;

use super::Addon;
use crate::application::capture::CaptureOutcome;
use crate::infrastructure::storage::settings::ConfigError;

/// The boolean options of [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    ResetCursorToCenter,
    EnableWhileMoving,
    EnableInCombat,
    EnableOnMount,
    RedirectLeftClick,
    RedirectRightClick,
}

impl Toggle {
    pub fn get(self, settings: &Settings) -> bool {
        match self {
            Toggle::ResetCursorToCenter => settings.reset_cursor_to_center,
            Toggle::EnableWhileMoving => settings.enable_while_moving,
            Toggle::EnableInCombat => settings.enable_in_combat,
            Toggle::EnableOnMount => settings.enable_on_mount,
            Toggle::RedirectLeftClick => settings.redirect_left_click,
            Toggle::RedirectRightClick => settings.redirect_right_click,
        }
    }

    fn get_mut(self, settings: &mut Settings) -> &mut bool {
        match self {
            Toggle::ResetCursorToCenter => &mut settings.reset_cursor_to_center,
            Toggle::EnableWhileMoving => &mut settings.enable_while_moving,
            Toggle::EnableInCombat => &mut settings.enable_in_combat,
            Toggle::EnableOnMount => &mut settings.enable_on_mount,
            Toggle::RedirectLeftClick => &mut settings.redirect_left_click,
            Toggle::RedirectRightClick => &mut settings.redirect_right_click,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Toggle::ResetCursorToCenter => "Reset cursor to center",
            Toggle::EnableWhileMoving => "Enable while moving",
            Toggle::EnableInCombat => "Enable during combat",
            Toggle::EnableOnMount => "Enable on mount",
            Toggle::RedirectLeftClick => "Redirect left click",
            Toggle::RedirectRightClick => "Redirect right click",
        }
    }
}

impl Addon {
    /// Current settings, copied.
    pub fn settings(&self) -> Settings {
        self.settings.snapshot()
    }

    /// Display text for the keybind stored in `slot`.
    pub fn keybind_label(&self, slot: KeybindSlot) -> String {
        self.formatter.render(&slot.get(&self.settings.snapshot()), true)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] if the settings file cannot be written.
    pub fn set_toggle(&self, toggle: Toggle, value: bool) -> Result<(), ConfigError> {
        self.settings.update(|s| *toggle.get_mut(s) = value)?;
        info!(option = toggle.label(), value, "option changed");
        Ok(())
    }

    // ── Keybind capture ──────────────────────────────────────────────────────

    /// Starts recording key-downs for `slot`.  Keys are withheld from the game
    /// until the capture is closed.
    pub fn begin_capture(&self, slot: KeybindSlot) {
        self.lock_controller().begin_capture(slot);
    }

    pub fn is_capturing(&self) -> bool {
        self.lock_controller().is_capturing()
    }

    /// The chord recorded so far in the open capture.
    pub fn capture_preview(&self) -> Option<Keybind> {
        self.lock_controller().capture().and_then(|c| c.preview())
    }

    /// Display text for [`Addon::capture_preview`].
    pub fn capture_preview_label(&self) -> String {
        let preview = self.capture_preview().unwrap_or(Keybind::UNBOUND);
        self.formatter.render(&preview, true)
    }

    /// Stores the previewed chord in the capture's slot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the settings file cannot be written.
    pub fn accept_capture(&self) -> Result<bool, ConfigError> {
        self.finish_capture(CaptureOutcome::Accept)
    }

    /// Clears the capture's slot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the settings file cannot be written.
    pub fn unbind_capture(&self) -> Result<bool, ConfigError> {
        self.finish_capture(CaptureOutcome::Unbind)
    }

    /// Closes the capture without touching the settings.
    pub fn cancel_capture(&self) {
        if let Some(session) = self.lock_controller().end_capture() {
            info!(slot = session.slot().label(), "capture cancelled");
        }
    }

    /// Closes the open capture and applies `outcome`.  Returns whether the
    /// slot changed; `Ok(false)` when no capture was open.
    fn finish_capture(&self, outcome: CaptureOutcome) -> Result<bool, ConfigError> {
        // Release the controller before taking the settings lock.
        let session = self.lock_controller().end_capture();
        let Some(session) = session else {
            return Ok(false);
        };
        let slot = session.slot();
        let mut changed = false;
        self.settings
            .update(|s| changed = session.resolve(outcome, s))?;
        info!(slot = slot.label(), ?outcome, changed, "capture closed");
        Ok(changed)
    }
}
