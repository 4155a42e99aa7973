//! The addon's configuration record.
//!
//! Persistence lives in the addon crate; this module only defines the
//! in-memory shape, its defaults, and [`KeybindSlot`], the tag that names one
//! of the four keybind fields.

use crate::domain::keybind::Keybind;

/// User configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// The game's "disable action camera" bind, held while activation is on.
    pub disable_action_cam: Keybind,
    /// Escape hatch: while held, activation is suspended.
    pub override_disable: Keybind,
    pub reset_cursor_to_center: bool,
    pub enable_while_moving: bool,
    pub enable_in_combat: bool,
    pub enable_on_mount: bool,
    pub redirect_left_click: bool,
    pub left_click_target: Keybind,
    pub redirect_right_click: bool,
    pub right_click_target: Keybind,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            disable_action_cam: Keybind::UNBOUND,
            override_disable: Keybind::UNBOUND,
            reset_cursor_to_center: false,
            enable_while_moving: true,
            enable_in_combat: false,
            enable_on_mount: false,
            redirect_left_click: false,
            left_click_target: Keybind::UNBOUND,
            redirect_right_click: false,
            right_click_target: Keybind::UNBOUND,
        }
    }
}

/// Identifies one keybind field of [`Settings`].
///
/// A capture session stores the slot it was opened for and writes through
/// [`KeybindSlot::get_mut`], so the field selection lives in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeybindSlot {
    DisableActionCam,
    OverrideDisable,
    LeftClickTarget,
    RightClickTarget,
}

impl KeybindSlot {
    pub fn get(self, settings: &Settings) -> Keybind {
        match self {
            KeybindSlot::DisableActionCam => settings.disable_action_cam,
            KeybindSlot::OverrideDisable => settings.override_disable,
            KeybindSlot::LeftClickTarget => settings.left_click_target,
            KeybindSlot::RightClickTarget => settings.right_click_target,
        }
    }

    pub fn get_mut(self, settings: &mut Settings) -> &mut Keybind {
        match self {
            KeybindSlot::DisableActionCam => &mut settings.disable_action_cam,
            KeybindSlot::OverrideDisable => &mut settings.override_disable,
            KeybindSlot::LeftClickTarget => &mut settings.left_click_target,
            KeybindSlot::RightClickTarget => &mut settings.right_click_target,
        }
    }

    /// Label shown next to the bind button in the settings panel.
    pub fn label(self) -> &'static str {
        match self {
            KeybindSlot::DisableActionCam => "Disable Action Cam",
            KeybindSlot::OverrideDisable => "Override Disable",
            KeybindSlot::LeftClickTarget => "Left Click Target",
            KeybindSlot::RightClickTarget => "Right Click Target",
        }
    }
}
