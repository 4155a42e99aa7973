//! Keyboard layout access and display names.
//!
//! Scan codes are layout-independent; virtual keys and key names are not.
//! Every question that depends on the active layout goes through
//! [`KeyboardLayout`], so the rest of the crate stays platform-free.

pub mod names;
pub mod virtual_keys;

use crate::domain::keybind::Modifiers;

/// Platform keyboard queries.
///
/// The Windows implementation lives in the addon crate and is backed by
/// `MapVirtualKeyW`, `GetKeyNameTextA` and `GetKeyState`.
#[cfg_attr(test, mockall::automock)]
pub trait KeyboardLayout: Send + Sync {
    /// Maps a scan code (`0xE0xx` for extended keys) to a virtual key, `0` if none.
    fn scan_to_virtual_key(&self, scan_code: u16) -> u32;

    /// Maps a virtual key to its scan code, `0` if none.
    fn virtual_key_to_scan(&self, virtual_key: u32) -> u16;

    /// Returns the layout's UTF-8 name for the key described by a packed
    /// keystroke parameter block, or `None` if the key has no name.
    fn key_name(&self, params: u32) -> Option<String>;

    /// Samples which modifiers are physically held right now.
    fn held_modifiers(&self) -> Modifiers;
}
