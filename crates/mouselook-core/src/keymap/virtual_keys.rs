//! Windows virtual-key codes used by the addon.
//!
//! Values come from `<winuser.h>`.  Only the handful of keys the addon names
//! explicitly are listed; everything else is treated as an opaque number.

pub const VK_SHIFT: u32 = 0x10;
pub const VK_CONTROL: u32 = 0x11;
pub const VK_MENU: u32 = 0x12;

/// `'0'` through `'9'`.
pub const VK_DIGIT_FIRST: u32 = 0x30;
pub const VK_DIGIT_LAST: u32 = 0x39;

/// `'A'` through `'Z'`.
pub const VK_LETTER_FIRST: u32 = 0x41;
pub const VK_LETTER_LAST: u32 = 0x5A;

/// Returns `true` for the letter and digit virtual keys.
///
/// These keys get their display name straight from the layout; all other keys
/// go through the scan-code name table.
pub fn is_alphanumeric(virtual_key: u32) -> bool {
    (VK_LETTER_FIRST..=VK_LETTER_LAST).contains(&virtual_key)
        || (VK_DIGIT_FIRST..=VK_DIGIT_LAST).contains(&virtual_key)
}
