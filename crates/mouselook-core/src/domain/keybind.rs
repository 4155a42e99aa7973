//! Key chord value type.
//!
//! A [`Keybind`] is one primary key, identified by its scan code, plus the
//! three standard modifiers.  Extended keys (right Ctrl, arrows, Insert, ...)
//! carry the `0xE000` prefix in the high byte of the scan code, exactly as the
//! keystroke parameter block reports them.
//!
//! A chord whose primary key is `0` is *unbound*: it never produces synthetic
//! input.  The modifier flags of an unbound chord are still meaningful for the
//! override hotkey, which may be a bare modifier such as Shift.

use crate::keymap::virtual_keys::{VK_CONTROL, VK_MENU, VK_SHIFT};

/// Modifier flags sampled from the keyboard or carried by a [`Keybind`].
///
/// Each modifier occupies one bit; left and right variants are not
/// distinguished because the game does not distinguish them either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const ALT: u8 = 1 << 0;
    pub const CTRL: u8 = 1 << 1;
    pub const SHIFT: u8 = 1 << 2;

    pub const NONE: Modifiers = Modifiers(0);

    /// Builds the flag set from three booleans.
    pub fn from_flags(alt: bool, ctrl: bool, shift: bool) -> Self {
        let mut bits = 0;
        if alt {
            bits |= Self::ALT;
        }
        if ctrl {
            bits |= Self::CTRL;
        }
        if shift {
            bits |= Self::SHIFT;
        }
        Self(bits)
    }

    pub fn alt(&self) -> bool {
        self.0 & Self::ALT != 0
    }

    pub fn ctrl(&self) -> bool {
        self.0 & Self::CTRL != 0
    }

    pub fn shift(&self) -> bool {
        self.0 & Self::SHIFT != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns the modifier bit for a modifier virtual key, or `None` for any
    /// other key.
    pub fn flag_for_virtual_key(virtual_key: u32) -> Option<u8> {
        match virtual_key {
            VK_MENU => Some(Self::ALT),
            VK_CONTROL => Some(Self::CTRL),
            VK_SHIFT => Some(Self::SHIFT),
            _ => None,
        }
    }

    /// Returns a copy with `flag` set.
    pub fn with(self, flag: u8) -> Self {
        Self(self.0 | flag)
    }
}

/// A primary key plus modifier flags.
///
/// Equality is structural over all four fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Keybind {
    /// Scan code of the primary key, `0xE0xx` for extended keys, `0` when unbound.
    pub key: u16,
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

impl Keybind {
    /// The empty chord: no key, no modifiers.
    pub const UNBOUND: Keybind = Keybind {
        key: 0,
        alt: false,
        ctrl: false,
        shift: false,
    };

    /// Creates a chord for `key` with no modifiers.
    pub const fn new(key: u16) -> Self {
        Self {
            key,
            alt: false,
            ctrl: false,
            shift: false,
        }
    }

    /// Creates a chord for `key` with the given modifiers.
    pub fn with_modifiers(key: u16, modifiers: Modifiers) -> Self {
        Self {
            key,
            alt: modifiers.alt(),
            ctrl: modifiers.ctrl(),
            shift: modifiers.shift(),
        }
    }

    /// `true` when the chord has a primary key and may be synthesized.
    pub fn is_bound(&self) -> bool {
        self.key != 0
    }

    /// `true` when neither a key nor any modifier is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::UNBOUND
    }

    pub fn modifiers(&self) -> Modifiers {
        Modifiers::from_flags(self.alt, self.ctrl, self.shift)
    }

    /// Decides whether a key-up chord ends a hold of `self`.
    ///
    /// A chord with a primary key is released by that key going up, whatever
    /// modifiers are still held.  A modifier-only chord is released when one
    /// of its modifiers goes up.
    pub fn is_released_by(&self, released: &Keybind) -> bool {
        if self.is_empty() {
            return false;
        }
        if self.is_bound() {
            return released.key == self.key;
        }
        released.key == 0 && (self.modifiers().0 & released.modifiers().0) != 0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
