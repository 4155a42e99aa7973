//! Window messages seen by the message filter and posted by the encoder.
//!
//! The host forwards every message sent to the game window as a raw
//! `(msg, wParam, lParam)` triple.  [`WindowMessage::decode`] turns the ones
//! the addon cares about into typed variants; everything else is
//! [`WindowMessage::Other`] and is forwarded untouched.

use crate::domain::keybind::{Keybind, Modifiers};
use crate::protocol::keystroke::KeystrokeParams;

pub const WM_KEYDOWN: u32 = 0x0100;
pub const WM_KEYUP: u32 = 0x0101;
pub const WM_SYSKEYDOWN: u32 = 0x0104;
pub const WM_SYSKEYUP: u32 = 0x0105;
pub const WM_LBUTTONDOWN: u32 = 0x0201;
pub const WM_LBUTTONUP: u32 = 0x0202;
pub const WM_RBUTTONDOWN: u32 = 0x0204;
pub const WM_RBUTTONUP: u32 = 0x0205;

/// Opaque handle of the game window (`HWND` on Windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

/// The four keyboard message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMessageKind {
    KeyDown,
    KeyUp,
    SysKeyDown,
    SysKeyUp,
}

impl KeyMessageKind {
    /// Picks the message type for a synthesized keystroke.
    pub fn for_keystroke(key_up: bool, system: bool) -> Self {
        match (key_up, system) {
            (false, false) => KeyMessageKind::KeyDown,
            (true, false) => KeyMessageKind::KeyUp,
            (false, true) => KeyMessageKind::SysKeyDown,
            (true, true) => KeyMessageKind::SysKeyUp,
        }
    }

    pub fn message_id(self) -> u32 {
        match self {
            KeyMessageKind::KeyDown => WM_KEYDOWN,
            KeyMessageKind::KeyUp => WM_KEYUP,
            KeyMessageKind::SysKeyDown => WM_SYSKEYDOWN,
            KeyMessageKind::SysKeyUp => WM_SYSKEYUP,
        }
    }

    pub fn is_down(self) -> bool {
        matches!(self, KeyMessageKind::KeyDown | KeyMessageKind::SysKeyDown)
    }
}

/// A keyboard message: type, virtual key (`wParam`) and parameter block (`lParam`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMessage {
    pub kind: KeyMessageKind,
    pub virtual_key: u32,
    pub params: KeystrokeParams,
}

impl KeyMessage {
    /// Decodes the chord this keystroke represents given the modifiers held
    /// at the time.
    ///
    /// A bare modifier key produces a chord with no primary key and that
    /// modifier's flag set, so Shift alone can serve as a hotkey.
    pub fn chord(&self, held: Modifiers) -> Keybind {
        match Modifiers::flag_for_virtual_key(self.virtual_key) {
            Some(flag) => Keybind::with_modifiers(0, held.with(flag)),
            None => Keybind::with_modifiers(self.params.full_scan_code(), held),
        }
    }
}

/// Mouse buttons the addon can redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// A decoded window message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMessage {
    Key(KeyMessage),
    MouseButton { button: MouseButton, pressed: bool },
    Other(u32),
}

impl WindowMessage {
    pub fn decode(msg: u32, wparam: usize, lparam: isize) -> Self {
        let key = |kind| {
            WindowMessage::Key(KeyMessage {
                kind,
                virtual_key: wparam as u32,
                params: KeystrokeParams::unpack(lparam as u32),
            })
        };
        match msg {
            WM_KEYDOWN => key(KeyMessageKind::KeyDown),
            WM_KEYUP => key(KeyMessageKind::KeyUp),
            WM_SYSKEYDOWN => key(KeyMessageKind::SysKeyDown),
            WM_SYSKEYUP => key(KeyMessageKind::SysKeyUp),
            WM_LBUTTONDOWN => WindowMessage::MouseButton {
                button: MouseButton::Left,
                pressed: true,
            },
            WM_LBUTTONUP => WindowMessage::MouseButton {
                button: MouseButton::Left,
                pressed: false,
            },
            WM_RBUTTONDOWN => WindowMessage::MouseButton {
                button: MouseButton::Right,
                pressed: true,
            },
            WM_RBUTTONUP => WindowMessage::MouseButton {
                button: MouseButton::Right,
                pressed: false,
            },
            other => WindowMessage::Other(other),
        }
    }
}

/// What the host should do with a filtered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVerdict {
    /// Continue default processing.
    Forward,
    /// The addon handled the message; the game never sees it.
    Consume,
}

impl FilterVerdict {
    /// Host return convention: zero suppresses, non-zero continues.
    pub fn host_code(self, msg: u32) -> u32 {
        match self {
            FilterVerdict::Forward => msg.max(1),
            FilterVerdict::Consume => 0,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
