//! In-memory stand-ins for the Win32 adapters.
//!
//! The real adapters post to a live window, read the physical keyboard, and
//! move the physical cursor.  These replacements record every call in a
//! `Mutex<Vec<...>>` so tests can assert exactly what happened and in which
//! order, including the pauses between modifier edges.
//!
//! ```ignore
//! let sink = Arc::new(MockKeystrokeSink::new());
//! let encoder = KeystrokeEncoder::new(sink.clone(), Arc::new(FakeKeyboardLayout::new()));
//!
//! encoder.press(window, &Keybind::new(SCAN_F1)).unwrap();
//! assert_eq!(sink.posted().len(), 1);
//! ```
//!
//! Set `should_fail = true` on [`MockKeystrokeSink`] to exercise the error
//! paths of callers.

use std::sync::Mutex;
use std::time::Duration;

use mouselook_core::keymap::virtual_keys::{VK_CONTROL, VK_MENU, VK_SHIFT};
use mouselook_core::{KeyboardLayout, KeystrokeParams, Modifiers, WindowHandle};

use crate::application::activation::CursorController;
use crate::application::encoder::{EmitError, KeystrokeSink, PostedKey};

// ── Fake layout table (US QWERTY subset) ──────────────────────────────────────

pub const SCAN_ALT: u16 = 0x38;
pub const SCAN_CTRL: u16 = 0x1D;
pub const SCAN_SHIFT: u16 = 0x2A;
pub const SCAN_A: u16 = 0x1E;
pub const SCAN_E: u16 = 0x12;
pub const SCAN_F: u16 = 0x21;
pub const SCAN_Q: u16 = 0x10;
pub const SCAN_X: u16 = 0x2D;
pub const SCAN_F1: u16 = 0x3B;
pub const SCAN_SPACE: u16 = 0x39;
pub const SCAN_INSERT: u16 = 0xE052;

pub const VK_A: u32 = 0x41;
pub const VK_E: u32 = 0x45;
pub const VK_F: u32 = 0x46;
pub const VK_Q: u32 = 0x51;
pub const VK_X: u32 = 0x58;
pub const VK_F1: u32 = 0x70;
pub const VK_SPACE: u32 = 0x20;
pub const VK_INSERT: u32 = 0x2D;

const FAKE_KEYS: &[(u16, u32, &str)] = &[
    (SCAN_ALT, VK_MENU, "Alt"),
    (SCAN_CTRL, VK_CONTROL, "Ctrl"),
    (SCAN_SHIFT, VK_SHIFT, "Shift"),
    (SCAN_A, VK_A, "A"),
    (SCAN_E, VK_E, "E"),
    (SCAN_F, VK_F, "F"),
    (SCAN_Q, VK_Q, "Q"),
    (SCAN_X, VK_X, "X"),
    (SCAN_F1, VK_F1, "F1"),
    (SCAN_SPACE, VK_SPACE, "Space"),
    (SCAN_INSERT, VK_INSERT, "Insert"),
];

// ── Keystroke sink ────────────────────────────────────────────────────────────

/// One recorded sink call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkEvent {
    Posted(WindowHandle, PostedKey),
    Settled(Duration),
}

/// Records posted messages and pauses without touching the OS or sleeping.
#[derive(Default)]
pub struct MockKeystrokeSink {
    pub log: Mutex<Vec<SinkEvent>>,
    /// When `true`, `post` returns `EmitError::Platform` and records nothing.
    pub should_fail: bool,
}

impl MockKeystrokeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call in order.
    pub fn events(&self) -> Vec<SinkEvent> {
        self.log.lock().unwrap().clone()
    }

    /// Posted messages only.
    pub fn posted(&self) -> Vec<PostedKey> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Posted(_, key) => Some(key),
                SinkEvent::Settled(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }
}

impl KeystrokeSink for MockKeystrokeSink {
    fn post(&self, window: WindowHandle, key: PostedKey) -> Result<(), EmitError> {
        if self.should_fail {
            return Err(EmitError::Platform("mock failure".into()));
        }
        self.log.lock().unwrap().push(SinkEvent::Posted(window, key));
        Ok(())
    }

    fn settle(&self, delay: Duration) {
        self.log.lock().unwrap().push(SinkEvent::Settled(delay));
    }
}

// ── Keyboard layout ───────────────────────────────────────────────────────────

/// Deterministic layout over a small key table, with settable modifier state.
#[derive(Default)]
pub struct FakeKeyboardLayout {
    held: Mutex<Modifiers>,
}

impl FakeKeyboardLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the modifiers reported by [`KeyboardLayout::held_modifiers`].
    pub fn hold(&self, modifiers: Modifiers) {
        *self.held.lock().unwrap() = modifiers;
    }
}

impl KeyboardLayout for FakeKeyboardLayout {
    fn scan_to_virtual_key(&self, scan_code: u16) -> u32 {
        FAKE_KEYS
            .iter()
            .find(|(scan, _, _)| *scan == scan_code)
            .map_or(0, |(_, vk, _)| *vk)
    }

    fn virtual_key_to_scan(&self, virtual_key: u32) -> u16 {
        FAKE_KEYS
            .iter()
            .find(|(_, vk, _)| *vk == virtual_key)
            .map_or(0, |(scan, _, _)| *scan)
    }

    fn key_name(&self, params: u32) -> Option<String> {
        let scan_code = KeystrokeParams::unpack(params).full_scan_code();
        FAKE_KEYS
            .iter()
            .find(|(scan, _, _)| *scan == scan_code)
            .map(|(_, _, name)| (*name).to_string())
    }

    fn held_modifiers(&self) -> Modifiers {
        *self.held.lock().unwrap()
    }
}

// ── Cursor ────────────────────────────────────────────────────────────────────

/// Reports a fixed client-area center and records teleports.
#[derive(Default)]
pub struct MockCursorController {
    /// Returned by `client_center`; `None` simulates a failed rect query.
    pub center: Option<(i32, i32)>,
    pub teleports: Mutex<Vec<(i32, i32)>>,
}

impl MockCursorController {
    pub fn with_center(x: i32, y: i32) -> Self {
        Self {
            center: Some((x, y)),
            teleports: Mutex::new(Vec::new()),
        }
    }

    pub fn teleports(&self) -> Vec<(i32, i32)> {
        self.teleports.lock().unwrap().clone()
    }
}

impl CursorController for MockCursorController {
    fn client_center(&self, _window: WindowHandle) -> Option<(i32, i32)> {
        self.center
    }

    fn teleport_cursor(&self, x: i32, y: i32) {
        self.teleports.lock().unwrap().push((x, y));
    }
}
