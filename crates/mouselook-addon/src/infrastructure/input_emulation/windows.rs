//! Win32 adapters.
//!
//! - [`Win32KeystrokeSink`] posts to the game window's queue with
//!   `PostMessageW` rather than injecting with `SendInput`, so only the game
//!   sees the synthetic keys.
//! - [`Win32KeyboardLayout`] answers scan code, key name and modifier state
//!   questions for the active layout.  Key names come back from
//!   `GetKeyNameTextA` in the ANSI code page and are transcoded to UTF-8.
//! - [`Win32CursorController`] centers the cursor in the client area.

#![cfg(target_os = "windows")]

use std::ffi::c_void;
use std::time::Duration;

use mouselook_core::keymap::virtual_keys::{VK_CONTROL, VK_MENU, VK_SHIFT};
use mouselook_core::{KeyboardLayout, Modifiers, WindowHandle};
use tracing::warn;
use windows::Win32::Foundation::{HWND, LPARAM, POINT, RECT, WPARAM};
use windows::Win32::Globalization::{MultiByteToWideChar, CP_ACP, MULTI_BYTE_TO_WIDE_CHAR_FLAGS};
use windows::Win32::Graphics::Gdi::ClientToScreen;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetKeyNameTextA, GetKeyState, MapVirtualKeyW, MAPVK_VK_TO_VSC, MAPVK_VSC_TO_VK_EX,
};
use windows::Win32::UI::WindowsAndMessaging::{GetClientRect, PostMessageW, SetCursorPos};

use crate::application::activation::CursorController;
use crate::application::encoder::{EmitError, KeystrokeSink, PostedKey};

/// High bit of `GetKeyState`: the key is down.
const KEY_DOWN_MASK: u16 = 0x8000;

/// `GetKeyNameTextA` names are short; 64 bytes covers every layout.
const KEY_NAME_CAPACITY: usize = 64;

fn hwnd(window: WindowHandle) -> HWND {
    HWND(window.0 as *mut c_void)
}

// ── Keystroke sink ────────────────────────────────────────────────────────────

/// [`KeystrokeSink`] backed by `PostMessageW` and `std::thread::sleep`.
pub struct Win32KeystrokeSink;

impl KeystrokeSink for Win32KeystrokeSink {
    fn post(&self, window: WindowHandle, key: PostedKey) -> Result<(), EmitError> {
        // SAFETY: PostMessageW only queues the message; an invalid window
        // handle is reported as an error, not dereferenced.
        unsafe {
            PostMessageW(
                hwnd(window),
                key.kind.message_id(),
                WPARAM(key.virtual_key as usize),
                LPARAM(key.params as isize),
            )
        }
        .map_err(|e| EmitError::Platform(format!("PostMessageW failed: {e}")))
    }

    fn settle(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

// ── Keyboard layout ───────────────────────────────────────────────────────────

/// [`KeyboardLayout`] for the calling thread's active layout.
pub struct Win32KeyboardLayout;

impl KeyboardLayout for Win32KeyboardLayout {
    fn scan_to_virtual_key(&self, scan_code: u16) -> u32 {
        // SAFETY: pure lookup with no pointer arguments.  MAPVK_VSC_TO_VK_EX
        // understands the 0xE0 prefix in the high byte.
        unsafe { MapVirtualKeyW(u32::from(scan_code), MAPVK_VSC_TO_VK_EX) }
    }

    fn virtual_key_to_scan(&self, virtual_key: u32) -> u16 {
        // SAFETY: pure lookup with no pointer arguments.
        unsafe { MapVirtualKeyW(virtual_key, MAPVK_VK_TO_VSC) as u16 }
    }

    fn key_name(&self, params: u32) -> Option<String> {
        let mut buf = [0u8; KEY_NAME_CAPACITY];
        // SAFETY: buf is a valid, writable slice; the API writes at most
        // buf.len() bytes including the terminator.
        let len = unsafe { GetKeyNameTextA(params as i32, &mut buf) };
        if len <= 0 {
            return None;
        }
        ansi_to_utf8(&buf[..len as usize])
    }

    fn held_modifiers(&self) -> Modifiers {
        Modifiers::from_flags(is_down(VK_MENU), is_down(VK_CONTROL), is_down(VK_SHIFT))
    }
}

fn is_down(virtual_key: u32) -> bool {
    // SAFETY: reads the thread's keyboard state; no pointers involved.
    let state = unsafe { GetKeyState(virtual_key as i32) };
    (state as u16 & KEY_DOWN_MASK) != 0
}

/// Transcodes bytes in the ANSI code page to UTF-8.
fn ansi_to_utf8(bytes: &[u8]) -> Option<String> {
    // SAFETY: the first call only measures; the output slice is None.
    let wide_len = unsafe { MultiByteToWideChar(CP_ACP, MULTI_BYTE_TO_WIDE_CHAR_FLAGS(0), bytes, None) };
    if wide_len <= 0 {
        return None;
    }
    let mut wide = vec![0u16; wide_len as usize];
    // SAFETY: wide has exactly the length reported by the measuring call.
    let written = unsafe {
        MultiByteToWideChar(CP_ACP, MULTI_BYTE_TO_WIDE_CHAR_FLAGS(0), bytes, Some(&mut wide))
    };
    if written <= 0 {
        return None;
    }
    wide.truncate(written as usize);
    Some(String::from_utf16_lossy(&wide))
}

// ── Cursor ────────────────────────────────────────────────────────────────────

/// [`CursorController`] using the window's client rectangle.
pub struct Win32CursorController;

impl CursorController for Win32CursorController {
    fn client_center(&self, window: WindowHandle) -> Option<(i32, i32)> {
        let handle = hwnd(window);
        let mut rect = RECT::default();
        // SAFETY: rect is a valid out-pointer for the duration of the call.
        unsafe { GetClientRect(handle, &mut rect) }.ok()?;
        let mut point = POINT {
            x: (rect.right - rect.left) / 2,
            y: (rect.bottom - rect.top) / 2,
        };
        // SAFETY: point is a valid in/out pointer for the duration of the call.
        if !unsafe { ClientToScreen(handle, &mut point) }.as_bool() {
            return None;
        }
        Some((point.x, point.y))
    }

    fn teleport_cursor(&self, x: i32, y: i32) {
        // SAFETY: SetCursorPos takes plain integers.
        if let Err(e) = unsafe { SetCursorPos(x, y) } {
            warn!(error = %e, x, y, "SetCursorPos failed");
        }
    }
}
