//! OS adapters for the encoder, the chord decoder and cursor placement.
//!
//! The Windows implementation is selected at compile time via
//! `#[cfg(target_os = "windows")]`.  The mocks are always built so
//! integration tests can drive the addon on any platform.

use std::sync::Arc;

use mouselook_core::KeyboardLayout;

use crate::application::activation::CursorController;
use crate::application::encoder::KeystrokeSink;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// The adapters the controller needs, bundled for construction.
#[derive(Clone)]
pub struct PlatformServices {
    pub sink: Arc<dyn KeystrokeSink>,
    pub layout: Arc<dyn KeyboardLayout>,
    pub cursor: Arc<dyn CursorController>,
}

impl PlatformServices {
    /// Win32-backed adapters.
    #[cfg(target_os = "windows")]
    pub fn native() -> Self {
        Self {
            sink: Arc::new(windows::Win32KeystrokeSink),
            layout: Arc::new(windows::Win32KeyboardLayout),
            cursor: Arc::new(windows::Win32CursorController),
        }
    }
}
