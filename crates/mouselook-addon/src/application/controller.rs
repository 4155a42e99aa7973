//! ActionCamController: the explicit context shared by the render tick and
//! the message filter.
//!
//! The host calls two entry points on its main thread:
//!
//! - [`ActionCamController::tick`] once per frame (see `activation`), which
//!   decides whether the action camera should be held off and posts the
//!   disable keybind on each edge.
//! - [`ActionCamController::filter`] once per window message (see
//!   `interceptor`), which redirects clicks, tracks the override hotkey, and
//!   feeds capture sessions.
//!
//! Both work on the [`RuntimeState`] owned here.  Settings are passed in by
//! value on every call so the controller never holds the settings lock.

use std::sync::Arc;

use mouselook_core::{Keybind, KeybindSlot, KeyboardLayout, WindowHandle};
use tracing::{debug, info, warn};

use crate::application::activation::{CursorController, ObservedState};
use crate::application::capture::CaptureSession;
use crate::application::encoder::{KeystrokeEncoder, KeystrokeSink};

/// Transient state, never persisted.
#[derive(Debug, Default)]
pub struct RuntimeState {
    /// Inputs seen on the previous tick, for edge detection.
    pub(crate) observed: ObservedState,
    /// The disable chord currently held down in the game, if any.
    pub(crate) held: Option<Keybind>,
    /// The user is holding the override hotkey.
    pub(crate) overriding_disable: bool,
    pub(crate) capture: Option<CaptureSession>,
    /// Learned from the first filtered message.
    pub(crate) window: Option<WindowHandle>,
}

/// Owns the runtime state and the adapters it drives.
pub struct ActionCamController {
    pub(crate) encoder: KeystrokeEncoder,
    pub(crate) layout: Arc<dyn KeyboardLayout>,
    pub(crate) cursor: Arc<dyn CursorController>,
    pub(crate) state: RuntimeState,
}

impl ActionCamController {
    pub fn new(
        sink: Arc<dyn KeystrokeSink>,
        layout: Arc<dyn KeyboardLayout>,
        cursor: Arc<dyn CursorController>,
    ) -> Self {
        Self {
            encoder: KeystrokeEncoder::new(sink, Arc::clone(&layout)),
            layout,
            cursor,
            state: RuntimeState::default(),
        }
    }

    /// `true` while the disable keybind is held down on the game's behalf.
    pub fn action_cam_controlled(&self) -> bool {
        self.state.held.is_some()
    }

    pub fn overriding_disable(&self) -> bool {
        self.state.overriding_disable
    }

    pub fn window(&self) -> Option<WindowHandle> {
        self.state.window
    }

    // ── Capture ──────────────────────────────────────────────────────────────

    /// Opens a capture for `slot`, replacing any capture already open.
    pub fn begin_capture(&mut self, slot: KeybindSlot) {
        if let Some(previous) = self.state.capture.replace(CaptureSession::new(slot)) {
            debug!(from = previous.slot().label(), to = slot.label(), "capture retargeted");
        }
        info!(slot = slot.label(), "capturing keybind");
    }

    pub fn is_capturing(&self) -> bool {
        self.state.capture.is_some()
    }

    pub fn capture(&self) -> Option<&CaptureSession> {
        self.state.capture.as_ref()
    }

    /// Closes the open capture and hands it to the caller to resolve.
    pub fn end_capture(&mut self) -> Option<CaptureSession> {
        self.state.capture.take()
    }

    // ── Disable keybind ──────────────────────────────────────────────────────

    /// Presses `chord` and remembers it as held if anything was posted.
    pub(crate) fn engage(&mut self, window: WindowHandle, chord: Keybind) {
        match self.encoder.press(window, &chord) {
            Ok(true) => {
                self.state.held = Some(chord);
                debug!(key = chord.key, "action cam disabled");
            }
            Ok(false) => debug!("disable action cam keybind is unbound"),
            Err(e) => warn!(error = %e, "failed to press disable action cam keybind"),
        }
    }

    /// Releases the held chord, if any.  The held state is cleared even if
    /// posting fails, so a failure cannot wedge the state machine.
    pub(crate) fn disengage(&mut self, window: WindowHandle) {
        let Some(chord) = self.state.held.take() else {
            return;
        };
        match self.encoder.release(window, &chord) {
            Ok(_) => debug!(key = chord.key, "action cam restored"),
            Err(e) => warn!(error = %e, "failed to release disable action cam keybind"),
        }
    }

    /// Releases whatever is held, for teardown.
    pub fn release_all(&mut self) {
        if let Some(window) = self.state.window {
            self.disengage(window);
        }
        self.state.held = None;
        self.state.overriding_disable = false;
    }
}
