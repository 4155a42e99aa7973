//! Per-frame activation logic.
//!
//! Each tick samples the game state and compares it with the previous
//! sample.  Only when something changed is the activation condition
//! re-evaluated, and only a change in the outcome posts anything:
//!
//! ```text
//! should = ((moving && enable_while_moving)
//!          || (in_combat && enable_in_combat)
//!          || (mounted && enable_on_mount))
//!          && !map_open && !overriding
//!
//! should && !held  → press disable keybind
//! !should && held  → release it
//! ```
//!
//! Losing focus drops the held and override flags without posting a release,
//! since the window no longer receives input reliably.

use mouselook_core::{GameSnapshot, Settings, WindowHandle};
use tracing::debug;

use crate::application::controller::ActionCamController;

/// Source of the per-frame [`GameSnapshot`].
///
/// Backed by the host's data links; `None` while either link is unavailable.
pub trait GameStateSource: Send + Sync {
    fn snapshot(&self) -> Option<GameSnapshot>;
}

/// Placement of the physical cursor.
///
/// Infrastructure implementation uses `GetClientRect`/`SetCursorPos`; test
/// implementation records calls.
pub trait CursorController: Send + Sync {
    /// Screen coordinates of the center of `window`'s client area.
    fn client_center(&self, window: WindowHandle) -> Option<(i32, i32)>;

    fn teleport_cursor(&self, x: i32, y: i32);
}

/// The six booleans the activation edge detector watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObservedState {
    pub is_moving: bool,
    pub is_in_combat: bool,
    pub is_mounted: bool,
    pub is_map_open: bool,
    pub is_game_focused: bool,
    pub overriding_disable: bool,
}

impl ObservedState {
    pub fn sample(snapshot: &GameSnapshot, overriding_disable: bool) -> Self {
        Self {
            is_moving: snapshot.is_moving,
            is_in_combat: snapshot.is_in_combat,
            is_mounted: snapshot.is_mounted(),
            is_map_open: snapshot.is_map_open,
            is_game_focused: snapshot.is_game_focused,
            overriding_disable,
        }
    }
}

/// Whether the disable keybind should be held for `observed`.
pub fn should_activate(settings: &Settings, observed: &ObservedState) -> bool {
    let wanted = (settings.enable_while_moving && observed.is_moving)
        || (settings.enable_in_combat && observed.is_in_combat)
        || (settings.enable_on_mount && observed.is_mounted);
    wanted && !observed.is_map_open && !observed.overriding_disable
}

impl ActionCamController {
    /// Render-tick entry point.  No-op until a window has been seen.
    pub fn tick(&mut self, settings: &Settings, snapshot: &GameSnapshot) {
        let Some(window) = self.state.window else {
            return;
        };

        let observed = ObservedState::sample(snapshot, self.state.overriding_disable);

        if !observed.is_game_focused {
            if self.state.held.is_some() || self.state.overriding_disable {
                debug!("game lost focus, dropping held keybind state");
            }
            self.state.held = None;
            self.state.overriding_disable = false;
            self.state.observed = ObservedState {
                overriding_disable: false,
                ..observed
            };
            return;
        }

        if observed != self.state.observed {
            let should = should_activate(settings, &observed);
            let controlled = self.action_cam_controlled();
            if should && !controlled {
                self.engage(window, settings.disable_action_cam);
            } else if !should && controlled {
                self.disengage(window);
            }
            self.state.observed = observed;
        }

        if settings.reset_cursor_to_center
            && self.action_cam_controlled()
            && !self.state.overriding_disable
            && !observed.is_map_open
        {
            if let Some((x, y)) = self.cursor.client_center(window) {
                self.cursor.teleport_cursor(x, y);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
