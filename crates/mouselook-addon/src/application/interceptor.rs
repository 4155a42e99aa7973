//! Window-message filter.
//!
//! Runs for every message the game window receives, in this order:
//!
//! 1. **Redirect** – while the disable keybind is held and not overridden, a
//!    redirected mouse button becomes its target keybind.  Button-down is
//!    consumed; button-up releases the target and is forwarded so the game's
//!    own button state stays consistent.
//! 2. **Override release** – a key-up of the override chord resumes
//!    activation and is consumed, whether or not the override was engaged.
//! 3. **Capture** – while a capture session is open, every key message is
//!    consumed and key-downs update the preview.
//! 4. **Override press** – the override chord going down suspends activation
//!    and releases the disable keybind.  It is consumed.
//!
//! Anything else is forwarded.

use mouselook_core::protocol::messages::MouseButton;
use mouselook_core::{FilterVerdict, KeyMessage, Settings, WindowHandle, WindowMessage};
use tracing::{debug, warn};

use crate::application::controller::ActionCamController;

impl ActionCamController {
    /// Message-filter entry point.
    pub fn filter(
        &mut self,
        settings: &Settings,
        window: WindowHandle,
        message: WindowMessage,
    ) -> FilterVerdict {
        if window.is_null() {
            return FilterVerdict::Forward;
        }
        self.state.window = Some(window);

        if let WindowMessage::MouseButton { button, pressed } = message {
            if let Some(verdict) = self.redirect(settings, window, button, pressed) {
                return verdict;
            }
        }

        match message {
            WindowMessage::Key(key) => self.filter_key(settings, window, &key),
            _ => FilterVerdict::Forward,
        }
    }

    fn redirect(
        &mut self,
        settings: &Settings,
        window: WindowHandle,
        button: MouseButton,
        pressed: bool,
    ) -> Option<FilterVerdict> {
        if !self.action_cam_controlled() || self.state.overriding_disable {
            return None;
        }
        let (enabled, target) = match button {
            MouseButton::Left => (settings.redirect_left_click, settings.left_click_target),
            MouseButton::Right => (settings.redirect_right_click, settings.right_click_target),
        };
        if !enabled || !target.is_bound() {
            return None;
        }

        if pressed {
            if let Err(e) = self.encoder.press(window, &target) {
                warn!(error = %e, ?button, "failed to press click redirect target");
            }
            Some(FilterVerdict::Consume)
        } else {
            if let Err(e) = self.encoder.release(window, &target) {
                warn!(error = %e, ?button, "failed to release click redirect target");
            }
            Some(FilterVerdict::Forward)
        }
    }

    fn filter_key(
        &mut self,
        settings: &Settings,
        window: WindowHandle,
        key: &KeyMessage,
    ) -> FilterVerdict {
        let chord = key.chord(self.layout.held_modifiers());
        let override_chord = settings.override_disable;

        // The override is released even while a capture swallows its key-up.
        let override_released = !key.kind.is_down() && override_chord.is_released_by(&chord);
        if override_released && self.state.overriding_disable {
            debug!("override released");
            self.state.overriding_disable = false;
        }

        if let Some(session) = self.state.capture.as_mut() {
            if key.kind.is_down() {
                session.record(chord);
            }
            return FilterVerdict::Consume;
        }

        if override_released {
            return FilterVerdict::Consume;
        }

        if key.kind.is_down() && !override_chord.is_empty() && chord == override_chord {
            if !self.state.overriding_disable {
                debug!("override engaged");
            }
            self.state.overriding_disable = true;
            self.disengage(window);
            return FilterVerdict::Consume;
        }

        FilterVerdict::Forward
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mouselook_core::keymap::virtual_keys::VK_SHIFT;
    use mouselook_core::protocol::messages::{
        WM_KEYDOWN, WM_KEYUP, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_RBUTTONDOWN, WM_SYSKEYDOWN,
        WM_SYSKEYUP,
    };
    use mouselook_core::{KeyMessageKind, Keybind, KeybindSlot, KeystrokeParams, Modifiers};

    use super::*;
    use crate::infrastructure::input_emulation::mock::{
        FakeKeyboardLayout, MockCursorController, MockKeystrokeSink, SCAN_E, SCAN_F, SCAN_F1,
        SCAN_Q, SCAN_SHIFT, SCAN_X, VK_E, VK_F, VK_X,
    };

    const WINDOW: WindowHandle = WindowHandle(0x99);

    struct Fixture {
        sink: Arc<MockKeystrokeSink>,
        layout: Arc<FakeKeyboardLayout>,
        controller: ActionCamController,
        settings: Settings,
    }

    impl Fixture {
        fn new() -> Self {
            let sink = Arc::new(MockKeystrokeSink::new());
            let layout = Arc::new(FakeKeyboardLayout::new());
            let controller = ActionCamController::new(
                sink.clone(),
                layout.clone(),
                Arc::new(MockCursorController::default()),
            );
            Self {
                sink,
                layout,
                controller,
                settings: Settings {
                    disable_action_cam: Keybind::new(SCAN_F1),
                    override_disable: Keybind::new(SCAN_Q),
                    redirect_left_click: true,
                    left_click_target: Keybind::new(SCAN_X),
                    redirect_right_click: true,
                    right_click_target: Keybind::new(SCAN_E),
                    ..Settings::default()
                },
            }
        }

        /// Puts the controller into the "disable keybind held" state.
        fn controlled(mut self) -> Self {
            self.controller.state.window = Some(WINDOW);
            self.controller.engage(WINDOW, self.settings.disable_action_cam);
            self.sink.clear();
            self
        }

        fn send(&mut self, msg: u32, wparam: usize, lparam: isize) -> FilterVerdict {
            let message = WindowMessage::decode(msg, wparam, lparam);
            self.controller.filter(&self.settings, WINDOW, message)
        }

        fn key(&mut self, msg: u32, vk: u32, scan: u16) -> FilterVerdict {
            let key_up = matches!(msg, WM_KEYUP | WM_SYSKEYUP);
            let lparam = KeystrokeParams::for_keystroke(scan, key_up).pack() as isize;
            self.send(msg, vk as usize, lparam)
        }
    }

    // ── Redirect ─────────────────────────────────────────────────────────────

    #[test]
    fn test_left_down_is_redirected_and_consumed() {
        // Arrange
        let mut f = Fixture::new().controlled();

        // Act
        let verdict = f.send(WM_LBUTTONDOWN, 0, 0);

        // Assert
        assert_eq!(verdict, FilterVerdict::Consume);
        let posted = f.sink.posted();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].kind, KeyMessageKind::KeyDown);
        assert_eq!(posted[0].virtual_key, VK_X);
    }

    #[test]
    fn test_left_up_releases_target_and_is_forwarded() {
        let mut f = Fixture::new().controlled();
        f.send(WM_LBUTTONDOWN, 0, 0);
        f.sink.clear();

        let verdict = f.send(WM_LBUTTONUP, 0, 0);

        assert_eq!(verdict, FilterVerdict::Forward);
        let posted = f.sink.posted();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].kind, KeyMessageKind::KeyUp);
        assert_eq!(posted[0].virtual_key, VK_X);
    }

    #[test]
    fn test_right_button_uses_its_own_target() {
        let mut f = Fixture::new().controlled();

        let verdict = f.send(WM_RBUTTONDOWN, 0, 0);

        assert_eq!(verdict, FilterVerdict::Consume);
        assert_eq!(f.sink.posted()[0].virtual_key, VK_E);
    }

    #[test]
    fn test_redirect_inactive_when_not_controlled() {
        let mut f = Fixture::new();

        let verdict = f.send(WM_LBUTTONDOWN, 0, 0);

        assert_eq!(verdict, FilterVerdict::Forward);
        assert!(f.sink.events().is_empty());
    }

    #[test]
    fn test_redirect_inactive_while_overriding() {
        let mut f = Fixture::new().controlled();
        f.controller.state.overriding_disable = true;

        assert_eq!(f.send(WM_LBUTTONDOWN, 0, 0), FilterVerdict::Forward);
        assert!(f.sink.events().is_empty());
    }

    #[test]
    fn test_redirect_disabled_or_unbound_forwards_click() {
        let mut f = Fixture::new().controlled();
        f.settings.redirect_left_click = false;
        f.settings.right_click_target = Keybind::UNBOUND;

        assert_eq!(f.send(WM_LBUTTONDOWN, 0, 0), FilterVerdict::Forward);
        assert_eq!(f.send(WM_RBUTTONDOWN, 0, 0), FilterVerdict::Forward);
        assert!(f.sink.events().is_empty());
    }

    #[test]
    fn test_redirect_posts_alt_as_menu_key() {
        // Arrange
        let mut f = Fixture::new().controlled();
        f.settings.left_click_target = Keybind {
            key: SCAN_X,
            alt: true,
            ..Keybind::UNBOUND
        };

        // Act
        f.send(WM_LBUTTONDOWN, 0, 0);

        // Assert
        let posted = f.sink.posted();
        assert_eq!(posted[0].kind, KeyMessageKind::SysKeyDown);
        assert_eq!(posted[0].virtual_key, 0x12);
    }

    // ── Override ─────────────────────────────────────────────────────────────

    #[test]
    fn test_override_down_releases_disable_keybind_and_is_consumed() {
        // Arrange
        let mut f = Fixture::new().controlled();

        // Act
        let verdict = f.key(WM_KEYDOWN, 0x51, SCAN_Q);

        // Assert
        assert_eq!(verdict, FilterVerdict::Consume);
        assert!(f.controller.overriding_disable());
        assert!(!f.controller.action_cam_controlled());
        let ups: Vec<_> = f.sink.posted().into_iter().filter(|k| !k.kind.is_down()).collect();
        assert_eq!(ups.len(), 1);
    }

    #[test]
    fn test_override_key_repeat_releases_only_once() {
        let mut f = Fixture::new().controlled();

        f.key(WM_KEYDOWN, 0x51, SCAN_Q);
        f.key(WM_KEYDOWN, 0x51, SCAN_Q);
        f.key(WM_KEYDOWN, 0x51, SCAN_Q);

        assert_eq!(f.sink.posted().len(), 1);
    }

    #[test]
    fn test_override_up_clears_flag_and_is_consumed() {
        let mut f = Fixture::new().controlled();
        f.key(WM_KEYDOWN, 0x51, SCAN_Q);

        let verdict = f.key(WM_KEYUP, 0x51, SCAN_Q);

        assert_eq!(verdict, FilterVerdict::Consume);
        assert!(!f.controller.overriding_disable());
    }

    #[test]
    fn test_override_with_modifier_needs_modifier_held() {
        // Arrange: override is Shift+Q.
        let mut f = Fixture::new().controlled();
        f.settings.override_disable = Keybind {
            key: SCAN_Q,
            shift: true,
            ..Keybind::UNBOUND
        };

        // Act / Assert: plain Q passes through.
        assert_eq!(f.key(WM_KEYDOWN, 0x51, SCAN_Q), FilterVerdict::Forward);
        assert!(!f.controller.overriding_disable());

        f.layout.hold(Modifiers(Modifiers::SHIFT));
        assert_eq!(f.key(WM_KEYDOWN, 0x51, SCAN_Q), FilterVerdict::Consume);
        assert!(f.controller.overriding_disable());

        // Shift released first, then Q goes up alone.
        f.layout.hold(Modifiers::NONE);
        assert_eq!(f.key(WM_KEYUP, 0x51, SCAN_Q), FilterVerdict::Consume);
        assert!(!f.controller.overriding_disable());
    }

    #[test]
    fn test_bare_shift_override() {
        let mut f = Fixture::new().controlled();
        f.settings.override_disable = Keybind {
            shift: true,
            ..Keybind::UNBOUND
        };

        f.layout.hold(Modifiers(Modifiers::SHIFT));
        assert_eq!(f.key(WM_KEYDOWN, VK_SHIFT, SCAN_SHIFT), FilterVerdict::Consume);
        assert!(f.controller.overriding_disable());

        f.layout.hold(Modifiers::NONE);
        assert_eq!(f.key(WM_KEYUP, VK_SHIFT, SCAN_SHIFT), FilterVerdict::Consume);
        assert!(!f.controller.overriding_disable());
    }

    #[test]
    fn test_override_key_up_is_consumed_even_when_not_engaged() {
        // Arrange: focus loss cleared the flag while Q was still down.
        let mut f = Fixture::new().controlled();
        f.key(WM_KEYDOWN, 0x51, SCAN_Q);
        f.controller.state.overriding_disable = false;

        // Act
        let verdict = f.key(WM_KEYUP, 0x51, SCAN_Q);

        // Assert: the game never sees an unpaired key-up.
        assert_eq!(verdict, FilterVerdict::Consume);
        assert!(!f.controller.overriding_disable());
    }

    #[test]
    fn test_override_released_while_capturing_is_cleared() {
        // Arrange: override held, then the settings panel opens a capture.
        let mut f = Fixture::new().controlled();
        f.key(WM_KEYDOWN, 0x51, SCAN_Q);
        f.controller.begin_capture(KeybindSlot::DisableActionCam);

        // Act
        let verdict = f.key(WM_KEYUP, 0x51, SCAN_Q);
        f.controller.end_capture();

        // Assert
        assert_eq!(verdict, FilterVerdict::Consume);
        assert!(!f.controller.overriding_disable());
    }

    #[test]
    fn test_empty_override_never_matches() {
        let mut f = Fixture::new().controlled();
        f.settings.override_disable = Keybind::UNBOUND;

        assert_eq!(f.send(WM_KEYDOWN, 0, 0), FilterVerdict::Forward);
        assert!(!f.controller.overriding_disable());
    }

    #[test]
    fn test_other_keys_are_forwarded() {
        let mut f = Fixture::new().controlled();
        assert_eq!(f.key(WM_KEYDOWN, VK_F, SCAN_F), FilterVerdict::Forward);
        assert_eq!(f.key(WM_KEYUP, VK_F, SCAN_F), FilterVerdict::Forward);
    }

    // ── Capture ──────────────────────────────────────────────────────────────

    #[test]
    fn test_capture_consumes_all_four_key_messages() {
        // Arrange
        let mut f = Fixture::new();
        f.controller.begin_capture(KeybindSlot::DisableActionCam);

        // Act / Assert
        for msg in [WM_KEYDOWN, WM_KEYUP, WM_SYSKEYDOWN, WM_SYSKEYUP] {
            assert_eq!(f.key(msg, VK_F, SCAN_F), FilterVerdict::Consume, "msg 0x{msg:X}");
        }
    }

    #[test]
    fn test_capture_preview_tracks_last_key_down() {
        let mut f = Fixture::new();
        f.controller.begin_capture(KeybindSlot::LeftClickTarget);

        f.layout.hold(Modifiers(Modifiers::CTRL));
        f.key(WM_KEYDOWN, VK_F, SCAN_F);
        f.layout.hold(Modifiers::NONE);
        f.key(WM_KEYUP, VK_F, SCAN_F);
        f.key(WM_KEYDOWN, VK_X, SCAN_X);
        f.key(WM_KEYUP, VK_X, SCAN_X);

        let preview = f.controller.capture().and_then(|s| s.preview());
        assert_eq!(preview, Some(Keybind::new(SCAN_X)));
    }

    #[test]
    fn test_capture_takes_precedence_over_override() {
        // Arrange: capturing a new override while the old one is pressed.
        let mut f = Fixture::new().controlled();
        f.controller.begin_capture(KeybindSlot::OverrideDisable);

        // Act
        let verdict = f.key(WM_KEYDOWN, 0x51, SCAN_Q);

        // Assert
        assert_eq!(verdict, FilterVerdict::Consume);
        assert!(!f.controller.overriding_disable());
        assert!(f.controller.action_cam_controlled());
        assert_eq!(
            f.controller.capture().and_then(|s| s.preview()),
            Some(Keybind::new(SCAN_Q))
        );
    }

    #[test]
    fn test_capture_does_not_swallow_mouse_or_other_messages() {
        let mut f = Fixture::new();
        f.controller.begin_capture(KeybindSlot::DisableActionCam);

        assert_eq!(f.send(WM_LBUTTONDOWN, 0, 0), FilterVerdict::Forward);
        assert_eq!(f.send(0x0200, 0, 0), FilterVerdict::Forward);
    }

    // ── Window handle ────────────────────────────────────────────────────────

    #[test]
    fn test_filter_learns_window_handle() {
        let mut f = Fixture::new();
        f.send(0x0200, 0, 0);
        assert_eq!(f.controller.window(), Some(WINDOW));
    }

    #[test]
    fn test_null_window_is_ignored() {
        let mut f = Fixture::new();
        let verdict = f.controller.filter(
            &f.settings,
            WindowHandle(0),
            WindowMessage::decode(WM_LBUTTONDOWN, 0, 0),
        );
        assert_eq!(verdict, FilterVerdict::Forward);
        assert!(f.controller.window().is_none());
    }
}
