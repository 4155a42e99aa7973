//! The addon context: everything one load of the addon owns.
//!
//! [`Addon`] is created by [`Addon::load`] when the host loads the DLL and
//! lives until [`Addon::unload`].  It is the only place that wires the
//! layers together:
//!
//! ```text
//! host ──render()──▶ HostDataLinks ──snapshot──▶ ActionCamController::tick
//!      ──wnd_proc()─▶ WindowMessage::decode ────▶ ActionCamController::filter
//!                                                        │
//!                                       KeystrokeEncoder ┴─▶ PostMessageW
//! ```
//!
//! # Locking
//!
//! Two mutexes, never held together in the opposite order:
//!
//! - the settings store's mutex, held only for a copy or a load/save;
//! - the controller's mutex, held for the duration of one callback.
//!
//! Callbacks copy the settings first and then lock the controller.  The
//! keystroke sink posts (it never sends), so the filter is not re-entered
//! while the controller lock is held.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Context as _;
use mouselook_core::{KeybindFormatter, WindowHandle, WindowMessage};
use tracing::{info, warn};

use crate::application::activation::GameStateSource;
use crate::application::controller::ActionCamController;
use crate::infrastructure::host::data_link::HostDataLinks;
use crate::infrastructure::host::logging::{self, HostLogSink};
use crate::infrastructure::host::{AddonHooks, AddonHost};
use crate::infrastructure::input_emulation::PlatformServices;
use crate::infrastructure::storage::settings::{ConfigError, SettingsStore, SETTINGS_FILE_NAME};

pub mod definition;
pub mod panel;

/// Name of the addon's directory under the host's addon folder.
pub const ADDON_DIRECTORY: &str = "MouseLookHandler";

/// Alert shown once after legacy redirect targets were discarded.
pub const LEGACY_RESET_ALERT: &str =
    "MouseLookHandler has reset your redirected keybinds.\nReview your settings.";

/// One loaded instance of the addon.
pub struct Addon {
    host: Arc<dyn AddonHost>,
    settings: SettingsStore,
    controller: Mutex<ActionCamController>,
    formatter: KeybindFormatter,
    game_state: Box<dyn GameStateSource>,
    log_sink: Arc<HostLogSink>,
}

impl Addon {
    /// Initializes logging, loads the settings, and registers the host
    /// callbacks.
    ///
    /// # Errors
    ///
    /// Fails only if the host cannot name an addon directory; a missing or
    /// malformed settings file falls back to defaults.
    pub fn load(host: Arc<dyn AddonHost>, services: PlatformServices) -> anyhow::Result<Arc<Self>> {
        let directory = host
            .addon_directory(ADDON_DIRECTORY)
            .ok_or(ConfigError::NoAddonDirectory)
            .context("resolving the settings location")?;

        let log_sink = logging::shared_sink();
        logging::install(Arc::clone(&log_sink));
        log_sink.attach(Arc::clone(&host));

        let (settings, legacy_targets_reset) = SettingsStore::open(directory.join(SETTINGS_FILE_NAME));

        if legacy_targets_reset {
            warn!(path = %settings.path().display(), "legacy redirect targets discarded");
            if let Err(e) = settings.save() {
                warn!(error = %e, "failed to rewrite settings after legacy reset");
            }
            host.send_alert(LEGACY_RESET_ALERT);
        }

        let PlatformServices {
            sink,
            layout,
            cursor,
        } = services;
        let addon = Arc::new(Self {
            game_state: Box::new(HostDataLinks::new(Arc::clone(&host))),
            formatter: KeybindFormatter::new(Arc::clone(&layout)),
            controller: Mutex::new(ActionCamController::new(sink, layout, cursor)),
            settings,
            host,
            log_sink,
        });

        addon.host.register(Arc::clone(&addon) as Arc<dyn AddonHooks>);
        info!(version = %definition::definition().version, "addon loaded");
        Ok(addon)
    }

    /// Releases anything still held down, deregisters the callbacks, and
    /// detaches from the host log.
    pub fn unload(&self) {
        self.lock_controller().release_all();
        self.host.deregister();
        info!("addon unloaded");
        self.log_sink.detach();
    }

    pub fn settings_store(&self) -> &SettingsStore {
        &self.settings
    }

    /// `true` while the disable keybind is held on the player's behalf.
    pub fn action_cam_controlled(&self) -> bool {
        self.lock_controller().action_cam_controlled()
    }

    pub fn overriding_disable(&self) -> bool {
        self.lock_controller().overriding_disable()
    }

    pub(crate) fn lock_controller(&self) -> MutexGuard<'_, ActionCamController> {
        self.controller.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AddonHooks for Addon {
    fn render(&self) {
        let Some(snapshot) = self.game_state.snapshot() else {
            return;
        };
        let settings = self.settings.snapshot();
        self.lock_controller().tick(&settings, &snapshot);
    }

    fn wnd_proc(&self, window: WindowHandle, msg: u32, wparam: usize, lparam: isize) -> u32 {
        let message = WindowMessage::decode(msg, wparam, lparam);
        let settings = self.settings.snapshot();
        self.lock_controller()
            .filter(&settings, window, message)
            .host_code(msg)
    }
}
