//! JSON persistence of [`Settings`].
//!
//! The settings live in `<addon dir>/MouseLookHandler/settings.json` as one
//! flat object:
//!
//! ```json
//! {
//! 	"DAC_KEY": 59,
//! 	"DAC_ALT": false,
//! 	"DAC_CTRL": false,
//! 	"DAC_SHIFT": false,
//! 	"OD_KEY": 42,
//! 	"RESET_CURSOR_CENTER": true,
//! 	"REDIRECT_LEFTCLICK": true,
//! 	"LC_KEY": 45
//! }
//! ```
//!
//! Keybinds are spread over four keys each (`*_KEY`, `*_ALT`, `*_CTRL`,
//! `*_SHIFT`).  Missing or `null` keys take their defaults and unknown keys
//! are ignored, so files written by older or newer builds still load.
//!
//! # Legacy redirect targets
//!
//! The game-bind build of the addon stored click targets as
//! `REDIRECT_LEFTCLICK_TARGET` / `REDIRECT_RIGHTCLICK_TARGET` identifiers,
//! which have no keybind equivalent.  When either is present the load reports
//! it so the caller can tell the user and rewrite the file without them.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use mouselook_core::{Keybind, Settings};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// File name inside the addon's directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("host did not provide an addon directory")]
    NoAddonDirectory,

    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),
}

// ── On-disk document ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct SettingsDocument {
    #[serde(rename = "DAC_KEY")]
    dac_key: u16,
    #[serde(rename = "DAC_ALT")]
    dac_alt: bool,
    #[serde(rename = "DAC_CTRL")]
    dac_ctrl: bool,
    #[serde(rename = "DAC_SHIFT")]
    dac_shift: bool,

    #[serde(rename = "OD_KEY")]
    od_key: u16,
    #[serde(rename = "OD_ALT")]
    od_alt: bool,
    #[serde(rename = "OD_CTRL")]
    od_ctrl: bool,
    #[serde(rename = "OD_SHIFT")]
    od_shift: bool,

    #[serde(rename = "RESET_CURSOR_CENTER")]
    reset_cursor_center: bool,
    #[serde(rename = "ENABLE_WHILE_MOVING")]
    enable_while_moving: bool,
    #[serde(rename = "ENABLE_DURING_COMBAT")]
    enable_during_combat: bool,
    #[serde(rename = "ENABLE_ON_MOUNT")]
    enable_on_mount: bool,

    #[serde(rename = "REDIRECT_LEFTCLICK")]
    redirect_leftclick: bool,
    #[serde(rename = "LC_KEY")]
    lc_key: u16,
    #[serde(rename = "LC_ALT")]
    lc_alt: bool,
    #[serde(rename = "LC_CTRL")]
    lc_ctrl: bool,
    #[serde(rename = "LC_SHIFT")]
    lc_shift: bool,

    #[serde(rename = "REDIRECT_RIGHTCLICK")]
    redirect_rightclick: bool,
    #[serde(rename = "RC_KEY")]
    rc_key: u16,
    #[serde(rename = "RC_ALT")]
    rc_alt: bool,
    #[serde(rename = "RC_CTRL")]
    rc_ctrl: bool,
    #[serde(rename = "RC_SHIFT")]
    rc_shift: bool,

    #[serde(rename = "REDIRECT_LEFTCLICK_TARGET", skip_serializing)]
    legacy_left_target: Option<serde_json::Value>,
    #[serde(rename = "REDIRECT_RIGHTCLICK_TARGET", skip_serializing)]
    legacy_right_target: Option<serde_json::Value>,
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for SettingsDocument {
    fn from(s: &Settings) -> Self {
        Self {
            dac_key: s.disable_action_cam.key,
            dac_alt: s.disable_action_cam.alt,
            dac_ctrl: s.disable_action_cam.ctrl,
            dac_shift: s.disable_action_cam.shift,
            od_key: s.override_disable.key,
            od_alt: s.override_disable.alt,
            od_ctrl: s.override_disable.ctrl,
            od_shift: s.override_disable.shift,
            reset_cursor_center: s.reset_cursor_to_center,
            enable_while_moving: s.enable_while_moving,
            enable_during_combat: s.enable_in_combat,
            enable_on_mount: s.enable_on_mount,
            redirect_leftclick: s.redirect_left_click,
            lc_key: s.left_click_target.key,
            lc_alt: s.left_click_target.alt,
            lc_ctrl: s.left_click_target.ctrl,
            lc_shift: s.left_click_target.shift,
            redirect_rightclick: s.redirect_right_click,
            rc_key: s.right_click_target.key,
            rc_alt: s.right_click_target.alt,
            rc_ctrl: s.right_click_target.ctrl,
            rc_shift: s.right_click_target.shift,
            legacy_left_target: None,
            legacy_right_target: None,
        }
    }
}

impl SettingsDocument {
    fn has_legacy_targets(&self) -> bool {
        self.legacy_left_target.is_some() || self.legacy_right_target.is_some()
    }

    fn to_settings(&self) -> Settings {
        let keybind = |key, alt, ctrl, shift| Keybind {
            key,
            alt,
            ctrl,
            shift,
        };
        let mut settings = Settings {
            disable_action_cam: keybind(self.dac_key, self.dac_alt, self.dac_ctrl, self.dac_shift),
            override_disable: keybind(self.od_key, self.od_alt, self.od_ctrl, self.od_shift),
            reset_cursor_to_center: self.reset_cursor_center,
            enable_while_moving: self.enable_while_moving,
            enable_in_combat: self.enable_during_combat,
            enable_on_mount: self.enable_on_mount,
            redirect_left_click: self.redirect_leftclick,
            left_click_target: keybind(self.lc_key, self.lc_alt, self.lc_ctrl, self.lc_shift),
            redirect_right_click: self.redirect_rightclick,
            right_click_target: keybind(self.rc_key, self.rc_alt, self.rc_ctrl, self.rc_shift),
        };
        let defaults = Settings::default();
        if self.legacy_left_target.is_some() {
            settings.redirect_left_click = defaults.redirect_left_click;
            settings.left_click_target = defaults.left_click_target;
        }
        if self.legacy_right_target.is_some() {
            settings.redirect_right_click = defaults.redirect_right_click;
            settings.right_click_target = defaults.right_click_target;
        }
        settings
    }
}

// ── Load / save ───────────────────────────────────────────────────────────────

/// Result of reading the settings file.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSettings {
    pub settings: Settings,
    /// Game-bind redirect targets were found and discarded.
    pub legacy_targets_reset: bool,
}

/// Parses a settings document.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if `content` is not a JSON object of the
/// expected field types.
pub fn parse_settings(content: &str) -> Result<LoadedSettings, ConfigError> {
    let mut value: serde_json::Value = serde_json::from_str(content).map_err(ConfigError::Parse)?;
    // A null key counts as missing and keeps its default.
    if let Some(object) = value.as_object_mut() {
        object.retain(|_, v| !v.is_null());
    }
    let document: SettingsDocument = serde_json::from_value(value).map_err(ConfigError::Parse)?;
    Ok(LoadedSettings {
        settings: document.to_settings(),
        legacy_targets_reset: document.has_legacy_targets(),
    })
}

/// Serializes `settings` as tab-indented JSON.
///
/// # Errors
///
/// Returns [`ConfigError::Serialize`] if serialization fails.
pub fn render_settings(settings: &Settings) -> Result<String, ConfigError> {
    let document = SettingsDocument::from(settings);
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document
        .serialize(&mut serializer)
        .map_err(ConfigError::Serialize)?;
    buf.push(b'\n');
    // serde_json only ever emits UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Loads settings from `path`, returning defaults if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the JSON is malformed.
pub fn load_settings(path: &Path) -> Result<LoadedSettings, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_settings(&content),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(LoadedSettings {
            settings: Settings::default(),
            legacy_targets_reset: false,
        }),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `settings` to `path`, replacing the whole file.
///
/// Creates the parent directory if needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let content = render_settings(settings)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// The process-wide settings, guarded by one mutex that is held across every
/// file read and write.
pub struct SettingsStore {
    path: PathBuf,
    settings: Mutex<Settings>,
}

impl SettingsStore {
    /// Loads the store from `path`.
    ///
    /// Never fails: an unreadable or malformed file is logged and replaced
    /// by defaults in memory (the file itself is left alone).  The returned
    /// flag is `true` when legacy redirect targets were discarded.
    pub fn open(path: PathBuf) -> (Self, bool) {
        let (settings, legacy) = match load_settings(&path) {
            Ok(loaded) => {
                info!(path = %path.display(), "settings loaded");
                (loaded.settings, loaded.legacy_targets_reset)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "settings could not be loaded, using defaults");
                (Settings::default(), false)
            }
        };
        let store = Self {
            path,
            settings: Mutex::new(settings),
        };
        (store, legacy)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current settings.
    pub fn snapshot(&self) -> Settings {
        *self.lock()
    }

    /// Applies `change` and persists the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be written; the in-memory
    /// change is kept either way.
    pub fn update<F>(&self, change: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut Settings),
    {
        let mut guard = self.lock();
        change(&mut guard);
        save_settings(&self.path, &guard)
    }

    /// Persists the current settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let guard = self.lock();
        save_settings(&self.path, &guard)
    }

    fn lock(&self) -> MutexGuard<'_, Settings> {
        // Settings is plain data; a panic elsewhere cannot leave it torn.
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
