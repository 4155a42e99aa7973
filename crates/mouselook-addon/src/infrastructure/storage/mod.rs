//! Storage infrastructure: settings file persistence.
//!
//! The `settings` sub-module reads and writes the addon's JSON settings
//! file, supplies defaults on first run, and owns the process-wide
//! [`settings::SettingsStore`] that every settings mutation goes through.

pub mod settings;
