//! Infrastructure layer for the addon.
//!
//! Contains the host-facing adapters: Win32 message posting and key names,
//! the addon host's callbacks, data links and log, and settings storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `mouselook_core`, but MUST NOT be imported by the `application` layer
//! outside of tests.

pub mod host;
pub mod input_emulation;
pub mod storage;
