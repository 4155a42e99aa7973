//! # mouselook-core
//!
//! Shared library for the MouseLookHandler addon containing the keybind
//! model, the legacy keystroke parameter packing, window-message decoding,
//! and the data-link decoders that turn host shared memory into a
//! [`GameSnapshot`].
//!
//! It has zero dependencies on OS APIs.  Everything that must ask Windows a
//! question (scan code mapping, key names, modifier state) goes through the
//! [`keymap::KeyboardLayout`] trait, implemented by the addon crate.
//!
//! # Architecture overview
//!
//! The addon watches the player's movement, combat and mount state and,
//! while any of them is active, holds the game's "disable action camera"
//! keybind down on the player's behalf.  This crate provides the pieces that
//! have no side effects:
//!
//! - **`domain`** – The `Keybind` chord, the persisted `Settings` record, and
//!   the per-frame `GameSnapshot`.
//!
//! - **`keymap`** – Virtual-key constants, the platform layout seam, and the
//!   scan-code name table used to render keybinds for display.
//!
//! - **`protocol`** – How bits travel to and from the game window: the packed
//!   keystroke parameter block carried by `WM_KEYDOWN`/`WM_KEYUP`, decoded
//!   window messages, and the fixed-offset layouts of the two data links.

pub mod domain;
pub mod keymap;
pub mod protocol;

pub use domain::game_state::GameSnapshot;
pub use domain::keybind::{Keybind, Modifiers};
pub use domain::settings::{KeybindSlot, Settings};
pub use keymap::names::KeybindFormatter;
pub use keymap::KeyboardLayout;
pub use protocol::keystroke::KeystrokeParams;
pub use protocol::messages::{FilterVerdict, KeyMessage, KeyMessageKind, WindowHandle, WindowMessage};
