//! MouseLookHandler addon library entry point.
//!
//! Builds as a `cdylib` for the host and as an `rlib` so integration tests
//! in `tests/` can drive [`addon::Addon`] through the mock host and the mock
//! input adapters.
//!
//! # Layers
//!
//! - **`application`** – the input-redirection state machine: keystroke
//!   encoding, the per-frame activation tick, the window-message filter and
//!   keybind capture.
//! - **`infrastructure`** – Win32 input adapters, the addon host seam with
//!   its log forwarding and data links, and settings storage.
//! - **`addon`** – the context object that owns one loaded instance and
//!   answers the host's callbacks and the settings panel.

pub mod addon;
pub mod application;
pub mod infrastructure;

pub use addon::Addon;
