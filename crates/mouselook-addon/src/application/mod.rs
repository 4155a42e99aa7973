//! Application layer: the input-redirection state machine.
//!
//! - **`encoder`** – Posts ordered key-down/key-up bursts for a keybind,
//!   with a short pause around each modifier.  Delivery goes through the
//!   `KeystrokeSink` trait.
//!
//! - **`controller`** – `ActionCamController`, the context object that owns
//!   the runtime state shared by the two host callbacks.
//!
//! - **`activation`** – The per-frame tick: edge-triggered press/release of
//!   the disable keybind and cursor re-centering.
//!
//! - **`interceptor`** – The per-message filter: click redirection, the
//!   override hotkey, and capture-mode consumption.
//!
//! - **`capture`** – Keybind capture sessions and how they resolve.

pub mod activation;
pub mod capture;
pub mod controller;
pub mod encoder;
pub mod interceptor;
