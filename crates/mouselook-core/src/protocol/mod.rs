//! Bit- and byte-level formats exchanged with the game window and the host.
//!
//! - **`keystroke`** – the packed `lParam` of keyboard messages.
//! - **`messages`** – window-message identifiers and their decoded form.
//! - **`data_link`** – fixed-offset readers for the host's shared-memory links.

pub mod data_link;
pub mod keystroke;
pub mod messages;
