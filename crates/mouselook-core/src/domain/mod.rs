//! Domain entities with no OS dependencies.

pub mod game_state;
pub mod keybind;
pub mod settings;
