//! Decoding of the two shared-memory data links the host exposes.
//!
//! - **Nexus link** (`DL_NEXUS_LINK`): host-computed flags, of which only
//!   `IsMoving` is used.
//! - **Mumble link** (`DL_MUMBLE_LINK`): the game's MumbleLink block.  Its
//!   256-byte context area carries the UI state bitfield and the mount index.
//!
//! Fields are read at fixed byte offsets from little-endian slices, so the
//! decoder never casts host memory to a Rust struct.

use thiserror::Error;

use crate::domain::game_state::GameSnapshot;

pub const NEXUS_LINK: &str = "DL_NEXUS_LINK";
pub const MUMBLE_LINK: &str = "DL_MUMBLE_LINK";

// ── Nexus link layout ─────────────────────────────────────────────────────────
// u32 Width, u32 Height, f32 Scaling, bool IsMoving, bool IsCameraMoving, bool IsGameplay

pub const NEXUS_IS_MOVING_OFFSET: usize = 12;
pub const NEXUS_LINK_MIN_LEN: usize = NEXUS_IS_MOVING_OFFSET + 1;

// ── Mumble link layout ────────────────────────────────────────────────────────

/// Start of the game context inside the MumbleLink block.
pub const MUMBLE_CONTEXT_OFFSET: usize = 1108;
pub const MUMBLE_CONTEXT_LEN: usize = 256;
/// `uiState` (u32) inside the context.
pub const CONTEXT_UI_STATE_OFFSET: usize = 48;
/// `mountIndex` (u8) inside the context.
pub const CONTEXT_MOUNT_INDEX_OFFSET: usize = 84;
pub const MUMBLE_LINK_MIN_LEN: usize = MUMBLE_CONTEXT_OFFSET + CONTEXT_MOUNT_INDEX_OFFSET + 1;

#[derive(Debug, Error, PartialEq)]
pub enum DataLinkError {
    #[error("{link} too short: need at least {needed} bytes, got {available}")]
    InsufficientData {
        link: &'static str,
        needed: usize,
        available: usize,
    },
}

/// The game's `uiState` bitfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiState(pub u32);

impl UiState {
    pub const MAP_OPEN: u32 = 1 << 0;
    pub const COMPASS_TOP_RIGHT: u32 = 1 << 1;
    pub const COMPASS_ROTATION: u32 = 1 << 2;
    pub const GAME_HAS_FOCUS: u32 = 1 << 3;
    pub const COMPETITIVE: u32 = 1 << 4;
    pub const TEXTBOX_HAS_FOCUS: u32 = 1 << 5;
    pub const IN_COMBAT: u32 = 1 << 6;

    pub fn is_map_open(&self) -> bool {
        self.0 & Self::MAP_OPEN != 0
    }

    pub fn game_has_focus(&self) -> bool {
        self.0 & Self::GAME_HAS_FOCUS != 0
    }

    pub fn is_in_combat(&self) -> bool {
        self.0 & Self::IN_COMBAT != 0
    }
}

/// Reads the movement flag from the Nexus link.
///
/// # Errors
///
/// Returns [`DataLinkError::InsufficientData`] if `nexus` is shorter than
/// [`NEXUS_LINK_MIN_LEN`].
pub fn decode_is_moving(nexus: &[u8]) -> Result<bool, DataLinkError> {
    require(NEXUS_LINK, nexus, NEXUS_LINK_MIN_LEN)?;
    Ok(nexus[NEXUS_IS_MOVING_OFFSET] != 0)
}

/// Reads `(uiState, mountIndex)` from the Mumble link.
///
/// # Errors
///
/// Returns [`DataLinkError::InsufficientData`] if `mumble` is shorter than
/// [`MUMBLE_LINK_MIN_LEN`].
pub fn decode_context(mumble: &[u8]) -> Result<(UiState, u8), DataLinkError> {
    require(MUMBLE_LINK, mumble, MUMBLE_LINK_MIN_LEN)?;
    let ui_at = MUMBLE_CONTEXT_OFFSET + CONTEXT_UI_STATE_OFFSET;
    let ui_state = u32::from_le_bytes([
        mumble[ui_at],
        mumble[ui_at + 1],
        mumble[ui_at + 2],
        mumble[ui_at + 3],
    ]);
    let mount_index = mumble[MUMBLE_CONTEXT_OFFSET + CONTEXT_MOUNT_INDEX_OFFSET];
    Ok((UiState(ui_state), mount_index))
}

/// Combines both links into one [`GameSnapshot`].
///
/// # Errors
///
/// Returns [`DataLinkError`] if either slice is too short.
pub fn decode_snapshot(nexus: &[u8], mumble: &[u8]) -> Result<GameSnapshot, DataLinkError> {
    let is_moving = decode_is_moving(nexus)?;
    let (ui, mount_index) = decode_context(mumble)?;
    Ok(GameSnapshot {
        is_moving,
        is_in_combat: ui.is_in_combat(),
        mount_index,
        is_map_open: ui.is_map_open(),
        is_game_focused: ui.game_has_focus(),
    })
}

fn require(link: &'static str, bytes: &[u8], needed: usize) -> Result<(), DataLinkError> {
    if bytes.len() < needed {
        return Err(DataLinkError::InsufficientData {
            link,
            needed,
            available: bytes.len(),
        });
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
