//! Per-frame view of the game and UI state the activation logic depends on.

/// Immutable sample of the environment taken once per render tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameSnapshot {
    pub is_moving: bool,
    pub is_in_combat: bool,
    /// Mount index reported by the game, `0` when on foot.
    pub mount_index: u8,
    pub is_map_open: bool,
    pub is_game_focused: bool,
}

impl GameSnapshot {
    pub fn is_mounted(&self) -> bool {
        self.mount_index != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_default_is_idle_and_unfocused() {
        let snap = GameSnapshot::default();
        assert!(!snap.is_moving);
        assert!(!snap.is_mounted());
        assert!(!snap.is_game_focused);
    }

    #[test]
    fn test_any_nonzero_mount_index_counts_as_mounted() {
        let snap = GameSnapshot {
            mount_index: 5,
            ..GameSnapshot::default()
        };
        assert!(snap.is_mounted());
    }
}
