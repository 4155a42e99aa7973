//! [`GameStateSource`] over the host's data links.

use std::sync::Arc;

use mouselook_core::protocol::data_link::{
    decode_snapshot, MUMBLE_LINK, MUMBLE_LINK_MIN_LEN, NEXUS_LINK, NEXUS_LINK_MIN_LEN,
};
use mouselook_core::GameSnapshot;
use tracing::trace;

use super::AddonHost;
use crate::application::activation::GameStateSource;

/// Copies both links out of host memory each frame and decodes them.
pub struct HostDataLinks {
    host: Arc<dyn AddonHost>,
}

impl HostDataLinks {
    pub fn new(host: Arc<dyn AddonHost>) -> Self {
        Self { host }
    }
}

impl GameStateSource for HostDataLinks {
    fn snapshot(&self) -> Option<GameSnapshot> {
        let mut nexus = [0u8; NEXUS_LINK_MIN_LEN];
        let mut mumble = [0u8; MUMBLE_LINK_MIN_LEN];
        // A host may report the link's full size rather than what it copied.
        let nexus_len = self.host.read_data_link(NEXUS_LINK, &mut nexus)?.min(nexus.len());
        let mumble_len = self.host.read_data_link(MUMBLE_LINK, &mut mumble)?.min(mumble.len());

        match decode_snapshot(&nexus[..nexus_len], &mumble[..mumble_len]) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                trace!(error = %e, "data link not ready");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mouselook_core::protocol::data_link::{
        CONTEXT_MOUNT_INDEX_OFFSET, CONTEXT_UI_STATE_OFFSET, MUMBLE_CONTEXT_OFFSET,
        NEXUS_IS_MOVING_OFFSET,
    };

    use super::*;
    use crate::infrastructure::host::mock::MockHost;

    fn nexus(moving: bool) -> Vec<u8> {
        let mut bytes = vec![0u8; 16];
        bytes[NEXUS_IS_MOVING_OFFSET] = u8::from(moving);
        bytes
    }

    fn mumble(ui_state: u32, mount: u8) -> Vec<u8> {
        let mut bytes = vec![0u8; 5460];
        let ui_at = MUMBLE_CONTEXT_OFFSET + CONTEXT_UI_STATE_OFFSET;
        bytes[ui_at..ui_at + 4].copy_from_slice(&ui_state.to_le_bytes());
        bytes[MUMBLE_CONTEXT_OFFSET + CONTEXT_MOUNT_INDEX_OFFSET] = mount;
        bytes
    }

    #[test]
    fn test_snapshot_decodes_both_links() {
        // Arrange: focused, in combat, mounted on index 3.
        let host = Arc::new(MockHost::new());
        host.set_data_link(NEXUS_LINK, nexus(true));
        host.set_data_link(MUMBLE_LINK, mumble(0b100_1000, 3));
        let links = HostDataLinks::new(host);

        // Act
        let snapshot = links.snapshot().unwrap();

        // Assert
        assert!(snapshot.is_moving);
        assert!(snapshot.is_in_combat);
        assert!(snapshot.is_game_focused);
        assert!(!snapshot.is_map_open);
        assert_eq!(snapshot.mount_index, 3);
    }

    /// Reports the whole link size no matter how small the buffer is.
    struct OverreportingHost(MockHost);

    impl AddonHost for OverreportingHost {
        fn addon_directory(&self, name: &str) -> Option<std::path::PathBuf> {
            self.0.addon_directory(name)
        }

        fn read_data_link(&self, id: &str, buf: &mut [u8]) -> Option<usize> {
            self.0.read_data_link(id, buf)?;
            self.0.links.lock().unwrap().get(id).map(Vec::len)
        }

        fn register(&self, hooks: Arc<dyn crate::infrastructure::host::AddonHooks>) {
            self.0.register(hooks);
        }

        fn deregister(&self) {
            self.0.deregister();
        }

        fn log(&self, level: crate::infrastructure::host::LogLevel, channel: &str, message: &str) {
            self.0.log(level, channel, message);
        }

        fn send_alert(&self, message: &str) {
            self.0.send_alert(message);
        }
    }

    #[test]
    fn test_overreported_length_is_clamped_to_buffer() {
        // Arrange: both links are larger than the decoder's buffers.
        let inner = MockHost::new();
        inner.set_data_link(NEXUS_LINK, nexus(true));
        inner.set_data_link(MUMBLE_LINK, mumble(0b1000, 0));
        let links = HostDataLinks::new(Arc::new(OverreportingHost(inner)));

        // Act
        let snapshot = links.snapshot().unwrap();

        // Assert
        assert!(snapshot.is_moving);
        assert!(snapshot.is_game_focused);
    }

    #[test]
    fn test_missing_link_yields_none() {
        let host = Arc::new(MockHost::new());
        host.set_data_link(NEXUS_LINK, nexus(true));
        assert!(HostDataLinks::new(host).snapshot().is_none());
    }

    #[test]
    fn test_truncated_link_yields_none() {
        let host = Arc::new(MockHost::new());
        host.set_data_link(NEXUS_LINK, vec![0u8; 4]);
        host.set_data_link(MUMBLE_LINK, mumble(0, 0));
        assert!(HostDataLinks::new(host).snapshot().is_none());
    }
}
