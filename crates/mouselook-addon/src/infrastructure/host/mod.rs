//! The addon host: the overlay process that loads the addon, drives its
//! callbacks, and owns the data links and the log.
//!
//! The addon only ever talks to the host through [`AddonHost`], and the host
//! only ever calls back into the addon through [`AddonHooks`].  The concrete
//! binding to the host's C function table is DLL glue and lives outside this
//! crate; [`mock::MockHost`] stands in for it in tests.

use std::path::PathBuf;
use std::sync::Arc;

use mouselook_core::WindowHandle;

pub mod data_link;
pub mod logging;
pub mod mock;

/// Channel name under which the addon's log lines appear in the host log.
pub const LOG_CHANNEL: &str = "MouseLookHandler";

/// Severity levels understood by the host log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Critical,
    Warning,
    Info,
    Debug,
    Trace,
}

/// Services the host offers to the addon.
pub trait AddonHost: Send + Sync {
    /// Directory reserved for `name` under the host's addon folder.
    fn addon_directory(&self, name: &str) -> Option<PathBuf>;

    /// Copies the current contents of the data link `id` into `buf`.
    ///
    /// Returns the number of bytes copied, or `None` if the link does not
    /// exist (yet).
    fn read_data_link(&self, id: &str, buf: &mut [u8]) -> Option<usize>;

    /// Registers the render and window-procedure callbacks.
    fn register(&self, hooks: Arc<dyn AddonHooks>);

    /// Removes the callbacks registered by [`AddonHost::register`].
    fn deregister(&self);

    fn log(&self, level: LogLevel, channel: &str, message: &str);

    /// Shows a one-off notification to the user.
    fn send_alert(&self, message: &str);
}

/// Callbacks the host invokes on its main thread.
pub trait AddonHooks: Send + Sync {
    /// Once per rendered frame.
    fn render(&self);

    /// For every message sent to the game window.  Zero suppresses the
    /// message; any other value lets the host continue default processing.
    fn wnd_proc(&self, window: WindowHandle, msg: u32, wparam: usize, lparam: isize) -> u32;
}
