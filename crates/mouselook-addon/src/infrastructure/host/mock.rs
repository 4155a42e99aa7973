//! In-memory addon host for tests.
//!
//! Records log lines, alerts and (de)registration, serves data links from a
//! map the test fills in, and hands back the registered [`AddonHooks`] so a
//! test can play the host's part and call `render`/`wnd_proc` itself.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::{AddonHooks, AddonHost, LogLevel};

/// One recorded `log` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: LogLevel,
    pub channel: String,
    pub message: String,
}

/// Test double for [`AddonHost`].
#[derive(Default)]
pub struct MockHost {
    /// Root returned (joined with the requested name) by `addon_directory`.
    pub root: Option<PathBuf>,
    pub links: Mutex<HashMap<String, Vec<u8>>>,
    pub log: Mutex<Vec<LogLine>>,
    pub alerts: Mutex<Vec<String>>,
    pub hooks: Mutex<Option<Arc<dyn AddonHooks>>>,
    pub deregistrations: Mutex<usize>,
}

impl MockHost {
    /// A host without an addon directory.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self {
            root: Some(root),
            ..Self::default()
        }
    }

    pub fn set_data_link(&self, id: &str, bytes: Vec<u8>) {
        self.links.lock().unwrap().insert(id.to_string(), bytes);
    }

    pub fn logs(&self) -> Vec<LogLine> {
        self.log.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    /// The currently registered callbacks, if any.
    pub fn hooks(&self) -> Option<Arc<dyn AddonHooks>> {
        self.hooks.lock().unwrap().clone()
    }

    pub fn deregistrations(&self) -> usize {
        *self.deregistrations.lock().unwrap()
    }
}

impl AddonHost for MockHost {
    fn addon_directory(&self, name: &str) -> Option<PathBuf> {
        self.root.as_ref().map(|root| root.join(name))
    }

    fn read_data_link(&self, id: &str, buf: &mut [u8]) -> Option<usize> {
        let links = self.links.lock().unwrap();
        let bytes = links.get(id)?;
        let n = bytes.len().min(buf.len());
        buf[..n].copy_from_slice(&bytes[..n]);
        Some(n)
    }

    fn register(&self, hooks: Arc<dyn AddonHooks>) {
        *self.hooks.lock().unwrap() = Some(hooks);
    }

    fn deregister(&self) {
        *self.hooks.lock().unwrap() = None;
        *self.deregistrations.lock().unwrap() += 1;
    }

    fn log(&self, level: LogLevel, channel: &str, message: &str) {
        self.log.lock().unwrap().push(LogLine {
            level,
            channel: channel.to_string(),
            message: message.to_string(),
        });
    }

    fn send_alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}
