//! Forwarding of `tracing` events to the host log.
//!
//! The addon has no console.  Every event that passes the [`EnvFilter`] is
//! formatted as `message key=value ...` and handed to [`AddonHost::log`]
//! under [`LOG_CHANNEL`].
//!
//! The global subscriber can only be installed once per process, while the
//! host may load and unload the addon several times.  The layer therefore
//! writes through a [`HostLogSink`] that each load attaches to its host and
//! each unload detaches again; events raised while detached are dropped.

use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::field::{Field, Visit};
use tracing::{debug, Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use super::{AddonHost, LogLevel, LOG_CHANNEL};

// ── Sink ──────────────────────────────────────────────────────────────────────

/// Where formatted log lines go; empty until a host is attached.
#[derive(Default)]
pub struct HostLogSink {
    host: Mutex<Option<Arc<dyn AddonHost>>>,
}

impl HostLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, host: Arc<dyn AddonHost>) {
        *self.lock() = Some(host);
    }

    pub fn detach(&self) {
        *self.lock() = None;
    }

    pub fn is_attached(&self) -> bool {
        self.lock().is_some()
    }

    /// Writes one line, or drops it while detached.
    pub fn write(&self, level: LogLevel, message: &str) {
        // Clone out so the host call runs without the lock held.
        let host = self.lock().clone();
        if let Some(host) = host {
            host.log(level, LOG_CHANNEL, message);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<dyn AddonHost>>> {
        self.host.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The sink wired into the process-wide subscriber.
pub fn shared_sink() -> Arc<HostLogSink> {
    static SINK: OnceLock<Arc<HostLogSink>> = OnceLock::new();
    Arc::clone(SINK.get_or_init(|| Arc::new(HostLogSink::new())))
}

// ── Layer ─────────────────────────────────────────────────────────────────────

/// A `tracing_subscriber` layer that writes every event to a [`HostLogSink`].
pub struct HostLogLayer {
    sink: Arc<HostLogSink>,
}

impl HostLogLayer {
    pub fn new(sink: Arc<HostLogSink>) -> Self {
        Self { sink }
    }
}

impl<S: Subscriber> Layer<S> for HostLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        self.sink
            .write(host_level(event.metadata().level()), &visitor.finish());
    }
}

/// Maps a `tracing` level onto the host's severity scale.
pub fn host_level(level: &Level) -> LogLevel {
    if *level == Level::ERROR {
        LogLevel::Critical
    } else if *level == Level::WARN {
        LogLevel::Warning
    } else if *level == Level::INFO {
        LogLevel::Info
    } else if *level == Level::DEBUG {
        LogLevel::Debug
    } else {
        LogLevel::Trace
    }
}

/// Collects the `message` field and appends the other fields as `key=value`.
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl LineVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            format!("{}{}", self.message, self.fields)
        }
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

// ── Installation ──────────────────────────────────────────────────────────────

/// Installs the global subscriber: an [`EnvFilter`] (default `info`,
/// overridden by `RUST_LOG`) in front of a [`HostLogLayer`] over `sink`.
///
/// Returns `false` if a global subscriber already exists, which is the case
/// on every load after the first.
pub fn install(sink: Arc<HostLogSink>) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(HostLogLayer::new(sink))
        .try_init()
        .is_ok();
    if !installed {
        debug!("global subscriber already installed, keeping it");
    }
    installed
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use tracing::{info, warn};
    use tracing_subscriber::layer::SubscriberExt;

    use super::*;
    use crate::infrastructure::host::mock::MockHost;

    fn with_layer<F: FnOnce()>(sink: Arc<HostLogSink>, f: F) {
        let subscriber = tracing_subscriber::registry().with(HostLogLayer::new(sink));
        tracing::subscriber::with_default(subscriber, f);
    }

    #[test]
    fn test_event_is_forwarded_with_channel_and_level() {
        // Arrange
        let host = Arc::new(MockHost::new());
        let sink = Arc::new(HostLogSink::new());
        sink.attach(host.clone());

        // Act
        with_layer(sink, || warn!("settings could not be parsed"));

        // Assert
        let logs = host.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].level, LogLevel::Warning);
        assert_eq!(logs[0].channel, LOG_CHANNEL);
        assert_eq!(logs[0].message, "settings could not be parsed");
    }

    #[test]
    fn test_fields_are_appended_as_key_value_pairs() {
        let host = Arc::new(MockHost::new());
        let sink = Arc::new(HostLogSink::new());
        sink.attach(host.clone());

        with_layer(sink, || info!(slot = "OverrideDisable", key = 42, "keybind captured"));

        assert_eq!(
            host.logs()[0].message,
            "keybind captured slot=OverrideDisable key=42"
        );
    }

    #[test]
    fn test_detached_sink_drops_events() {
        // Arrange
        let host = Arc::new(MockHost::new());
        let sink = Arc::new(HostLogSink::new());
        sink.attach(host.clone());
        sink.detach();

        // Act
        with_layer(sink.clone(), || info!("after unload"));

        // Assert
        assert!(!sink.is_attached());
        assert!(host.logs().is_empty());
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(host_level(&Level::ERROR), LogLevel::Critical);
        assert_eq!(host_level(&Level::WARN), LogLevel::Warning);
        assert_eq!(host_level(&Level::INFO), LogLevel::Info);
        assert_eq!(host_level(&Level::DEBUG), LogLevel::Debug);
        assert_eq!(host_level(&Level::TRACE), LogLevel::Trace);
    }

    #[test]
    fn test_shared_sink_is_one_instance() {
        assert!(Arc::ptr_eq(&shared_sink(), &shared_sink()));
    }
}
