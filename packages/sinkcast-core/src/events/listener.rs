//! Listener abstraction for the consuming (UI) layer.
//!
//! The coordinator forwards transport events to at most one registered
//! listener. Listeners depend on this trait rather than on the dispatcher,
//! enabling testing and alternative consumers.

/// Callbacks delivered to the consuming layer for sink lifecycle events.
///
/// All methods have empty default bodies so consumers implement only what
/// they care about. Callbacks run on the dispatcher's task, in event arrival
/// order; implementations should hand off long-running work.
pub trait SinkEventListener: Send + Sync {
    /// A sink was discovered; it is already present in the registry.
    fn sink_found(&self, name: &str, path: &str, friendly_name: &str, port: u16) {
        let _ = (name, path, friendly_name, port);
    }

    /// A sink disappeared; it has already been dropped from the registry.
    fn sink_lost(&self, name: &str) {
        let _ = name;
    }

    /// An added sink is ready to receive audio.
    ///
    /// Consumers that want playback to follow sink availability start or
    /// resume playback here; that policy belongs to the listener, not the
    /// coordinator.
    fn sink_ready(&self, name: &str) {
        let _ = name;
    }

    /// A sink stopped receiving audio. `lost` is true when the sink vanished
    /// rather than being explicitly removed.
    fn sink_removed(&self, name: &str, lost: bool) {
        let _ = (name, lost);
    }

    /// Adding a sink failed; the UI decides remediation (e.g. reverting a
    /// checkbox).
    fn sink_error(&self, name: &str) {
        let _ = name;
    }
}

/// No-op listener for headless use or testing.
pub struct NoopSinkListener;

impl SinkEventListener for NoopSinkListener {}

/// Logging listener for debugging and development.
///
/// Logs every callback at debug level.
pub struct LoggingSinkListener;

impl SinkEventListener for LoggingSinkListener {
    fn sink_found(&self, name: &str, path: &str, friendly_name: &str, port: u16) {
        tracing::debug!(name, path, friendly_name, port, "sink_found");
    }

    fn sink_lost(&self, name: &str) {
        tracing::debug!(name, "sink_lost");
    }

    fn sink_ready(&self, name: &str) {
        tracing::debug!(name, "sink_ready");
    }

    fn sink_removed(&self, name: &str, lost: bool) {
        tracing::debug!(name, lost, "sink_removed");
    }

    fn sink_error(&self, name: &str) {
        tracing::debug!(name, "sink_error");
    }
}
