//! Core session state and configuration.
//!
//! [`SessionState`] is the single source of truth for the client-visible
//! streaming state of one player instance: whether network streaming is
//! active, how many sinks are enabled, the current data source, the logical
//! network play/pause phase, and per-sink readiness as reported by transport
//! events.

use std::hash::Hash;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};

/// Configuration for the SinkCast session coordinator.
///
/// All fields have sensible defaults.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Identity string announced to the transport in the initial prepare.
    pub identity: String,

    /// File suffixes eligible for network streaming.
    ///
    /// Sources whose path ends with one of these suffixes are forwarded to
    /// the transport on `set_data_source`; everything else plays locally
    /// only. The transport streams raw wave data, hence the default.
    pub streamable_extensions: Vec<String>,

    /// Capacity of the registry display-change broadcast channel.
    pub registry_channel_capacity: usize,
}

impl Config {
    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.identity.is_empty() {
            return Err("identity must not be empty".to_string());
        }
        if self.registry_channel_capacity == 0 {
            return Err(
                "registry_channel_capacity must be >= 1 (broadcast::channel panics on 0)"
                    .to_string(),
            );
        }
        Ok(())
    }

    /// Returns whether `path` names a source that can stream over the network.
    #[must_use]
    pub fn is_streamable(&self, path: &str) -> bool {
        self.streamable_extensions
            .iter()
            .any(|ext| path.ends_with(ext.as_str()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            identity: "sinkcast.audio.streaming".to_string(),
            streamable_extensions: vec![".wav".to_string()],
            registry_channel_capacity: 100,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Runtime State
// ─────────────────────────────────────────────────────────────────────────────

/// Readiness of a single enabled sink, as reported by transport events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkStatus {
    /// Add was requested; no `Ready` event received yet.
    Pending,
    /// The sink signalled it is configured and ready to receive audio.
    Ready,
    /// The sink signalled a failure while being added.
    Failed,
}

/// Runtime state for one player instance.
///
/// # Concurrency design
///
/// - The enabled-sink count sits behind a `Mutex` so increments and
///   floor-zero decrements are atomic with respect to each other.
/// - `sink_statuses` uses `DashMap` for fine-grained concurrent access keyed
///   by sink name: the event dispatcher writes while callers read.
/// - Streaming mode is derived from the count rather than stored, so the
///   invariant "streaming iff at least one enabled sink" holds by
///   construction.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Number of sinks currently enabled for playback.
    enabled_sinks: Mutex<usize>,
    /// Currently configured audio source, if any.
    data_source: RwLock<Option<String>>,
    /// Logical play/pause state of the network path.
    playing_over_network: AtomicBool,
    /// Map of sink name to readiness reported by transport events.
    pub sink_statuses: DashMap<String, SinkStatus>,
}

impl SessionState {
    /// Creates an idle session: no source, no sinks, not playing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a newly enabled sink. Returns the updated count.
    pub fn sink_enabled(&self) -> usize {
        let mut count = self.enabled_sinks.lock();
        *count += 1;
        *count
    }

    /// Records a disabled sink, never going below zero. Returns the updated count.
    pub fn sink_disabled(&self) -> usize {
        let mut count = self.enabled_sinks.lock();
        *count = count.saturating_sub(1);
        *count
    }

    /// Returns the number of currently enabled sinks.
    #[must_use]
    pub fn enabled_sink_count(&self) -> usize {
        *self.enabled_sinks.lock()
    }

    /// Returns whether playback is routed to network sinks.
    ///
    /// True iff at least one sink is enabled.
    #[must_use]
    pub fn streaming_over_network(&self) -> bool {
        self.enabled_sink_count() > 0
    }

    /// Records the configured data source.
    pub fn set_data_source(&self, path: &str) {
        *self.data_source.write() = Some(path.to_string());
    }

    /// Returns the configured data source, if any.
    #[must_use]
    pub fn data_source(&self) -> Option<String> {
        self.data_source.read().clone()
    }

    /// Returns whether a non-empty data source has been configured.
    #[must_use]
    pub fn has_data_source(&self) -> bool {
        self.data_source
            .read()
            .as_deref()
            .is_some_and(|p| !p.is_empty())
    }

    /// Sets the logical play/pause state of the network path.
    pub fn set_playing_over_network(&self, playing: bool) {
        self.playing_over_network.store(playing, Ordering::SeqCst);
    }

    /// Returns the logical play/pause state of the network path.
    #[must_use]
    pub fn is_playing_over_network(&self) -> bool {
        self.playing_over_network.load(Ordering::SeqCst)
    }

    /// Returns the recorded readiness of a sink, if any.
    #[must_use]
    pub fn sink_status(&self, name: &str) -> Option<SinkStatus> {
        self.sink_statuses.get(name).map(|s| *s)
    }

    /// Serializes the current state to JSON for UI snapshots.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "dataSource": *self.data_source.read(),
            "enabledSinkCount": self.enabled_sink_count(),
            "streamingOverNetwork": self.streaming_over_network(),
            "playingOverNetwork": self.is_playing_over_network(),
            "sinkStatuses": dashmap_to_json(&self.sink_statuses),
        })
    }
}

/// Converts a DashMap to a JSON object map.
fn dashmap_to_json<K, V>(map: &DashMap<K, V>) -> serde_json::Map<String, serde_json::Value>
where
    K: Eq + Hash + Clone + ToString,
    V: Clone + Serialize,
{
    map.iter()
        .map(|r| (r.key().to_string(), json!(r.value().clone())))
        .collect()
}
