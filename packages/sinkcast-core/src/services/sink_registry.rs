//! Registry of known network sinks.
//!
//! Tracks the set of sinks the transport has discovered, deduplicated by
//! name with insertion order preserved for display. The event dispatcher
//! writes to it as discovery events arrive; UI layers read snapshots and
//! subscribe to display-change notifications.

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::json;
use tokio::sync::broadcast;

/// One discovered or added network audio endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sink {
    /// Stable unique identifier; the registry's dedup key.
    pub name: String,
    /// Addressing string for the sink's remote interface.
    pub path: String,
    /// Display label, distinct from `name` and UI-facing only.
    pub friendly_name: String,
    /// Transport endpoint identifier.
    pub port: u16,
    /// Whether the user has turned this sink on for playback.
    pub enabled: bool,
}

/// Display-list-changed notification.
///
/// Emitted only when registry membership actually changes; enable/disable
/// flag toggles do not notify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RegistryChange {
    /// A sink entered the registry.
    Added(String),
    /// A sink left the registry.
    Removed(String),
    /// All sinks were dropped (manual refresh).
    Cleared,
}

/// Insertion-ordered, name-deduplicated collection of known sinks.
///
/// # Concurrency design
///
/// A single `RwLock<Vec<_>>` guards the whole collection: it is small (a
/// handful of sinks on a typical network), read as a complete list for
/// display, and mutated one entry at a time. Lookup is a linear scan, which
/// is fine at this cardinality and keeps display order trivial.
pub struct SinkRegistry {
    sinks: RwLock<Vec<Sink>>,
    changes: broadcast::Sender<RegistryChange>,
}

impl SinkRegistry {
    /// Creates an empty registry with the given notification channel capacity.
    pub fn new(change_channel_capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(change_channel_capacity);
        Self {
            sinks: RwLock::new(Vec::new()),
            changes,
        }
    }

    /// Subscribes to display-list-changed notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryChange> {
        self.changes.subscribe()
    }

    /// Adds a sink if its name is not yet present.
    ///
    /// Duplicate names are a membership no-op: the existing entry (including
    /// its `enabled` flag) is kept untouched and no notification fires.
    /// Returns whether the sink was inserted.
    pub fn upsert(&self, sink: Sink) -> bool {
        let mut sinks = self.sinks.write();
        if sinks.iter().any(|s| s.name == sink.name) {
            return false;
        }
        let name = sink.name.clone();
        sinks.push(sink);
        drop(sinks);

        self.notify(RegistryChange::Added(name));
        true
    }

    /// Removes the sink with the given name.
    ///
    /// No-op (and no notification) if absent. Removal also revokes the
    /// sink's `enabled` flag, trivially: the entry is gone.
    pub fn remove(&self, name: &str) -> bool {
        let mut sinks = self.sinks.write();
        let len_before = sinks.len();
        sinks.retain(|s| s.name != name);
        let removed = sinks.len() < len_before;
        drop(sinks);

        if removed {
            self.notify(RegistryChange::Removed(name.to_string()));
        }
        removed
    }

    /// Toggles the `enabled` flag of a sink. Idempotent.
    ///
    /// Returns whether a sink with that name exists.
    pub fn set_enabled(&self, name: &str, enabled: bool) -> bool {
        let mut sinks = self.sinks.write();
        match sinks.iter_mut().find(|s| s.name == name) {
            Some(sink) => {
                sink.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Drops all entries.
    ///
    /// Used on manual refresh before re-populating from new discovery
    /// events. Notifies once, and only if entries were actually dropped.
    pub fn clear(&self) {
        let mut sinks = self.sinks.write();
        let was_empty = sinks.is_empty();
        sinks.clear();
        drop(sinks);

        if !was_empty {
            self.notify(RegistryChange::Cleared);
        }
    }

    /// Returns the sink with the given name, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Sink> {
        self.sinks.read().iter().find(|s| s.name == name).cloned()
    }

    /// Returns whether a sink with the given name is known.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.sinks.read().iter().any(|s| s.name == name)
    }

    /// Returns all sinks in insertion (display) order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Sink> {
        self.sinks.read().clone()
    }

    /// Returns the number of known sinks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.read().len()
    }

    /// Returns whether the registry holds no sinks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.read().is_empty()
    }

    /// Serializes the current display list to JSON for UI snapshots.
    pub fn to_json(&self) -> serde_json::Value {
        json!({ "sinks": *self.sinks.read() })
    }

    fn notify(&self, change: RegistryChange) {
        if let Err(e) = self.changes.send(change) {
            log::trace!("[SinkRegistry] no display subscribers: {}", e);
        }
    }
}
