//! Transport event dispatch.
//!
//! Responsibilities:
//! - Consuming [`SinkEvent`]s pushed by the transport, in arrival order
//! - Updating the sink registry and session state per event
//! - Forwarding each event to the single registered listener
//!
//! Events are processed on a dedicated spawned task, so listener callbacks
//! never run on the thread that originated the transport callback and are
//! safe for UI state mutation.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;

use crate::runtime::{TaskSpawner, TokioSpawner};
use crate::services::sink_registry::{Sink, SinkRegistry};
use crate::state::{SessionState, SinkStatus};

use super::listener::SinkEventListener;
use super::SinkEvent;

/// Consumes transport events and fans them out to state and the listener.
pub struct EventDispatcher {
    registry: Arc<SinkRegistry>,
    session: Arc<SessionState>,
    /// At most one registered listener; settable after construction, once the
    /// consuming layer exists.
    listener: Arc<RwLock<Option<Arc<dyn SinkEventListener>>>>,
    event_rx: Mutex<Option<mpsc::UnboundedReceiver<SinkEvent>>>,
    spawner: TokioSpawner,
}

impl EventDispatcher {
    /// Creates a new dispatcher draining `event_rx`.
    ///
    /// Call [`start`](Self::start) to begin processing.
    pub fn new(
        registry: Arc<SinkRegistry>,
        session: Arc<SessionState>,
        event_rx: mpsc::UnboundedReceiver<SinkEvent>,
        spawner: TokioSpawner,
    ) -> Self {
        Self {
            registry,
            session,
            listener: Arc::new(RwLock::new(None)),
            event_rx: Mutex::new(Some(event_rx)),
            spawner,
        }
    }

    /// Registers the listener that will receive forwarded events.
    ///
    /// Replaces any previously registered listener; events are only ever
    /// forwarded to the current one.
    pub fn set_listener(&self, listener: Arc<dyn SinkEventListener>) {
        *self.listener.write() = Some(listener);
    }

    /// Spawns the task that drains the event channel.
    ///
    /// Subsequent calls are no-ops (the receiver has been taken). The task
    /// exits when all [`SinkEventSender`](super::SinkEventSender) handles are
    /// dropped.
    pub fn start(&self) {
        let Some(mut rx) = self.event_rx.lock().take() else {
            return;
        };
        let registry = Arc::clone(&self.registry);
        let session = Arc::clone(&self.session);
        let listener = Arc::clone(&self.listener);

        self.spawner.spawn(async move {
            while let Some(event) = rx.recv().await {
                Self::apply(&registry, &session, &event);

                // Clone out of the lock so the callback runs unguarded.
                let current = listener.read().clone();
                if let Some(l) = current {
                    Self::notify(l.as_ref(), &event);
                }
            }
            log::debug!("[EventDispatcher] event channel closed, stopping");
        });
    }

    /// Updates registry and session state for one event, before the listener
    /// sees it.
    fn apply(registry: &SinkRegistry, session: &SessionState, event: &SinkEvent) {
        match event {
            SinkEvent::Found {
                name,
                path,
                friendly_name,
                port,
            } => {
                log::debug!("[EventDispatcher] sink found: {} ({})", name, friendly_name);
                registry.upsert(Sink {
                    name: name.clone(),
                    path: path.clone(),
                    friendly_name: friendly_name.clone(),
                    port: *port,
                    enabled: false,
                });
            }
            SinkEvent::Lost { name } => {
                log::info!("[EventDispatcher] sink lost: {}", name);
                registry.remove(name);
                session.sink_statuses.remove(name);
            }
            SinkEvent::Ready { name } => {
                log::info!("[EventDispatcher] sink ready: {}", name);
                session
                    .sink_statuses
                    .insert(name.clone(), SinkStatus::Ready);
            }
            SinkEvent::Removed { name, lost } => {
                log::info!("[EventDispatcher] sink removed: {} (lost={})", name, lost);
                if *lost {
                    registry.remove(name);
                }
                session.sink_statuses.remove(name);
            }
            SinkEvent::Error { name } => {
                log::warn!("[EventDispatcher] sink error: {}", name);
                session
                    .sink_statuses
                    .insert(name.clone(), SinkStatus::Failed);
            }
        }
    }

    /// Forwards one event to the listener.
    fn notify(listener: &dyn SinkEventListener, event: &SinkEvent) {
        match event {
            SinkEvent::Found {
                name,
                path,
                friendly_name,
                port,
            } => listener.sink_found(name, path, friendly_name, *port),
            SinkEvent::Lost { name } => listener.sink_lost(name),
            SinkEvent::Ready { name } => listener.sink_ready(name),
            SinkEvent::Removed { name, lost } => listener.sink_removed(name, *lost),
            SinkEvent::Error { name } => listener.sink_error(name),
        }
    }
}
