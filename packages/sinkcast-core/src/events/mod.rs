//! Event system for transport-origin sink notifications.
//!
//! This module provides:
//! - [`SinkEvent`], the asynchronous notifications a transport pushes
//! - [`SinkEventSender`], the handle a transport uses to push them
//! - [`SinkEventListener`] for the consuming (UI) layer
//! - [`EventDispatcher`], which applies state updates and forwards events

mod dispatcher;
mod listener;

pub use dispatcher::EventDispatcher;
pub use listener::{LoggingSinkListener, NoopSinkListener, SinkEventListener};

use serde::Serialize;
use tokio::sync::mpsc;

/// Asynchronous notifications pushed by the sink transport.
///
/// Events are delivered to the registered listener in arrival order, on a
/// task owned by the dispatcher, never on the thread that pushed them.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SinkEvent {
    /// A sink was discovered (initially, or after a refresh).
    Found {
        /// Stable unique identifier, used as the dedup key.
        name: String,
        /// Addressing string for the sink's remote interface.
        path: String,
        /// Display label for UI lists.
        #[serde(rename = "friendlyName")]
        friendly_name: String,
        /// Transport endpoint identifier.
        port: u16,
    },
    /// A previously discovered sink disappeared from the network.
    Lost {
        /// The sink's unique identifier.
        name: String,
    },
    /// An added sink is configured and ready to receive audio.
    ///
    /// This is the only acknowledgment of a successful add: consumers that
    /// want playback to begin as soon as a sink comes up typically start or
    /// resume playback from this callback.
    Ready {
        /// The sink's unique identifier.
        name: String,
    },
    /// A sink stopped receiving audio.
    Removed {
        /// The sink's unique identifier.
        name: String,
        /// True when removal was caused by the sink vanishing rather than an
        /// explicit remove; the sink then also leaves the registry.
        lost: bool,
    },
    /// Adding a sink failed on the transport side.
    Error {
        /// The sink's unique identifier.
        name: String,
    },
}

impl SinkEvent {
    /// Returns the name of the sink this event concerns.
    #[must_use]
    pub fn sink_name(&self) -> &str {
        match self {
            Self::Found { name, .. }
            | Self::Lost { name }
            | Self::Ready { name }
            | Self::Removed { name, .. }
            | Self::Error { name } => name,
        }
    }
}

/// Handle a transport implementation uses to push events into the dispatcher.
///
/// Cloneable and cheap; safe to call from any thread, including native
/// callback threads. Events are queued and processed in arrival order.
#[derive(Clone)]
pub struct SinkEventSender {
    tx: mpsc::UnboundedSender<SinkEvent>,
}

impl SinkEventSender {
    pub(crate) fn new(tx: mpsc::UnboundedSender<SinkEvent>) -> Self {
        Self { tx }
    }

    /// Pushes an event to the dispatcher.
    ///
    /// Silently drops the event if the dispatcher has shut down (after
    /// release); late transport callbacks are expected during teardown.
    pub fn send(&self, event: SinkEvent) {
        if let Err(e) = self.tx.send(event) {
            log::trace!("[SinkEvents] dispatcher gone, dropping event: {}", e);
        }
    }
}
