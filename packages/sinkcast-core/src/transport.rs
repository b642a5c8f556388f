//! Trait abstraction over the native sink transport.
//!
//! The coordinator never talks to a bus or wire protocol directly; it issues
//! one-way control operations against [`SinkTransport`] and learns about
//! outcomes exclusively through asynchronous [`SinkEvent`](crate::events::SinkEvent)s
//! pushed back by the transport. This enables dependency injection for
//! testability and lets any concrete transport (bus bindings, a network
//! protocol client, a simulator) plug in behind the same seam.

use async_trait::async_trait;
use thiserror::Error;

/// Errors a transport implementation may report for a single operation.
///
/// These never propagate to the coordinator's callers: the command worker
/// logs them and continues with the next queued command.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying bus/session connection failed or is not established.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The remote sink rejected the operation.
    #[error("operation rejected by sink: {0}")]
    Rejected(String),

    /// An I/O level failure occurred while issuing the operation.
    #[error("transport I/O failed: {0}")]
    Io(String),
}

/// Convenient Result alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// One-way control operations the coordinator requires from its transport.
///
/// All methods are fire-commands with no synchronous acknowledgment beyond
/// the `Result`: completion and readiness are inferred from later events
/// (e.g. a sink is usable only once the transport pushes `Ready` for it).
///
/// Used by [`CommandQueue`](crate::services::CommandQueue), which guarantees
/// these methods are never invoked concurrently: the queue's single worker is
/// the exclusive caller, so implementations need no internal command-ordering
/// logic of their own.
#[async_trait]
pub trait SinkTransport: Send + Sync {
    /// Starts up the transport and announces this source under `identity`.
    ///
    /// Issued once, before any other operation, when the player is created.
    async fn prepare(&self, identity: &str) -> TransportResult<()>;

    /// Configures the audio source the transport will stream from.
    async fn set_data_source(&self, path: &str) -> TransportResult<()>;

    /// Adds a sink to receive audio.
    ///
    /// # Arguments
    /// * `name` - Stable unique identifier of the sink (from a `Found` event)
    /// * `path` - Addressing string for the sink's remote interface
    /// * `port` - Transport endpoint identifier
    async fn add_sink(&self, name: &str, path: &str, port: u16) -> TransportResult<()>;

    /// Removes a previously added sink.
    async fn remove_sink(&self, name: &str) -> TransportResult<()>;

    /// Starts sending audio to all added sinks.
    async fn start(&self) -> TransportResult<()>;

    /// Pauses sending audio.
    async fn pause(&self) -> TransportResult<()>;

    /// Stops sending audio.
    async fn stop(&self) -> TransportResult<()>;

    /// Stops sending audio and resets transport-side streaming state.
    async fn reset(&self) -> TransportResult<()>;

    /// Changes the volume on all added sinks.
    ///
    /// The sink volume model is single-channel; `volume` is in `[0.0, 1.0]`.
    async fn change_volume(&self, volume: f32) -> TransportResult<()>;

    /// Mutes all added sinks.
    async fn mute(&self) -> TransportResult<()>;

    /// Requests re-discovery of available sinks.
    ///
    /// Discovered sinks surface as `Found` events.
    async fn refresh_sinks(&self) -> TransportResult<()>;

    /// Releases the transport and shuts down the session.
    ///
    /// Terminal: no operation is issued after this one.
    async fn release(&self) -> TransportResult<()>;
}
