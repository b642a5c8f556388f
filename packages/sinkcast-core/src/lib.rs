//! SinkCast Core - session coordination for networked audio sinks.
//!
//! This crate provides the core functionality for SinkCast, a playback
//! coordinator that streams one audio source to any number of network
//! sinks while falling back to local output when no sink is enabled. It is
//! designed to be embedded by a concrete transport binding and a host
//! application UI.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`runtime`]: Task spawning abstraction for async runtime independence
//! - [`events`]: Sink lifecycle events and their dispatcher
//! - [`state`]: Core session state and configuration
//! - [`services`]: Command queue, sink registry, and the playback facade
//! - [`transport`]: Network transport seam
//! - [`local`]: Local playback seam
//! - [`error`]: Centralized error types
//!
//! # Abstraction Traits
//!
//! The crate defines several traits to decouple core logic from
//! platform-specific implementations:
//!
//! - [`SinkTransport`](transport::SinkTransport): Network sink control
//! - [`LocalPlayback`](local::LocalPlayback): Device-local audio output
//! - [`SinkEventListener`](events::SinkEventListener): Sink lifecycle callbacks
//! - [`TaskSpawner`](runtime::TaskSpawner): Spawning background tasks
//!
//! Each trait that needs one has a default implementation suitable for
//! headless use; hosts provide their own where it matters.

#![warn(clippy::all)]

pub mod error;
pub mod events;
pub mod local;
pub mod runtime;
pub mod services;
pub mod state;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types at the crate root
pub use error::{ErrorCode, SinkCastError, SinkCastResult};
pub use events::{
    EventDispatcher, LoggingSinkListener, NoopSinkListener, SinkEvent, SinkEventListener,
    SinkEventSender,
};
pub use local::{LocalPlayback, LocalPlaybackError, LocalResult, NullLocalPlayback};
pub use runtime::{TaskSpawner, TokioSpawner};
pub use services::{Command, CommandQueue, RegistryChange, Sink, SinkPlayer, SinkRegistry};
pub use state::{Config, SessionState, SinkStatus};
pub use transport::{SinkTransport, TransportError, TransportResult};
