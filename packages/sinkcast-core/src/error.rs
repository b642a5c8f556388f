//! Centralized error types for the SinkCast core library.
//!
//! This module provides a unified error handling system that:
//! - Defines structured error types using `thiserror`
//! - Separates synchronous usage errors (surfaced to the caller) from
//!   transport failures (isolated inside the command worker)
//! - Exposes machine-readable error codes for UI layers

use thiserror::Error;

use crate::local::LocalPlaybackError;
use crate::transport::TransportError;

/// Trait for error types that provide machine-readable error codes.
///
/// Implement this trait to provide consistent error codes across different
/// error conversion paths.
pub trait ErrorCode {
    /// Returns a machine-readable error code for UI-facing surfaces.
    fn code(&self) -> &'static str;
}

impl ErrorCode for TransportError {
    fn code(&self) -> &'static str {
        match self {
            Self::Connection(_) => "transport_connection_failed",
            Self::Rejected(_) => "transport_operation_rejected",
            Self::Io(_) => "transport_io_failed",
        }
    }
}

impl ErrorCode for LocalPlaybackError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidState(_) => "local_invalid_state",
            Self::Source(_) => "local_source_unavailable",
            Self::Output(_) => "local_output_failed",
        }
    }
}

/// Application-wide error type for the SinkCast session coordinator.
///
/// Only errors that surface synchronously at the public call boundary appear
/// here. Failures of queued transport operations never reach the caller; they
/// are logged by the command worker and observable only through later events.
#[derive(Debug, Error)]
pub enum SinkCastError {
    /// A sink was added before a data source was configured.
    ///
    /// This is a usage error: callers must invoke `set_data_source` before
    /// `add_sink`.
    #[error("no data source set: call set_data_source before adding a sink")]
    NoDataSource,

    /// The player has been released; no further operations are valid.
    #[error("player released: no further operations are valid")]
    Released,

    /// Configuration failed validation (empty identity, zero capacity, etc.).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The local playback path reported a failure during delegation.
    #[error("local playback failed: {0}")]
    Local(#[from] LocalPlaybackError),
}

impl SinkCastError {
    /// Returns a machine-readable error code for UI-facing surfaces.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoDataSource => "no_data_source",
            Self::Released => "released",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Local(_) => "local_playback_failed",
        }
    }
}

// Re-export Result type aliases from their defining modules
pub use crate::local::LocalResult;
pub use crate::transport::TransportResult;

/// Convenient Result alias for application-wide operations.
pub type SinkCastResult<T> = Result<T, SinkCastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_data_source_is_a_usage_error_with_stable_code() {
        let err = SinkCastError::NoDataSource;
        assert_eq!(err.code(), "no_data_source");
    }

    #[test]
    fn local_errors_convert_and_keep_their_code() {
        let local = LocalPlaybackError::InvalidState("not prepared".into());
        assert_eq!(local.code(), "local_invalid_state");
        let err: SinkCastError = local.into();
        assert_eq!(err.code(), "local_playback_failed");
    }
}
