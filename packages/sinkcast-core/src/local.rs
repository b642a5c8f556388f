//! Local playback abstraction.
//!
//! When no network sinks are enabled, the player delegates every operation to
//! a local media-playback capability. The capability is modeled as a trait
//! and injected by composition rather than inherited, so the coordinator can
//! run headless (see [`NullLocalPlayback`]) or wrap a real audio backend.

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

/// Errors the local playback capability may report.
#[derive(Debug, Error)]
pub enum LocalPlaybackError {
    /// The operation is not valid in the player's current state.
    #[error("invalid player state: {0}")]
    InvalidState(String),

    /// The configured source could not be opened or read.
    #[error("source unavailable: {0}")]
    Source(String),

    /// The audio output device failed.
    #[error("audio output failed: {0}")]
    Output(String),
}

/// Convenient Result alias for local playback operations.
pub type LocalResult<T> = Result<T, LocalPlaybackError>;

/// Local media-playback capability used when not streaming over the network.
///
/// Errors from these methods propagate to the caller on delegation paths
/// (e.g. `start` with no sinks enabled). On cleanup paths (silencing local
/// output while the network path takes over, or during `release`) the
/// coordinator catches and logs them instead, since cleanup must never block
/// subsequent operations.
pub trait LocalPlayback: Send + Sync {
    /// Sets the audio source file to play locally.
    fn set_data_source(&self, path: &str) -> LocalResult<()>;

    /// Starts or resumes local playback.
    fn start(&self) -> LocalResult<()>;

    /// Pauses local playback.
    fn pause(&self) -> LocalResult<()>;

    /// Stops local playback.
    fn stop(&self) -> LocalResult<()>;

    /// Resets the local player to its idle state.
    fn reset(&self) -> LocalResult<()>;

    /// Sets the local output volume per channel, each in `[0.0, 1.0]`.
    fn set_volume(&self, left: f32, right: f32) -> LocalResult<()>;

    /// Returns whether local playback is currently running.
    fn is_playing(&self) -> bool;

    /// Releases local player resources. Terminal.
    fn release(&self) -> LocalResult<()>;
}

/// No-audio local playback for headless use and testing.
///
/// Tracks only the logical play/stop state so that routing decisions in the
/// player (which consult `is_playing`) behave sensibly; no audio is produced.
#[derive(Debug, Default)]
pub struct NullLocalPlayback {
    playing: AtomicBool,
}

impl NullLocalPlayback {
    /// Creates a stopped null player.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalPlayback for NullLocalPlayback {
    fn set_data_source(&self, _path: &str) -> LocalResult<()> {
        Ok(())
    }

    fn start(&self) -> LocalResult<()> {
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&self) -> LocalResult<()> {
        self.playing.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> LocalResult<()> {
        self.playing.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn reset(&self) -> LocalResult<()> {
        self.playing.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn set_volume(&self, _left: f32, _right: f32) -> LocalResult<()> {
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn release(&self) -> LocalResult<()> {
        self.playing.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_playback_tracks_logical_state() {
        let player = NullLocalPlayback::new();
        assert!(!player.is_playing());

        player.start().unwrap();
        assert!(player.is_playing());

        player.pause().unwrap();
        assert!(!player.is_playing());

        player.start().unwrap();
        player.reset().unwrap();
        assert!(!player.is_playing());
    }
}
