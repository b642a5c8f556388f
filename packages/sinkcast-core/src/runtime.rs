//! Task spawning abstraction for runtime independence.
//!
//! The command worker and the event dispatcher both run as background tasks.
//! Spawning goes through a [`TaskSpawner`] so embedders that manage their own
//! runtime (or want task tracking) can supply their own implementation; the
//! default [`TokioSpawner`] uses a Tokio runtime handle.

use std::future::Future;

/// Abstraction for spawning background tasks.
///
/// Implementations should ensure spawned tasks keep running even if the
/// spawner itself is dropped; the coordinator relies on its worker tasks
/// living for the duration of the session.
pub trait TaskSpawner: Send + Sync {
    /// Spawns a future as a background task.
    ///
    /// The task runs independently of the caller; there is no way to cancel
    /// or join it through this trait.
    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Tokio-based spawner, the default for standalone use.
#[derive(Clone, Debug)]
pub struct TokioSpawner {
    handle: tokio::runtime::Handle,
}

impl TokioSpawner {
    /// Creates a spawner from an explicit runtime handle.
    #[must_use]
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Creates a spawner from the current runtime's handle.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context.
    #[must_use]
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }
}

impl TaskSpawner for TokioSpawner {
    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(future);
    }
}
