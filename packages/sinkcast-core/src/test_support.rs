//! Shared fakes for unit tests.
//!
//! Provides recording implementations of the transport and local playback
//! seams so tests can assert on exact call sequences without a real bus or
//! audio backend.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::local::{LocalPlayback, LocalResult};
use crate::transport::{SinkTransport, TransportError, TransportResult};

/// Transport fake that records every call in order.
///
/// Calls are recorded even when failure injection makes them return an
/// error, so tests can assert that a failing command was attempted.
pub(crate) struct RecordingTransport {
    calls: Mutex<Vec<String>>,
    fail_matching: Mutex<Option<String>>,
    notify: Notify,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_matching: Mutex::new(None),
            notify: Notify::new(),
        }
    }

    /// Makes every call whose log entry contains `needle` return an error.
    pub(crate) fn fail_on(&self, needle: &str) {
        *self.fail_matching.lock() = Some(needle.to_string());
    }

    /// Returns the recorded call log.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Waits until at least `n` calls have been recorded.
    pub(crate) async fn wait_for_calls(&self, n: usize) {
        loop {
            let notified = self.notify.notified();
            if self.calls.lock().len() >= n {
                return;
            }
            notified.await;
        }
    }

    fn record(&self, entry: String) -> TransportResult<()> {
        let should_fail = self
            .fail_matching
            .lock()
            .as_deref()
            .is_some_and(|needle| entry.contains(needle));
        self.calls.lock().push(entry);
        self.notify.notify_waiters();
        if should_fail {
            Err(TransportError::Io("injected failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SinkTransport for RecordingTransport {
    async fn prepare(&self, identity: &str) -> TransportResult<()> {
        self.record(format!("prepare {identity}"))
    }

    async fn set_data_source(&self, path: &str) -> TransportResult<()> {
        self.record(format!("set_source {path}"))
    }

    async fn add_sink(&self, name: &str, _path: &str, _port: u16) -> TransportResult<()> {
        self.record(format!("add_sink {name}"))
    }

    async fn remove_sink(&self, name: &str) -> TransportResult<()> {
        self.record(format!("remove_sink {name}"))
    }

    async fn start(&self) -> TransportResult<()> {
        self.record("start".to_string())
    }

    async fn pause(&self) -> TransportResult<()> {
        self.record("pause".to_string())
    }

    async fn stop(&self) -> TransportResult<()> {
        self.record("stop".to_string())
    }

    async fn reset(&self) -> TransportResult<()> {
        self.record("reset".to_string())
    }

    async fn change_volume(&self, volume: f32) -> TransportResult<()> {
        self.record(format!("change_volume {volume}"))
    }

    async fn mute(&self) -> TransportResult<()> {
        self.record("mute".to_string())
    }

    async fn refresh_sinks(&self) -> TransportResult<()> {
        self.record("refresh_sinks".to_string())
    }

    async fn release(&self) -> TransportResult<()> {
        self.record("release".to_string())
    }
}

/// Local playback fake that records calls and tracks the playing flag.
pub(crate) struct RecordingLocalPlayback {
    calls: Mutex<Vec<String>>,
    playing: AtomicBool,
}

impl RecordingLocalPlayback {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            playing: AtomicBool::new(false),
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, entry: String) -> LocalResult<()> {
        self.calls.lock().push(entry);
        Ok(())
    }
}

impl LocalPlayback for RecordingLocalPlayback {
    fn set_data_source(&self, path: &str) -> LocalResult<()> {
        self.record(format!("set_data_source {path}"))
    }

    fn start(&self) -> LocalResult<()> {
        self.playing.store(true, Ordering::SeqCst);
        self.record("start".to_string())
    }

    fn pause(&self) -> LocalResult<()> {
        self.playing.store(false, Ordering::SeqCst);
        self.record("pause".to_string())
    }

    fn stop(&self) -> LocalResult<()> {
        self.playing.store(false, Ordering::SeqCst);
        self.record("stop".to_string())
    }

    fn reset(&self) -> LocalResult<()> {
        self.playing.store(false, Ordering::SeqCst);
        self.record("reset".to_string())
    }

    fn set_volume(&self, left: f32, right: f32) -> LocalResult<()> {
        self.record(format!("set_volume {left} {right}"))
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn release(&self) -> LocalResult<()> {
        self.playing.store(false, Ordering::SeqCst);
        self.record("release".to_string())
    }
}
