//! Unified playback facade over local output and network sinks.
//!
//! [`SinkPlayer`] owns the command queue, the sink registry, the session
//! state, and the event dispatcher, and routes every playback operation to
//! either the local backend or the network transport depending on whether
//! any sinks are enabled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::{SinkCastError, SinkCastResult};
use crate::events::{EventDispatcher, SinkEventListener, SinkEventSender};
use crate::local::LocalPlayback;
use crate::runtime::TokioSpawner;
use crate::services::command_queue::{Command, CommandQueue};
use crate::services::sink_registry::SinkRegistry;
use crate::state::{Config, SessionState, SinkStatus};
use crate::transport::SinkTransport;

/// Playback coordinator that presents one player over two backends.
///
/// While no sinks are enabled every operation goes straight to the local
/// backend. As soon as one sink is enabled, transport commands take over and
/// local playback is silenced. Operations that touch the transport never
/// block: they enqueue a command and return.
pub struct SinkPlayer {
    queue: CommandQueue,
    local: Arc<dyn LocalPlayback>,
    registry: Arc<SinkRegistry>,
    session: Arc<SessionState>,
    dispatcher: EventDispatcher,
    config: Config,
    released: AtomicBool,
}

impl SinkPlayer {
    /// Creates a player and starts its background tasks.
    ///
    /// Returns the player together with the event sender the transport
    /// implementation uses to report discovery and readiness events. The
    /// initial `prepare` command is enqueued here, so it is guaranteed to
    /// reach the transport before any other command.
    pub fn new(
        transport: Arc<dyn SinkTransport>,
        local: Arc<dyn LocalPlayback>,
        config: Config,
        spawner: TokioSpawner,
    ) -> SinkCastResult<(Arc<SinkPlayer>, SinkEventSender)> {
        config.validate().map_err(SinkCastError::InvalidConfig)?;

        let registry = Arc::new(SinkRegistry::new(config.registry_channel_capacity));
        let session = Arc::new(SessionState::new());

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let dispatcher = EventDispatcher::new(
            registry.clone(),
            session.clone(),
            event_rx,
            spawner.clone(),
        );
        dispatcher.start();

        let queue = CommandQueue::new(transport, &spawner);
        queue.submit(Command::Prepare(config.identity.clone()))?;

        let player = Arc::new(Self {
            queue,
            local,
            registry,
            session,
            dispatcher,
            config,
            released: AtomicBool::new(false),
        });
        Ok((player, SinkEventSender::new(event_tx)))
    }

    /// Registers the listener notified of sink lifecycle events.
    pub fn set_listener(&self, listener: Arc<dyn SinkEventListener>) {
        self.dispatcher.set_listener(listener);
    }

    /// Returns the sink registry for display subscriptions and snapshots.
    #[must_use]
    pub fn registry(&self) -> &Arc<SinkRegistry> {
        &self.registry
    }

    /// Returns the session state for snapshots.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    fn ensure_active(&self) -> SinkCastResult<()> {
        if self.released.load(Ordering::Acquire) {
            return Err(SinkCastError::Released);
        }
        Ok(())
    }

    /// Configures the audio source on both backends.
    ///
    /// The source is forwarded to the transport only when its suffix marks
    /// it as streamable; the local backend always receives it.
    pub fn set_data_source(&self, path: &str) -> SinkCastResult<()> {
        self.ensure_active()?;
        self.session.set_data_source(path);
        if self.config.is_streamable(path) {
            self.queue.submit(Command::SetSource(path.to_string()))?;
        }
        self.local.set_data_source(path)?;
        Ok(())
    }

    /// Enables a sink for network playback.
    ///
    /// Fails with [`SinkCastError::NoDataSource`] before enqueuing anything
    /// when no source has been configured, so session state is untouched on
    /// rejection.
    pub fn add_sink(&self, name: &str, path: &str, port: u16) -> SinkCastResult<()> {
        self.ensure_active()?;
        if !self.session.has_data_source() {
            return Err(SinkCastError::NoDataSource);
        }
        self.session.sink_enabled();
        self.session
            .sink_statuses
            .insert(name.to_string(), SinkStatus::Pending);
        self.registry.set_enabled(name, true);
        self.queue.submit(Command::AddSink {
            name: name.to_string(),
            path: path.to_string(),
            port,
        })
    }

    /// Disables a sink.
    ///
    /// The sink stays in the registry; only its enabled flag and status are
    /// dropped. Disabling the last sink returns playback to the local
    /// backend.
    pub fn remove_sink(&self, name: &str) -> SinkCastResult<()> {
        self.ensure_active()?;
        self.session.sink_disabled();
        self.session.sink_statuses.remove(name);
        self.registry.set_enabled(name, false);
        self.queue.submit(Command::RemoveSink(name.to_string()))
    }

    /// Starts playback on whichever backend is active.
    ///
    /// When streaming, any local playback still running is stopped so audio
    /// is never emitted on both paths.
    pub fn start(&self) -> SinkCastResult<()> {
        self.ensure_active()?;
        if !self.session.streaming_over_network() {
            self.local.start()?;
            return Ok(());
        }
        self.session.set_playing_over_network(true);
        self.queue.submit(Command::Start)?;
        if self.local.is_playing() {
            if let Err(e) = self.local.stop() {
                log::warn!("[SinkPlayer] failed to stop local playback: {e}");
            }
        }
        Ok(())
    }

    /// Pauses playback on whichever backend is active.
    pub fn pause(&self) -> SinkCastResult<()> {
        self.ensure_active()?;
        if !self.session.streaming_over_network() {
            self.local.pause()?;
            return Ok(());
        }
        self.session.set_playing_over_network(false);
        self.queue.submit(Command::Pause)
    }

    /// Stops playback on whichever backend is active.
    pub fn stop(&self) -> SinkCastResult<()> {
        self.ensure_active()?;
        if !self.session.streaming_over_network() {
            self.local.stop()?;
            return Ok(());
        }
        self.session.set_playing_over_network(false);
        self.queue.submit(Command::Stop)
    }

    /// Resets both backends to the no-source state.
    ///
    /// Unlike the other playback operations, reset always reaches both the
    /// local backend and the transport.
    pub fn reset(&self) -> SinkCastResult<()> {
        self.ensure_active()?;
        self.local.reset()?;
        self.session.set_playing_over_network(false);
        self.queue.submit(Command::Reset)
    }

    /// Sets the playback volume.
    ///
    /// Values are clamped to `[0.0, 1.0]`. The network path carries a single
    /// volume, so only `left` is forwarded while streaming, and a zero
    /// volume is sent as an explicit mute.
    pub fn set_volume(&self, left: f32, right: f32) -> SinkCastResult<()> {
        self.ensure_active()?;
        let left = left.clamp(0.0, 1.0);
        let right = right.clamp(0.0, 1.0);
        if self.session.streaming_over_network() {
            if left == 0.0 {
                return self.queue.submit(Command::Mute);
            }
            return self.queue.submit(Command::ChangeVolume(left));
        }
        self.local.set_volume(left, right)?;
        Ok(())
    }

    /// Returns whether the active backend is playing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        if self.session.streaming_over_network() {
            self.session.is_playing_over_network()
        } else {
            self.local.is_playing()
        }
    }

    /// Clears the registry and asks the transport for a fresh announcement
    /// of every reachable sink.
    pub fn refresh_sinks(&self) -> SinkCastResult<()> {
        self.ensure_active()?;
        self.registry.clear();
        self.queue.submit(Command::RefreshSinks)
    }

    /// Releases both backends and shuts the command queue down.
    ///
    /// Idempotent: the second and later calls return `Ok` without effect.
    /// Every other operation fails with [`SinkCastError::Released`] once
    /// release has been requested.
    pub fn release(&self) -> SinkCastResult<()> {
        if self.released.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        if let Err(e) = self.local.release() {
            log::warn!("[SinkPlayer] failed to release local playback: {e}");
        }
        self.queue.submit(Command::Release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SinkEvent;
    use crate::services::sink_registry::RegistryChange;
    use crate::test_support::{RecordingLocalPlayback, RecordingTransport};
    use std::time::Duration;
    use tokio::time::timeout;

    fn fixture() -> (
        Arc<RecordingTransport>,
        Arc<RecordingLocalPlayback>,
        Arc<SinkPlayer>,
        SinkEventSender,
    ) {
        let transport = Arc::new(RecordingTransport::new());
        let local = Arc::new(RecordingLocalPlayback::new());
        let (player, events) = SinkPlayer::new(
            transport.clone(),
            local.clone(),
            Config::default(),
            TokioSpawner::current(),
        )
        .unwrap();
        (transport, local, player, events)
    }

    #[tokio::test]
    async fn prepare_is_sent_before_anything_else() {
        let (transport, _local, player, _events) = fixture();
        player.refresh_sinks().unwrap();
        transport.wait_for_calls(2).await;
        assert_eq!(
            transport.calls(),
            vec!["prepare sinkcast.audio.streaming", "refresh_sinks"]
        );
    }

    #[tokio::test]
    async fn add_sink_without_source_is_rejected() {
        let (transport, _local, player, _events) = fixture();
        let err = player.add_sink("S1", "/p", 1000).unwrap_err();
        assert!(matches!(err, SinkCastError::NoDataSource));
        assert_eq!(player.session().enabled_sink_count(), 0);
        assert!(player.session().sink_status("S1").is_none());

        // Issue a follow-up command to prove nothing was enqueued in between.
        player.refresh_sinks().unwrap();
        transport.wait_for_calls(2).await;
        assert_eq!(
            transport.calls(),
            vec!["prepare sinkcast.audio.streaming", "refresh_sinks"]
        );
    }

    #[tokio::test]
    async fn streamable_source_routes_playback_to_the_network() {
        let (transport, local, player, _events) = fixture();
        player.set_data_source("song.wav").unwrap();
        player.add_sink("S1", "/p", 1000).unwrap();
        player.start().unwrap();

        transport.wait_for_calls(4).await;
        assert_eq!(
            transport.calls(),
            vec![
                "prepare sinkcast.audio.streaming",
                "set_source song.wav",
                "add_sink S1",
                "start"
            ]
        );
        assert!(player.is_playing());
        assert_eq!(
            player.session().sink_status("S1"),
            Some(SinkStatus::Pending)
        );
        // The local backend got the source but never started.
        assert_eq!(local.calls(), vec!["set_data_source song.wav"]);
    }

    #[tokio::test]
    async fn non_streamable_source_stays_local() {
        let (transport, local, player, _events) = fixture();
        player.set_data_source("song.mp3").unwrap();
        player.start().unwrap();
        assert!(player.is_playing());
        assert_eq!(local.calls(), vec!["set_data_source song.mp3", "start"]);

        transport.wait_for_calls(1).await;
        assert_eq!(transport.calls(), vec!["prepare sinkcast.audio.streaming"]);
    }

    #[tokio::test]
    async fn starting_over_network_silences_local_playback() {
        let (transport, local, player, _events) = fixture();
        player.set_data_source("song.wav").unwrap();
        player.start().unwrap();
        assert!(local.is_playing());

        player.add_sink("S1", "/p", 1000).unwrap();
        player.start().unwrap();
        transport.wait_for_calls(4).await;
        assert!(!local.is_playing());
        assert_eq!(
            local.calls(),
            vec!["set_data_source song.wav", "start", "stop"]
        );
    }

    #[tokio::test]
    async fn removing_the_last_sink_returns_control_to_local() {
        let (_transport, local, player, _events) = fixture();
        player.set_data_source("song.wav").unwrap();
        player.add_sink("S1", "/p", 1000).unwrap();
        player.remove_sink("S1").unwrap();

        assert_eq!(player.session().enabled_sink_count(), 0);
        assert!(!player.session().streaming_over_network());
        assert!(player.session().sink_status("S1").is_none());

        player.set_volume(0.5, 0.5).unwrap();
        assert!(local.calls().contains(&"set_volume 0.5 0.5".to_string()));
    }

    #[tokio::test]
    async fn zero_volume_over_network_becomes_mute() {
        let (transport, _local, player, _events) = fixture();
        player.set_data_source("song.wav").unwrap();
        player.add_sink("S1", "/p", 1000).unwrap();
        player.set_volume(0.0, 0.7).unwrap();
        player.set_volume(0.5, 0.5).unwrap();

        transport.wait_for_calls(5).await;
        let calls = transport.calls();
        assert_eq!(calls[3], "mute");
        assert_eq!(calls[4], "change_volume 0.5");
    }

    #[tokio::test]
    async fn reset_reaches_both_backends() {
        let (transport, local, player, _events) = fixture();
        player.set_data_source("song.wav").unwrap();
        player.add_sink("S1", "/p", 1000).unwrap();
        player.start().unwrap();
        player.reset().unwrap();

        transport.wait_for_calls(5).await;
        assert_eq!(transport.calls()[4], "reset");
        assert!(local.calls().contains(&"reset".to_string()));
        assert!(!player.session().is_playing_over_network());
    }

    #[tokio::test]
    async fn refresh_drops_known_sinks_before_rediscovery() {
        let (transport, _local, player, events) = fixture();
        let mut changes = player.registry().subscribe();

        for name in ["S1", "S2"] {
            events.send(SinkEvent::Found {
                name: name.to_string(),
                path: format!("/speakers/{name}"),
                friendly_name: format!("Speaker {name}"),
                port: 9100,
            });
        }
        for name in ["S1", "S2"] {
            let change = timeout(Duration::from_secs(1), changes.recv())
                .await
                .expect("discovery should reach the registry")
                .unwrap();
            assert_eq!(change, RegistryChange::Added(name.to_string()));
        }
        assert_eq!(player.registry().len(), 2);

        player.refresh_sinks().unwrap();
        assert!(player.registry().is_empty());
        assert_eq!(changes.try_recv().unwrap(), RegistryChange::Cleared);

        transport.wait_for_calls(2).await;
        assert_eq!(transport.calls()[1], "refresh_sinks");
    }

    #[tokio::test]
    async fn release_shuts_the_player_down() {
        let (transport, local, player, _events) = fixture();
        player.release().unwrap();
        transport.wait_for_calls(2).await;
        assert_eq!(
            transport.calls(),
            vec!["prepare sinkcast.audio.streaming", "release"]
        );
        assert_eq!(local.calls(), vec!["release"]);

        let err = player.start().unwrap_err();
        assert!(matches!(err, SinkCastError::Released));

        // Release is idempotent.
        player.release().unwrap();
        assert_eq!(local.calls(), vec!["release"]);
    }

    #[tokio::test]
    async fn pause_and_stop_route_by_streaming_mode() {
        let (transport, local, player, _events) = fixture();
        player.set_data_source("song.wav").unwrap();
        player.start().unwrap();
        player.pause().unwrap();
        assert_eq!(
            local.calls(),
            vec!["set_data_source song.wav", "start", "pause"]
        );

        player.add_sink("S1", "/p", 1000).unwrap();
        player.start().unwrap();
        player.pause().unwrap();
        assert!(!player.is_playing());
        player.stop().unwrap();

        transport.wait_for_calls(6).await;
        let calls = transport.calls();
        assert_eq!(&calls[3..], ["start", "pause", "stop"]);
    }
}
