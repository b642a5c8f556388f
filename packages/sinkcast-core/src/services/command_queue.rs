//! Ordered single-consumer command execution.
//!
//! Every mutating operation that touches the transport crosses into a single
//! worker task through this queue. That worker is the sole caller of the
//! transport, which is what prevents control-plane races (a `Start` can never
//! execute before a previously submitted `SetSource` has run).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::{SinkCastError, SinkCastResult};
use crate::runtime::{TaskSpawner, TokioSpawner};
use crate::transport::{SinkTransport, TransportResult};

/// One control request destined for the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Start up the transport, announcing the given identity.
    Prepare(String),
    /// Configure the network-streamable audio source.
    SetSource(String),
    /// Add a sink to receive audio.
    AddSink {
        /// Stable unique identifier of the sink.
        name: String,
        /// Addressing string for the sink's remote interface.
        path: String,
        /// Transport endpoint identifier.
        port: u16,
    },
    /// Remove a previously added sink.
    RemoveSink(String),
    /// Start sending audio.
    Start,
    /// Pause sending audio.
    Pause,
    /// Stop sending audio.
    Stop,
    /// Stop sending audio and reset transport-side state.
    Reset,
    /// Change sink volume (single-channel, `[0.0, 1.0]`).
    ChangeVolume(f32),
    /// Mute all added sinks.
    Mute,
    /// Request sink re-discovery.
    RefreshSinks,
    /// Release the transport. Terminal: the worker exits after executing it.
    Release,
}

impl Command {
    /// Short label for log lines.
    fn label(&self) -> &'static str {
        match self {
            Self::Prepare(_) => "prepare",
            Self::SetSource(_) => "set_source",
            Self::AddSink { .. } => "add_sink",
            Self::RemoveSink(_) => "remove_sink",
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Reset => "reset",
            Self::ChangeVolume(_) => "change_volume",
            Self::Mute => "mute",
            Self::RefreshSinks => "refresh_sinks",
            Self::Release => "release",
        }
    }
}

/// FIFO command queue with a single consumer task owning the transport.
///
/// `submit` never blocks; commands execute strictly in submission order, one
/// at a time. A failed transport call is logged and the worker moves on; a
/// single failure must not stall or drop the rest of the queue. There is no
/// priority, cancellation, or deadline for submitted commands.
pub struct CommandQueue {
    tx: mpsc::UnboundedSender<Command>,
    /// Set once `Release` has been accepted; later submissions fail fast.
    closed: AtomicBool,
}

impl CommandQueue {
    /// Creates the queue and spawns its worker task.
    pub fn new(transport: Arc<dyn SinkTransport>, spawner: &TokioSpawner) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Command>();

        spawner.spawn(async move {
            while let Some(command) = rx.recv().await {
                let terminal = matches!(command, Command::Release);
                let label = command.label();
                log::debug!("[CommandQueue] executing {}", label);

                if let Err(e) = Self::execute(transport.as_ref(), command).await {
                    log::warn!("[CommandQueue] {} failed: {}", label, e);
                }

                if terminal {
                    log::debug!("[CommandQueue] released, worker exiting");
                    break;
                }
            }
        });

        Self {
            tx,
            closed: AtomicBool::new(false),
        }
    }

    /// Enqueues a command and returns immediately.
    ///
    /// Commands execute in submission order regardless of the submitting
    /// thread. Fails fast with [`SinkCastError::Released`] once `Release`
    /// has been submitted.
    pub fn submit(&self, command: Command) -> SinkCastResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(SinkCastError::Released);
        }
        if matches!(command, Command::Release) {
            self.closed.store(true, Ordering::Release);
        }
        self.tx.send(command).map_err(|_| SinkCastError::Released)
    }

    /// Runs one command against the transport.
    async fn execute(transport: &dyn SinkTransport, command: Command) -> TransportResult<()> {
        match command {
            Command::Prepare(identity) => transport.prepare(&identity).await,
            Command::SetSource(path) => transport.set_data_source(&path).await,
            Command::AddSink { name, path, port } => transport.add_sink(&name, &path, port).await,
            Command::RemoveSink(name) => transport.remove_sink(&name).await,
            Command::Start => transport.start().await,
            Command::Pause => transport.pause().await,
            Command::Stop => transport.stop().await,
            Command::Reset => transport.reset().await,
            Command::ChangeVolume(volume) => transport.change_volume(volume).await,
            Command::Mute => transport.mute().await,
            Command::RefreshSinks => transport.refresh_sinks().await,
            Command::Release => transport.release().await,
        }
    }
}
