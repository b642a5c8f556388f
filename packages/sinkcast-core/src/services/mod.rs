//! Application services layer.
//!
//! This module contains the coordination logic that sits between the public
//! playback API and the backend seams (transport/, local/).

pub mod command_queue;
pub mod sink_player;
pub mod sink_registry;

pub use command_queue::{Command, CommandQueue};
pub use sink_player::SinkPlayer;
pub use sink_registry::{RegistryChange, Sink, SinkRegistry};
