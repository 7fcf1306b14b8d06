// pitchside-api: Async client for the SimSpark monitor protocol.

pub mod error;
pub mod monitor;
pub mod protocol;
pub mod state;

pub use error::Error;
pub use monitor::{LinkState, MonitorConfig, MonitorHandle, ReconnectConfig};
pub use protocol::{MonitorCommand, Team};
pub use state::GameState;
