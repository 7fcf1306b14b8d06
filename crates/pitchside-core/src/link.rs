//! [`ServerLink`] over the monitor protocol.

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use pitchside_api::{GameState, LinkState, MonitorCommand, MonitorConfig, MonitorHandle, Team};

use crate::config::LinkConfig;
use crate::error::CoreError;
use crate::model::{AgentId, ConnectionStatus, PlayMode, ServerPoint, Side, Velocity};
use crate::ports::ServerLink;

/// Live connection to a match server. Must be created inside a tokio
/// runtime; the link task stops when this value is dropped.
pub struct MonitorLink {
    handle: MonitorHandle,
}

impl MonitorLink {
    pub fn spawn(config: &LinkConfig, cancel: CancellationToken) -> Result<Self, CoreError> {
        config.validate()?;
        let handle = MonitorHandle::spawn(MonitorConfig::from(config), cancel);
        Ok(Self { handle })
    }

    pub fn status(&self) -> ConnectionStatus {
        self.handle.state().into()
    }

    /// Receiver for every link state transition.
    pub fn subscribe(&self) -> watch::Receiver<LinkState> {
        self.handle.subscribe()
    }

    /// Receiver for the decoded game state; `None` while disconnected.
    /// Convert with `PlayState::from` before handing it to the controller.
    pub fn subscribe_game_state(&self) -> watch::Receiver<Option<GameState>> {
        self.handle.game_state()
    }

    pub fn shutdown(&self) {
        self.handle.shutdown();
    }
}

impl ServerLink for MonitorLink {
    fn is_connected(&self) -> bool {
        self.handle.state().is_connected()
    }

    fn connect(&mut self) {
        self.handle.connect();
    }

    fn kill_server(&mut self) {
        self.handle.send(MonitorCommand::KillSimulator);
    }

    fn kick_off(&mut self, side: Side) {
        self.handle.send(MonitorCommand::kick_off(side.into()));
    }

    fn free_kick(&mut self, side: Side) {
        self.handle.send(MonitorCommand::free_kick(side.into()));
    }

    fn direct_free_kick(&mut self, side: Side) {
        self.handle.send(MonitorCommand::direct_free_kick(side.into()));
    }

    fn drop_ball(&mut self) {
        self.handle.send(MonitorCommand::DropBall);
    }

    fn reset_time(&mut self) {
        self.handle.send(MonitorCommand::ResetTime);
    }

    fn request_full_state(&mut self) {
        self.handle.send(MonitorCommand::RequestFullState);
    }

    fn move_ball(&mut self, position: ServerPoint, velocity: Option<Velocity>) {
        self.handle.send(MonitorCommand::MoveBall {
            position: position.to_array(),
            velocity: velocity.map(|v| [v.x, v.y, v.z]),
        });
    }

    fn move_agent(&mut self, position: ServerPoint, side: Side, id: AgentId) {
        self.handle.send(MonitorCommand::MoveAgent {
            unum: id,
            team: Team::from(side),
            position: position.to_array(),
        });
    }

    fn set_play_mode(&mut self, mode: &PlayMode) {
        self.handle
            .send(MonitorCommand::PlayMode(mode.server_name().to_owned()));
    }
}
