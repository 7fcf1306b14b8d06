// ── Core ↔ transport conversions ──
//
// Core types stay free of transport types; these impls bridge the two.

use pitchside_api::{GameState, LinkState, MonitorConfig, ReconnectConfig, Team};

use crate::config::LinkConfig;
use crate::model::{ConnectionStatus, PlayMode, PlayState, Side};

impl From<Side> for Team {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => Team::Left,
            Side::Right => Team::Right,
        }
    }
}

impl From<LinkState> for ConnectionStatus {
    fn from(state: LinkState) -> Self {
        match state {
            LinkState::Disconnected => Self::Disconnected,
            LinkState::Connecting => Self::Connecting,
            LinkState::Connected => Self::Connected,
        }
    }
}

impl From<&GameState> for PlayState {
    fn from(game: &GameState) -> Self {
        let play_modes = (!game.play_modes.is_empty()).then(|| {
            game.play_modes
                .iter()
                .map(|name| PlayMode::from(name.as_str()))
                .collect()
        });
        Self {
            initialized: game.initialized,
            half_time: game.half_time,
            time: game.time,
            play_mode: PlayMode::from(game.play_mode.as_str()),
            score_left: game.score_left,
            score_right: game.score_right,
            team_left: game.team_left.clone(),
            team_right: game.team_right.clone(),
            play_modes,
        }
    }
}

impl From<&LinkConfig> for MonitorConfig {
    fn from(config: &LinkConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            auto_connect: config.auto_connect,
            connect_timeout: config.connect_timeout,
            reconnect: ReconnectConfig {
                initial_delay: config.auto_connect_delay,
                ..ReconnectConfig::default()
            },
        }
    }
}
