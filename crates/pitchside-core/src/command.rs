// ── Match commands ──
//
// Everything the user can ask of the match, whether it goes to the
// server or only toggles something in the UI. The controller decides
// which collaborator handles each one.

use std::fmt;

use crate::model::{AgentId, PlayMode, ServerPoint, Side, Velocity};

#[derive(Debug, Clone, PartialEq)]
pub enum MatchCommand {
    KickOff(Side),
    FreeKick(Side),
    DirectFreeKick(Side),
    DropBall,
    MoveBall {
        position: ServerPoint,
        /// Present only for kicks.
        velocity: Option<Velocity>,
    },
    MoveAgent {
        position: ServerPoint,
        side: Side,
        id: AgentId,
    },
    ResetClock,
    RequestFullState,
    Connect,
    KillServer,
    ToggleServerSpeedOverlay,
    OpenPlaymodeMenu,
    SetPlayMode(PlayMode),
}

impl MatchCommand {
    /// Commands that restart play. Once the clock has run out the server
    /// ignores them unless the clock is reset first.
    pub fn restarts_play(&self) -> bool {
        matches!(
            self,
            Self::KickOff(_) | Self::FreeKick(_) | Self::DirectFreeKick(_) | Self::DropBall
        )
    }

    /// Handled by the server rather than the local UI.
    pub fn is_remote(&self) -> bool {
        !matches!(self, Self::ToggleServerSpeedOverlay | Self::OpenPlaymodeMenu)
    }
}

impl fmt::Display for MatchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KickOff(side) => write!(f, "kick-off {side}"),
            Self::FreeKick(side) => write!(f, "free kick {side}"),
            Self::DirectFreeKick(side) => write!(f, "direct free kick {side}"),
            Self::DropBall => f.write_str("drop ball"),
            Self::MoveBall {
                position,
                velocity: None,
            } => write!(
                f,
                "move ball to ({:.2}, {:.2}, {:.2})",
                position.0.x, position.0.y, position.0.z
            ),
            Self::MoveBall {
                position,
                velocity: Some(v),
            } => write!(
                f,
                "push ball from ({:.2}, {:.2}, {:.2}) at ({:.2}, {:.2}, {:.2})",
                position.0.x, position.0.y, position.0.z, v.x, v.y, v.z
            ),
            Self::MoveAgent { position, side, id } => write!(
                f,
                "move {side} agent {id} to ({:.2}, {:.2}, {:.2})",
                position.0.x, position.0.y, position.0.z
            ),
            Self::ResetClock => f.write_str("reset clock"),
            Self::RequestFullState => f.write_str("request full state"),
            Self::Connect => f.write_str("connect"),
            Self::KillServer => f.write_str("kill server"),
            Self::ToggleServerSpeedOverlay => f.write_str("toggle server speed overlay"),
            Self::OpenPlaymodeMenu => f.write_str("open play-mode menu"),
            Self::SetPlayMode(mode) => write!(f, "set play mode {mode}"),
        }
    }
}
