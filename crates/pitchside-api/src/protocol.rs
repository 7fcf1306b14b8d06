//! Monitor protocol commands and framing.
//!
//! The match server accepts S-expressions from monitors, each sent in a
//! frame prefixed with its payload length as a big-endian `u32`. Only the
//! commands a live-match controller issues are modelled here; inbound frames
//! are decoded by [`crate::state`].

use std::fmt;

use bytes::Bytes;
use tokio_util::codec::LengthDelimitedCodec;

/// Largest inbound frame accepted before the link is considered corrupt.
/// Full-state frames for a 22-agent match stay well below this.
pub const MAX_FRAME_LEN: usize = 4 * 1024 * 1024;

/// Team side as spelled on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Left,
    Right,
}

impl Team {
    fn wire_name(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }

    fn lower_name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// A single command sent from the monitor to the match server.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorCommand {
    /// Switch the server's play mode by name (e.g. `KickOff_Left`).
    PlayMode(String),
    DropBall,
    /// Reset the game clock to zero.
    ResetTime,
    RequestFullState,
    /// Terminate the simulator process.
    KillSimulator,
    MoveBall {
        position: [f32; 3],
        velocity: Option<[f32; 3]>,
    },
    MoveAgent {
        unum: u32,
        team: Team,
        position: [f32; 3],
    },
}

impl MonitorCommand {
    pub fn kick_off(team: Team) -> Self {
        Self::PlayMode(format!("KickOff_{}", team.wire_name()))
    }

    pub fn free_kick(team: Team) -> Self {
        Self::PlayMode(format!("free_kick_{}", team.lower_name()))
    }

    pub fn direct_free_kick(team: Team) -> Self {
        Self::PlayMode(format!("direct_free_kick_{}", team.lower_name()))
    }

    /// Encode as the UTF-8 payload of a single frame.
    pub fn to_payload(&self) -> Bytes {
        Bytes::from(self.to_string())
    }
}

fn write_vec(f: &mut fmt::Formatter<'_>, tag: &str, v: [f32; 3]) -> fmt::Result {
    let [x, y, z] = v;
    write!(f, "({tag} {x:.2} {y:.2} {z:.2})")
}

impl fmt::Display for MonitorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayMode(mode) => write!(f, "(playMode {mode})"),
            Self::DropBall => f.write_str("(dropBall)"),
            Self::ResetTime => f.write_str("(time 0)"),
            Self::RequestFullState => f.write_str("(reqfullstate)"),
            Self::KillSimulator => f.write_str("(killsim)"),
            Self::MoveBall { position, velocity } => {
                f.write_str("(ball ")?;
                write_vec(f, "pos", *position)?;
                if let Some(vel) = velocity {
                    f.write_str(" ")?;
                    write_vec(f, "vel", *vel)?;
                }
                f.write_str(")")
            }
            Self::MoveAgent {
                unum,
                team,
                position,
            } => {
                write!(f, "(agent (unum {unum}) (team {}) ", team.wire_name())?;
                write_vec(f, "pos", *position)?;
                f.write_str(")")
            }
        }
    }
}

/// Codec for monitor frames: 4-byte big-endian length, length excludes the header.
pub fn monitor_codec() -> LengthDelimitedCodec {
    LengthDelimitedCodec::builder()
        .length_field_length(4)
        .big_endian()
        .max_frame_length(MAX_FRAME_LEN)
        .new_codec()
}
