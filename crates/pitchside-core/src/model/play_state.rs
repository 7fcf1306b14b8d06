use std::fmt;
use std::str::FromStr;

// ── PlayMode ────────────────────────────────────────────────────────

/// Server play mode. Only the modes the interaction logic reacts to get
/// their own variant; everything else is carried by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlayMode {
    KickOffLeft,
    KickOffRight,
    GameOver,
    Other(String),
}

impl PlayMode {
    /// Name used by the server in play-mode messages.
    pub fn server_name(&self) -> &str {
        match self {
            Self::KickOffLeft => "KickOff_Left",
            Self::KickOffRight => "KickOff_Right",
            Self::GameOver => "GameOver",
            Self::Other(name) => name,
        }
    }

    pub fn is_kick_off(&self) -> bool {
        matches!(self, Self::KickOffLeft | Self::KickOffRight)
    }
}

impl Default for PlayMode {
    fn default() -> Self {
        Self::Other("BeforeKickOff".into())
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.server_name())
    }
}

impl FromStr for PlayMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for PlayMode {
    fn from(s: &str) -> Self {
        match s {
            "KickOff_Left" => Self::KickOffLeft,
            "KickOff_Right" => Self::KickOffRight,
            "GameOver" => Self::GameOver,
            other => Self::Other(other.to_owned()),
        }
    }
}

// ── PlayState ───────────────────────────────────────────────────────

/// Snapshot of the match as last reported by the server.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayState {
    /// Set once the server has sent its first full state.
    pub initialized: bool,
    /// Length of one half, seconds.
    pub half_time: f32,
    /// Elapsed match time, seconds.
    pub time: f32,
    pub play_mode: PlayMode,
    pub score_left: u32,
    pub score_right: u32,
    pub team_left: Option<String>,
    pub team_right: Option<String>,
    /// Play modes the server accepts, if it announced them.
    pub play_modes: Option<Vec<PlayMode>>,
}

impl PlayState {
    /// Both halves have been played out.
    pub fn clock_expired(&self) -> bool {
        self.time >= self.half_time * 2.0
    }

    /// The first half is over and the second has not started.
    pub fn is_between_halves(&self) -> bool {
        self.initialized && (self.time - self.half_time).abs() < 0.1
    }

    pub fn left_display_name(&self) -> &str {
        self.team_left.as_deref().unwrap_or("<Left>")
    }

    pub fn right_display_name(&self) -> &str {
        self.team_right.as_deref().unwrap_or("<Right>")
    }

    pub fn has_play_modes(&self) -> bool {
        self.play_modes.as_ref().is_some_and(|modes| !modes.is_empty())
    }
}
