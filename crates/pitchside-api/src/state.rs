//! Game-state decoding for inbound monitor frames.
//!
//! Every frame from the match server opens with an environment expression
//! carrying the game state, followed by scene graph data this crate does not
//! interpret. Full-state frames spell the fields out (`(time 12.3)`,
//! `(play_mode 2)`, `(play_modes BeforeKickOff KickOff_Left ...)`); update
//! frames only repeat what changed, sometimes abbreviated (`(t 12.3)`,
//! `(pm 2)`). [`GameState::apply_frame`] folds either kind into the
//! accumulated state of one connection.

use tracing::trace;

/// Half length assumed until the server announces its own.
pub const DEFAULT_HALF_TIME: f32 = 300.0;

/// Match state accumulated from the frames of one connection.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Set once a full-state frame has been seen.
    pub initialized: bool,
    pub half_time: f32,
    pub time: f32,
    /// Current play mode, by name.
    pub play_mode: String,
    pub score_left: u32,
    pub score_right: u32,
    pub team_left: Option<String>,
    pub team_right: Option<String>,
    /// Play-mode names in server order. `play_mode` predicates index into it.
    pub play_modes: Vec<String>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            initialized: false,
            half_time: DEFAULT_HALF_TIME,
            time: 0.0,
            play_mode: "BeforeKickOff".into(),
            score_left: 0,
            score_right: 0,
            team_left: None,
            team_right: None,
            play_modes: Vec::new(),
        }
    }
}

impl GameState {
    /// Fold one frame into the state. Returns whether any field changed.
    pub fn apply_frame(&mut self, frame: &[u8]) -> bool {
        let Ok(text) = std::str::from_utf8(frame) else {
            trace!(len = frame.len(), "non UTF-8 frame skipped");
            return false;
        };

        let before = self.clone();
        for predicate in environment_predicates(text) {
            self.apply_predicate(&predicate);
        }
        *self != before
    }

    fn apply_predicate(&mut self, predicate: &[&str]) {
        let Some((&name, values)) = predicate.split_first() else {
            return;
        };
        let first = values.first().copied();

        match name {
            "play_modes" => {
                self.play_modes = values.iter().map(|&mode| mode.to_owned()).collect();
                self.initialized = true;
            }
            "RuleHalfTime" => {
                if let Some(half_time) = first.and_then(|v| v.parse().ok()) {
                    self.half_time = half_time;
                }
            }
            "time" | "t" => {
                if let Some(time) = first.and_then(|v| v.parse().ok()) {
                    self.time = time;
                }
            }
            "play_mode" | "pm" => {
                if let Some(mode) = first.and_then(|v| self.resolve_play_mode(v)) {
                    self.play_mode = mode;
                }
            }
            "score_left" | "sl" => {
                if let Some(score) = first.and_then(|v| v.parse().ok()) {
                    self.score_left = score;
                }
            }
            "score_right" | "sr" => {
                if let Some(score) = first.and_then(|v| v.parse().ok()) {
                    self.score_right = score;
                }
            }
            "team_left" => self.team_left = first.map(str::to_owned),
            "team_right" => self.team_right = first.map(str::to_owned),
            _ => {}
        }
    }

    /// Play modes travel as indices into `play_modes`; a bare name is
    /// taken as-is.
    fn resolve_play_mode(&self, value: &str) -> Option<String> {
        match value.parse::<usize>() {
            Ok(index) => self.play_modes.get(index).cloned(),
            Err(_) => Some(value.to_owned()),
        }
    }
}

/// Flat atom lists inside the first top-level expression of `text`.
///
/// Nested lists are reported innermost first, each holding only its own
/// atoms. Scanning stops where the environment expression closes, so scene
/// graph data is never tokenized.
fn environment_predicates(text: &str) -> Vec<Vec<&str>> {
    let mut predicates = Vec::new();
    let mut stack: Vec<Vec<&str>> = Vec::new();
    let mut atom_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        let is_delimiter = c == '(' || c == ')' || c.is_whitespace();
        if !is_delimiter {
            if atom_start.is_none() {
                atom_start = Some(i);
            }
            continue;
        }
        if let (Some(start), Some(list)) = (atom_start.take(), stack.last_mut()) {
            list.push(&text[start..i]);
        }
        match c {
            '(' => stack.push(Vec::new()),
            ')' => {
                let Some(list) = stack.pop() else {
                    break;
                };
                if !list.is_empty() {
                    predicates.push(list);
                }
                if stack.is_empty() {
                    break;
                }
            }
            _ => {}
        }
    }

    predicates
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_STATE: &str = "((FieldLength 30)(FieldWidth 20)(RuleHalfTime 300)\
        (play_modes BeforeKickOff KickOff_Left KickOff_Right PlayOn GameOver)\
        (time 0)(team_left Apollo3D)(team_right FCPortugal)(half 1)\
        (score_left 0)(score_right 0)(play_mode 0))\
        (RSG 0 1)((nd TRF (SLT 1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1)))";

    fn full_state() -> GameState {
        let mut state = GameState::default();
        assert!(state.apply_frame(FULL_STATE.as_bytes()));
        state
    }

    #[test]
    fn full_state_frame_fills_every_field() {
        let state = full_state();
        assert!(state.initialized);
        assert_eq!(state.play_modes.len(), 5);
        assert_eq!(state.play_mode, "BeforeKickOff");
        assert_eq!(state.team_left.as_deref(), Some("Apollo3D"));
        assert_eq!(state.team_right.as_deref(), Some("FCPortugal"));
        assert!((state.half_time - 300.0).abs() < f32::EPSILON);
    }

    #[test]
    fn abbreviated_update_indexes_known_play_modes() {
        let mut state = full_state();
        assert!(state.apply_frame(b"((t 12.5)(pm 1)(sl 2))(RDS 0 1)"));

        assert!((state.time - 12.5).abs() < f32::EPSILON);
        assert_eq!(state.play_mode, "KickOff_Left");
        assert_eq!(state.score_left, 2);
        assert_eq!(state.score_right, 0);
    }

    #[test]
    fn unknown_play_mode_index_keeps_the_current_mode() {
        let mut state = full_state();
        assert!(!state.apply_frame(b"((pm 42))"));
        assert_eq!(state.play_mode, "BeforeKickOff");
    }

    #[test]
    fn scene_graph_after_the_environment_is_ignored() {
        let mut state = full_state();
        assert!(!state.apply_frame(b"((t 0))((nd (t 99) (sl 7)))"));
        assert_eq!(state.score_left, 0);
        assert!(state.time.abs() < f32::EPSILON);
    }

    #[test]
    fn malformed_frames_change_nothing() {
        let mut state = GameState::default();
        assert!(!state.apply_frame(b""));
        assert!(!state.apply_frame(b"((time abc)(sl -1)"));
        assert!(!state.apply_frame(&[0xff, 0xfe, 0x28]));
        assert_eq!(state, GameState::default());
    }
}
