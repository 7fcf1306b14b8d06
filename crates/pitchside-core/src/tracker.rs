//! Connection status, play-mode edges and the user-facing status message.
//!
//! The tracker never calls anything itself. Each notification returns the
//! [`TrackerEffect`]s the controller has to carry out, which keeps the state
//! machine testable on its own.

use tracing::{debug, info};

use crate::model::{ConnectionStatus, Key, PlayMode, PlayState, Side};

/// Text and visibility of the connection message overlay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlayMessage {
    pub text: String,
    pub visible: bool,
}

/// Follow-up work produced by a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerEffect {
    RequestFullState,
    SelectBall,
    HidePlaymodeMenu,
    Goal(Side),
}

#[derive(Debug, Clone)]
pub struct ConnectionStateTracker {
    endpoint: String,
    auto_connect: bool,
    connect_key: Key,
    status: ConnectionStatus,
    last_play_mode: Option<PlayMode>,
    /// `None` until the first score after a (re)connect has been seen.
    previous_scores: Option<(u32, u32)>,
    message: OverlayMessage,
}

impl ConnectionStateTracker {
    pub fn new(endpoint: impl Into<String>, auto_connect: bool, connect_key: Key) -> Self {
        let mut tracker = Self {
            endpoint: endpoint.into(),
            auto_connect,
            connect_key,
            status: ConnectionStatus::Disconnected,
            last_play_mode: None,
            previous_scores: None,
            message: OverlayMessage::default(),
        };
        tracker.message = OverlayMessage {
            text: tracker.status_message(None),
            visible: true,
        };
        tracker
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn message(&self) -> &OverlayMessage {
        &self.message
    }

    pub fn previous_scores(&self) -> Option<(u32, u32)> {
        self.previous_scores
    }

    pub fn last_play_mode(&self) -> Option<&PlayMode> {
        self.last_play_mode.as_ref()
    }

    /// Message shown while not connected.
    pub fn status_message(&self, state: Option<&PlayState>) -> String {
        if state.is_some_and(PlayState::is_between_halves) {
            "Waiting for second half...".to_owned()
        } else if self.auto_connect {
            format!("Trying to connect to {}...", self.endpoint)
        } else {
            format!("Press {} to connect to {}.", self.connect_key, self.endpoint)
        }
    }

    pub fn connection_changed(
        &mut self,
        status: ConnectionStatus,
        state: Option<&PlayState>,
    ) -> Vec<TrackerEffect> {
        let previous = std::mem::replace(&mut self.status, status);
        info!(from = %previous, to = %status, "match server connection changed");

        self.message = OverlayMessage {
            text: self.status_message(state),
            visible: !status.is_connected(),
        };

        let mut effects = vec![TrackerEffect::HidePlaymodeMenu];
        if status.is_connected() {
            effects.push(TrackerEffect::SelectBall);
        } else {
            self.previous_scores = None;
            self.last_play_mode = None;
        }
        effects
    }

    pub fn play_state_changed(&mut self, state: &PlayState) -> Vec<TrackerEffect> {
        let mut effects = self.track_scores(state);

        if self.last_play_mode.as_ref() == Some(&state.play_mode) {
            return effects;
        }
        debug!(play_mode = %state.play_mode, "play mode changed");
        self.last_play_mode = Some(state.play_mode.clone());

        if state.play_mode.is_kick_off() {
            effects.push(TrackerEffect::RequestFullState);
        }

        if state.play_mode == PlayMode::GameOver {
            self.message = OverlayMessage {
                text: format!(
                    "Half Over, {} {}:{} {}",
                    state.left_display_name(),
                    state.score_left,
                    state.score_right,
                    state.right_display_name()
                ),
                visible: true,
            };
        } else {
            self.message.visible = false;
        }
        effects
    }

    fn track_scores(&mut self, state: &PlayState) -> Vec<TrackerEffect> {
        let current = (state.score_left, state.score_right);
        let Some((left, right)) = self.previous_scores.replace(current) else {
            return Vec::new();
        };

        let mut goals = Vec::new();
        if current.0 > left {
            goals.push(TrackerEffect::Goal(Side::Left));
        }
        if current.1 > right {
            goals.push(TrackerEffect::Goal(Side::Right));
        }
        goals
    }
}
