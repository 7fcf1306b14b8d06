//! Overlay layer state. The view reads it; the controller writes it.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use pitchside_core::{Overlay, OverlayHost};

/// How long a notice such as "Goal left!" stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Shortest wall-clock span a speed sample is taken over.
pub const SPEED_WINDOW: Duration = Duration::from_millis(500);

/// Simulated seconds per wall-clock second, measured between play-state
/// updates at least [`SPEED_WINDOW`] apart.
#[derive(Debug, Clone, Default)]
pub struct ServerSpeed {
    anchor: Option<(f32, Instant)>,
    ratio: Option<f32>,
}

impl ServerSpeed {
    pub fn record(&mut self, sim_time: f32, now: Instant) {
        let Some((anchor_time, anchor_at)) = self.anchor else {
            self.anchor = Some((sim_time, now));
            return;
        };

        let sim = sim_time - anchor_time;
        if sim < 0.0 {
            // Clock was reset; start over from here.
            *self = Self {
                anchor: Some((sim_time, now)),
                ratio: None,
            };
            return;
        }

        let wall = now.saturating_duration_since(anchor_at);
        if wall < SPEED_WINDOW {
            return;
        }
        self.ratio = Some(sim / wall.as_secs_f32());
        self.anchor = Some((sim_time, now));
    }

    pub fn ratio(&self) -> Option<f32> {
        self.ratio
    }
}

#[derive(Debug, Clone)]
struct Notice {
    text: String,
    shown_at: Instant,
}

#[derive(Debug, Clone)]
pub struct OverlayState {
    visible: HashSet<Overlay>,
    message: String,
    background_input: bool,
    notice: Option<Notice>,
    speed: ServerSpeed,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self {
            visible: HashSet::new(),
            message: String::new(),
            background_input: true,
            notice: None,
            speed: ServerSpeed::default(),
        }
    }
}

impl OverlayState {
    pub fn message(&self) -> &str {
        &self.message
    }

    /// False while a modal overlay owns the input.
    pub fn background_input(&self) -> bool {
        self.background_input
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|n| n.text.as_str())
    }

    /// Latest measured server speed, if two samples have come in.
    pub fn server_speed(&self) -> Option<f32> {
        self.speed.ratio()
    }

    pub fn record_sim_time(&mut self, sim_time: f32, now: Instant) {
        self.speed.record(sim_time, now);
    }

    /// Forget the measurement, e.g. when the link drops.
    pub fn reset_server_speed(&mut self) {
        self.speed = ServerSpeed::default();
    }

    /// Drop the notice once it has been up for [`NOTICE_TTL`].
    pub fn expire_notice(&mut self, now: Instant) {
        if self
            .notice
            .as_ref()
            .is_some_and(|n| now.duration_since(n.shown_at) >= NOTICE_TTL)
        {
            self.notice = None;
        }
    }
}

impl OverlayHost for OverlayState {
    fn set_visible(&mut self, overlay: Overlay, visible: bool) {
        if visible {
            self.visible.insert(overlay);
        } else {
            self.visible.remove(&overlay);
        }
    }

    fn is_visible(&self, overlay: Overlay) -> bool {
        self.visible.contains(&overlay)
    }

    fn set_message(&mut self, text: &str) {
        text.clone_into(&mut self.message);
    }

    fn set_background_input(&mut self, enabled: bool) {
        self.background_input = enabled;
    }

    fn announce(&mut self, text: &str) {
        self.notice = Some(Notice {
            text: text.to_owned(),
            shown_at: Instant::now(),
        });
    }
}
