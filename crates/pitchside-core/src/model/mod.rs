// ── Domain model ──
//
// Plain value types shared by the dispatcher, tracker and controller.
// Nothing in here talks to the server or the UI.

mod entity;
mod geometry;
mod input;
mod play_state;

pub use entity::{AgentId, SelectableEntity, Selection, Side};
pub use geometry::{ScreenPoint, ServerPoint, Velocity, WorldPoint};
pub use input::{InputEvent, Key, KeyInput, Modifiers, MouseButton, MouseClick};
pub use play_state::{PlayMode, PlayState};

/// Link status as reported by the server collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionStatus {
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}
