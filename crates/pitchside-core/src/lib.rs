//! Live-match interaction logic between a match monitor's UI and the
//! SimSpark match server.
//!
//! - **[`LiveInteractionController`]**: Composition root. Receives key and
//!   mouse input from the host UI plus connection and play-state
//!   notifications from the server link, and turns them into
//!   [`MatchCommand`]s, selection changes and overlay updates.
//!
//! - **[`InputCommandDispatcher`]**: Stateless mapping from keys and clicks
//!   to commands, applying the connection / play-mode / clock preconditions.
//!
//! - **[`ConnectionStateTracker`]**: Connection status, edge detection on
//!   play-mode changes, cached scores and the user-facing status message.
//!
//! - **[`coords`] / [`kick`]**: Renderer↔server frame transform, field
//!   picking, and the launch-velocity model used for ball pushes.
//!
//! - **[`ports`]**: Collaborator traits ([`ServerLink`], [`WorldModel`],
//!   [`FieldPicker`], [`OverlayHost`]) injected at construction;
//!   [`MonitorLink`] implements `ServerLink` over `pitchside-api`.

pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod coords;
pub mod dispatch;
pub mod error;
pub mod kick;
pub mod link;
pub mod model;
pub mod ports;
pub mod tracker;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::MatchCommand;
pub use config::{ControllerConfig, LinkConfig};
pub use controller::LiveInteractionController;
pub use coords::FieldCamera;
pub use dispatch::{DispatchContext, InputCommandDispatcher, KeyBindings, MouseAction};
pub use error::CoreError;
pub use kick::KickKind;
pub use link::MonitorLink;
pub use ports::{FieldPicker, Overlay, OverlayHost, ServerLink, WorldModel};
pub use tracker::{ConnectionStateTracker, OverlayMessage, TrackerEffect};

pub use model::{
    AgentId, ConnectionStatus, InputEvent, Key, KeyInput, Modifiers, MouseButton, MouseClick,
    PlayMode, PlayState, ScreenPoint, SelectableEntity, Selection, ServerPoint, Side, Velocity,
    WorldPoint,
};
