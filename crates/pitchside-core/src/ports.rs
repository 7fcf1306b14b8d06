//! Collaborators the controller is built from.
//!
//! The controller owns one value of each and never reaches for anything
//! global. The TUI provides real implementations; tests provide recording
//! fakes.

use crate::model::{
    AgentId, PlayMode, ScreenPoint, SelectableEntity, Selection, ServerPoint, Side, Velocity,
    WorldPoint,
};

/// Remote match server. Every call is fire-and-forget; a link that is not
/// connected drops what it is given.
pub trait ServerLink {
    fn is_connected(&self) -> bool;
    fn connect(&mut self);
    fn kill_server(&mut self);
    fn kick_off(&mut self, side: Side);
    fn free_kick(&mut self, side: Side);
    fn direct_free_kick(&mut self, side: Side);
    fn drop_ball(&mut self);
    fn reset_time(&mut self);
    fn request_full_state(&mut self);
    fn move_ball(&mut self, position: ServerPoint, velocity: Option<Velocity>);
    fn move_agent(&mut self, position: ServerPoint, side: Side, id: AgentId);
    fn set_play_mode(&mut self, mode: &PlayMode);
}

/// The locally rendered view of the match. Owns the selection.
pub trait WorldModel {
    /// Ball centre in the renderer frame.
    fn ball_position(&self) -> WorldPoint;
    fn ball_radius(&self) -> f32;
    fn selection(&self) -> Option<Selection>;
    fn set_selected(&mut self, entity: Option<SelectableEntity>);
}

/// Maps viewport positions onto the field.
pub trait FieldPicker {
    /// Point on the field plane under `screen`, if any.
    fn pick_field(&self, screen: ScreenPoint) -> Option<WorldPoint>;

    /// Entity under `screen`, if any.
    fn pick_entity(&self, screen: ScreenPoint) -> Option<SelectableEntity>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Overlay {
    ConnectionMessage,
    PlaymodeMenu,
    ServerSpeed,
}

/// Overlay layer of the host UI.
pub trait OverlayHost {
    fn set_visible(&mut self, overlay: Overlay, visible: bool);
    fn is_visible(&self, overlay: Overlay) -> bool;
    /// Text of the connection message overlay.
    fn set_message(&mut self, text: &str);
    /// While disabled, input goes to the focused overlay only.
    fn set_background_input(&mut self, enabled: bool);
    /// Short-lived notice such as a goal.
    fn announce(&mut self, text: &str);
}
