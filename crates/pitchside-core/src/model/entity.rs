use super::geometry::WorldPoint;

/// Uniform number of an agent within its team.
pub type AgentId = u32;

/// Team side, as seen from the server's positive x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Side {
    #[strum(serialize = "left")]
    Left,
    #[strum(serialize = "right")]
    Right,
}

/// Something on the field the user can select and move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectableEntity {
    Ball,
    Agent { side: Side, id: AgentId },
}

impl SelectableEntity {
    pub fn is_ball(self) -> bool {
        matches!(self, Self::Ball)
    }
}

/// The world model's current selection together with the centre of its
/// bounding box in the renderer frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub entity: SelectableEntity,
    pub center: WorldPoint,
}
