//! Local picture of the match: where the ball and the agents stand, and
//! what the user has selected.
//!
//! Positions are kept in the server frame on the ground plane; the world
//! model view converts on the way out.

use pitchside_core::coords::to_world_space;
use pitchside_core::{
    AgentId, SelectableEntity, Selection, ServerPoint, Side, WorldModel, WorldPoint,
};

use crate::echo::Placement;

/// Field length along the server x axis, metres.
pub const FIELD_LENGTH: f32 = 30.0;
/// Field width along the server y axis, metres.
pub const FIELD_WIDTH: f32 = 20.0;
pub const BALL_RADIUS: f32 = 0.042;
/// Height of an agent's bounding-box centre.
const AGENT_CENTER_HEIGHT: f32 = 0.28;

/// Left-team kick-off formation, server frame. The right team mirrors it.
const FORMATION: [(f32, f32); 11] = [
    (-14.0, 0.0),
    (-10.0, -6.0),
    (-11.0, -2.0),
    (-11.0, 2.0),
    (-10.0, 6.0),
    (-6.0, -4.0),
    (-6.5, 0.0),
    (-6.0, 4.0),
    (-2.5, -6.5),
    (-1.5, 0.0),
    (-2.5, 6.5),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub side: Side,
    pub id: AgentId,
    pub position: ServerPoint,
}

#[derive(Debug, Clone)]
pub struct Scene {
    ball: ServerPoint,
    agents: Vec<Agent>,
    selected: Option<SelectableEntity>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::kick_off_formation()
    }
}

impl Scene {
    /// Both teams lined up for a kick-off, ball on the centre spot.
    pub fn kick_off_formation() -> Self {
        let mut agents = Vec::with_capacity(FORMATION.len() * 2);
        for (id, (x, y)) in (1..).zip(FORMATION) {
            agents.push(Agent {
                side: Side::Left,
                id,
                position: ServerPoint::new(x, y, 0.0),
            });
            agents.push(Agent {
                side: Side::Right,
                id,
                position: ServerPoint::new(-x, -y, 0.0),
            });
        }
        agents.sort_by_key(|a| (a.side == Side::Right, a.id));

        Self {
            ball: ServerPoint::new(0.0, 0.0, 0.0),
            agents,
            selected: None,
        }
    }

    pub fn ball(&self) -> ServerPoint {
        self.ball
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn selected(&self) -> Option<SelectableEntity> {
        self.selected
    }

    /// Every selectable entity with its ground position, ball first.
    pub fn entities(&self) -> Vec<(SelectableEntity, ServerPoint)> {
        std::iter::once((SelectableEntity::Ball, self.ball))
            .chain(self.agents.iter().map(|a| {
                (
                    SelectableEntity::Agent {
                        side: a.side,
                        id: a.id,
                    },
                    a.position,
                )
            }))
            .collect()
    }

    /// Follow a placement sent to the server. Heights are dropped; the
    /// scene keeps ground positions only.
    pub fn apply(&mut self, placement: Placement) {
        match placement {
            Placement::Ball(position) => self.ball = on_ground(position),
            Placement::Agent { side, id, position } => {
                if let Some(agent) = self
                    .agents
                    .iter_mut()
                    .find(|a| a.side == side && a.id == id)
                {
                    agent.position = on_ground(position);
                }
            }
        }
    }

    /// Select the entity after the current one, wrapping around.
    pub fn cycle_selection(&mut self) {
        let entities = self.entities();
        let next = match self.selected {
            None => 0,
            Some(current) => entities
                .iter()
                .position(|(e, _)| *e == current)
                .map_or(0, |i| (i + 1) % entities.len()),
        };
        self.selected = entities.get(next).map(|(e, _)| *e);
    }

    fn center_of(&self, entity: SelectableEntity) -> Option<WorldPoint> {
        let (ground, height) = match entity {
            SelectableEntity::Ball => (self.ball, BALL_RADIUS),
            SelectableEntity::Agent { side, id } => (
                self.agents
                    .iter()
                    .find(|a| a.side == side && a.id == id)?
                    .position,
                AGENT_CENTER_HEIGHT,
            ),
        };
        let mut center = ground;
        center.0.z = height;
        Some(to_world_space(center))
    }
}

fn on_ground(mut point: ServerPoint) -> ServerPoint {
    point.0.z = 0.0;
    point
}

impl WorldModel for Scene {
    fn ball_position(&self) -> WorldPoint {
        let mut ball = self.ball;
        ball.0.z = BALL_RADIUS;
        to_world_space(ball)
    }

    fn ball_radius(&self) -> f32 {
        BALL_RADIUS
    }

    fn selection(&self) -> Option<Selection> {
        let entity = self.selected?;
        Some(Selection {
            entity,
            center: self.center_of(entity)?,
        })
    }

    fn set_selected(&mut self, entity: Option<SelectableEntity>) {
        self.selected = entity;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn formation_has_eleven_per_side_on_their_own_half() {
        let scene = Scene::kick_off_formation();
        assert_eq!(scene.agents().len(), 22);
        for agent in scene.agents() {
            match agent.side {
                Side::Left => assert!(agent.position.0.x < 0.0, "{agent:?}"),
                Side::Right => assert!(agent.position.0.x > 0.0, "{agent:?}"),
            }
        }
    }

    #[test]
    fn ball_sits_on_the_ground_in_world_frame() {
        let scene = Scene::default();
        let ball = scene.ball_position();
        assert_eq!(ball.0.y, BALL_RADIUS);
    }

    #[test]
    fn selection_reports_bounding_box_centre() {
        let mut scene = Scene::default();
        let keeper = SelectableEntity::Agent {
            side: Side::Left,
            id: 1,
        };
        scene.set_selected(Some(keeper));
        let selection = scene.selection().unwrap();
        assert_eq!(selection.entity, keeper);
        assert_eq!(selection.center, WorldPoint::new(14.0, AGENT_CENTER_HEIGHT, 0.0));
    }

    #[test]
    fn placements_move_entities_on_the_ground() {
        let mut scene = Scene::default();
        scene.apply(Placement::Ball(ServerPoint::new(3.0, -1.0, 0.042)));
        scene.apply(Placement::Agent {
            side: Side::Right,
            id: 9,
            position: ServerPoint::new(4.0, 4.0, 0.38),
        });

        assert_eq!(scene.ball(), ServerPoint::new(3.0, -1.0, 0.0));
        let nine = scene
            .agents()
            .iter()
            .find(|a| a.side == Side::Right && a.id == 9)
            .unwrap();
        assert_eq!(nine.position, ServerPoint::new(4.0, 4.0, 0.0));
    }

    #[test]
    fn unknown_agent_placement_is_ignored() {
        let mut scene = Scene::default();
        let before = scene.agents().to_vec();
        scene.apply(Placement::Agent {
            side: Side::Left,
            id: 42,
            position: ServerPoint::new(0.0, 0.0, 0.0),
        });
        assert_eq!(scene.agents(), before.as_slice());
    }

    #[test]
    fn cycling_walks_every_entity_and_wraps() {
        let mut scene = Scene::default();
        scene.cycle_selection();
        assert_eq!(scene.selected(), Some(SelectableEntity::Ball));
        scene.cycle_selection();
        assert_eq!(
            scene.selected(),
            Some(SelectableEntity::Agent {
                side: Side::Left,
                id: 1
            })
        );
        for _ in 0..21 {
            scene.cycle_selection();
        }
        assert_eq!(
            scene.selected(),
            Some(SelectableEntity::Agent {
                side: Side::Right,
                id: 11
            })
        );
        scene.cycle_selection();
        assert_eq!(scene.selected(), Some(SelectableEntity::Ball));
    }
}
