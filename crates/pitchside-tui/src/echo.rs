//! Server link wrapper that remembers the placements it forwarded.
//!
//! Only game state is decoded from the server, not scene positions, so the
//! local scene follows the user's own moves instead: every ball or agent
//! placement that reaches a connected link is queued here and drained into
//! the [`Scene`].
//!
//! [`Scene`]: crate::scene::Scene

use pitchside_core::{AgentId, PlayMode, ServerLink, ServerPoint, Side, Velocity};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Ball(ServerPoint),
    Agent {
        side: Side,
        id: AgentId,
        position: ServerPoint,
    },
}

#[derive(Debug)]
pub struct EchoLink<L> {
    inner: L,
    placements: Vec<Placement>,
}

impl<L: ServerLink> EchoLink<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            placements: Vec::new(),
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    pub fn take_placements(&mut self) -> Vec<Placement> {
        std::mem::take(&mut self.placements)
    }

    fn record(&mut self, placement: Placement) {
        if self.inner.is_connected() {
            self.placements.push(placement);
        }
    }
}

impl<L: ServerLink> ServerLink for EchoLink<L> {
    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    fn connect(&mut self) {
        self.inner.connect();
    }

    fn kill_server(&mut self) {
        self.inner.kill_server();
    }

    fn kick_off(&mut self, side: Side) {
        self.inner.kick_off(side);
    }

    fn free_kick(&mut self, side: Side) {
        self.inner.free_kick(side);
    }

    fn direct_free_kick(&mut self, side: Side) {
        self.inner.direct_free_kick(side);
    }

    fn drop_ball(&mut self) {
        self.inner.drop_ball();
    }

    fn reset_time(&mut self) {
        self.inner.reset_time();
    }

    fn request_full_state(&mut self) {
        self.inner.request_full_state();
    }

    fn move_ball(&mut self, position: ServerPoint, velocity: Option<Velocity>) {
        self.record(Placement::Ball(position));
        self.inner.move_ball(position, velocity);
    }

    fn move_agent(&mut self, position: ServerPoint, side: Side, id: AgentId) {
        self.record(Placement::Agent { side, id, position });
        self.inner.move_agent(position, side, id);
    }

    fn set_play_mode(&mut self, mode: &PlayMode) {
        self.inner.set_play_mode(mode);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct CountingLink {
        connected: bool,
        moves: usize,
    }

    impl ServerLink for CountingLink {
        fn is_connected(&self) -> bool {
            self.connected
        }
        fn connect(&mut self) {}
        fn kill_server(&mut self) {}
        fn kick_off(&mut self, _: Side) {}
        fn free_kick(&mut self, _: Side) {}
        fn direct_free_kick(&mut self, _: Side) {}
        fn drop_ball(&mut self) {}
        fn reset_time(&mut self) {}
        fn request_full_state(&mut self) {}
        fn move_ball(&mut self, _: ServerPoint, _: Option<Velocity>) {
            self.moves += 1;
        }
        fn move_agent(&mut self, _: ServerPoint, _: Side, _: AgentId) {
            self.moves += 1;
        }
        fn set_play_mode(&mut self, _: &PlayMode) {}
    }

    #[test]
    fn records_placements_while_connected() {
        let mut link = EchoLink::new(CountingLink {
            connected: true,
            moves: 0,
        });
        link.move_ball(ServerPoint::new(1.0, 2.0, 0.042), None);
        link.move_agent(ServerPoint::new(-3.0, 0.0, 0.38), Side::Right, 7);

        assert_eq!(link.inner().moves, 2);
        assert_eq!(
            link.take_placements(),
            vec![
                Placement::Ball(ServerPoint::new(1.0, 2.0, 0.042)),
                Placement::Agent {
                    side: Side::Right,
                    id: 7,
                    position: ServerPoint::new(-3.0, 0.0, 0.38),
                },
            ]
        );
        assert!(link.take_placements().is_empty());
    }

    #[test]
    fn forwards_but_does_not_record_while_disconnected() {
        let mut link = EchoLink::new(CountingLink::default());
        link.move_ball(ServerPoint::new(0.0, 0.0, 0.0), None);
        assert_eq!(link.inner().moves, 1);
        assert!(link.take_placements().is_empty());
    }
}
