//! The live interaction controller.
//!
//! Owns the dispatcher, the tracker and the four collaborators. Every
//! handler runs to completion on the caller's thread; the only thing that
//! leaves the process is whatever the [`ServerLink`] sends.

use tracing::{debug, trace};

use crate::command::MatchCommand;
use crate::config::ControllerConfig;
use crate::coords::to_server_space;
use crate::dispatch::{DispatchContext, InputCommandDispatcher, MouseAction};
use crate::kick::{KickKind, compute_kick_velocity};
use crate::model::{
    ConnectionStatus, InputEvent, KeyInput, MouseClick, PlayMode, PlayState, SelectableEntity,
    Side, WorldPoint,
};
use crate::ports::{FieldPicker, Overlay, OverlayHost, ServerLink, WorldModel};
use crate::tracker::{ConnectionStateTracker, TrackerEffect};

/// Height above the selection's bounding-box centre that moved entities
/// are dropped from.
const MOVE_LIFT: f32 = 0.1;

pub struct LiveInteractionController<L, W, P, O> {
    link: L,
    world: W,
    picker: P,
    overlays: O,
    dispatcher: InputCommandDispatcher,
    tracker: ConnectionStateTracker,
    play_state: Option<PlayState>,
}

impl<L, W, P, O> LiveInteractionController<L, W, P, O>
where
    L: ServerLink,
    W: WorldModel,
    P: FieldPicker,
    O: OverlayHost,
{
    pub fn new(config: &ControllerConfig, link: L, world: W, picker: P, mut overlays: O) -> Self {
        let tracker = ConnectionStateTracker::new(
            config.link.endpoint(),
            config.link.auto_connect,
            config.bindings.connect,
        );

        let message = tracker.message();
        overlays.set_message(&message.text);
        overlays.set_visible(Overlay::ConnectionMessage, message.visible);
        overlays.set_visible(Overlay::ServerSpeed, config.show_server_speed);
        overlays.set_visible(Overlay::PlaymodeMenu, false);

        Self {
            link,
            world,
            picker,
            overlays,
            dispatcher: InputCommandDispatcher::new(config.bindings.clone()),
            tracker,
            play_state: None,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn picker(&self) -> &P {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut P {
        &mut self.picker
    }

    pub fn overlays(&self) -> &O {
        &self.overlays
    }

    pub fn overlays_mut(&mut self) -> &mut O {
        &mut self.overlays
    }

    pub fn tracker(&self) -> &ConnectionStateTracker {
        &self.tracker
    }

    pub fn dispatcher(&self) -> &InputCommandDispatcher {
        &self.dispatcher
    }

    pub fn play_state(&self) -> Option<&PlayState> {
        self.play_state.as_ref()
    }

    // ── Input ────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key(input) => self.on_key_pressed(input),
            InputEvent::MouseClick(click) => self.on_mouse_clicked(click),
        }
    }

    pub fn on_key_pressed(&mut self, input: KeyInput) {
        let ctx = self.dispatch_context();
        for command in self.dispatcher.resolve_key(input.key, input.modifiers, ctx) {
            self.issue(command);
        }
    }

    pub fn on_mouse_clicked(&mut self, click: MouseClick) {
        let ctx = self.dispatch_context();
        let has_selection = self.world.selection().is_some();
        let Some(action) = self.dispatcher.resolve_click(&click, has_selection, ctx) else {
            return;
        };

        match action {
            MouseAction::Select(at) => {
                let entity = self.picker.pick_entity(at);
                trace!(?entity, "selection changed");
                self.world.set_selected(entity);
            }
            MouseAction::MoveSelection(at) => match self.picker.pick_field(at) {
                Some(point) => self.move_selection(point),
                None => trace!("move ignored, no field point under cursor"),
            },
            MouseAction::Kick { target, kind } => match self.picker.pick_field(target) {
                Some(point) => self.push_ball_toward(point, kind),
                None => trace!(%kind, "kick ignored, no field point under cursor"),
            },
        }
    }

    // ── Server notifications ─────────────────────────────────────────

    pub fn on_connection_changed(&mut self, connected: bool) {
        let status = if connected {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        };
        self.on_connection_status(status);
    }

    pub fn on_connection_status(&mut self, status: ConnectionStatus) {
        let effects = self
            .tracker
            .connection_changed(status, self.play_state.as_ref());
        self.apply(effects);
    }

    pub fn on_play_state_changed(&mut self, state: PlayState) {
        let effects = self.tracker.play_state_changed(&state);
        self.play_state = Some(state);
        self.apply(effects);
    }

    // ── Play-mode menu ───────────────────────────────────────────────

    /// Close the menu and switch the server to `mode`.
    pub fn choose_play_mode(&mut self, mode: PlayMode) {
        self.close_playmode_menu();
        self.issue(MatchCommand::SetPlayMode(mode));
    }

    pub fn close_playmode_menu(&mut self) {
        self.overlays.set_visible(Overlay::PlaymodeMenu, false);
        self.overlays.set_background_input(true);
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Carry out one command, either locally or through the link.
    pub fn issue(&mut self, command: MatchCommand) {
        debug!(%command, remote = command.is_remote(), "issuing match command");
        match command {
            MatchCommand::KickOff(side) => self.link.kick_off(side),
            MatchCommand::FreeKick(side) => self.link.free_kick(side),
            MatchCommand::DirectFreeKick(side) => self.link.direct_free_kick(side),
            MatchCommand::DropBall => self.link.drop_ball(),
            MatchCommand::MoveBall { position, velocity } => {
                self.link.move_ball(position, velocity);
            }
            MatchCommand::MoveAgent { position, side, id } => {
                self.link.move_agent(position, side, id);
            }
            MatchCommand::ResetClock => self.link.reset_time(),
            MatchCommand::RequestFullState => self.link.request_full_state(),
            MatchCommand::Connect => self.link.connect(),
            MatchCommand::KillServer => self.link.kill_server(),
            MatchCommand::SetPlayMode(mode) => self.link.set_play_mode(&mode),
            MatchCommand::ToggleServerSpeedOverlay => {
                let visible = self.overlays.is_visible(Overlay::ServerSpeed);
                self.overlays.set_visible(Overlay::ServerSpeed, !visible);
            }
            MatchCommand::OpenPlaymodeMenu => {
                self.overlays.set_background_input(false);
                self.overlays.set_visible(Overlay::PlaymodeMenu, true);
            }
        }
    }

    fn dispatch_context(&self) -> DispatchContext {
        let state = self.play_state.as_ref();
        DispatchContext {
            connected: self.link.is_connected(),
            play_modes_available: state.is_some_and(PlayState::has_play_modes),
            clock_expired: state.is_some_and(PlayState::clock_expired),
        }
    }

    /// Move the selected entity to `point`, dropped from just above its
    /// current bounding-box centre.
    fn move_selection(&mut self, mut point: WorldPoint) {
        let Some(selection) = self.world.selection() else {
            return;
        };
        point.0.y = selection.center.0.y + MOVE_LIFT;
        let mut position = to_server_space(point);

        let command = match selection.entity {
            SelectableEntity::Ball => {
                position.0.z = self.world.ball_radius();
                MatchCommand::MoveBall {
                    position,
                    velocity: None,
                }
            }
            SelectableEntity::Agent { side, id } => MatchCommand::MoveAgent { position, side, id },
        };
        self.issue(command);
    }

    /// Kick the ball from where it lies towards `target`.
    fn push_ball_toward(&mut self, target: WorldPoint, kind: KickKind) {
        let target = to_server_space(target);
        let mut ball = to_server_space(self.world.ball_position());
        ball.0.z = self.world.ball_radius();

        let velocity = compute_kick_velocity(ball, target, kind);
        self.issue(MatchCommand::MoveBall {
            position: ball,
            velocity: Some(velocity),
        });
    }

    fn apply(&mut self, effects: Vec<TrackerEffect>) {
        for effect in effects {
            match effect {
                TrackerEffect::RequestFullState => self.issue(MatchCommand::RequestFullState),
                TrackerEffect::SelectBall => self.world.set_selected(Some(SelectableEntity::Ball)),
                TrackerEffect::HidePlaymodeMenu => self.close_playmode_menu(),
                TrackerEffect::Goal(side) => {
                    let team = self.team_name(side);
                    self.overlays.announce(&format!("Goal {team}!"));
                }
            }
        }

        let message = self.tracker.message();
        self.overlays.set_message(&message.text);
        self.overlays
            .set_visible(Overlay::ConnectionMessage, message.visible);
    }

    fn team_name(&self, side: Side) -> String {
        match (&self.play_state, side) {
            (Some(state), Side::Left) => state.left_display_name().to_owned(),
            (Some(state), Side::Right) => state.right_display_name().to_owned(),
            (None, _) => side.to_string(),
        }
    }
}
