//! Application core: event loop, action dispatch, rendering.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{Frame, layout::Rect};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use pitchside_config::RESERVED_KEYS;
use pitchside_core::{
    ControllerConfig, InputEvent, LiveInteractionController, MonitorLink, Overlay, OverlayHost,
    PlayMode,
};

use crate::action::{Action, MenuAction};
use crate::bridge::run_link_bridge;
use crate::echo::EchoLink;
use crate::event::{Event, EventReader};
use crate::field::FieldView;
use crate::input::{translate_key, translate_mouse};
use crate::overlay::OverlayState;
use crate::scene::Scene;
use crate::terminal::Tui;
use crate::view::{self, ViewModel};

type Controller = LiveInteractionController<EchoLink<MonitorLink>, Scene, FieldView, OverlayState>;

/// What the key handler needs to know about the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct KeyContext {
    help_visible: bool,
    menu_open: bool,
}

/// Top-level application state and event loop.
pub struct App {
    controller: Controller,
    endpoint: String,
    running: bool,
    help_visible: bool,
    /// Highlighted row of the play-mode menu.
    menu_cursor: usize,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    cancel: CancellationToken,
}

impl App {
    /// Spawns the server link; call inside the tokio runtime.
    pub fn new(config: &ControllerConfig) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let link = MonitorLink::spawn(&config.link, cancel.child_token())?;
        let mut controller = LiveInteractionController::new(
            config,
            EchoLink::new(link),
            Scene::default(),
            FieldView::default(),
            OverlayState::default(),
        );
        let entities = controller.world().entities();
        controller.picker_mut().set_entities(entities);

        Ok(Self {
            controller,
            endpoint: config.link.endpoint(),
            running: true,
            help_visible: false,
            menu_cursor: 0,
            action_tx,
            action_rx,
            cancel,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        let (width, height) = tui.size().unwrap_or((80, 24));
        self.resize(width, height);

        let link = self.controller.link().inner();
        tokio::spawn(run_link_bridge(
            link.subscribe(),
            link.subscribe_game_state(),
            self.action_tx.clone(),
            self.cancel.child_token(),
        ));

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(endpoint = %self.endpoint, "monitor event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            let action = match event {
                Event::Key(key) => self.handle_key_event(key),
                Event::Mouse(mouse) => self.handle_mouse_event(mouse),
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                Event::Tick => Some(Action::Tick),
                Event::Render => Some(Action::Render),
            };
            if let Some(action) = action {
                self.action_tx.send(action)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action);

                if action == Action::Render {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        self.controller.link().inner().shutdown();
        self.cancel.cancel();
        info!("monitor event loop ended");
        Ok(())
    }

    fn key_context(&self) -> KeyContext {
        KeyContext {
            help_visible: self.help_visible,
            menu_open: self.controller.overlays().is_visible(Overlay::PlaymodeMenu),
        }
    }

    fn handle_key_event(&self, key: KeyEvent) -> Option<Action> {
        key_action(key, self.key_context())
    }

    /// Clicks go to the field only while no modal overlay holds the input.
    fn handle_mouse_event(&self, mouse: MouseEvent) -> Option<Action> {
        if !self.controller.overlays().background_input() {
            return None;
        }
        translate_mouse(mouse).map(|click| Action::Input(InputEvent::MouseClick(click)))
    }

    fn process_action(&mut self, action: &Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Resize(w, h) => self.resize(*w, *h),
            Action::Tick => self.controller.overlays_mut().expire_notice(Instant::now()),
            // Drawn by the main loop.
            Action::Render => {}
            Action::Input(event) => {
                self.controller.handle_input(*event);
                self.follow_placements();
            }
            Action::Connection(status) => {
                if !status.is_connected() {
                    self.controller.overlays_mut().reset_server_speed();
                }
                self.controller.on_connection_status(*status);
                self.follow_placements();
            }
            Action::PlayState(state) => {
                self.controller
                    .overlays_mut()
                    .record_sim_time(state.time, Instant::now());
                self.controller.on_play_state_changed(state.clone());
                self.follow_placements();
            }
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::CycleSelection => self.controller.world_mut().cycle_selection(),
            Action::Menu(menu) => self.navigate_menu(*menu),
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        let areas = view::layout(Rect::new(0, 0, width, height));
        debug!(field = ?areas.field, "field area resized");
        self.controller.picker_mut().set_area(areas.field);
    }

    /// Move the scene to wherever the last commands put the ball and agents.
    fn follow_placements(&mut self) {
        let placements = self.controller.link_mut().take_placements();
        if placements.is_empty() {
            return;
        }
        for placement in placements {
            self.controller.world_mut().apply(placement);
        }
        let entities = self.controller.world().entities();
        self.controller.picker_mut().set_entities(entities);
    }

    fn menu_modes(&self) -> Vec<PlayMode> {
        self.controller
            .play_state()
            .and_then(|state| state.play_modes.clone())
            .unwrap_or_default()
    }

    fn navigate_menu(&mut self, menu: MenuAction) {
        let modes = self.menu_modes();
        match menu {
            MenuAction::Up => self.menu_cursor = self.menu_cursor.saturating_sub(1),
            MenuAction::Down => {
                self.menu_cursor = (self.menu_cursor + 1).min(modes.len().saturating_sub(1));
            }
            MenuAction::Choose => {
                if let Some(mode) = modes.into_iter().nth(self.menu_cursor) {
                    self.controller.choose_play_mode(mode);
                    self.menu_cursor = 0;
                }
            }
            MenuAction::Close => {
                self.controller.close_playmode_menu();
                self.menu_cursor = 0;
            }
        }
    }

    fn render(&self, frame: &mut Frame) {
        let modes = self.menu_modes();
        let vm = ViewModel {
            scene: self.controller.world(),
            overlays: self.controller.overlays(),
            tracker: self.controller.tracker(),
            play_state: self.controller.play_state(),
            bindings: self.controller.dispatcher().bindings(),
            endpoint: &self.endpoint,
            menu_modes: &modes,
            menu_cursor: self.menu_cursor,
            help_visible: self.help_visible,
        };
        view::render(frame, &vm);
    }
}

/// Map a key press to an action. Help and the play-mode menu take the
/// keyboard while open; everything else falls through to the controller.
fn key_action(key: KeyEvent, ctx: KeyContext) -> Option<Action> {
    if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if ctx.help_visible {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
            _ => None,
        };
    }

    if ctx.menu_open {
        let menu = match key.code {
            KeyCode::Up => MenuAction::Up,
            KeyCode::Down => MenuAction::Down,
            KeyCode::Enter => MenuAction::Choose,
            KeyCode::Esc => MenuAction::Close,
            _ => return None,
        };
        return Some(Action::Menu(menu));
    }

    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char(c)) if RESERVED_KEYS.contains(&c) => Some(Action::Quit),
        (_, KeyCode::Char('?')) => Some(Action::ToggleHelp),
        (KeyModifiers::NONE, KeyCode::Tab) => Some(Action::CycleSelection),
        _ => translate_key(key).map(|input| Action::Input(InputEvent::Key(input))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pitchside_core::{ConnectionStatus, KeyInput, LinkConfig, Modifiers, PlayState};
    use pretty_assertions::assert_eq;

    use super::*;

    /// App on a link that never dials out.
    fn offline_app() -> App {
        let config = ControllerConfig {
            link: LinkConfig {
                auto_connect: false,
                ..LinkConfig::default()
            },
            ..ControllerConfig::default()
        };
        App::new(&config).unwrap()
    }

    fn press_on(app: &mut App, code: KeyCode) {
        if let Some(action) = app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE)) {
            app.process_action(&action);
        }
    }

    fn menu_state() -> PlayState {
        PlayState {
            initialized: true,
            half_time: 300.0,
            time: 12.0,
            play_modes: Some(vec![PlayMode::from("BeforeKickOff"), PlayMode::KickOffLeft]),
            ..PlayState::default()
        }
    }

    #[tokio::test]
    async fn delivered_play_state_lets_the_menu_open() {
        let mut app = offline_app();
        app.process_action(&Action::Connection(ConnectionStatus::Disconnected));

        press_on(&mut app, KeyCode::Char('o'));
        assert!(!app.controller.overlays().is_visible(Overlay::PlaymodeMenu));

        app.process_action(&Action::PlayState(menu_state()));
        press_on(&mut app, KeyCode::Char('o'));
        assert!(app.controller.overlays().is_visible(Overlay::PlaymodeMenu));
        assert_eq!(app.menu_modes().len(), 2);

        press_on(&mut app, KeyCode::Down);
        assert_eq!(app.menu_cursor, 1);
        press_on(&mut app, KeyCode::Esc);
        assert!(!app.controller.overlays().is_visible(Overlay::PlaymodeMenu));
        assert_eq!(app.menu_cursor, 0);
    }

    #[tokio::test]
    async fn play_states_reach_the_controller() {
        let mut app = offline_app();
        app.process_action(&Action::PlayState(menu_state()));
        assert_eq!(app.controller.overlays().server_speed(), None);
        assert_eq!(app.controller.play_state(), Some(&menu_state()));

        app.process_action(&Action::Connection(ConnectionStatus::Disconnected));
        assert_eq!(app.controller.overlays().server_speed(), None);
    }

    fn press(code: KeyCode, modifiers: KeyModifiers, ctx: KeyContext) -> Option<Action> {
        key_action(KeyEvent::new(code, modifiers), ctx)
    }

    const FIELD: KeyContext = KeyContext {
        help_visible: false,
        menu_open: false,
    };

    #[test]
    fn quit_keys() {
        assert_eq!(
            press(KeyCode::Char('q'), KeyModifiers::NONE, FIELD),
            Some(Action::Quit)
        );
        let menu = KeyContext {
            menu_open: true,
            ..FIELD
        };
        assert_eq!(
            press(KeyCode::Char('c'), KeyModifiers::CONTROL, menu),
            Some(Action::Quit)
        );
    }

    #[test]
    fn reserved_keys_never_reach_the_controller() {
        for &c in RESERVED_KEYS {
            assert_eq!(
                press(KeyCode::Char(c), KeyModifiers::NONE, FIELD),
                Some(Action::Quit)
            );
        }
    }

    #[test]
    fn bound_letters_reach_the_controller() {
        assert_eq!(
            press(KeyCode::Char('K'), KeyModifiers::SHIFT, FIELD),
            Some(Action::Input(InputEvent::Key(KeyInput::new(
                'k',
                Modifiers::SHIFT
            ))))
        );
    }

    #[test]
    fn tab_cycles_selection() {
        assert_eq!(
            press(KeyCode::Tab, KeyModifiers::NONE, FIELD),
            Some(Action::CycleSelection)
        );
    }

    #[test]
    fn help_swallows_other_keys() {
        let help = KeyContext {
            help_visible: true,
            ..FIELD
        };
        assert_eq!(press(KeyCode::Char('k'), KeyModifiers::NONE, help), None);
        assert_eq!(
            press(KeyCode::Esc, KeyModifiers::NONE, help),
            Some(Action::ToggleHelp)
        );
    }

    #[test]
    fn open_menu_takes_navigation_keys() {
        let menu = KeyContext {
            menu_open: true,
            ..FIELD
        };
        assert_eq!(
            press(KeyCode::Down, KeyModifiers::NONE, menu),
            Some(Action::Menu(MenuAction::Down))
        );
        assert_eq!(
            press(KeyCode::Enter, KeyModifiers::NONE, menu),
            Some(Action::Menu(MenuAction::Choose))
        );
        assert_eq!(
            press(KeyCode::Esc, KeyModifiers::NONE, menu),
            Some(Action::Menu(MenuAction::Close))
        );
        assert_eq!(press(KeyCode::Char('k'), KeyModifiers::NONE, menu), None);
    }
}
