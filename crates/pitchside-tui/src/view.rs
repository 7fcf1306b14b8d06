//! Frame rendering.
//!
//! Layout:
//! ┌─ Pitch ── Left 0:0 Right ── BeforeKickOff ─┐
//! │                                            │
//! │          plan view of the field            │
//! │                                            │
//! └────────────────────────────────────────────┘
//!  ● connected  localhost:3200 │ ? help  q quit
//!
//! Overlays (connection message, play-mode menu, server speed, help and
//! goal notices) are drawn on top in that order.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Clear, Paragraph,
        canvas::{Canvas, Circle, Context, Line as CanvasLine, Rectangle},
    },
};

use pitchside_core::{
    ConnectionStatus, ConnectionStateTracker, KeyBindings, Overlay, OverlayHost, PlayMode,
    PlayState, SelectableEntity, Side,
};

use crate::overlay::OverlayState;
use crate::scene::Scene;
use crate::theme;

// Canvas bounds, metres. Half of the scene's field dimensions.
const HALF_LENGTH: f64 = 15.0;
const HALF_WIDTH: f64 = 10.0;
const CENTER_CIRCLE_RADIUS: f64 = 2.0;
const GOAL_HALF_WIDTH: f64 = 1.05;

/// Screen regions, shared by rendering and mouse picking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub pitch: Rect,
    /// Inside of the pitch border; what the field picker maps.
    pub field: Rect,
    pub status: Rect,
}

pub fn layout(area: Rect) -> Areas {
    let [pitch, status] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);
    let field = Block::default().borders(Borders::ALL).inner(pitch);
    Areas {
        pitch,
        field,
        status,
    }
}

/// Everything a frame is drawn from.
pub struct ViewModel<'a> {
    pub scene: &'a Scene,
    pub overlays: &'a OverlayState,
    pub tracker: &'a ConnectionStateTracker,
    pub play_state: Option<&'a PlayState>,
    pub bindings: &'a KeyBindings,
    pub endpoint: &'a str,
    pub menu_modes: &'a [PlayMode],
    pub menu_cursor: usize,
    pub help_visible: bool,
}

pub fn render(frame: &mut Frame, vm: &ViewModel<'_>) {
    let area = frame.area();
    let areas = layout(area);

    render_pitch(frame, areas.pitch, vm);
    render_status_bar(frame, areas.status, vm);

    if vm.overlays.is_visible(Overlay::ConnectionMessage) {
        render_message(frame, areas.field, vm.overlays.message());
    }
    if vm.overlays.is_visible(Overlay::PlaymodeMenu) {
        render_menu(frame, areas.field, vm.menu_modes, vm.menu_cursor);
    }
    if vm.overlays.is_visible(Overlay::ServerSpeed) {
        render_server_speed(frame, areas.field, vm.overlays.server_speed(), vm.play_state);
    }
    if vm.help_visible {
        render_help(frame, area, vm.bindings);
    }
    if let Some(text) = vm.overlays.notice() {
        render_notice(frame, areas.field, text);
    }
}

fn pitch_title(state: Option<&PlayState>) -> Line<'static> {
    let Some(state) = state else {
        return Line::from(Span::styled(" Pitch ", theme::title_style()));
    };
    Line::from(vec![
        Span::styled(" Pitch ", theme::title_style()),
        Span::styled("── ", theme::border_default()),
        Span::styled(
            state.left_display_name().to_owned(),
            Style::default().fg(theme::team_color(Side::Left)),
        ),
        Span::styled(
            format!(" {}:{} ", state.score_left, state.score_right),
            theme::title_style(),
        ),
        Span::styled(
            state.right_display_name().to_owned(),
            Style::default().fg(theme::team_color(Side::Right)),
        ),
        Span::styled(" ── ", theme::border_default()),
        Span::styled(
            format!("{} {:.1}s ", state.play_mode, state.time),
            Style::default().fg(theme::DIM_WHITE),
        ),
    ])
}

fn render_pitch(frame: &mut Frame, area: Rect, vm: &ViewModel<'_>) {
    let block = Block::default()
        .title(pitch_title(vm.play_state))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if vm.overlays.background_input() {
            theme::border_focused()
        } else {
            theme::border_default()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let scene = vm.scene;
    let canvas = Canvas::default()
        .x_bounds([-HALF_LENGTH, HALF_LENGTH])
        .y_bounds([-HALF_WIDTH, HALF_WIDTH])
        .paint(|ctx| {
            draw_markings(ctx);
            ctx.layer();
            draw_entities(ctx, scene);
        });
    frame.render_widget(canvas, inner);
}

fn draw_markings(ctx: &mut Context<'_>) {
    ctx.draw(&Rectangle {
        x: -HALF_LENGTH,
        y: -HALF_WIDTH,
        width: HALF_LENGTH * 2.0,
        height: HALF_WIDTH * 2.0,
        color: theme::PITCH_LINE,
    });
    ctx.draw(&CanvasLine {
        x1: 0.0,
        y1: -HALF_WIDTH,
        x2: 0.0,
        y2: HALF_WIDTH,
        color: theme::PITCH_LINE,
    });
    ctx.draw(&Circle {
        x: 0.0,
        y: 0.0,
        radius: CENTER_CIRCLE_RADIUS,
        color: theme::PITCH_LINE,
    });
    for (x, side) in [(-HALF_LENGTH, Side::Left), (HALF_LENGTH, Side::Right)] {
        ctx.draw(&CanvasLine {
            x1: x,
            y1: -GOAL_HALF_WIDTH,
            x2: x,
            y2: GOAL_HALF_WIDTH,
            color: theme::team_color(side),
        });
    }
}

fn draw_entities(ctx: &mut Context<'_>, scene: &Scene) {
    let selected = scene.selected();

    for agent in scene.agents() {
        let entity = SelectableEntity::Agent {
            side: agent.side,
            id: agent.id,
        };
        let style = if selected == Some(entity) {
            theme::selection()
        } else {
            Style::default().fg(theme::team_color(agent.side))
        };
        ctx.print(
            f64::from(agent.position.0.x),
            f64::from(agent.position.0.y),
            Span::styled(agent.id.to_string(), style),
        );
    }

    let ball = scene.ball();
    let style = if selected == Some(SelectableEntity::Ball) {
        theme::selection()
    } else {
        Style::default().fg(theme::DIM_WHITE)
    };
    ctx.print(
        f64::from(ball.0.x),
        f64::from(ball.0.y),
        Span::styled("●", style),
    );
}

fn render_status_bar(frame: &mut Frame, area: Rect, vm: &ViewModel<'_>) {
    let indicator = match vm.tracker.status() {
        ConnectionStatus::Connected => {
            Span::styled("● connected", Style::default().fg(theme::SUCCESS_GREEN))
        }
        ConnectionStatus::Connecting => {
            Span::styled("◐ connecting", Style::default().fg(theme::ELECTRIC_YELLOW))
        }
        ConnectionStatus::Disconnected => {
            Span::styled("○ disconnected", Style::default().fg(theme::ERROR_RED))
        }
    };

    let line = Line::from(vec![
        Span::raw(" "),
        indicator,
        Span::styled(format!("  {}", vm.endpoint), Style::default().fg(theme::DIM_WHITE)),
        Span::styled(" │ ? help  tab select  q quit", theme::key_hint()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Rectangle of at most `width`×`height` centred in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn popup_block(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        })
        .style(Style::default().bg(theme::BG_DARK))
}

fn text_width(text: &str) -> u16 {
    u16::try_from(text.chars().count()).unwrap_or(u16::MAX)
}

fn render_message(frame: &mut Frame, field: Rect, text: &str) {
    let popup = centered(field, text_width(text).saturating_add(6), 3);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            text.to_owned(),
            Style::default().fg(theme::DIM_WHITE),
        )))
        .centered()
        .block(popup_block("Server", false)),
        popup,
    );
}

fn render_menu(frame: &mut Frame, field: Rect, modes: &[PlayMode], cursor: usize) {
    let lines: Vec<Line> = if modes.is_empty() {
        vec![Line::from(Span::styled(
            "  no play modes reported",
            theme::key_hint(),
        ))]
    } else {
        modes
            .iter()
            .enumerate()
            .map(|(i, mode)| {
                let style = if i == cursor {
                    theme::menu_selected()
                } else {
                    theme::menu_item()
                };
                Line::from(Span::styled(format!("  {mode}  "), style))
            })
            .collect()
    };

    let rows = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let popup = centered(field, 32, rows.saturating_add(3));
    frame.render_widget(Clear, popup);

    let block = popup_block("Play Mode", true);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let [list, hints] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);
    frame.render_widget(Paragraph::new(lines), list);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" ↑/↓ ", theme::key_hint_key()),
            Span::styled("move  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("set  ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled("close", theme::key_hint()),
        ])),
        hints,
    );
}

fn render_server_speed(
    frame: &mut Frame,
    field: Rect,
    speed: Option<f32>,
    state: Option<&PlayState>,
) {
    let text = match (speed, state) {
        (Some(ratio), Some(state)) => format!("{ratio:.2}x real time  t={:.1}s", state.time),
        (Some(ratio), None) => format!("{ratio:.2}x real time"),
        (None, Some(_)) => "measuring...".to_owned(),
        (None, None) => "no server data".to_owned(),
    };
    let width = text_width(&text).saturating_add(4).min(field.width);
    let popup = Rect::new(
        field.x + field.width.saturating_sub(width),
        field.y,
        width,
        3.min(field.height),
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(theme::DIM_WHITE)))
            .block(popup_block("Server Speed", false)),
        popup,
    );
}

fn render_notice(frame: &mut Frame, field: Rect, text: &str) {
    let width = text_width(text).saturating_add(4).min(field.width);
    let popup = Rect::new(
        field.x + (field.width - width) / 2,
        field.y,
        width,
        1.min(field.height),
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(Span::styled(format!("  {text}  "), theme::notice())),
        popup,
    );
}

fn help_row(key: String, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<12}"), theme::key_hint_key()),
        Span::styled(what, theme::key_hint()),
    ])
}

fn render_help(frame: &mut Frame, area: Rect, bindings: &KeyBindings) {
    let section = |title: &'static str| {
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default().fg(theme::NEON_CYAN),
        ))
    };

    let lines = vec![
        Line::from(""),
        section("Match"),
        help_row(bindings.connect.to_string(), "Connect"),
        help_row(
            format!("{} / {}", bindings.kick_off_left, bindings.kick_off_right),
            "Kick-off left / right",
        ),
        help_row(
            format!("{} / {}", bindings.free_kick_left, bindings.free_kick_right),
            "Free kick left / right (Shift: direct)",
        ),
        help_row(bindings.drop_ball.to_string(), "Drop ball"),
        help_row(format!("Shift+{}", bindings.reset_clock), "Reset clock"),
        help_row(bindings.full_state.to_string(), "Request full state"),
        help_row(bindings.open_menu.to_string(), "Play-mode menu"),
        help_row(bindings.toggle_server_speed.to_string(), "Server speed"),
        help_row(format!("Shift+{}", bindings.kill_server), "Kill server"),
        Line::from(""),
        section("Field"),
        help_row("Click".to_owned(), "Select ball or agent"),
        help_row("Tab".to_owned(), "Select next"),
        help_row("Ctrl+Click".to_owned(), "Move selection / push ball"),
        help_row("Shift+Click".to_owned(), "Chip ball"),
        Line::from(""),
        help_row("?".to_owned(), "This help"),
        help_row("q".to_owned(), "Quit"),
    ];

    let rows = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let popup = centered(area, 56, rows.saturating_add(2));
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(popup_block("Keyboard Shortcuts", true)),
        popup,
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pitchside_core::Key;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend, buffer::Cell};

    use super::*;

    struct Fixture {
        scene: Scene,
        overlays: OverlayState,
        tracker: ConnectionStateTracker,
        bindings: KeyBindings,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                scene: Scene::default(),
                overlays: OverlayState::default(),
                tracker: ConnectionStateTracker::new("localhost:3200", false, Key::new('c')),
                bindings: KeyBindings::default(),
            }
        }

        fn draw(&self, state: Option<&PlayState>, modes: &[PlayMode], help: bool) -> String {
            let vm = ViewModel {
                scene: &self.scene,
                overlays: &self.overlays,
                tracker: &self.tracker,
                play_state: state,
                bindings: &self.bindings,
                endpoint: "localhost:3200",
                menu_modes: modes,
                menu_cursor: 0,
                help_visible: help,
            };
            let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
            terminal.draw(|frame| render(frame, &vm)).unwrap();

            let buffer = terminal.backend().buffer();
            buffer
                .content
                .chunks(usize::from(buffer.area.width))
                .map(|row| row.iter().map(Cell::symbol).collect::<String>())
                .collect::<Vec<_>>()
                .join("\n")
        }
    }

    #[test]
    fn layout_reserves_status_row_below_the_pitch() {
        let areas = layout(Rect::new(0, 0, 80, 30));
        assert_eq!(areas.pitch, Rect::new(0, 0, 80, 29));
        assert_eq!(areas.field, Rect::new(1, 1, 78, 27));
        assert_eq!(areas.status, Rect::new(0, 29, 80, 1));
    }

    #[test]
    fn status_bar_shows_connection_and_endpoint() {
        let screen = Fixture::new().draw(None, &[], false);
        assert!(screen.contains("○ disconnected  localhost:3200"), "{screen}");
    }

    #[test]
    fn connection_message_is_drawn_when_visible() {
        let mut fixture = Fixture::new();
        fixture.overlays.set_message("Press C to connect to localhost:3200.");
        fixture.overlays.set_visible(Overlay::ConnectionMessage, true);
        let screen = fixture.draw(None, &[], false);
        assert!(screen.contains("Press C to connect to localhost:3200."), "{screen}");
    }

    #[test]
    fn title_carries_score_and_play_mode() {
        let state = PlayState {
            score_left: 2,
            score_right: 1,
            team_left: Some("Magma".into()),
            play_mode: PlayMode::GameOver,
            ..PlayState::default()
        };
        let screen = Fixture::new().draw(Some(&state), &[], false);
        assert!(screen.contains("Magma 2:1 <Right>"), "{screen}");
        assert!(screen.contains("GameOver"), "{screen}");
    }

    #[test]
    fn menu_lists_reported_play_modes() {
        let mut fixture = Fixture::new();
        fixture.overlays.set_visible(Overlay::PlaymodeMenu, true);
        let screen = fixture.draw(None, &[PlayMode::KickOffLeft, PlayMode::GameOver], false);
        assert!(screen.contains("Play Mode"), "{screen}");
        assert!(screen.contains("KickOff_Left"), "{screen}");
    }

    #[test]
    fn help_uses_configured_bindings() {
        let mut fixture = Fixture::new();
        fixture.bindings.drop_ball = Key::new('d');
        let screen = fixture.draw(None, &[], true);
        assert!(screen.contains("Keyboard Shortcuts"), "{screen}");
        assert!(screen.contains("D           Drop ball"), "{screen}");
    }

    #[test]
    fn notice_is_drawn_over_the_field() {
        let mut fixture = Fixture::new();
        fixture.overlays.announce("Goal Magma!");
        let screen = fixture.draw(None, &[], false);
        assert!(screen.contains("Goal Magma!"), "{screen}");
    }

    #[test]
    fn server_speed_shows_the_measured_ratio() {
        let mut fixture = Fixture::new();
        fixture.overlays.set_visible(Overlay::ServerSpeed, true);
        let state = PlayState {
            time: 21.0,
            ..PlayState::default()
        };
        assert!(fixture.draw(Some(&state), &[], false).contains("measuring..."));

        let start = std::time::Instant::now();
        fixture.overlays.record_sim_time(20.0, start);
        fixture
            .overlays
            .record_sim_time(21.0, start + std::time::Duration::from_secs(2));
        let screen = fixture.draw(Some(&state), &[], false);
        assert!(screen.contains("0.50x real time  t=21.0s"), "{screen}");
    }
}
