//! Key and mouse input → match commands.
//!
//! The dispatcher holds only its key bindings. Everything it needs to know
//! about the match comes in through [`DispatchContext`], so the same input
//! always resolves the same way for the same context.

use tracing::trace;

use crate::command::MatchCommand;
use crate::error::CoreError;
use crate::kick::KickKind;
use crate::model::{Key, Modifiers, MouseButton, MouseClick, ScreenPoint, Side};

// ── Key bindings ────────────────────────────────────────────────────

/// What a bound key does, before modifiers and preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Binding {
    KillServer,
    KickOffLeft,
    KickOffRight,
    OpenMenu,
    Connect,
    FreeKickLeft,
    FreeKickRight,
    ResetClock,
    FullState,
    DropBall,
    ToggleServerSpeed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub kill_server: Key,
    pub kick_off_left: Key,
    pub kick_off_right: Key,
    pub open_menu: Key,
    pub connect: Key,
    pub free_kick_left: Key,
    pub free_kick_right: Key,
    pub reset_clock: Key,
    pub full_state: Key,
    pub drop_ball: Key,
    pub toggle_server_speed: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            kill_server: Key::new('x'),
            kick_off_left: Key::new('k'),
            kick_off_right: Key::new('j'),
            open_menu: Key::new('o'),
            connect: Key::new('c'),
            free_kick_left: Key::new('l'),
            free_kick_right: Key::new('r'),
            reset_clock: Key::new('t'),
            full_state: Key::new('u'),
            drop_ball: Key::new('b'),
            toggle_server_speed: Key::new('m'),
        }
    }
}

impl KeyBindings {
    fn table(&self) -> [(Key, Binding); 11] {
        [
            (self.kill_server, Binding::KillServer),
            (self.kick_off_left, Binding::KickOffLeft),
            (self.kick_off_right, Binding::KickOffRight),
            (self.open_menu, Binding::OpenMenu),
            (self.connect, Binding::Connect),
            (self.free_kick_left, Binding::FreeKickLeft),
            (self.free_kick_right, Binding::FreeKickRight),
            (self.reset_clock, Binding::ResetClock),
            (self.full_state, Binding::FullState),
            (self.drop_ball, Binding::DropBall),
            (self.toggle_server_speed, Binding::ToggleServerSpeed),
        ]
    }

    pub fn lookup(&self, key: Key) -> Option<Binding> {
        self.table()
            .into_iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, binding)| binding)
    }

    /// Reject tables where one key triggers two bindings.
    pub fn validate(&self) -> Result<(), CoreError> {
        let table = self.table();
        for (i, (key, first)) in table.iter().enumerate() {
            if let Some((_, second)) = table.iter().skip(i + 1).find(|(other, _)| other == key) {
                return Err(CoreError::DuplicateBinding {
                    key: key.as_char(),
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
        }
        Ok(())
    }
}

// ── Dispatcher ──────────────────────────────────────────────────────

/// Match facts the preconditions depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchContext {
    pub connected: bool,
    /// The server announced the play modes it accepts.
    pub play_modes_available: bool,
    /// Elapsed time has reached two halves.
    pub clock_expired: bool,
}

/// What a mouse click asks for. Screen points still need picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseAction {
    Select(ScreenPoint),
    MoveSelection(ScreenPoint),
    Kick { target: ScreenPoint, kind: KickKind },
}

#[derive(Debug, Clone, Default)]
pub struct InputCommandDispatcher {
    bindings: KeyBindings,
}

impl InputCommandDispatcher {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Commands for a key press, in issue order. Empty when the key is
    /// unbound or a precondition fails.
    pub fn resolve_key(
        &self,
        key: Key,
        modifiers: Modifiers,
        ctx: DispatchContext,
    ) -> Vec<MatchCommand> {
        let Some(binding) = self.bindings.lookup(key) else {
            return Vec::new();
        };

        let command = match binding {
            Binding::KillServer if modifiers.shift => MatchCommand::KillServer,
            Binding::KickOffLeft => MatchCommand::KickOff(Side::Left),
            Binding::KickOffRight => MatchCommand::KickOff(Side::Right),
            Binding::OpenMenu if ctx.play_modes_available => MatchCommand::OpenPlaymodeMenu,
            Binding::Connect if !modifiers.ctrl && !ctx.connected => MatchCommand::Connect,
            Binding::FreeKickLeft => free_kick(Side::Left, modifiers),
            Binding::FreeKickRight => free_kick(Side::Right, modifiers),
            Binding::ResetClock if modifiers.shift => MatchCommand::ResetClock,
            Binding::FullState => MatchCommand::RequestFullState,
            Binding::DropBall => MatchCommand::DropBall,
            Binding::ToggleServerSpeed => MatchCommand::ToggleServerSpeedOverlay,
            _ => {
                trace!(%key, %binding, ?modifiers, "key precondition not met");
                return Vec::new();
            }
        };

        if command.restarts_play() && ctx.clock_expired {
            vec![MatchCommand::ResetClock, command]
        } else {
            vec![command]
        }
    }

    /// Action for a mouse click. `None` while disconnected and for
    /// anything but the primary button.
    pub fn resolve_click(
        &self,
        click: &MouseClick,
        has_selection: bool,
        ctx: DispatchContext,
    ) -> Option<MouseAction> {
        if !ctx.connected {
            trace!("click ignored, not connected");
            return None;
        }
        if click.button != MouseButton::Primary {
            return None;
        }

        let at = click.at;
        let action = if click.modifiers.ctrl {
            if has_selection {
                MouseAction::MoveSelection(at)
            } else {
                MouseAction::Kick {
                    target: at,
                    kind: KickKind::Ground,
                }
            }
        } else if click.modifiers.shift {
            MouseAction::Kick {
                target: at,
                kind: KickKind::Lofted,
            }
        } else {
            MouseAction::Select(at)
        };
        Some(action)
    }
}

fn free_kick(side: Side, modifiers: Modifiers) -> MatchCommand {
    if modifiers.shift {
        MatchCommand::DirectFreeKick(side)
    } else {
        MatchCommand::FreeKick(side)
    }
}
