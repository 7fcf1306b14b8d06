//! UI actions. Every state change in the app goes through one of these.

use pitchside_core::{ConnectionStatus, InputEvent, PlayState};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Resize(u16, u16),
    Tick,
    Render,

    /// Field input for the interaction controller.
    Input(InputEvent),
    /// Link state change reported by the bridge.
    Connection(ConnectionStatus),
    /// Game state decoded from the server's frames.
    PlayState(PlayState),

    ToggleHelp,
    /// Keyboard stand-in for clicking the next entity.
    CycleSelection,
    Menu(MenuAction),
}

/// Navigation inside the play-mode menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Up,
    Down,
    Choose,
    Close,
}
