use std::fmt;

use super::geometry::ScreenPoint;

/// A key, normalised to lowercase so bindings ignore caps lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key(char);

impl Key {
    pub fn new(c: char) -> Self {
        Self(c.to_ascii_lowercase())
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Self::new(c)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_ascii_uppercase())
    }
}

/// Modifier keys held while a key or button was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
    };
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: impl Into<Key>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseClick {
    pub at: ScreenPoint,
    pub modifiers: Modifiers,
    pub button: MouseButton,
}

impl MouseClick {
    /// Primary-button click.
    pub fn primary(at: ScreenPoint, modifiers: Modifiers) -> Self {
        Self {
            at,
            modifiers,
            button: MouseButton::Primary,
        }
    }
}

/// Raw input from the host UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key(KeyInput),
    MouseClick(MouseClick),
}
