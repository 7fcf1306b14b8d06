//! Crossterm events → controller input.

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton as CtButton, MouseEvent, MouseEventKind,
};

use pitchside_core::{Key, KeyInput, Modifiers, MouseButton, MouseClick, ScreenPoint};

fn modifiers(raw: KeyModifiers) -> Modifiers {
    Modifiers {
        shift: raw.contains(KeyModifiers::SHIFT),
        ctrl: raw.contains(KeyModifiers::CONTROL),
    }
}

/// Character keys only. Terminals report shifted letters as uppercase,
/// sometimes without the SHIFT flag.
pub fn translate_key(key: KeyEvent) -> Option<KeyInput> {
    let KeyCode::Char(c) = key.code else {
        return None;
    };
    let mut mods = modifiers(key.modifiers);
    mods.shift |= c.is_ascii_uppercase();
    Some(KeyInput {
        key: Key::new(c),
        modifiers: mods,
    })
}

/// Button presses only, positioned at the centre of the clicked cell.
pub fn translate_mouse(mouse: MouseEvent) -> Option<MouseClick> {
    let MouseEventKind::Down(button) = mouse.kind else {
        return None;
    };
    let button = match button {
        CtButton::Left => MouseButton::Primary,
        CtButton::Right => MouseButton::Secondary,
        CtButton::Middle => MouseButton::Middle,
    };
    Some(MouseClick {
        at: ScreenPoint::new(f32::from(mouse.column) + 0.5, f32::from(mouse.row) + 0.5),
        modifiers: modifiers(mouse.modifiers),
        button,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode, raw: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, raw)
    }

    #[test]
    fn plain_letter() {
        assert_eq!(
            translate_key(key(KeyCode::Char('k'), KeyModifiers::NONE)),
            Some(KeyInput::new('k', Modifiers::NONE))
        );
    }

    #[test]
    fn uppercase_letter_counts_as_shift() {
        assert_eq!(
            translate_key(key(KeyCode::Char('X'), KeyModifiers::NONE)),
            Some(KeyInput::new('x', Modifiers::SHIFT))
        );
    }

    #[test]
    fn control_is_carried() {
        let input = translate_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)).unwrap();
        assert!(input.modifiers.ctrl);
        assert!(!input.modifiers.shift);
    }

    #[test]
    fn non_character_keys_are_not_field_input() {
        assert_eq!(translate_key(key(KeyCode::Enter, KeyModifiers::NONE)), None);
        assert_eq!(translate_key(key(KeyCode::F(1), KeyModifiers::SHIFT)), None);
    }

    #[test]
    fn mouse_press_maps_to_cell_centre() {
        let event = MouseEvent {
            kind: MouseEventKind::Down(CtButton::Left),
            column: 10,
            row: 4,
            modifiers: KeyModifiers::SHIFT,
        };
        assert_eq!(
            translate_mouse(event),
            Some(MouseClick::primary(ScreenPoint::new(10.5, 4.5), Modifiers::SHIFT))
        );
    }

    #[test]
    fn mouse_release_and_drag_are_ignored() {
        for kind in [
            MouseEventKind::Up(CtButton::Left),
            MouseEventKind::Drag(CtButton::Left),
            MouseEventKind::Moved,
        ] {
            let event = MouseEvent {
                kind,
                column: 1,
                row: 1,
                modifiers: KeyModifiers::NONE,
            };
            assert_eq!(translate_mouse(event), None);
        }
    }
}
