//! Translates winit input into engine triggers and board coordinates.

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{Key, NamedKey};

use symboard_core::Modes;
use symboard_render::Trigger;

/// What a key press asks the viewer to do.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Command {
    Trigger(Trigger),
    Quit,
}

// ---------------------------------------------------------------------------
// Keyboard
// ---------------------------------------------------------------------------

pub(crate) fn translate_keyboard(event: &KeyEvent, modes: Modes, sidebar_pinned: bool) -> Option<Command> {
    // Only key-down (pressed) events.
    if event.state != ElementState::Pressed || event.repeat {
        return None;
    }
    command_for_key(&event.logical_key, modes, sidebar_pinned)
}

/// `e` edit mode, `s` speak mode, `p` pin sidebar, `r` refresh, Escape quits.
fn command_for_key(key: &Key, modes: Modes, sidebar_pinned: bool) -> Option<Command> {
    let trigger = match key {
        Key::Named(NamedKey::Escape) => return Some(Command::Quit),
        Key::Character(s) => match s.as_str() {
            "e" | "E" => Trigger::EditMode(!modes.edit),
            "s" | "S" => Trigger::SpeakMode(!modes.speak),
            "p" | "P" => Trigger::SidebarPinned(!sidebar_pinned),
            "r" | "R" => Trigger::Force,
            _ => return None,
        },
        _ => return None,
    };
    Some(Command::Trigger(trigger))
}

// ---------------------------------------------------------------------------
// Pointer
// ---------------------------------------------------------------------------

/// Window position to board coordinates: the board starts `board_top`
/// pixels below the window's top edge.
pub(crate) fn board_point(position: PhysicalPosition<f64>, board_top: f64) -> Option<(f64, f64)> {
    let y = position.y - board_top;
    (position.x >= 0.0 && y >= 0.0).then_some((position.x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_toggle_modes() {
        let modes = Modes {
            edit: true,
            speak: false,
        };
        assert_eq!(
            command_for_key(&Key::Character("e".into()), modes, false),
            Some(Command::Trigger(Trigger::EditMode(false)))
        );
        assert_eq!(
            command_for_key(&Key::Character("S".into()), modes, false),
            Some(Command::Trigger(Trigger::SpeakMode(true)))
        );
        assert_eq!(
            command_for_key(&Key::Character("p".into()), modes, true),
            Some(Command::Trigger(Trigger::SidebarPinned(false)))
        );
        assert_eq!(
            command_for_key(&Key::Named(NamedKey::Escape), modes, false),
            Some(Command::Quit)
        );
        assert_eq!(command_for_key(&Key::Character("x".into()), modes, false), None);
    }

    #[test]
    fn points_above_the_board_miss() {
        assert_eq!(board_point(PhysicalPosition::new(10.0, 40.0), 50.0), None);
        assert_eq!(
            board_point(PhysicalPosition::new(10.0, 80.0), 50.0),
            Some((10.0, 30.0))
        );
    }
}
