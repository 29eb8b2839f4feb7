//! Key bindings - keyboard events to session actions.
//!
//! | Key            | Action                    |
//! |----------------|---------------------------|
//! | Esc, Ctrl+C    | quit, print nothing       |
//! | Enter          | submit, print the result  |
//! | Ctrl+B         | toggle case sensitivity   |
//! | Up / Down      | scroll one line           |
//! | PgUp / PgDn    | scroll one page           |
//! | Ctrl+U         | clear the query           |
//! | editing keys   | edit the query            |

use super::keyboard::KeyboardEvent;
use super::query_line::Edit;

/// Scroll request for the content area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scroll {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
}

/// What a key press asks the session to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Edit(Edit),
    Submit,
    ToggleCase,
    Quit,
    Scroll(Scroll),
    Ignore,
}

/// Resolve a keyboard event to an action.
pub fn action_for(event: &KeyboardEvent) -> Action {
    if !event.is_down() {
        return Action::Ignore;
    }

    if event.modifiers.ctrl {
        return match event.key.as_str() {
            "c" => Action::Quit,
            "b" => Action::ToggleCase,
            "u" => Action::Edit(Edit::Clear),
            _ => Action::Ignore,
        };
    }

    match event.key.as_str() {
        "Escape" => Action::Quit,
        "Enter" => Action::Submit,
        "Backspace" => Action::Edit(Edit::DeleteBackward),
        "Delete" => Action::Edit(Edit::DeleteForward),
        "ArrowLeft" => Action::Edit(Edit::Left),
        "ArrowRight" => Action::Edit(Edit::Right),
        "Home" => Action::Edit(Edit::Home),
        "End" => Action::Edit(Edit::End),
        "ArrowUp" => Action::Scroll(Scroll::LineUp),
        "ArrowDown" => Action::Scroll(Scroll::LineDown),
        "PageUp" => Action::Scroll(Scroll::PageUp),
        "PageDown" => Action::Scroll(Scroll::PageDown),
        _ if event.modifiers.alt => Action::Ignore,
        _ => match event.char() {
            Some(ch) if !ch.is_control() => Action::Edit(Edit::Insert(ch)),
            _ => Action::Ignore,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::keyboard::{KeyState, Modifiers};

    #[test]
    fn test_global_keys() {
        assert_eq!(action_for(&KeyboardEvent::new("Escape")), Action::Quit);
        assert_eq!(action_for(&KeyboardEvent::new("Enter")), Action::Submit);
        assert_eq!(
            action_for(&KeyboardEvent::with_modifiers("c", Modifiers::ctrl())),
            Action::Quit
        );
        assert_eq!(
            action_for(&KeyboardEvent::with_modifiers("b", Modifiers::ctrl())),
            Action::ToggleCase
        );
    }

    #[test]
    fn test_typing() {
        assert_eq!(action_for(&KeyboardEvent::new("a")), Action::Edit(Edit::Insert('a')));
        assert_eq!(action_for(&KeyboardEvent::new("(")), Action::Edit(Edit::Insert('(')));
        assert_eq!(
            action_for(&KeyboardEvent::with_modifiers("A", Modifiers { shift: true, ..Modifiers::none() })),
            Action::Edit(Edit::Insert('A'))
        );
        assert_eq!(
            action_for(&KeyboardEvent::with_modifiers("x", Modifiers::alt())),
            Action::Ignore
        );
    }

    #[test]
    fn test_scrolling() {
        assert_eq!(action_for(&KeyboardEvent::new("PageDown")), Action::Scroll(Scroll::PageDown));
        assert_eq!(action_for(&KeyboardEvent::new("ArrowUp")), Action::Scroll(Scroll::LineUp));
    }

    #[test]
    fn test_release_ignored() {
        let event = KeyboardEvent {
            key: "Enter".to_string(),
            modifiers: Modifiers::none(),
            state: KeyState::Release,
        };
        assert_eq!(action_for(&event), Action::Ignore);
    }
}
