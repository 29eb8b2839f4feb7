//! Keyboard events - crossterm key events in the filter's own terms.
//!
//! Keys are named the way a browser names them ("a", "Enter", "ArrowUp"),
//! so bindings can be written as plain strings.

use crossterm::event::{KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers};

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    pub fn alt() -> Self {
        Self { alt: true, ..Self::default() }
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "a", "Enter", "ArrowUp")
    pub key: String,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
        }
    }

    /// Press or auto-repeat; releases are ignored by bindings.
    pub fn is_down(&self) -> bool {
        self.state != KeyState::Release
    }

    /// The typed character, for single-character keys.
    pub fn char(&self) -> Option<char> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

// =============================================================================
// CONVERSION
// =============================================================================

/// Convert a crossterm key event. Keys with no binding come through with
/// an empty name and resolve to no action.
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        code => named_key(code).unwrap_or_default().to_string(),
    };

    let m = event.modifiers;
    KeyboardEvent {
        key,
        modifiers: Modifiers {
            ctrl: m.contains(KeyModifiers::CONTROL),
            alt: m.contains(KeyModifiers::ALT),
            shift: m.contains(KeyModifiers::SHIFT),
        },
        state: match event.kind {
            KeyEventKind::Press => KeyState::Press,
            KeyEventKind::Repeat => KeyState::Repeat,
            KeyEventKind::Release => KeyState::Release,
        },
    }
}

/// Names of the non-character keys the filter binds.
fn named_key(code: KeyCode) -> Option<&'static str> {
    Some(match code {
        KeyCode::Enter => "Enter",
        KeyCode::Esc => "Escape",
        KeyCode::Backspace => "Backspace",
        KeyCode::Delete => "Delete",
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        _ => return None,
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_char() {
        let event = convert_key_event(CrosstermKeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(event.key, "x");
        assert_eq!(event.char(), Some('x'));
        assert_eq!(event.modifiers, Modifiers::none());
        assert!(event.is_down());
    }

    #[test]
    fn test_convert_ctrl() {
        let event = convert_key_event(CrosstermKeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL));
        assert_eq!(event, KeyboardEvent::with_modifiers("b", Modifiers::ctrl()));
    }

    #[test]
    fn test_convert_named_keys() {
        let cases = [
            (KeyCode::Enter, "Enter"),
            (KeyCode::Esc, "Escape"),
            (KeyCode::PageDown, "PageDown"),
            (KeyCode::Left, "ArrowLeft"),
        ];
        for (code, name) in cases {
            let event = convert_key_event(CrosstermKeyEvent::new(code, KeyModifiers::NONE));
            assert_eq!(event.key, name);
            assert_eq!(event.char(), None);
        }
    }

    #[test]
    fn test_unbound_keys_have_no_action() {
        for code in [KeyCode::Tab, KeyCode::F(5), KeyCode::Insert] {
            let event = convert_key_event(CrosstermKeyEvent::new(code, KeyModifiers::NONE));
            assert_eq!(event.key, "");
            assert_eq!(crate::input::action_for(&event), crate::input::Action::Ignore);
        }
    }

    #[test]
    fn test_release_is_not_down() {
        let mut raw = CrosstermKeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        raw.kind = KeyEventKind::Release;
        assert!(!convert_key_event(raw).is_down());
    }
}
