//! Keyboard mapping from Bevy input to [`ConsoleKey`].

use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;

use crate::config::ConsoleConfig;
use crate::core::{Console, ConsoleKey};

/// Map one pressed key to the console keys it produces.
///
/// Text keys may produce several characters at once (IME commits), so the
/// result is a list. The toggle key never produces text.
pub fn map_key(key_code: KeyCode, logical_key: &Key, toggle_key: KeyCode) -> Vec<ConsoleKey> {
    if key_code == toggle_key {
        return vec![ConsoleKey::Toggle];
    }

    let key = match key_code {
        KeyCode::Escape => ConsoleKey::Close,
        KeyCode::Enter | KeyCode::NumpadEnter => ConsoleKey::Submit,
        KeyCode::Backspace => ConsoleKey::Backspace,
        KeyCode::ArrowLeft => ConsoleKey::Left,
        KeyCode::ArrowRight => ConsoleKey::Right,
        KeyCode::Home => ConsoleKey::Home,
        KeyCode::End => ConsoleKey::End,
        KeyCode::ArrowUp => ConsoleKey::HistoryUp,
        KeyCode::ArrowDown => ConsoleKey::HistoryDown,
        KeyCode::PageUp => ConsoleKey::PageUp,
        KeyCode::PageDown => ConsoleKey::PageDown,
        KeyCode::Tab => ConsoleKey::Complete,
        _ => {
            return match logical_key {
                Key::Space => vec![ConsoleKey::Char(' ')],
                Key::Character(text) => text
                    .chars()
                    .filter(|ch| !ch.is_control())
                    .map(ConsoleKey::Char)
                    .collect(),
                _ => Vec::new(),
            };
        }
    };
    vec![key]
}

/// Feed pressed keys to the console.
///
/// Bevy messages cannot be consumed, so hosts gate gameplay input with
/// [`gameplay_running`](crate::gameplay_running) instead.
pub(crate) fn handle_keyboard_input(
    keys: Option<MessageReader<KeyboardInput>>,
    config: Res<ConsoleConfig>,
    mut console: ResMut<Console>,
) {
    let Some(mut keys) = keys else { return };
    for event in keys.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }
        // Holding the toggle key must not flap the panel
        if event.repeat && event.key_code == config.toggle_key {
            continue;
        }
        for key in map_key(event.key_code, &event.logical_key, config.toggle_key) {
            console.handle_key(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_key_wins() {
        let keys = map_key(
            KeyCode::Backquote,
            &Key::Character("`".into()),
            KeyCode::Backquote,
        );
        assert_eq!(keys, vec![ConsoleKey::Toggle]);
    }

    #[test]
    fn test_custom_toggle_key() {
        let keys = map_key(KeyCode::F1, &Key::F1, KeyCode::F1);
        assert_eq!(keys, vec![ConsoleKey::Toggle]);

        let keys = map_key(
            KeyCode::Backquote,
            &Key::Character("`".into()),
            KeyCode::F1,
        );
        assert_eq!(keys, vec![ConsoleKey::Char('`')]);
    }

    #[test]
    fn test_editing_keys() {
        let toggle = KeyCode::Backquote;
        assert_eq!(map_key(KeyCode::Enter, &Key::Enter, toggle), vec![ConsoleKey::Submit]);
        assert_eq!(map_key(KeyCode::Escape, &Key::Escape, toggle), vec![ConsoleKey::Close]);
        assert_eq!(map_key(KeyCode::Tab, &Key::Tab, toggle), vec![ConsoleKey::Complete]);
        assert_eq!(
            map_key(KeyCode::ArrowUp, &Key::ArrowUp, toggle),
            vec![ConsoleKey::HistoryUp]
        );
        assert_eq!(map_key(KeyCode::PageDown, &Key::PageDown, toggle), vec![ConsoleKey::PageDown]);
    }

    #[test]
    fn test_text_keys() {
        let toggle = KeyCode::Backquote;
        assert_eq!(
            map_key(KeyCode::KeyA, &Key::Character("A".into()), toggle),
            vec![ConsoleKey::Char('A')]
        );
        assert_eq!(map_key(KeyCode::Space, &Key::Space, toggle), vec![ConsoleKey::Char(' ')]);
        assert!(map_key(KeyCode::ShiftLeft, &Key::Shift, toggle).is_empty());
    }
}
