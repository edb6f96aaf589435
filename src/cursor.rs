//! Mouse capture around console transitions.
//!
//! A game that locks and hides the cursor would leave the player unable to
//! select console text. The cursor is freed when the panel starts opening and
//! the previous grab mode and visibility are restored when it starts closing.

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};

use crate::config::ConsoleConfig;
use crate::core::ConsoleToggleEvent;

/// Cursor state the host had before the console opened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SavedCursor {
    grab_mode: CursorGrabMode,
    visible: bool,
}

pub(crate) fn manage_cursor_capture(
    config: Res<ConsoleConfig>,
    mut toggles: MessageReader<ConsoleToggleEvent>,
    mut cursors: Query<&mut CursorOptions, With<PrimaryWindow>>,
    mut saved: Local<Option<SavedCursor>>,
) {
    if !config.manage_cursor {
        toggles.clear();
        return;
    }
    let Ok(mut cursor) = cursors.single_mut() else {
        toggles.clear();
        return;
    };

    for toggle in toggles.read() {
        if toggle.open {
            // Keep the first saved state if an open arrives twice
            saved.get_or_insert(SavedCursor {
                grab_mode: cursor.grab_mode,
                visible: cursor.visible,
            });
            cursor.grab_mode = CursorGrabMode::None;
            cursor.visible = true;
        } else if let Some(previous) = saved.take() {
            cursor.grab_mode = previous.grab_mode;
            cursor.visible = previous.visible;
        }
    }
}
