//! Console configuration resource.

use bevy::prelude::*;

/// Default toggle key (the key left of `1` on US layouts).
pub const DEFAULT_TOGGLE_KEY: KeyCode = KeyCode::Backquote;

/// Sizes, animation and key bindings for the console.
///
/// Insert your own before adding [`ConsolePlugin`](crate::ConsolePlugin) to
/// override the defaults:
///
/// ```ignore
/// App::new()
///     .insert_resource(ConsoleConfig {
///         panel_height: 480.0,
///         ..default()
///     })
///     .add_plugins(ConsolePlugin);
/// ```
#[derive(Resource, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConsoleConfig {
    /// Scrollback capacity in bytes.
    pub log_capacity: usize,
    /// Maximum characters on the input line.
    pub input_capacity: usize,
    /// Number of submitted lines kept for recall.
    pub history_size: usize,
    /// Height of the fully open panel, in logical pixels.
    pub panel_height: f32,
    /// Slide speed, in logical pixels per second. Zero or less opens and
    /// closes instantly.
    pub slide_speed: f32,
    /// Lines moved per PageUp/PageDown.
    pub scroll_lines: usize,
    /// Rows of scrollback a renderer should pull per frame.
    pub visible_rows: usize,
    /// Key that opens and closes the console.
    #[cfg_attr(feature = "serde", serde(skip, default = "default_toggle_key"))]
    pub toggle_key: KeyCode,
    /// Show and free the primary window's cursor while the console is open,
    /// restoring the previous cursor state when it closes.
    pub manage_cursor: bool,
}

#[cfg(feature = "serde")]
fn default_toggle_key() -> KeyCode {
    DEFAULT_TOGGLE_KEY
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            log_capacity: 64 * 1024,
            input_capacity: 256,
            history_size: 64,
            panel_height: 360.0,
            slide_speed: 1800.0,
            scroll_lines: 4,
            visible_rows: 20,
            toggle_key: DEFAULT_TOGGLE_KEY,
            manage_cursor: true,
        }
    }
}
