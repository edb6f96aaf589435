//! Reference drop-down renderer built on egui.
//!
//! The panel is drawn top-anchored with the height of the current slide
//! offset, laid out bottom-up: the input line sits on the bottom edge and the
//! newest scrollback lines stack above it, so a half-open panel shows the
//! bottom half of the console.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::ConsoleConfig;
use crate::core::{COMMAND_ECHO_PREFIX, Console};

/// Marker drawn at the cursor position of the input line.
pub const CURSOR_GLYPH: char = '_';

/// Prompt shown in front of the input line.
pub const INPUT_PROMPT: &str = "] ";

/// Colors and font size of the reference renderer.
#[derive(Resource, Debug, Clone)]
pub struct ConsoleTheme {
    pub background: egui::Color32,
    pub text: egui::Color32,
    /// Color of echoed request lines.
    pub echo: egui::Color32,
    pub input: egui::Color32,
    pub font_size: f32,
}

impl Default for ConsoleTheme {
    fn default() -> Self {
        Self {
            background: egui::Color32::from_rgba_unmultiplied(16, 18, 22, 235),
            text: egui::Color32::LIGHT_GRAY,
            echo: egui::Color32::GRAY,
            input: egui::Color32::WHITE,
            font_size: 14.0,
        }
    }
}

/// Input line with the cursor glyph inserted at the cursor.
pub fn input_with_cursor(text: &str, cursor: usize) -> String {
    let mut line = String::with_capacity(INPUT_PROMPT.len() + text.len() + 1);
    line.push_str(INPUT_PROMPT);
    let mut chars = text.chars();
    line.extend(chars.by_ref().take(cursor));
    line.push(CURSOR_GLYPH);
    line.extend(chars);
    line
}

pub(crate) fn render_console(
    mut contexts: EguiContexts,
    console: Res<Console>,
    config: Res<ConsoleConfig>,
    theme: Res<ConsoleTheme>,
) -> Result<(), BevyError> {
    let offset = console.visibility().panel_offset();
    if offset <= 0.0 {
        return Ok(());
    }

    let text = |s: &str, color: egui::Color32| {
        egui::RichText::new(s)
            .monospace()
            .size(theme.font_size)
            .color(color)
    };

    egui::TopBottomPanel::top("dropdown_console")
        .exact_height(offset)
        .resizable(false)
        .show_separator_line(false)
        .frame(
            egui::Frame::NONE
                .fill(theme.background)
                .inner_margin(egui::Margin::symmetric(8, 4)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                let input = input_with_cursor(&console.input_line(), console.cursor());
                ui.label(text(&input, theme.input));

                if !console.log().is_live() {
                    ui.label(text("^^^ scrolled back ^^^", theme.echo));
                }

                for line in console.visible_lines(config.visible_rows) {
                    let color = if line.starts_with(COMMAND_ECHO_PREFIX) {
                        theme.echo
                    } else {
                        theme.text
                    };
                    ui.label(text(&line, color));
                }
            });
        });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_with_cursor() {
        assert_eq!(input_with_cursor("", 0), "] _");
        assert_eq!(input_with_cursor("get x", 5), "] get x_");
        assert_eq!(input_with_cursor("héllo", 2), "] hé_llo");
    }
}
