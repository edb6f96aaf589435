//! Console messages for communication between the console and the host.
//!
//! - Host -> Console: [`ConsoleInputEvent`] submits a line
//! - Console -> Host: [`ConsoleOutputEvent`] mirrors every printed line
//! - Console -> Host: [`ConsoleToggleEvent`] reports the start of a slide

use bevy::prelude::*;

use super::Transition;

/// Message sent to execute a line as if it had been typed and submitted.
///
/// # Examples
///
/// ```ignore
/// fn run_autoexec(mut input: MessageWriter<ConsoleInputEvent>) {
///     input.write(ConsoleInputEvent::new("set sv_gravity 600"));
/// }
/// ```
#[derive(Message, Debug, Clone)]
pub struct ConsoleInputEvent {
    /// The raw line to execute.
    pub command: String,
}

impl ConsoleInputEvent {
    /// Create a new input event.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// Message emitted for every line the console prints.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct ConsoleOutputEvent {
    /// The line text, without a trailing line break.
    pub message: String,
    /// What produced the line.
    pub level: ConsoleOutputLevel,
}

/// Kind of console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleOutputLevel {
    /// Debug information (gray).
    Debug,
    /// General information (white).
    #[default]
    Info,
    /// Warning (yellow).
    Warn,
    /// Error (red).
    Error,
    /// Echo of a submitted line.
    Command,
    /// Command result.
    Result,
}

impl ConsoleOutputEvent {
    /// Create a new output event.
    pub fn new(level: ConsoleOutputLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ConsoleOutputLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ConsoleOutputLevel::Error, message)
    }

    pub fn command(message: impl Into<String>) -> Self {
        Self::new(ConsoleOutputLevel::Command, message)
    }

    pub fn result(message: impl Into<String>) -> Self {
        Self::new(ConsoleOutputLevel::Result, message)
    }
}

/// Message sent when the console starts opening or closing.
///
/// The plugin frees and restores the primary window's cursor on it when
/// [`ConsoleConfig::manage_cursor`](crate::ConsoleConfig::manage_cursor) is set.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleToggleEvent {
    /// Whether the console is now opening.
    pub open: bool,
}

impl ConsoleToggleEvent {
    /// Create an event for opening the console.
    pub fn opened() -> Self {
        Self { open: true }
    }

    /// Create an event for closing the console.
    pub fn closed() -> Self {
        Self { open: false }
    }
}

impl From<Transition> for ConsoleToggleEvent {
    fn from(transition: Transition) -> Self {
        match transition {
            Transition::Opening => Self::opened(),
            Transition::Closing => Self::closed(),
        }
    }
}

/// Plugin that registers all console messages.
pub struct ConsoleEventsPlugin;

impl Plugin for ConsoleEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ConsoleInputEvent>()
            .add_message::<ConsoleOutputEvent>()
            .add_message::<ConsoleToggleEvent>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_input_event() {
        let event = ConsoleInputEvent::new("set sv_cheats 1");
        assert_eq!(event.command, "set sv_cheats 1");
    }

    #[test]
    fn test_console_output_event() {
        let event = ConsoleOutputEvent::error("Something went wrong");
        assert_eq!(event.level, ConsoleOutputLevel::Error);
        assert_eq!(event.message, "Something went wrong");
    }

    #[test]
    fn test_toggle_from_transition() {
        assert!(ConsoleToggleEvent::from(Transition::Opening).open);
        assert!(!ConsoleToggleEvent::from(Transition::Closing).open);
    }
}
