//! Mirror `tracing` records into the console scrollback.
//!
//! Install through [`LogPlugin::custom_layer`](bevy::log::LogPlugin::custom_layer):
//!
//! ```ignore
//! App::new().add_plugins(DefaultPlugins.set(LogPlugin {
//!     custom_layer: bevy_dropdown_console::logging::custom_log_layer,
//!     ..default()
//! }));
//! ```

use std::sync::mpsc;

use bevy::log::{BoxedLayer, Level};
use bevy::prelude::*;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::field::Visit;

use crate::core::{Console, ConsoleOutputLevel};

/// Records from this crate are not mirrored, so console diagnostics never
/// feed back into the scrollback.
const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Layer factory for [`LogPlugin::custom_layer`](bevy::log::LogPlugin::custom_layer).
pub fn custom_log_layer(app: &mut App) -> Option<BoxedLayer> {
    let (sender, receiver) = mpsc::channel();
    app.add_message::<LogMessage>();
    app.insert_non_send_resource(CapturedLogs(receiver));
    app.add_systems(PreUpdate, transfer_log_messages);

    Some(Box::new(LogCaptureLayer { sender }))
}

/// A captured [`tracing`] event.
#[derive(Message, Debug, Clone)]
pub struct LogMessage {
    /// The formatted `message` field.
    pub message: String,
    /// Module path or custom target of the event.
    pub target: &'static str,
    pub level: Level,
}

impl LogMessage {
    /// Console output level for this record.
    pub fn output_level(&self) -> ConsoleOutputLevel {
        match self.level {
            Level::ERROR => ConsoleOutputLevel::Error,
            Level::WARN => ConsoleOutputLevel::Warn,
            Level::INFO => ConsoleOutputLevel::Info,
            Level::DEBUG | Level::TRACE => ConsoleOutputLevel::Debug,
        }
    }

    /// Scrollback line for this record, e.g. `[WARN] low memory`.
    pub fn console_line(&self) -> String {
        format!("[{}] {}", self.level, self.message)
    }

    fn is_own(&self) -> bool {
        self.target == OWN_TARGET || self.target.starts_with(concat!(env!("CARGO_CRATE_NAME"), "::"))
    }
}

/// Print captured records to the console.
pub(crate) fn print_captured_logs(
    logs: Option<MessageReader<LogMessage>>,
    console: Option<ResMut<Console>>,
) {
    let (Some(mut logs), Some(mut console)) = (logs, console) else {
        return;
    };
    for record in logs.read().filter(|record| !record.is_own()) {
        console.print(record.output_level(), &record.console_line());
    }
}

fn transfer_log_messages(receiver: NonSend<CapturedLogs>, mut log_messages: MessageWriter<LogMessage>) {
    for message in receiver.0.try_iter() {
        log_messages.write(message);
    }
}

/// Holds records between the tracing layer and [`transfer_log_messages`].
struct CapturedLogs(mpsc::Receiver<LogMessage>);

struct LogCaptureLayer {
    sender: mpsc::Sender<LogMessage>,
}

impl<S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>> Layer<S>
    for LogCaptureLayer
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut message = None;
        event.record(&mut MessageVisitor(&mut message));
        if let Some(message) = message {
            let metadata = event.metadata();
            // The receiver is gone once the app shuts down
            let _ = self.sender.send(LogMessage {
                message,
                target: metadata.target(),
                level: *metadata.level(),
            });
        }
    }
}

/// Extracts the `message` field of an event.
struct MessageVisitor<'a>(&'a mut Option<String>);

impl Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = Some(format!("{value:?}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(level: Level, target: &'static str) -> LogMessage {
        LogMessage {
            message: "texture cache full".into(),
            target,
            level,
        }
    }

    #[test]
    fn test_output_level_mapping() {
        assert_eq!(record(Level::ERROR, "game").output_level(), ConsoleOutputLevel::Error);
        assert_eq!(record(Level::WARN, "game").output_level(), ConsoleOutputLevel::Warn);
        assert_eq!(record(Level::TRACE, "game").output_level(), ConsoleOutputLevel::Debug);
    }

    #[test]
    fn test_console_line() {
        assert_eq!(record(Level::WARN, "game").console_line(), "[WARN] texture cache full");
    }

    #[test]
    fn test_own_records_skipped() {
        assert!(record(Level::DEBUG, "bevy_dropdown_console::core::registry").is_own());
        assert!(!record(Level::DEBUG, "bevy_render").is_own());
    }
}
