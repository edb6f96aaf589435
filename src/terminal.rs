//! Terminal backend for headless hosts.
//!
//! Lines read from stdin are submitted as [`ConsoleInputEvent`]s, and every
//! [`ConsoleOutputEvent`] is written to stdout.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use bevy::prelude::*;

use crate::ConsoleSystems;
use crate::core::{ConsoleInputEvent, ConsoleOutputEvent, ConsoleOutputLevel};

/// Plugin that bridges the console to stdin/stdout.
pub struct TerminalPlugin;

impl Plugin for TerminalPlugin {
    fn build(&self, app: &mut App) {
        let (sender, receiver) = mpsc::channel();
        spawn_stdin_reader(sender);

        app.insert_resource(StdinReceiver(Mutex::new(receiver)))
            .init_resource::<TerminalConfig>()
            .add_systems(Update, read_stdin.before(ConsoleSystems))
            .add_systems(Update, write_stdout.after(ConsoleSystems));
    }
}

/// Terminal output settings.
#[derive(Resource, Debug, Clone, Default)]
pub struct TerminalConfig {
    /// Color lines with ANSI escape codes.
    pub colored: bool,
}

#[derive(Resource)]
struct StdinReceiver(Mutex<Receiver<String>>);

fn spawn_stdin_reader(sender: Sender<String>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines().map_while(Result::ok) {
            let text = line.trim();
            if !text.is_empty() && sender.send(text.to_string()).is_err() {
                break;
            }
        }
    });
}

fn read_stdin(receiver: Res<StdinReceiver>, mut events: MessageWriter<ConsoleInputEvent>) {
    let Ok(rx) = receiver.0.lock() else { return };
    while let Ok(line) = rx.try_recv() {
        events.write(ConsoleInputEvent::new(line));
    }
}

fn write_stdout(mut events: MessageReader<ConsoleOutputEvent>, config: Res<TerminalConfig>) {
    let mut stdout = io::stdout().lock();
    for event in events.read() {
        let line = if config.colored {
            colorize(&event.message, event.level)
        } else {
            event.message.clone()
        };
        if writeln!(stdout, "{line}").is_err() {
            return;
        }
    }
    let _ = stdout.flush();
}

fn colorize(message: &str, level: ConsoleOutputLevel) -> String {
    let color = match level {
        ConsoleOutputLevel::Debug => "\x1b[90m",
        ConsoleOutputLevel::Info => "\x1b[0m",
        ConsoleOutputLevel::Warn => "\x1b[33m",
        ConsoleOutputLevel::Error => "\x1b[31m",
        ConsoleOutputLevel::Command => "\x1b[36m",
        ConsoleOutputLevel::Result => "\x1b[32m",
    };
    format!("{color}{message}\x1b[0m")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize() {
        assert_eq!(colorize("oops", ConsoleOutputLevel::Error), "\x1b[31moops\x1b[0m");
    }
}
