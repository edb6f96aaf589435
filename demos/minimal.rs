//! Minimal headless console example.
//!
//! Drives the console programmatically without any UI and prints every line
//! it produces. Useful for testing or custom renderers.
//!
//! Run with: `cargo run --example minimal`

use std::sync::{Arc, RwLock};

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy_dropdown_console::prelude::*;

/// Host-owned value the console binds to.
#[derive(Resource, Clone)]
struct Gravity(Arc<RwLock<f32>>);

fn main() {
    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(ConsolePlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, print_outputs.after(ConsoleSystems))
        .add_systems(Update, send_test_commands.run_if(run_once))
        .add_systems(Last, exit_after_first_frames)
        .run();
}

fn setup(mut commands: Commands, mut console: ResMut<Console>) {
    let gravity = Gravity(Arc::new(RwLock::new(800.0)));

    console
        .register_var(CVar::bind("sv_gravity", &gravity.0).description("World gravity"))
        .unwrap();
    console
        .register_cmd(
            ConCmd::new("greet", [ValueType::Text], |args| {
                Ok(format!("Hello, {}!", args.text(0)?))
            })
            .description("Greet someone"),
        )
        .unwrap();

    commands.insert_resource(gravity);
    println!("Console initialized. Registered: sv_gravity, greet");
}

/// Send some test commands programmatically.
fn send_test_commands(mut events: MessageWriter<ConsoleInputEvent>) {
    println!("\n--- Sending test commands ---");

    events.write(ConsoleInputEvent::new("get sv_gravity"));
    events.write(ConsoleInputEvent::new("set sv_gravity (* 2 (get sv_gravity))"));
    events.write(ConsoleInputEvent::new("greet Developer"));
    events.write(ConsoleInputEvent::new("greet"));
    events.write(ConsoleInputEvent::new("+ (- 3 2) (* 4 5)"));
    events.write(ConsoleInputEvent::new("help greet"));
}

/// Print console output messages.
fn print_outputs(mut events: MessageReader<ConsoleOutputEvent>) {
    for event in events.read() {
        let prefix = match event.level {
            ConsoleOutputLevel::Debug => "[DEBUG]",
            ConsoleOutputLevel::Info => "[INFO]",
            ConsoleOutputLevel::Warn => "[WARN]",
            ConsoleOutputLevel::Error => "[ERROR]",
            ConsoleOutputLevel::Command => "[$]",
            ConsoleOutputLevel::Result => "[=]",
        };
        println!("{} {}", prefix, event.message);
    }
}

fn exit_after_first_frames(mut frames: Local<u32>, gravity: Res<Gravity>, mut exit: MessageWriter<AppExit>) {
    *frames += 1;
    if *frames == 2 {
        if let Ok(value) = gravity.0.read() {
            println!("\nsv_gravity is now {}", *value);
        }
        exit.write(AppExit::Success);
    }
}
