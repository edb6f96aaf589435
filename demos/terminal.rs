//! Terminal console example.
//!
//! Runs the console on stdin/stdout for headless applications such as
//! dedicated servers.
//!
//! Run with: `cargo run --example terminal --features terminal`
//!
//! Commands:
//! - `help` - List built-ins
//! - `listcvars` / `listcmd` - List bindings
//! - `sv_maxplayers` - Query a variable
//! - `sv_maxplayers 16` - Set it
//! - `status` - Show server status
//! - `say <text>` - Broadcast a message
//! - `quit` - Exit the application

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy_dropdown_console::prelude::*;

/// Server settings owned by the host and bound into the console.
#[derive(Resource, Clone)]
struct ServerSettings {
    hostname: Arc<RwLock<String>>,
    max_players: Arc<RwLock<i32>>,
    gravity: Arc<RwLock<f32>>,
    quit: Arc<AtomicBool>,
}

fn main() {
    println!("=== Terminal Console Example ===");
    println!("Type commands and press Enter. Type 'quit' to exit.");
    println!();

    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(ConsolePlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, handle_quit.after(ConsoleSystems))
        .run();
}

fn setup(mut commands: Commands, mut console: ResMut<Console>) {
    let settings = ServerSettings {
        hostname: Arc::new(RwLock::new("My Server".to_string())),
        max_players: Arc::new(RwLock::new(32)),
        gravity: Arc::new(RwLock::new(800.0)),
        quit: Arc::new(AtomicBool::new(false)),
    };

    console
        .register_var(CVar::bind("sv_hostname", &settings.hostname).description("Server name"))
        .unwrap();
    console
        .register_var(
            CVar::bind("sv_maxplayers", &settings.max_players)
                .description("Maximum number of players"),
        )
        .unwrap();
    console
        .register_var(CVar::bind("sv_gravity", &settings.gravity).description("World gravity"))
        .unwrap();

    let status = settings.clone();
    console
        .register_cmd(
            ConCmd::new("status", [], move |_| {
                let hostname = status.hostname.read().map(|h| h.clone()).unwrap_or_default();
                let max_players = status.max_players.read().map(|m| *m).unwrap_or_default();
                let gravity = status.gravity.read().map(|g| *g).unwrap_or_default();
                Ok(format!(
                    "Hostname: {hostname}\nMax Players: {max_players}\nGravity: {gravity}"
                ))
            })
            .description("Show server status"),
        )
        .unwrap();

    console
        .register_cmd(
            ConCmd::new("say", [ValueType::Text], |args| {
                Ok(format!("[SERVER] {}", args.text(0)?))
            })
            .description("Broadcast a message"),
        )
        .unwrap();

    let quit = settings.quit.clone();
    console
        .register_cmd(
            ConCmd::new("quit", [], move |_| {
                quit.store(true, Ordering::SeqCst);
                Ok("Shutting down".into())
            })
            .description("Exit the application"),
        )
        .unwrap();

    commands.insert_resource(settings);
}

fn handle_quit(settings: Res<ServerSettings>, mut exit: MessageWriter<AppExit>) {
    if settings.quit.load(Ordering::SeqCst) {
        exit.write(AppExit::Success);
    }
}
