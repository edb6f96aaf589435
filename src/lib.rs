//! A Quake-style drop-down developer console for Bevy.
//!
//! bevy_dropdown_console provides:
//!
//! - **CVar**: Bindings to host-owned variables, read and written by name
//! - **ConCmd**: Commands with typed signatures of up to four arguments
//! - **Nested evaluation**: `set sv_gravity (* 2 (get sv_gravity))`
//! - **Scrollback**: A bounded ring of output with line scrolling
//! - **Console**: One resource owning all console state
//!
//! # Features
//!
//! - `egui`: reference drop-down renderer (implies `log-capture`)
//! - `log-capture`: mirror `tracing` records into the scrollback
//! - `terminal`: stdin/stdout backend for dedicated servers
//! - `serde`: serialize [`ConsoleConfig`] and values
//! - `full`: Enable egui + log-capture + serde
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::{Arc, RwLock};
//! use bevy::prelude::*;
//! use bevy_dropdown_console::prelude::*;
//!
//! #[derive(Resource, Clone)]
//! struct Gravity(Arc<RwLock<f32>>);
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ConsolePlugin)
//!         .add_systems(Startup, setup_console)
//!         .add_systems(Update, apply_gravity.run_if(gameplay_running))
//!         .run();
//! }
//!
//! fn setup_console(mut commands: Commands, mut console: ResMut<Console>) {
//!     let gravity = Gravity(Arc::new(RwLock::new(800.0)));
//!     console
//!         .register_var(CVar::bind("sv_gravity", &gravity.0).description("World gravity"))
//!         .unwrap();
//!     console
//!         .register_cmd(ConCmd::new("noclip", [], |_| Ok("noclip toggled".into())))
//!         .unwrap();
//!     commands.insert_resource(gravity);
//! }
//! # fn apply_gravity() {}
//! ```

use bevy::prelude::*;

pub mod config;
pub mod core;
mod cursor;
pub mod input;

#[cfg(feature = "log-capture")]
pub mod logging;

#[cfg(feature = "egui")]
pub mod ui;

#[cfg(feature = "terminal")]
pub mod terminal;

pub use config::ConsoleConfig;
pub use self::core::{
    CVar, CVarFlags, CommandArgs, CommandHandler, ConCmd, Console, ConsoleError,
    ConsoleEventsPlugin, ConsoleInputEvent, ConsoleKey, ConsoleOutputEvent, ConsoleOutputLevel,
    ConsoleRegistry, ConsoleToggleEvent, ConsoleValue, Value, ValueType, VisibilityState,
};

#[cfg(feature = "egui")]
pub use ui::ConsoleTheme;

#[cfg(feature = "terminal")]
pub use terminal::{TerminalConfig, TerminalPlugin};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::core::{
        CVar, CVarFlags, CommandArgs, ConCmd, Console, ConsoleError, ConsoleInputEvent,
        ConsoleOutputEvent, ConsoleOutputLevel, ConsoleToggleEvent, Value, ValueType,
    };
    pub use crate::{ConsoleConfig, ConsolePlugin, ConsoleSystems, console_open, gameplay_running};
}

/// System set containing the console's per-frame systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConsoleSystems;

/// Main console plugin.
///
/// Uses an existing [`ConsoleConfig`] resource if the host inserted one before
/// adding the plugin.
#[derive(Default)]
pub struct ConsolePlugin;

impl Plugin for ConsolePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ConsoleConfig>();
        let config = app.world().resource::<ConsoleConfig>().clone();

        let mut console = Console::new(&config);
        console.set_event_capture(true);

        app.insert_resource(console)
            .add_plugins(ConsoleEventsPlugin);

        // Keys first so a toggle starts sliding this frame, then lines
        // submitted by the host, then forward what was printed and react to
        // the toggles it carried.
        app.add_systems(
            Update,
            (
                input::handle_keyboard_input,
                animate_console_panel,
                execute_console_input,
                forward_console_events,
                cursor::manage_cursor_capture,
            )
                .chain()
                .in_set(ConsoleSystems),
        );

        #[cfg(feature = "log-capture")]
        app.add_systems(Update, logging::print_captured_logs.before(ConsoleSystems));

        #[cfg(feature = "egui")]
        {
            use bevy_egui::EguiPrimaryContextPass;

            app.init_resource::<ui::ConsoleTheme>()
                .add_systems(EguiPrimaryContextPass, ui::render_console.run_if(console_open));
        }

        #[cfg(feature = "terminal")]
        app.add_plugins(terminal::TerminalPlugin);
    }
}

/// Run condition: gameplay should advance this frame.
///
/// False from the moment the console starts opening until it starts closing.
pub fn gameplay_running(console: Option<Res<Console>>) -> bool {
    console.is_none_or(|console| !console.visibility().gameplay_paused())
}

/// Run condition: any part of the panel is on screen.
pub fn console_open(console: Option<Res<Console>>) -> bool {
    console.is_some_and(|console| console.state() != VisibilityState::Hidden)
}

fn animate_console_panel(time: Res<Time>, mut console: ResMut<Console>) {
    console.update(time.delta_secs());
}

fn execute_console_input(mut input: MessageReader<ConsoleInputEvent>, mut console: ResMut<Console>) {
    for event in input.read() {
        if event.command.trim().is_empty() {
            continue;
        }
        // Errors are printed to the scrollback by `execute`
        let _ = console.execute(&event.command);
    }
}

fn forward_console_events(
    mut console: ResMut<Console>,
    mut output: MessageWriter<ConsoleOutputEvent>,
    mut toggles: MessageWriter<ConsoleToggleEvent>,
) {
    for transition in console.drain_transitions() {
        toggles.write(transition.into());
    }
    output.write_batch(console.drain_output());
}
