//! Drop-down console rendered with egui.
//!
//! Run with: `cargo run --example egui --features egui`
//!
//! Controls:
//! - Press ` (grave/tilde) to slide the console open or closed
//! - Press Escape to close it
//! - Press Enter to submit, Tab to complete, ArrowUp/ArrowDown for history
//! - Press PageUp/PageDown to scroll
//!
//! Try these commands:
//! - `help` - List built-ins
//! - `listcvars` / `listcmd` - List bindings
//! - `player_speed (* 2 (get player_speed))` - Double the speed
//! - `spawn 5` / `despawn` - Spawn or despawn squares
//!
//! The squares stop moving while the console is open.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_dropdown_console::prelude::*;

/// Demo state shared between systems and console handlers.
#[derive(Resource, Clone)]
struct DemoSettings {
    speed: Arc<RwLock<f32>>,
    pending_spawns: Arc<AtomicI64>,
    despawn_requested: Arc<AtomicBool>,
}

/// Marker for demo entities.
#[derive(Component)]
struct DemoEntity {
    direction: Vec2,
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(LogPlugin {
            custom_layer: bevy_dropdown_console::logging::custom_log_layer,
            ..default()
        }))
        .add_plugins(bevy_egui::EguiPlugin::default())
        .add_plugins(ConsolePlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, (apply_requests, report_toggles))
        .add_systems(Update, move_squares.run_if(gameplay_running))
        .run();
}

fn setup(mut commands: Commands, mut console: ResMut<Console>) {
    commands.spawn(Camera2d);

    let settings = DemoSettings {
        speed: Arc::new(RwLock::new(200.0)),
        pending_spawns: Arc::new(AtomicI64::new(0)),
        despawn_requested: Arc::new(AtomicBool::new(false)),
    };

    console
        .register_var(
            CVar::bind("player_speed", &settings.speed).description("Square speed (units/s)"),
        )
        .unwrap();

    let pending = settings.pending_spawns.clone();
    console
        .register_cmd(
            ConCmd::new("spawn", [ValueType::Integer], move |args| {
                let count = args.int(0)?;
                if !(1..=100).contains(&count) {
                    return Err(ConsoleError::command(args.name(), "count must be 1..=100"));
                }
                pending.fetch_add(count, Ordering::SeqCst);
                Ok(format!("Spawning {count} squares"))
            })
            .description("Spawn demo squares"),
        )
        .unwrap();

    let despawn = settings.despawn_requested.clone();
    console
        .register_cmd(
            ConCmd::new("despawn", [], move |_| {
                despawn.store(true, Ordering::SeqCst);
                Ok(String::new())
            })
            .description("Despawn all demo squares"),
        )
        .unwrap();

    commands.insert_resource(settings);
    info!("Press ` to open the console. Try: help, spawn 5, listcvars");
}

fn apply_requests(
    mut commands: Commands,
    settings: Res<DemoSettings>,
    squares: Query<Entity, With<DemoEntity>>,
) {
    let count = settings.pending_spawns.swap(0, Ordering::SeqCst);
    for i in 0..count {
        let angle = i as f32 * 0.7;
        commands.spawn((
            Sprite {
                color: Color::srgb(0.3, 0.7, 0.3),
                custom_size: Some(Vec2::splat(30.0)),
                ..default()
            },
            Transform::default(),
            DemoEntity {
                direction: Vec2::from_angle(angle),
            },
        ));
    }

    if settings.despawn_requested.swap(false, Ordering::SeqCst) {
        let mut despawned = 0;
        for entity in &squares {
            commands.entity(entity).despawn();
            despawned += 1;
        }
        info!("Despawned {} squares", despawned);
    }
}

fn move_squares(
    time: Res<Time>,
    settings: Res<DemoSettings>,
    mut squares: Query<(&mut Transform, &mut DemoEntity)>,
) {
    let speed = settings.speed.read().map(|s| *s).unwrap_or(0.0);
    for (mut transform, mut square) in &mut squares {
        transform.translation += (square.direction * speed * time.delta_secs()).extend(0.0);
        // Bounce inside a fixed box
        if transform.translation.x.abs() > 400.0 {
            square.direction.x = -square.direction.x;
        }
        if transform.translation.y.abs() > 250.0 {
            square.direction.y = -square.direction.y;
        }
    }
}

/// The plugin already frees the cursor; hosts can react to toggles here too.
fn report_toggles(mut toggles: MessageReader<ConsoleToggleEvent>) {
    for toggle in toggles.read() {
        if toggle.open {
            info!("Console opening: gameplay paused");
        } else {
            info!("Console closing: gameplay resumed");
        }
    }
}
