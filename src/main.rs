//! Rill - 2D SPH dam break demo
//!
//! A column of fluid collapses under gravity inside a window-sized domain.

use bevy::prelude::*;
use rill::prelude::*;

const DOMAIN_WIDTH: f32 = 1280.0;
const DOMAIN_HEIGHT: f32 = 720.0;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Rill - SPH Fluid Simulation".to_string(),
                resolution: bevy::window::WindowResolution::new(1280.0, 720.0),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(DomainBounds::new(DOMAIN_WIDTH, DOMAIN_HEIGHT))
        .add_plugins(FluidPlugin::with_params(
            SimParams::default().with_target_particles(1000),
        ))
        .add_systems(Startup, setup_scene)
        .add_systems(Update, update_debug_ui)
        .run();
}

/// Set up the camera and debug UI.
///
/// The simulation domain spans `[0, width] x [0, height]`, so the camera is
/// centered on the middle of the domain.
fn setup_scene(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_xyz(DOMAIN_WIDTH / 2.0, DOMAIN_HEIGHT / 2.0, 0.0),
    ));

    commands.spawn((
        Text::new(
            "Rill SPH\n\nControls:\n  Space - Inject particles\n  P - Pause/Resume\n  \
             S - Step (when paused)\n  R - Reset\n\nParticles: 0",
        ),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        DebugText,
    ));
}

/// Marker for the debug text.
#[derive(Component)]
struct DebugText;

/// Update the debug UI text.
fn update_debug_ui(
    sim: Res<FluidSimulation>,
    state: Res<SimState>,
    mut text_query: Query<&mut Text, With<DebugText>>,
) {
    for mut text in text_query.iter_mut() {
        let status = if state.paused { "PAUSED" } else { "Running" };
        text.0 = format!(
            "Rill SPH ({})\n\n\
             Controls:\n  \
             Space - Inject particles\n  \
             P - Pause/Resume\n  \
             S - Step (when paused)\n  \
             R - Reset\n\n\
             Particles: {}\n\
             Step: {}",
            status,
            sim.particle_count(),
            state.frame
        );
    }
}
