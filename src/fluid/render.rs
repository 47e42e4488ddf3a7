//! Particle rendering.
//!
//! Each particle is drawn as a filled disc of fixed radius at its position;
//! the renderer consumes nothing but position and radius. Visual entities
//! carry an index into the simulation's particle store and are synced every
//! frame by the plugin.

use bevy::prelude::*;

/// Configuration for particle rendering.
#[derive(Resource, Clone, Debug, Reflect)]
#[reflect(Resource)]
pub struct FluidRenderConfig {
    /// Base color for fluid particles.
    pub base_color: Color,
    /// Scale factor applied to the particle radius for the visual disc.
    pub size_scale: f32,
    /// Color particles by speed instead of the base color.
    pub velocity_coloring: bool,
    /// Speed mapped to the hottest color.
    pub max_velocity_color: f32,
}

impl Default for FluidRenderConfig {
    fn default() -> Self {
        Self {
            base_color: Color::srgb(0.2, 0.5, 0.9),
            size_scale: 1.0,
            velocity_coloring: false,
            max_velocity_color: 400.0,
        }
    }
}

/// Visual entity for one particle; the payload is the index into the
/// simulation's particle store.
#[derive(Component, Clone, Copy, Debug)]
pub struct ParticleVisual(pub usize);

/// Handle to the shared particle disc mesh.
#[derive(Resource, Clone, Debug)]
pub struct ParticleMesh(pub Handle<Mesh>);

/// Map a velocity to a color between slow (blue) and fast (red).
pub fn velocity_to_color(velocity: Vec2, max_velocity: f32) -> Color {
    let speed = velocity.length();
    let t = (speed / max_velocity).clamp(0.0, 1.0);

    let slow = Color::srgb(0.2, 0.4, 0.9).to_linear();
    let fast = Color::srgb(0.9, 0.3, 0.2).to_linear();

    Color::linear_rgba(
        slow.red + (fast.red - slow.red) * t,
        slow.green + (fast.green - slow.green) * t,
        slow.blue + (fast.blue - slow.blue) * t,
        1.0,
    )
}
