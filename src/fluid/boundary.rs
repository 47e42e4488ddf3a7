//! Simulation domain bounds and boundary response.
//!
//! The domain is the axis-aligned rectangle `[0, width] x [0, height]`.
//! Walls are reflective and lossy: a particle crossing a wall is clamped
//! back onto it and the velocity component normal to the wall is multiplied
//! by the (negative) damping coefficient, flipping its sign and shrinking
//! its magnitude. This is not an exact elastic reflection.

use bevy::prelude::*;

/// Rectangular simulation domain.
#[derive(Resource, Clone, Copy, Debug, Reflect)]
#[reflect(Resource)]
pub struct DomainBounds {
    /// Domain width. Particles live in `0..=width - particle_radius` on x.
    pub width: f32,
    /// Domain height. Particles live in `0..=height - particle_radius` on y.
    pub height: f32,
}

impl Default for DomainBounds {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl DomainBounds {
    /// Creates bounds for a `width x height` domain.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Clamps a position to the domain and dampens the velocity on contact.
    ///
    /// `damping` is expected to be negative (see
    /// [`SimParams::boundary_damping`](super::params::SimParams)); each wall
    /// contact applies it exactly once to the corresponding velocity axis.
    /// The upper walls are inset by the particle radius so the rendered disc
    /// stays inside the domain.
    pub fn reflect(&self, position: &mut Vec2, velocity: &mut Vec2, damping: f32, particle_radius: f32) {
        if position.x < 0.0 {
            position.x = 0.0;
            velocity.x *= damping;
        }
        if position.x > self.width - particle_radius {
            position.x = self.width - particle_radius;
            velocity.x *= damping;
        }
        if position.y < 0.0 {
            position.y = 0.0;
            velocity.y *= damping;
        }
        if position.y > self.height - particle_radius {
            position.y = self.height - particle_radius;
            velocity.y *= damping;
        }
    }

    /// Whether a point lies inside the domain rectangle.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}
