//! Fluid particle data and scenario seeding.
//!
//! A [`Particle`] is a sample of the continuous fluid, not a physical
//! droplet. Position and velocity persist across steps; force, density and
//! pressure are recomputed from scratch every step.
//!
//! [`DamBreakEmitter`] produces the initial layout: a rectangular column of
//! particles in the middle of the domain that collapses under gravity. The
//! same layout is used for runtime injection.

use bevy::prelude::*;

use super::boundary::DomainBounds;
use super::params::SimParams;

/// A single SPH particle.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    /// Current position.
    pub position: Vec2,
    /// Current velocity.
    pub velocity: Vec2,
    /// Force accumulator, rebuilt every step.
    pub force: Vec2,
    /// Density estimate from the last density pass.
    pub density: f32,
    /// Pressure derived from the density via the equation of state.
    pub pressure: f32,
}

impl Particle {
    /// Creates a particle at rest at the given position.
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            density: 0.0,
            pressure: 0.0,
        }
    }
}

/// Dam-break scenario emitter.
///
/// Fills a column between two fractional x bounds of the domain, row by row
/// from `y_start` upward, with a small horizontal jitter per particle so the
/// collapse does not stay perfectly symmetric. Never produces more than the
/// configured target particle count.
#[derive(Resource, Clone, Debug, Reflect)]
#[reflect(Resource)]
pub struct DamBreakEmitter {
    /// Left edge of the column as a fraction of the domain width.
    pub x_min_frac: f32,
    /// Right edge of the column as a fraction of the domain width.
    pub x_max_frac: f32,
    /// Height at which the first row is placed.
    pub y_start: f32,
    /// Particle spacing as a fraction of the kernel radius.
    pub spacing_factor: f32,
    /// Half-width of the uniform horizontal jitter.
    pub jitter: f32,
}

impl Default for DamBreakEmitter {
    fn default() -> Self {
        Self {
            x_min_frac: 2.0 / 6.0,
            x_max_frac: 4.0 / 6.0,
            y_start: 60.0,
            spacing_factor: 0.9,
            jitter: 0.5,
        }
    }
}

impl DamBreakEmitter {
    /// Generates the seed positions for this layout.
    ///
    /// Fills rows until the domain height is exhausted or
    /// `params.target_particles` positions have been produced, whichever
    /// comes first.
    pub fn positions(&self, params: &SimParams, bounds: &DomainBounds) -> Vec<Vec2> {
        let spacing = params.kernel_radius * self.spacing_factor;
        let x_min = bounds.width * self.x_min_frac;
        let x_max = bounds.width * self.x_max_frac;

        let mut positions = Vec::new();
        let mut y = self.y_start;
        while y < bounds.height {
            let mut x = x_min;
            while x <= x_max {
                if positions.len() >= params.target_particles {
                    return positions;
                }
                let jitter = (rand::random::<f32>() - 0.5) * 2.0 * self.jitter;
                positions.push(Vec2::new(x + jitter, y));
                x += spacing;
            }
            y += spacing;
        }
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_setup() -> (SimParams, DomainBounds) {
        (SimParams::default(), DomainBounds::new(1280.0, 720.0))
    }

    #[test]
    fn test_new_particle_starts_at_rest() {
        let p = Particle::new(Vec2::new(3.0, 4.0));
        assert_eq!(p.position, Vec2::new(3.0, 4.0));
        assert_eq!(p.velocity, Vec2::ZERO);
        assert_eq!(p.force, Vec2::ZERO);
        assert_eq!(p.density, 0.0);
        assert_eq!(p.pressure, 0.0);
    }

    #[test]
    fn test_seeding_respects_target_count() {
        let (params, bounds) = test_setup();
        let emitter = DamBreakEmitter::default();

        let positions = emitter.positions(&params, &bounds);
        assert!(!positions.is_empty());
        assert!(positions.len() <= params.target_particles);
    }

    #[test]
    fn test_seeding_bound_holds_with_tiny_target() {
        // The layout geometry would yield far more candidate slots.
        let (params, bounds) = test_setup();
        let params = params.with_target_particles(7);
        let emitter = DamBreakEmitter::default();

        assert_eq!(emitter.positions(&params, &bounds).len(), 7);
    }

    #[test]
    fn test_seeding_stays_in_column() {
        let (params, bounds) = test_setup();
        let emitter = DamBreakEmitter::default();

        let x_min = bounds.width * emitter.x_min_frac - emitter.jitter;
        let x_max = bounds.width * emitter.x_max_frac + emitter.jitter;
        for pos in emitter.positions(&params, &bounds) {
            assert!(pos.x >= x_min && pos.x <= x_max);
            assert!(pos.y >= emitter.y_start && pos.y < bounds.height);
        }
    }

    #[test]
    fn test_seeding_exhausts_domain_when_target_is_large() {
        let (params, bounds) = test_setup();
        let params = params.with_target_particles(usize::MAX);
        let emitter = DamBreakEmitter::default();

        let positions = emitter.positions(&params, &bounds);
        // Row count times column count, bounded by geometry rather than the
        // target.
        let spacing = params.kernel_radius * emitter.spacing_factor;
        let rows = ((bounds.height - emitter.y_start) / spacing).ceil() as usize;
        assert!(positions.len() <= rows * (bounds.width / spacing).ceil() as usize);
        assert!(!positions.is_empty());
    }
}
