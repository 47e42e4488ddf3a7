//! Fluid simulation core logic.
//!
//! One [`FluidSimulation::step`] runs the classic SPH pipeline over the
//! owned particle store:
//!
//! 1. Rebuild the spatial grid from current positions.
//! 2. Density pass: kernel-weighted sum over the Moore neighborhood, then
//!    pressure from the equation of state.
//! 3. Force pass: pairwise pressure, viscosity and cohesion terms plus
//!    density-scaled gravity.
//! 4. Forward Euler integration and boundary reflection.
//!
//! The step is synchronous and has no suspension points; the grid is built
//! and consumed entirely within it. The grid holds indices into
//! `particles`, never owning references.

use bevy::prelude::*;

use super::boundary::DomainBounds;
use super::kernel;
use super::params::{SimParams, EPSILON};
use super::particle::Particle;
use super::spatial::SpatialGrid;

/// Main fluid simulation resource.
///
/// Owns the particle store and the per-step spatial grid.
#[derive(Resource, Default)]
pub struct FluidSimulation {
    /// All particles, including any that have diverged to non-finite
    /// positions (those are excluded from the grid, so they no longer
    /// interact, but they are never removed from this list).
    pub particles: Vec<Particle>,
    grid: SpatialGrid,
}

impl FluidSimulation {
    /// Creates an empty simulation with room for `capacity` particles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            grid: SpatialGrid::default(),
        }
    }

    /// Returns the number of particles (inert diverged ones included).
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Appends a batch of particles at the given positions and immediately
    /// rebuilds the grid, leaving existing particle state untouched.
    pub fn spawn_batch(
        &mut self,
        positions: impl IntoIterator<Item = Vec2>,
        params: &SimParams,
        bounds: &DomainBounds,
    ) {
        self.particles.extend(positions.into_iter().map(Particle::new));
        self.rebuild_grid(params, bounds);
    }

    /// Removes all particles.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Advances the simulation by one timestep.
    ///
    /// Safe to call back-to-back at any cadence; each call runs to
    /// completion.
    pub fn step(&mut self, params: &SimParams, bounds: &DomainBounds) {
        if self.particles.is_empty() {
            return;
        }

        // 1. Rebuild the grid from current positions
        self.rebuild_grid(params, bounds);

        // 2. Density and pressure
        self.compute_density_pressure(params);

        // 3. Pairwise forces and gravity
        self.compute_forces(params);

        // 4. Integrate and reflect at the walls
        self.integrate(params, bounds);
    }

    fn rebuild_grid(&mut self, params: &SimParams, bounds: &DomainBounds) {
        let skipped = self.grid.rebuild(&self.particles, bounds, params.cell_size());
        if skipped > 0 {
            // Diverged particles stay in the store but are dropped from the
            // physics for this step. See DESIGN.md on this reference quirk.
            warn!("{skipped} particle(s) with non-finite positions excluded from grid");
        }
    }

    /// Density from the poly6 kernel (self-pair included), pressure from the
    /// equation of state `P = k (rho - rho0)`.
    ///
    /// Pressure below rest density goes negative on purpose: it produces a
    /// slight cohesion and must not be clamped to zero.
    fn compute_density_pressure(&mut self, params: &SimParams) {
        let coeffs = params.kernel_coefficients();
        let h_sq = params.kernel_radius * params.kernel_radius;

        for cell in 0..self.grid.bucket_count() {
            if self.grid.bucket(cell).is_empty() {
                continue;
            }
            let neighborhood = self.grid.neighbor_buckets(cell);

            for slot in 0..self.grid.bucket(cell).len() {
                let pi = self.grid.bucket(cell)[slot];
                let pos_i = self.particles[pi].position;

                let mut density = 0.0;
                for &ncell in &neighborhood {
                    for &pj in self.grid.bucket(ncell) {
                        let r_sq = (self.particles[pj].position - pos_i).length_squared();
                        if r_sq < h_sq {
                            density += params.particle_mass * kernel::poly6(coeffs.poly6, h_sq, r_sq);
                        }
                    }
                }

                let particle = &mut self.particles[pi];
                particle.density = density;
                particle.pressure = params.gas_constant * (density - params.rest_density);
            }
        }
    }

    /// Pairwise pressure, viscosity and cohesion forces over the same
    /// neighbor set as the density pass, self-pairs excluded, plus
    /// density-scaled gravity.
    fn compute_forces(&mut self, params: &SimParams) {
        let coeffs = params.kernel_coefficients();
        let h = params.kernel_radius;

        for cell in 0..self.grid.bucket_count() {
            if self.grid.bucket(cell).is_empty() {
                continue;
            }
            let neighborhood = self.grid.neighbor_buckets(cell);

            for slot in 0..self.grid.bucket(cell).len() {
                let pi = self.grid.bucket(cell)[slot];
                let Particle {
                    position: pos_i,
                    velocity: vel_i,
                    pressure: pressure_i,
                    density: density_i,
                    ..
                } = self.particles[pi];

                let mut f_pressure = Vec2::ZERO;
                let mut f_viscosity = Vec2::ZERO;
                let mut f_cohesion = Vec2::ZERO;

                for &ncell in &neighborhood {
                    for &pj in self.grid.bucket(ncell) {
                        if pi == pj {
                            continue;
                        }
                        let neighbor = self.particles[pj];
                        let rij = neighbor.position - pos_i;
                        let r = rij.length();

                        if r > EPSILON && r < h {
                            // Symmetrized pressure force; division by the
                            // neighbor's density keeps the pair antisymmetric.
                            let c = -params.particle_mass * (pressure_i + neighbor.pressure)
                                / (2.0 * neighbor.density)
                                * kernel::spiky_gradient(coeffs.spiky_gradient, h, r);
                            f_pressure += rij.normalize() * c;

                            let c = params.viscosity * params.particle_mass / neighbor.density
                                * kernel::viscosity_laplacian(coeffs.viscosity_laplacian, h, r);
                            f_viscosity += (neighbor.velocity - vel_i) * c;
                        }
                        if r > EPSILON && r < 2.0 * h {
                            // Long-range cohesion; the negative sigma prefactor
                            // against the negative spiky coefficient attracts.
                            let c = -params.surface_tension
                                * coeffs.viscosity_laplacian
                                * (params.particle_mass / neighbor.density)
                                * kernel::cohesion(coeffs.spiky_gradient, h, r);
                            f_cohesion += rij.normalize() * c;
                        }
                    }
                }

                let f_gravity = params.gravity * density_i;
                self.particles[pi].force = f_pressure + f_viscosity + f_cohesion + f_gravity;
            }
        }
    }

    /// Forward Euler: `v += f * dt / rho`, `x += v * dt`, then the boundary
    /// clamp.
    ///
    /// A particle with near-zero density (possible only when it was excluded
    /// from the grid) keeps its velocity unchanged for the step instead of
    /// dividing by zero.
    fn integrate(&mut self, params: &SimParams, bounds: &DomainBounds) {
        for particle in &mut self.particles {
            if particle.density > EPSILON {
                particle.velocity += particle.force * (params.dt / particle.density);
            }
            particle.position += particle.velocity * params.dt;

            bounds.reflect(
                &mut particle.position,
                &mut particle.velocity,
                params.boundary_damping,
                params.particle_radius,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_params() -> SimParams {
        // Gravity off so pairwise terms can be observed in isolation.
        SimParams::default().with_gravity(Vec2::ZERO)
    }

    fn bounds() -> DomainBounds {
        DomainBounds::new(1280.0, 720.0)
    }

    fn sim_with(positions: &[Vec2], params: &SimParams, bounds: &DomainBounds) -> FluidSimulation {
        let mut sim = FluidSimulation::with_capacity(positions.len());
        sim.spawn_batch(positions.iter().copied(), params, bounds);
        sim
    }

    #[test]
    fn test_isolated_particle_density_is_self_contribution() {
        let params = quiet_params();
        let b = bounds();
        let mut sim = sim_with(&[Vec2::new(400.0, 300.0)], &params, &b);

        sim.step(&params, &b);

        // Only the self-pair (r = 0) contributes: mass * poly6 * h^6.
        let h = params.kernel_radius;
        let expected = params.particle_mass * params.kernel_coefficients().poly6 * h.powi(6);
        let density = sim.particles[0].density;
        assert!(
            (density - expected).abs() <= expected * 1e-5,
            "density {density} != {expected}"
        );
    }

    #[test]
    fn test_pressure_goes_negative_below_rest_density() {
        let params = quiet_params();
        let b = bounds();
        let mut sim = sim_with(&[Vec2::new(400.0, 300.0)], &params, &b);

        sim.step(&params, &b);

        // An isolated particle is far below rest density; the equation of
        // state must not clamp the result at zero.
        assert!(sim.particles[0].density < params.rest_density);
        assert!(sim.particles[0].pressure < 0.0);
    }

    #[test]
    fn test_pairwise_forces_are_antisymmetric() {
        let params = quiet_params();
        let b = bounds();
        // Two particles half a kernel radius apart, nothing else nearby.
        let mut sim = sim_with(
            &[Vec2::new(400.0, 300.0), Vec2::new(408.0, 300.0)],
            &params,
            &b,
        );

        sim.step(&params, &b);

        let fa = sim.particles[0].force;
        let fb = sim.particles[1].force;
        assert!(fa.length() > 0.0);
        // Newton's third law: equal magnitude, opposite direction.
        let residual = (fa + fb).length();
        assert!(
            residual <= fa.length() * 1e-4,
            "force residual {residual} vs magnitude {}",
            fa.length()
        );
    }

    #[test]
    fn test_equal_densities_for_symmetric_pair() {
        let params = quiet_params();
        let b = bounds();
        let mut sim = sim_with(
            &[Vec2::new(400.0, 300.0), Vec2::new(408.0, 300.0)],
            &params,
            &b,
        );

        sim.step(&params, &b);

        let d0 = sim.particles[0].density;
        let d1 = sim.particles[1].density;
        assert!((d0 - d1).abs() <= d0 * 1e-6);
    }

    #[test]
    fn test_boundary_reflection_happens_once_per_step() {
        let params = quiet_params();
        let b = bounds();
        let mut sim = sim_with(&[Vec2::new(1.0, 300.0)], &params, &b);
        // Fast enough to cross the left wall within one dt.
        sim.particles[0].velocity = Vec2::new(-10_000.0, 0.0);

        sim.step(&params, &b);

        let p = &sim.particles[0];
        assert_eq!(p.position.x, 0.0);
        // -10000 * -0.5: sign flipped, magnitude halved, exactly once.
        assert!((p.velocity.x - 5_000.0).abs() < 1.0);
    }

    #[test]
    fn test_diverged_particle_goes_inert_but_stays_in_store() {
        let params = quiet_params();
        let b = bounds();
        let mut sim = sim_with(
            &[Vec2::new(400.0, 300.0), Vec2::new(500.0, 300.0)],
            &params,
            &b,
        );
        sim.particles[1].position = Vec2::new(f32::NAN, 300.0);

        sim.step(&params, &b);

        // Still in the list, excluded from the grid, zero-density guard
        // keeps its velocity finite.
        assert_eq!(sim.particle_count(), 2);
        assert!(sim.particles[1].position.x.is_nan());
        assert!(sim.particles[1].velocity.is_finite());
        // The healthy particle is unaffected.
        assert!(sim.particles[0].position.is_finite());
        assert!(sim.particles[0].density > 0.0);
    }

    #[test]
    fn test_spawn_batch_preserves_existing_state() {
        let params = quiet_params();
        let b = bounds();
        let mut sim = sim_with(&[Vec2::new(400.0, 300.0)], &params, &b);
        sim.particles[0].velocity = Vec2::new(3.0, -4.0);

        sim.spawn_batch([Vec2::new(600.0, 300.0)], &params, &b);

        assert_eq!(sim.particle_count(), 2);
        assert_eq!(sim.particles[0].velocity, Vec2::new(3.0, -4.0));
        assert_eq!(sim.particles[1].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_step_on_empty_simulation_is_a_no_op() {
        let params = quiet_params();
        let b = bounds();
        let mut sim = FluidSimulation::default();
        sim.step(&params, &b);
        assert_eq!(sim.particle_count(), 0);
    }

    #[test]
    fn test_dense_cluster_generates_repulsion() {
        let params = quiet_params().with_surface_tension(0.0);
        let b = bounds();
        // A tight 3x3 blob. At these constants local density stays below
        // rest, so the symmetrized pressure term acts repulsively.
        let spacing = 4.0;
        let mut positions = Vec::new();
        for i in 0..3 {
            for j in 0..3 {
                positions.push(Vec2::new(400.0 + i as f32 * spacing, 300.0 + j as f32 * spacing));
            }
        }
        let mut sim = sim_with(&positions, &params, &b);

        sim.step(&params, &b);

        // The corner particles are pushed outward from the blob center.
        let center = Vec2::new(404.0, 304.0);
        let corner = &sim.particles[0];
        let outward = (corner.position - center).normalize();
        assert!(corner.force.dot(outward) > 0.0);
    }

    #[test]
    fn test_gravity_scales_with_density() {
        let params = SimParams::default().with_surface_tension(0.0);
        let b = bounds();
        let mut sim = sim_with(&[Vec2::new(400.0, 300.0)], &params, &b);

        sim.step(&params, &b);

        // Isolated particle: the only force is gravity * density.
        let p = &sim.particles[0];
        let expected = params.gravity * p.density;
        assert!((p.force - expected).length() <= expected.length() * 1e-5);
    }
}
