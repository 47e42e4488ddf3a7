//! Fluid simulation parameters.
//!
//! These parameters control the behavior of the SPH simulation. They are
//! fixed at plugin construction but live in a Bevy resource, so they can be
//! inspected (and tweaked) through the resource system.

use bevy::prelude::*;

/// Minimum separation used by the force loop before normalizing a
/// particle-pair direction. Two particles closer than this are treated as
/// coincident and skipped.
pub const EPSILON: f32 = 1e-3;

/// Parameters controlling the SPH fluid behavior.
///
/// The defaults reproduce a splashy water column at canvas scale:
/// positions are measured in pixels and the kernel radius is 16 px.
#[derive(Resource, Clone, Debug, Reflect)]
#[reflect(Resource)]
pub struct SimParams {
    /// Rest density of the fluid.
    /// Deviations from it generate restoring pressure.
    pub rest_density: f32,

    /// Gas stiffness constant for the equation of state.
    /// Higher values make the fluid less compressible but stiffer to
    /// integrate.
    pub gas_constant: f32,

    /// Smoothing kernel radius (h). Interactions beyond this distance are
    /// ignored; the spatial grid uses a cell size of 2h.
    pub kernel_radius: f32,

    /// Mass of a single particle. All particles share the same mass.
    pub particle_mass: f32,

    /// Viscosity coefficient. Higher values = thicker fluid.
    pub viscosity: f32,

    /// Forward Euler integration timestep.
    pub dt: f32,

    /// Boundary damping coefficient applied to the velocity component
    /// normal to a wall on contact. Must be negative: the sign flip is the
    /// reflection, the magnitude < 1 the energy loss.
    pub boundary_damping: f32,

    /// Surface tension / cohesion coefficient (sigma). Acts over the long
    /// range `r < 2h` and pulls nearby particles together.
    pub surface_tension: f32,

    /// Gravity acceleration vector, scaled for pixel-space coordinates.
    pub gravity: Vec2,

    /// Particle radius used for the boundary clamp (and as the visual disc
    /// radius). Not a physical quantity.
    pub particle_radius: f32,

    /// Maximum number of particles produced by one scenario seeding pass.
    pub target_particles: usize,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            rest_density: 1000.0,
            gas_constant: 2000.0,
            kernel_radius: 16.0,
            particle_mass: 65.0,
            viscosity: 250.0,
            dt: 0.0008,
            boundary_damping: -0.5,
            surface_tension: 1e8,
            gravity: Vec2::new(0.0, -12_000.0 * 9.8),
            particle_radius: 5.0,
            target_particles: 1000,
        }
    }
}

impl SimParams {
    /// Set the kernel radius.
    pub fn with_kernel_radius(mut self, h: f32) -> Self {
        self.kernel_radius = h;
        self
    }

    /// Set the target particle count for seeding.
    pub fn with_target_particles(mut self, count: usize) -> Self {
        self.target_particles = count;
        self
    }

    /// Set the gravity vector.
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the viscosity coefficient.
    pub fn with_viscosity(mut self, viscosity: f32) -> Self {
        self.viscosity = viscosity;
        self
    }

    /// Set the surface tension coefficient.
    pub fn with_surface_tension(mut self, sigma: f32) -> Self {
        self.surface_tension = sigma;
        self
    }

    /// Grid cell size for neighbor search. With cells of 2h, a particle's
    /// kernel support is always covered by its own cell plus the 8 adjacent
    /// ones.
    pub fn cell_size(&self) -> f32 {
        2.0 * self.kernel_radius
    }

    /// Kernel normalization coefficients for the current radius.
    ///
    /// Always derived on demand so they can never go stale if the radius
    /// changes at runtime.
    pub fn kernel_coefficients(&self) -> KernelCoefficients {
        KernelCoefficients::for_radius(self.kernel_radius)
    }
}

/// Precomputed kernel normalization coefficients.
///
/// Deterministic functions of the kernel radius alone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelCoefficients {
    /// Poly6 density kernel: `315 / (64 pi h^9)`.
    pub poly6: f32,
    /// Spiky kernel gradient: `-45 / (pi h^6)`. Negative.
    pub spiky_gradient: f32,
    /// Viscosity kernel laplacian: `45 / (pi h^6)`.
    pub viscosity_laplacian: f32,
}

impl KernelCoefficients {
    /// Derive all coefficients from the kernel radius.
    pub fn for_radius(h: f32) -> Self {
        let h2 = h * h;
        let h3 = h2 * h;
        let h6 = h3 * h3;
        let h9 = h6 * h3;

        Self {
            poly6: 315.0 / (64.0 * std::f32::consts::PI * h9),
            spiky_gradient: -45.0 / (std::f32::consts::PI * h6),
            viscosity_laplacian: 45.0 / (std::f32::consts::PI * h6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_coefficients_literal_values() {
        let h: f32 = 16.0;
        let coeffs = KernelCoefficients::for_radius(h);

        let poly6 = 315.0 / (64.0 * std::f32::consts::PI * h.powi(9));
        let spiky = -45.0 / (std::f32::consts::PI * h.powi(6));

        assert!((coeffs.poly6 - poly6).abs() <= poly6.abs() * 1e-6);
        assert!((coeffs.spiky_gradient - spiky).abs() <= spiky.abs() * 1e-6);
        assert!(coeffs.spiky_gradient < 0.0);
        assert!(coeffs.viscosity_laplacian > 0.0);
        // Spiky gradient and viscosity laplacian share the same magnitude.
        assert_eq!(coeffs.viscosity_laplacian, -coeffs.spiky_gradient);
    }

    #[test]
    fn test_coefficients_track_radius_changes() {
        let params = SimParams::default();
        let before = params.kernel_coefficients();

        let params = params.with_kernel_radius(8.0);
        let after = params.kernel_coefficients();

        assert_ne!(before, after);
        // Halving h scales poly6 by 2^9.
        assert!((after.poly6 / before.poly6 - 512.0).abs() < 1e-2);
    }

    #[test]
    fn test_cell_size_is_twice_kernel_radius() {
        let params = SimParams::default().with_kernel_radius(10.0);
        assert_eq!(params.cell_size(), 20.0);
    }
}
