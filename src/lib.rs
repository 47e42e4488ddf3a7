//! Rill - 2D SPH fluid simulation for Bevy
//!
//! This library provides a classic Smoothed Particle Hydrodynamics fluid
//! simulation in two dimensions: per-step density and pressure estimation
//! over a uniform spatial grid, pairwise pressure/viscosity/cohesion forces,
//! forward Euler integration and reflective damped boundaries.
//!
//! # Features
//!
//! - **SPH core**: poly6 / spiky-gradient / viscosity-laplacian kernels with
//!   an equation-of-state pressure model
//! - **Grid neighbor search**: uniform buckets at twice the kernel radius,
//!   rebuilt every step
//! - **Dam-break scenario**: seeded at startup, further batches injectable
//!   at runtime
//! - **Easy integration**: one Bevy plugin, resources for every knob
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use rill::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .insert_resource(DomainBounds::new(1280.0, 720.0))
//!         .add_plugins(FluidPlugin::with_params(
//!             SimParams::default().with_target_particles(1000),
//!         ))
//!         .run();
//! }
//! ```

pub mod fluid;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::fluid::prelude::*;
}
