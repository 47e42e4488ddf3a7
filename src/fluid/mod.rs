//! 2D Smoothed Particle Hydrodynamics simulation module for Bevy.
//!
//! # Architecture
//!
//! The simulation is structured in the following components:
//!
//! - [`params`]: Simulation parameters and kernel normalization constants
//! - [`kernel`]: SPH smoothing kernel functions
//! - [`particle`]: Particle data and dam-break scenario seeding
//! - [`spatial`]: Uniform grid for neighbor search
//! - [`boundary`]: Domain bounds and reflective boundary response
//! - [`simulation`]: The per-step density/force/integration pipeline
//! - [`render`]: Particle disc rendering
//! - [`plugin`]: Bevy plugin for easy integration
//!
//! # Example
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use rill::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .insert_resource(DomainBounds::new(1280.0, 720.0))
//!         .add_plugins(FluidPlugin::default())
//!         .run();
//! }
//! ```

pub mod boundary;
pub mod kernel;
pub mod params;
pub mod particle;
pub mod plugin;
pub mod render;
pub mod simulation;
pub mod spatial;

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::boundary::*;
    pub use super::params::*;
    pub use super::particle::*;
    pub use super::plugin::*;
    pub use super::render::*;
    pub use super::simulation::*;
    pub use super::spatial::*;
}
