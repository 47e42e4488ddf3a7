//! Bevy plugin wiring the simulation into an app.
//!
//! The host `Update` schedule drives the simulation: input handling, one
//! simulation step, then a sync of the visual entities, chained in that
//! order. The core itself has no notion of wall-clock time; one schedule
//! tick advances the simulation by exactly one `dt`.

use bevy::prelude::*;

use super::boundary::DomainBounds;
use super::params::SimParams;
use super::particle::DamBreakEmitter;
use super::render::{velocity_to_color, FluidRenderConfig, ParticleMesh, ParticleVisual};
use super::simulation::FluidSimulation;

/// Plugin that adds the SPH fluid simulation to a Bevy app.
///
/// Seeds a dam-break column at startup. Controls:
/// Space injects a fresh batch, P pauses, S steps while paused, R resets.
pub struct FluidPlugin {
    params: SimParams,
}

impl Default for FluidPlugin {
    fn default() -> Self {
        Self {
            params: SimParams::default(),
        }
    }
}

impl FluidPlugin {
    /// Creates the plugin with custom parameters.
    pub fn with_params(params: SimParams) -> Self {
        Self { params }
    }
}

impl Plugin for FluidPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SimParams>()
            .register_type::<DomainBounds>()
            .register_type::<DamBreakEmitter>()
            .register_type::<FluidRenderConfig>();

        app.insert_resource(self.params.clone())
            .init_resource::<DomainBounds>()
            .init_resource::<DamBreakEmitter>()
            .init_resource::<FluidRenderConfig>()
            .init_resource::<FluidSimulation>()
            .init_resource::<SimState>();

        app.add_systems(Startup, (setup_particle_mesh, seed_scenario));

        app.add_systems(
            Update,
            (handle_input, run_simulation, sync_particle_visuals).chain(),
        );
    }
}

/// Pause/step bookkeeping for the simulation loop.
#[derive(Resource, Default)]
pub struct SimState {
    /// Whether the simulation is paused.
    pub paused: bool,
    /// One step is executed on the next tick even while paused.
    pub single_step: bool,
    /// Number of completed simulation steps.
    pub frame: u64,
}

impl SimState {
    /// Toggles the pause flag.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Requests a single step while paused.
    pub fn request_step(&mut self) {
        self.single_step = true;
    }
}

fn setup_particle_mesh(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    params: Res<SimParams>,
    config: Res<FluidRenderConfig>,
) {
    let mesh = meshes.add(Circle::new(params.particle_radius * config.size_scale));
    commands.insert_resource(ParticleMesh(mesh));
}

fn seed_scenario(
    params: Res<SimParams>,
    bounds: Res<DomainBounds>,
    emitter: Res<DamBreakEmitter>,
    mut sim: ResMut<FluidSimulation>,
) {
    let positions = emitter.positions(&params, &bounds);
    info!("seeding dam break column with {} particles", positions.len());
    sim.spawn_batch(positions, &params, &bounds);
}

fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    params: Res<SimParams>,
    bounds: Res<DomainBounds>,
    emitter: Res<DamBreakEmitter>,
    mut sim: ResMut<FluidSimulation>,
    mut state: ResMut<SimState>,
) {
    // Inject a fresh dam-break batch without resetting existing particles.
    if keyboard.just_pressed(KeyCode::Space) {
        let batch = emitter.positions(&params, &bounds);
        info!(
            "injecting {} particles ({} total)",
            batch.len(),
            sim.particle_count() + batch.len()
        );
        sim.spawn_batch(batch, &params, &bounds);
    }

    if keyboard.just_pressed(KeyCode::KeyP) {
        state.toggle_pause();
    }

    if keyboard.just_pressed(KeyCode::KeyS) && state.paused {
        state.request_step();
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        sim.clear();
        state.frame = 0;
        let positions = emitter.positions(&params, &bounds);
        sim.spawn_batch(positions, &params, &bounds);
    }
}

fn run_simulation(
    params: Res<SimParams>,
    bounds: Res<DomainBounds>,
    mut sim: ResMut<FluidSimulation>,
    mut state: ResMut<SimState>,
) {
    if state.paused && !state.single_step {
        return;
    }
    state.single_step = false;

    sim.step(&params, &bounds);
    state.frame += 1;
}

fn sync_particle_visuals(
    mut commands: Commands,
    sim: Res<FluidSimulation>,
    config: Res<FluidRenderConfig>,
    mesh: Res<ParticleMesh>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut visuals: Query<(
        Entity,
        &ParticleVisual,
        &mut Transform,
        &MeshMaterial2d<ColorMaterial>,
    )>,
    mut spawned: Local<usize>,
) {
    let count = sim.particle_count();

    for (entity, visual, mut transform, material) in visuals.iter_mut() {
        if visual.0 >= count {
            // Particle store shrank (reset); drop the orphaned visual.
            commands.entity(entity).despawn();
            continue;
        }
        let particle = &sim.particles[visual.0];
        transform.translation = particle.position.extend(0.0);

        if config.velocity_coloring {
            if let Some(material) = materials.get_mut(&material.0) {
                material.color = velocity_to_color(particle.velocity, config.max_velocity_color);
            }
        }
    }

    if *spawned > count {
        *spawned = count;
    }
    for i in *spawned..count {
        commands.spawn((
            ParticleVisual(i),
            Mesh2d(mesh.0.clone()),
            MeshMaterial2d(materials.add(config.base_color)),
            Transform::from_translation(sim.particles[i].position.extend(0.0)),
        ));
    }
    *spawned = count;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_state_pause_and_step() {
        let mut state = SimState::default();
        assert!(!state.paused);

        state.toggle_pause();
        assert!(state.paused);

        state.request_step();
        assert!(state.single_step);

        state.toggle_pause();
        assert!(!state.paused);
    }
}
