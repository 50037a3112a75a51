//! Simulation driver
//!
//! Owns the world and tick statistics and advances the world either by
//! caller-supplied deltas or by the configured fixed timestep.

use std::time::Instant;

use hecs::Entity;

use crate::core::{ConfigError, Scene, SceneError, SimConfig, TickStats};
use crate::ecs::{VehicleView, World};

/// How many ticks pass between debug summaries
const SUMMARY_INTERVAL: u64 = 600;

/// Headless steering simulation
pub struct Simulation {
    config: SimConfig,
    world: World,
    stats: TickStats,
    vehicles: Vec<Entity>,
}

impl Simulation {
    /// Create an empty simulation
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails [`SimConfig::validate`]
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!(
            "Starting simulation: bounds {} to {}, seed {:#x}",
            config.bounds.min,
            config.bounds.max,
            config.seed
        );

        Ok(Self {
            world: World::new(&config),
            stats: TickStats::new(config.stats_window),
            vehicles: Vec::new(),
            config,
        })
    }

    /// Create a simulation and spawn `scene` into it
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the scene roster is
    /// inconsistent
    pub fn from_scene(config: SimConfig, scene: &Scene) -> Result<Self, SimulationError> {
        let mut simulation = Self::new(config)?;
        simulation.vehicles = scene.spawn_into(&mut simulation.world)?;
        Ok(simulation)
    }

    /// Advance every vehicle by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let started = Instant::now();
        let updated = self.world.step(dt);
        self.stats.record_tick(started.elapsed(), dt, updated);

        if self.world.ticks() % SUMMARY_INTERVAL == 0 {
            log::debug!("{}", self.stats.format_stats());
        }
    }

    /// Run `ticks` updates at the configured fixed timestep
    pub fn run_fixed(&mut self, ticks: u64) {
        let dt = self.config.tick_seconds;
        for _ in 0..ticks {
            self.update(dt);
        }
        log::info!(
            "Ran {ticks} ticks ({:.2}s simulated): {}",
            ticks as f32 * dt,
            self.stats.format_stats()
        );
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    /// Vehicle handles spawned from the scene, in roster order
    pub fn vehicles(&self) -> &[Entity] {
        &self.vehicles
    }

    /// Presentation snapshot of every vehicle
    pub fn vehicle_views(&self) -> Vec<VehicleView> {
        self.world.vehicle_views()
    }
}

/// Errors that can occur while setting up a simulation
#[derive(Debug, Clone)]
pub enum SimulationError {
    /// Rejected configuration
    Config(ConfigError),
    /// Rejected scene roster
    Scene(SceneError),
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::Scene(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SimulationError {}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<SceneError> for SimulationError {
    fn from(e: SceneError) -> Self {
        Self::Scene(e)
    }
}
