//! Core simulation module
//!
//! Configuration, startup rosters, the tick driver and its statistics

mod config;
mod random;
mod scene;
mod simulation;
mod stats;

pub use config::{ConfigError, SimConfig};
pub use random::{RandomSource, SimRng, seeded};
pub use scene::{BehaviorSpec, ObstacleSpawn, Scene, SceneError, VehicleSpawn, WallSpawn};
pub use simulation::{Simulation, SimulationError};
pub use stats::TickStats;
