//! Autonomous vehicle steering simulation
//!
//! This crate provides:
//! - Steering behaviors (seek, flee, arrive, pursuit, evade, wander and
//!   obstacle avoidance) combined per vehicle
//! - Entity storage on the hecs ECS with proximity tagging and queries
//! - Toroidal world bounds, RON configuration and scenario rosters
//! - A headless tick driver with rolling timing statistics

pub mod ai;
pub mod core;
pub mod ecs;
pub mod math;

// Re-exports for convenience
pub use glam;
pub use hecs;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{Behavior, Behaviors, SteeringTuning, Vehicle, VehicleDesc};
    pub use crate::core::{BehaviorSpec, Scene, SimConfig, Simulation, TickStats, VehicleSpawn};
    pub use crate::ecs::{EntityId, Kinematics, Name, Obstacle, Spatial, VehicleView, Wall, World};
    pub use crate::math::{Bounds, Plane2};
    pub use glam::Vec2;
}
