//! Steering AI
//!
//! Behavior flags, the per-vehicle steering calculator and the vehicle
//! component that ties them together.

mod behaviors;
mod steering;
mod vehicle;

pub use behaviors::{Behavior, Behaviors};
pub use steering::{MovingTarget, SteeringCalculator, SteeringInputs, SteeringTuning, WanderState};
pub use vehicle::{Vehicle, VehicleDesc};
