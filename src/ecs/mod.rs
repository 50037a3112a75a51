//! Entity Component System module
//!
//! Built on top of the hecs ECS library

mod components;
mod ids;
mod world;

pub use components::{EntityId, EntityKind, Kinematics, Name, Obstacle, Spatial, Wall};
pub use ids::IdAllocator;
pub use world::{Neighbor, Neighbors, VehicleView, World};
