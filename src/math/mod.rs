//! 2D geometry helpers for steering
//!
//! Local-space frames, toroidal world bounds, half-planes and the
//! forward-ray intersection test used for collision anticipation.

mod bounds;
mod frame;
mod plane;
mod ray;

pub use bounds::Bounds;
pub use frame::LocalFrame;
pub use plane::Plane2;
pub use ray::{forward_ray_circle, nearest_positive};

/// Squared-length threshold below which a vector is treated as zero
pub const NEAR_ZERO_SQ: f32 = 1.0e-6;

/// Tolerance used when checking that a direction is unit length
pub const UNIT_TOLERANCE: f32 = 1.0e-4;

/// Check whether a vector is unit length within [`UNIT_TOLERANCE`]
#[must_use]
pub fn is_unit(v: glam::Vec2) -> bool {
    (v.length_squared() - 1.0).abs() < UNIT_TOLERANCE
}
