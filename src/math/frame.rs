//! Agent-local coordinate frames
//!
//! Local space is anchored at an agent's position with `x` along its
//! forward vector and `y` along its tangent (forward rotated 90°).

use glam::Vec2;

/// Orthonormal 2D frame anchored at a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    /// Frame origin in world space
    pub origin: Vec2,
    /// Local +x axis
    pub forward: Vec2,
    /// Local +y axis
    pub tangent: Vec2,
}

impl LocalFrame {
    /// Create a frame from an origin and a unit forward vector.
    ///
    /// The tangent is derived as `forward.perp()`.
    #[must_use]
    pub fn new(origin: Vec2, forward: Vec2) -> Self {
        Self {
            origin,
            forward,
            tangent: forward.perp(),
        }
    }

    /// Transform a world-space point into this frame
    #[must_use]
    pub fn to_local(&self, point: Vec2) -> Vec2 {
        let offset = point - self.origin;
        Vec2::new(offset.dot(self.forward), offset.dot(self.tangent))
    }

    /// Transform a local point back into world space
    #[must_use]
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.origin + self.vector_to_world(local)
    }

    /// Rotate a local direction into world space (no translation)
    #[must_use]
    pub fn vector_to_world(&self, local: Vec2) -> Vec2 {
        self.forward * local.x + self.tangent * local.y
    }
}
