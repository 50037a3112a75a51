//! Infinite 2D half-plane

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A line `dot(normal, p) == distance` splitting the plane in two.
///
/// Points with a positive signed distance lie on the side the normal
/// points to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane2 {
    normal: Vec2,
    distance: f32,
}

impl Plane2 {
    /// Create a plane from a unit normal and signed distance from the origin.
    ///
    /// # Panics
    ///
    /// Panics if `normal` is not unit length.
    #[must_use]
    pub fn new(normal: Vec2, distance: f32) -> Self {
        assert!(super::is_unit(normal), "plane normal must be unit length, got {normal}");
        Self { normal, distance }
    }

    /// Unit normal
    #[must_use]
    pub const fn normal(&self) -> Vec2 {
        self.normal
    }

    /// Signed distance of the plane from the origin
    #[must_use]
    pub const fn distance(&self) -> f32 {
        self.distance
    }

    /// Direction running along the plane (normal rotated 90°)
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        self.normal.perp()
    }

    /// Closest point on the plane to the origin
    #[must_use]
    pub fn point_on_plane(&self) -> Vec2 {
        self.normal * self.distance
    }

    /// Signed distance from the plane to `point`
    #[must_use]
    pub fn signed_distance_to(&self, point: Vec2) -> f32 {
        self.normal.dot(point) - self.distance
    }

    /// Whether `point` is on the side the normal faces
    #[must_use]
    pub fn is_in_front(&self, point: Vec2) -> bool {
        self.signed_distance_to(point) > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_on_plane() {
        let plane = Plane2::new(Vec2::Y, 5.0);
        assert_eq!(plane.point_on_plane(), Vec2::new(0.0, 5.0));
        assert!(plane.signed_distance_to(plane.point_on_plane()).abs() < 1e-6);
    }

    #[test]
    fn test_signed_distance_sides() {
        let plane = Plane2::new(Vec2::X, -2.0);
        assert!(plane.is_in_front(Vec2::ZERO));
        assert!(!plane.is_in_front(Vec2::new(-3.0, 0.0)));
        assert!((plane.signed_distance_to(Vec2::new(1.0, 9.0)) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_direction_is_perpendicular() {
        let plane = Plane2::new(Vec2::new(0.6, 0.8), 1.0);
        assert!(plane.direction().dot(plane.normal()).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "unit length")]
    fn test_non_unit_normal_rejected() {
        let _ = Plane2::new(Vec2::new(2.0, 0.0), 1.0);
    }
}
