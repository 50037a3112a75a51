//! Rectangular world bounds with toroidal wrapping

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned world rectangle.
///
/// Agents that leave one edge reappear at the opposite edge. This is a
/// boundary policy, not a collision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Bottom-left corner
    pub min: Vec2,
    /// Top-right corner
    pub max: Vec2,
}

impl Bounds {
    /// Create bounds from two corners
    #[must_use]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Bounds centered on the origin spanning `±half_height * aspect` by
    /// `±half_height`
    #[must_use]
    pub fn from_half_height(half_height: f32, aspect: f32) -> Self {
        let half = Vec2::new(half_height * aspect, half_height);
        Self::new(-half, half)
    }

    /// Width and height
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Whether both extents are strictly positive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.max.x > self.min.x && self.max.y > self.min.y
    }

    /// Check if a point lies inside (edges inclusive)
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Wrap a point that left the rectangle to the opposite edge
    #[must_use]
    pub fn wrap(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            wrap_axis(point.x, self.min.x, self.max.x),
            wrap_axis(point.y, self.min.y, self.max.y),
        )
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::from_half_height(50.0, 16.0 / 9.0)
    }
}

fn wrap_axis(value: f32, min: f32, max: f32) -> f32 {
    if value > max {
        min
    } else if value < min {
        max
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inside_point_unchanged() {
        let bounds = Bounds::new(Vec2::splat(-10.0), Vec2::splat(10.0));
        let p = Vec2::new(3.0, -9.5);
        assert_eq!(bounds.wrap(p), p);
        assert!(bounds.contains(p));
    }

    #[test]
    fn test_wrap_right_edge_to_left() {
        let bounds = Bounds::new(Vec2::splat(-10.0), Vec2::splat(10.0));
        let wrapped = bounds.wrap(Vec2::new(10.5, 2.0));
        assert_eq!(wrapped, Vec2::new(-10.0, 2.0));
    }

    #[test]
    fn test_wrap_bottom_edge_to_top() {
        let bounds = Bounds::new(Vec2::splat(-10.0), Vec2::splat(10.0));
        let wrapped = bounds.wrap(Vec2::new(0.0, -11.0));
        assert_eq!(wrapped, Vec2::new(0.0, 10.0));
    }

    #[test]
    fn test_default_bounds_are_valid() {
        let bounds = Bounds::default();
        assert!(bounds.is_valid());
        assert!((bounds.size().y - 100.0).abs() < 1e-4);
    }
}
