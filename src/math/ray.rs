//! Ray vs. circle intersection in agent-local space

use glam::Vec2;

/// Intersect the ray starting at the local origin along +x with a circle.
///
/// Returns the near and far intersection distances along the ray (the near
/// one may be negative when the origin is inside the circle), or `None` when
/// the ray's line misses the circle.
#[must_use]
pub fn forward_ray_circle(center: Vec2, radius: f32) -> Option<[f32; 2]> {
    let discriminant = radius * radius - center.y * center.y;
    if discriminant < 0.0 {
        return None;
    }

    let half_chord = discriminant.sqrt();
    Some([center.x - half_chord, center.x + half_chord])
}

/// Smallest strictly positive distance among a pair of intersections
#[must_use]
pub fn nearest_positive(hits: [f32; 2]) -> Option<f32> {
    let [near, far] = hits;
    if near > 0.0 {
        Some(near)
    } else if far > 0.0 {
        Some(far)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_on_hit() {
        let hits = forward_ray_circle(Vec2::new(10.0, 0.0), 2.0).unwrap();
        assert!((hits[0] - 8.0).abs() < 1e-5);
        assert!((hits[1] - 12.0).abs() < 1e-5);
        assert_eq!(nearest_positive(hits), Some(hits[0]));
    }

    #[test]
    fn test_offset_miss() {
        assert!(forward_ray_circle(Vec2::new(10.0, 3.0), 2.0).is_none());
    }

    #[test]
    fn test_origin_inside_circle_uses_far_hit() {
        let hits = forward_ray_circle(Vec2::new(0.5, 0.0), 2.0).unwrap();
        assert!(hits[0] < 0.0);
        let nearest = nearest_positive(hits).unwrap();
        assert!((nearest - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_circle_behind_has_no_positive_hit() {
        let hits = forward_ray_circle(Vec2::new(-10.0, 0.0), 2.0).unwrap();
        assert_eq!(nearest_positive(hits), None);
    }
}
