//! Simulation components
//!
//! Capability structs attached to `hecs` entities: every entity carries a
//! [`Spatial`]; moving agents add [`Kinematics`]; static colliders add an
//! [`Obstacle`] marker or a [`Wall`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::math::{self, Bounds, NEAR_ZERO_SQ, Plane2};

/// Stable simulation id, assigned once and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Type tag distinguishing what an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EntityKind {
    #[default]
    Default,
    Vehicle,
    Obstacle,
    Wall,
}

/// Minimal spatial object shared by every entity
#[derive(Debug, Clone)]
pub struct Spatial {
    id: EntityId,
    kind: EntityKind,
    position: Vec2,
    scale: Vec2,
    bounding_radius: f32,
    /// Transient neighbor-query mark, only meaningful right after a query
    tagged: bool,
}

impl Spatial {
    /// Create a spatial record with unit scale
    #[must_use]
    pub fn new(id: EntityId, kind: EntityKind, position: Vec2, bounding_radius: f32) -> Self {
        Self {
            id,
            kind,
            position,
            scale: Vec2::ONE,
            bounding_radius: bounding_radius.max(0.0),
            tagged: false,
        }
    }

    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: EntityKind) {
        self.kind = kind;
    }

    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    #[must_use]
    pub const fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Set a non-uniform scale, growing the bounding radius with the
    /// largest axis
    pub fn set_scale(&mut self, scale: Vec2) {
        let old = self.scale.max_element();
        if old > 0.0 {
            self.bounding_radius *= scale.max_element() / old;
        }
        self.scale = scale;
    }

    /// Set a uniform scale
    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.set_scale(Vec2::splat(scale));
    }

    #[must_use]
    pub const fn bounding_radius(&self) -> f32 {
        self.bounding_radius
    }

    pub fn set_bounding_radius(&mut self, radius: f32) {
        self.bounding_radius = radius.max(0.0);
    }

    #[must_use]
    pub const fn is_tagged(&self) -> bool {
        self.tagged
    }

    pub fn tag(&mut self) {
        self.tagged = true;
    }

    pub fn untag(&mut self) {
        self.tagged = false;
    }
}

/// Velocity, mass and limits of a moving body.
///
/// `forward` is always unit length and `tangent` is `forward` rotated 90°.
#[derive(Debug, Clone)]
pub struct Kinematics {
    velocity: Vec2,
    forward: Vec2,
    tangent: Vec2,
    mass: f32,
    inverse_mass: f32,
    max_speed: f32,
    max_force: f32,
    max_turn_rate_deg: f32,
}

impl Kinematics {
    /// Create a kinematic body.
    ///
    /// # Panics
    ///
    /// Panics if `mass <= 0` or `forward` is not unit length.
    #[must_use]
    pub fn new(
        velocity: Vec2,
        forward: Vec2,
        mass: f32,
        max_speed: f32,
        max_force: f32,
        max_turn_rate_deg: f32,
    ) -> Self {
        assert!(mass > 0.0, "kinematic body mass must be positive, got {mass}");
        assert!(math::is_unit(forward), "forward vector is not normalized: {forward}");

        Self {
            velocity,
            forward,
            tangent: forward.perp(),
            mass,
            inverse_mass: mass.recip(),
            max_speed,
            max_force,
            max_turn_rate_deg,
        }
    }

    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    #[must_use]
    pub fn speed_sq(&self) -> f32 {
        self.velocity.length_squared()
    }

    /// Whether the body is travelling at its speed limit
    #[must_use]
    pub fn is_speed_maxed_out(&self) -> bool {
        self.speed_sq() >= self.max_speed * self.max_speed - math::UNIT_TOLERANCE
    }

    #[must_use]
    pub const fn forward(&self) -> Vec2 {
        self.forward
    }

    #[must_use]
    pub const fn tangent(&self) -> Vec2 {
        self.tangent
    }

    /// Set the heading.
    ///
    /// # Panics
    ///
    /// Panics if `forward` is not unit length.
    pub fn set_forward(&mut self, forward: Vec2) {
        assert!(math::is_unit(forward), "forward vector is not normalized: {forward}");
        self.forward = forward;
        self.tangent = forward.perp();
    }

    /// Heading angle measured counter-clockwise from +x
    #[must_use]
    pub fn rotation_degrees(&self) -> f32 {
        self.forward.y.atan2(self.forward.x).to_degrees()
    }

    #[must_use]
    pub const fn mass(&self) -> f32 {
        self.mass
    }

    #[must_use]
    pub const fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    #[must_use]
    pub const fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn set_max_speed(&mut self, max_speed: f32) {
        self.max_speed = max_speed;
    }

    #[must_use]
    pub const fn max_force(&self) -> f32 {
        self.max_force
    }

    pub fn set_max_force(&mut self, max_force: f32) {
        self.max_force = max_force;
    }

    #[must_use]
    pub const fn max_turn_rate_deg(&self) -> f32 {
        self.max_turn_rate_deg
    }

    pub fn set_max_turn_rate_deg(&mut self, degrees_per_second: f32) {
        self.max_turn_rate_deg = degrees_per_second;
    }

    /// Turn toward `target` by at most the turn rate allowed in `dt`.
    ///
    /// Returns `true` once the body faces the target.
    pub fn rotate_toward(&mut self, position: Vec2, target: Vec2, dt: f32) -> bool {
        let Some(to_target) = (target - position).try_normalize() else {
            return true;
        };

        let angle = self.forward.perp_dot(to_target).atan2(self.forward.dot(to_target));
        if angle.abs() < 1.0e-5 {
            return true;
        }

        let max_step = (self.max_turn_rate_deg * dt).to_radians().max(0.0);
        let step = angle.clamp(-max_step, max_step);
        let (sin, cos) = step.sin_cos();
        let rotated = Vec2::new(
            self.forward.x * cos - self.forward.y * sin,
            self.forward.x * sin + self.forward.y * cos,
        );

        self.forward = rotated.normalize();
        self.tangent = self.forward.perp();

        angle.abs() <= max_step
    }

    /// Apply a steering force for one tick.
    ///
    /// Velocity is clamped to `max_speed` and the position wraps at `bounds`.
    /// The heading follows the velocity whenever the body is moving.
    pub fn integrate(&mut self, spatial: &mut Spatial, force: Vec2, dt: f32, bounds: &Bounds) {
        let acceleration = force * self.inverse_mass;
        self.velocity = (self.velocity + acceleration * dt).clamp_length_max(self.max_speed.max(0.0));

        spatial.set_position(bounds.wrap(spatial.position() + self.velocity * dt));

        if self.velocity.length_squared() > NEAR_ZERO_SQ {
            self.forward = self.velocity.normalize();
            self.tangent = self.forward.perp();
        }
    }
}

/// Marker for disc colliders (center and radius live on [`Spatial`])
#[derive(Debug, Clone, Copy, Default)]
pub struct Obstacle;

/// Static wall: a half-plane drawn with a finite half-length
#[derive(Debug, Clone, Copy)]
pub struct Wall {
    plane: Plane2,
    half_length: f32,
}

impl Wall {
    #[must_use]
    pub fn new(plane: Plane2, length: f32) -> Self {
        Self {
            plane,
            half_length: length * 0.5,
        }
    }

    #[must_use]
    pub const fn plane(&self) -> Plane2 {
        self.plane
    }

    #[must_use]
    pub const fn normal(&self) -> Vec2 {
        self.plane.normal()
    }

    #[must_use]
    pub const fn signed_distance(&self) -> f32 {
        self.plane.distance()
    }

    #[must_use]
    pub const fn half_length(&self) -> f32 {
        self.half_length
    }

    /// Midpoint of the drawn segment
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.plane.point_on_plane()
    }

    /// The two drawn endpoints
    #[must_use]
    pub fn endpoints(&self) -> [Vec2; 2] {
        let along = self.plane.direction() * self.half_length;
        let center = self.center();
        [center - along, center + along]
    }
}

/// Name component for debugging
#[derive(Debug, Clone)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(max_speed: f32) -> (Spatial, Kinematics) {
        (
            Spatial::new(EntityId(0), EntityKind::Vehicle, Vec2::ZERO, 1.0),
            Kinematics::new(Vec2::ZERO, Vec2::X, 2.0, max_speed, 50.0, 90.0),
        )
    }

    fn wide_bounds() -> Bounds {
        Bounds::new(Vec2::splat(-1000.0), Vec2::splat(1000.0))
    }

    #[test]
    fn test_set_forward_accepts_unit_vectors() {
        let (_, mut kin) = body(10.0);
        for degrees in (0..360).step_by(15) {
            let radians = (degrees as f32).to_radians();
            let forward = Vec2::new(radians.cos(), radians.sin());
            kin.set_forward(forward);
            assert_eq!(kin.forward(), forward);
            assert!(kin.tangent().dot(forward).abs() < 1e-5);
        }
    }

    #[test]
    #[should_panic(expected = "not normalized")]
    fn test_set_forward_rejects_long_vector() {
        let (_, mut kin) = body(10.0);
        kin.set_forward(Vec2::new(2.0, 0.0));
    }

    #[test]
    #[should_panic(expected = "not normalized")]
    fn test_set_forward_rejects_zero_vector() {
        let (_, mut kin) = body(10.0);
        kin.set_forward(Vec2::ZERO);
    }

    #[test]
    #[should_panic(expected = "mass must be positive")]
    fn test_zero_mass_rejected() {
        let _ = Kinematics::new(Vec2::ZERO, Vec2::X, 0.0, 1.0, 1.0, 1.0);
    }

    #[test]
    fn test_inverse_mass() {
        let (_, kin) = body(10.0);
        assert!((kin.inverse_mass() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_integrate_clamps_speed() {
        let (mut spatial, mut kin) = body(10.0);
        let bounds = wide_bounds();

        for force in [Vec2::new(1.0e6, 0.0), Vec2::new(-3.0e4, 7.0e4), Vec2::new(0.5, 0.5)] {
            for dt in [0.0, 0.016, 0.5, 2.0] {
                kin.integrate(&mut spatial, force, dt, &bounds);
                assert!(kin.speed() <= kin.max_speed() + 1e-4);
            }
        }
    }

    #[test]
    fn test_integrate_moves_and_reorients() {
        let (mut spatial, mut kin) = body(10.0);
        kin.integrate(&mut spatial, Vec2::new(0.0, 4.0), 1.0, &wide_bounds());

        // a = F / m = (0, 2); v = (0, 2); p = (0, 2)
        assert!((kin.velocity() - Vec2::new(0.0, 2.0)).length() < 1e-5);
        assert!((spatial.position() - Vec2::new(0.0, 2.0)).length() < 1e-5);
        assert!((kin.forward() - Vec2::Y).length() < 1e-5);
        assert!((kin.tangent() - Vec2::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_integrate_keeps_heading_when_stationary() {
        let (mut spatial, mut kin) = body(10.0);
        kin.set_forward(Vec2::Y);
        kin.integrate(&mut spatial, Vec2::ZERO, 1.0, &wide_bounds());
        assert_eq!(kin.forward(), Vec2::Y);
    }

    #[test]
    fn test_integrate_wraps_position() {
        let (mut spatial, mut kin) = body(10.0);
        let bounds = Bounds::new(Vec2::splat(-5.0), Vec2::splat(5.0));
        spatial.set_position(Vec2::new(4.5, 0.0));
        kin.set_velocity(Vec2::new(10.0, 0.0));

        kin.integrate(&mut spatial, Vec2::ZERO, 0.1, &bounds);

        assert_eq!(spatial.position().x, -5.0);
    }

    #[test]
    fn test_rotate_toward_limited_by_turn_rate() {
        let (_, mut kin) = body(10.0);
        // 90 deg/s for 0.5s can only turn 45 degrees toward a target straight up
        let facing = kin.rotate_toward(Vec2::ZERO, Vec2::new(0.0, 10.0), 0.5);
        assert!(!facing);
        assert!((kin.rotation_degrees() - 45.0).abs() < 1e-3);

        let facing = kin.rotate_toward(Vec2::ZERO, Vec2::new(0.0, 10.0), 1.0);
        assert!(facing);
        assert!((kin.forward() - Vec2::Y).length() < 1e-4);
    }

    #[test]
    fn test_speed_maxed_out() {
        let (_, mut kin) = body(10.0);
        assert!(!kin.is_speed_maxed_out());
        kin.set_velocity(Vec2::new(10.0, 0.0));
        assert!(kin.is_speed_maxed_out());
    }

    #[test]
    fn test_scale_rescales_bounding_radius() {
        let mut spatial = Spatial::new(EntityId(3), EntityKind::Default, Vec2::ZERO, 2.0);
        spatial.set_scale(Vec2::new(1.0, 3.0));
        assert!((spatial.bounding_radius() - 6.0).abs() < 1e-5);

        spatial.set_uniform_scale(1.5);
        assert!((spatial.bounding_radius() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_wall_geometry() {
        let wall = Wall::new(Plane2::new(Vec2::Y, 10.0), 20.0);
        assert_eq!(wall.half_length(), 10.0);
        assert_eq!(wall.center(), Vec2::new(0.0, 10.0));

        let [a, b] = wall.endpoints();
        assert!((a.y - 10.0).abs() < 1e-5 && (b.y - 10.0).abs() < 1e-5);
        assert!((a.distance(b) - 20.0).abs() < 1e-4);
    }
}
