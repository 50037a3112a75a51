//! Vehicle component: enabled behaviors plus their configuration
//!
//! The behavior setters mirror how a game script drives an agent: each one
//! stores the behavior's parameters and switches it on. The World resolves
//! targets and obstacles every tick and feeds them to
//! [`SteeringCalculator::calculate`].

use glam::Vec2;
use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::ai::{
    Behavior, Behaviors, SteeringCalculator, SteeringInputs, SteeringTuning, WanderState,
};
use crate::core::RandomSource;

/// Construction parameters for a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleDesc {
    /// Spawn position
    pub position: Vec2,
    /// Initial heading, counter-clockwise from +x
    pub rotation_degrees: f32,
    /// Initial velocity
    pub velocity: Vec2,
    /// Mass, must be positive
    pub mass: f32,
    /// Maximum steering force
    pub max_force: f32,
    /// Maximum speed in units per second
    pub max_speed: f32,
    /// Maximum turn rate in degrees per second
    pub max_turn_rate_deg: f32,
    /// Uniform scale; also the bounding radius
    pub scale: f32,
}

impl Default for VehicleDesc {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation_degrees: 0.0,
            velocity: Vec2::ZERO,
            mass: 1.0,
            max_force: 20.0,
            max_speed: 10.0,
            max_turn_rate_deg: 180.0,
            scale: 1.0,
        }
    }
}

impl VehicleDesc {
    /// Default vehicle at `position`
    #[must_use]
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    #[must_use]
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    #[must_use]
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    #[must_use]
    pub fn with_max_force(mut self, max_force: f32) -> Self {
        self.max_force = max_force;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Unit heading derived from `rotation_degrees`
    #[must_use]
    pub fn forward(&self) -> Vec2 {
        let (sin, cos) = self.rotation_degrees.to_radians().sin_cos();
        Vec2::new(cos, sin)
    }
}

/// Steering state attached to every moving agent
#[derive(Debug, Clone)]
pub struct Vehicle {
    behaviors: Behaviors,
    target: Vec2,
    moving_target: Option<Entity>,
    wander: WanderState,
    tuning: SteeringTuning,
    last_force: Vec2,
}

impl Vehicle {
    /// Create a vehicle with nothing enabled
    #[must_use]
    pub fn new(tuning: SteeringTuning) -> Self {
        Self {
            behaviors: Behaviors::NONE,
            target: Vec2::ZERO,
            moving_target: None,
            wander: WanderState::new(tuning.wander_radius),
            tuning,
            last_force: Vec2::ZERO,
        }
    }

    #[must_use]
    pub const fn behaviors(&self) -> Behaviors {
        self.behaviors
    }

    #[must_use]
    pub fn is_on(&self, behavior: Behavior) -> bool {
        self.behaviors.contains(behavior)
    }

    /// Switch a single behavior off, keeping its configuration
    pub fn turn_off(&mut self, behavior: Behavior) {
        self.behaviors.remove(behavior);
    }

    #[must_use]
    pub const fn target(&self) -> Vec2 {
        self.target
    }

    /// Non-owning handle to the pursuit/evade target
    #[must_use]
    pub const fn moving_target(&self) -> Option<Entity> {
        self.moving_target
    }

    #[must_use]
    pub const fn wander_state(&self) -> &WanderState {
        &self.wander
    }

    #[must_use]
    pub const fn tuning(&self) -> &SteeringTuning {
        &self.tuning
    }

    /// Combined force from the most recent tick, for debug drawing
    #[must_use]
    pub const fn last_force(&self) -> Vec2 {
        self.last_force
    }

    pub fn seek_target(&mut self, target: Vec2) {
        self.target = target;
        self.behaviors.insert(Behavior::Seek);
    }

    pub fn flee_target(&mut self, target: Vec2) {
        self.target = target;
        self.behaviors.insert(Behavior::Flee);
    }

    pub fn arrive_at(&mut self, target: Vec2, deceleration: f32) {
        self.target = target;
        self.tuning.arrive_deceleration = deceleration;
        self.behaviors.insert(Behavior::Arrive);
    }

    pub fn pursuit_on(&mut self, evader: Entity, heading_tolerance: f32, turnaround_coefficient: f32) {
        self.moving_target = Some(evader);
        self.tuning.pursuit_heading_tolerance = heading_tolerance;
        self.tuning.turnaround_coefficient = turnaround_coefficient;
        self.behaviors.insert(Behavior::Pursuit);
    }

    pub fn evade_from(&mut self, pursuer: Entity, turnaround_coefficient: f32) {
        self.moving_target = Some(pursuer);
        self.tuning.turnaround_coefficient = turnaround_coefficient;
        self.behaviors.insert(Behavior::Evade);
    }

    pub fn wander_around(&mut self, radius: f32, distance: f32, jitter: f32) {
        self.tuning.wander_radius = radius;
        self.tuning.wander_distance = distance;
        self.tuning.wander_jitter = jitter;
        self.wander.rescale(radius);
        self.behaviors.insert(Behavior::Wander);
    }

    pub fn avoid_obstacles(&mut self, min_detection_length: f32, avoidance_multiplier: f32, braking_weight: f32) {
        self.tuning.min_detection_length = min_detection_length;
        self.tuning.avoidance_multiplier = avoidance_multiplier;
        self.tuning.braking_weight = braking_weight;
        self.behaviors.insert(Behavior::ObstacleAvoidance);
    }

    /// Disable every behavior and drop all targets
    pub fn turn_off_steering(&mut self) {
        self.behaviors.clear();
        self.target = Vec2::ZERO;
        self.moving_target = None;
    }

    /// Evaluate the enabled behaviors for this tick and remember the result
    pub fn steering_force<R: RandomSource + ?Sized>(
        &mut self,
        calculator: &SteeringCalculator<'_>,
        inputs: &SteeringInputs<'_>,
        rng: &mut R,
    ) -> Vec2 {
        let force = calculator.calculate(self.behaviors, &self.tuning, &mut self.wander, inputs, rng);
        self.last_force = force;
        force
    }

    /// Overwrite the recorded force, e.g. after the world clamps it
    pub(crate) fn record_force(&mut self, force: Vec2) {
        self.last_force = force;
    }
}

impl Default for Vehicle {
    fn default() -> Self {
        Self::new(SteeringTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> Entity {
        hecs::World::new().spawn((0u8,))
    }

    #[test]
    fn test_setters_enable_behaviors() {
        let mut vehicle = Vehicle::default();
        assert!(vehicle.behaviors().is_empty());

        vehicle.seek_target(Vec2::new(1.0, 2.0));
        vehicle.wander_around(2.0, 3.0, 0.5);
        vehicle.avoid_obstacles(5.0, 1.5, 0.3);

        assert!(vehicle.is_on(Behavior::Seek));
        assert!(vehicle.is_on(Behavior::Wander));
        assert!(vehicle.is_on(Behavior::ObstacleAvoidance));
        assert!(!vehicle.is_on(Behavior::Flee));
        assert_eq!(vehicle.target(), Vec2::new(1.0, 2.0));
        assert_eq!(vehicle.tuning().wander_distance, 3.0);
        assert_eq!(vehicle.tuning().braking_weight, 0.3);
        assert!((vehicle.wander_state().target().length() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_arrive_stores_deceleration() {
        let mut vehicle = Vehicle::default();
        vehicle.arrive_at(Vec2::new(5.0, 0.0), 2.5);

        assert!(vehicle.is_on(Behavior::Arrive));
        assert_eq!(vehicle.tuning().arrive_deceleration, 2.5);
    }

    #[test]
    fn test_pursuit_and_evade_record_moving_target() {
        let other = handle();
        let mut vehicle = Vehicle::default();

        vehicle.pursuit_on(other, 0.9, 0.5);
        assert_eq!(vehicle.moving_target(), Some(other));
        assert_eq!(vehicle.tuning().pursuit_heading_tolerance, 0.9);

        vehicle.evade_from(other, 0.5);
        assert!(vehicle.is_on(Behavior::Evade));
    }

    #[test]
    fn test_evade_stores_turnaround_coefficient() {
        let mut vehicle = Vehicle::default();
        vehicle.evade_from(handle(), 0.75);

        assert!(vehicle.is_on(Behavior::Evade));
        assert_eq!(vehicle.tuning().turnaround_coefficient, 0.75);
    }

    #[test]
    fn test_turn_off_steering_resets() {
        let mut vehicle = Vehicle::default();
        vehicle.flee_target(Vec2::new(9.0, 9.0));
        vehicle.pursuit_on(handle(), 0.97, 0.25);

        vehicle.turn_off_steering();

        assert!(vehicle.behaviors().is_empty());
        assert_eq!(vehicle.target(), Vec2::ZERO);
        assert_eq!(vehicle.moving_target(), None);
    }

    #[test]
    fn test_turn_off_single_behavior() {
        let mut vehicle = Vehicle::default();
        vehicle.seek_target(Vec2::X);
        vehicle.flee_target(Vec2::X);
        vehicle.turn_off(Behavior::Seek);

        assert!(!vehicle.is_on(Behavior::Seek));
        assert!(vehicle.is_on(Behavior::Flee));
    }

    #[test]
    fn test_desc_forward_from_rotation() {
        let desc = VehicleDesc::at(Vec2::ZERO).with_rotation(90.0);
        assert!((desc.forward() - Vec2::Y).length() < 1e-5);
    }
}
