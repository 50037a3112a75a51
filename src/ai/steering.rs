//! Steering behaviors for autonomous vehicles
//!
//! Every behavior reads the owning vehicle's kinematic state and returns a
//! 2D steering force; none of them mutate the vehicle. Wander is the one
//! stateful behavior and its state is passed in explicitly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ai::{Behavior, Behaviors};
use crate::core::RandomSource;
use crate::ecs::{Kinematics, Neighbor, Spatial};
use crate::math::{LocalFrame, forward_ray_circle, nearest_positive};

/// Per-vehicle tuning for every behavior
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringTuning {
    /// Arrive: desired speed per unit of remaining distance
    pub arrive_deceleration: f32,
    /// Pursuit: how head-on (as a cosine) the evader must be before the
    /// prediction is skipped
    pub pursuit_heading_tolerance: f32,
    /// Pursuit/Evade: weight of the turnaround time correction
    pub turnaround_coefficient: f32,
    /// Wander: radius of the wander circle
    pub wander_radius: f32,
    /// Wander: how far ahead the circle is projected
    pub wander_distance: f32,
    /// Wander: maximum displacement added to the target each call
    pub wander_jitter: f32,
    /// Obstacle avoidance: look-ahead length at zero speed
    pub min_detection_length: f32,
    /// Obstacle avoidance: base lateral force multiplier
    pub avoidance_multiplier: f32,
    /// Obstacle avoidance: weight of the braking term
    pub braking_weight: f32,
}

impl Default for SteeringTuning {
    fn default() -> Self {
        Self {
            arrive_deceleration: 1.0,
            pursuit_heading_tolerance: 0.97,
            turnaround_coefficient: 0.25,
            wander_radius: 1.2,
            wander_distance: 2.0,
            wander_jitter: 0.3,
            min_detection_length: 4.0,
            avoidance_multiplier: 1.0,
            braking_weight: 0.2,
        }
    }
}

/// Persistent target on the wander circle, in the vehicle's local space.
///
/// It must survive between ticks: the slow drift of this point is what makes
/// wandering look continuous instead of noisy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WanderState {
    target: Vec2,
}

impl WanderState {
    /// Start straight ahead on a circle of `radius`
    #[must_use]
    pub fn new(radius: f32) -> Self {
        Self {
            target: Vec2::new(radius, 0.0),
        }
    }

    /// Current point on the wander circle
    #[must_use]
    pub const fn target(&self) -> Vec2 {
        self.target
    }

    /// Move the point onto a circle of a different radius, keeping its angle
    pub fn rescale(&mut self, radius: f32) {
        self.target = self.target.try_normalize().unwrap_or(Vec2::X) * radius;
    }

    /// Perturb the point and snap it back onto the circle
    pub fn jitter<R: RandomSource + ?Sized>(&mut self, radius: f32, jitter: f32, rng: &mut R) -> Vec2 {
        let noise = Vec2::new(rng.random_clamped(), rng.random_clamped()) * jitter;
        self.target = (self.target + noise).try_normalize().unwrap_or(Vec2::X) * radius;
        self.target
    }
}

impl Default for WanderState {
    fn default() -> Self {
        Self::new(SteeringTuning::default().wander_radius)
    }
}

/// Snapshot of another vehicle used by Pursuit and Evade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingTarget {
    pub position: Vec2,
    pub velocity: Vec2,
    pub forward: Vec2,
}

impl MovingTarget {
    /// Capture a vehicle's current state
    #[must_use]
    pub fn capture(spatial: &Spatial, body: &Kinematics) -> Self {
        Self {
            position: spatial.position(),
            velocity: body.velocity(),
            forward: body.forward(),
        }
    }

    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// World-supplied inputs for one combined steering evaluation
#[derive(Debug, Clone, Copy)]
pub struct SteeringInputs<'a> {
    /// Static target for Seek, Flee and Arrive
    pub target: Vec2,
    /// Resolved pursuit/evade target, if any
    pub moving_target: Option<MovingTarget>,
    /// Obstacles inside the detection disc
    pub obstacles: &'a [Neighbor],
}

/// Force calculator bound to one vehicle's current state
#[derive(Debug, Clone, Copy)]
pub struct SteeringCalculator<'a> {
    spatial: &'a Spatial,
    body: &'a Kinematics,
}

impl<'a> SteeringCalculator<'a> {
    #[must_use]
    pub fn new(spatial: &'a Spatial, body: &'a Kinematics) -> Self {
        Self { spatial, body }
    }

    fn position(&self) -> Vec2 {
        self.spatial.position()
    }

    /// The vehicle's local frame (x = forward, y = tangent)
    #[must_use]
    pub fn local_frame(&self) -> LocalFrame {
        LocalFrame::new(self.position(), self.body.forward())
    }

    /// Head toward `target` at full speed
    #[must_use]
    pub fn seek(&self, target: Vec2) -> Vec2 {
        let desired = (target - self.position()).normalize_or_zero() * self.body.max_speed();
        desired - self.body.velocity()
    }

    /// Head directly away from `target` at full speed
    #[must_use]
    pub fn flee(&self, target: Vec2) -> Vec2 {
        let desired = (self.position() - target).normalize_or_zero() * self.body.max_speed();
        desired - self.body.velocity()
    }

    /// Head toward `target`, slowing linearly as the distance shrinks
    #[must_use]
    pub fn arrive(&self, target: Vec2, deceleration: f32) -> Vec2 {
        let to_target = target - self.position();
        let distance = to_target.length();
        if distance <= 0.0 {
            return Vec2::ZERO;
        }

        let speed = (distance * deceleration).min(self.body.max_speed());
        let desired = to_target * (speed / distance);
        desired - self.body.velocity()
    }

    /// Where `other` is expected to be by the time this vehicle reaches it
    #[must_use]
    pub fn predict_position(&self, other: &MovingTarget, turnaround_coefficient: f32) -> Vec2 {
        let to_other = other.position - self.position();
        let closing_speed = self.body.max_speed() + other.speed();

        let mut look_ahead = if closing_speed > 0.0 {
            to_other.length() / closing_speed
        } else {
            0.0
        };

        // Non-positive: shortens the horizon when the target is not facing us
        look_ahead += (other.forward.dot(to_other.normalize_or_zero()) - 1.0) * turnaround_coefficient;

        other.position + other.velocity * look_ahead
    }

    /// Intercept a moving evader
    #[must_use]
    pub fn pursuit(
        &self,
        evader: &MovingTarget,
        heading_tolerance: f32,
        turnaround_coefficient: f32,
    ) -> Vec2 {
        let to_evader = evader.position - self.position();
        let forward = self.body.forward();

        if to_evader.dot(forward) > 0.0 && forward.dot(evader.forward) < -heading_tolerance {
            return self.seek(evader.position);
        }

        self.seek(self.predict_position(evader, turnaround_coefficient))
    }

    /// Run from where a pursuer is about to be
    #[must_use]
    pub fn evade(&self, pursuer: &MovingTarget, turnaround_coefficient: f32) -> Vec2 {
        self.flee(self.predict_position(pursuer, turnaround_coefficient))
    }

    /// Drift toward a jittering point on a circle projected ahead
    pub fn wander<R: RandomSource + ?Sized>(
        &self,
        state: &mut WanderState,
        tuning: &SteeringTuning,
        rng: &mut R,
    ) -> Vec2 {
        let on_circle = state.jitter(tuning.wander_radius, tuning.wander_jitter, rng);
        let local_target = on_circle + Vec2::new(tuning.wander_distance, 0.0);
        let world_target = self.local_frame().to_world(local_target);
        world_target - self.position()
    }

    /// Look-ahead length, growing with speed from `min_length` to twice that
    #[must_use]
    pub fn detection_length(&self, min_length: f32) -> f32 {
        let max_speed = self.body.max_speed();
        let ratio = if max_speed > 0.0 {
            self.body.speed() / max_speed
        } else {
            0.0
        };
        min_length + min_length * ratio
    }

    /// Steer around the nearest obstacle crossing the look-ahead ray.
    ///
    /// `obstacles` should already be limited to the detection disc. Returns
    /// `None` when nothing lies on the path, which callers must treat as
    /// "no contribution" rather than a zero force.
    #[must_use]
    pub fn obstacle_avoidance(&self, obstacles: &[Neighbor], tuning: &SteeringTuning) -> Option<Vec2> {
        let box_length = self.detection_length(tuning.min_detection_length);
        if box_length <= 0.0 {
            return None;
        }

        let frame = self.local_frame();
        let own_radius = self.spatial.bounding_radius();
        let mut closest: Option<(f32, Vec2, f32)> = None;

        for obstacle in obstacles {
            let local = frame.to_local(obstacle.position);
            if local.x < 0.0 {
                continue;
            }

            let expanded = obstacle.radius + own_radius;
            if local.y.abs() >= expanded {
                continue;
            }

            let Some(distance) = forward_ray_circle(local, expanded).and_then(nearest_positive) else {
                continue;
            };

            if closest.is_none_or(|(best, _, _)| distance < best) {
                closest = Some((distance, local, obstacle.radius));
            }
        }

        let (_, local, radius) = closest?;

        let multiplier = tuning.avoidance_multiplier + (box_length - local.x) / box_length;
        let lateral = (radius - local.y) * multiplier;
        let braking = (radius - local.x) * tuning.braking_weight;

        Some(frame.vector_to_world(Vec2::new(braking, lateral)))
    }

    /// Combine every enabled behavior into one force.
    ///
    /// Obstacle avoidance, when it fires, replaces everything else. The
    /// remaining behaviors are averaged over those that contributed.
    pub fn calculate<R: RandomSource + ?Sized>(
        &self,
        behaviors: Behaviors,
        tuning: &SteeringTuning,
        wander: &mut WanderState,
        inputs: &SteeringInputs<'_>,
        rng: &mut R,
    ) -> Vec2 {
        let mut total = Vec2::ZERO;
        let mut contributors = 0u32;

        for behavior in behaviors.iter() {
            let force = match behavior {
                Behavior::ObstacleAvoidance => {
                    if let Some(force) = self.obstacle_avoidance(inputs.obstacles, tuning) {
                        return force;
                    }
                    continue;
                }
                Behavior::Seek => self.seek(inputs.target),
                Behavior::Flee => self.flee(inputs.target),
                Behavior::Arrive => self.arrive(inputs.target, tuning.arrive_deceleration),
                Behavior::Pursuit => match &inputs.moving_target {
                    Some(evader) => self.pursuit(
                        evader,
                        tuning.pursuit_heading_tolerance,
                        tuning.turnaround_coefficient,
                    ),
                    None => continue,
                },
                Behavior::Evade => match &inputs.moving_target {
                    Some(pursuer) => self.evade(pursuer, tuning.turnaround_coefficient),
                    None => continue,
                },
                Behavior::Wander => self.wander(wander, tuning, rng),
            };

            total += force;
            contributors += 1;
        }

        if contributors == 0 {
            Vec2::ZERO
        } else {
            total / contributors as f32
        }
    }
}
