//! Enabled-behavior flag set

use serde::{Deserialize, Serialize};

/// A single steering behavior that can be toggled on a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Behavior {
    ObstacleAvoidance,
    Evade,
    Flee,
    Seek,
    Arrive,
    Pursuit,
    Wander,
}

impl Behavior {
    /// Every behavior in the order the combinator evaluates them.
    ///
    /// Obstacle avoidance comes first so it can override the rest.
    pub const PRIORITY: [Behavior; 7] = [
        Behavior::ObstacleAvoidance,
        Behavior::Evade,
        Behavior::Flee,
        Behavior::Seek,
        Behavior::Arrive,
        Behavior::Pursuit,
        Behavior::Wander,
    ];

    const fn bit(self) -> u16 {
        1 << self as u16
    }

    /// Behavior name for debugging and logging
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Behavior::ObstacleAvoidance => "ObstacleAvoidance",
            Behavior::Evade => "Evade",
            Behavior::Flee => "Flee",
            Behavior::Seek => "Seek",
            Behavior::Arrive => "Arrive",
            Behavior::Pursuit => "Pursuit",
            Behavior::Wander => "Wander",
        }
    }
}

/// Set of independently enabled behaviors, stored as a bitmask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Behaviors(u16);

impl Behaviors {
    /// No behavior enabled
    pub const NONE: Self = Self(0);

    #[must_use]
    pub const fn new() -> Self {
        Self::NONE
    }

    #[must_use]
    pub const fn contains(self, behavior: Behavior) -> bool {
        self.0 & behavior.bit() != 0
    }

    pub fn insert(&mut self, behavior: Behavior) {
        self.0 |= behavior.bit();
    }

    pub fn remove(&mut self, behavior: Behavior) {
        self.0 &= !behavior.bit();
    }

    /// Return a copy with `behavior` enabled
    #[must_use]
    pub const fn with(self, behavior: Behavior) -> Self {
        Self(self.0 | behavior.bit())
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Enabled behaviors in priority order
    pub fn iter(self) -> impl Iterator<Item = Behavior> {
        Behavior::PRIORITY
            .into_iter()
            .filter(move |behavior| self.contains(*behavior))
    }
}

impl FromIterator<Behavior> for Behaviors {
    fn from_iter<I: IntoIterator<Item = Behavior>>(iter: I) -> Self {
        let mut set = Self::NONE;
        for behavior in iter {
            set.insert(behavior);
        }
        set
    }
}
