//! Scenario rosters
//!
//! A scene lists every vehicle, obstacle and wall the simulation starts
//! with. Saved and loaded in RON (Rusty Object Notation) or JSON.

use std::fs;
use std::path::Path;

use glam::Vec2;
use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::ai::VehicleDesc;
use crate::ecs::World;
use crate::math;

/// A behavior enabled on a vehicle at startup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BehaviorSpec {
    Seek { target: Vec2 },
    Flee { target: Vec2 },
    Arrive { target: Vec2, deceleration: f32 },
    /// Chase the vehicle at roster index `evader`
    Pursuit {
        evader: usize,
        heading_tolerance: f32,
        turnaround_coefficient: f32,
    },
    /// Run from the vehicle at roster index `pursuer`
    Evade {
        pursuer: usize,
        turnaround_coefficient: f32,
    },
    Wander { radius: f32, distance: f32, jitter: f32 },
    AvoidObstacles {
        min_detection_length: f32,
        avoidance_multiplier: f32,
        braking_weight: f32,
    },
}

/// A vehicle in the roster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleSpawn {
    /// Optional debug name
    #[serde(default)]
    pub name: Option<String>,
    /// Physical parameters
    #[serde(default)]
    pub body: VehicleDesc,
    /// Behaviors enabled at startup
    #[serde(default)]
    pub behaviors: Vec<BehaviorSpec>,
}

/// A disc obstacle in the roster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpawn {
    pub center: Vec2,
    pub radius: f32,
}

/// A wall in the roster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSpawn {
    pub length: f32,
    /// Unit normal of the wall's plane
    pub normal: Vec2,
    pub signed_distance: f32,
}

/// A serializable startup roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene name
    pub name: String,
    /// Scene version for compatibility
    pub version: u32,
    #[serde(default)]
    pub vehicles: Vec<VehicleSpawn>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleSpawn>,
    #[serde(default)]
    pub walls: Vec<WallSpawn>,
}

impl Scene {
    /// Create a new empty scene
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: 1,
            vehicles: Vec::new(),
            obstacles: Vec::new(),
            walls: Vec::new(),
        }
    }

    /// Small chase scene used by the headless binary
    #[must_use]
    pub fn demo() -> Self {
        let mut scene = Self::new("Chase");

        let runner = scene.add_vehicle(VehicleSpawn {
            name: Some("runner".into()),
            body: VehicleDesc::at(Vec2::new(-20.0, 0.0)).with_max_speed(8.0),
            behaviors: vec![
                BehaviorSpec::Wander {
                    radius: 1.2,
                    distance: 2.0,
                    jitter: 0.3,
                },
                BehaviorSpec::AvoidObstacles {
                    min_detection_length: 4.0,
                    avoidance_multiplier: 1.0,
                    braking_weight: 0.2,
                },
            ],
        });
        let chaser = scene.add_vehicle(VehicleSpawn {
            name: Some("chaser".into()),
            body: VehicleDesc::at(Vec2::new(20.0, 10.0)).with_rotation(180.0),
            behaviors: vec![
                BehaviorSpec::Pursuit {
                    evader: runner,
                    heading_tolerance: 0.97,
                    turnaround_coefficient: 0.25,
                },
                BehaviorSpec::AvoidObstacles {
                    min_detection_length: 4.0,
                    avoidance_multiplier: 1.0,
                    braking_weight: 0.2,
                },
            ],
        });
        scene.vehicles[runner].behaviors.push(BehaviorSpec::Evade {
            pursuer: chaser,
            turnaround_coefficient: 0.25,
        });
        scene.add_vehicle(VehicleSpawn {
            name: Some("homer".into()),
            body: VehicleDesc::at(Vec2::new(0.0, -25.0)),
            behaviors: vec![BehaviorSpec::Arrive {
                target: Vec2::ZERO,
                deceleration: 1.0,
            }],
        });

        for center in [Vec2::new(-5.0, 5.0), Vec2::new(8.0, -4.0), Vec2::new(0.0, 18.0)] {
            scene.obstacles.push(ObstacleSpawn { center, radius: 2.5 });
        }
        scene.walls.push(WallSpawn {
            length: 60.0,
            normal: Vec2::Y,
            signed_distance: -40.0,
        });

        scene
    }

    /// Add a vehicle, returning its roster index
    pub fn add_vehicle(&mut self, vehicle: VehicleSpawn) -> usize {
        let index = self.vehicles.len();
        self.vehicles.push(vehicle);
        index
    }

    /// Get the number of roster entries
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.vehicles.len() + self.obstacles.len() + self.walls.len()
    }

    /// Check if the scene is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entity_count() == 0
    }

    /// Check the roster before anything is spawned
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Invalid`] for a non-positive mass or a wall
    /// normal that is not unit length, and [`SceneError::InvalidReference`]
    /// for a dangling or self-referencing vehicle index
    pub fn validate(&self) -> Result<(), SceneError> {
        for (index, vehicle) in self.vehicles.iter().enumerate() {
            if !(vehicle.body.mass > 0.0) {
                return Err(SceneError::Invalid(format!(
                    "vehicle {index} has non-positive mass {}",
                    vehicle.body.mass
                )));
            }
            for behavior in &vehicle.behaviors {
                let other = match *behavior {
                    BehaviorSpec::Pursuit { evader, .. } => evader,
                    BehaviorSpec::Evade { pursuer, .. } => pursuer,
                    _ => continue,
                };
                if other >= self.vehicles.len() || other == index {
                    return Err(SceneError::InvalidReference(format!(
                        "vehicle {index} refers to vehicle {other} of {}",
                        self.vehicles.len()
                    )));
                }
            }
        }

        for (index, wall) in self.walls.iter().enumerate() {
            if !math::is_unit(wall.normal) {
                return Err(SceneError::Invalid(format!(
                    "wall {index} normal {} is not unit length",
                    wall.normal
                )));
            }
        }
        Ok(())
    }

    /// Spawn the whole roster into `world`
    ///
    /// Vehicles are spawned first so their ids follow roster order.
    /// Returns the vehicle handles in roster order.
    ///
    /// # Errors
    ///
    /// Returns an error if [`validate`](Self::validate) rejects the roster;
    /// nothing is spawned in that case
    pub fn spawn_into(&self, world: &mut World) -> Result<Vec<Entity>, SceneError> {
        self.validate()?;

        let vehicles: Vec<Entity> = self
            .vehicles
            .iter()
            .map(|spawn| world.spawn_vehicle(&spawn.body))
            .collect();

        for (spawn, &entity) in self.vehicles.iter().zip(&vehicles) {
            if let Some(name) = &spawn.name {
                world
                    .set_name(entity, name.clone())
                    .map_err(|e| SceneError::InvalidReference(e.to_string()))?;
            }

            let mut vehicle = world
                .vehicle_mut(entity)
                .map_err(|e| SceneError::InvalidReference(e.to_string()))?;
            for behavior in &spawn.behaviors {
                match *behavior {
                    BehaviorSpec::Seek { target } => vehicle.seek_target(target),
                    BehaviorSpec::Flee { target } => vehicle.flee_target(target),
                    BehaviorSpec::Arrive { target, deceleration } => vehicle.arrive_at(target, deceleration),
                    BehaviorSpec::Pursuit {
                        evader,
                        heading_tolerance,
                        turnaround_coefficient,
                    } => vehicle.pursuit_on(vehicles[evader], heading_tolerance, turnaround_coefficient),
                    BehaviorSpec::Evade {
                        pursuer,
                        turnaround_coefficient,
                    } => vehicle.evade_from(vehicles[pursuer], turnaround_coefficient),
                    BehaviorSpec::Wander { radius, distance, jitter } => {
                        vehicle.wander_around(radius, distance, jitter);
                    }
                    BehaviorSpec::AvoidObstacles {
                        min_detection_length,
                        avoidance_multiplier,
                        braking_weight,
                    } => vehicle.avoid_obstacles(min_detection_length, avoidance_multiplier, braking_weight),
                }
            }
        }

        for obstacle in &self.obstacles {
            world.spawn_obstacle(obstacle.center, obstacle.radius);
        }
        for wall in &self.walls {
            world.spawn_wall(wall.length, wall.normal, wall.signed_distance);
        }

        log::info!(
            "Spawned scene '{}': {} vehicles, {} obstacles, {} walls",
            self.name,
            self.vehicles.len(),
            self.obstacles.len(),
            self.walls.len()
        );
        Ok(vehicles)
    }

    /// Save the scene to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SceneError::Serialize(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| SceneError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load a scene from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let content = fs::read_to_string(path).map_err(|e| SceneError::Io(e.to_string()))?;
        ron::from_str(&content).map_err(|e| SceneError::Deserialize(e.to_string()))
    }

    /// Save the scene to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let json_string =
            serde_json::to_string_pretty(self).map_err(|e| SceneError::Serialize(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| SceneError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load a scene from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let content = fs::read_to_string(path).map_err(|e| SceneError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| SceneError::Deserialize(e.to_string()))
    }

    /// Load by extension: `.json` as JSON, anything else as RON
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            Self::load_json(path)
        } else {
            Self::load_ron(path)
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Errors that can occur during scene operations
#[derive(Debug, Clone)]
pub enum SceneError {
    /// IO error
    Io(String),
    /// Serialization error
    Serialize(String),
    /// Deserialization error
    Deserialize(String),
    /// A behavior refers to a vehicle that is not in the roster
    InvalidReference(String),
    /// A roster entry the simulation cannot spawn
    Invalid(String),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Serialize(e) => write!(f, "Serialization error: {e}"),
            Self::Deserialize(e) => write!(f, "Deserialization error: {e}"),
            Self::InvalidReference(e) => write!(f, "Invalid roster reference: {e}"),
            Self::Invalid(e) => write!(f, "Invalid roster entry: {e}"),
        }
    }
}

impl std::error::Error for SceneError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Behavior;
    use crate::core::SimConfig;
    use crate::ecs::Name;

    #[test]
    fn test_scene_serialization_ron() {
        let scene = Scene::demo();

        let ron_str = ron::ser::to_string_pretty(&scene, ron::ser::PrettyConfig::default()).unwrap();
        assert!(ron_str.contains("chaser"));

        let loaded: Scene = ron::from_str(&ron_str).unwrap();
        assert_eq!(loaded, scene);
    }

    #[test]
    fn test_scene_serialization_json() {
        let scene = Scene::demo();

        let json_str = serde_json::to_string(&scene).unwrap();

        let loaded: Scene = serde_json::from_str(&json_str).unwrap();
        assert_eq!(loaded.name, "Chase");
        assert_eq!(loaded.vehicles.len(), 3);
        assert_eq!(loaded.vehicles[1].behaviors, scene.vehicles[1].behaviors);
    }

    #[test]
    fn test_minimal_ron_uses_defaults() {
        let scene: Scene = ron::from_str(
            "(name: \"Tiny\", version: 1, vehicles: [(behaviors: [Seek(target: (3.0, 4.0))])])",
        )
        .unwrap();

        assert_eq!(scene.vehicles[0].body, VehicleDesc::default());
        assert!(scene.obstacles.is_empty());
    }

    #[test]
    fn test_spawn_into_resolves_roster_indices() {
        let scene = Scene::demo();
        let mut world = World::new(&SimConfig::default());

        let vehicles = scene.spawn_into(&mut world).unwrap();

        assert_eq!(vehicles.len(), 3);
        assert_eq!(world.len() as usize, scene.entity_count());
        assert_eq!(world.obstacles().len(), 3);
        assert_eq!(world.walls().len(), 1);

        let chaser = world.get::<crate::ai::Vehicle>(vehicles[1]).unwrap();
        assert!(chaser.is_on(Behavior::Pursuit));
        assert_eq!(chaser.moving_target(), Some(vehicles[0]));
        drop(chaser);

        let runner = world.get::<crate::ai::Vehicle>(vehicles[0]).unwrap();
        assert!(runner.is_on(Behavior::Evade));
        assert_eq!(runner.moving_target(), Some(vehicles[1]));
        drop(runner);

        assert_eq!(world.get::<Name>(vehicles[2]).unwrap().0, "homer");
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let mut scene = Scene::new("Broken");
        scene.add_vehicle(VehicleSpawn {
            behaviors: vec![BehaviorSpec::Evade {
                pursuer: 4,
                turnaround_coefficient: 0.25,
            }],
            ..Default::default()
        });

        let mut world = World::new(&SimConfig::default());
        assert!(matches!(
            scene.spawn_into(&mut world),
            Err(SceneError::InvalidReference(_))
        ));
        assert!(world.is_empty());
    }

    #[test]
    fn test_self_reference_rejected() {
        let mut scene = Scene::new("Loop");
        scene.add_vehicle(VehicleSpawn {
            behaviors: vec![BehaviorSpec::Pursuit {
                evader: 0,
                heading_tolerance: 0.97,
                turnaround_coefficient: 0.25,
            }],
            ..Default::default()
        });

        assert!(scene.validate().is_err());
    }

    #[test]
    fn test_zero_mass_rejected_before_spawning() {
        let scene: Scene = ron::from_str("(name: \"Bad\", version: 1, vehicles: [(name: Some(\"ok\")), (body: (mass: 0.0))])").unwrap();

        let mut world = World::new(&SimConfig::default());
        assert!(matches!(scene.spawn_into(&mut world), Err(SceneError::Invalid(_))));
        assert!(world.is_empty());
    }

    #[test]
    fn test_non_unit_wall_normal_rejected() {
        let scene: Scene = ron::from_str(
            "(name: \"Bad\", version: 1, walls: [(length: 10.0, normal: (0.0, 2.0), signed_distance: 1.0)])",
        )
        .unwrap();

        assert!(matches!(scene.validate(), Err(SceneError::Invalid(_))));

        let mut world = World::new(&SimConfig::default());
        assert!(scene.spawn_into(&mut world).is_err());
        assert!(world.is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Scene::load("/nonexistent/scene.ron"),
            Err(SceneError::Io(_))
        ));
    }
}
