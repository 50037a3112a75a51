//! Simulation world wrapper around hecs
//!
//! Owns the fixed roster of vehicles, obstacles and walls, the id allocator,
//! the world bounds and the random source, and steps every vehicle once per
//! tick.

use glam::Vec2;
use hecs::Entity;
use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;

use crate::ai::{Behavior, MovingTarget, SteeringCalculator, SteeringInputs, Vehicle, VehicleDesc};
use crate::core::{SimConfig, SimRng, seeded};
use crate::ecs::{EntityId, EntityKind, IdAllocator, Kinematics, Name, Obstacle, Spatial, Wall};
use crate::math::{Bounds, Plane2};

/// Neighbor list returned by proximity queries
pub type Neighbors = SmallVec<[Neighbor; 8]>;

/// An entity found by a proximity query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: EntityId,
    pub position: Vec2,
    pub radius: f32,
}

impl Neighbor {
    fn from_spatial(spatial: &Spatial) -> Self {
        Self {
            id: spatial.id(),
            position: spatial.position(),
            radius: spatial.bounding_radius(),
        }
    }
}

/// Read-only vehicle state handed to presentation layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VehicleView {
    pub id: EntityId,
    pub position: Vec2,
    pub forward: Vec2,
    pub velocity: Vec2,
    pub bounding_radius: f32,
    pub steering_force: Vec2,
}

/// Whether a candidate disc touches a query disc around `origin`
fn within_disc(origin: Vec2, radius: f32, candidate: &Spatial) -> bool {
    let range = radius + candidate.bounding_radius();
    (candidate.position() - origin).length_squared() < range * range
}

/// Simulation world containing all entities and components
pub struct World {
    /// The underlying hecs world
    pub inner: hecs::World,
    ids: IdAllocator,
    index: FxHashMap<EntityId, Entity>,
    bounds: Bounds,
    rng: SimRng,
    config: SimConfig,
    ticks: u64,
}

impl World {
    /// Create an empty world
    pub fn new(config: &SimConfig) -> Self {
        Self {
            inner: hecs::World::new(),
            ids: IdAllocator::new(),
            index: FxHashMap::default(),
            bounds: config.bounds,
            rng: seeded(config.seed),
            config: config.clone(),
            ticks: 0,
        }
    }

    /// World rectangle
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Number of completed ticks
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Spawn a vehicle with the configured default tuning
    pub fn spawn_vehicle(&mut self, desc: &VehicleDesc) -> Entity {
        let id = self.ids.next_id();
        let spatial = Spatial::new(id, EntityKind::Vehicle, desc.position, desc.scale);
        let body = Kinematics::new(
            desc.velocity,
            desc.forward(),
            desc.mass,
            desc.max_speed,
            desc.max_force,
            desc.max_turn_rate_deg,
        );

        let entity = self.inner.spawn((spatial, body, Vehicle::new(self.config.tuning)));
        self.index.insert(id, entity);
        log::debug!("Spawned vehicle {id} at {}", desc.position);
        entity
    }

    /// Spawn a disc obstacle
    pub fn spawn_obstacle(&mut self, center: Vec2, radius: f32) -> Entity {
        let id = self.ids.next_id();
        let spatial = Spatial::new(id, EntityKind::Obstacle, center, radius);

        let entity = self.inner.spawn((spatial, Obstacle));
        self.index.insert(id, entity);
        log::debug!("Spawned obstacle {id} at {center} (r = {radius})");
        entity
    }

    /// Spawn a wall of drawn `length` on the plane `dot(normal, p) == signed_distance`
    pub fn spawn_wall(&mut self, length: f32, normal: Vec2, signed_distance: f32) -> Entity {
        let id = self.ids.next_id();
        let wall = Wall::new(Plane2::new(normal, signed_distance), length);
        let spatial = Spatial::new(id, EntityKind::Wall, wall.center(), 0.0);

        let entity = self.inner.spawn((spatial, wall));
        self.index.insert(id, entity);
        log::debug!("Spawned wall {id} with normal {normal}");
        entity
    }

    /// Attach a debug name
    pub fn set_name(&mut self, entity: Entity, name: impl Into<String>) -> Result<(), hecs::NoSuchEntity> {
        self.inner.insert_one(entity, Name::new(name))
    }

    /// Look up an entity handle by simulation id
    pub fn entity(&self, id: EntityId) -> Option<Entity> {
        self.index.get(&id).copied()
    }

    /// Simulation id of an entity
    pub fn id_of(&self, entity: Entity) -> Option<EntityId> {
        self.inner.get::<&Spatial>(entity).ok().map(|spatial| spatial.id())
    }

    /// Get a reference to a component
    pub fn get<T: hecs::Component>(
        &self,
        entity: Entity,
    ) -> Result<hecs::Ref<'_, T>, hecs::ComponentError> {
        self.inner.get::<&T>(entity)
    }

    /// Get a mutable reference to a component
    pub fn get_mut<T: hecs::Component>(
        &mut self,
        entity: Entity,
    ) -> Result<hecs::RefMut<'_, T>, hecs::ComponentError> {
        self.inner.get::<&mut T>(entity)
    }

    /// Steering configuration of a vehicle
    pub fn vehicle_mut(&mut self, entity: Entity) -> Result<hecs::RefMut<'_, Vehicle>, hecs::ComponentError> {
        self.get_mut::<Vehicle>(entity)
    }

    /// Check if an entity exists
    pub fn contains(&self, entity: Entity) -> bool {
        self.inner.contains(entity)
    }

    /// Get the number of entities
    pub fn len(&self) -> u32 {
        self.inner.len()
    }

    /// Check if the world is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Handles of every vehicle in spawn order
    pub fn vehicles(&self) -> Vec<Entity> {
        let mut vehicles: Vec<(EntityId, Entity)> = self
            .inner
            .query::<(&Spatial, &Vehicle)>()
            .iter()
            .map(|(entity, (spatial, _))| (spatial.id(), entity))
            .collect();
        vehicles.sort_unstable_by_key(|(id, _)| *id);
        vehicles.into_iter().map(|(_, entity)| entity).collect()
    }

    /// Every obstacle as a neighbor record
    pub fn obstacles(&self) -> Vec<Neighbor> {
        self.inner
            .query::<(&Spatial, &Obstacle)>()
            .iter()
            .map(|(_, (spatial, _))| Neighbor::from_spatial(spatial))
            .collect()
    }

    /// Every wall
    pub fn walls(&self) -> Vec<Wall> {
        self.inner.query::<&Wall>().iter().map(|(_, wall)| *wall).collect()
    }

    /// Tag every `M` entity whose disc touches the disc of `radius` around
    /// `agent`, clearing stale tags first.
    ///
    /// Tags stay valid only until the next tagging call. Returns the number
    /// of entities tagged; an unknown agent tags nothing.
    pub fn tag_within_disc<M: hecs::Component>(&mut self, agent: Entity, radius: f32) -> usize {
        let origin = self.inner.get::<&Spatial>(agent).ok().map(|spatial| spatial.position());
        let mut tagged = 0;

        for (entity, (spatial, _)) in self.inner.query_mut::<(&mut Spatial, &M)>() {
            spatial.untag();
            let Some(origin) = origin else {
                continue;
            };
            if entity != agent && within_disc(origin, radius, spatial) {
                spatial.tag();
                tagged += 1;
            }
        }

        tagged
    }

    /// Tag obstacles near `agent`
    pub fn tag_obstacles_within(&mut self, agent: Entity, radius: f32) -> usize {
        self.tag_within_disc::<Obstacle>(agent, radius)
    }

    /// Obstacles left tagged by the most recent tagging query
    pub fn tagged_obstacles(&self) -> Neighbors {
        self.inner
            .query::<(&Spatial, &Obstacle)>()
            .iter()
            .filter(|(_, (spatial, _))| spatial.is_tagged())
            .map(|(_, (spatial, _))| Neighbor::from_spatial(spatial))
            .collect()
    }

    /// Same predicate as [`tag_within_disc`](Self::tag_within_disc), returned
    /// as a list instead of written to shared tags
    pub fn neighbors_within<M: hecs::Component>(&self, agent: Entity, radius: f32) -> Neighbors {
        let Ok(origin) = self.inner.get::<&Spatial>(agent).map(|spatial| spatial.position()) else {
            return Neighbors::new();
        };

        self.inner
            .query::<(&Spatial, &M)>()
            .iter()
            .filter(|(entity, (spatial, _))| *entity != agent && within_disc(origin, radius, spatial))
            .map(|(_, (spatial, _))| Neighbor::from_spatial(spatial))
            .collect()
    }

    /// Snapshot a vehicle for use as a pursuit/evade target
    pub fn moving_target(&self, entity: Entity) -> Option<MovingTarget> {
        let spatial = self.inner.get::<&Spatial>(entity).ok()?;
        let body = self.inner.get::<&Kinematics>(entity).ok()?;
        Some(MovingTarget::capture(&spatial, &body))
    }

    /// Presentation snapshot of every vehicle, in spawn order
    pub fn vehicle_views(&self) -> Vec<VehicleView> {
        let mut views: Vec<VehicleView> = self
            .inner
            .query::<(&Spatial, &Kinematics, &Vehicle)>()
            .iter()
            .map(|(_, (spatial, body, vehicle))| VehicleView {
                id: spatial.id(),
                position: spatial.position(),
                forward: body.forward(),
                velocity: body.velocity(),
                bounding_radius: spatial.bounding_radius(),
                steering_force: vehicle.last_force(),
            })
            .collect();
        views.sort_unstable_by_key(|view| view.id);
        views
    }

    /// Advance every vehicle by `dt` seconds.
    ///
    /// Vehicles update one after another in spawn order, so later vehicles
    /// see the already-updated state of earlier ones. Returns how many
    /// vehicles were updated.
    pub fn step(&mut self, dt: f32) -> usize {
        let mut updated = 0;
        for agent in self.vehicles() {
            match self.update_vehicle(agent, dt) {
                Ok(()) => updated += 1,
                Err(err) => log::warn!("Skipping vehicle {agent:?}: {err}"),
            }
        }

        self.ticks += 1;
        log::trace!("Completed tick {} ({updated} vehicles)", self.ticks);
        updated
    }

    fn update_vehicle(&mut self, agent: Entity, dt: f32) -> Result<(), hecs::ComponentError> {
        let (behaviors, moving_entity, min_detection_length) = {
            let vehicle = self.inner.get::<&Vehicle>(agent)?;
            (vehicle.behaviors(), vehicle.moving_target(), vehicle.tuning().min_detection_length)
        };

        let obstacles = if behaviors.contains(Behavior::ObstacleAvoidance) {
            let spatial = self.inner.get::<&Spatial>(agent)?;
            let body = self.inner.get::<&Kinematics>(agent)?;
            let length = SteeringCalculator::new(&spatial, &body).detection_length(min_detection_length);
            drop((spatial, body));
            self.neighbors_within::<Obstacle>(agent, length)
        } else {
            Neighbors::new()
        };

        let moving_target = moving_entity.and_then(|entity| {
            let snapshot = self.moving_target(entity);
            if snapshot.is_none() {
                log::warn!("Moving target {entity:?} of vehicle {agent:?} no longer resolves");
            }
            snapshot
        });

        let mut spatial = self.inner.get::<&mut Spatial>(agent)?;
        let mut body = self.inner.get::<&mut Kinematics>(agent)?;
        let mut vehicle = self.inner.get::<&mut Vehicle>(agent)?;

        let inputs = SteeringInputs {
            target: vehicle.target(),
            moving_target,
            obstacles: &obstacles,
        };
        let mut force = vehicle.steering_force(&SteeringCalculator::new(&spatial, &body), &inputs, &mut self.rng);

        if self.config.clamp_steering_force {
            force = force.clamp_length_max(body.max_force());
            vehicle.record_force(force);
        }

        log::trace!("Vehicle {} steering force {force}", spatial.id());
        body.integrate(&mut spatial, force, dt, &self.bounds);
        Ok(())
    }
}
