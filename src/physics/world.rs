//! Physics domain: the world contract and its avian2d-backed implementation.
//!
//! Everything crossing this boundary is in level space: physics units with
//! +y pointing down, the convention level data is authored in. avian runs
//! y-up, so the adapter flips the vertical axis on the way in and out.

use avian2d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::math::bounding::{Aabb2d, BoundingVolume};
use bevy::prelude::*;

use crate::physics::{CollisionQuery, CollisionTag, GameLayer, RayHit, RegionHit};
use crate::portals::{PortalHandle, PortalLink};

/// Handle to a body living in the current physics world.
///
/// Handles go stale when the world is destroyed; operations on a stale
/// handle fail with [`PhysicsError::MissingBody`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(Entity);

impl BodyHandle {
    pub fn new(entity: Entity) -> Self {
        Self(entity)
    }

    pub fn entity(self) -> Entity {
        self.0
    }
}

/// Error type for physics world operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsError {
    /// An operation needing a live world ran while none exists.
    InvalidWorldState,
    /// The handle doesn't refer to a body in the current world.
    MissingBody(BodyHandle),
}

impl std::fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhysicsError::InvalidWorldState => write!(f, "no physics world is active"),
            PhysicsError::MissingBody(body) => {
                write!(f, "body {:?} is not part of the active world", body.entity())
            }
        }
    }
}

impl std::error::Error for PhysicsError {}

/// Parameters for a dynamic box body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicBodyDesc {
    pub position: Vec2,
    pub half_extents: Vec2,
    pub fixed_rotation: bool,
    pub allow_sleep: bool,
    pub density: f32,
    pub friction: f32,
}

/// Lifetime bookkeeping for the physics world of the loaded level.
#[derive(Resource, Debug, Default)]
pub struct WorldState {
    active: bool,
    generation: u32,
}

impl WorldState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Incremented every time a world is created.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Marker for every body owned by the current world.
#[derive(Component, Debug)]
pub struct WorldBody;

/// Body creation, kinematics and world lifetime.
pub trait PhysicsWorld: CollisionQuery {
    fn is_active(&self) -> bool;

    /// Start a fresh world. Any previous world must have been destroyed.
    fn create_world(&mut self);

    /// Release every body. All outstanding handles become stale.
    fn destroy_world(&mut self);

    fn create_dynamic_body(&mut self, desc: &DynamicBodyDesc) -> Result<BodyHandle, PhysicsError>;

    /// Release a single body. The handle becomes stale. Fails with
    /// `InvalidWorldState` when no world is active.
    fn destroy_body(&mut self, body: BodyHandle) -> Result<(), PhysicsError>;

    fn create_static_solid(
        &mut self,
        position: Vec2,
        half_extents: Vec2,
        friction: f32,
    ) -> Result<BodyHandle, PhysicsError>;

    /// Non-colliding box reported by region queries.
    fn create_static_sensor(
        &mut self,
        position: Vec2,
        half_extents: Vec2,
        tag: CollisionTag,
        portal: Option<PortalHandle>,
    ) -> Result<BodyHandle, PhysicsError>;

    fn position(&self, body: BodyHandle) -> Result<Vec2, PhysicsError>;

    fn velocity(&self, body: BodyHandle) -> Result<Vec2, PhysicsError>;

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) -> Result<(), PhysicsError>;

    /// Move the body directly. Must not be called while the solver is stepping.
    fn set_transform(
        &mut self,
        body: BodyHandle,
        position: Vec2,
        rotation: f32,
    ) -> Result<(), PhysicsError>;
}

/// Level space (y-down) to avian space (y-up).
fn to_physics(v: Vec2) -> Vec2 {
    Vec2::new(v.x, -v.y)
}

/// Avian space (y-up) to level space (y-down).
fn to_level(v: Vec2) -> Vec2 {
    Vec2::new(v.x, -v.y)
}

fn physics_transform(position: Vec2, rotation: f32) -> Transform {
    Transform::from_translation(to_physics(position).extend(0.0))
        .with_rotation(Quat::from_rotation_z(-rotation))
}

/// [`PhysicsWorld`] over the avian2d world living in the ECS.
///
/// Creation and teleports go through `Commands`, so they land when the
/// calling system's commands are applied, outside the solver step. Bodies
/// created this way are not queryable until then.
#[derive(SystemParam)]
pub struct AvianWorld<'w, 's> {
    commands: Commands<'w, 's>,
    state: ResMut<'w, WorldState>,
    spatial: SpatialQuery<'w, 's>,
    bodies: Query<'w, 's, (&'static Position, &'static mut LinearVelocity), With<WorldBody>>,
    tags: Query<'w, 's, &'static CollisionTag>,
    sensors: Query<
        'w,
        's,
        (Option<&'static CollisionTag>, Option<&'static PortalLink>),
        (With<Sensor>, With<WorldBody>),
    >,
    owned: Query<'w, 's, Entity, With<WorldBody>>,
}

impl AvianWorld<'_, '_> {
    fn ensure_active(&self) -> Result<(), PhysicsError> {
        if self.state.is_active() {
            Ok(())
        } else {
            Err(PhysicsError::InvalidWorldState)
        }
    }

    fn spawn_body(&mut self, position: Vec2, bundle: impl Bundle) -> BodyHandle {
        let transform = physics_transform(position, 0.0);
        let entity = self
            .commands
            .spawn((
                WorldBody,
                Position(to_physics(position)),
                Rotation::default(),
                transform,
                GlobalTransform::from(transform),
                bundle,
            ))
            .id();
        BodyHandle::new(entity)
    }

    /// Apply components to a body that may have been spawned this tick.
    fn write_deferred(&mut self, body: BodyHandle, bundle: impl Bundle) -> Result<(), PhysicsError> {
        match self.commands.get_entity(body.entity()) {
            Ok(mut entity) => {
                entity.try_insert(bundle);
                Ok(())
            }
            Err(_) => Err(PhysicsError::MissingBody(body)),
        }
    }
}

impl CollisionQuery for AvianWorld<'_, '_> {
    fn cast_ray(&self, source: Vec2, target: Vec2) -> Option<RayHit> {
        let origin = to_physics(source);
        let delta = to_physics(target) - origin;
        let length = delta.length();
        let direction = Dir2::new(delta).ok()?;

        // Sensors and the player's own body are not part of the mask
        let filter = SpatialQueryFilter::from_mask([GameLayer::Default, GameLayer::Solid]);
        let hit = self
            .spatial
            .cast_ray(origin, direction, length, true, &filter)?;

        Some(RayHit {
            body: BodyHandle::new(hit.entity),
            tag: self.tags.get(hit.entity).ok().copied(),
            point: to_level(origin + *direction * hit.distance),
            normal: to_level(hit.normal),
            fraction: hit.distance / length,
        })
    }

    fn query_region_matching(
        &self,
        region: Aabb2d,
        accept: &dyn Fn(&RegionHit) -> bool,
    ) -> Option<RegionHit> {
        let aabb = ColliderAabb::new(to_physics(region.center()), region.half_size());

        self.spatial
            .aabb_intersections_with_aabb(aabb)
            .into_iter()
            .filter_map(|entity| {
                let (tag, link) = self.sensors.get(entity).ok()?;
                Some(RegionHit {
                    body: BodyHandle::new(entity),
                    tag: tag.copied(),
                    portal: link.map(|link| link.handle()),
                })
            })
            .find(|hit| accept(hit))
    }
}

impl PhysicsWorld for AvianWorld<'_, '_> {
    fn is_active(&self) -> bool {
        self.state.is_active()
    }

    fn create_world(&mut self) {
        if self.state.active {
            warn!("[PHYSICS] Creating a world while one is active, destroying the old one");
            self.destroy_world();
        }
        self.state.active = true;
        self.state.generation = self.state.generation.wrapping_add(1);
        debug!("[PHYSICS] World {} created", self.state.generation());
    }

    fn destroy_world(&mut self) {
        let mut released = 0;
        for entity in &self.owned {
            self.commands.entity(entity).despawn();
            released += 1;
        }
        self.state.active = false;
        debug!(
            "[PHYSICS] World {} destroyed, released {} bodies",
            self.state.generation(),
            released
        );
    }

    fn create_dynamic_body(&mut self, desc: &DynamicBodyDesc) -> Result<BodyHandle, PhysicsError> {
        self.ensure_active()?;

        let body = self.spawn_body(
            desc.position,
            (
                Name::new("Player body"),
                RigidBody::Dynamic,
                Collider::rectangle(desc.half_extents.x * 2.0, desc.half_extents.y * 2.0),
                ColliderDensity(desc.density),
                Friction::new(desc.friction),
                LinearVelocity::ZERO,
                CollisionLayers::new(GameLayer::Player, [GameLayer::Default, GameLayer::Solid]),
            ),
        );

        let mut entity = self.commands.entity(body.entity());
        if desc.fixed_rotation {
            entity.insert(LockedAxes::ROTATION_LOCKED);
        }
        if !desc.allow_sleep {
            entity.insert(SleepingDisabled);
        }

        Ok(body)
    }

    fn destroy_body(&mut self, body: BodyHandle) -> Result<(), PhysicsError> {
        self.ensure_active()?;
        match self.commands.get_entity(body.entity()) {
            Ok(mut entity) => {
                entity.despawn();
                Ok(())
            }
            Err(_) => Err(PhysicsError::MissingBody(body)),
        }
    }

    fn create_static_solid(
        &mut self,
        position: Vec2,
        half_extents: Vec2,
        friction: f32,
    ) -> Result<BodyHandle, PhysicsError> {
        self.ensure_active()?;

        Ok(self.spawn_body(
            position,
            (
                Name::new("Solid block"),
                CollisionTag::SolidBlock,
                RigidBody::Static,
                Collider::rectangle(half_extents.x * 2.0, half_extents.y * 2.0),
                Friction::new(friction),
                CollisionLayers::new(GameLayer::Solid, [GameLayer::Player]),
            ),
        ))
    }

    fn create_static_sensor(
        &mut self,
        position: Vec2,
        half_extents: Vec2,
        tag: CollisionTag,
        portal: Option<PortalHandle>,
    ) -> Result<BodyHandle, PhysicsError> {
        self.ensure_active()?;

        let body = self.spawn_body(
            position,
            (
                Name::new("Sensor"),
                tag,
                RigidBody::Static,
                Collider::rectangle(half_extents.x * 2.0, half_extents.y * 2.0),
                Sensor,
                CollisionLayers::new(GameLayer::Portal, [GameLayer::Player]),
            ),
        );
        if let Some(portal) = portal {
            self.commands
                .entity(body.entity())
                .insert(PortalLink::new(portal));
        }

        Ok(body)
    }

    fn position(&self, body: BodyHandle) -> Result<Vec2, PhysicsError> {
        self.bodies
            .get(body.entity())
            .map(|(position, _)| to_level(position.0))
            .map_err(|_| PhysicsError::MissingBody(body))
    }

    fn velocity(&self, body: BodyHandle) -> Result<Vec2, PhysicsError> {
        self.bodies
            .get(body.entity())
            .map(|(_, velocity)| to_level(velocity.0))
            .map_err(|_| PhysicsError::MissingBody(body))
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) -> Result<(), PhysicsError> {
        if let Ok((_, mut current)) = self.bodies.get_mut(body.entity()) {
            current.0 = to_physics(velocity);
            return Ok(());
        }
        self.write_deferred(body, LinearVelocity(to_physics(velocity)))
    }

    fn set_transform(
        &mut self,
        body: BodyHandle,
        position: Vec2,
        rotation: f32,
    ) -> Result<(), PhysicsError> {
        let transform = physics_transform(position, rotation);
        self.write_deferred(
            body,
            (
                Position(to_physics(position)),
                Rotation::radians(-rotation),
                transform,
                GlobalTransform::from(transform),
            ),
        )
    }
}
