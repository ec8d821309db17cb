//! Physics domain: in-memory box world for exercising world clients in tests.
//!
//! Bodies are axis-aligned boxes in level space. There is no solver: tests
//! place bodies and set velocities by hand, and queries use exact box math.

use bevy::math::bounding::{Aabb2d, IntersectsVolume};
use bevy::prelude::*;

use crate::physics::{
    BodyHandle, CollisionQuery, CollisionTag, DynamicBodyDesc, PhysicsError, PhysicsWorld, RayHit,
    RegionHit,
};
use crate::portals::PortalHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BodyKind {
    Dynamic,
    Solid,
    Sensor,
}

#[derive(Debug, Clone)]
pub(crate) struct TestBody {
    pub kind: BodyKind,
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub half_extents: Vec2,
    pub tag: Option<CollisionTag>,
    pub portal: Option<PortalHandle>,
    pub fixed_rotation: bool,
    pub allow_sleep: bool,
}

impl TestBody {
    fn aabb(&self) -> Aabb2d {
        Aabb2d::new(self.position, self.half_extents)
    }
}

pub(crate) struct BoxWorld {
    /// Only used to mint entity ids for handles.
    ids: World,
    active: bool,
    bodies: Vec<(BodyHandle, TestBody)>,
}

impl BoxWorld {
    /// A world that is already active.
    pub fn new() -> Self {
        Self {
            ids: World::new(),
            active: true,
            bodies: Vec::new(),
        }
    }

    /// A world that hasn't been created yet.
    pub fn inactive() -> Self {
        Self {
            active: false,
            ..Self::new()
        }
    }

    pub fn add_solid(&mut self, center: Vec2, half_extents: Vec2) -> BodyHandle {
        self.create_static_solid(center, half_extents, 0.3)
            .expect("box world is active")
    }

    /// Untagged solid, e.g. decoration with a collider.
    pub fn add_untagged_solid(&mut self, center: Vec2, half_extents: Vec2) -> BodyHandle {
        let body = self.add_solid(center, half_extents);
        self.body_mut(body).tag = None;
        body
    }

    pub fn add_portal(&mut self, center: Vec2, half_extents: Vec2, portal: PortalHandle) -> BodyHandle {
        self.create_static_sensor(center, half_extents, CollisionTag::PortalEntry, Some(portal))
            .expect("box world is active")
    }

    pub fn body(&self, handle: BodyHandle) -> &TestBody {
        self.bodies
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, body)| body)
            .expect("unknown body")
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> &mut TestBody {
        self.bodies
            .iter_mut()
            .find(|(h, _)| *h == handle)
            .map(|(_, body)| body)
            .expect("unknown body")
    }

    pub fn place(&mut self, handle: BodyHandle, position: Vec2) {
        self.body_mut(handle).position = position;
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn insert(&mut self, body: TestBody) -> Result<BodyHandle, PhysicsError> {
        if !self.active {
            return Err(PhysicsError::InvalidWorldState);
        }
        let handle = BodyHandle::new(self.ids.spawn_empty().id());
        self.bodies.push((handle, body));
        Ok(handle)
    }

    fn find(&self, handle: BodyHandle) -> Result<&TestBody, PhysicsError> {
        self.bodies
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, body)| body)
            .ok_or(PhysicsError::MissingBody(handle))
    }

    fn find_mut(&mut self, handle: BodyHandle) -> Result<&mut TestBody, PhysicsError> {
        self.bodies
            .iter_mut()
            .find(|(h, _)| *h == handle)
            .map(|(_, body)| body)
            .ok_or(PhysicsError::MissingBody(handle))
    }
}

/// Segment/box intersection. Returns the entry fraction and face normal.
fn segment_vs_box(source: Vec2, target: Vec2, aabb: &Aabb2d) -> Option<(f32, Vec2)> {
    let delta = target - source;
    let mut t_min = 0.0_f32;
    let mut t_max = 1.0_f32;
    let mut normal = Vec2::ZERO;

    for axis in 0..2 {
        let (s, d, lo, hi) = (source[axis], delta[axis], aabb.min[axis], aabb.max[axis]);
        if d.abs() < f32::EPSILON {
            if s < lo || s > hi {
                return None;
            }
            continue;
        }

        let (mut t1, mut t2) = ((lo - s) / d, (hi - s) / d);
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        if t1 > t_min {
            t_min = t1;
            normal = Vec2::ZERO;
            normal[axis] = -d.signum();
        }
        t_max = t_max.min(t2);
        if t_min > t_max {
            return None;
        }
    }

    Some((t_min, normal))
}

impl CollisionQuery for BoxWorld {
    fn cast_ray(&self, source: Vec2, target: Vec2) -> Option<RayHit> {
        self.bodies
            .iter()
            .filter(|(_, body)| body.kind == BodyKind::Solid)
            .filter_map(|(handle, body)| {
                segment_vs_box(source, target, &body.aabb()).map(|(fraction, normal)| RayHit {
                    body: *handle,
                    tag: body.tag,
                    point: source + (target - source) * fraction,
                    normal,
                    fraction,
                })
            })
            .min_by(|a, b| a.fraction.total_cmp(&b.fraction))
    }

    fn query_region_matching(
        &self,
        region: Aabb2d,
        accept: &dyn Fn(&RegionHit) -> bool,
    ) -> Option<RegionHit> {
        self.bodies
            .iter()
            .filter(|(_, body)| body.kind == BodyKind::Sensor)
            .filter(|(_, body)| body.aabb().intersects(&region))
            .map(|(handle, body)| RegionHit {
                body: *handle,
                tag: body.tag,
                portal: body.portal,
            })
            .find(|hit| accept(hit))
    }
}

impl PhysicsWorld for BoxWorld {
    fn is_active(&self) -> bool {
        self.active
    }

    fn create_world(&mut self) {
        self.bodies.clear();
        self.active = true;
    }

    fn destroy_world(&mut self) {
        self.bodies.clear();
        self.active = false;
    }

    fn create_dynamic_body(&mut self, desc: &DynamicBodyDesc) -> Result<BodyHandle, PhysicsError> {
        self.insert(TestBody {
            kind: BodyKind::Dynamic,
            position: desc.position,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            half_extents: desc.half_extents,
            tag: None,
            portal: None,
            fixed_rotation: desc.fixed_rotation,
            allow_sleep: desc.allow_sleep,
        })
    }

    fn destroy_body(&mut self, body: BodyHandle) -> Result<(), PhysicsError> {
        if !self.active {
            return Err(PhysicsError::InvalidWorldState);
        }
        let before = self.bodies.len();
        self.bodies.retain(|(handle, _)| *handle != body);
        if self.bodies.len() == before {
            Err(PhysicsError::MissingBody(body))
        } else {
            Ok(())
        }
    }

    fn create_static_solid(
        &mut self,
        position: Vec2,
        half_extents: Vec2,
        _friction: f32,
    ) -> Result<BodyHandle, PhysicsError> {
        self.insert(TestBody {
            kind: BodyKind::Solid,
            position,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            half_extents,
            tag: Some(CollisionTag::SolidBlock),
            portal: None,
            fixed_rotation: true,
            allow_sleep: true,
        })
    }

    fn create_static_sensor(
        &mut self,
        position: Vec2,
        half_extents: Vec2,
        tag: CollisionTag,
        portal: Option<PortalHandle>,
    ) -> Result<BodyHandle, PhysicsError> {
        self.insert(TestBody {
            kind: BodyKind::Sensor,
            position,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            half_extents,
            tag: Some(tag),
            portal,
            fixed_rotation: true,
            allow_sleep: true,
        })
    }

    fn position(&self, body: BodyHandle) -> Result<Vec2, PhysicsError> {
        self.find(body).map(|b| b.position)
    }

    fn velocity(&self, body: BodyHandle) -> Result<Vec2, PhysicsError> {
        self.find(body).map(|b| b.velocity)
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) -> Result<(), PhysicsError> {
        self.find_mut(body).map(|b| b.velocity = velocity)
    }

    fn set_transform(
        &mut self,
        body: BodyHandle,
        position: Vec2,
        rotation: f32,
    ) -> Result<(), PhysicsError> {
        self.find_mut(body).map(|b| {
            b.position = position;
            b.rotation = rotation;
        })
    }
}
