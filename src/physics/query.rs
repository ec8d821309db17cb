//! Physics domain: ray and region queries against the active world.

use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;

use crate::physics::{BodyHandle, CollisionTag};
use crate::portals::PortalHandle;

/// Nearest intersection of a ray with a collidable shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub body: BodyHandle,
    pub tag: Option<CollisionTag>,
    pub point: Vec2,
    pub normal: Vec2,
    /// Position of the hit along the ray, 0 at the source and 1 at the target.
    pub fraction: f32,
}

/// A sensor overlapping a queried region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionHit {
    pub body: BodyHandle,
    pub tag: Option<CollisionTag>,
    /// Portal attached to the sensor, if it is one.
    pub portal: Option<PortalHandle>,
}

/// Read-only spatial queries.
///
/// Implementations must never report the player's own body: rays are cast
/// from inside it.
pub trait CollisionQuery {
    /// Cast a ray from `source` to `target` and return the nearest hit.
    ///
    /// When several shapes are hit at the same fraction, which one wins is
    /// unspecified.
    fn cast_ray(&self, source: Vec2, target: Vec2) -> Option<RayHit>;

    /// Return the first sensor overlapping `region` that `accept` admits.
    ///
    /// Rejected sensors are skipped, so they never hide a later match. With
    /// several accepted sensors, the first one found wins. Level data is
    /// expected not to overlap portals, so no ordering is imposed.
    fn query_region_matching(
        &self,
        region: Aabb2d,
        accept: &dyn Fn(&RegionHit) -> bool,
    ) -> Option<RegionHit>;

    /// Return the first sensor whose bounds overlap `region`.
    fn query_region(&self, region: Aabb2d) -> Option<RegionHit> {
        self.query_region_matching(region, &|_| true)
    }
}

pub trait Tagged {
    fn tag(&self) -> Option<CollisionTag>;
}

impl Tagged for RayHit {
    fn tag(&self) -> Option<CollisionTag> {
        self.tag
    }
}

impl Tagged for RegionHit {
    fn tag(&self) -> Option<CollisionTag> {
        self.tag
    }
}

/// Whether `hit` carries `expected`. Untagged hits never match.
pub fn has_tag(hit: &impl Tagged, expected: CollisionTag) -> bool {
    hit.tag() == Some(expected)
}

/// Cast every `(source, target)` segment and report whether any of them hits
/// a shape tagged `expected`. Stops at the first match.
pub fn probe_any<Q, I>(query: &Q, segments: I, expected: CollisionTag) -> bool
where
    Q: CollisionQuery + ?Sized,
    I: IntoIterator<Item = (Vec2, Vec2)>,
{
    segments.into_iter().any(|(source, target)| {
        query
            .cast_ray(source, target)
            .is_some_and(|hit| has_tag(&hit, expected))
    })
}
