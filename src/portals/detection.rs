//! Portals domain: region probe for portal sensors around the player.

use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;

use crate::physics::{CollisionQuery, CollisionTag, has_tag};
use crate::portals::PortalHandle;

/// Symmetric box around `position` used to look for portal sensors.
pub fn portal_probe_aabb(position: Vec2, half_extent: f32) -> Aabb2d {
    Aabb2d::new(position, Vec2::splat(half_extent))
}

/// Portal overlapping the probe box around `position`, if any.
///
/// Sensors without the portal tag or without an attached descriptor are
/// skipped. When portals overlap, whichever the query finds first is returned.
pub fn detect_portal<Q>(query: &Q, position: Vec2, half_extent: f32) -> Option<PortalHandle>
where
    Q: CollisionQuery + ?Sized,
{
    query
        .query_region_matching(portal_probe_aabb(position, half_extent), &|hit| {
            has_tag(hit, CollisionTag::PortalEntry) && hit.portal.is_some()
        })?
        .portal
}
