//! Physics domain: tests for the query service and world contract.

use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;

use super::testing::BoxWorld;
use super::{
    CollisionQuery, CollisionTag, DynamicBodyDesc, PhysicsError, PhysicsStepping, PhysicsWorld,
    RayHit, has_tag, probe_any,
};
use crate::portals::PortalRegistry;

fn player_desc(position: Vec2) -> DynamicBodyDesc {
    DynamicBodyDesc {
        position,
        half_extents: Vec2::new(0.9, 1.0),
        fixed_rotation: true,
        allow_sleep: false,
        density: 1.0,
        friction: 10.0,
    }
}

// -----------------------------------------------------------------------------
// cast_ray tests
// -----------------------------------------------------------------------------

#[test]
fn test_cast_ray_reports_nearest_hit() {
    let mut world = BoxWorld::new();
    let far = world.add_solid(Vec2::new(10.0, 0.0), Vec2::splat(1.0));
    let near = world.add_solid(Vec2::new(5.0, 0.0), Vec2::splat(1.0));

    let hit = world
        .cast_ray(Vec2::ZERO, Vec2::new(20.0, 0.0))
        .expect("ray should hit");

    assert_eq!(hit.body, near);
    assert_ne!(hit.body, far);
    assert!((hit.fraction - 0.2).abs() < 1e-5);
    assert!((hit.point - Vec2::new(4.0, 0.0)).length() < 1e-5);
    assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));
}

#[test]
fn test_cast_ray_misses_when_target_is_short() {
    let mut world = BoxWorld::new();
    world.add_solid(Vec2::new(5.0, 0.0), Vec2::splat(1.0));

    assert!(world.cast_ray(Vec2::ZERO, Vec2::new(3.9, 0.0)).is_none());
}

#[test]
fn test_cast_ray_ignores_sensors_and_dynamic_bodies() {
    let mut world = BoxWorld::new();
    let mut registry = PortalRegistry::default();
    let portal = registry.register("level_1", Vec2::ZERO);
    world.add_portal(Vec2::new(2.0, 0.0), Vec2::splat(0.5), portal);
    world
        .create_dynamic_body(&player_desc(Vec2::new(3.0, 0.0)))
        .unwrap();

    assert!(world.cast_ray(Vec2::ZERO, Vec2::new(5.0, 0.0)).is_none());
}

#[test]
fn test_downward_ray_reports_top_face_normal() {
    let mut world = BoxWorld::new();
    world.add_solid(Vec2::new(0.0, 10.5), Vec2::new(5.0, 0.5));

    let hit = world
        .cast_ray(Vec2::new(0.0, 9.0), Vec2::new(0.0, 11.0))
        .unwrap();

    // Level space is y-down: the floor's top face points up (-y)
    assert_eq!(hit.normal, Vec2::new(0.0, -1.0));
    assert!((hit.point.y - 10.0).abs() < 1e-5);
}

// -----------------------------------------------------------------------------
// has_tag / probe_any tests
// -----------------------------------------------------------------------------

#[test]
fn test_has_tag_matches_expected_tag_only() {
    let mut world = BoxWorld::new();
    world.add_solid(Vec2::new(2.0, 0.0), Vec2::splat(0.5));

    let hit = world.cast_ray(Vec2::ZERO, Vec2::new(4.0, 0.0)).unwrap();
    assert!(has_tag(&hit, CollisionTag::SolidBlock));
    assert!(!has_tag(&hit, CollisionTag::PortalEntry));
}

#[test]
fn test_has_tag_is_false_for_untagged_hits() {
    let mut world = BoxWorld::new();
    world.add_untagged_solid(Vec2::new(2.0, 0.0), Vec2::splat(0.5));

    let hit: RayHit = world.cast_ray(Vec2::ZERO, Vec2::new(4.0, 0.0)).unwrap();
    assert!(hit.tag.is_none());
    assert!(!has_tag(&hit, CollisionTag::SolidBlock));
}

#[test]
fn test_probe_any_needs_only_one_hit() {
    let mut world = BoxWorld::new();
    world.add_solid(Vec2::new(1.0, 2.0), Vec2::splat(0.5));

    let rays = [-1.0_f32, 0.0, 1.0].map(|dx| (Vec2::new(dx, 0.0), Vec2::new(dx, 3.0)));
    assert!(probe_any(&world, rays, CollisionTag::SolidBlock));

    let misses = [-5.0_f32, -4.0, -3.0].map(|dx| (Vec2::new(dx, 0.0), Vec2::new(dx, 3.0)));
    assert!(!probe_any(&world, misses, CollisionTag::SolidBlock));
}

#[test]
fn test_probe_any_blocked_by_untagged_shape_in_front() {
    let mut world = BoxWorld::new();
    world.add_untagged_solid(Vec2::new(0.0, 1.0), Vec2::splat(0.25));
    world.add_solid(Vec2::new(0.0, 2.5), Vec2::splat(0.25));

    // The nearest hit is untagged, so the probe doesn't count it as solid
    let rays = [(Vec2::ZERO, Vec2::new(0.0, 3.0))];
    assert!(!probe_any(&world, rays, CollisionTag::SolidBlock));
}

// -----------------------------------------------------------------------------
// query_region tests
// -----------------------------------------------------------------------------

#[test]
fn test_query_region_returns_overlapping_sensor() {
    let mut world = BoxWorld::new();
    let mut registry = PortalRegistry::default();
    let portal = registry.register("level_2", Vec2::new(20.0, 8.0));
    let sensor = world.add_portal(Vec2::new(3.0, 0.0), Vec2::splat(1.0), portal);

    let hit = world
        .query_region(Aabb2d::new(Vec2::new(1.5, 0.0), Vec2::splat(1.0)))
        .expect("region should overlap the portal");
    assert_eq!(hit.body, sensor);
    assert_eq!(hit.portal, Some(portal));
    assert!(has_tag(&hit, CollisionTag::PortalEntry));
}

#[test]
fn test_query_region_ignores_solids() {
    let mut world = BoxWorld::new();
    world.add_solid(Vec2::ZERO, Vec2::splat(1.0));

    assert!(
        world
            .query_region(Aabb2d::new(Vec2::ZERO, Vec2::splat(2.0)))
            .is_none()
    );
}

#[test]
fn test_query_region_first_found_wins_when_portals_overlap() {
    let mut world = BoxWorld::new();
    let mut registry = PortalRegistry::default();
    let first = registry.register("a", Vec2::ZERO);
    let second = registry.register("b", Vec2::ZERO);
    world.add_portal(Vec2::ZERO, Vec2::splat(1.0), first);
    world.add_portal(Vec2::ZERO, Vec2::splat(1.0), second);

    let hit = world
        .query_region(Aabb2d::new(Vec2::ZERO, Vec2::splat(0.5)))
        .unwrap();
    assert!(hit.portal == Some(first) || hit.portal == Some(second));
}

// -----------------------------------------------------------------------------
// World lifetime tests
// -----------------------------------------------------------------------------

#[test]
fn test_body_creation_requires_active_world() {
    let mut world = BoxWorld::inactive();

    assert_eq!(
        world.create_dynamic_body(&player_desc(Vec2::ZERO)),
        Err(PhysicsError::InvalidWorldState)
    );
    assert_eq!(
        world.create_static_solid(Vec2::ZERO, Vec2::ONE, 0.3),
        Err(PhysicsError::InvalidWorldState)
    );
}

#[test]
fn test_destroy_world_invalidates_handles() {
    let mut world = BoxWorld::new();
    let body = world
        .create_dynamic_body(&player_desc(Vec2::new(1.0, 1.0)))
        .unwrap();

    world.destroy_world();

    assert!(!world.is_active());
    assert_eq!(world.position(body), Err(PhysicsError::MissingBody(body)));
    assert_eq!(
        world.set_velocity(body, Vec2::ONE),
        Err(PhysicsError::MissingBody(body))
    );
}

#[test]
fn test_destroy_body_releases_only_that_body() {
    let mut world = BoxWorld::new();
    let floor = world.add_solid(Vec2::new(0.0, 5.0), Vec2::new(5.0, 0.5));
    let body = world
        .create_dynamic_body(&player_desc(Vec2::ZERO))
        .unwrap();

    assert_eq!(world.destroy_body(body), Ok(()));
    assert_eq!(world.destroy_body(body), Err(PhysicsError::MissingBody(body)));
    assert!(world.position(floor).is_ok());
    assert_eq!(world.body_count(), 1);
}

#[test]
fn test_physics_error_messages() {
    assert_eq!(
        PhysicsError::InvalidWorldState.to_string(),
        "no physics world is active"
    );
}

// -----------------------------------------------------------------------------
// Stepping tests
// -----------------------------------------------------------------------------

#[test]
fn test_default_stepping_is_sixty_hz_with_downward_gravity() {
    let stepping = PhysicsStepping::default();
    assert!((stepping.fixed_dt() - 1.0 / 60.0).abs() < 1e-6);
    assert_eq!(stepping.substeps, 4);
    assert!(stepping.gravity.y > 0.0);
}
