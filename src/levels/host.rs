//! Levels domain: world lifetime for one loaded level.
//!
//! These helpers own the ordering rules around a swap: the controller lets go
//! of its portal and body before the registry is cleared, and the registry is
//! cleared before the world is destroyed.

use bevy::prelude::*;

use crate::levels::{ActiveLevel, LevelCatalog, LevelDef, LevelRequest};
use crate::physics::{CollisionTag, PhysicsError, PhysicsWorld};
use crate::player::{MovementTuning, PlayerController};
use crate::portals::PortalRegistry;

/// Counts of what `build_level` created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelBuild {
    pub solids: usize,
    pub portals: usize,
}

/// Tear down the loaded level.
pub fn unload_level<W>(
    world: &mut W,
    registry: &mut PortalRegistry,
    controller: Option<&mut PlayerController>,
) where
    W: PhysicsWorld + ?Sized,
{
    if let Some(controller) = controller {
        controller.detach_body();
    }
    registry.clear();
    world.destroy_world();
}

/// Create a fresh world holding the level's solids and portal sensors.
pub fn build_level<W>(
    world: &mut W,
    registry: &mut PortalRegistry,
    level: &LevelDef,
    tuning: &MovementTuning,
) -> Result<LevelBuild, PhysicsError>
where
    W: PhysicsWorld + ?Sized,
{
    world.create_world();
    registry.begin_level(level.id.as_str());

    for rect in &level.solids {
        world.create_static_solid(
            rect.center_units(),
            rect.half_extents_units(),
            tuning.solid_friction,
        )?;
    }

    for portal in &level.portals {
        let handle = registry.register(
            portal.destination_level.as_str(),
            portal.destination.to_units(),
        );
        world.create_static_sensor(
            portal.rect.center_units(),
            portal.rect.half_extents_units(),
            CollisionTag::PortalEntry,
            Some(handle),
        )?;
    }

    Ok(LevelBuild {
        solids: level.solids.len(),
        portals: level.portals.len(),
    })
}

/// Swap to `level`: unload, build, give the player a new body and move it to
/// `arrival` (or the level spawn).
pub fn enter_level<W>(
    world: &mut W,
    registry: &mut PortalRegistry,
    controller: &mut PlayerController,
    level: &LevelDef,
    arrival: Option<Vec2>,
    tuning: &MovementTuning,
) -> Result<ActiveLevel, PhysicsError>
where
    W: PhysicsWorld + ?Sized,
{
    unload_level(world, registry, Some(&mut *controller));
    let build = build_level(world, registry, level, tuning)?;

    let spawn = level.spawn_units();
    controller.reset_physics_for_level(world, spawn, tuning)?;
    if let Some(arrival) = arrival {
        controller.teleport_to(world, arrival)?;
    }

    debug!(
        "[LEVEL] Built '{}': {} solids, {} portals",
        level.id, build.solids, build.portals
    );

    Ok(ActiveLevel {
        id: level.id.clone(),
        spawn,
        size: level.size_units(),
    })
}

/// Level swap requested by the portal the controller currently touches.
pub fn portal_request(
    controller: &PlayerController,
    registry: &PortalRegistry,
) -> Option<LevelRequest> {
    let descriptor = controller.current_portal(registry)?;
    Some(LevelRequest {
        level_id: descriptor.destination_level.clone(),
        arrival: Some(descriptor.destination),
    })
}

/// Request for the catalog's start level.
pub fn start_request(catalog: &LevelCatalog) -> Option<LevelRequest> {
    catalog.start_level().map(|level| LevelRequest {
        level_id: level.id.clone(),
        arrival: None,
    })
}
