//! Levels domain: systems driving level loads, portal transitions and respawns.

use bevy::prelude::*;

use crate::levels::{
    ActiveLevel, LevelCatalog, LevelDef, LevelVisual, PendingLevelSwap, TransitionCooldown,
    enter_level, portal_request, start_request,
};
use crate::physics::AvianWorld;
use crate::player::{MovementTuning, Player, PlayerController};
use crate::portals::PortalRegistry;

const SOLID_COLOR: Color = Color::srgb(0.35, 0.4, 0.35);
const PORTAL_COLOR: Color = Color::srgba(0.4, 0.6, 0.9, 0.6);

pub(crate) fn queue_start_level(
    catalog: Res<LevelCatalog>,
    tuning: Res<MovementTuning>,
    mut cooldown: ResMut<TransitionCooldown>,
    mut pending: ResMut<PendingLevelSwap>,
) {
    *cooldown = TransitionCooldown::new(tuning.transition_cooldown);

    match start_request(&catalog) {
        Some(request) => {
            info!("[LEVEL] Starting in '{}'", request.level_id);
            pending.0 = Some(request);
        }
        None => error!("[LEVEL] Level catalog is empty, nothing to load"),
    }
}

/// Put the player back at the spawn point after leaving the level rectangle.
pub(crate) fn respawn_out_of_bounds(
    active: Option<Res<ActiveLevel>>,
    mut world: AvianWorld,
    mut players: Query<&mut PlayerController, With<Player>>,
) {
    let Some(active) = active else {
        return;
    };

    for mut controller in &mut players {
        let Some(position) = controller.position(&world) else {
            continue;
        };
        if !active.is_out_of_bounds(position) {
            continue;
        }

        info!(
            "[LEVEL] Player left '{}' at ({:.1}, {:.1}), respawning",
            active.id, position.x, position.y
        );
        if let Err(err) = controller.teleport_to(&mut world, active.spawn) {
            warn!("[LEVEL] Respawn failed: {}", err);
        }
    }
}

pub(crate) fn check_portal_transition(
    time: Res<Time>,
    registry: Res<PortalRegistry>,
    mut cooldown: ResMut<TransitionCooldown>,
    mut pending: ResMut<PendingLevelSwap>,
    mut players: Query<&mut PlayerController, With<Player>>,
) {
    for mut controller in &mut players {
        let touching = controller.is_touching_portal();
        cooldown.tick(time.delta(), touching);

        if !touching || pending.0.is_some() || !cooldown.can_transition() {
            continue;
        }

        match portal_request(&controller, &registry) {
            Some(request) => {
                info!(
                    "[PORTAL] Entering portal to '{}' at {:?}",
                    request.level_id, request.arrival
                );
                pending.0 = Some(request);
            }
            None => warn!("[PORTAL] Touched portal is no longer registered"),
        }
        controller.reset_portal_status();
    }
}

/// Perform a requested swap. Runs last in the tick so no portal check sees
/// the new level before the solver has stepped it.
#[allow(clippy::too_many_arguments)]
pub(crate) fn apply_level_swap(
    mut commands: Commands,
    catalog: Res<LevelCatalog>,
    tuning: Res<MovementTuning>,
    mut pending: ResMut<PendingLevelSwap>,
    mut registry: ResMut<PortalRegistry>,
    mut cooldown: ResMut<TransitionCooldown>,
    mut world: AvianWorld,
    mut players: Query<&mut PlayerController, With<Player>>,
    visuals: Query<Entity, With<LevelVisual>>,
) {
    let Some(request) = pending.0.take() else {
        return;
    };
    let Some(level) = catalog.get(&request.level_id) else {
        warn!("[LEVEL] Unknown level '{}', staying put", request.level_id);
        return;
    };
    let Ok(mut controller) = players.single_mut() else {
        warn!("[LEVEL] No player to carry into '{}'", level.id);
        return;
    };

    for entity in &visuals {
        commands.entity(entity).despawn();
    }

    match enter_level(
        &mut world,
        &mut registry,
        &mut controller,
        level,
        request.arrival,
        &tuning,
    ) {
        Ok(active) => {
            info!(
                "[LEVEL] Loaded '{}' ({} solids, {} portals)",
                level.id,
                level.solids.len(),
                level.portals.len()
            );
            spawn_level_visuals(&mut commands, level);
            commands.insert_resource(active);
            cooldown.reset();
        }
        Err(err) => warn!("[LEVEL] Failed to load '{}': {}", level.id, err),
    }
}

fn spawn_level_visuals(commands: &mut Commands, level: &LevelDef) {
    let solids = level.solids.iter().map(|rect| (rect, SOLID_COLOR, 0.0));
    let portals = level
        .portals
        .iter()
        .map(|portal| (&portal.rect, PORTAL_COLOR, 1.0));

    for (rect, color, z) in solids.chain(portals) {
        let center = rect.center_units();
        commands.spawn((
            LevelVisual,
            Sprite {
                color,
                custom_size: Some(rect.half_extents_units() * 2.0),
                ..default()
            },
            // Render space is y-up
            Transform::from_xyz(center.x, -center.y, z),
        ));
    }
}

/// Centre the camera on the loaded level.
pub(crate) fn frame_camera(
    active: Res<ActiveLevel>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    let center = active.size * 0.5;
    for mut transform in &mut cameras {
        transform.translation.x = center.x;
        transform.translation.y = -center.y;
    }
}
