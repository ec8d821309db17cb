//! Player domain: probe overlay for the dev-tools build.

use bevy::prelude::*;

use crate::physics::{AvianWorld, CollisionQuery, CollisionTag, has_tag};
use crate::player::{MovementTuning, Player, PlayerController, ProbeFans};
use crate::portals::portal_probe_aabb;

const RAY_MISS: Color = Color::srgb(0.8, 0.2, 0.2);
const RAY_SOLID: Color = Color::srgb(0.2, 0.9, 0.3);
const RAY_OTHER: Color = Color::srgb(0.9, 0.8, 0.2);
const PORTAL_PROBE: Color = Color::srgb(0.6, 0.3, 0.9);

fn to_render(v: Vec2) -> Vec2 {
    Vec2::new(v.x, -v.y)
}

/// Draw every contact ray up to its hit point, plus the portal probe box.
pub(crate) fn draw_probe_gizmos(
    mut gizmos: Gizmos,
    tuning: Res<MovementTuning>,
    world: AvianWorld,
    players: Query<&PlayerController, With<Player>>,
) {
    for controller in &players {
        let Some(position) = controller.position(&world) else {
            continue;
        };

        for (source, target) in ProbeFans::around(position, &tuning).all() {
            let (end, color) = match world.cast_ray(source, target) {
                Some(hit) if has_tag(&hit, CollisionTag::SolidBlock) => (hit.point, RAY_SOLID),
                Some(hit) => (hit.point, RAY_OTHER),
                None => (target, RAY_MISS),
            };
            gizmos.line_2d(to_render(source), to_render(end), color);
        }

        let probe = portal_probe_aabb(position, tuning.portal_probe_half_extent);
        let color = if controller.is_touching_portal() {
            RAY_SOLID
        } else {
            PORTAL_PROBE
        };
        let center = (probe.min + probe.max) * 0.5;
        gizmos.rect_2d(to_render(center), probe.max - probe.min, color);
    }
}
