//! Player domain: sprite spawning and presentation sync.

use bevy::prelude::*;

use crate::physics::{AvianWorld, PIXELS_PER_UNIT};
use crate::player::{
    AnimationSheet, AnimationState, MovementTuning, Player, PlayerController, SpriteFrame,
};

const PLAYER_Z: f32 = 10.0;

pub(crate) fn spawn_player(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    tuning: Res<MovementTuning>,
    sheet: Res<AnimationSheet>,
) {
    commands.spawn((
        Player,
        Name::new("Player"),
        PlayerController::new(&tuning),
        Sprite {
            image: asset_server.load(sheet.image.clone()),
            rect: Some(sheet.frame_rect(AnimationState::Idle, 0)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, PLAYER_Z).with_scale(Vec3::splat(1.0 / PIXELS_PER_UNIT)),
        // Shown once a body exists
        Visibility::Hidden,
    ));
}

/// Level pixels (y-down) to render space (physics units, y-up).
pub(crate) fn sprite_translation(frame: &SpriteFrame) -> Vec3 {
    let units = frame.position_px / PIXELS_PER_UNIT;
    Vec3::new(units.x, -units.y, PLAYER_Z)
}

pub(crate) fn sync_player_sprite(
    sheet: Res<AnimationSheet>,
    world: AvianWorld,
    mut players: Query<
        (&PlayerController, &mut Sprite, &mut Transform, &mut Visibility),
        With<Player>,
    >,
) {
    for (controller, mut sprite, mut transform, mut visibility) in &mut players {
        let Some(frame) = controller.draw(&world, &sheet) else {
            *visibility = Visibility::Hidden;
            continue;
        };
        sprite.rect = Some(frame.rect);
        sprite.flip_x = frame.flip_x;
        transform.translation = sprite_translation(&frame);
        *visibility = Visibility::Inherited;
    }
}
