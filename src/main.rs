mod content;
mod levels;
mod physics;
mod player;
mod portals;

use bevy::prelude::*;

use crate::physics::PIXELS_PER_UNIT;

/// Screen pixels per level pixel.
const SCREEN_SCALE: f32 = 2.0;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Dino Portals".to_string(),
                        resolution: (1280, 720).into(),
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        .add_plugins((
            physics::WorldPhysicsPlugin::default(),
            content::ContentPlugin,
            portals::PortalsPlugin,
            player::PlayerPlugin,
            levels::LevelsPlugin,
        ))
        .add_systems(Startup, spawn_camera)
        .run();
}

/// The camera renders physics units.
fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: 1.0 / (PIXELS_PER_UNIT * SCREEN_SCALE),
            ..OrthographicProjection::default_2d()
        }),
    ));
}
