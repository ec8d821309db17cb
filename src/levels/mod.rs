//! Levels domain: level catalog, world hosting and portal transitions.
//!
//! Each fixed tick runs the player controller, then out-of-bounds respawn,
//! then the portal check, then any swap the check requested. avian steps the
//! world in `FixedPostUpdate` of the same tick.

mod data;
mod host;
mod resources;
pub(crate) mod systems;


pub use data::{LevelCatalog, LevelDef, PixelPoint, PixelRect};
pub use host::{LevelBuild, build_level, enter_level, portal_request, start_request, unload_level};
pub use resources::{ActiveLevel, LevelRequest, LevelVisual, PendingLevelSwap, TransitionCooldown};

use bevy::prelude::*;

use crate::content::load_content;
use crate::player::systems::run_player_controller;

pub struct LevelsPlugin;

impl Plugin for LevelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingLevelSwap>()
            .init_resource::<TransitionCooldown>()
            .add_systems(Startup, systems::queue_start_level.after(load_content))
            .add_systems(
                FixedUpdate,
                (
                    systems::respawn_out_of_bounds,
                    systems::check_portal_transition,
                    systems::apply_level_swap,
                )
                    .chain()
                    .after(run_player_controller),
            )
            .add_systems(
                Update,
                systems::frame_camera.run_if(resource_exists_and_changed::<ActiveLevel>),
            );
    }
}
