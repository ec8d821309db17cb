//! Player domain: platformer controller, animation and input.
//!
//! The `Player` entity is persistent. Its physics body belongs to the loaded
//! level and is recreated by the level host on every swap.

mod animation;
mod components;
mod controller;
mod resources;
pub(crate) mod systems;


pub use animation::{AnimationSheet, AnimationState, AnimationTicker, derive_animation_state};
pub use components::{ContactFlags, Facing, MovementState, Player};
pub use controller::{PlayerController, ProbeFans, SpriteFrame, probe_contacts};
pub use resources::{ControllerInput, MovementInput, MovementTuning};

use bevy::prelude::*;

use crate::content::load_content;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementInput>()
            .add_systems(Startup, systems::spawn_player.after(load_content))
            .add_systems(Update, (systems::read_input, systems::sync_player_sprite))
            .add_systems(FixedUpdate, systems::run_player_controller);

        #[cfg(feature = "dev-tools")]
        app.add_systems(Update, systems::draw_probe_gizmos);
    }
}
