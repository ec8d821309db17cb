//! Content domain: data file loading shared by the other domains.

mod loader;

#[cfg(test)]
mod tests;

pub use loader::{load_json_file, load_ron_file, or_default, parse_json, parse_ron};

use bevy::prelude::*;
use std::path::Path;

use crate::levels::LevelCatalog;
use crate::physics::PhysicsStepping;
use crate::player::{AnimationSheet, MovementTuning};

/// Directory holding the RON data files, relative to the working directory.
pub const DATA_DIR: &str = "assets/data";
pub const PLAYER_SHEET: &str = "assets/sprites/player_sheet.json";

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_content);
    }
}

/// Load tuning, sprite sheet and level catalog. Anything missing or broken
/// falls back to built-in defaults.
pub(crate) fn load_content(mut commands: Commands, stepping: Res<PhysicsStepping>) {
    let data = Path::new(DATA_DIR);

    let tuning: MovementTuning = or_default(load_ron_file(&data.join("movement.ron")));
    let sheet: AnimationSheet = or_default(load_json_file(Path::new(PLAYER_SHEET)));
    let catalog: LevelCatalog = or_default(load_ron_file(&data.join("levels.ron")));

    for problem in catalog.validate() {
        warn!("[CONTENT] levels.ron: {}", problem);
    }

    info!(
        "[CONTENT] Loaded {} levels; move speed {}, jump speed {} (apex {:.1} units)",
        catalog.levels.len(),
        tuning.move_speed,
        tuning.jump_speed,
        tuning.jump_height(stepping.gravity.y)
    );

    commands.insert_resource(tuning);
    commands.insert_resource(sheet);
    commands.insert_resource(catalog);
}
