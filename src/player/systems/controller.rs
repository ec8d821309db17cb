//! Player domain: fixed-tick controller driver.

use bevy::prelude::*;

use crate::physics::AvianWorld;
use crate::player::{AnimationSheet, MovementInput, MovementTuning, Player, PlayerController};

/// Runs in `FixedUpdate`, so `Time` is the fixed clock the solver uses.
pub(crate) fn run_player_controller(
    time: Res<Time>,
    tuning: Res<MovementTuning>,
    sheet: Res<AnimationSheet>,
    mut input: ResMut<MovementInput>,
    mut world: AvianWorld,
    mut players: Query<&mut PlayerController, With<Player>>,
) {
    let dt = time.delta_secs();
    let tick_input = input.take_tick_input();

    for mut controller in &mut players {
        controller.update(dt, tick_input, &tuning, &sheet, &mut world);
    }
}
