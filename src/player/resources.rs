//! Player domain: tuning and input resources.

use bevy::prelude::*;
use serde::Deserialize;

/// Movement feel and probe geometry. Loaded from `assets/data/movement.ron`.
///
/// All distances are physics units, all times seconds, level space y-down.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    pub move_speed: f32,
    pub jump_speed: f32,
    pub jump_buffer_time: f32,
    pub coyote_time: f32,
    /// Fraction of horizontal velocity removed per second without input.
    pub horizontal_damping: f32,
    pub walk_speed_threshold: f32,
    pub fall_speed_threshold: f32,
    pub body_half_width: f32,
    pub body_half_height: f32,
    pub body_density: f32,
    pub body_friction: f32,
    pub solid_friction: f32,
    /// Lateral offset of the outer floor rays from the body centre.
    pub floor_probe_spread: f32,
    /// Floor ray length measured from the body centre.
    pub floor_probe_length: f32,
    /// Vertical offset of the outer wall rays from the body centre.
    pub wall_probe_spread: f32,
    /// Wall ray length measured from the body centre.
    pub wall_probe_length: f32,
    pub portal_probe_half_extent: f32,
    pub frame_duration: f32,
    /// Seconds after a level swap during which portals are ignored.
    pub transition_cooldown: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            move_speed: 15.0,
            jump_speed: 25.0,
            jump_buffer_time: 0.15,
            coyote_time: 0.15,
            horizontal_damping: 6.0,
            walk_speed_threshold: 0.5,
            fall_speed_threshold: 5.0,
            body_half_width: 0.9,
            body_half_height: 1.0,
            body_density: 1.0,
            body_friction: 10.0,
            solid_friction: 0.3,
            floor_probe_spread: 0.8,
            floor_probe_length: 1.1,
            wall_probe_spread: 0.8,
            wall_probe_length: 1.1,
            portal_probe_half_extent: 1.0,
            frame_duration: 0.2,
            transition_cooldown: 0.3,
        }
    }
}

impl MovementTuning {
    pub fn body_half_extents(&self) -> Vec2 {
        Vec2::new(self.body_half_width, self.body_half_height)
    }

    /// Apex height of a standing jump under `gravity` (units/s², downward).
    pub fn jump_height(&self, gravity: f32) -> f32 {
        self.jump_speed * self.jump_speed / (2.0 * gravity)
    }
}

/// Keyboard state sampled every frame.
///
/// The jump edge stays latched until a fixed tick consumes it, so a press is
/// never lost or doubled when frame rate and tick rate differ.
#[derive(Resource, Debug, Default)]
pub struct MovementInput {
    pub left: bool,
    pub right: bool,
    pub jump_latched: bool,
}

impl MovementInput {
    /// Snapshot for one controller tick, consuming the jump edge.
    pub fn take_tick_input(&mut self) -> ControllerInput {
        let input = ControllerInput {
            left: self.left,
            right: self.right,
            jump_pressed: self.jump_latched,
        };
        self.jump_latched = false;
        input
    }
}

/// Input seen by one controller tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerInput {
    pub left: bool,
    pub right: bool,
    /// Jump key went down since the previous tick.
    pub jump_pressed: bool,
}

impl ControllerInput {
    /// -1 for left, 1 for right, 0 for none or both.
    pub fn direction(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}
