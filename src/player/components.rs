//! Player domain: markers and small state types.

use bevy::prelude::*;

/// Marker for the persistent player entity. Survives level swaps; its
/// physics body does not.
#[derive(Component, Debug)]
pub struct Player;

/// Coarse locomotion state, derived fresh every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementState {
    Grounded,
    Jumping,
    #[default]
    Falling,
}

impl MovementState {
    /// Level space is y-down, so negative vertical velocity is upward.
    pub fn derive(on_floor: bool, vertical_velocity: f32) -> Self {
        if on_floor {
            MovementState::Grounded
        } else if vertical_velocity < 0.0 {
            MovementState::Jumping
        } else {
            MovementState::Falling
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

/// Result of the floor and wall ray probes for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContactFlags {
    pub floor: bool,
    pub left_wall: bool,
    pub right_wall: bool,
}

impl ContactFlags {
    /// Whether a wall blocks movement in `direction` (-1 left, 1 right).
    pub fn blocks(&self, direction: f32) -> bool {
        (direction < 0.0 && self.left_wall) || (direction > 0.0 && self.right_wall)
    }
}
