//! Levels domain: resources describing the loaded level and swaps in flight.

use bevy::prelude::*;
use std::time::Duration;

/// The level whose physics world is currently alive.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ActiveLevel {
    pub id: String,
    /// Player spawn, physics units.
    pub spawn: Vec2,
    /// Level width and height, physics units.
    pub size: Vec2,
}

impl ActiveLevel {
    /// Whether `position` has left the level rectangle.
    pub fn is_out_of_bounds(&self, position: Vec2) -> bool {
        position.x < 0.0 || position.y < 0.0 || position.x > self.size.x || position.y > self.size.y
    }
}

/// A level load requested for the end of the current tick.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelRequest {
    pub level_id: String,
    /// Arrival point in physics units. `None` uses the level spawn.
    pub arrival: Option<Vec2>,
}

#[derive(Resource, Debug, Default)]
pub struct PendingLevelSwap(pub Option<LevelRequest>);

/// Blocks portal transitions right after a swap.
///
/// A transition is allowed once the timer has run out and the player has been
/// seen outside every portal since arriving.
#[derive(Resource, Debug)]
pub struct TransitionCooldown {
    pub timer: Timer,
    pub awaiting_exit: bool,
}

impl Default for TransitionCooldown {
    fn default() -> Self {
        Self::new(0.3)
    }
}

impl TransitionCooldown {
    pub fn new(seconds: f32) -> Self {
        let mut timer = Timer::from_seconds(seconds, TimerMode::Once);
        // Nothing to wait for before the first swap
        timer.tick(Duration::from_secs_f32(seconds));
        Self {
            timer,
            awaiting_exit: false,
        }
    }

    /// Start blocking after a swap.
    pub fn reset(&mut self) {
        self.timer.reset();
        self.awaiting_exit = true;
    }

    pub fn tick(&mut self, delta: Duration, touching_portal: bool) {
        self.timer.tick(delta);
        if !touching_portal {
            self.awaiting_exit = false;
        }
    }

    pub fn can_transition(&self) -> bool {
        self.timer.remaining_secs() == 0.0 && !self.awaiting_exit
    }
}

/// Marker for render-only entities of the loaded level.
#[derive(Component, Debug)]
pub struct LevelVisual;
