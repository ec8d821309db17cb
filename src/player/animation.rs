//! Player domain: animation state derivation and frame playback.
//!
//! The sheet is a single row of square frames. Each animation state plays an
//! ordered list of frame indices into that row, looping.

use bevy::prelude::*;
use serde::Deserialize;

use crate::player::{MovementState, MovementTuning};

/// Animation states for the player sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Walk,
    JumpStart,
    JumpApex,
    JumpFall,
}

/// Pick the animation for the current movement state and velocity.
///
/// Vertical velocity is level space: positive is falling.
pub fn derive_animation_state(
    movement: MovementState,
    velocity: Vec2,
    tuning: &MovementTuning,
) -> AnimationState {
    match movement {
        MovementState::Grounded => {
            if velocity.x.abs() > tuning.walk_speed_threshold {
                AnimationState::Walk
            } else {
                AnimationState::Idle
            }
        }
        MovementState::Jumping => AnimationState::JumpStart,
        MovementState::Falling => {
            if velocity.y > tuning.fall_speed_threshold {
                AnimationState::JumpFall
            } else {
                AnimationState::JumpApex
            }
        }
    }
}

/// Sprite sheet layout. Loaded from `assets/sprites/player_sheet.json`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnimationSheet {
    /// Path to the sheet image, relative to assets/.
    pub image: String,
    /// Width and height of one frame in pixels.
    pub frame_size: u32,
    pub idle: Vec<u32>,
    pub walk: Vec<u32>,
    pub jump_start: Vec<u32>,
    pub jump_apex: Vec<u32>,
    pub jump_fall: Vec<u32>,
}

impl Default for AnimationSheet {
    fn default() -> Self {
        Self {
            image: "sprites/dino_vita.png".to_string(),
            frame_size: 24,
            idle: vec![0, 1, 2],
            walk: vec![3, 4, 5],
            jump_start: vec![6],
            jump_apex: vec![7],
            jump_fall: vec![8],
        }
    }
}

impl AnimationSheet {
    pub fn frames(&self, state: AnimationState) -> &[u32] {
        match state {
            AnimationState::Idle => &self.idle,
            AnimationState::Walk => &self.walk,
            AnimationState::JumpStart => &self.jump_start,
            AnimationState::JumpApex => &self.jump_apex,
            AnimationState::JumpFall => &self.jump_fall,
        }
    }

    /// Pixel rectangle of sheet cell `cell`.
    pub fn cell_rect(&self, cell: u32) -> Rect {
        let size = self.frame_size as f32;
        let x = cell as f32 * size;
        Rect::new(x, 0.0, x + size, size)
    }

    /// Pixel rectangle for playback position `frame` of `state`.
    pub fn frame_rect(&self, state: AnimationState, frame: usize) -> Rect {
        let frames = self.frames(state);
        let cell = if frames.is_empty() {
            0
        } else {
            frames[frame % frames.len()]
        };
        self.cell_rect(cell)
    }
}

/// Frame ticker for the current animation state.
#[derive(Debug, Clone)]
pub struct AnimationTicker {
    state: AnimationState,
    frame: usize,
    ticker: f32,
    frame_duration: f32,
}

impl AnimationTicker {
    pub fn new(frame_duration: f32) -> Self {
        Self {
            state: AnimationState::Idle,
            frame: 0,
            ticker: frame_duration,
            frame_duration,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Switch state. A new state starts from its first frame.
    pub fn set_state(&mut self, state: AnimationState) {
        if self.state != state {
            self.state = state;
            self.frame = 0;
            self.ticker = self.frame_duration;
        }
    }

    /// Count down the ticker; on expiry step to the next of `frame_count` frames.
    pub fn advance(&mut self, dt: f32, frame_count: usize) {
        self.ticker -= dt;
        if self.ticker <= 0.0 {
            self.ticker = self.frame_duration;
            self.frame = if frame_count == 0 {
                0
            } else {
                (self.frame + 1) % frame_count
            };
        }
    }
}
