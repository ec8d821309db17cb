//! Player domain: the platformer controller.
//!
//! One controller drives one dynamic body. Each fixed tick it probes the
//! world for floor and wall contacts, looks for a portal, then resolves
//! horizontal movement, jumps and the animation state. Timers use the same
//! `dt` the solver steps with.

use bevy::prelude::*;

use crate::physics::{
    BodyHandle, CollisionQuery, CollisionTag, DynamicBodyDesc, PhysicsError, PhysicsWorld,
    PIXELS_PER_UNIT, probe_any,
};
use crate::player::{
    AnimationSheet, AnimationState, AnimationTicker, ContactFlags, ControllerInput, Facing,
    MovementState, MovementTuning, derive_animation_state,
};
use crate::portals::{PortalDescriptor, PortalHandle, PortalRegistry, detect_portal};

/// What the renderer needs to draw the player for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteFrame {
    /// Body centre in level pixels (y-down).
    pub position_px: Vec2,
    /// Source rectangle in the sprite sheet.
    pub rect: Rect,
    pub flip_x: bool,
}

#[derive(Component, Debug, Clone)]
pub struct PlayerController {
    body: Option<BodyHandle>,
    contacts: ContactFlags,
    was_on_floor: bool,
    movement: MovementState,
    animation: AnimationTicker,
    facing: Facing,
    jump_requested: bool,
    jump_buffer_timer: f32,
    coyote_timer: f32,
    current_portal: Option<PortalHandle>,
}

impl PlayerController {
    pub fn new(tuning: &MovementTuning) -> Self {
        Self {
            body: None,
            contacts: ContactFlags::default(),
            was_on_floor: false,
            movement: MovementState::Falling,
            animation: AnimationTicker::new(tuning.frame_duration),
            facing: Facing::Right,
            jump_requested: false,
            jump_buffer_timer: 0.0,
            coyote_timer: 0.0,
            current_portal: None,
        }
    }

    // -------------------------------------------------------------------------
    // Per-tick update
    // -------------------------------------------------------------------------

    /// Advance the controller by one fixed tick. A no-op without a body.
    pub fn update<W>(
        &mut self,
        dt: f32,
        input: ControllerInput,
        tuning: &MovementTuning,
        sheet: &AnimationSheet,
        world: &mut W,
    ) where
        W: PhysicsWorld + ?Sized,
    {
        let Some(body) = self.body else {
            return;
        };
        let (position, mut velocity) = match (world.position(body), world.velocity(body)) {
            (Ok(position), Ok(velocity)) => (position, velocity),
            // Bodies spawned this tick aren't visible to queries yet
            _ => return,
        };

        // 1. Timer decay. A request lives only as long as its buffer window.
        self.jump_buffer_timer = (self.jump_buffer_timer - dt).max(0.0);
        self.coyote_timer = (self.coyote_timer - dt).max(0.0);
        if self.jump_buffer_timer <= 0.0 {
            self.jump_requested = false;
        }

        // 2. Input latch
        if input.jump_pressed {
            self.jump_requested = true;
            self.jump_buffer_timer = tuning.jump_buffer_time;
        }

        // 3. Contact probes
        self.contacts = probe_contacts(&*world, position, tuning);
        let landed = self.contacts.floor && !self.was_on_floor;
        self.was_on_floor = self.contacts.floor;
        if self.contacts.floor {
            self.coyote_timer = tuning.coyote_time;
        }

        // 4. Portal probe
        let portal = detect_portal(&*world, position, tuning.portal_probe_half_extent);
        if portal != self.current_portal {
            debug!("[PLAYER] Portal contact changed: {:?}", portal);
        }
        self.current_portal = portal;

        // 5. Movement state
        let previous = self.movement;
        self.movement = MovementState::derive(self.contacts.floor, velocity.y);

        // 6. Horizontal movement. Only vx is touched, so walls never stop a fall.
        let direction = input.direction();
        if direction != 0.0 {
            self.facing = if direction < 0.0 { Facing::Left } else { Facing::Right };
        }
        if direction != 0.0 && !self.contacts.blocks(direction) {
            velocity.x = direction * tuning.move_speed;
        } else {
            velocity.x *= (1.0 - tuning.horizontal_damping * dt).max(0.0);
        }

        // 7. Jump
        let can_jump = self.contacts.floor || self.coyote_timer > 0.0;
        let requested_jump = self.jump_requested && can_jump;
        let buffered_landing = self.jump_buffer_timer > 0.0 && landed;
        if requested_jump || buffered_landing {
            velocity.y = -tuning.jump_speed;
            self.jump_requested = false;
            self.jump_buffer_timer = 0.0;
            self.coyote_timer = 0.0;
            self.movement = MovementState::Jumping;
            debug!("[PLAYER] Jump at ({:.2}, {:.2})", position.x, position.y);
        }

        if self.movement != previous {
            debug!("[PLAYER] {:?} -> {:?}", previous, self.movement);
        }

        if let Err(err) = world.set_velocity(body, velocity) {
            warn!("[PLAYER] Failed to write velocity: {}", err);
        }

        // 8. Animation state
        self.animation
            .set_state(derive_animation_state(self.movement, velocity, tuning));

        // 9. Frame advance
        let frame_count = sheet.frames(self.animation.state()).len();
        self.animation.advance(dt, frame_count);
    }

    // -------------------------------------------------------------------------
    // Host operations
    // -------------------------------------------------------------------------

    /// Move the body to `position` and drop all motion and jump state.
    ///
    /// Must run between solver steps. Without a body only the controller
    /// state is reset.
    pub fn teleport_to<W>(&mut self, world: &mut W, position: Vec2) -> Result<(), PhysicsError>
    where
        W: PhysicsWorld + ?Sized,
    {
        self.movement = MovementState::Falling;
        self.jump_requested = false;
        self.jump_buffer_timer = 0.0;
        self.coyote_timer = 0.0;
        self.current_portal = None;

        let Some(body) = self.body else {
            return Ok(());
        };
        world.set_velocity(body, Vec2::ZERO)?;
        world.set_transform(body, position, 0.0)?;
        debug!("[PLAYER] Teleported to ({:.2}, {:.2})", position.x, position.y);
        Ok(())
    }

    /// Attach the controller to a fresh body in `world` at `spawn`.
    ///
    /// Any previous body is released and all transient state returns to its
    /// initial value. Safe to call repeatedly and before the first level.
    pub fn reset_physics_for_level<W>(
        &mut self,
        world: &mut W,
        spawn: Vec2,
        tuning: &MovementTuning,
    ) -> Result<BodyHandle, PhysicsError>
    where
        W: PhysicsWorld + ?Sized,
    {
        if let Some(old) = self.body.take() {
            match world.destroy_body(old) {
                // Already gone when the whole world was destroyed
                Ok(()) | Err(PhysicsError::MissingBody(_)) => {}
                Err(err) => return Err(err),
            }
        }
        *self = Self::new(tuning);

        let body = world.create_dynamic_body(&DynamicBodyDesc {
            position: spawn,
            half_extents: tuning.body_half_extents(),
            fixed_rotation: true,
            allow_sleep: false,
            density: tuning.body_density,
            friction: tuning.body_friction,
        })?;
        self.body = Some(body);
        debug!("[PLAYER] Body {:?} created at ({:.2}, {:.2})", body, spawn.x, spawn.y);
        Ok(body)
    }

    /// Forget the body without touching the world. Used when the world that
    /// owned it has been destroyed.
    pub fn detach_body(&mut self) {
        self.body = None;
        self.current_portal = None;
    }

    pub fn position<W>(&self, world: &W) -> Option<Vec2>
    where
        W: PhysicsWorld + ?Sized,
    {
        world.position(self.body?).ok()
    }

    pub fn is_touching_portal(&self) -> bool {
        self.current_portal.is_some()
    }

    /// Portal the player currently overlaps. Resolves to `None` once the
    /// registry has moved on to another level.
    pub fn current_portal<'r>(&self, registry: &'r PortalRegistry) -> Option<&'r PortalDescriptor> {
        registry.get(self.current_portal?)
    }

    pub fn current_portal_handle(&self) -> Option<PortalHandle> {
        self.current_portal
    }

    pub fn reset_portal_status(&mut self) {
        self.current_portal = None;
    }

    /// Sprite placement for the current state, or `None` without a body.
    pub fn draw<W>(&self, world: &W, sheet: &AnimationSheet) -> Option<SpriteFrame>
    where
        W: PhysicsWorld + ?Sized,
    {
        let position = self.position(world)?;
        Some(SpriteFrame {
            position_px: position * PIXELS_PER_UNIT,
            rect: sheet.frame_rect(self.animation.state(), self.animation.frame()),
            flip_x: self.facing == Facing::Left,
        })
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    pub fn contacts(&self) -> ContactFlags {
        self.contacts
    }

    pub fn movement_state(&self) -> MovementState {
        self.movement
    }

    pub fn animation_state(&self) -> AnimationState {
        self.animation.state()
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn jump_requested(&self) -> bool {
        self.jump_requested
    }

    pub fn jump_buffer_timer(&self) -> f32 {
        self.jump_buffer_timer
    }

    pub fn coyote_timer(&self) -> f32 {
        self.coyote_timer
    }
}

/// Ray segments `(source, target)` of one contact probe pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeFans {
    pub floor: [(Vec2, Vec2); 3],
    pub left_wall: [(Vec2, Vec2); 3],
    pub right_wall: [(Vec2, Vec2); 3],
}

impl ProbeFans {
    /// Floor rays run straight down at lateral offsets of `-d, 0, +d`; wall
    /// rays run sideways at vertical offsets of `-d, 0, +d`. All start at the
    /// body centre line.
    pub fn around(position: Vec2, tuning: &MovementTuning) -> Self {
        let down = Vec2::new(0.0, tuning.floor_probe_length);
        let side = Vec2::new(tuning.wall_probe_length, 0.0);

        let floor = fan(tuning.floor_probe_spread).map(|dx| {
            let source = position + Vec2::new(dx, 0.0);
            (source, source + down)
        });
        let wall_sources =
            fan(tuning.wall_probe_spread).map(|dy| position + Vec2::new(0.0, dy));

        Self {
            floor,
            left_wall: wall_sources.map(|source| (source, source - side)),
            right_wall: wall_sources.map(|source| (source, source + side)),
        }
    }

    pub fn all(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.floor
            .iter()
            .chain(&self.left_wall)
            .chain(&self.right_wall)
            .copied()
    }
}

/// Cast the floor and wall fans. One solid hit in a fan sets its flag.
pub fn probe_contacts<Q>(query: &Q, position: Vec2, tuning: &MovementTuning) -> ContactFlags
where
    Q: CollisionQuery + ?Sized,
{
    let fans = ProbeFans::around(position, tuning);

    ContactFlags {
        floor: probe_any(query, fans.floor, CollisionTag::SolidBlock),
        left_wall: probe_any(query, fans.left_wall, CollisionTag::SolidBlock),
        right_wall: probe_any(query, fans.right_wall, CollisionTag::SolidBlock),
    }
}

fn fan(spread: f32) -> [f32; 3] {
    [-spread, 0.0, spread]
}
