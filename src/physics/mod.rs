//! Physics domain: avian2d setup, world adapter and spatial queries.

mod layers;
mod query;
mod world;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests;

pub use layers::{CollisionTag, GameLayer};
pub use query::{CollisionQuery, RayHit, RegionHit, has_tag, probe_any};
pub use world::{
    AvianWorld, BodyHandle, DynamicBodyDesc, PhysicsError, PhysicsWorld, WorldState,
};

use avian2d::prelude::*;
use bevy::prelude::*;

/// Level data is authored in pixels; physics runs in units of this many pixels.
pub const PIXELS_PER_UNIT: f32 = 8.0;

/// Fixed stepping parameters for the solver.
///
/// The controller reads the same fixed delta, so jump and coyote windows stay
/// in lockstep with body motion.
#[derive(Resource, Debug, Clone)]
pub struct PhysicsStepping {
    pub hz: f64,
    pub substeps: u32,
    /// Level-space gravity (+y is down).
    pub gravity: Vec2,
}

impl Default for PhysicsStepping {
    fn default() -> Self {
        Self {
            hz: 60.0,
            substeps: 4,
            gravity: Vec2::new(0.0, 60.0),
        }
    }
}

impl PhysicsStepping {
    pub fn fixed_dt(&self) -> f32 {
        (1.0 / self.hz) as f32
    }
}

pub struct WorldPhysicsPlugin {
    /// Draw avian's collider overlay. Needs the render stack, so headless
    /// apps turn it off.
    pub debug_overlay: bool,
}

impl Default for WorldPhysicsPlugin {
    fn default() -> Self {
        Self {
            debug_overlay: cfg!(feature = "dev-tools"),
        }
    }
}

impl Plugin for WorldPhysicsPlugin {
    fn build(&self, app: &mut App) {
        let stepping = PhysicsStepping::default();
        info!(
            "[PHYSICS] Fixed step {:.4}s, {} substeps",
            stepping.fixed_dt(),
            stepping.substeps
        );

        app.add_plugins(PhysicsPlugins::default())
            .insert_resource(Time::<Fixed>::from_hz(stepping.hz))
            .insert_resource(SubstepCount(stepping.substeps))
            // avian is y-up, level space is y-down
            .insert_resource(Gravity(Vec2::new(stepping.gravity.x, -stepping.gravity.y)))
            .insert_resource(stepping)
            .init_resource::<WorldState>();

        if self.debug_overlay {
            app.add_plugins(PhysicsDebugPlugin::default());
        }
    }
}
