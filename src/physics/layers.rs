//! Physics domain: collision layers and query tags.

use avian2d::prelude::*;
use bevy::prelude::*;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Level geometry the player stands on and walks into
    Solid,
    /// Portal sensors - never block movement
    Portal,
    /// The player's dynamic body
    Player,
}

/// Classification attached to a body when it is created.
///
/// Tags exist purely for query filtering: a probe asks "is the thing I hit
/// the category I'm looking for", nothing more.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionTag {
    SolidBlock,
    PortalEntry,
}
