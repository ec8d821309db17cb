//! Levels domain: level definitions as authored in `levels.ron`.
//!
//! Everything here is in level pixels, y-down, the way the level editor
//! exports it. Conversion to physics units happens through the helpers.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashSet;

use crate::physics::PIXELS_PER_UNIT;

/// Point in level pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

impl PixelPoint {
    pub fn to_units(self) -> Vec2 {
        Vec2::new(self.x, self.y) / PIXELS_PER_UNIT
    }
}

/// Axis-aligned rectangle in level pixels, anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn center_units(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5) / PIXELS_PER_UNIT
    }

    pub fn half_extents_units(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5 / PIXELS_PER_UNIT
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PortalDef {
    pub rect: PixelRect,
    pub destination_level: String,
    /// Arrival point in the destination level.
    pub destination: PixelPoint,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LevelDef {
    pub id: String,
    pub width: f32,
    pub height: f32,
    /// Player spawn, centre of the spawn marker.
    pub spawn: PixelPoint,
    #[serde(default)]
    pub solids: Vec<PixelRect>,
    #[serde(default)]
    pub portals: Vec<PortalDef>,
}

impl LevelDef {
    pub fn size_units(&self) -> Vec2 {
        Vec2::new(self.width, self.height) / PIXELS_PER_UNIT
    }

    pub fn spawn_units(&self) -> Vec2 {
        self.spawn.to_units()
    }
}

/// All levels shipped with the game.
#[derive(Resource, Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LevelCatalog {
    /// Level loaded at startup. Defaults to the first listed level.
    pub start: Option<String>,
    pub levels: Vec<LevelDef>,
}

impl LevelCatalog {
    pub fn get(&self, id: &str) -> Option<&LevelDef> {
        self.levels.iter().find(|level| level.id == id)
    }

    pub fn start_level(&self) -> Option<&LevelDef> {
        match &self.start {
            Some(id) => self.get(id),
            None => self.levels.first(),
        }
    }

    /// Problems that would break play: duplicate ids, dangling portal
    /// destinations, spawns outside their level.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen = HashSet::new();

        if let Some(start) = &self.start {
            if self.get(start).is_none() {
                problems.push(format!("start level '{}' does not exist", start));
            }
        }

        for level in &self.levels {
            if !seen.insert(level.id.as_str()) {
                problems.push(format!("duplicate level id '{}'", level.id));
            }

            let spawn = level.spawn;
            if spawn.x < 0.0 || spawn.y < 0.0 || spawn.x > level.width || spawn.y > level.height {
                problems.push(format!("level '{}' spawn is outside the level", level.id));
            }

            for portal in &level.portals {
                match self.get(&portal.destination_level) {
                    None => problems.push(format!(
                        "level '{}' has a portal to unknown level '{}'",
                        level.id, portal.destination_level
                    )),
                    Some(destination) => {
                        let arrival = portal.destination;
                        if arrival.x < 0.0
                            || arrival.y < 0.0
                            || arrival.x > destination.width
                            || arrival.y > destination.height
                        {
                            problems.push(format!(
                                "level '{}' has a portal arriving outside '{}'",
                                level.id, destination.id
                            ));
                        }
                    }
                }
            }
        }

        problems
    }
}
