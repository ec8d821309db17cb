//! Portals domain: per-level descriptor registry with generation-checked handles.

use bevy::prelude::*;

/// Where a portal leads. Immutable once registered.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalDescriptor {
    pub destination_level: String,
    /// Arrival point in the destination level, level space.
    pub destination: Vec2,
}

/// Non-owning reference to a registered portal.
///
/// Resolves only while the level that registered it is loaded; after the
/// registry is cleared the handle resolves to `None` instead of dangling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortalHandle {
    generation: u32,
    index: u32,
}

/// Portals of the currently loaded level.
#[derive(Resource, Debug, Default)]
pub struct PortalRegistry {
    generation: u32,
    level_id: Option<String>,
    portals: Vec<PortalDescriptor>,
}

impl PortalRegistry {
    /// Drop the previous level's portals and start registering for `level_id`.
    pub fn begin_level(&mut self, level_id: impl Into<String>) {
        self.clear();
        self.level_id = Some(level_id.into());
    }

    pub fn register(&mut self, destination_level: impl Into<String>, destination: Vec2) -> PortalHandle {
        let index = self.portals.len() as u32;
        self.portals.push(PortalDescriptor {
            destination_level: destination_level.into(),
            destination,
        });
        PortalHandle {
            generation: self.generation,
            index,
        }
    }

    pub fn get(&self, handle: PortalHandle) -> Option<&PortalDescriptor> {
        if handle.generation != self.generation {
            return None;
        }
        self.portals.get(handle.index as usize)
    }

    pub fn is_live(&self, handle: PortalHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Invalidate every handle issued so far.
    pub fn clear(&mut self) {
        self.portals.clear();
        self.level_id = None;
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn level_id(&self) -> Option<&str> {
        self.level_id.as_deref()
    }

    pub fn len(&self) -> usize {
        self.portals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portals.is_empty()
    }
}

/// Attaches a registered portal to its sensor body.
#[derive(Component, Debug, Clone, Copy)]
pub struct PortalLink(PortalHandle);

impl PortalLink {
    pub fn new(handle: PortalHandle) -> Self {
        Self(handle)
    }

    pub fn handle(&self) -> PortalHandle {
        self.0
    }
}
