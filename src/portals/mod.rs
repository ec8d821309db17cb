//! Portals domain: portal descriptors and sensor detection.

mod detection;
mod registry;


pub use detection::{detect_portal, portal_probe_aabb};
pub use registry::{PortalDescriptor, PortalHandle, PortalLink, PortalRegistry};

use bevy::prelude::*;

pub struct PortalsPlugin;

impl Plugin for PortalsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PortalRegistry>();
    }
}
