//! Player domain: system modules.

pub(crate) mod controller;
#[cfg(feature = "dev-tools")]
pub(crate) mod debug;
pub(crate) mod input;
pub(crate) mod render;

pub(crate) use controller::run_player_controller;
#[cfg(feature = "dev-tools")]
pub(crate) use debug::draw_probe_gizmos;
pub(crate) use input::read_input;
pub(crate) use render::{spawn_player, sync_player_sprite};
