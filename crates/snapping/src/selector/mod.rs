//! Bevy integration of the point selector.
//!
//! `SnapPlugin` registers the [`SelectorState`] resource and the systems that
//! turn window cursor and touch events, in arrival order, into
//! [`SnapUpdated`] events. The host marks its scene root with [`SnapRoot`]
//! and its camera with [`SnapCamera`].

mod ecs_scene;
mod state;
mod systems;


pub use ecs_scene::{EcsSnapScene, SnapCamera, SnapRoot};
pub use state::SelectorState;
pub use systems::{handle_pointer_events, sync_snap_view, SnapPlugin, SnapUpdated, SnapViewport};
