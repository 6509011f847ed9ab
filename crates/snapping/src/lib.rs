//! Interactive snap engine.
//!
//! Given a camera, a pointer position and a scene of solids, profiles, cords
//! and plain meshes, finds the geometrically meaningful point under the
//! pointer: a vertex, an edge midpoint, an edge, a face, the crossing of two
//! of those, or the projection of a held point onto a set of axis guides.
//!
//! [`engine::find_snaps`] is the pure pipeline; [`SnapPlugin`] wires it to
//! Bevy input events.

pub mod arbiter;
pub mod collector;
pub mod config;
pub mod dwell;
pub mod engine;
pub mod error;
pub mod extract;
pub mod filter;
pub mod geometry;
pub mod guides;
pub mod normals;
pub mod occlusion;
pub mod scene;
pub mod selector;
pub mod shapes;
pub mod synthesis;
pub mod types;
pub mod view;

pub use config::SnapSettings;
pub use error::SnapError;
pub use filter::{SnapFilter, SnapSelection, TraversalDirective};
pub use selector::{SelectorState, SnapCamera, SnapPlugin, SnapRoot, SnapUpdated, SnapViewport};
pub use shapes::{CordShape, ProfileOutline, ProfileShape, SolidFace, SolidShape};
pub use types::{Axis, Segment, Snap, SnapLabel, SnapType};
pub use view::SnapView;
