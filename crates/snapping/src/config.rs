//! Engine constants and runtime settings.
//!
//! The tolerances below are expressed in world units unless noted. Several of
//! them look alike but guard different things; keep them separate.

use serde::{Deserialize, Serialize};

/// Default pick radius in logical (device-independent) pixels.
pub const DEFAULT_PICK_RADIUS: f32 = 16.0;

/// Default time a stable snap must be held before it becomes a projection anchor.
pub const DEFAULT_DWELL_THRESHOLD_MS: u64 = 500;

/// Default screen offset applied to touch pointers so the finger does not hide the snap.
pub const DEFAULT_TOUCH_OFFSET: [f32; 2] = [-40.0, -40.0];

/// Quantization factor for the deduplication key (1e-4 world units).
pub const DEDUP_QUANTUM: f64 = 10_000.0;

/// Maximum squared distance between the pick ray and a segment for an edge snap.
pub const EDGE_RAY_DISTANCE_SQ: f64 = 0.1;

/// Bounding spheres are enlarged by this factor before the ray pre-test.
pub const BOUNDING_SPHERE_SCALE: f64 = 1.2;

/// Maximum separation between two lines for them to count as intersecting.
pub const LINE_INTERSECTION_EPSILON: f64 = 1e-4;

/// Candidates this far behind the nearest face plane are hidden.
pub const OCCLUSION_EPSILON: f64 = 1e-4;

/// Candidates this close to a face plane inherit its normal.
pub const COPLANAR_EPSILON: f64 = 1e-6;

/// World length of each half of an axis guide.
pub const AXIS_GUIDE_LENGTH: f64 = 1000.0;

/// Leading children of a solid that hold its render meshes, not user geometry.
pub const SOLID_INTERNAL_CHILDREN: usize = 2;

/// Runtime configuration of a point selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    /// Maximum screen distance (logical pixels) between pointer and candidate.
    pub pick_radius: f32,
    /// Dwell time before a vertex/intersection/midpoint becomes a projection anchor.
    pub dwell_threshold_ms: u64,
    /// Offset added to touch pointer positions.
    pub touch_offset: [f32; 2],
    /// Keep the raw candidate list of the last sample.
    pub debug: bool,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            pick_radius: DEFAULT_PICK_RADIUS,
            dwell_threshold_ms: DEFAULT_DWELL_THRESHOLD_MS,
            touch_offset: DEFAULT_TOUCH_OFFSET,
            debug: false,
        }
    }
}
