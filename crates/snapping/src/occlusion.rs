//! Occlusion filter: hides candidates behind the nearest face under the pointer.

use crate::config::OCCLUSION_EPSILON;
use crate::types::{Snap, SnapType};

/// Drop every candidate lying behind the plane of the face candidate closest
/// to the camera. Without face candidates nothing is hidden.
pub fn filter_hidden(snaps: &mut Vec<Snap>) {
    let Some(plane) = snaps
        .iter()
        .filter(|snap| snap.snap_type == SnapType::Face)
        .min_by(|a, b| a.world_distance.total_cmp(&b.world_distance))
        .and_then(|face| face.plane().copied())
    else {
        return;
    };
    snaps.retain(|snap| plane.distance_to_point(snap.world_position) >= -OCCLUSION_EPSILON);
}
