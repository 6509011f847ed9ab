//! Priority arbiter: picks the single snap reported for a sample.

use crate::types::Snap;

/// The candidate with the best `(type, screen distance)` key. On ties the
/// earliest candidate wins.
pub fn select_relevant_snap(snaps: &[Snap]) -> Option<&Snap> {
    let mut best: Option<&Snap> = None;
    for snap in snaps {
        let better = match best {
            None => true,
            Some(current) => {
                snap.snap_type < current.snap_type
                    || (snap.snap_type == current.snap_type
                        && snap.screen_distance < current.screen_distance)
            }
        };
        if better {
            best = Some(snap);
        }
    }
    best
}
