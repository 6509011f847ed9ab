//! Intersection synthesis: derives INTERSECTION candidates from pairs of
//! already accepted candidates.

use bevy::math::DVec3;
use bevy::prelude::Entity;

use crate::collector::SnapCollector;
use crate::config::LINE_INTERSECTION_EPSILON;
use crate::geometry::{closest_points_between_lines, PickRay};
use crate::types::{Snap, SnapLabel, SnapType};

struct PendingIntersection {
    owner: Option<Entity>,
    world: DVec3,
    label: SnapLabel,
    normal: Option<DVec3>,
}

fn same_owner(a: &Snap, b: &Snap) -> bool {
    a.owner.is_some() && a.owner == b.owner
}

/// Edge or guide `linear` against face `face`.
fn intersect_with_face(linear: &Snap, face: &Snap) -> Option<PendingIntersection> {
    let segment = linear.segment?;
    let hit = face.face?;
    if !hit.plane.crosses_segment(segment.start, segment.end) {
        return None;
    }
    let ray = PickRay::new(segment.start, segment.end - segment.start)?;
    let [a, b, c] = hit.triangle;
    let world = ray.intersect_triangle(a, b, c)?;
    let label = match linear.snap_type {
        SnapType::Edge => SnapLabel::OnEdgeFace,
        _ => SnapLabel::OnGuideFace,
    };
    Some(PendingIntersection {
        owner: face.owner.or(linear.owner),
        world,
        label,
        normal: face.normal,
    })
}

/// Edge or guide `linear` against edge `edge`, treated as infinite lines.
fn intersect_with_edge(linear: &Snap, edge: &Snap) -> Option<PendingIntersection> {
    let first = linear.segment?;
    let second = edge.segment?;
    let (p, q) = closest_points_between_lines(first.start, first.end, second.start, second.end)?;
    if p.distance(q) >= LINE_INTERSECTION_EPSILON {
        return None;
    }
    let label = match linear.snap_type {
        SnapType::Edge => SnapLabel::OnEdgeEdge,
        _ => SnapLabel::OnGuideEdge,
    };
    Some(PendingIntersection {
        owner: linear.owner.or(edge.owner),
        world: (p + q) * 0.5,
        label,
        normal: None,
    })
}

/// Scan every ordered pair of collected candidates and append the
/// intersections that pass the gate. New candidates are not paired again.
pub fn add_intersections(collector: &mut SnapCollector) {
    let mut pending = Vec::new();
    {
        let snaps = collector.snaps();
        for (i, first) in snaps.iter().enumerate() {
            if !first.snap_type.is_linear() {
                continue;
            }
            for (j, second) in snaps.iter().enumerate() {
                if i == j || same_owner(first, second) {
                    continue;
                }
                let found = match second.snap_type {
                    SnapType::Face => intersect_with_face(first, second),
                    // guide-guide pairs are never intersected
                    SnapType::Edge => intersect_with_edge(first, second),
                    _ => None,
                };
                pending.extend(found);
            }
        }
    }

    for intersection in pending {
        collector.add_intersection(
            intersection.owner,
            intersection.world,
            intersection.label,
            intersection.normal,
        );
    }
}
