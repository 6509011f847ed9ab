//! Normal propagation from face candidates to coplanar point candidates.

use crate::config::COPLANAR_EPSILON;
use crate::types::{Snap, SnapType};

fn takes_face_normal(snap_type: SnapType) -> bool {
    matches!(
        snap_type,
        SnapType::Vertex | SnapType::Edge | SnapType::Intersection
    )
}

/// Copy each face's normal to the vertex, edge and intersection candidates of
/// other owners lying on the face's plane. Later faces overwrite earlier ones.
pub fn propagate_normals(snaps: &mut [Snap]) {
    let faces: Vec<_> = snaps
        .iter()
        .filter(|snap| snap.snap_type == SnapType::Face)
        .filter_map(|snap| Some((snap.owner, *snap.plane()?, snap.normal)))
        .collect();

    for (owner, plane, normal) in faces {
        for snap in snaps.iter_mut() {
            if snap.owner == owner || !takes_face_normal(snap.snap_type) {
                continue;
            }
            if plane.distance_to_point(snap.world_position).abs() < COPLANAR_EPSILON {
                snap.normal = normal;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::{DVec3, Vec2};
    use bevy::prelude::Entity;

    use super::*;
    use crate::geometry::SnapPlane;
    use crate::types::{FaceHit, SnapLabel};

    fn snap(snap_type: SnapType, owner: Option<Entity>, world: DVec3) -> Snap {
        Snap {
            snap_type,
            label: SnapLabel::OnVertex,
            owner,
            screen_position: Vec2::ZERO,
            screen_distance: 0.0,
            world_position: world,
            world_distance: 1.0,
            segment: None,
            face: None,
            normal: None,
        }
    }

    fn floor(owner: Option<Entity>) -> Snap {
        let triangle = [DVec3::ZERO, DVec3::X, DVec3::Y];
        let plane = SnapPlane::from_coplanar_points(DVec3::ZERO, DVec3::X, DVec3::Y);
        Snap {
            face: Some(FaceHit { triangle, plane }),
            normal: Some(plane.normal),
            ..snap(SnapType::Face, owner, DVec3::ZERO)
        }
    }

    #[test]
    fn test_coplanar_candidates_of_other_owners_get_normal() {
        let wall = Some(Entity::from_raw(1));
        let column = Some(Entity::from_raw(2));
        let mut snaps = vec![
            floor(wall),
            snap(SnapType::Vertex, column, DVec3::new(3.0, 4.0, 0.0)),
            snap(SnapType::Edge, None, DVec3::new(1.0, 1.0, 0.0)),
            snap(SnapType::MiddlePoint, column, DVec3::new(1.0, 1.0, 0.0)),
            snap(SnapType::Vertex, column, DVec3::new(1.0, 1.0, 0.5)),
            snap(SnapType::Vertex, wall, DVec3::new(2.0, 2.0, 0.0)),
        ];
        propagate_normals(&mut snaps);

        assert_eq!(snaps[1].normal, Some(DVec3::Z));
        assert_eq!(snaps[2].normal, Some(DVec3::Z));
        // midpoints never take a face normal
        assert_eq!(snaps[3].normal, None);
        // off the plane
        assert_eq!(snaps[4].normal, None);
        // same owner as the face
        assert_eq!(snaps[5].normal, None);
    }

    #[test]
    fn test_ownerless_face_skips_ownerless_candidates() {
        let mut snaps = vec![floor(None), snap(SnapType::Vertex, None, DVec3::X)];
        propagate_normals(&mut snaps);
        assert_eq!(snaps[1].normal, None);
    }
}
