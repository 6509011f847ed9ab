//! Geometry candidate extractors, one per shape kind.
//!
//! Every extractor works in local space and transforms to world space before
//! handing candidates to the collector, which does the gating.

use bevy::math::{DMat4, DVec3, Vec3};
use bevy::prelude::Entity;

use crate::collector::SnapCollector;
use crate::config::BOUNDING_SPHERE_SCALE;
use crate::geometry::BoundingSphere;
use crate::shapes::{CordShape, ProfileShape, SolidShape};
use crate::types::{SnapLabel, SnapType};

/// Ray pre-test against the enlarged, world-transformed local bounding sphere.
pub fn ray_hits_bounds(collector: &SnapCollector, local: BoundingSphere, world: &DMat4) -> bool {
    let sphere = local.scaled(BOUNDING_SPHERE_SCALE).transformed(world);
    collector.ray().intersects_sphere(&sphere)
}

fn to_world(world: &DMat4, local: Vec3) -> DVec3 {
    world.transform_point3(local.as_dvec3())
}

fn add_vertex(collector: &mut SnapCollector, owner: Entity, world: DVec3) {
    collector.add_point(Some(owner), world, SnapLabel::OnVertex, SnapType::Vertex);
}

fn add_edge(collector: &mut SnapCollector, owner: Entity, start: DVec3, end: DVec3) {
    collector.add_edge(Some(owner), start, end, SnapLabel::OnEdge, SnapType::Edge);
}

// ---------------------------------------------------------------------------
// Solid
// ---------------------------------------------------------------------------

pub fn extract_solid(
    collector: &mut SnapCollector,
    owner: Entity,
    world: &DMat4,
    solid: &SolidShape,
) {
    if !ray_hits_bounds(collector, solid.bounding_sphere(), world) {
        return;
    }
    let vertices: Vec<DVec3> = solid.vertices().iter().map(|&v| to_world(world, v)).collect();

    if solid.faces_visible || solid.edges_visible {
        for &vertex in &vertices {
            add_vertex(collector, owner, vertex);
        }
        extract_solid_edges(collector, owner, solid, &vertices);
    }
    if solid.faces_visible {
        extract_solid_faces(collector, owner, solid, &vertices);
    }
}

/// Vertex index pairs of the loop edges a solid contributes. On a manifold
/// solid every edge is shared by two loops walking it in opposite directions,
/// so only the ascending one is kept.
pub fn solid_edge_indices(solid: &SolidShape) -> impl Iterator<Item = (u32, u32)> + '_ {
    solid
        .faces()
        .iter()
        .flat_map(|face| face.loops())
        .flat_map(|loop_| {
            let size = loop_.len();
            (0..size).map(move |i| (loop_[i], loop_[(i + 1) % size]))
        })
        .filter(move |&(index1, index2)| !solid.manifold || index1 < index2)
}

fn extract_solid_edges(
    collector: &mut SnapCollector,
    owner: Entity,
    solid: &SolidShape,
    vertices: &[DVec3],
) {
    for (index1, index2) in solid_edge_indices(solid) {
        let (Some(&start), Some(&end)) =
            (vertices.get(index1 as usize), vertices.get(index2 as usize))
        else {
            continue;
        };
        add_edge(collector, owner, start, end);
    }
}

fn extract_solid_faces(
    collector: &mut SnapCollector,
    owner: Entity,
    solid: &SolidShape,
    vertices: &[DVec3],
) {
    let position = |index: u32| vertices.get(index as usize).copied();
    for triangles in solid.face_triangles() {
        for &[a, b, c] in triangles {
            let (Some(pa), Some(pb), Some(pc)) = (position(a), position(b), position(c)) else {
                continue;
            };
            if collector.add_face(Some(owner), [pa, pb, pc]) {
                break;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Profile, cord, mesh
// ---------------------------------------------------------------------------

pub fn extract_profile(
    collector: &mut SnapCollector,
    owner: Entity,
    world: &DMat4,
    profile: &ProfileShape,
) {
    if !ray_hits_bounds(collector, profile.bounding_sphere(), world) {
        return;
    }
    let points: Vec<DVec3> = profile
        .points()
        .into_iter()
        .map(|p| to_world(world, p.extend(0.0)))
        .collect();
    for (i, &start) in points.iter().enumerate() {
        let end = points[(i + 1) % points.len()];
        add_vertex(collector, owner, start);
        add_edge(collector, owner, start, end);
    }
}

pub fn extract_cord(
    collector: &mut SnapCollector,
    owner: Entity,
    world: &DMat4,
    cord: &CordShape,
) {
    if !ray_hits_bounds(collector, cord.bounding_sphere(), world) {
        return;
    }
    let points: Vec<DVec3> = cord.points().iter().map(|&p| to_world(world, p)).collect();
    for pair in points.windows(2) {
        add_vertex(collector, owner, pair[0]);
        add_edge(collector, owner, pair[0], pair[1]);
    }
    if let Some(&last) = points.last() {
        add_vertex(collector, owner, last);
    }
}

/// Vertex candidates for a generic triangle mesh. `bounds` are the local
/// bounds the host keeps for the mesh; without them they are computed here.
pub fn extract_mesh_vertices(
    collector: &mut SnapCollector,
    owner: Entity,
    world: &DMat4,
    positions: &[[f32; 3]],
    bounds: Option<BoundingSphere>,
) {
    let local = bounds.unwrap_or_else(|| {
        BoundingSphere::from_points(positions.iter().map(|&p| Vec3::from(p).as_dvec3()))
    });
    if !ray_hits_bounds(collector, local, world) {
        return;
    }
    for &position in positions {
        add_vertex(collector, owner, to_world(world, Vec3::from(position)));
    }
}
