//! Candidate collector: the single chokepoint every candidate goes through.
//!
//! A candidate is materialized only when its projection lies within the pick
//! radius of the pointer and no earlier candidate of the same type claimed the
//! same quantized world position.

use std::collections::HashSet;

use bevy::math::{DVec3, Vec2};
use bevy::prelude::Entity;

use crate::config::{DEDUP_QUANTUM, EDGE_RAY_DISTANCE_SQ};
use crate::geometry::{PickRay, SnapPlane};
use crate::types::{FaceHit, Segment, Snap, SnapLabel, SnapType};
use crate::view::SnapView;

/// Deduplication key: type plus world position quantized to 1e-4.
type SnapKey = (SnapType, i64, i64, i64);

fn snap_key(snap_type: SnapType, world: DVec3) -> SnapKey {
    let quantized = (world * DEDUP_QUANTUM).round();
    (
        snap_type,
        quantized.x as i64,
        quantized.y as i64,
        quantized.z as i64,
    )
}

/// Accumulates the candidates of one pointer sample.
pub struct SnapCollector<'a> {
    view: &'a SnapView,
    ray: PickRay,
    pointer: Vec2,
    pick_radius: f32,
    keys: HashSet<SnapKey>,
    snaps: Vec<Snap>,
}

impl<'a> SnapCollector<'a> {
    pub fn new(view: &'a SnapView, ray: PickRay, pointer: Vec2, pick_radius: f32) -> Self {
        Self {
            view,
            ray,
            pointer,
            pick_radius,
            keys: HashSet::new(),
            snaps: Vec::new(),
        }
    }

    pub fn ray(&self) -> &PickRay {
        &self.ray
    }

    pub fn snaps(&self) -> &[Snap] {
        &self.snaps
    }

    pub fn into_snaps(self) -> Vec<Snap> {
        self.snaps
    }

    /// Screen position and pointer distance of a world point, if inside the pick radius.
    fn gate(&self, world: DVec3) -> Option<(Vec2, f32)> {
        let screen = self.view.world_to_screen(world)?;
        let distance = screen.distance(self.pointer);
        (distance < self.pick_radius).then_some((screen, distance))
    }

    /// Claim the dedup key; `false` when an equal candidate already exists.
    fn claim(&mut self, snap_type: SnapType, world: DVec3) -> bool {
        self.keys.insert(snap_key(snap_type, world))
    }

    fn push(
        &mut self,
        snap_type: SnapType,
        label: SnapLabel,
        owner: Option<Entity>,
        world: DVec3,
        screen: (Vec2, f32),
    ) -> Option<&mut Snap> {
        if !self.claim(snap_type, world) {
            return None;
        }
        self.snaps.push(Snap {
            snap_type,
            label,
            owner,
            screen_position: screen.0,
            screen_distance: screen.1,
            world_position: world,
            world_distance: self.view.distance_to_camera(world),
            segment: None,
            face: None,
            normal: None,
        });
        self.snaps.last_mut()
    }

    /// Point candidate at a world position. Returns `true` when the point is
    /// within the pick radius, even if it was a duplicate.
    pub fn add_point(
        &mut self,
        owner: Option<Entity>,
        world: DVec3,
        label: SnapLabel,
        snap_type: SnapType,
    ) -> bool {
        let Some(screen) = self.gate(world) else {
            return false;
        };
        self.push(snap_type, label, owner, world, screen);
        true
    }

    /// Midpoint candidate followed by the edge candidate at the ray's closest
    /// point on the segment. Returns `true` when the edge itself was in range.
    pub fn add_edge(
        &mut self,
        owner: Option<Entity>,
        start: DVec3,
        end: DVec3,
        label: SnapLabel,
        snap_type: SnapType,
    ) -> bool {
        let segment = Segment::new(start, end);
        self.add_point(
            owner,
            segment.midpoint(),
            SnapLabel::OnMiddlePoint,
            SnapType::MiddlePoint,
        );

        let (distance_sq, on_segment) = self.ray.distance_sq_to_segment(start, end);
        if distance_sq >= EDGE_RAY_DISTANCE_SQ {
            return false;
        }
        let Some(screen) = self.gate(on_segment) else {
            return false;
        };
        if let Some(snap) = self.push(snap_type, label, owner, on_segment, screen) {
            snap.segment = Some(segment);
        }
        true
    }

    /// Face candidate where the pick ray hits `triangle`. Returns `true` on a
    /// hit so the caller can stop testing the face's other triangles.
    pub fn add_face(&mut self, owner: Option<Entity>, triangle: [DVec3; 3]) -> bool {
        let [a, b, c] = triangle;
        let Some(hit) = self.ray.intersect_triangle(a, b, c) else {
            return false;
        };
        let plane = SnapPlane::from_coplanar_points(a, b, c);
        // the face lies under the pointer by construction
        let screen = (self.pointer, 0.0);
        if let Some(snap) = self.push(SnapType::Face, SnapLabel::OnFace, owner, hit, screen) {
            snap.face = Some(FaceHit { triangle, plane });
            snap.normal = Some(plane.normal);
        }
        true
    }

    /// Synthesized intersection candidate.
    pub fn add_intersection(
        &mut self,
        owner: Option<Entity>,
        world: DVec3,
        label: SnapLabel,
        normal: Option<DVec3>,
    ) -> bool {
        let Some(screen) = self.gate(world) else {
            return false;
        };
        if let Some(snap) = self.push(SnapType::Intersection, label, owner, world, screen) {
            snap.normal = normal;
        }
        true
    }
}
