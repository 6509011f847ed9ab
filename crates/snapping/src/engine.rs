//! The per-sample pipeline: scene candidates, projection and auxiliary
//! candidates, axis guides, intersections, occlusion and normals.

use bevy::math::{DVec3, Vec2};

use crate::collector::SnapCollector;
use crate::error::SnapError;
use crate::filter::{SnapFilter, SnapSelection};
use crate::guides::AxisGuides;
use crate::normals::propagate_normals;
use crate::occlusion::filter_hidden;
use crate::scene::{collect_scene_snaps, SnapScene};
use crate::synthesis::add_intersections;
use crate::types::{Segment, Snap, SnapLabel, SnapType};
use crate::view::SnapView;

/// Everything besides the scene that shapes the candidate list of a sample.
#[derive(Debug, Clone, Copy)]
pub struct SnapQuery<'a> {
    pub filter: &'a SnapFilter,
    pub selection: &'a SnapSelection,
    pub pick_radius: f32,
    /// Held snap whose axis projections are offered.
    pub anchor: Option<&'a Snap>,
    pub guides: Option<&'a AxisGuides>,
    pub auxiliary_points: &'a [DVec3],
    pub auxiliary_lines: &'a [Segment],
}

impl<'a> SnapQuery<'a> {
    pub fn new(filter: &'a SnapFilter, selection: &'a SnapSelection, pick_radius: f32) -> Self {
        Self {
            filter,
            selection,
            pick_radius,
            anchor: None,
            guides: None,
            auxiliary_points: &[],
            auxiliary_lines: &[],
        }
    }
}

/// All candidates for a pointer position, in pipeline order.
pub fn find_snaps<S: SnapScene + ?Sized>(
    scene: &S,
    view: &SnapView,
    pointer: Vec2,
    query: &SnapQuery,
) -> Result<Vec<Snap>, SnapError> {
    let root = scene.root().ok_or(SnapError::MissingRoot)?;
    let ray = view
        .pick_ray(pointer)
        .ok_or(SnapError::DegenerateProjection)?;
    let mut collector = SnapCollector::new(view, ray, pointer, query.pick_radius);

    collect_scene_snaps(scene, root, query.filter, query.selection, &mut collector);

    if let (Some(anchor), Some(guides)) = (query.anchor, query.guides) {
        for point in guides.projections(anchor.world_position) {
            collector.add_point(
                None,
                point,
                SnapLabel::OnProjectedVertex,
                SnapType::Projection,
            );
        }
    }

    for &point in query.auxiliary_points {
        collector.add_point(None, point, SnapLabel::OnVertex, SnapType::Vertex);
    }
    for line in query.auxiliary_lines {
        collector.add_edge(None, line.start, line.end, SnapLabel::OnEdge, SnapType::Edge);
    }

    if let Some(guides) = query.guides {
        for guide in guides.guides() {
            collector.add_edge(
                None,
                guide.segment.start,
                guide.segment.end,
                guide.label(),
                SnapType::Guide,
            );
        }
    }

    add_intersections(&mut collector);

    let mut snaps = collector.into_snaps();
    filter_hidden(&mut snaps);
    propagate_normals(&mut snaps);
    Ok(snaps)
}
