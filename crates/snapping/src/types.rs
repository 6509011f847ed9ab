//! Snap records produced by the pipeline.

use bevy::math::{DVec3, Vec2};
use bevy::prelude::Entity;

use crate::geometry::SnapPlane;

// ---------------------------------------------------------------------------
// SnapType
// ---------------------------------------------------------------------------

/// Category of a snap. Lower values win in the arbiter, so the declaration
/// order is the priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SnapType {
    Vertex = 0,
    Intersection = 1,
    Projection = 2,
    MiddlePoint = 3,
    Edge = 4,
    Guide = 5,
    Face = 6,
}

impl SnapType {
    pub const ALL: [SnapType; 7] = [
        SnapType::Vertex,
        SnapType::Intersection,
        SnapType::Projection,
        SnapType::MiddlePoint,
        SnapType::Edge,
        SnapType::Guide,
        SnapType::Face,
    ];

    /// Snaps that can be held as a dwell anchor.
    pub fn is_anchorable(self) -> bool {
        matches!(
            self,
            SnapType::Vertex | SnapType::Intersection | SnapType::MiddlePoint
        )
    }

    /// Snaps that carry a segment and take part in intersection synthesis.
    pub fn is_linear(self) -> bool {
        matches!(self, SnapType::Edge | SnapType::Guide)
    }
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Coordinate axis of an axis guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Description of a snap. Resolved to user text by the host through `key()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapLabel {
    OnVertex,
    OnEdge,
    OnMiddlePoint,
    OnFace,
    OnProjectedVertex,
    OnEdgeFace,
    OnGuideFace,
    OnEdgeEdge,
    OnGuideEdge,
    OnAxis(Axis),
}

impl SnapLabel {
    /// Translation key of the label.
    pub fn key(self) -> &'static str {
        match self {
            SnapLabel::OnVertex => "label.on_vertex",
            SnapLabel::OnEdge => "label.on_edge",
            SnapLabel::OnMiddlePoint => "label.on_middle_point",
            SnapLabel::OnFace => "label.on_face",
            SnapLabel::OnProjectedVertex => "label.on_projected_vertex",
            SnapLabel::OnEdgeFace => "label.on_edge_face",
            SnapLabel::OnGuideFace => "label.on_guide_face",
            SnapLabel::OnEdgeEdge => "label.on_edge_edge",
            SnapLabel::OnGuideEdge => "label.on_guide_edge",
            SnapLabel::OnAxis(Axis::X) => "label.on_x_axis",
            SnapLabel::OnAxis(Axis::Y) => "label.on_y_axis",
            SnapLabel::OnAxis(Axis::Z) => "label.on_z_axis",
        }
    }
}

// ---------------------------------------------------------------------------
// Snap
// ---------------------------------------------------------------------------

/// World-space segment carried by edge and guide snaps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: DVec3,
    pub end: DVec3,
}

impl Segment {
    pub fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }

    pub fn midpoint(&self) -> DVec3 {
        (self.start + self.end) * 0.5
    }
}

/// World-space triangle hit by the pick ray, with its supporting plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceHit {
    pub triangle: [DVec3; 3],
    pub plane: SnapPlane,
}

/// A typed, located candidate point for one pointer sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Snap {
    pub snap_type: SnapType,
    pub label: SnapLabel,
    /// Scene object that produced the snap; `None` for guides, projections
    /// and auxiliary geometry.
    pub owner: Option<Entity>,
    /// Logical pixel position in the viewport.
    pub screen_position: Vec2,
    /// Distance to the pointer in logical pixels.
    pub screen_distance: f32,
    pub world_position: DVec3,
    /// Distance to the camera in world units.
    pub world_distance: f64,
    pub segment: Option<Segment>,
    pub face: Option<FaceHit>,
    pub normal: Option<DVec3>,
}

impl Snap {
    pub fn plane(&self) -> Option<&SnapPlane> {
        self.face.as_ref().map(|face| &face.plane)
    }

    /// Arbiter ordering key.
    pub fn priority(&self) -> (SnapType, f32) {
        (self.snap_type, self.screen_distance)
    }
}
