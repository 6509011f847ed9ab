//! Axis guides: three long lines through a reference frame that act as
//! snap targets and as the basis for projection candidates.

use bevy::math::{DMat4, DVec3};

use crate::config::AXIS_GUIDE_LENGTH;
use crate::geometry::max_axis_scale;
use crate::types::{Axis, Segment, SnapLabel};

/// One guide line along a local axis of the governing transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisGuide {
    pub axis: Axis,
    pub start_local: DVec3,
    pub end_local: DVec3,
    /// World segment, rescaled so the guide spans the whole scene.
    pub segment: Segment,
}

impl AxisGuide {
    fn new(axis: Axis) -> Self {
        let direction = match axis {
            Axis::X => DVec3::X,
            Axis::Y => DVec3::Y,
            Axis::Z => DVec3::Z,
        };
        Self {
            axis,
            start_local: -direction,
            end_local: direction,
            segment: Segment::new(DVec3::ZERO, DVec3::ZERO),
        }
    }

    pub fn label(&self) -> SnapLabel {
        SnapLabel::OnAxis(self.axis)
    }
}

/// Reference frame for axis guides and projection candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisGuides {
    transform: DMat4,
    inverse: DMat4,
    /// Whether the host should draw the guides.
    pub visible: bool,
    guides: [AxisGuide; 3],
}

impl AxisGuides {
    /// Guides through `transform`. Returns `None` for a singular transform.
    pub fn new(transform: DMat4, visible: bool) -> Option<Self> {
        let determinant = transform.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            return None;
        }
        let factor = AXIS_GUIDE_LENGTH / max_axis_scale(&transform);
        let scaled = transform * DMat4::from_scale(DVec3::splat(factor));

        let mut guides = [Axis::X, Axis::Y, Axis::Z].map(AxisGuide::new);
        for guide in &mut guides {
            guide.segment = Segment::new(
                scaled.transform_point3(guide.start_local),
                scaled.transform_point3(guide.end_local),
            );
        }
        Some(Self {
            transform,
            inverse: transform.inverse(),
            visible,
            guides,
        })
    }

    pub fn transform(&self) -> &DMat4 {
        &self.transform
    }

    pub fn guides(&self) -> &[AxisGuide; 3] {
        &self.guides
    }

    /// The six axis-aligned projections of a world point: onto each axis and
    /// onto each coordinate plane of the frame, in world space.
    pub fn projections(&self, world: DVec3) -> [DVec3; 6] {
        let local = self.inverse.transform_point3(world);
        [
            DVec3::new(local.x, 0.0, 0.0),
            DVec3::new(0.0, local.y, 0.0),
            DVec3::new(0.0, 0.0, local.z),
            DVec3::new(0.0, local.y, local.z),
            DVec3::new(local.x, 0.0, local.z),
            DVec3::new(local.x, local.y, 0.0),
        ]
        .map(|point| self.transform.transform_point3(point))
    }
}
