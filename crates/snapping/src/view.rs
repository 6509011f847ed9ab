//! Screen projector: maps world points into the viewport and pointer
//! positions back into pick rays.

use bevy::math::{DMat4, DVec2, DVec3, DVec4, Vec2};

use crate::error::SnapError;
use crate::geometry::PickRay;

/// Camera snapshot for one pointer sample.
///
/// Screen coordinates are logical pixels with the origin at the top-left
/// corner of the viewport and y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapView {
    clip_from_world: DMat4,
    world_from_clip: DMat4,
    camera_position: DVec3,
    viewport_size: Vec2,
}

impl SnapView {
    pub fn new(
        clip_from_world: DMat4,
        camera_position: DVec3,
        viewport_size: Vec2,
    ) -> Result<Self, SnapError> {
        if !(viewport_size.x > 0.0 && viewport_size.y > 0.0) || !viewport_size.is_finite() {
            return Err(SnapError::InvalidViewport {
                width: viewport_size.x,
                height: viewport_size.y,
            });
        }
        let determinant = clip_from_world.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            return Err(SnapError::DegenerateProjection);
        }
        Ok(Self {
            clip_from_world,
            world_from_clip: clip_from_world.inverse(),
            camera_position,
            viewport_size,
        })
    }

    /// Build a view from a camera's projection and its world transform.
    pub fn from_camera(
        clip_from_view: DMat4,
        world_from_view: DMat4,
        viewport_size: Vec2,
    ) -> Result<Self, SnapError> {
        let camera_position = world_from_view.w_axis.truncate();
        Self::new(
            clip_from_view * world_from_view.inverse(),
            camera_position,
            viewport_size,
        )
    }

    pub fn camera_position(&self) -> DVec3 {
        self.camera_position
    }

    pub fn viewport_size(&self) -> Vec2 {
        self.viewport_size
    }

    /// Project a world point to viewport coordinates. Points behind the
    /// camera have no screen position.
    pub fn world_to_screen(&self, world: DVec3) -> Option<Vec2> {
        let clip = self.clip_from_world * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let size = self.viewport_size.as_dvec2();
        let screen = DVec2::new(0.5 * size.x * (ndc.x + 1.0), 0.5 * size.y * (1.0 - ndc.y));
        Some(screen.as_vec2())
    }

    pub fn distance_to_camera(&self, world: DVec3) -> f64 {
        world.distance(self.camera_position)
    }

    /// World ray through a viewport position.
    ///
    /// The ray runs through two unprojected depths so it works with both
    /// standard and reversed-depth projections; its origin is the point on
    /// that line at the camera's depth, which is the camera itself for a
    /// perspective projection.
    pub fn pick_ray(&self, pointer: Vec2) -> Option<PickRay> {
        let size = self.viewport_size.as_dvec2();
        let pointer = pointer.as_dvec2();
        let ndc = DVec2::new(pointer.x / size.x * 2.0 - 1.0, 1.0 - pointer.y / size.y * 2.0);

        let near = self.unproject(ndc, 0.25)?;
        let far = self.unproject(ndc, 0.75)?;
        let mut direction = (far - near).try_normalize()?;
        if direction.dot(near - self.camera_position) < 0.0 {
            direction = -direction;
        }
        let origin = near + direction * direction.dot(self.camera_position - near);
        PickRay::new(origin, direction)
    }

    fn unproject(&self, ndc: DVec2, depth: f64) -> Option<DVec3> {
        let world = self.world_from_clip * DVec4::new(ndc.x, ndc.y, depth, 1.0);
        if world.w.abs() <= f64::EPSILON {
            return None;
        }
        let point = world.truncate() / world.w;
        point.is_finite().then_some(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_view() -> SnapView {
        let eye = DVec3::new(0.0, 0.0, 5.0);
        let view_from_world = DMat4::look_at_rh(eye, DVec3::ZERO, DVec3::Y);
        let clip_from_view =
            DMat4::perspective_rh(std::f64::consts::FRAC_PI_4, 800.0 / 600.0, 0.1, 100.0);
        SnapView::new(
            clip_from_view * view_from_world,
            eye,
            Vec2::new(800.0, 600.0),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_empty_viewport() {
        let result = SnapView::new(DMat4::IDENTITY, DVec3::ZERO, Vec2::new(0.0, 600.0));
        assert!(matches!(result, Err(SnapError::InvalidViewport { .. })));
    }

    #[test]
    fn test_rejects_singular_projection() {
        let result = SnapView::new(DMat4::ZERO, DVec3::ZERO, Vec2::new(800.0, 600.0));
        assert_eq!(result, Err(SnapError::DegenerateProjection));
    }

    #[test]
    fn test_origin_projects_to_center() {
        let screen = test_view().world_to_screen(DVec3::ZERO).unwrap();
        assert!((screen - Vec2::new(400.0, 300.0)).length() < 1e-3);
    }

    #[test]
    fn test_up_is_screen_up() {
        let screen = test_view().world_to_screen(DVec3::new(0.0, 1.0, 0.0)).unwrap();
        assert!(screen.y < 300.0);
    }

    #[test]
    fn test_point_behind_camera_does_not_project() {
        assert!(test_view()
            .world_to_screen(DVec3::new(0.0, 0.0, 10.0))
            .is_none());
    }

    #[test]
    fn test_pick_ray_round_trip() {
        let view = test_view();
        let target = DVec3::new(0.7, -0.4, 0.3);
        let screen = view.world_to_screen(target).unwrap();
        let ray = view.pick_ray(screen).unwrap();
        assert!((ray.origin - view.camera_position()).length() < 1e-6);
        assert!(ray.distance_sq_to_point(target) < 1e-6);
    }

    #[test]
    fn test_from_camera_matches_look_at() {
        let eye = DVec3::new(0.0, 0.0, 5.0);
        let world_from_view = DMat4::look_at_rh(eye, DVec3::ZERO, DVec3::Y).inverse();
        let clip_from_view =
            DMat4::perspective_rh(std::f64::consts::FRAC_PI_4, 800.0 / 600.0, 0.1, 100.0);
        let view =
            SnapView::from_camera(clip_from_view, world_from_view, Vec2::new(800.0, 600.0))
                .unwrap();
        assert!((view.camera_position() - eye).length() < 1e-9);
        let probe = DVec3::new(0.5, 0.5, 0.0);
        let a = view.world_to_screen(probe).unwrap();
        let b = test_view().world_to_screen(probe).unwrap();
        assert!((a - b).length() < 1e-3);
    }
}
