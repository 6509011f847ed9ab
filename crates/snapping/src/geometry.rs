//! World-space geometric primitives used by the snap pipeline.
//!
//! Everything here works in `f64`: axis guides are a thousand units long and
//! the edge/edge intersection test needs 1e-4 precision along them.

use bevy::math::{DMat4, DVec3};

// ---------------------------------------------------------------------------
// Pick ray
// ---------------------------------------------------------------------------

/// A half-line starting at `origin`; `direction` is kept normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl PickRay {
    /// Build a ray, returning `None` for a zero or non-finite direction.
    pub fn new(origin: DVec3, direction: DVec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Squared distance from the ray (not the line) to `point`.
    pub fn distance_sq_to_point(&self, point: DVec3) -> f64 {
        let t = (point - self.origin).dot(self.direction);
        if t < 0.0 {
            return self.origin.distance_squared(point);
        }
        self.at(t).distance_squared(point)
    }

    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        self.distance_sq_to_point(sphere.center) <= sphere.radius * sphere.radius
    }

    /// Squared distance between the ray and segment `v0`-`v1`, together with
    /// the closest point on the segment.
    pub fn distance_sq_to_segment(&self, v0: DVec3, v1: DVec3) -> (f64, DVec3) {
        let seg_center = (v0 + v1) * 0.5;
        let seg_dir = (v1 - v0).normalize_or_zero();
        let seg_extent = v0.distance(v1) * 0.5;
        let diff = self.origin - seg_center;

        let a01 = -self.direction.dot(seg_dir);
        let b0 = diff.dot(self.direction);
        let b1 = -diff.dot(seg_dir);
        let c = diff.length_squared();
        let det = (1.0 - a01 * a01).abs();

        let (s1, sqr_dist) = if det > 0.0 {
            let mut s0 = a01 * b1 - b0;
            let mut s1 = a01 * b0 - b1;
            let ext_det = seg_extent * det;

            let sqr_dist = if s0 >= 0.0 {
                if s1 >= -ext_det {
                    if s1 <= ext_det {
                        // interior of the segment, interior of the ray
                        let inv_det = 1.0 / det;
                        s0 *= inv_det;
                        s1 *= inv_det;
                        s0 * (s0 + a01 * s1 + 2.0 * b0) + s1 * (a01 * s0 + s1 + 2.0 * b1) + c
                    } else {
                        s1 = seg_extent;
                        s0 = (-(a01 * s1 + b0)).max(0.0);
                        -s0 * s0 + s1 * (s1 + 2.0 * b1) + c
                    }
                } else {
                    s1 = -seg_extent;
                    s0 = (-(a01 * s1 + b0)).max(0.0);
                    -s0 * s0 + s1 * (s1 + 2.0 * b1) + c
                }
            } else if s1 <= -ext_det {
                s0 = (-(-a01 * seg_extent + b0)).max(0.0);
                s1 = if s0 > 0.0 {
                    -seg_extent
                } else {
                    (-b1).clamp(-seg_extent, seg_extent)
                };
                -s0 * s0 + s1 * (s1 + 2.0 * b1) + c
            } else if s1 <= ext_det {
                s1 = (-b1).clamp(-seg_extent, seg_extent);
                s1 * (s1 + 2.0 * b1) + c
            } else {
                s0 = (-(a01 * seg_extent + b0)).max(0.0);
                s1 = if s0 > 0.0 {
                    seg_extent
                } else {
                    (-b1).clamp(-seg_extent, seg_extent)
                };
                -s0 * s0 + s1 * (s1 + 2.0 * b1) + c
            };
            (s1, sqr_dist)
        } else {
            // ray and segment are parallel
            let s1 = if a01 > 0.0 { -seg_extent } else { seg_extent };
            let s0 = (-(a01 * s1 + b0)).max(0.0);
            (s1, -s0 * s0 + s1 * (s1 + 2.0 * b1) + c)
        };

        (sqr_dist.max(0.0), seg_center + seg_dir * s1)
    }

    /// Double-sided ray/triangle intersection.
    pub fn intersect_triangle(&self, a: DVec3, b: DVec3, c: DVec3) -> Option<DVec3> {
        let edge1 = b - a;
        let edge2 = c - a;
        let normal = edge1.cross(edge2);

        let mut d_dot_n = self.direction.dot(normal);
        let sign = if d_dot_n > 0.0 {
            1.0
        } else if d_dot_n < 0.0 {
            d_dot_n = -d_dot_n;
            -1.0
        } else {
            return None;
        };

        let diff = self.origin - a;
        let d_dot_q_x_e2 = sign * self.direction.dot(diff.cross(edge2));
        if d_dot_q_x_e2 < 0.0 {
            return None;
        }
        let d_dot_e1_x_q = sign * self.direction.dot(edge1.cross(diff));
        if d_dot_e1_x_q < 0.0 {
            return None;
        }
        if d_dot_q_x_e2 + d_dot_e1_x_q > d_dot_n {
            return None;
        }

        let q_dot_n = -sign * diff.dot(normal);
        if q_dot_n < 0.0 {
            return None;
        }
        Some(self.at(q_dot_n / d_dot_n))
    }
}

// ---------------------------------------------------------------------------
// Plane
// ---------------------------------------------------------------------------

/// Plane in Hessian normal form: `normal · p + constant = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPlane {
    pub normal: DVec3,
    pub constant: f64,
}

impl SnapPlane {
    /// Plane through three points; the normal follows the a-b-c winding.
    pub fn from_coplanar_points(a: DVec3, b: DVec3, c: DVec3) -> Self {
        let normal = (c - b).cross(a - b).normalize_or_zero();
        Self {
            normal,
            constant: -a.dot(normal),
        }
    }

    pub fn distance_to_point(&self, point: DVec3) -> f64 {
        self.normal.dot(point) + self.constant
    }

    /// True when the segment's endpoints lie strictly on opposite sides.
    pub fn crosses_segment(&self, start: DVec3, end: DVec3) -> bool {
        let start_sign = self.distance_to_point(start);
        let end_sign = self.distance_to_point(end);
        (start_sign < 0.0 && end_sign > 0.0) || (end_sign < 0.0 && start_sign > 0.0)
    }
}

// ---------------------------------------------------------------------------
// Bounding sphere
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: DVec3,
    pub radius: f64,
}

impl BoundingSphere {
    /// Sphere centered on the points' bounding box, enclosing every point.
    pub fn from_points(points: impl Iterator<Item = DVec3> + Clone) -> Self {
        let mut min = DVec3::splat(f64::INFINITY);
        let mut max = DVec3::splat(f64::NEG_INFINITY);
        let mut any = false;
        for point in points.clone() {
            min = min.min(point);
            max = max.max(point);
            any = true;
        }
        if !any {
            return Self {
                center: DVec3::ZERO,
                radius: 0.0,
            };
        }

        let center = (min + max) * 0.5;
        let radius_sq = points
            .map(|point| center.distance_squared(point))
            .fold(0.0_f64, f64::max);
        Self {
            center,
            radius: radius_sq.sqrt(),
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            center: self.center,
            radius: self.radius * factor,
        }
    }

    /// Apply an affine world transform; the radius grows with the largest axis scale.
    pub fn transformed(&self, matrix: &DMat4) -> Self {
        Self {
            center: matrix.transform_point3(self.center),
            radius: self.radius * max_axis_scale(matrix),
        }
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Largest scale factor along any axis of an affine matrix.
pub fn max_axis_scale(matrix: &DMat4) -> f64 {
    let sx = matrix.x_axis.truncate().length_squared();
    let sy = matrix.y_axis.truncate().length_squared();
    let sz = matrix.z_axis.truncate().length_squared();
    sx.max(sy).max(sz).sqrt()
}

/// Closest points between the infinite lines through `a0`-`a1` and `b0`-`b1`.
/// Returns `None` for parallel or degenerate lines.
pub fn closest_points_between_lines(
    a0: DVec3,
    a1: DVec3,
    b0: DVec3,
    b1: DVec3,
) -> Option<(DVec3, DVec3)> {
    let d1 = a1 - a0;
    let d2 = b1 - b0;
    let r = a0 - b0;

    let a = d1.length_squared();
    let e = d2.length_squared();
    if a <= f64::EPSILON || e <= f64::EPSILON {
        return None;
    }

    let b = d1.dot(d2);
    let c = d1.dot(r);
    let f = d2.dot(r);
    let denom = a * e - b * b;
    if denom <= 1e-12 * a * e {
        return None;
    }

    let s = (b * f - c * e) / denom;
    let t = (a * f - b * c) / denom;
    Some((a0 + d1 * s, b0 + d2 * t))
}

/// Newell normal of a closed polygon; robust for non-convex loops.
pub fn newell_normal(points: &[DVec3]) -> DVec3 {
    let mut normal = DVec3::ZERO;
    for (i, current) in points.iter().enumerate() {
        let next = points[(i + 1) % points.len()];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal.normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray_down_z(x: f64, y: f64) -> PickRay {
        PickRay::new(DVec3::new(x, y, 10.0), DVec3::NEG_Z).unwrap()
    }

    #[test]
    fn test_ray_rejects_zero_direction() {
        assert!(PickRay::new(DVec3::ZERO, DVec3::ZERO).is_none());
    }

    #[test]
    fn test_triangle_hit_both_sides() {
        let a = DVec3::new(0.0, 0.0, 0.0);
        let b = DVec3::new(1.0, 0.0, 0.0);
        let c = DVec3::new(0.0, 1.0, 0.0);
        let hit = ray_down_z(0.25, 0.25).intersect_triangle(a, b, c).unwrap();
        assert!((hit - DVec3::new(0.25, 0.25, 0.0)).length() < 1e-12);
        // reversed winding still hits
        assert!(ray_down_z(0.25, 0.25).intersect_triangle(a, c, b).is_some());
    }

    #[test]
    fn test_triangle_miss_outside() {
        let a = DVec3::new(0.0, 0.0, 0.0);
        let b = DVec3::new(1.0, 0.0, 0.0);
        let c = DVec3::new(0.0, 1.0, 0.0);
        assert!(ray_down_z(0.75, 0.75).intersect_triangle(a, b, c).is_none());
    }

    #[test]
    fn test_triangle_behind_ray_is_missed() {
        let ray = PickRay::new(DVec3::new(0.2, 0.2, -1.0), DVec3::NEG_Z).unwrap();
        let hit = ray.intersect_triangle(DVec3::ZERO, DVec3::X, DVec3::Y);
        assert!(hit.is_none());
    }

    #[test]
    fn test_segment_distance_crossing() {
        let ray = ray_down_z(0.5, 0.0);
        let (dist_sq, on_segment) =
            ray.distance_sq_to_segment(DVec3::new(0.0, 0.0, 0.0), DVec3::new(1.0, 0.0, 0.0));
        assert!(dist_sq < 1e-12);
        assert!((on_segment - DVec3::new(0.5, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_segment_distance_clamps_to_endpoint() {
        let ray = ray_down_z(3.0, 0.0);
        let (dist_sq, on_segment) =
            ray.distance_sq_to_segment(DVec3::new(0.0, 0.0, 0.0), DVec3::new(1.0, 0.0, 0.0));
        assert!((dist_sq - 4.0).abs() < 1e-9);
        assert!((on_segment - DVec3::new(1.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_segment_distance_parallel() {
        let ray = PickRay::new(DVec3::new(0.0, 1.0, 0.0), DVec3::X).unwrap();
        let (dist_sq, _) =
            ray.distance_sq_to_segment(DVec3::new(2.0, 0.0, 0.0), DVec3::new(4.0, 0.0, 0.0));
        assert!((dist_sq - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_plane_from_points_and_distance() {
        let plane = SnapPlane::from_coplanar_points(
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(1.0, 0.0, 1.0),
            DVec3::new(0.0, 1.0, 1.0),
        );
        assert!((plane.normal - DVec3::Z).length() < 1e-12);
        assert!((plane.distance_to_point(DVec3::new(5.0, 5.0, 3.0)) - 2.0).abs() < 1e-12);
        assert!(plane.crosses_segment(DVec3::ZERO, DVec3::new(0.0, 0.0, 2.0)));
        assert!(!plane.crosses_segment(DVec3::ZERO, DVec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_closest_points_perpendicular_lines() {
        let (p1, p2) = closest_points_between_lines(
            DVec3::new(-0.5, 0.0, 0.0),
            DVec3::new(0.5, 0.0, 0.0),
            DVec3::new(0.0, -0.5, 0.0),
            DVec3::new(0.0, 0.5, 0.0),
        )
        .unwrap();
        assert!(p1.length() < 1e-12);
        assert!(p2.length() < 1e-12);
    }

    #[test]
    fn test_closest_points_skew_lines() {
        let (p1, p2) = closest_points_between_lines(
            DVec3::new(-1.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, -1.0, 1.0),
            DVec3::new(0.0, 1.0, 1.0),
        )
        .unwrap();
        assert!((p1.distance(p2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_closest_points_parallel_is_none() {
        let result = closest_points_between_lines(
            DVec3::ZERO,
            DVec3::X,
            DVec3::Y,
            DVec3::new(1.0, 1.0, 0.0),
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_bounding_sphere_and_ray() {
        let sphere = BoundingSphere::from_points(
            [DVec3::new(-1.0, -1.0, -1.0), DVec3::new(1.0, 1.0, 1.0)].into_iter(),
        );
        assert!(sphere.center.length() < 1e-12);
        assert!((sphere.radius - 3.0_f64.sqrt()).abs() < 1e-12);
        assert!(ray_down_z(1.5, 0.0).intersects_sphere(&sphere));
        assert!(!ray_down_z(3.0, 0.0).intersects_sphere(&sphere));
    }

    #[test]
    fn test_bounding_sphere_transform_scales_radius() {
        let sphere = BoundingSphere {
            center: DVec3::ZERO,
            radius: 1.0,
        };
        let matrix = DMat4::from_scale_rotation_translation(
            DVec3::new(1.0, 3.0, 2.0),
            bevy::math::DQuat::IDENTITY,
            DVec3::new(5.0, 0.0, 0.0),
        );
        let world = sphere.transformed(&matrix);
        assert!((world.center - DVec3::new(5.0, 0.0, 0.0)).length() < 1e-12);
        assert!((world.radius - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_newell_normal_square() {
        let square = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ];
        assert!((newell_normal(&square) - DVec3::Z).length() < 1e-12);
    }
}
