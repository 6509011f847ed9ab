//! Geometry read contract: the shape components the extractors understand.
//!
//! Shapes are owned by the host scene. The engine only reads them; the
//! bounding sphere and face triangulations are derived data cached on first
//! use and dropped by the setters that change the geometry.

use std::sync::OnceLock;

use bevy::log::debug;
use bevy::math::{DVec3, Vec2, Vec3};
use bevy::prelude::Component;

use crate::geometry::{newell_normal, BoundingSphere};

// ---------------------------------------------------------------------------
// Solid
// ---------------------------------------------------------------------------

/// A planar face of a solid: an outer loop plus optional holes, as indices
/// into the solid's vertex list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolidFace {
    pub outer_loop: Vec<u32>,
    pub holes: Vec<Vec<u32>>,
}

impl SolidFace {
    pub fn new(outer_loop: Vec<u32>) -> Self {
        Self {
            outer_loop,
            holes: Vec::new(),
        }
    }

    pub fn with_holes(outer_loop: Vec<u32>, holes: Vec<Vec<u32>>) -> Self {
        Self { outer_loop, holes }
    }

    /// Outer loop followed by every hole.
    pub fn loops(&self) -> impl Iterator<Item = &[u32]> {
        std::iter::once(self.outer_loop.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }

    /// Ear-clip the face against `vertices`, keeping the outer loop's winding.
    /// The face is projected onto the coordinate plane most aligned with its
    /// normal. Faces referencing missing vertices yield no triangles.
    pub fn triangulate(&self, vertices: &[Vec3]) -> Vec<[u32; 3]> {
        let position = |index: u32| vertices.get(index as usize).map(|v| v.as_dvec3());

        let Some(outer) = self
            .outer_loop
            .iter()
            .map(|&index| position(index))
            .collect::<Option<Vec<DVec3>>>()
        else {
            debug!("face references a vertex outside the solid, skipping triangulation");
            return Vec::new();
        };
        if outer.len() < 3 {
            return Vec::new();
        }

        let normal = newell_normal(&outer);
        if self.holes.is_empty() && outer.len() == 3 {
            let loop_ = &self.outer_loop;
            return vec![[loop_[0], loop_[1], loop_[2]]];
        }

        // drop the dominant axis of the normal
        let abs = normal.abs();
        let (u, v) = if abs.x >= abs.y && abs.x >= abs.z {
            (1, 2)
        } else if abs.y >= abs.z {
            (2, 0)
        } else {
            (0, 1)
        };

        let mut indices: Vec<u32> = Vec::new();
        let mut points: Vec<DVec3> = Vec::new();
        let mut flat: Vec<f64> = Vec::new();
        let mut hole_starts: Vec<usize> = Vec::new();
        for (loop_index, loop_) in self.loops().enumerate() {
            if loop_index > 0 {
                hole_starts.push(indices.len());
            }
            for &index in loop_ {
                let Some(point) = position(index) else {
                    debug!("hole references a vertex outside the solid, skipping triangulation");
                    return Vec::new();
                };
                indices.push(index);
                points.push(point);
                flat.push(point[u]);
                flat.push(point[v]);
            }
        }

        let triangulation = match earcutr::earcut(&flat, &hole_starts, 2) {
            Ok(triangulation) => triangulation,
            Err(err) => {
                debug!("face triangulation failed: {err:?}");
                return Vec::new();
            }
        };

        triangulation
            .chunks_exact(3)
            .map(|tri| {
                let [a, b, c] = [indices[tri[0]], indices[tri[1]], indices[tri[2]]];
                let [pa, pb, pc] = [points[tri[0]], points[tri[1]], points[tri[2]]];
                // earcut does not preserve winding; match the loop's normal
                if (pb - pa).cross(pc - pa).dot(normal) < 0.0 {
                    [a, c, b]
                } else {
                    [a, b, c]
                }
            })
            .collect()
    }
}

/// Boundary-represented solid: vertices plus planar faces with holes.
///
/// Geometry is only reachable through setters so the cached bounds and
/// triangulations are dropped whenever it changes.
#[derive(Component, Debug, Clone)]
pub struct SolidShape {
    vertices: Vec<Vec3>,
    faces: Vec<SolidFace>,
    /// Every internal edge borders exactly two loops.
    pub manifold: bool,
    pub faces_visible: bool,
    pub edges_visible: bool,
    bounds: OnceLock<BoundingSphere>,
    triangles: OnceLock<Vec<Vec<[u32; 3]>>>,
}

impl SolidShape {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<SolidFace>, manifold: bool) -> Self {
        Self {
            vertices,
            faces,
            manifold,
            faces_visible: true,
            edges_visible: true,
            bounds: OnceLock::new(),
            triangles: OnceLock::new(),
        }
    }

    pub fn with_visibility(mut self, faces_visible: bool, edges_visible: bool) -> Self {
        self.faces_visible = faces_visible;
        self.edges_visible = edges_visible;
        self
    }

    /// Axis-aligned box centered on the local origin, faces wound outwards.
    pub fn cuboid(size: Vec3) -> Self {
        let h = size * 0.5;
        let vertices = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        let faces = [
            [0, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [3, 7, 6, 2],
            [0, 4, 7, 3],
            [1, 2, 6, 5],
        ]
        .into_iter()
        .map(|loop_| SolidFace::new(loop_.to_vec()))
        .collect();
        Self::new(vertices, faces, true)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[SolidFace] {
        &self.faces
    }

    pub fn set_vertices(&mut self, vertices: Vec<Vec3>) {
        self.vertices = vertices;
        self.bounds = OnceLock::new();
        self.triangles = OnceLock::new();
    }

    pub fn set_faces(&mut self, faces: Vec<SolidFace>) {
        self.faces = faces;
        self.triangles = OnceLock::new();
    }

    /// Replace the whole boundary at once.
    pub fn set_geometry(&mut self, vertices: Vec<Vec3>, faces: Vec<SolidFace>) {
        self.set_vertices(vertices);
        self.set_faces(faces);
    }

    /// Local bounding sphere, computed on first use.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        *self
            .bounds
            .get_or_init(|| BoundingSphere::from_points(self.vertices.iter().map(|v| v.as_dvec3())))
    }

    /// Triangles of every face, in face order, computed on first use.
    pub fn face_triangles(&self) -> &[Vec<[u32; 3]>] {
        self.triangles.get_or_init(|| {
            self.faces
                .iter()
                .map(|face| face.triangulate(&self.vertices))
                .collect()
        })
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Planar outline of a profile, in the profile's local XY plane.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileOutline {
    /// Explicit polygon vertices.
    Polygon(Vec<Vec2>),
    /// Rectangle centered on the origin.
    Rectangle { width: f32, height: f32 },
    /// Circle centered on the origin, sampled at the profile's divisions.
    Circle { radius: f32 },
    /// Ellipse centered on the origin, sampled at the profile's divisions.
    Ellipse { x_radius: f32, y_radius: f32 },
}

/// Parametric 2D profile lying on z = 0 of its local frame.
#[derive(Component, Debug, Clone)]
pub struct ProfileShape {
    outline: ProfileOutline,
    /// Number of samples for curved outlines.
    divisions: u32,
    bounds: OnceLock<BoundingSphere>,
}

impl ProfileShape {
    pub fn new(outline: ProfileOutline, divisions: u32) -> Self {
        Self {
            outline,
            divisions,
            bounds: OnceLock::new(),
        }
    }

    pub fn outline(&self) -> &ProfileOutline {
        &self.outline
    }

    pub fn divisions(&self) -> u32 {
        self.divisions
    }

    pub fn set_outline(&mut self, outline: ProfileOutline) {
        self.outline = outline;
        self.bounds = OnceLock::new();
    }

    pub fn set_divisions(&mut self, divisions: u32) {
        self.divisions = divisions;
        self.bounds = OnceLock::new();
    }

    /// Sample the outline into a closed polygon; the closing edge is implicit.
    pub fn points(&self) -> Vec<Vec2> {
        let divisions = self.divisions.max(3);
        let ellipse = |rx: f32, ry: f32| {
            (0..divisions)
                .map(|i| {
                    let angle = std::f32::consts::TAU * i as f32 / divisions as f32;
                    Vec2::new(rx * angle.cos(), ry * angle.sin())
                })
                .collect()
        };
        match &self.outline {
            ProfileOutline::Polygon(points) => {
                let mut points = points.clone();
                if points.len() > 1 && points.first() == points.last() {
                    points.pop();
                }
                points
            }
            ProfileOutline::Rectangle { width, height } => {
                let (hw, hh) = (width * 0.5, height * 0.5);
                vec![
                    Vec2::new(-hw, -hh),
                    Vec2::new(hw, -hh),
                    Vec2::new(hw, hh),
                    Vec2::new(-hw, hh),
                ]
            }
            ProfileOutline::Circle { radius } => ellipse(*radius, *radius),
            ProfileOutline::Ellipse { x_radius, y_radius } => ellipse(*x_radius, *y_radius),
        }
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        *self.bounds.get_or_init(|| {
            let points = self.points();
            BoundingSphere::from_points(points.iter().map(|p| p.extend(0.0).as_dvec3()))
        })
    }
}

// ---------------------------------------------------------------------------
// Cord
// ---------------------------------------------------------------------------

/// Open polyline.
#[derive(Component, Debug, Clone)]
pub struct CordShape {
    points: Vec<Vec3>,
    bounds: OnceLock<BoundingSphere>,
}

impl CordShape {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            points,
            bounds: OnceLock::new(),
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn set_points(&mut self, points: Vec<Vec3>) {
        self.points = points;
        self.bounds = OnceLock::new();
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        *self
            .bounds
            .get_or_init(|| BoundingSphere::from_points(self.points.iter().map(|v| v.as_dvec3())))
    }
}
