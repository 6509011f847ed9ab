//! Demo scene: a block, a floor plate with a hole, a circular profile, a cord
//! and a plain sphere mesh under one snap root.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;

use snapping::{
    CordShape, ProfileOutline, ProfileShape, SnapCamera, SnapRoot, SolidFace, SolidShape,
};

pub fn spawn_demo_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Camera3d::default(),
        SnapCamera,
        Transform::from_xyz(6.0, 6.0, 10.0).looking_at(Vec3::new(0.0, 0.5, 0.0), Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 6_000.0,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let face_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.78, 0.8, 0.84),
        cull_mode: None,
        double_sided: true,
        ..default()
    });
    let edge_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.15, 0.15, 0.18),
        unlit: true,
        ..default()
    });
    let sphere_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.7, 0.85),
        ..default()
    });

    let block = SolidShape::cuboid(Vec3::new(2.0, 1.0, 1.5));
    let plate = floor_plate();
    let solids = [
        (block, Transform::from_xyz(0.0, 0.5, 0.0)),
        (plate, Transform::IDENTITY),
    ];

    commands
        .spawn((SnapRoot, Transform::default(), Visibility::default()))
        .with_children(|root| {
            for (solid, transform) in solids {
                let (faces, edges) = solid_meshes(&solid);
                root.spawn((solid, transform, Visibility::default()))
                    .with_children(|parts| {
                        // render meshes come first; the snap traversal skips them
                        parts.spawn((
                            Mesh3d(meshes.add(faces)),
                            MeshMaterial3d(face_material.clone()),
                        ));
                        parts.spawn((
                            Mesh3d(meshes.add(edges)),
                            MeshMaterial3d(edge_material.clone()),
                        ));
                    });
            }

            root.spawn((
                ProfileShape::new(ProfileOutline::Circle { radius: 0.8 }, 24),
                Transform::from_xyz(-2.0, 0.01, -1.5)
                    .with_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
                Visibility::default(),
            ));

            root.spawn((
                CordShape::new(vec![
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(1.0, 1.5, 0.0),
                    Vec3::new(2.0, 1.5, 0.5),
                    Vec3::new(2.5, 0.5, 1.5),
                ]),
                Transform::from_xyz(1.5, 0.0, -2.0),
                Visibility::default(),
            ));

            root.spawn((
                Mesh3d(meshes.add(Sphere::new(0.5).mesh().uv(12, 8))),
                MeshMaterial3d(sphere_material),
                Transform::from_xyz(-2.0, 0.5, 1.5),
            ));
        });
}

/// Thin single-face plate on y = 0 with a square hole.
fn floor_plate() -> SolidShape {
    let vertices = vec![
        Vec3::new(-3.0, 0.0, 3.0),
        Vec3::new(3.0, 0.0, 3.0),
        Vec3::new(3.0, 0.0, -3.0),
        Vec3::new(-3.0, 0.0, -3.0),
        Vec3::new(1.8, 0.0, 2.2),
        Vec3::new(2.6, 0.0, 2.2),
        Vec3::new(2.6, 0.0, 1.4),
        Vec3::new(1.8, 0.0, 1.4),
    ];
    let face = SolidFace::with_holes(vec![0, 1, 2, 3], vec![vec![4, 5, 6, 7]]);
    SolidShape::new(vertices, vec![face], false)
}

/// Triangle mesh of the faces and line mesh of the face loops of `solid`.
fn solid_meshes(solid: &SolidShape) -> (Mesh, Mesh) {
    let vertex = |index: u32| solid.vertices().get(index as usize).map(|v| v.to_array());

    let triangles: Vec<[f32; 3]> = solid
        .face_triangles()
        .iter()
        .flatten()
        .flat_map(|triangle| triangle.iter().copied().filter_map(vertex))
        .collect();

    let mut lines = Vec::new();
    for face in solid.faces() {
        for indices in face.loops() {
            for (i, &start) in indices.iter().enumerate() {
                let end = indices[(i + 1) % indices.len()];
                if let (Some(a), Some(b)) = (vertex(start), vertex(end)) {
                    lines.extend([a, b]);
                }
            }
        }
    }

    let faces = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, triangles)
        .with_computed_flat_normals();
    let edges = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, lines);
    (faces, edges)
}
