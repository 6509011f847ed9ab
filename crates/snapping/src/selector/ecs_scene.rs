//! ECS adapter: exposes the Bevy world to the engine through [`SnapScene`].

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::render::mesh::VertexAttributeValues;
use bevy::render::primitives::Aabb;

use crate::geometry::BoundingSphere;
use crate::scene::{SceneNode, ShapeRef, SnapScene};
use crate::shapes::{CordShape, ProfileShape, SolidShape};

/// Marks the entity whose subtree is searched for snaps.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SnapRoot;

/// Marks the camera whose view drives the point selector.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SnapCamera;

type NodeData = (
    &'static GlobalTransform,
    Option<&'static InheritedVisibility>,
    Option<&'static SolidShape>,
    Option<&'static ProfileShape>,
    Option<&'static CordShape>,
    Option<&'static Mesh3d>,
    Option<&'static Aabb>,
);

#[derive(SystemParam)]
pub struct EcsSnapScene<'w, 's> {
    roots: Query<'w, 's, Entity, With<SnapRoot>>,
    nodes: Query<'w, 's, NodeData>,
    children: Query<'w, 's, &'static Children>,
    parents: Query<'w, 's, &'static Parent>,
    meshes: Option<Res<'w, Assets<Mesh>>>,
}

impl EcsSnapScene<'_, '_> {
    fn mesh_positions(&self, mesh: &Mesh3d) -> Option<&[[f32; 3]]> {
        let mesh = self.meshes.as_ref()?.get(&mesh.0)?;
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION)? {
            VertexAttributeValues::Float32x3(positions) => Some(positions.as_slice()),
            _ => None,
        }
    }
}

/// Sphere around the mesh bounds Bevy maintains for culling.
fn aabb_sphere(aabb: &Aabb) -> BoundingSphere {
    BoundingSphere {
        center: aabb.center.as_dvec3(),
        radius: aabb.half_extents.length() as f64,
    }
}

impl SnapScene for EcsSnapScene<'_, '_> {
    fn root(&self) -> Option<Entity> {
        self.roots.iter().next()
    }

    fn children(&self, entity: Entity) -> &[Entity] {
        self.children
            .get(entity)
            .map(|children| &**children)
            .unwrap_or(&[])
    }

    fn parent(&self, entity: Entity) -> Option<Entity> {
        self.parents.get(entity).ok().map(Parent::get)
    }

    fn node(&self, entity: Entity) -> Option<SceneNode<'_>> {
        let (transform, visibility, solid, profile, cord, mesh, aabb) =
            self.nodes.get(entity).ok()?;
        let shape = if let Some(solid) = solid {
            Some(ShapeRef::Solid(solid))
        } else if let Some(profile) = profile {
            Some(ShapeRef::Profile(profile))
        } else if let Some(cord) = cord {
            Some(ShapeRef::Cord(cord))
        } else {
            mesh.and_then(|mesh| self.mesh_positions(mesh))
                .map(|positions| ShapeRef::Points {
                    positions,
                    bounds: aabb.map(aabb_sphere),
                })
        };
        Some(SceneNode {
            world: transform.compute_matrix().as_dmat4(),
            visible: visibility.map_or(true, |visibility| visibility.get()),
            shape,
        })
    }
}
