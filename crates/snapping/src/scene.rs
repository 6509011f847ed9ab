//! Read-only scene access and the filtered traversal that feeds the extractors.

use std::collections::HashSet;

use bevy::math::DMat4;
use bevy::prelude::Entity;

use crate::collector::SnapCollector;
use crate::config::SOLID_INTERNAL_CHILDREN;
use crate::extract;
use crate::filter::{FilterInput, SnapFilter, SnapSelection};
use crate::geometry::BoundingSphere;
use crate::shapes::{CordShape, ProfileShape, SolidShape};

/// Geometry attached to a scene node.
#[derive(Debug, Clone, Copy)]
pub enum ShapeRef<'a> {
    Solid(&'a SolidShape),
    Profile(&'a ProfileShape),
    Cord(&'a CordShape),
    /// Vertex positions of a generic mesh, with the local bounds the host
    /// already keeps for it, if any.
    Points {
        positions: &'a [[f32; 3]],
        bounds: Option<BoundingSphere>,
    },
}

/// Per-sample view of one scene node.
#[derive(Debug, Clone, Copy)]
pub struct SceneNode<'a> {
    pub world: DMat4,
    pub visible: bool,
    pub shape: Option<ShapeRef<'a>>,
}

/// Hierarchy and geometry the engine reads. Implemented over the ECS by the
/// selector and over plain data in tests.
pub trait SnapScene {
    fn root(&self) -> Option<Entity>;

    fn children(&self, entity: Entity) -> &[Entity];

    fn parent(&self, entity: Entity) -> Option<Entity>;

    fn node(&self, entity: Entity) -> Option<SceneNode<'_>>;
}

/// Strict ancestors of `entity`.
pub fn ancestors<S: SnapScene + ?Sized>(scene: &S, entity: Entity) -> HashSet<Entity> {
    let mut result = HashSet::new();
    let mut current = scene.parent(entity);
    while let Some(parent) = current {
        // a malformed hierarchy must not loop forever
        if !result.insert(parent) {
            break;
        }
        current = scene.parent(parent);
    }
    result
}

/// Depth-first walk from `root` running the extractors on every object the
/// filter asks to test.
pub fn collect_scene_snaps<S: SnapScene + ?Sized>(
    scene: &S,
    root: Entity,
    filter: &SnapFilter,
    selection: &SnapSelection,
    collector: &mut SnapCollector,
) {
    let selection_ancestors = match selection.primary() {
        Some(primary) if filter.uses_selection_ancestors() => ancestors(scene, primary),
        _ => HashSet::new(),
    };

    let mut stack = vec![root];
    while let Some(entity) = stack.pop() {
        let Some(node) = scene.node(entity) else {
            continue;
        };
        let directive = filter.evaluate(&FilterInput {
            entity,
            visible: node.visible,
            selection,
            is_selection_ancestor: selection_ancestors.contains(&entity),
        });

        if directive.tests() {
            match node.shape {
                Some(ShapeRef::Solid(solid)) => {
                    extract::extract_solid(collector, entity, &node.world, solid)
                }
                Some(ShapeRef::Profile(profile)) => {
                    extract::extract_profile(collector, entity, &node.world, profile)
                }
                Some(ShapeRef::Cord(cord)) => {
                    extract::extract_cord(collector, entity, &node.world, cord)
                }
                Some(ShapeRef::Points { positions, bounds }) => extract::extract_mesh_vertices(
                    collector,
                    entity,
                    &node.world,
                    positions,
                    bounds,
                ),
                None => {}
            }
        }

        if directive.descends() {
            let skip = match node.shape {
                Some(ShapeRef::Solid(_)) => SOLID_INTERNAL_CHILDREN,
                _ => 0,
            };
            let children = scene.children(entity);
            // reversed so children pop in declaration order
            stack.extend(children.iter().skip(skip).rev().copied());
        }
    }
}
