//! Traversal filter: decides per scene object whether it is tested for snaps
//! and whether its children are visited.

use bevy::prelude::{Entity, Resource};

/// Two independent bits: test the object (1) and descend into its children (2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TraversalDirective(pub u8);

impl TraversalDirective {
    /// Ignore the object and its subtree.
    pub const SKIP: Self = Self(0);
    /// Test the object, do not visit its children.
    pub const TEST: Self = Self(1);
    /// Visit the children without testing the object itself.
    pub const DESCEND: Self = Self(2);
    pub const TEST_AND_DESCEND: Self = Self(3);

    pub fn tests(self) -> bool {
        self.0 & 1 == 1
    }

    pub fn descends(self) -> bool {
        self.0 & 2 == 2
    }
}

/// Entities the host considers selected. The first one is the primary selection.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapSelection {
    pub entities: Vec<Entity>,
}

impl SnapSelection {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    pub fn primary(&self) -> Option<Entity> {
        self.entities.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// What a filter gets to see about one scene object.
#[derive(Debug, Clone, Copy)]
pub struct FilterInput<'a> {
    pub entity: Entity,
    pub visible: bool,
    pub selection: &'a SnapSelection,
    /// Whether `entity` is a strict ancestor of the primary selection.
    pub is_selection_ancestor: bool,
}

/// Object filter policy used during scene traversal.
#[derive(Debug, Clone, Copy, Default)]
pub enum SnapFilter {
    /// Test every object and descend everywhere.
    Any,
    /// Visible objects and their subtrees.
    #[default]
    Visible,
    /// Visible objects that are part of the selection.
    VisibleSelected,
    /// Visible objects outside the selection.
    VisibleUnselected,
    /// The primary selection is tested without its children, its ancestors are
    /// only traversed. Used while editing an object so it cannot snap to
    /// its own parts.
    NoSelectionAncestors,
    Custom(fn(&FilterInput) -> TraversalDirective),
}

impl SnapFilter {
    pub fn evaluate(&self, input: &FilterInput) -> TraversalDirective {
        let visible = if input.visible {
            TraversalDirective::TEST_AND_DESCEND
        } else {
            TraversalDirective::SKIP
        };
        match self {
            SnapFilter::Any => TraversalDirective::TEST_AND_DESCEND,
            SnapFilter::Visible => visible,
            SnapFilter::VisibleSelected => {
                if input.visible && input.selection.contains(input.entity) {
                    TraversalDirective::TEST_AND_DESCEND
                } else {
                    TraversalDirective::SKIP
                }
            }
            SnapFilter::VisibleUnselected => {
                if input.visible && !input.selection.contains(input.entity) {
                    TraversalDirective::TEST_AND_DESCEND
                } else {
                    TraversalDirective::SKIP
                }
            }
            SnapFilter::NoSelectionAncestors => {
                if input.selection.primary() == Some(input.entity) {
                    TraversalDirective::TEST
                } else if input.is_selection_ancestor {
                    TraversalDirective::DESCEND
                } else {
                    visible
                }
            }
            SnapFilter::Custom(policy) => policy(input),
        }
    }

    /// Whether the policy needs the ancestor chain of the primary selection.
    pub fn uses_selection_ancestors(&self) -> bool {
        matches!(self, SnapFilter::NoSelectionAncestors | SnapFilter::Custom(_))
    }
}
