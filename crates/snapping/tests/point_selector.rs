//! End-to-end tests of the point selector running inside a headless Bevy app.
//!
//! Each test builds a small scene under a `SnapRoot`, feeds window cursor
//! events through `SnapPlugin` and reads back the `SnapUpdated` events.
//!
//! Run: cargo test -p snapping --test point_selector

use bevy::ecs::event::EventCursor;
use bevy::math::{DMat4, DVec3};
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::primitives::Aabb;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::window::{CursorMoved, WindowEvent};

use snapping::{
    CordShape, ProfileOutline, ProfileShape, Segment, SelectorState, Snap, SnapFilter, SnapLabel,
    SnapPlugin, SnapRoot, SnapSelection, SnapSettings, SnapType, SnapUpdated, SnapView,
    SnapViewport, SolidShape,
};

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct SnapHarness {
    app: App,
    root: Entity,
    view: SnapView,
    origin: Vec2,
    updates: EventCursor<SnapUpdated>,
}

impl SnapHarness {
    /// Headless app looking down -Z from (0, 0, 10) at an 800x800 viewport.
    fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(SnapPlugin);
        app.insert_resource(Assets::<Mesh>::default());

        let eye = DVec3::new(0.0, 0.0, 10.0);
        let view = SnapView::new(
            DMat4::perspective_rh(std::f64::consts::FRAC_PI_4, 1.0, 0.1, 100.0)
                * DMat4::look_at_rh(eye, DVec3::ZERO, DVec3::Y),
            eye,
            Vec2::new(800.0, 800.0),
        )
        .expect("valid view");
        let root = app
            .world_mut()
            .spawn((SnapRoot, GlobalTransform::IDENTITY))
            .id();

        let mut harness = Self {
            app,
            root,
            view,
            origin: Vec2::ZERO,
            updates: EventCursor::default(),
        };
        harness.sync_viewport();
        harness
    }

    fn sync_viewport(&mut self) {
        self.app.insert_resource(SnapViewport {
            view: Some(self.view),
            origin: self.origin,
        });
    }

    /// Place the viewport at `origin` inside the window.
    fn with_viewport_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self.sync_viewport();
        self
    }

    fn with_settings(mut self, settings: SnapSettings) -> Self {
        self.app.world_mut().resource_mut::<SelectorState>().settings = settings;
        self
    }

    fn with_filter(mut self, filter: SnapFilter) -> Self {
        self.app.world_mut().resource_mut::<SelectorState>().filter = filter;
        self
    }

    fn with_selection(mut self, entities: Vec<Entity>) -> Self {
        self.app.insert_resource(SnapSelection::new(entities));
        self
    }

    fn spawn_child(&mut self, bundle: impl Bundle) -> Entity {
        let entity = self.app.world_mut().spawn(bundle).id();
        self.app.world_mut().entity_mut(self.root).add_child(entity);
        entity
    }

    fn spawn_cord(&mut self, points: Vec<Vec3>) -> Entity {
        self.spawn_child((CordShape::new(points), GlobalTransform::IDENTITY))
    }

    fn spawn_point_mesh(&mut self, positions: Vec<[f32; 3]>, at: Vec3) -> Entity {
        let mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        let handle = self.app.world_mut().resource_mut::<Assets<Mesh>>().add(mesh);
        self.spawn_child((
            Mesh3d(handle),
            GlobalTransform::from_translation(at),
            InheritedVisibility::VISIBLE,
        ))
    }

    fn activate(mut self) -> Self {
        self.app.world_mut().resource_mut::<SelectorState>().activate();
        self
    }

    /// Move the cursor over `world` and return the snaps reported this frame.
    fn hover(&mut self, world: DVec3) -> Vec<Option<Snap>> {
        let screen = self.view.world_to_screen(world).expect("point in front of camera");
        self.app
            .world_mut()
            .send_event(WindowEvent::CursorMoved(CursorMoved {
                window: Entity::PLACEHOLDER,
                position: screen + self.origin,
                delta: None,
            }));
        self.app.update();

        let events = self.app.world().resource::<Events<SnapUpdated>>();
        self.updates
            .read(events)
            .map(|update| update.snap.clone())
            .collect()
    }

    fn hover_one(&mut self, world: DVec3) -> Option<Snap> {
        self.hover(world).pop().flatten()
    }

    fn state(&self) -> &SelectorState {
        self.app.world().resource::<SelectorState>()
    }
}

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

#[test]
fn test_profile_corner_and_closing_edge() {
    let mut harness = SnapHarness::new().activate();
    let profile = harness.spawn_child((
        ProfileShape::new(
            ProfileOutline::Rectangle {
                width: 2.0,
                height: 1.0,
            },
            0,
        ),
        GlobalTransform::IDENTITY,
    ));

    let corner = harness.hover_one(DVec3::new(1.0, 0.5, 0.0)).expect("corner");
    assert_eq!(corner.snap_type, SnapType::Vertex);
    assert_eq!(corner.owner, Some(profile));

    // the left side closes the outline back to the first point
    let closing = harness.hover_one(DVec3::new(-1.0, 0.0, 0.0)).expect("midpoint");
    assert_eq!(closing.snap_type, SnapType::MiddlePoint);
    assert_eq!(closing.label, SnapLabel::OnMiddlePoint);
    assert!((closing.world_position - DVec3::new(-1.0, 0.0, 0.0)).length() < 1e-6);
}

#[test]
fn test_cord_midpoint_beats_edge() {
    let mut harness = SnapHarness::new().activate();
    let cord = harness.spawn_cord(vec![
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 2.0, 0.0),
    ]);

    let snap = harness.hover_one(DVec3::ZERO).expect("midpoint");
    assert_eq!(snap.snap_type, SnapType::MiddlePoint);
    assert_eq!(snap.owner, Some(cord));

    let along = harness
        .hover_one(DVec3::new(0.6, 0.0, 0.0))
        .expect("edge");
    assert_eq!(along.snap_type, SnapType::Edge);
    assert_eq!(along.label, SnapLabel::OnEdge);
    let segment = along.segment.expect("edge carries its segment");
    assert_eq!(segment.start, DVec3::new(-1.0, 0.0, 0.0));
    assert_eq!(segment.end, DVec3::new(1.0, 0.0, 0.0));
}

#[test]
fn test_plain_mesh_offers_vertices() {
    let mut harness = SnapHarness::new().activate();
    let mesh = harness.spawn_point_mesh(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        Vec3::new(-2.0, -2.0, 0.0),
    );

    let snap = harness
        .hover_one(DVec3::new(-1.0, -2.0, 0.0))
        .expect("mesh vertex");
    assert_eq!(snap.snap_type, SnapType::Vertex);
    assert_eq!(snap.owner, Some(mesh));
    assert!((snap.world_position - DVec3::new(-1.0, -2.0, 0.0)).length() < 1e-6);

    // no edges between mesh vertices
    assert!(harness
        .hover_one(DVec3::new(-1.5, -2.0, 0.0))
        .is_none());
}

#[test]
fn test_plain_mesh_is_culled_by_its_aabb() {
    let mut harness = SnapHarness::new().activate();
    let mesh = harness.spawn_point_mesh(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        Vec3::new(-2.0, -2.0, 0.0),
    );
    let vertex = DVec3::new(-1.0, -2.0, 0.0);
    assert!(harness.hover_one(vertex).is_some());

    // bounds the renderer keeps for the mesh win over its positions
    harness
        .app
        .world_mut()
        .entity_mut(mesh)
        .insert(Aabb::from_min_max(Vec3::splat(40.0), Vec3::splat(41.0)));
    assert!(harness.hover_one(vertex).is_none());
}

#[test]
fn test_solid_internal_children_are_skipped() {
    let mut harness = SnapHarness::new().activate();
    let solid = harness.spawn_child((
        SolidShape::cuboid(Vec3::ONE),
        GlobalTransform::from_translation(Vec3::new(3.0, 0.0, 0.0)),
    ));
    // render meshes of the solid, then a user cord attached to it
    let world = harness.app.world_mut();
    let first = world
        .spawn((
            CordShape::new(vec![Vec3::new(-3.0, 3.0, 0.0), Vec3::new(-1.0, 3.0, 0.0)]),
            GlobalTransform::IDENTITY,
        ))
        .id();
    let second = world.spawn(GlobalTransform::IDENTITY).id();
    let attached = world
        .spawn((
            CordShape::new(vec![Vec3::new(-3.0, -3.0, 0.0), Vec3::new(-1.0, -3.0, 0.0)]),
            GlobalTransform::IDENTITY,
        ))
        .id();
    harness
        .app
        .world_mut()
        .entity_mut(solid)
        .add_children(&[first, second, attached]);

    assert!(harness.hover_one(DVec3::new(-2.0, 3.0, 0.0)).is_none());
    let snap = harness
        .hover_one(DVec3::new(-2.0, -3.0, 0.0))
        .expect("attached cord midpoint");
    assert_eq!(snap.owner, Some(attached));
}

// ---------------------------------------------------------------------------
// Filters and auxiliary geometry
// ---------------------------------------------------------------------------

#[test]
fn test_visible_selected_only_snaps_selection() {
    let mut harness = SnapHarness::new();
    let picked = harness.spawn_cord(vec![Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]);
    harness.spawn_cord(vec![Vec3::new(-1.0, 2.0, 0.0), Vec3::new(1.0, 2.0, 0.0)]);
    let root = harness.root;
    let mut harness = harness
        .with_filter(SnapFilter::VisibleSelected)
        .with_selection(vec![root, picked])
        .activate();

    let snap = harness.hover_one(DVec3::ZERO).expect("selected cord");
    assert_eq!(snap.owner, Some(picked));
    assert!(harness.hover_one(DVec3::new(0.0, 2.0, 0.0)).is_none());
}

#[test]
fn test_auxiliary_line_snaps_without_owner() {
    let mut harness = SnapHarness::new().activate();
    harness
        .app
        .world_mut()
        .resource_mut::<SelectorState>()
        .auxiliary_lines
        .push(Segment::new(
            DVec3::new(-2.0, 1.0, 0.0),
            DVec3::new(2.0, 1.0, 0.0),
        ));

    let snap = harness
        .hover_one(DVec3::new(0.7, 1.0, 0.0))
        .expect("auxiliary edge");
    assert_eq!(snap.snap_type, SnapType::Edge);
    assert_eq!(snap.owner, None);
}

// ---------------------------------------------------------------------------
// Selector behavior
// ---------------------------------------------------------------------------

#[test]
fn test_viewport_origin_is_subtracted() {
    let mut harness = SnapHarness::new()
        .with_viewport_origin(Vec2::new(120.0, 60.0))
        .activate();
    harness.spawn_cord(vec![Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]);

    let snap = harness.hover_one(DVec3::new(1.0, 0.0, 0.0)).expect("end vertex");
    assert_eq!(snap.snap_type, SnapType::Vertex);
    assert!(snap.screen_distance < 0.01);
}

#[test]
fn test_held_vertex_becomes_projection_anchor() {
    let mut harness = SnapHarness::new()
        .with_settings(SnapSettings {
            dwell_threshold_ms: 0,
            ..Default::default()
        })
        .activate();
    harness.spawn_cord(vec![Vec3::new(1.0, 1.0, 0.0), Vec3::new(1.0, 3.0, 0.0)]);

    harness.hover_one(DVec3::new(1.0, 1.0, 0.0));
    harness.hover_one(DVec3::new(1.0, 1.0, 0.0));
    let anchor = harness.state().projection_anchor().expect("anchor");
    assert_eq!(anchor.world_position, DVec3::new(1.0, 1.0, 0.0));
}

#[test]
fn test_deactivated_selector_stays_silent() {
    let mut harness = SnapHarness::new().activate();
    harness.spawn_cord(vec![Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]);
    assert!(harness.hover_one(DVec3::ZERO).is_some());

    harness
        .app
        .world_mut()
        .resource_mut::<SelectorState>()
        .deactivate();
    assert!(harness.hover(DVec3::new(1.0, 0.0, 0.0)).is_empty());
    assert!(harness.state().current_snap().is_none());
}
