//! Gizmo rendering of snap markers, axis guides and line shapes, plus a log
//! line whenever the snap under the cursor changes.

use bevy::prelude::*;

use snapping::dwell::MarkerStyle;
use snapping::{Axis, CordShape, ProfileShape, SelectorState, SnapCamera, SnapType, SnapUpdated};

/// Marker size relative to the distance from the camera.
const MARKER_SCALE: f32 = 0.012;
/// Radius of the touch pointer ring in world units, one unit in front of the camera.
const TOUCH_RING_RADIUS: f32 = 0.02;

const OUTLINE_COLOR: Color = Color::srgb(0.15, 0.15, 0.18);

pub fn snap_color(snap_type: SnapType) -> Color {
    match snap_type {
        SnapType::Vertex => Color::BLACK,
        SnapType::Intersection => Color::srgb(0.6, 0.2, 0.8),
        SnapType::Projection => Color::srgb(0.1, 0.65, 0.2),
        SnapType::MiddlePoint => Color::srgb(0.55, 0.35, 0.15),
        SnapType::Edge => Color::srgb(0.1, 0.3, 0.9),
        SnapType::Guide => Color::srgb(1.0, 0.55, 0.0),
        SnapType::Face => Color::srgb(0.85, 0.1, 0.1),
    }
}

fn axis_color(axis: Axis) -> Color {
    match axis {
        Axis::X => Color::srgb(0.9, 0.2, 0.2),
        Axis::Y => Color::srgb(0.2, 0.8, 0.2),
        Axis::Z => Color::srgb(0.2, 0.4, 0.95),
    }
}

/// Log the snap under the cursor when its type or label changes.
pub fn log_snap_updates(
    mut updates: EventReader<SnapUpdated>,
    mut last: Local<Option<(SnapType, &'static str)>>,
) {
    for update in updates.read() {
        let key = update
            .snap
            .as_ref()
            .map(|snap| (snap.snap_type, snap.label.key()));
        if key == *last {
            continue;
        }
        *last = key;
        match &update.snap {
            Some(snap) => info!(
                "Snap {:?} ({}) at {:.3?}",
                snap.snap_type,
                snap.label.key(),
                snap.world_position
            ),
            None => info!("No snap"),
        }
    }
}

pub fn draw_shape_outlines(
    profiles: Query<(&ProfileShape, &GlobalTransform, &InheritedVisibility)>,
    cords: Query<(&CordShape, &GlobalTransform, &InheritedVisibility)>,
    mut gizmos: Gizmos,
) {
    for (profile, transform, visibility) in &profiles {
        if !visibility.get() {
            continue;
        }
        let points = profile.points();
        let Some(&first) = points.first() else {
            continue;
        };
        let closed = points.iter().chain(std::iter::once(&first));
        gizmos.linestrip(
            closed.map(|p| transform.transform_point(p.extend(0.0))),
            OUTLINE_COLOR,
        );
    }
    for (cord, transform, visibility) in &cords {
        if visibility.get() {
            gizmos.linestrip(
                cord.points().iter().map(|&p| transform.transform_point(p)),
                OUTLINE_COLOR,
            );
        }
    }
}

pub fn draw_axis_guides(state: Res<SelectorState>, mut gizmos: Gizmos) {
    let Some(guides) = state.axis_guides().filter(|guides| guides.visible) else {
        return;
    };
    for guide in guides.guides() {
        gizmos.line(
            guide.segment.start.as_vec3(),
            guide.segment.end.as_vec3(),
            axis_color(guide.axis),
        );
    }
}

/// Every candidate of the last sample, as small dots.
pub fn draw_debug_snaps(state: Res<SelectorState>, mut gizmos: Gizmos) {
    for snap in state.debug_snaps() {
        let radius = snap.world_distance as f32 * MARKER_SCALE * 0.5;
        gizmos.sphere(
            Isometry3d::from_translation(snap.world_position.as_vec3()),
            radius,
            snap_color(snap.snap_type).with_alpha(0.5),
        );
    }
}

pub fn draw_snap_markers(
    state: Res<SelectorState>,
    cameras: Query<(&Camera, &GlobalTransform), With<SnapCamera>>,
    mut gizmos: Gizmos,
) {
    let indicators = state.indicators();

    if let Some(marker) = indicators.primary {
        match marker.style {
            MarkerStyle::Snap(snap_type) => {
                if let Some(snap) = state.current_snap() {
                    let color = snap_color(snap_type);
                    let center = snap.world_position.as_vec3();
                    let radius = snap.world_distance as f32 * MARKER_SCALE;
                    gizmos.cuboid(
                        Transform::from_translation(center).with_scale(Vec3::splat(radius * 2.0)),
                        color,
                    );
                    if let Some(segment) = snap.segment {
                        gizmos.line(segment.start.as_vec3(), segment.end.as_vec3(), color);
                    }
                    if let Some(normal) = snap.normal {
                        gizmos.arrow(center, center + normal.as_vec3() * radius * 8.0, color);
                    }
                }
            }
            MarkerStyle::TouchPointer => {
                let Some((camera, transform)) = cameras.iter().find(|(camera, _)| camera.is_active)
                else {
                    return;
                };
                if let Ok(ray) = camera.viewport_to_world(transform, marker.position) {
                    let center = ray.get_point(1.0);
                    let facing = Quat::from_rotation_arc(Vec3::Z, -*ray.direction);
                    gizmos.circle(
                        Isometry3d::new(center, facing),
                        TOUCH_RING_RADIUS,
                        Color::BLACK,
                    );
                }
            }
        }
    }

    if indicators.secondary.is_some() {
        if let (Some(anchor), Some(snap)) = (state.projection_anchor(), state.current_snap()) {
            let color = snap_color(SnapType::Projection);
            let start = anchor.world_position.as_vec3();
            let radius = anchor.world_distance as f32 * MARKER_SCALE;
            gizmos.sphere(Isometry3d::from_translation(start), radius, color);
            gizmos.line(start, snap.world_position.as_vec3(), color);
        }
    }
}
