use bevy::input::touch::TouchPhase;
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::window::WindowEvent;

use crate::dwell::PointerSample;
use crate::error::SnapError;
use crate::filter::SnapSelection;
use crate::types::Snap;
use crate::view::SnapView;

use super::ecs_scene::{EcsSnapScene, SnapCamera};
use super::state::SelectorState;

// =============================================================================
// Resources and events
// =============================================================================

/// Camera snapshot used for the next pointer samples.
#[derive(Resource, Debug, Clone, Default)]
pub struct SnapViewport {
    pub view: Option<SnapView>,
    /// Top-left corner of the camera viewport in window logical pixels.
    pub origin: Vec2,
}

/// Sent after every processed pointer sample with the arbitrated snap.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct SnapUpdated {
    pub snap: Option<Snap>,
}

// =============================================================================
// Systems
// =============================================================================

/// Refresh [`SnapViewport`] from the active camera marked with [`SnapCamera`].
pub fn sync_snap_view(
    cameras: Query<(&Camera, &GlobalTransform), With<SnapCamera>>,
    mut viewport: ResMut<SnapViewport>,
) {
    let Some((camera, transform)) = cameras.iter().find(|(camera, _)| camera.is_active) else {
        return;
    };
    let Some(rect) = camera.logical_viewport_rect() else {
        return;
    };
    match SnapView::from_camera(
        camera.clip_from_view().as_dmat4(),
        transform.compute_matrix().as_dmat4(),
        rect.size(),
    ) {
        Ok(view) => {
            viewport.view = Some(view);
            viewport.origin = rect.min;
        }
        Err(err) => {
            warn!("Snap camera unusable: {err}");
            viewport.view = None;
        }
    }
}

/// Feed window pointer events through the point selector in the order the
/// window reported them, so a frame mixing mouse and touch input ends on the
/// last pointer position.
pub fn handle_pointer_events(
    mut events: EventReader<WindowEvent>,
    time: Res<Time<Real>>,
    viewport: Res<SnapViewport>,
    selection: Res<SnapSelection>,
    scene: EcsSnapScene,
    mut state: ResMut<SelectorState>,
    mut updates: EventWriter<SnapUpdated>,
) {
    let now = time.elapsed();
    for event in events.read() {
        let sample = match event {
            WindowEvent::CursorMoved(moved) => {
                PointerSample::mouse(moved.position - viewport.origin)
            }
            WindowEvent::TouchInput(touch) => match touch.phase {
                TouchPhase::Started | TouchPhase::Moved => {
                    PointerSample::touch(touch.position - viewport.origin)
                }
                TouchPhase::Ended | TouchPhase::Canceled => {
                    state.on_pointer_up();
                    continue;
                }
            },
            WindowEvent::MouseButtonInput(input) if input.state == ButtonState::Released => {
                state.on_pointer_up();
                continue;
            }
            WindowEvent::CursorLeft(_) => {
                state.on_pointer_leave();
                continue;
            }
            _ => continue,
        };
        if !state.is_active() {
            continue;
        }

        let Some(view) = viewport.view.as_ref() else {
            error!("Pointer sample dropped: {}", SnapError::MissingCamera);
            continue;
        };
        match state.on_pointer_move(&scene, &selection, view, sample, now) {
            Ok(true) => {
                updates.send(SnapUpdated {
                    snap: state.current_snap().cloned(),
                });
            }
            Ok(false) => {}
            Err(err) => error!("Pointer sample dropped: {err}"),
        }
    }
}

// =============================================================================
// Plugin
// =============================================================================

pub struct SnapPlugin;

impl Plugin for SnapPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectorState>()
            .init_resource::<SnapViewport>()
            .init_resource::<SnapSelection>()
            .add_event::<SnapUpdated>()
            // registered by the window plugin in a full app
            .add_event::<WindowEvent>()
            .add_systems(Update, (sync_snap_view, handle_pointer_events).chain());
    }
}
