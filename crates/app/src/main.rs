//! `snapview`: a window for trying the snap engine by hand.
//!
//! Hover the scene to see the snap under the cursor. Keys:
//!   - `Space` activates or deactivates the selector
//!   - `G` toggles the axis guides, `H` hides or shows them
//!   - `D` toggles debug mode (every candidate is drawn)
//!   - `F` cycles the traversal filter
//!
//! Desktop builds accept `--settings <path>` with a JSON `SnapSettings` file
//! and `--debug`.

mod controls;
mod demo_scene;
mod indicators;

use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};

use snapping::selector::handle_pointer_events;
use snapping::SnapPlugin;

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "snapview".to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(WinitSettings {
        focused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(16)),
        unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
    })
    .insert_resource(ClearColor(Color::srgb(0.93, 0.94, 0.96)))
    .add_plugins(SnapPlugin)
    .add_systems(
        Startup,
        (demo_scene::spawn_demo_scene, controls::start_selector),
    )
    .add_systems(Update, controls::handle_shortcuts.before(handle_pointer_events))
    .add_systems(
        Update,
        (
            indicators::log_snap_updates,
            indicators::draw_shape_outlines,
            indicators::draw_axis_guides,
            indicators::draw_debug_snaps,
            indicators::draw_snap_markers,
        )
            .after(handle_pointer_events),
    );

    app.run();
}
