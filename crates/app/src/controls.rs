//! Launch options and keyboard shortcuts for the selector.

use bevy::math::{DMat4, DVec3};
use bevy::prelude::*;

use snapping::{SelectorState, SnapFilter};

/// Frame of the axis guides: a corner of the floor plate.
fn guide_frame() -> DMat4 {
    DMat4::from_translation(DVec3::new(-3.0, 0.0, 3.0))
}

/// Startup: apply command line options, then arm the selector with visible guides.
pub fn start_selector(mut state: ResMut<SelectorState>) {
    #[cfg(not(target_arch = "wasm32"))]
    apply_launch_options(&mut state);

    state.activate();
    if let Err(err) = state.set_axis_guides(guide_frame(), true) {
        error!("Could not place axis guides: {err}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn apply_launch_options(state: &mut SelectorState) {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => {
                let Some(path) = args.next() else {
                    warn!("--settings needs a path");
                    continue;
                };
                match read_settings(&path) {
                    Ok(settings) => {
                        info!("Loaded snap settings from '{path}'");
                        state.settings = settings;
                    }
                    Err(err) => warn!("Ignoring snap settings: {err}"),
                }
            }
            "--debug" => state.settings.debug = true,
            other => warn!("Unknown argument '{other}'"),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_settings(path: &str) -> Result<snapping::SnapSettings, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
    serde_json::from_str(&text).map_err(|e| format!("{path}: {e}"))
}

fn next_filter(filter: SnapFilter) -> SnapFilter {
    match filter {
        SnapFilter::Visible => SnapFilter::Any,
        SnapFilter::Any => SnapFilter::VisibleSelected,
        SnapFilter::VisibleSelected => SnapFilter::VisibleUnselected,
        SnapFilter::VisibleUnselected => SnapFilter::NoSelectionAncestors,
        SnapFilter::NoSelectionAncestors | SnapFilter::Custom(_) => SnapFilter::Visible,
    }
}

pub fn handle_shortcuts(keys: Res<ButtonInput<KeyCode>>, mut state: ResMut<SelectorState>) {
    if keys.just_pressed(KeyCode::Space) {
        if state.is_active() {
            state.deactivate();
        } else {
            state.activate();
        }
    }

    if keys.just_pressed(KeyCode::KeyG) {
        if state.axis_guides().is_some() {
            state.clear_axis_guides();
        } else if let Err(err) = state.set_axis_guides(guide_frame(), true) {
            error!("Could not place axis guides: {err}");
        }
    }

    if keys.just_pressed(KeyCode::KeyH) {
        let current = state
            .axis_guides()
            .map(|guides| (*guides.transform(), guides.visible));
        if let Some((transform, visible)) = current {
            if let Err(err) = state.set_axis_guides(transform, !visible) {
                error!("Could not place axis guides: {err}");
            }
        }
    }

    if keys.just_pressed(KeyCode::KeyD) {
        state.settings.debug = !state.settings.debug;
        info!("Snap debug mode: {}", state.settings.debug);
    }

    if keys.just_pressed(KeyCode::KeyF) {
        state.filter = next_filter(state.filter);
        info!("Snap filter: {:?}", state.filter);
    }
}
