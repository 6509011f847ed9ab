//! The point selector resource: settings, guides, auxiliary geometry and the
//! dwell state of one interactive viewport.

use std::time::Duration;

use bevy::log::info;
use bevy::math::{DMat4, DVec3, Vec2};
use bevy::prelude::Resource;

use crate::arbiter::select_relevant_snap;
use crate::config::SnapSettings;
use crate::dwell::{DwellTracker, Indicators, PointerKind, PointerSample};
use crate::engine::{find_snaps, SnapQuery};
use crate::error::SnapError;
use crate::filter::{SnapFilter, SnapSelection};
use crate::guides::AxisGuides;
use crate::scene::SnapScene;
use crate::types::{Segment, Snap};
use crate::view::SnapView;

/// Interactive point selector.
///
/// Inactive until [`SelectorState::activate`] is called; pointer samples
/// received while inactive are ignored.
#[derive(Resource, Debug, Clone, Default)]
pub struct SelectorState {
    pub settings: SnapSettings,
    pub filter: SnapFilter,
    /// Extra world points offered as vertex snaps.
    pub auxiliary_points: Vec<DVec3>,
    /// Extra world lines offered as edge and midpoint snaps.
    pub auxiliary_lines: Vec<Segment>,
    axis_guides: Option<AxisGuides>,
    dwell: DwellTracker,
    debug_snaps: Vec<Snap>,
    active: bool,
}

impl SelectorState {
    pub fn new(settings: SnapSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        if !self.active {
            self.active = true;
            info!("Point selector activated");
        }
    }

    pub fn deactivate(&mut self) {
        if self.active {
            self.active = false;
            self.dwell.clear();
            info!("Point selector deactivated");
        }
    }

    // -----------------------------------------------------------------------
    // Axis guides
    // -----------------------------------------------------------------------

    /// Enable axis guides through `transform`. `visible` asks the host to draw them.
    pub fn set_axis_guides(&mut self, transform: DMat4, visible: bool) -> Result<(), SnapError> {
        let guides = AxisGuides::new(transform, visible).ok_or(SnapError::DegenerateAxisFrame)?;
        info!(
            "Axis guides set at {:?} (visible: {visible})",
            transform.w_axis.truncate()
        );
        self.axis_guides = Some(guides);
        Ok(())
    }

    pub fn clear_axis_guides(&mut self) {
        if self.axis_guides.take().is_some() {
            info!("Axis guides cleared");
        }
    }

    pub fn axis_guides(&self) -> Option<&AxisGuides> {
        self.axis_guides.as_ref()
    }

    // -----------------------------------------------------------------------
    // Results
    // -----------------------------------------------------------------------

    /// Snap chosen by the last processed sample.
    pub fn current_snap(&self) -> Option<&Snap> {
        self.dwell.current()
    }

    pub fn projection_anchor(&self) -> Option<&Snap> {
        self.dwell.projection_anchor()
    }

    pub fn indicators(&self) -> &Indicators {
        self.dwell.indicators()
    }

    /// Every candidate of the last sample; empty unless debug mode is on.
    pub fn debug_snaps(&self) -> &[Snap] {
        &self.debug_snaps
    }

    // -----------------------------------------------------------------------
    // Pipeline
    // -----------------------------------------------------------------------

    /// All candidates at a viewport position, without touching the dwell state.
    pub fn find_snaps<S: SnapScene + ?Sized>(
        &self,
        scene: &S,
        selection: &SnapSelection,
        view: &SnapView,
        pointer: Vec2,
    ) -> Result<Vec<Snap>, SnapError> {
        let query = SnapQuery {
            anchor: self.dwell.projection_anchor(),
            guides: self.axis_guides.as_ref(),
            auxiliary_points: &self.auxiliary_points,
            auxiliary_lines: &self.auxiliary_lines,
            ..SnapQuery::new(&self.filter, selection, self.settings.pick_radius)
        };
        find_snaps(scene, view, pointer, &query)
    }

    /// Best snap among `snaps`.
    pub fn select_relevant_snap<'a>(&self, snaps: &'a [Snap]) -> Option<&'a Snap> {
        select_relevant_snap(snaps)
    }

    /// Run the pipeline for a pointer sample taken at `now` on the host's
    /// real-time clock. Returns `false` when the sample was ignored.
    pub fn on_pointer_move<S: SnapScene + ?Sized>(
        &mut self,
        scene: &S,
        selection: &SnapSelection,
        view: &SnapView,
        sample: PointerSample,
        now: Duration,
    ) -> Result<bool, SnapError> {
        // above the viewport
        if !self.active || sample.position.y < 0.0 {
            return Ok(false);
        }

        let mut pointer = sample;
        if sample.kind == PointerKind::Touch {
            pointer.position += Vec2::from(self.settings.touch_offset);
        }

        let snaps = self.find_snaps(scene, selection, view, pointer.position)?;
        let snap = select_relevant_snap(&snaps).cloned();
        let threshold = Duration::from_millis(self.settings.dwell_threshold_ms);
        self.dwell.update(snap, pointer, view, now, threshold);

        self.debug_snaps = if self.settings.debug {
            snaps
        } else {
            Vec::new()
        };
        Ok(true)
    }

    /// Pointer released: hide the markers until the next move.
    pub fn on_pointer_up(&mut self) {
        if self.active {
            self.dwell.hide_indicators();
        }
    }

    /// Pointer left the viewport.
    pub fn on_pointer_leave(&mut self) {
        self.dwell.clear();
    }
}
