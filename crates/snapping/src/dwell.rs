//! Dwell/projection state machine.
//!
//! Holding the pointer still on an anchorable snap (vertex, intersection or
//! midpoint) for longer than the dwell threshold turns that snap into the
//! projection anchor. The anchor feeds PROJECTION candidates into the
//! following samples while axis guides are enabled.

use std::time::Duration;

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::types::{Snap, SnapType};
use crate::view::SnapView;

/// Kind of device behind a pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

/// One pointer position in logical viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub position: Vec2,
    pub kind: PointerKind,
}

impl PointerSample {
    pub fn new(position: Vec2, kind: PointerKind) -> Self {
        Self { position, kind }
    }

    pub fn mouse(position: Vec2) -> Self {
        Self::new(position, PointerKind::Mouse)
    }

    pub fn touch(position: Vec2) -> Self {
        Self::new(position, PointerKind::Touch)
    }
}

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Look of the primary marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// Filled square colored by snap type.
    Snap(SnapType),
    /// Hollow circle at a touch pointer with nothing to snap to.
    TouchPointer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub position: Vec2,
    pub style: MarkerStyle,
}

/// What the host should draw after a sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Indicators {
    pub primary: Option<Marker>,
    /// Screen position of the projection anchor while a projection snap is current.
    pub secondary: Option<Vec2>,
}

impl Indicators {
    pub fn hide(&mut self) {
        self.primary = None;
        self.secondary = None;
    }
}

// ---------------------------------------------------------------------------
// DwellTracker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub enum HoverState {
    #[default]
    None,
    Hover(Snap),
}

#[derive(Debug, Clone, Default)]
pub struct DwellTracker {
    state: HoverState,
    temporal: Option<Snap>,
    projection: Option<Snap>,
    last_change: Duration,
    indicators: Indicators,
}

impl DwellTracker {
    pub fn current(&self) -> Option<&Snap> {
        match &self.state {
            HoverState::None => None,
            HoverState::Hover(snap) => Some(snap),
        }
    }

    /// Snap being held, waiting to become the projection anchor.
    pub fn temporal(&self) -> Option<&Snap> {
        self.temporal.as_ref()
    }

    /// Snap whose projections are offered while axis guides are enabled.
    pub fn projection_anchor(&self) -> Option<&Snap> {
        self.projection.as_ref()
    }

    pub fn last_change(&self) -> Duration {
        self.last_change
    }

    pub fn indicators(&self) -> &Indicators {
        &self.indicators
    }

    /// Advance the machine with the arbitrated snap of a sample taken at `now`.
    pub fn update(
        &mut self,
        snap: Option<Snap>,
        pointer: PointerSample,
        view: &SnapView,
        now: Duration,
        threshold: Duration,
    ) {
        // the anchor as it was when the sample started
        let anchor = self.projection.clone();
        let mut reset_timer = true;

        match snap {
            Some(snap) => {
                self.indicators.primary = Some(Marker {
                    position: snap.screen_position,
                    style: MarkerStyle::Snap(snap.snap_type),
                });

                if let Some(temporal) = &self.temporal {
                    if snap.screen_position == temporal.screen_position {
                        reset_timer = false;
                    }
                    if now.saturating_sub(self.last_change) > threshold {
                        self.projection = Some(temporal.clone());
                    }
                }

                if snap.snap_type.is_anchorable() {
                    self.temporal = Some(snap.clone());
                } else if snap.snap_type == SnapType::Projection && anchor.is_some() {
                    self.indicators.secondary = anchor
                        .as_ref()
                        .and_then(|anchor| view.world_to_screen(anchor.world_position));
                    self.temporal = None;
                } else {
                    self.indicators.secondary = None;
                    self.temporal = None;
                }
                self.state = HoverState::Hover(snap);
            }
            None => {
                self.indicators.primary = match pointer.kind {
                    PointerKind::Touch => Some(Marker {
                        position: pointer.position,
                        style: MarkerStyle::TouchPointer,
                    }),
                    PointerKind::Mouse | PointerKind::Pen => None,
                };
                self.indicators.secondary = None;
                self.state = HoverState::None;
                self.temporal = None;
            }
        }

        if reset_timer {
            self.last_change = now;
        }
    }

    /// Pointer released: markers disappear, snaps are kept.
    pub fn hide_indicators(&mut self) {
        self.indicators.hide();
    }

    /// Pointer left the surface or the selector was deactivated.
    pub fn clear(&mut self) {
        self.state = HoverState::None;
        self.temporal = None;
        self.indicators.hide();
    }
}
