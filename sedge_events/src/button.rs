// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-button press state machine: click, double-click, and drag tracking.
//!
//! One [`ButtonPressState`] exists per mouse button. It is pure: the dispatch
//! loop feeds it positions and timestamps and turns the returned outcomes
//! into events. The machine never sees the scene tree — which node actually
//! receives the click or drag is decided by the caller from its delivery
//! queues; the machine only remembers the drag target the caller established.
//!
//! ## Lifecycle
//!
//! Idle → (down) → Pressed → (move past `drag_start_distance`) → Dragging →
//! (up) → Idle. A release from either held phase may produce a click; a
//! second press within `double_click_time` and `click_drag_distance` of the
//! previous click produces a double-click at press time instead, and a
//! successful double-click resets the window so a third press starts a fresh
//! count.

use kurbo::Point;

/// Phase of a button press gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PressPhase {
    /// Button is up.
    #[default]
    Idle,
    /// Button is down, no drag yet.
    Pressed,
    /// Button is down and the pointer has moved past the drag threshold.
    Dragging,
}

/// What a press should synthesize.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PressOutcome {
    /// This press is the second of a double-click pair: synthesize
    /// `DoubleClick` now and suppress the click at release.
    pub double_click: bool,
}

/// What a move should synthesize.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// The drag threshold was just crossed: synthesize `DragStart`.
    pub start_drag: bool,
    /// A drag is established: synthesize `Drag` to the drag target.
    pub drag: bool,
}

/// What a release should synthesize.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct ReleaseOutcome {
    /// A click may fire (no double-click suppression). The caller still
    /// applies target lenience and the drag-blocks-click veto.
    pub click_candidate: bool,
    /// The pointer strayed past `click_drag_distance` at some point while
    /// held. The caller demands a release back over the original target
    /// before clicking.
    pub exceeded_click_distance: bool,
    /// A drag was in progress: synthesize `DragEnd` to the drag target.
    pub end_drag: bool,
}

#[derive(Clone, Debug)]
struct ActivePress<K> {
    down_position: Point,
    exceeded_click_distance: bool,
    double_clicked: bool,
    drag_target: Option<K>,
}

#[derive(Clone, Debug)]
struct LastClick {
    position: Point,
    time: u64,
}

/// Click/double-click/drag state for a single mouse button, generic over the
/// caller's node key `K`.
#[derive(Clone, Debug)]
pub struct ButtonPressState<K> {
    /// Movement from the down position beyond this starts a drag. The default
    /// of `0.0` starts the drag on the first movement while held.
    pub drag_start_distance: f64,
    /// Movement beyond this marks the press as no longer click-shaped (see
    /// [`ReleaseOutcome::exceeded_click_distance`]). Also bounds how far the
    /// second press of a double-click may land from the first click.
    pub click_drag_distance: f64,
    /// Maximum milliseconds between a click and the next press for the pair
    /// to count as a double-click.
    pub double_click_time: u64,
    phase: PressPhase,
    press: Option<ActivePress<K>>,
    last_click: Option<LastClick>,
}

impl<K> Default for ButtonPressState<K> {
    fn default() -> Self {
        Self {
            drag_start_distance: 0.0,
            click_drag_distance: 10.0,
            double_click_time: 250,
            phase: PressPhase::Idle,
            press: None,
            last_click: None,
        }
    }
}

impl<K> ButtonPressState<K> {
    /// A machine with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current gesture phase.
    pub fn phase(&self) -> PressPhase {
        self.phase
    }

    /// Position where the active press went down, if one is active.
    pub fn down_position(&self) -> Option<Point> {
        self.press.as_ref().map(|p| p.down_position)
    }

    /// The drag target the caller established after `DragStart` was consumed.
    pub fn drag_target(&self) -> Option<&K> {
        self.press.as_ref().and_then(|p| p.drag_target.as_ref())
    }

    /// Record the node that consumed `DragStart`; it receives the rest of the
    /// gesture.
    pub fn set_drag_target(&mut self, target: Option<K>) {
        if let Some(p) = self.press.as_mut() {
            p.drag_target = target;
        }
    }

    /// Record a button press.
    ///
    /// Decides double-click eligibility at press time: the previous click
    /// must be recent and nearby. A double-click consumes the stored click,
    /// so the window restarts afterwards.
    pub fn on_down(&mut self, position: Point, now: u64) -> PressOutcome {
        let double_click = match self.last_click.take() {
            Some(last)
                if now.saturating_sub(last.time) <= self.double_click_time
                    && last.position.distance(position) <= self.click_drag_distance =>
            {
                true
            }
            other => {
                self.last_click = other;
                false
            }
        };
        self.phase = PressPhase::Pressed;
        self.press = Some(ActivePress {
            down_position: position,
            exceeded_click_distance: false,
            double_clicked: double_click,
            drag_target: None,
        });
        PressOutcome { double_click }
    }

    /// Record pointer movement while tracking this button.
    ///
    /// Returns what the caller should synthesize. Movement with the button up
    /// produces nothing.
    pub fn on_move(&mut self, position: Point) -> MoveOutcome {
        let Some(press) = self.press.as_mut() else {
            return MoveOutcome::default();
        };
        let distance = press.down_position.distance(position);
        if distance > self.click_drag_distance {
            press.exceeded_click_distance = true;
        }
        match self.phase {
            PressPhase::Pressed if distance > self.drag_start_distance => {
                self.phase = PressPhase::Dragging;
                MoveOutcome {
                    start_drag: true,
                    drag: true,
                }
            }
            PressPhase::Dragging => MoveOutcome {
                start_drag: false,
                drag: true,
            },
            _ => MoveOutcome::default(),
        }
    }

    /// Record a button release, ending the gesture.
    pub fn on_up(&mut self, position: Point, now: u64) -> ReleaseOutcome {
        let Some(press) = self.press.take() else {
            return ReleaseOutcome::default();
        };
        let end_drag = self.phase == PressPhase::Dragging;
        self.phase = PressPhase::Idle;
        if press.double_clicked {
            // The pair is complete; a third press starts a fresh count.
            return ReleaseOutcome {
                click_candidate: false,
                exceeded_click_distance: press.exceeded_click_distance,
                end_drag,
            };
        }
        self.last_click = Some(LastClick {
            position,
            time: now,
        });
        ReleaseOutcome {
            click_candidate: true,
            exceeded_click_distance: press.exceeded_click_distance,
            end_drag,
        }
    }

    /// Drop any active press and pending double-click window, without
    /// synthesizing anything. Used when the tracked device goes away.
    pub fn cancel(&mut self) {
        self.phase = PressPhase::Idle;
        self.press = None;
        self.last_click = None;
    }
}
