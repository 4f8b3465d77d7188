// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch to mouse bridging.
//!
//! Exactly one touch source drives the synthesized mouse at any time: the
//! most recently activated one. The bridged gesture is continuous — a single
//! mouse-down when the first touch lands, position moves while the active
//! source changes or moves, and a single mouse-up when the last touch lifts.
//! Switching the active source mid-gesture therefore synthesizes a move, not
//! a fresh press, and ending the active touch while others remain promotes
//! the most recent remaining touch the same way.

use kurbo::Point;
use sedge_state::{Touch, TouchSource};
use smallvec::SmallVec;

/// Mouse-equivalent action synthesized from a touch transition.
///
/// The synthesized button is always the primary button; the caller owns the
/// mapping to actual mouse events.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BridgedMouse {
    /// First touch landed: press the primary button at `position`.
    Down {
        /// Position of the new active touch.
        position: Point,
    },
    /// The synthesized mouse position changed while the button stays held.
    Move {
        /// Previous synthesized position.
        from: Point,
        /// New synthesized position.
        to: Point,
    },
    /// Last touch lifted: release the primary button at `position`.
    Up {
        /// Final position of the gesture.
        position: Point,
    },
}

/// Tracks live touches in activation order and synthesizes the bridged mouse
/// gesture. The last entry is the active source.
#[derive(Clone, Debug, Default)]
pub struct TouchBridge {
    touches: SmallVec<[Touch; TouchSource::COUNT as usize]>,
}

impl TouchBridge {
    /// A bridge with no live touches.
    pub fn new() -> Self {
        Self::default()
    }

    /// The touch currently driving the synthesized mouse.
    pub fn active(&self) -> Option<Touch> {
        self.touches.last().copied()
    }

    fn position_of(&self, source: TouchSource) -> Option<Point> {
        self.touches
            .iter()
            .find(|t| t.source == source)
            .map(|t| t.position)
    }

    /// Record a touch landing.
    pub fn on_touch_down(&mut self, touch: Touch) -> Option<BridgedMouse> {
        // A down for a source we already track is a position update.
        if self.position_of(touch.source).is_some() {
            return self.on_touch_move(touch);
        }
        let previous = self.active();
        self.touches.push(touch);
        match previous {
            // A newer touch takes over mid-gesture: continue, don't re-press.
            Some(prev) => Some(BridgedMouse::Move {
                from: prev.position,
                to: touch.position,
            }),
            None => Some(BridgedMouse::Down {
                position: touch.position,
            }),
        }
    }

    /// Record a touch moving. Only the active source moves the synthesized
    /// mouse.
    pub fn on_touch_move(&mut self, touch: Touch) -> Option<BridgedMouse> {
        let active = self.active()?.source;
        let slot = self.touches.iter_mut().find(|t| t.source == touch.source)?;
        let from = slot.position;
        slot.position = touch.position;
        (touch.source == active && from != touch.position).then_some(BridgedMouse::Move {
            from,
            to: touch.position,
        })
    }

    /// Record a touch lifting.
    pub fn on_touch_up(&mut self, touch: Touch) -> Option<BridgedMouse> {
        let was_active = self.active()?.source == touch.source;
        let idx = self.touches.iter().position(|t| t.source == touch.source)?;
        self.touches.remove(idx);
        if !was_active {
            return None;
        }
        match self.active() {
            // Promote the most recent remaining touch, continuing the
            // gesture at its position.
            Some(promoted) => Some(BridgedMouse::Move {
                from: touch.position,
                to: promoted.position,
            }),
            None => Some(BridgedMouse::Up {
                position: touch.position,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(source: u8, x: f64, y: f64) -> Touch {
        Touch {
            source: TouchSource(source),
            position: Point::new(x, y),
        }
    }

    #[test]
    fn single_touch_is_a_full_gesture() {
        let mut bridge = TouchBridge::new();
        assert_eq!(
            bridge.on_touch_down(touch(0, 10.0, 10.0)),
            Some(BridgedMouse::Down {
                position: Point::new(10.0, 10.0)
            })
        );
        assert_eq!(
            bridge.on_touch_move(touch(0, 20.0, 10.0)),
            Some(BridgedMouse::Move {
                from: Point::new(10.0, 10.0),
                to: Point::new(20.0, 10.0)
            })
        );
        assert_eq!(
            bridge.on_touch_up(touch(0, 20.0, 10.0)),
            Some(BridgedMouse::Up {
                position: Point::new(20.0, 10.0)
            })
        );
        assert!(bridge.active().is_none());
    }

    #[test]
    fn second_touch_continues_rather_than_repressing() {
        let mut bridge = TouchBridge::new();
        bridge.on_touch_down(touch(0, 0.0, 0.0));
        assert_eq!(
            bridge.on_touch_down(touch(1, 50.0, 50.0)),
            Some(BridgedMouse::Move {
                from: Point::new(0.0, 0.0),
                to: Point::new(50.0, 50.0)
            })
        );
        assert_eq!(bridge.active().unwrap().source, TouchSource(1));
    }

    #[test]
    fn inactive_touch_movement_is_silent() {
        let mut bridge = TouchBridge::new();
        bridge.on_touch_down(touch(0, 0.0, 0.0));
        bridge.on_touch_down(touch(1, 50.0, 50.0));

        assert_eq!(bridge.on_touch_move(touch(0, 10.0, 0.0)), None);
        // The stored position still updates, so a later promotion lands at
        // the right place.
        bridge.on_touch_up(touch(1, 50.0, 50.0));
        assert_eq!(bridge.active().unwrap().position, Point::new(10.0, 0.0));
    }

    #[test]
    fn ending_active_touch_promotes_most_recent_remaining() {
        let mut bridge = TouchBridge::new();
        bridge.on_touch_down(touch(0, 0.0, 0.0));
        bridge.on_touch_down(touch(1, 10.0, 0.0));
        bridge.on_touch_down(touch(2, 20.0, 0.0));

        assert_eq!(
            bridge.on_touch_up(touch(2, 20.0, 0.0)),
            Some(BridgedMouse::Move {
                from: Point::new(20.0, 0.0),
                to: Point::new(10.0, 0.0)
            })
        );
        assert_eq!(bridge.active().unwrap().source, TouchSource(1));
    }

    #[test]
    fn ending_inactive_touch_is_silent() {
        let mut bridge = TouchBridge::new();
        bridge.on_touch_down(touch(0, 0.0, 0.0));
        bridge.on_touch_down(touch(1, 10.0, 0.0));

        assert_eq!(bridge.on_touch_up(touch(0, 0.0, 0.0)), None);
        // The gesture still ends when the active touch lifts.
        assert_eq!(
            bridge.on_touch_up(touch(1, 10.0, 0.0)),
            Some(BridgedMouse::Up {
                position: Point::new(10.0, 0.0)
            })
        );
    }

    #[test]
    fn stationary_active_move_is_silent() {
        let mut bridge = TouchBridge::new();
        bridge.on_touch_down(touch(0, 5.0, 5.0));
        assert_eq!(bridge.on_touch_move(touch(0, 5.0, 5.0)), None);
    }
}
