// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Device identifiers and the per-tick [`Snapshot`] record.

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::buttons::ButtonSet;

/// A mouse button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MouseButton {
    /// The left (primary) button.
    Left,
    /// The middle button.
    Middle,
    /// The right button.
    Right,
    /// The first extra button.
    Button4,
    /// The second extra button.
    Button5,
}

/// A keyboard key.
///
/// Left/right modifier variants are distinct identifiers here; the binding
/// layer decides whether they are interchangeable with their generic
/// modifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs, reason = "Key names are self-describing.")]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Escape,
    Tab,
    Space,
    Enter,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    LShift,
    RShift,
    LCtrl,
    RCtrl,
    LAlt,
    RAlt,
    LSuper,
    RSuper,
}

impl Key {
    /// Whether this key is a modifier.
    ///
    /// Modifiers are exempt from key repeat and only activate modifier-only
    /// bindings in the binding layer.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::LShift
                | Self::RShift
                | Self::LCtrl
                | Self::RCtrl
                | Self::LAlt
                | Self::RAlt
                | Self::LSuper
                | Self::RSuper
        )
    }
}

/// An active touch source. Bounded: at most [`TouchSource::COUNT`] concurrent
/// sources are tracked, matching common platform limits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TouchSource(pub u8);

impl TouchSource {
    /// Maximum number of concurrently tracked touch sources.
    pub const COUNT: u8 = 10;
}

/// A joystick/gamepad button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JoystickButton(pub u16);

/// A joystick axis reading.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JoystickAxis {
    /// Axis index.
    pub axis: u8,
    /// Current value, typically in `-1.0..=1.0`.
    pub value: f64,
}

/// A midi note number.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MidiKey(pub u8);

/// A pressed midi note with its velocity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MidiNote {
    /// Note number.
    pub key: MidiKey,
    /// Strike velocity, `0..=127`.
    pub velocity: u8,
}

/// A tablet pen button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabletPenButton(pub u8);

/// A tablet auxiliary (express) button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabletAuxButton(pub u8);

/// An active touch with its current position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Touch {
    /// The source this touch belongs to.
    pub source: TouchSource,
    /// Screen-space position.
    pub position: Point,
}

/// Same-tick press-and-release records.
///
/// A pure two-snapshot diff cannot observe an identifier that was pressed and
/// released between captures. The snapshot producer records those here so
/// [`crate::diff`] can still emit a balanced press/release pair for them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Taps {
    /// Mouse buttons tapped within the tick.
    pub mouse: SmallVec<[MouseButton; 2]>,
    /// Keys tapped within the tick.
    pub keys: SmallVec<[Key; 2]>,
    /// Joystick buttons tapped within the tick.
    pub joystick: SmallVec<[JoystickButton; 2]>,
    /// Touches that began and ended within the tick, with their position.
    pub touches: SmallVec<[Touch; 2]>,
}

impl Taps {
    /// Whether no taps were recorded.
    pub fn is_empty(&self) -> bool {
        self.mouse.is_empty()
            && self.keys.is_empty()
            && self.joystick.is_empty()
            && self.touches.is_empty()
    }
}

/// Immutable per-tick record of raw device state.
///
/// One snapshot is produced per input-processing tick by the platform
/// collaborator and never mutated afterwards by the input core.
///
/// Invariants: the pressed sets contain no duplicates ([`ButtonSet`] enforces
/// this), and a touch position is present exactly for the active sources in
/// `touches`.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Absolute cursor position.
    pub mouse_position: Point,
    /// Currently pressed mouse buttons.
    pub mouse_buttons: ButtonSet<MouseButton>,
    /// Scroll total accumulated since session start. The diff engine emits
    /// the per-tick delta.
    pub scroll: Vec2,
    /// Currently pressed keys.
    pub keys: ButtonSet<Key>,
    /// Active touches, in activation order.
    pub touches: SmallVec<[Touch; 4]>,
    /// Currently pressed joystick buttons.
    pub joystick_buttons: ButtonSet<JoystickButton>,
    /// Joystick axis readings, sparse by axis index.
    pub joystick_axes: SmallVec<[JoystickAxis; 8]>,
    /// Currently sounding midi notes.
    pub midi_notes: SmallVec<[MidiNote; 4]>,
    /// Currently pressed tablet pen buttons.
    pub tablet_pen_buttons: ButtonSet<TabletPenButton>,
    /// Currently pressed tablet auxiliary buttons.
    pub tablet_aux_buttons: ButtonSet<TabletAuxButton>,
    /// Same-tick press-and-release records.
    pub taps: Taps,
}

impl Snapshot {
    /// Create an empty snapshot at the origin.
    pub fn new() -> Self {
        Self {
            mouse_position: Point::ZERO,
            mouse_buttons: ButtonSet::new(),
            scroll: Vec2::ZERO,
            keys: ButtonSet::new(),
            touches: SmallVec::new(),
            joystick_buttons: ButtonSet::new(),
            joystick_axes: SmallVec::new(),
            midi_notes: SmallVec::new(),
            tablet_pen_buttons: ButtonSet::new(),
            tablet_aux_buttons: ButtonSet::new(),
            taps: Taps::default(),
        }
    }

    /// The position of an active touch source, if any.
    pub fn touch_position(&self, source: TouchSource) -> Option<Point> {
        self.touches
            .iter()
            .find(|t| t.source == source)
            .map(|t| t.position)
    }

    /// Begin or move a touch. Activation order is preserved for existing
    /// sources.
    pub fn set_touch(&mut self, source: TouchSource, position: Point) {
        debug_assert!(source.0 < TouchSource::COUNT, "touch source out of range");
        match self.touches.iter_mut().find(|t| t.source == source) {
            Some(t) => t.position = position,
            None => self.touches.push(Touch { source, position }),
        }
    }

    /// End a touch. Returns `true` if the source was active.
    pub fn clear_touch(&mut self, source: TouchSource) -> bool {
        match self.touches.iter().position(|t| t.source == source) {
            Some(i) => {
                self.touches.remove(i);
                true
            }
            None => false,
        }
    }

    /// The reading of a joystick axis, defaulting to `0.0` when absent.
    pub fn axis_value(&self, axis: u8) -> f64 {
        self.joystick_axes
            .iter()
            .find(|a| a.axis == axis)
            .map_or(0.0, |a| a.value)
    }

    /// Record a joystick axis reading.
    ///
    /// A zero reading removes the sparse entry, so a settled axis is
    /// indistinguishable from one that was never touched.
    pub fn set_axis(&mut self, axis: u8, value: f64) {
        match self.joystick_axes.iter().position(|a| a.axis == axis) {
            Some(i) if value == 0.0 => {
                self.joystick_axes.remove(i);
            }
            Some(i) => self.joystick_axes[i].value = value,
            None if value != 0.0 => self.joystick_axes.push(JoystickAxis { axis, value }),
            None => {}
        }
    }

    /// A copy of this snapshot with the taps dropped, for carrying into the
    /// next tick as the baseline state.
    pub fn settled(&self) -> Self {
        let mut s = self.clone();
        s.taps = Taps::default();
        s
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_position_present_iff_active() {
        let mut s = Snapshot::new();
        let src = TouchSource(0);
        assert!(s.touch_position(src).is_none());
        s.set_touch(src, Point::new(5.0, 5.0));
        assert_eq!(s.touch_position(src), Some(Point::new(5.0, 5.0)));
        assert!(s.clear_touch(src));
        assert!(s.touch_position(src).is_none());
        assert!(!s.clear_touch(src));
    }

    #[test]
    fn set_touch_preserves_activation_order() {
        let mut s = Snapshot::new();
        s.set_touch(TouchSource(1), Point::ZERO);
        s.set_touch(TouchSource(0), Point::ZERO);
        s.set_touch(TouchSource(1), Point::new(9.0, 9.0));
        let order: alloc::vec::Vec<u8> = s.touches.iter().map(|t| t.source.0).collect();
        assert_eq!(order, [1, 0]);
    }

    #[test]
    fn axis_defaults_to_zero() {
        let mut s = Snapshot::new();
        assert_eq!(s.axis_value(2), 0.0);
        s.set_axis(2, 0.5);
        s.set_axis(2, -0.25);
        assert_eq!(s.axis_value(2), -0.25);
        assert_eq!(s.joystick_axes.len(), 1);
    }

    #[test]
    fn zero_axis_reading_clears_the_entry() {
        let mut s = Snapshot::new();
        s.set_axis(3, 0.9);
        s.set_axis(3, 0.0);
        assert!(s.joystick_axes.is_empty());
        // Zeroing an axis that was never recorded is a no-op.
        s.set_axis(4, 0.0);
        assert!(s.joystick_axes.is_empty());
    }

    #[test]
    fn settled_drops_taps() {
        let mut s = Snapshot::new();
        s.taps.mouse.push(MouseButton::Left);
        assert!(!s.taps.is_empty());
        assert!(s.settled().taps.is_empty());
    }
}
