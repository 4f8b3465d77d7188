// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The state diff engine: two consecutive snapshots in, ordered change
//! descriptors out.

use alloc::vec::Vec;
use kurbo::{Point, Vec2};

use crate::snapshot::{
    JoystickButton, Key, MidiNote, MouseButton, Snapshot, TabletAuxButton, TabletPenButton,
    TouchSource,
};

/// One atomic state change between two consecutive snapshots.
///
/// Descriptors are transient: produced by [`diff`], consumed immediately by
/// event synthesis, never persisted.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StateChange {
    /// A mouse button went down.
    MouseButtonPressed(MouseButton),
    /// A mouse button went up.
    MouseButtonReleased(MouseButton),
    /// A key went down.
    KeyPressed(Key),
    /// A key went up.
    KeyReleased(Key),
    /// A touch source became active.
    TouchDown {
        /// The source.
        source: TouchSource,
        /// Screen-space position at activation.
        position: Point,
    },
    /// An active touch source moved.
    TouchMoved {
        /// The source.
        source: TouchSource,
        /// Previous position.
        from: Point,
        /// New position.
        to: Point,
    },
    /// A touch source ended.
    TouchUp {
        /// The source.
        source: TouchSource,
        /// Last known position.
        position: Point,
    },
    /// A joystick button went down.
    JoystickButtonPressed(JoystickButton),
    /// A joystick button went up.
    JoystickButtonReleased(JoystickButton),
    /// A joystick axis reading changed.
    JoystickAxisChanged {
        /// Axis index.
        axis: u8,
        /// Previous value.
        from: f64,
        /// New value.
        to: f64,
    },
    /// A midi note started sounding.
    MidiPressed(MidiNote),
    /// A midi note stopped sounding.
    MidiReleased(MidiNote),
    /// A tablet pen button went down.
    TabletPenPressed(TabletPenButton),
    /// A tablet pen button went up.
    TabletPenReleased(TabletPenButton),
    /// A tablet auxiliary button went down.
    TabletAuxPressed(TabletAuxButton),
    /// A tablet auxiliary button went up.
    TabletAuxReleased(TabletAuxButton),
    /// The cursor moved. Only the last known position is reported.
    MousePositionChanged {
        /// Position in the previous snapshot.
        from: Point,
        /// Position in the current snapshot.
        to: Point,
    },
    /// The scroll total changed by `delta`.
    ScrollChanged {
        /// Per-tick scroll delta.
        delta: Vec2,
    },
}

impl StateChange {
    /// Replay this descriptor against a snapshot.
    ///
    /// Replaying everything [`diff`] produced against the previous snapshot
    /// reconstructs the current one (modulo the transient tap records, which
    /// replay as balanced press/release pairs).
    pub fn apply(&self, s: &mut Snapshot) {
        match *self {
            Self::MouseButtonPressed(b) => {
                s.mouse_buttons.press(b);
            }
            Self::MouseButtonReleased(b) => {
                s.mouse_buttons.release(b);
            }
            Self::KeyPressed(k) => {
                s.keys.press(k);
            }
            Self::KeyReleased(k) => {
                s.keys.release(k);
            }
            Self::TouchDown { source, position } | Self::TouchMoved { source, to: position, .. } => {
                s.set_touch(source, position);
            }
            Self::TouchUp { source, .. } => {
                s.clear_touch(source);
            }
            Self::JoystickButtonPressed(b) => {
                s.joystick_buttons.press(b);
            }
            Self::JoystickButtonReleased(b) => {
                s.joystick_buttons.release(b);
            }
            Self::JoystickAxisChanged { axis, to, .. } => s.set_axis(axis, to),
            Self::MidiPressed(n) => {
                if !s.midi_notes.iter().any(|m| m.key == n.key) {
                    s.midi_notes.push(n);
                }
            }
            Self::MidiReleased(n) => {
                if let Some(i) = s.midi_notes.iter().position(|m| m.key == n.key) {
                    s.midi_notes.remove(i);
                }
            }
            Self::TabletPenPressed(b) => {
                s.tablet_pen_buttons.press(b);
            }
            Self::TabletPenReleased(b) => {
                s.tablet_pen_buttons.release(b);
            }
            Self::TabletAuxPressed(b) => {
                s.tablet_aux_buttons.press(b);
            }
            Self::TabletAuxReleased(b) => {
                s.tablet_aux_buttons.release(b);
            }
            Self::MousePositionChanged { to, .. } => s.mouse_position = to,
            Self::ScrollChanged { delta } => s.scroll += delta,
        }
    }
}

/// Compare two consecutive snapshots and emit ordered change descriptors.
///
/// Ordering within the tick: keys, mouse buttons, touches, joystick, midi,
/// tablet — each class releases-before-presses with same-tick taps appended
/// as press/release pairs — then one position descriptor, then one scroll
/// descriptor. See the crate docs for the rationale.
pub fn diff(prev: &Snapshot, next: &Snapshot) -> Vec<StateChange> {
    let mut out = Vec::new();

    // Keys.
    out.extend(prev.keys.difference(&next.keys).map(StateChange::KeyReleased));
    out.extend(next.keys.difference(&prev.keys).map(StateChange::KeyPressed));
    for &k in &next.taps.keys {
        out.push(StateChange::KeyPressed(k));
        out.push(StateChange::KeyReleased(k));
    }

    // Mouse buttons.
    out.extend(
        prev.mouse_buttons
            .difference(&next.mouse_buttons)
            .map(StateChange::MouseButtonReleased),
    );
    out.extend(
        next.mouse_buttons
            .difference(&prev.mouse_buttons)
            .map(StateChange::MouseButtonPressed),
    );
    for &b in &next.taps.mouse {
        out.push(StateChange::MouseButtonPressed(b));
        out.push(StateChange::MouseButtonReleased(b));
    }

    // Touches: ended sources first, then new sources, then same-tick taps,
    // then position moves of persisting sources.
    for t in &prev.touches {
        if next.touch_position(t.source).is_none() {
            out.push(StateChange::TouchUp {
                source: t.source,
                position: t.position,
            });
        }
    }
    for t in &next.touches {
        if prev.touch_position(t.source).is_none() {
            out.push(StateChange::TouchDown {
                source: t.source,
                position: t.position,
            });
        }
    }
    for t in &next.taps.touches {
        out.push(StateChange::TouchDown {
            source: t.source,
            position: t.position,
        });
        out.push(StateChange::TouchUp {
            source: t.source,
            position: t.position,
        });
    }
    for t in &next.touches {
        if let Some(from) = prev.touch_position(t.source)
            && from != t.position
        {
            out.push(StateChange::TouchMoved {
                source: t.source,
                from,
                to: t.position,
            });
        }
    }

    // Joystick buttons and axes.
    out.extend(
        prev.joystick_buttons
            .difference(&next.joystick_buttons)
            .map(StateChange::JoystickButtonReleased),
    );
    out.extend(
        next.joystick_buttons
            .difference(&prev.joystick_buttons)
            .map(StateChange::JoystickButtonPressed),
    );
    for &b in &next.taps.joystick {
        out.push(StateChange::JoystickButtonPressed(b));
        out.push(StateChange::JoystickButtonReleased(b));
    }
    for a in &next.joystick_axes {
        let from = prev.axis_value(a.axis);
        if from != a.value {
            out.push(StateChange::JoystickAxisChanged {
                axis: a.axis,
                from,
                to: a.value,
            });
        }
    }
    // Axes that disappeared from the reading settle back to zero.
    for a in &prev.joystick_axes {
        if a.value != 0.0 && !next.joystick_axes.iter().any(|n| n.axis == a.axis) {
            out.push(StateChange::JoystickAxisChanged {
                axis: a.axis,
                from: a.value,
                to: 0.0,
            });
        }
    }

    // Midi.
    for n in &prev.midi_notes {
        if !next.midi_notes.iter().any(|m| m.key == n.key) {
            out.push(StateChange::MidiReleased(*n));
        }
    }
    for n in &next.midi_notes {
        if !prev.midi_notes.iter().any(|m| m.key == n.key) {
            out.push(StateChange::MidiPressed(*n));
        }
    }

    // Tablet.
    out.extend(
        prev.tablet_pen_buttons
            .difference(&next.tablet_pen_buttons)
            .map(StateChange::TabletPenReleased),
    );
    out.extend(
        next.tablet_pen_buttons
            .difference(&prev.tablet_pen_buttons)
            .map(StateChange::TabletPenPressed),
    );
    out.extend(
        prev.tablet_aux_buttons
            .difference(&next.tablet_aux_buttons)
            .map(StateChange::TabletAuxReleased),
    );
    out.extend(
        next.tablet_aux_buttons
            .difference(&prev.tablet_aux_buttons)
            .map(StateChange::TabletAuxPressed),
    );

    // Position, then scroll, last.
    if prev.mouse_position != next.mouse_position {
        out.push(StateChange::MousePositionChanged {
            from: prev.mouse_position,
            to: next.mouse_position,
        });
    }
    let scroll_delta = next.scroll - prev.scroll;
    if scroll_delta != Vec2::ZERO {
        out.push(StateChange::ScrollChanged {
            delta: scroll_delta,
        });
    }

    out
}
