// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The event vocabulary delivered to nodes.

use kurbo::{Point, Vec2};
use sedge_state::{
    JoystickAxis, JoystickButton, Key, MidiNote, MouseButton, TabletAuxButton, TabletPenButton,
    Touch,
};

/// A UI event, synthesized from device state changes and delivered to queue
/// members in order.
///
/// Events are values: synthesis constructs them, the dispatch loop hands out
/// shared references, and nothing retains them past the tick. Move and drag
/// variants carry both the current and the previous position so handlers can
/// compute deltas without private bookkeeping.
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    /// The mouse position changed.
    MouseMove {
        /// Current position.
        position: Point,
        /// Position before this change.
        last_position: Point,
    },
    /// A mouse button was pressed.
    MouseDown {
        /// The pressed button.
        button: MouseButton,
        /// Position at press time.
        position: Point,
    },
    /// A mouse button was released.
    MouseUp {
        /// The released button.
        button: MouseButton,
        /// Position at release time.
        position: Point,
    },
    /// A press/release pair resolved to a click.
    Click {
        /// The clicking button.
        button: MouseButton,
        /// Position at release time.
        position: Point,
    },
    /// A second click landed within the double-click window.
    ///
    /// Fires at press time of the second click and suppresses that press's
    /// single `Click`.
    DoubleClick {
        /// The clicking button.
        button: MouseButton,
        /// Position at press time.
        position: Point,
    },
    /// The scroll wheel moved.
    Scroll {
        /// Wheel delta for this tick.
        delta: Vec2,
        /// Mouse position when the wheel moved.
        position: Point,
    },
    /// The mouse entered this node (it claimed the hover).
    Hover {
        /// Current mouse position.
        position: Point,
    },
    /// The mouse left this node, or a node in front claimed the hover.
    HoverLost,
    /// A drag gesture began on this node.
    ///
    /// Offered along the mouse-down queue; the first consumer becomes the
    /// drag target and receives the rest of the gesture exclusively.
    DragStart {
        /// The dragging button.
        button: MouseButton,
        /// Position where the button went down.
        down_position: Point,
        /// Current position.
        position: Point,
    },
    /// The pointer moved during an established drag. Sent only to the drag
    /// target.
    Drag {
        /// The dragging button.
        button: MouseButton,
        /// Current position.
        position: Point,
        /// Position before this change.
        last_position: Point,
    },
    /// The drag gesture ended. Sent only to the drag target.
    DragEnd {
        /// The dragging button.
        button: MouseButton,
        /// Position at release time.
        position: Point,
    },
    /// A key was pressed, or is repeating while held.
    KeyDown {
        /// The key.
        key: Key,
        /// `true` for synthesized repeats of a held key.
        repeat: bool,
    },
    /// A key was released.
    KeyUp {
        /// The key.
        key: Key,
    },
    /// A joystick button was pressed.
    JoystickPress {
        /// The button.
        button: JoystickButton,
    },
    /// A joystick button was released.
    JoystickRelease {
        /// The button.
        button: JoystickButton,
    },
    /// A joystick axis value changed.
    JoystickAxisMove {
        /// The axis with its current value.
        axis: JoystickAxis,
        /// Value before this change.
        last_value: f64,
    },
    /// A touch began.
    TouchDown {
        /// The touch with its screen-space position.
        touch: Touch,
    },
    /// A touch moved.
    TouchMove {
        /// The touch with its current position.
        touch: Touch,
        /// Position before this change.
        last_position: Point,
        /// Screen-space position where this touch began.
        down_position: Point,
    },
    /// A touch ended.
    TouchUp {
        /// The touch with its final position.
        touch: Touch,
        /// Screen-space position where this touch began.
        down_position: Point,
    },
    /// A MIDI key went down.
    MidiDown {
        /// Key and velocity.
        note: MidiNote,
    },
    /// A MIDI key went up.
    MidiUp {
        /// Key and release velocity.
        note: MidiNote,
    },
    /// A tablet pen button was pressed.
    TabletPenButtonPress {
        /// The button.
        button: TabletPenButton,
    },
    /// A tablet pen button was released.
    TabletPenButtonRelease {
        /// The button.
        button: TabletPenButton,
    },
    /// A tablet auxiliary button was pressed.
    TabletAuxButtonPress {
        /// The button.
        button: TabletAuxButton,
    },
    /// A tablet auxiliary button was released.
    TabletAuxButtonRelease {
        /// The button.
        button: TabletAuxButton,
    },
}

impl UiEvent {
    /// Whether this event is routed by position (hit test) rather than by
    /// focus or general queue membership.
    pub fn is_positional(&self) -> bool {
        matches!(
            self,
            Self::MouseMove { .. }
                | Self::MouseDown { .. }
                | Self::MouseUp { .. }
                | Self::Click { .. }
                | Self::DoubleClick { .. }
                | Self::Scroll { .. }
                | Self::Hover { .. }
                | Self::HoverLost
                | Self::DragStart { .. }
                | Self::Drag { .. }
                | Self::DragEnd { .. }
                | Self::TouchDown { .. }
                | Self::TouchMove { .. }
                | Self::TouchUp { .. }
        )
    }
}
