// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sedge State: per-tick device state snapshots and the state diff engine.
//!
//! ## Overview
//!
//! A host polls its platform layer once per input-processing tick and records
//! everything it saw into an immutable [`Snapshot`]: pressed mouse buttons,
//! pressed keys, active touch sources with positions, joystick buttons and
//! axis values, midi notes, tablet buttons, the absolute cursor position, and
//! the accumulated scroll total.
//!
//! [`diff`] compares two consecutive snapshots and emits an ordered list of
//! [`StateChange`] descriptors. Replaying the descriptors against the
//! previous snapshot reconstructs the current one (see [`StateChange::apply`]).
//!
//! ## Ordering
//!
//! Within one tick the descriptor order is fixed:
//!
//! 1. Per device class, releases before presses. A device that was pressed
//!    and released between snapshots (a *tap*, recorded on the snapshot by
//!    the producer) still emits a press followed by a release, preserving
//!    press/release call symmetry downstream.
//! 2. One position descriptor, carrying only the last known position. There
//!    is no sub-tick interpolation.
//! 3. One scroll descriptor, last.
//!
//! Descriptors are transient: they are produced by [`diff`] and consumed
//! immediately by event synthesis, never persisted.
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use sedge_state::{diff, Key, MouseButton, Snapshot, StateChange};
//!
//! let prev = Snapshot::new();
//! let mut next = Snapshot::new();
//! next.mouse_buttons.press(MouseButton::Left);
//! next.keys.press(Key::A);
//! next.mouse_position = Point::new(10.0, 20.0);
//!
//! let changes = diff(&prev, &next);
//! assert!(changes.contains(&StateChange::MouseButtonPressed(MouseButton::Left)));
//!
//! // Replaying the descriptors reconstructs the current snapshot.
//! let mut replay = prev.clone();
//! for c in &changes {
//!     c.apply(&mut replay);
//! }
//! assert_eq!(replay, next);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod buttons;
mod diff;
mod snapshot;

pub use buttons::ButtonSet;
pub use diff::{StateChange, diff};
pub use snapshot::{
    JoystickAxis, JoystickButton, Key, MidiKey, MidiNote, MouseButton, Snapshot, TabletAuxButton,
    TabletPenButton, Taps, Touch, TouchSource,
};
