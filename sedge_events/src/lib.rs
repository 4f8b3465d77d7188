// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sedge Events: typed UI events and the event synthesis state machines.
//!
//! ## Overview
//!
//! Raw device state changes (from `sedge_state`'s diff) are not what nodes
//! want to handle. This crate provides the vocabulary nodes do handle —
//! [`UiEvent`] — and the pure state machines that synthesize the derived
//! gestures:
//!
//! - [`ButtonPressState`] turns per-button press/move/release sequences into
//!   click, double-click, and drag outcomes. One instance per mouse button.
//! - [`KeyRepeatState`] schedules repeat `KeyDown`s for the held key
//!   (250 ms initial delay, 70 ms interval, modifiers exempt).
//! - [`TouchBridge`] lets the most recently activated touch drive a
//!   synthesized mouse gesture without ever re-pressing mid-gesture.
//!
//! The machines are deterministic and clockless: callers pass millisecond
//! timestamps in, and identical inputs produce identical outcomes. None of
//! them know about the scene tree — the dispatch loop in `sedge_session`
//! combines their outcomes with delivery queues to pick recipients.
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use sedge_events::{ButtonPressState, PressPhase};
//!
//! let mut left: ButtonPressState<u32> = ButtonPressState::new();
//! left.on_down(Point::new(10.0, 10.0), 1_000);
//! let moved = left.on_move(Point::new(30.0, 10.0));
//! assert!(moved.start_drag);
//! assert_eq!(left.phase(), PressPhase::Dragging);
//!
//! let up = left.on_up(Point::new(30.0, 10.0), 1_100);
//! assert!(up.end_drag);
//! assert!(up.click_candidate);
//! assert!(up.exceeded_click_distance);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod button;
mod event;
mod keyboard;
mod touch;

pub use button::{ButtonPressState, MoveOutcome, PressOutcome, PressPhase, ReleaseOutcome};
pub use event::UiEvent;
pub use keyboard::{KeyRepeatState, KeyRepeats, REPEAT_INITIAL_DELAY, REPEAT_INTERVAL};
pub use touch::{BridgedMouse, TouchBridge};
