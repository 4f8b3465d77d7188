// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sedge Session: the per-tick input dispatch loop.
//!
//! ## Overview
//!
//! [`Session`] ties the rest of the workspace together. Once per host frame
//! it takes the current device [`Snapshot`](sedge_state::Snapshot), diffs it
//! against the previous one, synthesizes [`UiEvent`](sedge_events::UiEvent)s
//! in a deterministic order, and routes them through delivery queues built
//! from the host's [`Tree`](sedge_scene::Tree). Delivery goes through a
//! single callback — `FnMut(NodeId, &UiEvent) -> Handled` — so the session
//! never needs to know what a node *is*, only where it sits and what its
//! [`InputFlags`](sedge_scene::InputFlags) allow.
//!
//! Cross-tick ownership lives here: who holds focus, which path is hovered
//! and who claimed it, which nodes saw each button go down (and therefore
//! see it come up), which node owns an in-flight drag. When the host removes
//! nodes it reports them via [`Session::notify_removed`] and all such
//! ownership is cleared in the same call.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use sedge_scene::{LocalNode, Tree};
//! use sedge_session::{Handled, Session};
//! use sedge_state::{MouseButton, Snapshot};
//!
//! let mut tree = Tree::new();
//! let button = tree.insert(None, LocalNode::with_bounds(Rect::new(0.0, 0.0, 40.0, 20.0)));
//! tree.commit();
//!
//! let mut session = Session::new();
//! let mut clicked = false;
//! let mut sink = |node, event: &sedge_events::UiEvent| {
//!     if node == button && matches!(event, sedge_events::UiEvent::Click { .. }) {
//!         clicked = true;
//!         return Handled::Yes;
//!     }
//!     Handled::No
//! };
//!
//! let mut snap = Snapshot::new();
//! snap.mouse_position = Point::new(10.0, 10.0);
//! session.tick(&tree, &snap, 0, &mut sink);
//! snap.mouse_buttons.press(MouseButton::Left);
//! session.tick(&tree, &snap, 16, &mut sink);
//! snap.mouse_buttons.release(MouseButton::Left);
//! session.tick(&tree, &snap, 32, &mut sink);
//! drop(sink);
//! assert!(clicked);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod session;

pub use session::{Handled, Session};
