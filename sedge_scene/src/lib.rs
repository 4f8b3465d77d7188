// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sedge Scene: the input-relevant scene tree and the hit-test & queue builder.
//!
//! ## Overview
//!
//! The input core never owns the application's widgets. What it needs from
//! the scene is small: ordered children, a per-node capability set, and a
//! geometric containment predicate honoring the node's transform and clip.
//! [`Tree`] provides exactly that — a slot arena of generational [`NodeId`]s
//! with local bounds, transforms, optional clips, and [`InputFlags`].
//!
//! The tree is mutated by the host *between* input ticks only. During a tick
//! the input core reads it to build delivery queues:
//!
//! - [`positional_queue`] walks depth-first in reverse child order, so the
//!   frontmost (topmost) node comes first. Subtrees that do not contain the
//!   point or lack [`InputFlags::POSITIONAL`] are pruned. A containing node
//!   with [`InputFlags::BLOCKS_BEHIND`] truncates the siblings behind it —
//!   an opaque masking container swallows positional input — while its own
//!   ancestors still participate.
//! - [`non_positional_queue`] uses the same front-to-back order keyed on
//!   [`InputFlags::NON_POSITIONAL`], with no containment test.
//! - [`focus_queue`] is the focused node followed by its ancestor chain.
//!
//! Queue order is significant: the dispatch loop visits the queue
//! front-to-back and stops at the first consumer.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use sedge_scene::{positional_queue, LocalNode, Tree};
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, LocalNode::with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0)));
//! let child = tree.insert(Some(root), LocalNode::with_bounds(Rect::new(10.0, 10.0, 50.0, 50.0)));
//! tree.commit();
//!
//! // The child is in front of its parent.
//! assert_eq!(positional_queue(&tree, Point::new(20.0, 20.0)), [child, root]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod queue;
mod tree;
mod types;

pub use queue::{focus_queue, non_positional_queue, positional_queue};
pub use tree::Tree;
pub use types::{InputFlags, LocalNode, NodeId};
