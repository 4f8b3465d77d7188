// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delivery queue builders.
//!
//! Queues are ordered front-to-back: the dispatch loop visits members in
//! order and the first one to consume an event stops propagation. For
//! positional events the queue is built by depth-first traversal in reverse
//! child order (the frontmost node first, then what lies behind it); for
//! non-positional events the same order is keyed on capability flags alone;
//! for focused routing the queue is the focus node's ancestor chain.

use alloc::vec::Vec;
use kurbo::Point;

use crate::tree::Tree;
use crate::types::{InputFlags, NodeId};

#[derive(Copy, Clone, PartialEq, Eq)]
enum Walk {
    Continue,
    Blocked,
}

/// Build the candidate queue for a positional event at `point`.
///
/// Subtrees whose node lacks [`InputFlags::POSITIONAL`] or does not contain
/// the point are pruned. Children come before their parent (they are in
/// front of it), later siblings before earlier ones. A containing node with
/// [`InputFlags::BLOCKS_BEHIND`] ends the walk behind itself: earlier
/// siblings at every level are truncated, while its own ancestors are still
/// appended.
pub fn positional_queue(tree: &Tree, point: Point) -> Vec<NodeId> {
    let mut queue = Vec::new();
    for &root in tree.roots().iter().rev() {
        if walk_positional(tree, root, point, &mut queue) == Walk::Blocked {
            break;
        }
    }
    queue
}

fn walk_positional(tree: &Tree, id: NodeId, point: Point, out: &mut Vec<NodeId>) -> Walk {
    let Some(flags) = tree.flags(id) else {
        return Walk::Continue;
    };
    if !flags.contains(InputFlags::POSITIONAL) || !tree.contains_point(id, point) {
        return Walk::Continue;
    }
    let mut blocked = false;
    for &child in tree.children_of(id).iter().rev() {
        if walk_positional(tree, child, point, out) == Walk::Blocked {
            blocked = true;
            break;
        }
    }
    out.push(id);
    if blocked || flags.contains(InputFlags::BLOCKS_BEHIND) {
        Walk::Blocked
    } else {
        Walk::Continue
    }
}

/// Build the candidate queue for a non-positional event.
///
/// Same front-to-back order as [`positional_queue`], keyed on
/// [`InputFlags::NON_POSITIONAL`] with no containment test. A node lacking
/// the flag prunes its whole subtree.
pub fn non_positional_queue(tree: &Tree) -> Vec<NodeId> {
    let mut queue = Vec::new();
    for &root in tree.roots().iter().rev() {
        walk_non_positional(tree, root, &mut queue);
    }
    queue
}

fn walk_non_positional(tree: &Tree, id: NodeId, out: &mut Vec<NodeId>) {
    let Some(flags) = tree.flags(id) else {
        return;
    };
    if !flags.contains(InputFlags::NON_POSITIONAL) {
        return;
    }
    for &child in tree.children_of(id).iter().rev() {
        walk_non_positional(tree, child, out);
    }
    out.push(id);
}

/// The focused node followed by its ancestors up to the root.
///
/// Empty when `focus` is stale — a node that left the tree receives nothing.
pub fn focus_queue(tree: &Tree, focus: NodeId) -> Vec<NodeId> {
    let mut queue = Vec::new();
    if !tree.is_alive(focus) {
        return queue;
    }
    let mut cur = Some(focus);
    while let Some(id) = cur {
        queue.push(id);
        cur = tree.parent_of(id);
    }
    queue
}
