// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, containment queries.

use alloc::vec::Vec;
use kurbo::{Affine, Point, Rect};

use crate::types::{InputFlags, LocalNode, NodeId};

#[derive(Clone, Debug, Default)]
struct WorldNode {
    /// Local→world transform as of the last commit.
    world_transform: Affine,
    /// Intersection of this node's and all ancestors' clips, in world space.
    /// `None` means unclipped.
    world_clip: Option<Rect>,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: LocalNode,
    world: WorldNode,
}

impl Node {
    fn new(generation: u32, local: LocalNode) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
            world: WorldNode::default(),
        }
    }
}

/// The input-relevant scene tree.
///
/// A slot arena with generational identifiers, ordered children (later
/// children are in front of earlier ones), and batched world-space data.
/// Changes to local node data take effect on [`Tree::commit`], which the host
/// calls between input ticks; the input core only ever reads the tree.
///
/// Stale [`NodeId`]s are harmless: every accessor returns `None`/`false` for
/// them, so a node that left the tree can never receive an event.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    nodes: Vec<Option<Node>>,
    /// Last generation per slot (persists across frees).
    generations: Vec<u32>,
    free_list: Vec<usize>,
    roots: Vec<NodeId>,
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new node as the last (frontmost) child of `parent`, or as the
    /// last root if `None`.
    pub fn insert(&mut self, parent: Option<NodeId>, local: LocalNode) -> NodeId {
        let idx = self.free_list.pop().unwrap_or_else(|| {
            self.nodes.push(None);
            self.generations.push(0);
            self.nodes.len() - 1
        });
        let generation = self.generations[idx].saturating_add(1);
        self.generations[idx] = generation;
        self.nodes[idx] = Some(Node::new(generation, local));
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(idx as u32, generation);
        match parent {
            Some(p) if self.is_alive(p) => {
                self.node_mut(p).children.push(id);
                self.node_mut(id).parent = Some(p);
            }
            _ => self.roots.push(id),
        }
        id
    }

    /// Remove a node and its subtree.
    ///
    /// Returns every removed id, depth-first, so the host can notify the
    /// input session which nodes left the tree (ownership state for them is
    /// then cleared deterministically).
    pub fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        let mut removed = Vec::new();
        if !self.is_alive(id) {
            return removed;
        }
        match self.node(id).parent {
            Some(p) => {
                let children = &mut self.node_mut(p).children;
                if let Some(i) = children.iter().position(|c| *c == id) {
                    children.remove(i);
                }
            }
            None => {
                if let Some(i) = self.roots.iter().position(|r| *r == id) {
                    self.roots.remove(i);
                }
            }
        }
        self.remove_recursive(id, &mut removed);
        removed
    }

    fn remove_recursive(&mut self, id: NodeId, removed: &mut Vec<NodeId>) {
        let children = core::mem::take(&mut self.node_mut(id).children);
        removed.push(id);
        for c in children {
            self.remove_recursive(c, removed);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Whether `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Parent of a live node, `None` for roots and stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Ordered children of a live node (later children are in front).
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Root nodes in order (later roots are in front).
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Capability flags of a live node.
    pub fn flags(&self, id: NodeId) -> Option<InputFlags> {
        self.node_opt(id).map(|n| n.local.flags)
    }

    /// Update capability flags.
    pub fn set_flags(&mut self, id: NodeId, flags: InputFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags = flags;
        }
    }

    /// Update local bounds.
    pub fn set_local_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_bounds = bounds;
        }
    }

    /// Update the local transform.
    pub fn set_local_transform(&mut self, id: NodeId, tf: Affine) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_transform = tf;
        }
    }

    /// Update the local clip.
    pub fn set_local_clip(&mut self, id: NodeId, clip: Option<Rect>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_clip = clip;
        }
    }

    /// Recompute world transforms and clip intersections.
    ///
    /// Must be called after structural or geometric mutation, before the next
    /// input tick reads the tree.
    pub fn commit(&mut self) {
        let roots = self.roots.clone();
        for r in roots {
            self.commit_recursive(r, Affine::IDENTITY, None);
        }
    }

    fn commit_recursive(&mut self, id: NodeId, parent_tf: Affine, parent_clip: Option<Rect>) {
        let (world_tf, world_clip, children) = {
            let n = self.node(id);
            let world_tf = parent_tf * n.local.local_transform;
            // A local clip masks this node and everything below it. World
            // clips are conservative AABBs, exact for axis-aligned transforms.
            let world_clip = match n.local.local_clip {
                Some(c) => {
                    let wc = world_tf.transform_rect_bbox(c);
                    Some(match parent_clip {
                        Some(pc) => pc.intersect(wc),
                        None => wc,
                    })
                }
                None => parent_clip,
            };
            (world_tf, world_clip, n.children.clone())
        };
        {
            let n = self.node_mut(id);
            n.world.world_transform = world_tf;
            n.world.world_clip = world_clip;
        }
        for c in children {
            self.commit_recursive(c, world_tf, world_clip);
        }
    }

    /// The local→world transform as of the last [`Tree::commit`].
    pub fn world_transform(&self, id: NodeId) -> Option<Affine> {
        self.node_opt(id).map(|n| n.world.world_transform)
    }

    /// Geometric containment: does the node contain this world-space point?
    ///
    /// The point is masked by the node's and its ancestors' clips, then
    /// inverse-transformed into node-local space and tested against the local
    /// bounds. Stale ids contain nothing.
    pub fn contains_point(&self, id: NodeId, point: Point) -> bool {
        let Some(n) = self.node_opt(id) else {
            return false;
        };
        if let Some(clip) = n.world.world_clip
            && !clip.contains(point)
        {
            return false;
        }
        let local = n.world.world_transform.inverse() * point;
        n.local.local_bounds.contains(local)
    }

    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .filter(|n| n.generation == id.1)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())
            .and_then(|slot| slot.as_mut())
            .filter(|n| n.generation == id.1)
    }
}
