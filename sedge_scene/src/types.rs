// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene tree: node identifiers, capability flags, and
//! local geometry.

use kurbo::{Affine, Rect};

/// Identifier for a node in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Node capability flags: what kinds of input a node accepts and how it
    /// shapes routing around it.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct InputFlags: u8 {
        /// Accepts positional input (mouse, touch, scroll) at points it contains.
        const POSITIONAL = 0b0000_0001;
        /// Accepts non-positional input (keyboard, joystick, midi).
        const NON_POSITIONAL = 0b0000_0010;
        /// May hold keyboard focus when offered.
        const ACCEPTS_FOCUS = 0b0000_0100;
        /// Requests focus when clicked.
        const REQUESTS_FOCUS = 0b0000_1000;
        /// A drag initiated on this node suppresses the click on release.
        /// Scroll-style containers clear this so a press-drag-release that
        /// ends over the press target still counts as a click.
        const DRAG_BLOCKS_CLICK = 0b0001_0000;
        /// Positional input stops here: nodes behind this one (earlier
        /// siblings, and their subtrees) never enter the queue when this node
        /// contains the point. Used by opaque masking containers.
        const BLOCKS_BEHIND = 0b0010_0000;
    }
}

impl Default for InputFlags {
    fn default() -> Self {
        Self::POSITIONAL | Self::NON_POSITIONAL | Self::DRAG_BLOCKS_CLICK
    }
}

/// Local geometry and capabilities for a node.
#[derive(Clone, Debug)]
pub struct LocalNode {
    /// Local (untransformed) bounds; the containment predicate tests against
    /// this rectangle in node-local space.
    pub local_bounds: Rect,
    /// Local transform relative to parent space.
    pub local_transform: Affine,
    /// Optional local clip. A point outside an ancestor's clip can never hit
    /// a descendant (masking).
    pub local_clip: Option<Rect>,
    /// Capability flags.
    pub flags: InputFlags,
}

impl LocalNode {
    /// A node with the given bounds and default flags.
    pub fn with_bounds(bounds: Rect) -> Self {
        Self {
            local_bounds: bounds,
            ..Self::default()
        }
    }

    /// Builder-style flag override.
    pub fn flags(mut self, flags: InputFlags) -> Self {
        self.flags = flags;
        self
    }
}

impl Default for LocalNode {
    fn default() -> Self {
        Self {
            local_bounds: Rect::ZERO,
            local_transform: Affine::IDENTITY,
            local_clip: None,
            flags: InputFlags::default(),
        }
    }
}
