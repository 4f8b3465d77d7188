// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-tick dispatch loop and its cross-tick ownership state.

use alloc::vec::Vec;
use hashbrown::HashMap;
use kurbo::Point;

use sedge_events::{BridgedMouse, ButtonPressState, KeyRepeatState, TouchBridge, UiEvent};
use sedge_scene::{
    InputFlags, NodeId, Tree, focus_queue, non_positional_queue, positional_queue,
};
use sedge_state::{
    JoystickAxis, Key, MouseButton, Snapshot, StateChange, Touch, TouchSource, diff,
};

/// Whether a receiver consumed an event.
///
/// `No` keeps the event bubbling down the queue; it is the expected outcome
/// for most deliveries, never an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Handled {
    /// Consumed: stop propagation.
    Yes,
    /// Not consumed: offer to the next queue member.
    No,
}

impl Handled {
    /// `true` for [`Handled::Yes`].
    pub fn is_yes(self) -> bool {
        matches!(self, Self::Yes)
    }
}

#[derive(Clone, Debug, Default)]
struct MouseGesture {
    machine: ButtonPressState<NodeId>,
    /// Positional queue remembered at press time, truncated at the consumer.
    down_queue: Vec<NodeId>,
}

#[derive(Clone, Debug)]
struct TouchGesture {
    down_position: Point,
    down_queue: Vec<NodeId>,
}

/// Offer `event` to queue members in order; the index of the consumer, if any.
fn dispatch_until<S>(queue: &[NodeId], event: &UiEvent, sink: &mut S) -> Option<usize>
where
    S: FnMut(NodeId, &UiEvent) -> Handled,
{
    for (i, &node) in queue.iter().enumerate() {
        if sink(node, event).is_yes() {
            return Some(i);
        }
    }
    None
}

/// The input session: one [`Session::tick`] per host frame.
///
/// Owns everything that crosses tick boundaries — the previous device
/// snapshot, the focus holder, the hovered path, per-button gesture machines,
/// key repeat, the touch bridge, and the remembered mouse-down queues. All
/// event delivery goes through the receiver callback passed to `tick`, which
/// the host points at its widgets; the session itself never stores node data
/// beyond [`NodeId`]s.
#[derive(Clone, Debug, Default)]
pub struct Session {
    prev: Snapshot,
    cursor: Point,
    focus: Option<NodeId>,
    hovered: Vec<NodeId>,
    hover_claimer: Option<NodeId>,
    mouse: HashMap<MouseButton, MouseGesture>,
    touches: HashMap<TouchSource, TouchGesture>,
    key_repeat: KeyRepeatState,
    bridge: TouchBridge,
}

impl Session {
    /// A session with no device state and nothing focused or hovered.
    pub fn new() -> Self {
        Self::default()
    }

    /// The node currently holding keyboard focus.
    pub fn focus(&self) -> Option<NodeId> {
        self.focus
    }

    /// The hovered path, frontmost first, as of the last tick.
    pub fn hovered(&self) -> &[NodeId] {
        &self.hovered
    }

    /// Process one frame of input.
    ///
    /// Diffs `next` against the previous snapshot and synthesizes events in
    /// the diff's deterministic order, except that the cursor move is applied
    /// first: a press or scroll arriving in the same tick as motion must
    /// dispatch at the node under the *new* position. Everything routes
    /// through queues built from `tree`, and the tick finishes by recomputing
    /// hover. Everything is synchronous: when `tick` returns, no event is
    /// still in flight.
    pub fn tick<S>(&mut self, tree: &Tree, next: &Snapshot, now: u64, sink: &mut S)
    where
        S: FnMut(NodeId, &UiEvent) -> Handled,
    {
        let changes = diff(&self.prev, next);
        for change in &changes {
            if let StateChange::MousePositionChanged { from, to } = *change {
                self.handle_mouse_move(tree, from, to, sink);
            }
        }
        for change in changes {
            if matches!(change, StateChange::MousePositionChanged { .. }) {
                continue;
            }
            self.apply_change(tree, change, now, sink);
        }
        if let Some(repeats) = self.key_repeat.poll(now) {
            let event = UiEvent::KeyDown {
                key: repeats.key,
                repeat: true,
            };
            for _ in 0..repeats.count {
                self.dispatch_non_positional(tree, &event, sink);
            }
        }
        self.update_hover(tree, sink);
        self.prev = next.settled();
    }

    fn apply_change<S>(&mut self, tree: &Tree, change: StateChange, now: u64, sink: &mut S)
    where
        S: FnMut(NodeId, &UiEvent) -> Handled,
    {
        match change {
            StateChange::KeyPressed(key) => {
                self.key_repeat.on_key_down(key, now);
                self.dispatch_non_positional(tree, &UiEvent::KeyDown { key, repeat: false }, sink);
                if key == Key::Escape {
                    self.focus = None;
                }
            }
            StateChange::KeyReleased(key) => {
                self.key_repeat.on_key_up(key);
                self.dispatch_non_positional(tree, &UiEvent::KeyUp { key }, sink);
            }
            StateChange::MouseButtonPressed(button) => {
                self.handle_mouse_down(tree, button, self.cursor, now, sink);
            }
            StateChange::MouseButtonReleased(button) => {
                self.handle_mouse_up(tree, button, self.cursor, now, sink);
            }
            StateChange::MousePositionChanged { .. } => {
                // Dispatched up front in `tick`; same-tick button changes
                // need the new cursor.
            }
            StateChange::ScrollChanged { delta } => {
                let position = self.cursor;
                let queue = positional_queue(tree, position);
                dispatch_until(&queue, &UiEvent::Scroll { delta, position }, sink);
            }
            StateChange::TouchDown { source, position } => {
                self.handle_touch_down(tree, Touch { source, position }, now, sink);
            }
            StateChange::TouchMoved { source, from, to } => {
                self.handle_touch_move(tree, Touch { source, position: to }, from, now, sink);
            }
            StateChange::TouchUp { source, position } => {
                self.handle_touch_up(tree, Touch { source, position }, now, sink);
            }
            StateChange::JoystickButtonPressed(button) => {
                self.dispatch_non_positional(tree, &UiEvent::JoystickPress { button }, sink);
            }
            StateChange::JoystickButtonReleased(button) => {
                self.dispatch_non_positional(tree, &UiEvent::JoystickRelease { button }, sink);
            }
            StateChange::JoystickAxisChanged { axis, from, to } => {
                let event = UiEvent::JoystickAxisMove {
                    axis: JoystickAxis { axis, value: to },
                    last_value: from,
                };
                self.dispatch_non_positional(tree, &event, sink);
            }
            StateChange::MidiPressed(note) => {
                self.dispatch_non_positional(tree, &UiEvent::MidiDown { note }, sink);
            }
            StateChange::MidiReleased(note) => {
                self.dispatch_non_positional(tree, &UiEvent::MidiUp { note }, sink);
            }
            StateChange::TabletPenPressed(button) => {
                self.dispatch_non_positional(tree, &UiEvent::TabletPenButtonPress { button }, sink);
            }
            StateChange::TabletPenReleased(button) => {
                self.dispatch_non_positional(
                    tree,
                    &UiEvent::TabletPenButtonRelease { button },
                    sink,
                );
            }
            StateChange::TabletAuxPressed(button) => {
                self.dispatch_non_positional(tree, &UiEvent::TabletAuxButtonPress { button }, sink);
            }
            StateChange::TabletAuxReleased(button) => {
                self.dispatch_non_positional(
                    tree,
                    &UiEvent::TabletAuxButtonRelease { button },
                    sink,
                );
            }
        }
    }

    /// Route a non-positional event: the focus queue first, then the general
    /// queue, skipping nodes the focus queue already visited.
    fn dispatch_non_positional<S>(&self, tree: &Tree, event: &UiEvent, sink: &mut S)
    where
        S: FnMut(NodeId, &UiEvent) -> Handled,
    {
        let fq = match self.focus {
            Some(focus) => focus_queue(tree, focus),
            None => Vec::new(),
        };
        if dispatch_until(&fq, event, sink).is_some() {
            return;
        }
        for node in non_positional_queue(tree) {
            if fq.contains(&node) {
                continue;
            }
            if sink(node, event).is_yes() {
                return;
            }
        }
    }

    fn handle_mouse_down<S>(
        &mut self,
        tree: &Tree,
        button: MouseButton,
        position: Point,
        now: u64,
        sink: &mut S,
    ) where
        S: FnMut(NodeId, &UiEvent) -> Handled,
    {
        let outcome = self
            .mouse
            .entry(button)
            .or_default()
            .machine
            .on_down(position, now);
        let queue = positional_queue(tree, position);
        let consumer = dispatch_until(&queue, &UiEvent::MouseDown { button, position }, sink);
        if outcome.double_click {
            dispatch_until(&queue, &UiEvent::DoubleClick { button, position }, sink);
        }
        let mut down_queue = queue;
        if let Some(i) = consumer {
            down_queue.truncate(i + 1);
        }
        // Focus contention: the frontmost requester in the down queue takes
        // focus; a press over no requester clears it.
        let requester = down_queue.iter().copied().find(|&n| {
            tree.flags(n)
                .is_some_and(|f| f.contains(InputFlags::REQUESTS_FOCUS))
        });
        let _ = self.change_focus(tree, requester);
        if let Some(g) = self.mouse.get_mut(&button) {
            g.down_queue = down_queue;
        }
    }

    fn handle_mouse_move<S>(&mut self, tree: &Tree, from: Point, to: Point, sink: &mut S)
    where
        S: FnMut(NodeId, &UiEvent) -> Handled,
    {
        self.cursor = to;
        let queue = positional_queue(tree, to);
        dispatch_until(
            &queue,
            &UiEvent::MouseMove {
                position: to,
                last_position: from,
            },
            sink,
        );

        // Stable button order, independent of the table's hash order.
        let mut held: Vec<MouseButton> = self.mouse.keys().copied().collect();
        held.sort_unstable();
        for button in held {
            let Some(g) = self.mouse.get_mut(&button) else {
                continue;
            };
            let outcome = g.machine.on_move(to);
            let down_position = g.machine.down_position();
            let drag_target = g.machine.drag_target().copied();
            let down_queue = g.down_queue.clone();

            if outcome.start_drag {
                let Some(down_position) = down_position else {
                    continue;
                };
                let event = UiEvent::DragStart {
                    button,
                    down_position,
                    position: to,
                };
                // Offer along the down queue; decliners bubble to ancestors.
                let mut target = None;
                for &node in &down_queue {
                    if tree.is_alive(node) && sink(node, &event).is_yes() {
                        target = Some(node);
                        break;
                    }
                }
                if let Some(g) = self.mouse.get_mut(&button) {
                    g.machine.set_drag_target(target);
                }
                if let Some(target) = target {
                    let _ = sink(
                        target,
                        &UiEvent::Drag {
                            button,
                            position: to,
                            last_position: from,
                        },
                    );
                }
            } else if outcome.drag
                && let Some(target) = drag_target
                && tree.is_alive(target)
            {
                let _ = sink(
                    target,
                    &UiEvent::Drag {
                        button,
                        position: to,
                        last_position: from,
                    },
                );
            }
        }
    }

    fn handle_mouse_up<S>(
        &mut self,
        tree: &Tree,
        button: MouseButton,
        position: Point,
        now: u64,
        sink: &mut S,
    ) where
        S: FnMut(NodeId, &UiEvent) -> Handled,
    {
        let Some(g) = self.mouse.get_mut(&button) else {
            return;
        };
        let drag_target = g.machine.drag_target().copied();
        let outcome = g.machine.on_up(position, now);
        let down_queue = core::mem::take(&mut g.down_queue);

        // Release replays against the remembered press queue, so the nodes
        // that saw the down always see the up.
        let up = UiEvent::MouseUp { button, position };
        for &node in &down_queue {
            if tree.is_alive(node) && sink(node, &up).is_yes() {
                break;
            }
        }

        if outcome.end_drag
            && let Some(target) = drag_target
            && tree.is_alive(target)
        {
            let _ = sink(target, &UiEvent::DragEnd { button, position });
        }

        if !outcome.click_candidate {
            return;
        }
        // A gesture that strayed past the click distance only clicks when the
        // drag target does not veto it.
        if outcome.exceeded_click_distance
            && drag_target.is_some_and(|t| {
                tree.flags(t)
                    .is_some_and(|f| f.contains(InputFlags::DRAG_BLOCKS_CLICK))
            })
        {
            return;
        }
        // Click lenience: the target is drawn from the intersection of the
        // press queue and the nodes still under the release point.
        let click = UiEvent::Click { button, position };
        for &node in &down_queue {
            if tree.contains_point(node, position) && sink(node, &click).is_yes() {
                break;
            }
        }
    }

    fn handle_touch_down<S>(&mut self, tree: &Tree, touch: Touch, now: u64, sink: &mut S)
    where
        S: FnMut(NodeId, &UiEvent) -> Handled,
    {
        let queue = positional_queue(tree, touch.position);
        let consumer = dispatch_until(&queue, &UiEvent::TouchDown { touch }, sink);
        let mut down_queue = queue;
        if let Some(i) = consumer {
            down_queue.truncate(i + 1);
        }
        self.touches.insert(
            touch.source,
            TouchGesture {
                down_position: touch.position,
                down_queue,
            },
        );
        if let Some(bridged) = self.bridge.on_touch_down(touch) {
            self.apply_bridged(tree, bridged, now, sink);
        }
    }

    fn handle_touch_move<S>(
        &mut self,
        tree: &Tree,
        touch: Touch,
        last_position: Point,
        now: u64,
        sink: &mut S,
    ) where
        S: FnMut(NodeId, &UiEvent) -> Handled,
    {
        if let Some(g) = self.touches.get(&touch.source) {
            let event = UiEvent::TouchMove {
                touch,
                last_position,
                down_position: g.down_position,
            };
            let down_queue = g.down_queue.clone();
            for &node in &down_queue {
                if tree.is_alive(node) && sink(node, &event).is_yes() {
                    break;
                }
            }
        }
        if let Some(bridged) = self.bridge.on_touch_move(touch) {
            self.apply_bridged(tree, bridged, now, sink);
        }
    }

    fn handle_touch_up<S>(&mut self, tree: &Tree, touch: Touch, now: u64, sink: &mut S)
    where
        S: FnMut(NodeId, &UiEvent) -> Handled,
    {
        if let Some(g) = self.touches.remove(&touch.source) {
            let event = UiEvent::TouchUp {
                touch,
                down_position: g.down_position,
            };
            for &node in &g.down_queue {
                if tree.is_alive(node) && sink(node, &event).is_yes() {
                    break;
                }
            }
        }
        if let Some(bridged) = self.bridge.on_touch_up(touch) {
            self.apply_bridged(tree, bridged, now, sink);
        }
    }

    /// The bridged gesture drives the primary button through the same
    /// machinery as the real mouse.
    fn apply_bridged<S>(&mut self, tree: &Tree, bridged: BridgedMouse, now: u64, sink: &mut S)
    where
        S: FnMut(NodeId, &UiEvent) -> Handled,
    {
        match bridged {
            BridgedMouse::Down { position } => {
                self.cursor = position;
                self.handle_mouse_down(tree, MouseButton::Left, position, now, sink);
            }
            BridgedMouse::Move { from, to } => {
                self.handle_mouse_move(tree, from, to, sink);
            }
            BridgedMouse::Up { position } => {
                self.handle_mouse_up(tree, MouseButton::Left, position, now, sink);
            }
        }
    }

    /// Move keyboard focus.
    ///
    /// Focus is only ever given to a node carrying
    /// [`InputFlags::ACCEPTS_FOCUS`]; offering it to any other node leaves
    /// focus where it is and returns `false`. Once held, focus is not revoked
    /// if the flag later turns off — the holder keeps it until focus moves,
    /// Escape drops it, or the node leaves the tree.
    pub fn change_focus(&mut self, tree: &Tree, target: Option<NodeId>) -> bool {
        if let Some(t) = target
            && !tree
                .flags(t)
                .is_some_and(|f| f.contains(InputFlags::ACCEPTS_FOCUS))
        {
            return false;
        }
        self.focus = target;
        true
    }

    /// Recompute the hovered path at the current pointer position.
    ///
    /// Newly entered nodes get `Hover`; the first consumer claims the hover
    /// and cuts off everything behind it. A node that claimed last tick and
    /// is still under the pointer keeps the claim without being asked again.
    /// Nodes that fell out of the path get `HoverLost`.
    fn update_hover<S>(&mut self, tree: &Tree, sink: &mut S)
    where
        S: FnMut(NodeId, &UiEvent) -> Handled,
    {
        let position = self.cursor;
        let queue = positional_queue(tree, position);
        let old = core::mem::take(&mut self.hovered);
        let old_claimer = self.hover_claimer.take();

        let mut new_path = Vec::new();
        let mut claimer = None;
        for &node in &queue {
            new_path.push(node);
            if old.contains(&node) {
                if old_claimer == Some(node) {
                    claimer = Some(node);
                    break;
                }
                continue;
            }
            if sink(node, &UiEvent::Hover { position }).is_yes() {
                claimer = Some(node);
                break;
            }
        }
        for &node in &old {
            if !new_path.contains(&node) && tree.is_alive(node) {
                let _ = sink(node, &UiEvent::HoverLost);
            }
        }
        self.hovered = new_path;
        self.hover_claimer = claimer;
    }

    /// Forget departed nodes.
    ///
    /// The host calls this with the ids returned by `Tree::remove` so that
    /// focus, hover, drag, and press ownership held by nodes no longer in the
    /// tree is cleared deterministically instead of lingering until the id is
    /// reused.
    pub fn notify_removed(&mut self, removed: &[NodeId]) {
        if self.focus.is_some_and(|f| removed.contains(&f)) {
            self.focus = None;
        }
        if self.hover_claimer.is_some_and(|c| removed.contains(&c)) {
            self.hover_claimer = None;
        }
        self.hovered.retain(|n| !removed.contains(n));
        for g in self.mouse.values_mut() {
            g.down_queue.retain(|n| !removed.contains(n));
            if g.machine.drag_target().is_some_and(|t| removed.contains(t)) {
                g.machine.set_drag_target(None);
            }
        }
        for g in self.touches.values_mut() {
            g.down_queue.retain(|n| !removed.contains(n));
        }
    }
}
