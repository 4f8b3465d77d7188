// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The full input pipeline: device snapshots → session dispatch → bindings.
//!
//! This example builds a small scene (a draggable card and a focusable text
//! field inside a root panel), then drives it with synthetic snapshots:
//! hover, a drag gesture, a click that moves focus, and a `Ctrl+S` chord
//! evaluated by a binding set.
//!
//! Run:
//! - `cargo run -p sedge_demos --example input_pipeline`

use kurbo::{Point, Rect};
use sedge_bindings::{BindingSet, ConcurrencyMode, InputKey, KeyCombination};
use sedge_events::UiEvent;
use sedge_scene::{InputFlags, LocalNode, NodeId, Tree};
use sedge_session::{Handled, Session};
use sedge_state::{ButtonSet, Key, MouseButton, Snapshot};

fn main() {
    let mut tree = Tree::new();
    let root = tree.insert(
        None,
        LocalNode::with_bounds(Rect::new(0.0, 0.0, 400.0, 300.0)),
    );
    let card = tree.insert(
        Some(root),
        LocalNode::with_bounds(Rect::new(20.0, 20.0, 140.0, 120.0)),
    );
    let field = tree.insert(
        Some(root),
        LocalNode::with_bounds(Rect::new(200.0, 20.0, 380.0, 60.0)).flags(
            InputFlags::default() | InputFlags::REQUESTS_FOCUS | InputFlags::ACCEPTS_FOCUS,
        ),
    );
    tree.commit();

    let mut bindings: BindingSet<&str> = BindingSet::new(ConcurrencyMode::Unique);
    bindings.push(
        KeyCombination::new([InputKey::Control, InputKey::Key(Key::S)]),
        "save",
    );
    let mut pressed: ButtonSet<InputKey> = ButtonSet::new();

    let label = move |node: NodeId| {
        if node == root {
            "root"
        } else if node == card {
            "card"
        } else if node == field {
            "field"
        } else {
            "?"
        }
    };

    // The root hosts the binding set; everything else just reports. The card
    // consumes drag starts so it owns drag gestures.
    let mut sink = |node: NodeId, event: &UiEvent| {
        println!("{:>5} <- {event:?}", label(node));
        match *event {
            UiEvent::KeyDown { key, repeat } if node == root => {
                let key = InputKey::Key(key);
                pressed.press(key);
                bindings.on_pressed(&pressed, key, repeat, &mut |fired| {
                    println!("      binding: {fired:?}");
                });
                Handled::No
            }
            UiEvent::KeyUp { key } if node == root => {
                let key = InputKey::Key(key);
                pressed.release(key);
                bindings.on_released(&pressed, key, &mut |fired| {
                    println!("      binding: {fired:?}");
                });
                Handled::No
            }
            UiEvent::DragStart { .. } if node == card => Handled::Yes,
            _ => Handled::No,
        }
    };

    let mut session = Session::new();
    let mut snap = Snapshot::new();
    let mut now = 0_u64;
    let mut tick = |session: &mut Session, snap: &Snapshot, now: &mut u64| {
        *now += 16;
        println!("-- tick @{now}ms");
        session.tick(&tree, snap, *now, &mut sink);
    };

    // Hover the card, then drag it 60px to the right.
    snap.mouse_position = Point::new(60.0, 60.0);
    tick(&mut session, &snap, &mut now);
    snap.mouse_buttons.press(MouseButton::Left);
    tick(&mut session, &snap, &mut now);
    snap.mouse_position = Point::new(120.0, 60.0);
    tick(&mut session, &snap, &mut now);
    snap.mouse_buttons.release(MouseButton::Left);
    tick(&mut session, &snap, &mut now);

    // Click the text field; it requests focus.
    snap.mouse_position = Point::new(250.0, 40.0);
    tick(&mut session, &snap, &mut now);
    snap.taps.mouse.push(MouseButton::Left);
    tick(&mut session, &snap, &mut now);
    snap.taps.mouse.clear();
    println!("focus is now on {:?}", session.focus().map(label));

    // Ctrl+S reaches the root through the focus queue and fires "save".
    snap.keys.press(Key::LCtrl);
    tick(&mut session, &snap, &mut now);
    snap.keys.press(Key::S);
    tick(&mut session, &snap, &mut now);
    snap.keys.release(Key::S);
    snap.keys.release(Key::LCtrl);
    tick(&mut session, &snap, &mut now);
}
