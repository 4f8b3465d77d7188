// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sedge Bindings: key combinations mapped to typed actions.
//!
//! ## Overview
//!
//! The binding layer sits on top of normal event dispatch: a node hosting a
//! [`BindingSet`] feeds it the key, mouse, joystick, midi, and tablet events
//! it receives, and gets typed action presses and releases back out. Keys
//! from every device share one identifier space ([`InputKey`]) so a single
//! [`KeyCombination`] can mix them, and generic modifier requirements
//! (`Shift`, `Control`, ...) match either sided key.
//!
//! Two policies shape evaluation:
//!
//! - [`MatchMode`] — how strictly the pressed set must match a combination
//!   (`Any`, `Exact`, `Modifiers`).
//! - [`ConcurrencyMode`] — whether overlapping matches may be active at once
//!   (`None`, `Unique`, `All`).
//!
//! Longer combinations outrank shorter ones, so `Ctrl+A` beats a plain `A`
//! binding when both hold. Press/release counts stay balanced per action for
//! every mode except `All`, which deliberately fires per binding.
//!
//! ## Example
//!
//! ```
//! use sedge_bindings::{BindingEvent, BindingSet, ConcurrencyMode, InputKey, KeyCombination};
//! use sedge_state::{ButtonSet, Key};
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq)]
//! enum Action {
//!     Select,
//! }
//!
//! let mut bindings = BindingSet::new(ConcurrencyMode::Unique);
//! bindings.push(
//!     KeyCombination::new([InputKey::Control, InputKey::Key(Key::A)]),
//!     Action::Select,
//! );
//!
//! let mut pressed = ButtonSet::new();
//! pressed.press(InputKey::Key(Key::LCtrl));
//! pressed.press(InputKey::Key(Key::A));
//!
//! let mut fired = Vec::new();
//! bindings.on_pressed(&pressed, InputKey::Key(Key::A), false, &mut |e| fired.push(e));
//! assert_eq!(
//!     fired,
//!     [BindingEvent::Pressed { action: Action::Select, repeat: false }]
//! );
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod key;
mod set;

pub use key::{InputKey, KeyCombination, MatchMode};
pub use set::{Binding, BindingEvent, BindingSet, ConcurrencyMode};
