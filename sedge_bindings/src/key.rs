// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The unified binding key space and key combinations.

use sedge_state::{
    ButtonSet, JoystickButton, Key, MidiKey, MouseButton, TabletAuxButton, TabletPenButton,
};
use smallvec::SmallVec;

/// A single identifier in the binding key space.
///
/// Unifies every pressable input across devices so one combination can mix
/// keyboard keys, mouse buttons, wheel directions, joystick, midi, and
/// tablet buttons. The generic modifiers (`Shift`, `Control`, `Alt`,
/// `Super`) match either sided key; a sided requirement like
/// [`Key::LShift`] matches only that side.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputKey {
    /// Either shift key.
    Shift,
    /// Either control key.
    Control,
    /// Either alt key.
    Alt,
    /// Either super (meta) key.
    Super,
    /// A keyboard key, including sided modifiers.
    Key(Key),
    /// A mouse button.
    Mouse(MouseButton),
    /// Upward wheel motion. Synthetic: joins the pressed set only for the
    /// duration of a scroll match.
    WheelUp,
    /// Downward wheel motion.
    WheelDown,
    /// A joystick button.
    Joystick(JoystickButton),
    /// A midi key.
    Midi(MidiKey),
    /// A tablet pen button.
    TabletPen(TabletPenButton),
    /// A tablet auxiliary button.
    TabletAux(TabletAuxButton),
}

impl InputKey {
    /// Whether this is a modifier (generic or sided).
    pub fn is_modifier(self) -> bool {
        match self {
            Self::Shift | Self::Control | Self::Alt | Self::Super => true,
            Self::Key(k) => k.is_modifier(),
            _ => false,
        }
    }

    /// Collapse a sided modifier to its generic form; everything else is
    /// unchanged.
    pub fn generalized(self) -> Self {
        match self {
            Self::Key(Key::LShift | Key::RShift) => Self::Shift,
            Self::Key(Key::LCtrl | Key::RCtrl) => Self::Control,
            Self::Key(Key::LAlt | Key::RAlt) => Self::Alt,
            Self::Key(Key::LSuper | Key::RSuper) => Self::Super,
            other => other,
        }
    }

    /// Whether a pressed `key` satisfies this requirement.
    pub fn satisfied_by(self, key: Self) -> bool {
        self == key || key.generalized() == self
    }
}

impl From<Key> for InputKey {
    fn from(key: Key) -> Self {
        Self::Key(key)
    }
}

impl From<MouseButton> for InputKey {
    fn from(button: MouseButton) -> Self {
        Self::Mouse(button)
    }
}

impl From<JoystickButton> for InputKey {
    fn from(button: JoystickButton) -> Self {
        Self::Joystick(button)
    }
}

impl From<MidiKey> for InputKey {
    fn from(key: MidiKey) -> Self {
        Self::Midi(key)
    }
}

impl From<TabletPenButton> for InputKey {
    fn from(button: TabletPenButton) -> Self {
        Self::TabletPen(button)
    }
}

impl From<TabletAuxButton> for InputKey {
    fn from(button: TabletAuxButton) -> Self {
        Self::TabletAux(button)
    }
}

/// How strictly the pressed set must match a combination's required keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Every required key is pressed; unrelated extras are tolerated.
    #[default]
    Any,
    /// The pressed set equals the required set after modifier
    /// generalization.
    Exact,
    /// Every required key is pressed and every pressed *modifier* is
    /// required; non-modifier extras are tolerated.
    Modifiers,
}

/// An ordered, duplicate-free set of required keys.
///
/// Combinations are canonically sorted, so two combinations built from the
/// same keys in different orders compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyCombination {
    keys: SmallVec<[InputKey; 4]>,
}

impl KeyCombination {
    /// Build a combination from required keys, deduplicating.
    pub fn new(keys: impl IntoIterator<Item = InputKey>) -> Self {
        let mut keys: SmallVec<[InputKey; 4]> = keys.into_iter().collect();
        keys.sort_unstable();
        keys.dedup();
        Self { keys }
    }

    /// The required keys, in canonical order.
    pub fn keys(&self) -> &[InputKey] {
        &self.keys
    }

    /// Number of required keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no keys are required. An empty combination never matches.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether every required key is a modifier.
    pub fn is_modifier_only(&self) -> bool {
        self.keys.iter().all(|k| k.is_modifier())
    }

    /// Whether the press or release of `key` is relevant to this
    /// combination.
    pub fn triggered_by(&self, key: InputKey) -> bool {
        self.keys.iter().any(|r| r.satisfied_by(key))
    }

    /// Whether this combination holds against the pressed set under `mode`.
    pub fn is_pressed(&self, pressed: &ButtonSet<InputKey>, mode: MatchMode) -> bool {
        if self.keys.is_empty() {
            return false;
        }
        let all_required = self
            .keys
            .iter()
            .all(|&r| pressed.iter().any(|p| r.satisfied_by(p)));
        if !all_required {
            return false;
        }
        match mode {
            MatchMode::Any => true,
            MatchMode::Exact => pressed
                .iter()
                .all(|p| self.keys.iter().any(|&r| r.satisfied_by(p))),
            MatchMode::Modifiers => pressed
                .iter()
                .filter(|p| p.is_modifier())
                .all(|p| self.keys.iter().any(|&r| r.satisfied_by(p))),
        }
    }
}

impl From<InputKey> for KeyCombination {
    fn from(key: InputKey) -> Self {
        Self::new([key])
    }
}

impl FromIterator<InputKey> for KeyCombination {
    fn from_iter<I: IntoIterator<Item = InputKey>>(iter: I) -> Self {
        Self::new(iter)
    }
}
