// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The binding container: combinations mapped to actions, with concurrency
//! policy.

use alloc::vec::Vec;
use kurbo::Vec2;
use sedge_state::ButtonSet;

use crate::key::{InputKey, KeyCombination, MatchMode};

/// How overlapping matches of the same container may activate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConcurrencyMode {
    /// One active action at a time. Pressing a second binding implicitly
    /// releases the first.
    None,
    /// Multiple distinct actions may be active, but an action already active
    /// through one binding is not re-fired by another.
    Unique,
    /// Every matching binding fires independently, including several
    /// bindings for the same action.
    All,
}

/// Output of the binding layer.
#[derive(Clone, Debug, PartialEq)]
pub enum BindingEvent<A> {
    /// An action became active (or re-fired for an opted-in repeat).
    Pressed {
        /// The action.
        action: A,
        /// `true` when re-fired by key repeat.
        repeat: bool,
    },
    /// An action stopped being active.
    Released {
        /// The action.
        action: A,
    },
    /// A wheel motion matched a binding. Stateless: no paired release.
    Scroll {
        /// The action.
        action: A,
        /// Wheel delta for the tick.
        delta: Vec2,
    },
}

/// One registered binding.
#[derive(Clone, Debug)]
pub struct Binding<A> {
    /// Keys that must be held.
    pub combination: KeyCombination,
    /// Action fired when they are.
    pub action: A,
}

/// An ordered list of bindings plus the pressed-binding and pressed-action
/// state, evaluated against the pressed-key set on every relevant press and
/// release.
///
/// An empty list is valid and simply never matches. When several bindings
/// match the same press, longer combinations win over shorter ones, and
/// registration order breaks ties.
#[derive(Clone, Debug)]
pub struct BindingSet<A> {
    bindings: Vec<Binding<A>>,
    /// How strictly combinations match the pressed set.
    pub match_mode: MatchMode,
    /// Concurrency policy for overlapping matches.
    pub concurrency: ConcurrencyMode,
    /// Re-fire active actions on key repeat. Off by default.
    pub send_repeats: bool,
    pressed_bindings: Vec<usize>,
    pressed_actions: Vec<A>,
}

impl<A: Clone + PartialEq> BindingSet<A> {
    /// An empty container with the given concurrency policy and `Any`
    /// matching.
    pub fn new(concurrency: ConcurrencyMode) -> Self {
        Self {
            bindings: Vec::new(),
            match_mode: MatchMode::default(),
            concurrency,
            send_repeats: false,
            pressed_bindings: Vec::new(),
            pressed_actions: Vec::new(),
        }
    }

    /// Register a binding. Later registrations rank lower among equal-length
    /// matches.
    pub fn push(&mut self, combination: KeyCombination, action: A) {
        self.bindings.push(Binding {
            combination,
            action,
        });
    }

    /// Actions currently active.
    pub fn pressed_actions(&self) -> &[A] {
        &self.pressed_actions
    }

    /// Whether `action` is currently active.
    pub fn is_active(&self, action: &A) -> bool {
        self.pressed_actions.contains(action)
    }

    /// Matching binding indices for a key, best match first.
    ///
    /// A modifier press only ever activates modifier-only combinations, so
    /// holding `A` and then pressing `Ctrl` does not fire a `Ctrl+A`
    /// binding.
    fn candidates(&self, pressed: &ButtonSet<InputKey>, key: InputKey) -> Vec<usize> {
        let mut matches: Vec<usize> = (0..self.bindings.len())
            .filter(|&i| {
                let combination = &self.bindings[i].combination;
                combination.triggered_by(key)
                    && combination.is_pressed(pressed, self.match_mode)
                    && (!key.is_modifier() || combination.is_modifier_only())
            })
            .collect();
        matches.sort_by(|&a, &b| {
            self.bindings[b]
                .combination
                .len()
                .cmp(&self.bindings[a].combination.len())
        });
        matches
    }

    /// Evaluate a key press.
    ///
    /// `pressed` is the full pressed-key set including `new_key`. Repeats
    /// (`repeat = true`) re-fire already-active actions only when
    /// [`BindingSet::send_repeats`] is set; they never activate anything
    /// new.
    pub fn on_pressed<S>(
        &mut self,
        pressed: &ButtonSet<InputKey>,
        new_key: InputKey,
        repeat: bool,
        sink: &mut S,
    ) where
        S: FnMut(BindingEvent<A>),
    {
        if repeat {
            if !self.send_repeats {
                return;
            }
            for &i in &self.pressed_bindings {
                if self.bindings[i].combination.triggered_by(new_key) {
                    sink(BindingEvent::Pressed {
                        action: self.bindings[i].action.clone(),
                        repeat: true,
                    });
                }
            }
            return;
        }
        let matches = self.candidates(pressed, new_key);
        match self.concurrency {
            ConcurrencyMode::None => {
                let Some(&best) = matches.first() else {
                    return;
                };
                if self.pressed_bindings.contains(&best) {
                    return;
                }
                // Implicitly release whatever was active.
                self.pressed_bindings.clear();
                for action in core::mem::take(&mut self.pressed_actions) {
                    sink(BindingEvent::Released { action });
                }
                let action = self.bindings[best].action.clone();
                self.pressed_bindings.push(best);
                self.pressed_actions.push(action.clone());
                sink(BindingEvent::Pressed {
                    action,
                    repeat: false,
                });
            }
            ConcurrencyMode::Unique => {
                for i in matches {
                    if self.pressed_bindings.contains(&i) {
                        continue;
                    }
                    self.pressed_bindings.push(i);
                    let action = self.bindings[i].action.clone();
                    if !self.pressed_actions.contains(&action) {
                        self.pressed_actions.push(action.clone());
                        sink(BindingEvent::Pressed {
                            action,
                            repeat: false,
                        });
                    }
                }
            }
            ConcurrencyMode::All => {
                for i in matches {
                    if self.pressed_bindings.contains(&i) {
                        continue;
                    }
                    self.pressed_bindings.push(i);
                    let action = self.bindings[i].action.clone();
                    self.pressed_actions.push(action.clone());
                    sink(BindingEvent::Pressed {
                        action,
                        repeat: false,
                    });
                }
            }
        }
    }

    /// Evaluate a key release.
    ///
    /// `pressed` is the pressed-key set after the release. A pressed binding
    /// goes only when its combination no longer holds against that set — a
    /// generic modifier requirement stays satisfied while either sided key
    /// remains down. Under `None` and `Unique` an action is released only
    /// when its last live binding goes, keeping press/release counts
    /// balanced; under `All` every binding releases its own action.
    pub fn on_released<S>(
        &mut self,
        pressed: &ButtonSet<InputKey>,
        _released_key: InputKey,
        sink: &mut S,
    ) where
        S: FnMut(BindingEvent<A>),
    {
        let releasing: Vec<usize> = self
            .pressed_bindings
            .iter()
            .copied()
            .filter(|&i| {
                !self.bindings[i]
                    .combination
                    .is_pressed(pressed, self.match_mode)
            })
            .collect();
        for i in releasing {
            self.pressed_bindings.retain(|&j| j != i);
            let action = self.bindings[i].action.clone();
            match self.concurrency {
                ConcurrencyMode::All => {
                    if let Some(pos) = self.pressed_actions.iter().position(|a| *a == action) {
                        self.pressed_actions.remove(pos);
                    }
                    sink(BindingEvent::Released { action });
                }
                _ => {
                    let still_held = self
                        .pressed_bindings
                        .iter()
                        .any(|&j| self.bindings[j].action == action);
                    if still_held {
                        continue;
                    }
                    if let Some(pos) = self.pressed_actions.iter().position(|a| *a == action) {
                        self.pressed_actions.remove(pos);
                        sink(BindingEvent::Released { action });
                    }
                }
            }
        }
    }

    /// Evaluate wheel motion.
    ///
    /// A synthetic [`InputKey::WheelUp`]/[`InputKey::WheelDown`] joins the
    /// pressed set for matching only; no press state is recorded and no
    /// release follows. The concurrency mode still selects recipients the
    /// way it does for presses.
    pub fn on_scroll<S>(&self, pressed: &ButtonSet<InputKey>, delta: Vec2, sink: &mut S)
    where
        S: FnMut(BindingEvent<A>),
    {
        let key = if delta.y > 0.0 {
            InputKey::WheelUp
        } else if delta.y < 0.0 {
            InputKey::WheelDown
        } else {
            return;
        };
        let mut with_wheel = pressed.clone();
        with_wheel.press(key);
        let matches = self.candidates(&with_wheel, key);
        match self.concurrency {
            ConcurrencyMode::None => {
                if let Some(&best) = matches.first() {
                    sink(BindingEvent::Scroll {
                        action: self.bindings[best].action.clone(),
                        delta,
                    });
                }
            }
            ConcurrencyMode::Unique => {
                let mut seen: Vec<A> = Vec::new();
                for i in matches {
                    let action = self.bindings[i].action.clone();
                    if seen.contains(&action) {
                        continue;
                    }
                    seen.push(action.clone());
                    sink(BindingEvent::Scroll { action, delta });
                }
            }
            ConcurrencyMode::All => {
                for i in matches {
                    sink(BindingEvent::Scroll {
                        action: self.bindings[i].action.clone(),
                        delta,
                    });
                }
            }
        }
    }

    /// Release everything that is active, e.g. when the container leaves the
    /// tree or loses the ability to receive input.
    pub fn release_all<S>(&mut self, sink: &mut S)
    where
        S: FnMut(BindingEvent<A>),
    {
        self.pressed_bindings.clear();
        for action in core::mem::take(&mut self.pressed_actions) {
            sink(BindingEvent::Released { action });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sedge_state::Key;

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    enum TestAction {
        A,
        S,
        DOrF,
    }

    fn grid_set(concurrency: ConcurrencyMode) -> BindingSet<TestAction> {
        let mut set = BindingSet::new(concurrency);
        set.push(InputKey::Key(Key::A).into(), TestAction::A);
        set.push(InputKey::Key(Key::S).into(), TestAction::S);
        set.push(InputKey::Key(Key::D).into(), TestAction::DOrF);
        set.push(InputKey::Key(Key::F).into(), TestAction::DOrF);
        set
    }

    /// Drives a binding set while maintaining the pressed-key set the way
    /// dispatch would.
    struct Driver {
        set: BindingSet<TestAction>,
        pressed: ButtonSet<InputKey>,
        log: Vec<BindingEvent<TestAction>>,
    }

    impl Driver {
        fn new(set: BindingSet<TestAction>) -> Self {
            Self {
                set,
                pressed: ButtonSet::new(),
                log: Vec::new(),
            }
        }

        fn press(&mut self, key: Key) {
            let key = InputKey::Key(key);
            self.pressed.press(key);
            let Self { set, pressed, log } = self;
            set.on_pressed(pressed, key, false, &mut |e| log.push(e));
        }

        fn release(&mut self, key: Key) {
            let key = InputKey::Key(key);
            self.pressed.release(key);
            let Self { set, pressed, log } = self;
            set.on_released(pressed, key, &mut |e| log.push(e));
        }

        fn presses(&self, action: TestAction) -> usize {
            self.log
                .iter()
                .filter(|e| matches!(e, BindingEvent::Pressed { action: a, .. } if *a == action))
                .count()
        }

        fn releases(&self, action: TestAction) -> usize {
            self.log
                .iter()
                .filter(|e| matches!(e, BindingEvent::Released { action: a } if *a == action))
                .count()
        }
    }

    #[test]
    fn unique_overlapping_actions_fire_once_each() {
        let mut d = Driver::new(grid_set(ConcurrencyMode::Unique));
        d.press(Key::A);
        d.press(Key::S);
        d.release(Key::A);
        d.release(Key::S);

        assert_eq!(d.presses(TestAction::A), 1);
        assert_eq!(d.presses(TestAction::S), 1);
        assert_eq!(d.releases(TestAction::A), 1);
        assert_eq!(d.releases(TestAction::S), 1);
    }

    #[test]
    fn unique_shared_action_releases_with_its_last_binding() {
        let mut d = Driver::new(grid_set(ConcurrencyMode::Unique));
        d.press(Key::D);
        d.press(Key::F);
        assert_eq!(d.presses(TestAction::DOrF), 1);

        d.release(Key::D);
        assert_eq!(d.releases(TestAction::DOrF), 0);
        assert!(d.set.is_active(&TestAction::DOrF));

        d.release(Key::F);
        assert_eq!(d.releases(TestAction::DOrF), 1);
        assert!(!d.set.is_active(&TestAction::DOrF));
    }

    #[test]
    fn none_mode_releases_the_previous_action_implicitly() {
        let mut d = Driver::new(grid_set(ConcurrencyMode::None));
        d.press(Key::A);
        assert_eq!(d.presses(TestAction::A), 1);

        // S takes over while A is still held.
        d.press(Key::S);
        assert_eq!(d.releases(TestAction::A), 1);
        assert_eq!(d.presses(TestAction::S), 1);

        // The stale A release is a no-op; S's release balances.
        d.release(Key::A);
        d.release(Key::S);
        assert_eq!(d.releases(TestAction::S), 1);
        assert_eq!(d.presses(TestAction::A), d.releases(TestAction::A));
        assert_eq!(d.presses(TestAction::S), d.releases(TestAction::S));
    }

    #[test]
    fn all_mode_fires_every_binding() {
        let mut d = Driver::new(grid_set(ConcurrencyMode::All));
        d.press(Key::D);
        d.press(Key::F);
        assert_eq!(d.presses(TestAction::DOrF), 2);

        d.release(Key::D);
        d.release(Key::F);
        assert_eq!(d.releases(TestAction::DOrF), 2);
    }

    #[test]
    fn longer_combination_wins() {
        let mut set: BindingSet<&str> = BindingSet::new(ConcurrencyMode::None);
        set.push(InputKey::Key(Key::A).into(), "a");
        set.push(
            KeyCombination::new([InputKey::Control, InputKey::Key(Key::A)]),
            "ctrl_a",
        );

        let mut pressed = ButtonSet::new();
        pressed.press(InputKey::Key(Key::LCtrl));
        pressed.press(InputKey::Key(Key::A));
        let mut log = Vec::new();
        set.on_pressed(&pressed, InputKey::Key(Key::A), false, &mut |e| log.push(e));

        assert_eq!(
            log,
            [BindingEvent::Pressed {
                action: "ctrl_a",
                repeat: false
            }]
        );
    }

    #[test]
    fn modifier_press_only_activates_modifier_only_bindings() {
        let mut set: BindingSet<&str> = BindingSet::new(ConcurrencyMode::Unique);
        set.push(InputKey::Shift.into(), "shift");
        set.push(
            KeyCombination::new([InputKey::Shift, InputKey::Key(Key::A)]),
            "shift_a",
        );

        // A is already held; pressing shift must not fire shift+a.
        let mut pressed = ButtonSet::new();
        pressed.press(InputKey::Key(Key::A));
        pressed.press(InputKey::Key(Key::LShift));
        let mut log = Vec::new();
        set.on_pressed(&pressed, InputKey::Key(Key::LShift), false, &mut |e| {
            log.push(e);
        });

        assert_eq!(
            log,
            [BindingEvent::Pressed {
                action: "shift",
                repeat: false
            }]
        );
    }

    #[test]
    fn repeats_only_fire_when_opted_in() {
        let mut d = Driver::new(grid_set(ConcurrencyMode::Unique));
        d.press(Key::A);
        let Driver { set, pressed, log } = &mut d;
        set.on_pressed(pressed, InputKey::Key(Key::A), true, &mut |e| log.push(e));
        assert_eq!(d.presses(TestAction::A), 1);

        d.set.send_repeats = true;
        let Driver { set, pressed, log } = &mut d;
        set.on_pressed(pressed, InputKey::Key(Key::A), true, &mut |e| log.push(e));
        assert_eq!(d.presses(TestAction::A), 2);
        assert!(matches!(
            d.log.last(),
            Some(BindingEvent::Pressed { repeat: true, .. })
        ));
        // A repeat is not a second activation.
        d.release(Key::A);
        assert_eq!(d.releases(TestAction::A), 1);
    }

    #[test]
    fn generic_modifier_binding_survives_losing_one_side() {
        let mut set: BindingSet<&str> = BindingSet::new(ConcurrencyMode::Unique);
        set.push(InputKey::Shift.into(), "shift");

        let mut pressed = ButtonSet::new();
        let mut log = Vec::new();
        pressed.press(InputKey::Key(Key::LShift));
        set.on_pressed(&pressed, InputKey::Key(Key::LShift), false, &mut |e| {
            log.push(e);
        });
        pressed.press(InputKey::Key(Key::RShift));
        set.on_pressed(&pressed, InputKey::Key(Key::RShift), false, &mut |e| {
            log.push(e);
        });
        assert_eq!(
            log,
            [BindingEvent::Pressed {
                action: "shift",
                repeat: false
            }]
        );

        // One side lifts; the other still satisfies the combination.
        pressed.release(InputKey::Key(Key::LShift));
        set.on_released(&pressed, InputKey::Key(Key::LShift), &mut |e| log.push(e));
        assert_eq!(log.len(), 1);
        assert!(set.is_active(&"shift"));

        pressed.release(InputKey::Key(Key::RShift));
        set.on_released(&pressed, InputKey::Key(Key::RShift), &mut |e| log.push(e));
        assert_eq!(log.last(), Some(&BindingEvent::Released { action: "shift" }));
        assert!(!set.is_active(&"shift"));
    }

    #[test]
    fn scroll_is_stateless_and_respects_modifiers() {
        let mut set: BindingSet<&str> = BindingSet::new(ConcurrencyMode::None);
        set.push(InputKey::WheelUp.into(), "volume_up");
        set.push(
            KeyCombination::new([InputKey::Control, InputKey::WheelUp]),
            "zoom_in",
        );

        let mut log = Vec::new();
        set.on_scroll(&ButtonSet::new(), Vec2::new(0.0, 1.0), &mut |e| log.push(e));
        assert_eq!(
            log,
            [BindingEvent::Scroll {
                action: "volume_up",
                delta: Vec2::new(0.0, 1.0)
            }]
        );
        assert!(set.pressed_actions().is_empty());

        let mut ctrl = ButtonSet::new();
        ctrl.press(InputKey::Key(Key::LCtrl));
        log.clear();
        set.on_scroll(&ctrl, Vec2::new(0.0, 1.0), &mut |e| log.push(e));
        assert_eq!(
            log,
            [BindingEvent::Scroll {
                action: "zoom_in",
                delta: Vec2::new(0.0, 1.0)
            }]
        );
    }

    #[test]
    fn empty_set_never_matches() {
        let mut set: BindingSet<&str> = BindingSet::new(ConcurrencyMode::All);
        let mut pressed = ButtonSet::new();
        pressed.press(InputKey::Key(Key::A));
        let mut log = Vec::new();
        set.on_pressed(&pressed, InputKey::Key(Key::A), false, &mut |e| log.push(e));
        set.on_scroll(&pressed, Vec2::new(0.0, 1.0), &mut |e| log.push(e));
        assert!(log.is_empty());
    }

    #[test]
    fn release_all_balances_everything() {
        let mut d = Driver::new(grid_set(ConcurrencyMode::Unique));
        d.press(Key::A);
        d.press(Key::S);
        let Driver { set, log, .. } = &mut d;
        set.release_all(&mut |e| log.push(e));

        assert_eq!(d.presses(TestAction::A), d.releases(TestAction::A));
        assert_eq!(d.presses(TestAction::S), d.releases(TestAction::S));
        assert!(d.set.pressed_actions().is_empty());
    }
}
