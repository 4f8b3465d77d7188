// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key repeat synthesis.

use sedge_state::Key;

/// Milliseconds a key must stay held before the first repeat.
pub const REPEAT_INITIAL_DELAY: u64 = 250;

/// Milliseconds between repeats once repeating.
pub const REPEAT_INTERVAL: u64 = 70;

#[derive(Clone, Debug)]
struct Repeat {
    key: Key,
    next_due: u64,
}

/// Repeats due for the held key, reported by [`KeyRepeatState::poll`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyRepeats {
    /// The repeating key.
    pub key: Key,
    /// How many repeat ticks elapsed since the last poll. One repeat
    /// `KeyDown` is synthesized per tick, so a stalled caller catches up
    /// deterministically.
    pub count: u32,
}

/// Synthesizes repeat `KeyDown`s for the most recently pressed held key.
///
/// Only one key repeats at a time: pressing a new key moves the repeat to it
/// and restarts the initial delay, matching platform keyboard behavior.
/// Modifier keys are exempt — they neither repeat nor steal the repeat from
/// a held key.
#[derive(Clone, Debug, Default)]
pub struct KeyRepeatState {
    active: Option<Repeat>,
}

impl KeyRepeatState {
    /// A state with no key held.
    pub fn new() -> Self {
        Self::default()
    }

    /// The key currently scheduled to repeat.
    pub fn repeating_key(&self) -> Option<Key> {
        self.active.as_ref().map(|r| r.key)
    }

    /// Record a key press at `now`.
    pub fn on_key_down(&mut self, key: Key, now: u64) {
        if key.is_modifier() {
            return;
        }
        self.active = Some(Repeat {
            key,
            next_due: now.saturating_add(REPEAT_INITIAL_DELAY),
        });
    }

    /// Record a key release.
    ///
    /// Releasing the repeating key stops the repeat; releasing any other key
    /// (including the key the repeat moved away from) changes nothing.
    pub fn on_key_up(&mut self, key: Key) {
        if self.active.as_ref().is_some_and(|r| r.key == key) {
            self.active = None;
        }
    }

    /// Collect repeats due by `now` and schedule the next one.
    pub fn poll(&mut self, now: u64) -> Option<KeyRepeats> {
        let repeat = self.active.as_mut()?;
        if now < repeat.next_due {
            return None;
        }
        let elapsed = now - repeat.next_due;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "bounded by elapsed milliseconds / REPEAT_INTERVAL"
        )]
        let count = (elapsed / REPEAT_INTERVAL) as u32 + 1;
        repeat.next_due += u64::from(count) * REPEAT_INTERVAL;
        Some(KeyRepeats {
            key: repeat.key,
            count,
        })
    }

    /// Stop repeating without a key-up, e.g. when focus routing changes the
    /// pressed-key bookkeeping wholesale.
    pub fn clear(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_repeat_before_initial_delay() {
        let mut state = KeyRepeatState::new();
        state.on_key_down(Key::A, 1000);
        assert_eq!(state.poll(1000), None);
        assert_eq!(state.poll(1249), None);
    }

    #[test]
    fn first_repeat_after_initial_delay_then_interval() {
        let mut state = KeyRepeatState::new();
        state.on_key_down(Key::A, 1000);

        let r = state.poll(1250).unwrap();
        assert_eq!(r, KeyRepeats { key: Key::A, count: 1 });

        // Next due at 1320.
        assert_eq!(state.poll(1319), None);
        let r = state.poll(1320).unwrap();
        assert_eq!(r.count, 1);
    }

    #[test]
    fn stalled_poll_catches_up() {
        let mut state = KeyRepeatState::new();
        state.on_key_down(Key::A, 0);

        // 250 + 3 * 70 = 460: the repeats due at 250, 320, 390, 460.
        let r = state.poll(460).unwrap();
        assert_eq!(r.count, 4);
        assert_eq!(state.poll(461), None);
    }

    #[test]
    fn release_stops_repeat() {
        let mut state = KeyRepeatState::new();
        state.on_key_down(Key::A, 0);
        state.on_key_up(Key::A);
        assert_eq!(state.poll(10_000), None);
    }

    #[test]
    fn newer_key_takes_over_and_resets_delay() {
        let mut state = KeyRepeatState::new();
        state.on_key_down(Key::A, 0);
        state.on_key_down(Key::B, 200);

        assert_eq!(state.repeating_key(), Some(Key::B));
        assert_eq!(state.poll(300), None);
        assert_eq!(state.poll(450).unwrap().key, Key::B);

        // Releasing the displaced key changes nothing.
        state.on_key_up(Key::A);
        assert_eq!(state.repeating_key(), Some(Key::B));
    }

    #[test]
    fn modifiers_never_repeat_nor_steal() {
        let mut state = KeyRepeatState::new();
        state.on_key_down(Key::LShift, 0);
        assert_eq!(state.poll(10_000), None);

        state.on_key_down(Key::A, 0);
        state.on_key_down(Key::LCtrl, 100);
        assert_eq!(state.repeating_key(), Some(Key::A));
        assert_eq!(state.poll(250).unwrap().key, Key::A);
    }
}
