// Copyright 2025 the Sedge Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A duplicate-free, insertion-ordered set of pressed button identifiers.

use smallvec::SmallVec;

/// Set of currently pressed identifiers for one device class.
///
/// Invariant: no duplicate identifiers. [`ButtonSet::press`] and
/// [`ButtonSet::release`] report whether the set actually changed, so a
/// redundant press (e.g. a platform repeat notification) is a visible no-op
/// rather than a phantom second press.
///
/// Iteration order is insertion order, which keeps diffs and downstream event
/// sequences deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonSet<B> {
    pressed: SmallVec<[B; 8]>,
}

impl<B: Copy + PartialEq> ButtonSet<B> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            pressed: SmallVec::new(),
        }
    }

    /// Mark `button` pressed. Returns `true` if it was not already pressed.
    pub fn press(&mut self, button: B) -> bool {
        if self.pressed.contains(&button) {
            return false;
        }
        self.pressed.push(button);
        true
    }

    /// Mark `button` released. Returns `true` if it was pressed.
    pub fn release(&mut self, button: B) -> bool {
        match self.pressed.iter().position(|b| *b == button) {
            Some(i) => {
                self.pressed.remove(i);
                true
            }
            None => false,
        }
    }

    /// Whether `button` is currently pressed.
    pub fn is_pressed(&self, button: B) -> bool {
        self.pressed.contains(&button)
    }

    /// Number of pressed identifiers.
    pub fn len(&self) -> usize {
        self.pressed.len()
    }

    /// Whether nothing is pressed.
    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }

    /// Iterate pressed identifiers in insertion (press) order.
    pub fn iter(&self) -> impl Iterator<Item = B> + '_ {
        self.pressed.iter().copied()
    }

    /// Identifiers pressed in `self` but not in `other`.
    pub fn difference<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = B> + 'a {
        self.pressed
            .iter()
            .copied()
            .filter(move |b| !other.is_pressed(*b))
    }
}

impl<B: Copy + PartialEq> Default for ButtonSet<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Copy + PartialEq> FromIterator<B> for ButtonSet<B> {
    fn from_iter<I: IntoIterator<Item = B>>(iter: I) -> Self {
        let mut set = Self::new();
        for b in iter {
            set.press(b);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_duplicate_free() {
        let mut set = ButtonSet::new();
        assert!(set.press(1_u8));
        assert!(!set.press(1_u8));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn release_reports_change() {
        let mut set = ButtonSet::new();
        set.press(3_u8);
        assert!(set.release(3));
        assert!(!set.release(3));
        assert!(set.is_empty());
    }

    #[test]
    fn iteration_is_press_ordered() {
        let mut set = ButtonSet::new();
        set.press(5_u8);
        set.press(2);
        set.press(9);
        set.release(2);
        set.press(2);
        let order: alloc::vec::Vec<u8> = set.iter().collect();
        assert_eq!(order, [5, 9, 2]);
    }

    #[test]
    fn difference_respects_order() {
        let a: ButtonSet<u8> = [1, 2, 3, 4].into_iter().collect();
        let b: ButtonSet<u8> = [2, 4].into_iter().collect();
        let d: alloc::vec::Vec<u8> = a.difference(&b).collect();
        assert_eq!(d, [1, 3]);
    }
}
