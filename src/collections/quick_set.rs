use std::collections::HashMap;
use std::hash::Hash;

/// A set with O(1) insert, remove, and slot lookup.
///
/// Values live in a dense vector; a map records each value's slot.
/// Removal moves the last value into the hole, so insertion order is
/// only preserved until the first removal.
#[derive(Debug, Clone)]
pub struct QuickRemovableSet<T> {
    slots: HashMap<T, usize>,
    values: Vec<T>,
}

impl<T> Default for QuickRemovableSet<T> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            values: Vec::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> QuickRemovableSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set with room for `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: HashMap::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Appends `value` unless it is already present.
    ///
    /// Returns `true` if the value was inserted.
    pub fn add(&mut self, value: T) -> bool {
        if self.slots.contains_key(&value) {
            return false;
        }
        self.slots.insert(value, self.values.len());
        self.values.push(value);
        true
    }

    /// Removes `value`, filling its slot with the current last value.
    ///
    /// Returns `true` if the value was present.
    pub fn remove(&mut self, value: &T) -> bool {
        let Some(slot) = self.slots.remove(value) else {
            return false;
        };
        self.values.swap_remove(slot);
        if let Some(&moved) = self.values.get(slot) {
            self.slots.insert(moved, slot);
        }
        true
    }

    /// Current slot of `value`, if present.
    #[must_use]
    pub fn find(&self, value: &T) -> Option<usize> {
        self.slots.get(value).copied()
    }

    /// Returns `true` if `value` is present.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.slots.contains_key(value)
    }

    /// Value stored at `slot`.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<T> {
        self.values.get(slot).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in slot order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }
}

impl<'a, T: Copy + Eq + Hash> IntoIterator for &'a QuickRemovableSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<T: Copy + Eq + Hash> FromIterator<T> for QuickRemovableSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.add(value);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn add_is_idempotent() {
        let mut set = QuickRemovableSet::new();
        assert!(set.add(7));
        assert!(!set.add(7));
        assert_eq!(set.len(), 1);
        assert_eq!(set.find(&7), Some(0));
    }

    #[test]
    fn remove_moves_last_into_hole() {
        let mut set: QuickRemovableSet<u32> = [10, 20, 30, 40].into_iter().collect();
        assert!(set.remove(&20));
        assert_eq!(set.as_slice(), &[10, 40, 30]);
        assert_eq!(set.find(&40), Some(1));
        assert_eq!(set.find(&20), None);
    }

    #[test]
    fn remove_last_and_missing() {
        let mut set: QuickRemovableSet<u32> = [1, 2].into_iter().collect();
        assert!(set.remove(&2));
        assert!(!set.remove(&2));
        assert!(!set.remove(&99));
        assert_eq!(set.as_slice(), &[1]);
        assert_eq!(set.find(&1), Some(0));
    }

    #[test]
    fn removed_value_can_be_re_added() {
        let mut set: QuickRemovableSet<u32> = [1, 2, 3].into_iter().collect();
        set.remove(&1);
        assert!(set.add(1));
        assert_eq!(set.len(), 3);
        assert_eq!(set.find(&1), Some(2));
    }

    proptest! {
        #[test]
        fn slots_always_match_values(ops in prop::collection::vec((any::<bool>(), 0u8..16), 0..200)) {
            let mut set = QuickRemovableSet::new();
            let mut model = std::collections::HashSet::new();
            for (insert, value) in ops {
                if insert {
                    prop_assert_eq!(set.add(value), model.insert(value));
                } else {
                    prop_assert_eq!(set.remove(&value), model.remove(&value));
                }
            }
            prop_assert_eq!(set.len(), model.len());
            for (slot, value) in set.iter().enumerate() {
                prop_assert_eq!(set.find(value), Some(slot));
                prop_assert!(model.contains(value));
            }
        }
    }
}
