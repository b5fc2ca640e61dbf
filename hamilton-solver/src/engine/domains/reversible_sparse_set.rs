use crate::engine::TrailedInteger;
use crate::engine::TrailedValues;

/// A subset of `0..capacity` stored as a permutation of the universe with a trailed size.
///
/// The members are `elements[..size]`. Removing swaps the value just past the members and
/// decrements the size; inserting swaps it into position `size` and increments the size.
/// Restoring the size on backtracking therefore undoes either kind of change, provided that
/// between two checkpoints a set only shrinks or only grows. This is the case for both parts of a
/// graph domain: envelopes only lose members and kernels only gain members during search.
#[derive(Debug, Clone)]
pub(crate) struct ReversibleSparseSet {
    elements: Vec<u32>,
    positions: Vec<u32>,
    size: TrailedInteger,
}

impl ReversibleSparseSet {
    /// Creates an empty set over `0..capacity`.
    pub(crate) fn new(capacity: usize, trailed_values: &mut TrailedValues) -> Self {
        ReversibleSparseSet {
            elements: (0..capacity as u32).collect(),
            positions: (0..capacity as u32).collect(),
            size: trailed_values.grow(0),
        }
    }

    pub(crate) fn len(&self, trailed_values: &TrailedValues) -> usize {
        trailed_values.read(self.size) as usize
    }

    pub(crate) fn contains(&self, value: usize, trailed_values: &TrailedValues) -> bool {
        (self.positions[value] as usize) < self.len(trailed_values)
    }

    /// Returns whether the set changed.
    pub(crate) fn insert(&mut self, value: usize, trailed_values: &mut TrailedValues) -> bool {
        let size = self.len(trailed_values);
        if (self.positions[value] as usize) < size {
            return false;
        }

        self.swap_to(value, size);
        trailed_values.add_assign(self.size, 1);
        true
    }

    /// Returns whether the set changed.
    pub(crate) fn remove(&mut self, value: usize, trailed_values: &mut TrailedValues) -> bool {
        let size = self.len(trailed_values);
        if (self.positions[value] as usize) >= size {
            return false;
        }

        self.swap_to(value, size - 1);
        trailed_values.add_assign(self.size, -1);
        true
    }

    pub(crate) fn iter<'a>(
        &'a self,
        trailed_values: &TrailedValues,
    ) -> impl Iterator<Item = usize> + 'a {
        self.elements[..self.len(trailed_values)]
            .iter()
            .map(|&element| element as usize)
    }

    fn swap_to(&mut self, value: usize, target_position: usize) {
        let current_position = self.positions[value] as usize;
        let displaced = self.elements[target_position];

        self.elements.swap(current_position, target_position);
        self.positions[displaced as usize] = current_position as u32;
        self.positions[value] = target_position as u32;
    }
}
