use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::hamilton_assert_simple;

/// An undo log split into checkpoints (one per decision level).
///
/// Entries pushed after [`Trail::new_checkpoint`] are handed back, most recent first, when
/// [`Trail::synchronise`] returns to an earlier checkpoint.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    current_checkpoint: usize,
    /// Entry `k` holds the length of the trail at the moment checkpoint `k + 1` was opened.
    checkpoint_starts: Vec<usize>,
    entries: Vec<T>,
}

// Implemented by hand so that `T` is not required to be `Default`.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_checkpoint: 0,
            checkpoint_starts: Vec::new(),
            entries: Vec::new(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn new_checkpoint(&mut self) {
        self.current_checkpoint += 1;
        self.checkpoint_starts.push(self.entries.len());
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.current_checkpoint
    }

    /// Removes every entry recorded after `new_checkpoint` was opened and returns them in
    /// reverse order of insertion, so that undoing them one by one restores the old state.
    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) -> Rev<Drain<'_, T>> {
        hamilton_assert_simple!(new_checkpoint < self.current_checkpoint);

        let retained_length = self.checkpoint_starts[new_checkpoint];

        self.current_checkpoint = new_checkpoint;
        self.checkpoint_starts.truncate(new_checkpoint);
        self.entries.drain(retained_length..).rev()
    }

    pub(crate) fn push(&mut self, entry: T) {
        self.entries.push(entry)
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_at_the_root_survive_synchronisation() {
        let mut trail = Trail::default();
        trail.push('a');

        trail.new_checkpoint();
        trail.push('b');
        trail.push('c');

        let undone = trail.synchronise(0).collect::<Vec<_>>();

        assert_eq!(undone, vec!['c', 'b']);
        assert_eq!(trail.deref(), &['a']);
        assert_eq!(trail.get_checkpoint(), 0);
    }

    #[test]
    fn synchronising_skips_several_checkpoints() {
        let mut trail = Trail::default();

        for value in 0..4 {
            trail.new_checkpoint();
            trail.push(value);
        }

        let undone = trail.synchronise(1).collect::<Vec<_>>();

        assert_eq!(undone, vec![3, 2, 1]);
        assert_eq!(trail.deref(), &[0]);
        assert_eq!(trail.get_checkpoint(), 1);
    }

    #[test]
    fn empty_checkpoints_are_allowed() {
        let mut trail: Trail<u32> = Trail::default();
        trail.new_checkpoint();
        trail.new_checkpoint();

        assert_eq!(trail.synchronise(0).count(), 0);
    }
}
