use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// A reversible integer cell; propagators keep their incremental state in these cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrailedInteger(u32);

impl StorageKey for TrailedInteger {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        TrailedInteger(index as u32)
    }
}

/// A cell together with the value it held before it was overwritten.
#[derive(Debug, Clone, Copy)]
struct Overwrite {
    cell: TrailedInteger,
    previous: i64,
}

/// The reversible store: an arena of integer cells whose overwritten values are recorded on a
/// single trail, so that returning to a checkpoint restores every cell at once.
///
/// Every piece of backtrackable state in the solver (set sizes of the graph domains, integer
/// bounds, the path segments of the circuit propagator, the component ids of the reduced graph)
/// is stored in these cells.
#[derive(Default, Debug, Clone)]
pub(crate) struct TrailedValues {
    trail: Trail<Overwrite>,
    values: KeyedVec<TrailedInteger, i64>,
}

impl TrailedValues {
    pub(crate) fn grow(&mut self, initial_value: i64) -> TrailedInteger {
        self.values.push(initial_value)
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint()
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.trail.get_checkpoint()
    }

    pub(crate) fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.values[trailed_integer]
    }

    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) {
        self.trail
            .synchronise(new_checkpoint)
            .for_each(|overwrite| self.values[overwrite.cell] = overwrite.previous)
    }

    pub(crate) fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        let old_value = self.values[trailed_integer];
        if old_value == value {
            return;
        }

        // Changes made at the root are never undone, so they do not need to be recorded.
        if self.trail.get_checkpoint() > 0 {
            self.trail.push(Overwrite {
                cell: trailed_integer,
                previous: old_value,
            });
        }
        self.values[trailed_integer] = value;
    }

    pub(crate) fn add_assign(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.assign(trailed_integer, self.values[trailed_integer] + addition);
    }
}

#[cfg(test)]
mod tests {
    use super::TrailedValues;

    #[test]
    fn cells_are_restored_per_checkpoint() {
        let mut values = TrailedValues::default();
        let size = values.grow(5);
        let origin = values.grow(0);

        values.new_checkpoint();
        values.add_assign(size, -1);
        values.assign(origin, 3);

        values.new_checkpoint();
        values.add_assign(size, -2);

        assert_eq!(values.read(size), 2);

        values.synchronise(1);
        assert_eq!(values.read(size), 4);
        assert_eq!(values.read(origin), 3);

        values.synchronise(0);
        assert_eq!(values.read(size), 5);
        assert_eq!(values.read(origin), 0);
    }

    #[test]
    fn root_assignments_are_permanent() {
        let mut values = TrailedValues::default();
        let cell = values.grow(1);
        values.assign(cell, 10);

        values.new_checkpoint();
        values.assign(cell, 20);
        values.synchronise(0);

        assert_eq!(values.read(cell), 10);
    }
}
