use std::fmt::Display;
use std::fmt::Formatter;
use std::marker::PhantomData;

use crate::containers::StorageKey;

/// The position of a propagator in the solver, in registration order.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PropagatorId(pub(crate) u32);

impl Display for PropagatorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "propagator #{}", self.0)
    }
}

impl StorageKey for PropagatorId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        PropagatorId(index as u32)
    }
}

/// A [`PropagatorId`] which remembers the concrete type of the propagator, so that the
/// propagator can be inspected after it was handed to the solver.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PropagatorHandle<P> {
    id: PropagatorId,
    propagator: PhantomData<P>,
}

impl<P> PropagatorHandle<P> {
    pub(crate) fn new(id: PropagatorId) -> PropagatorHandle<P> {
        PropagatorHandle {
            id,
            propagator: PhantomData,
        }
    }

    pub fn propagator_id(self) -> PropagatorId {
        self.id
    }
}

// Derives would require `P: Clone`.
impl<P> Clone for PropagatorHandle<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PropagatorHandle<P> {}
