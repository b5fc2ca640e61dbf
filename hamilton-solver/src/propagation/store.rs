use std::fmt::Debug;
use std::ops::Index;
use std::ops::IndexMut;

use super::Propagator;
use super::PropagatorHandle;
use super::PropagatorId;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// Owns the propagators of a solver, indexed by their [`PropagatorId`].
#[derive(Default)]
pub(crate) struct PropagatorStore {
    propagators: KeyedVec<PropagatorId, Box<dyn Propagator>>,
}

impl PropagatorStore {
    /// The id which [`PropagatorStore::insert`] hands out next.
    pub(crate) fn next_id(&self) -> PropagatorId {
        PropagatorId::create_from_index(self.propagators.len())
    }

    pub(crate) fn insert<P: Propagator>(&mut self, propagator: P) -> PropagatorHandle<P> {
        PropagatorHandle::new(self.propagators.push(Box::new(propagator)))
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = PropagatorId> + '_ {
        self.propagators.keys()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &dyn Propagator> + '_ {
        self.propagators.iter().map(|propagator| propagator.as_ref())
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Propagator>> + '_ {
        self.propagators.iter_mut()
    }

    /// The propagator behind `handle`, with its concrete type restored.
    pub(crate) fn downcast<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators.get(handle.propagator_id())?.downcast_ref()
    }
}

impl Index<PropagatorId> for PropagatorStore {
    type Output = dyn Propagator;

    fn index(&self, id: PropagatorId) -> &Self::Output {
        self.propagators[id].as_ref()
    }
}

impl IndexMut<PropagatorId> for PropagatorStore {
    fn index_mut(&mut self, id: PropagatorId) -> &mut Self::Output {
        self.propagators[id].as_mut()
    }
}

impl Debug for PropagatorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|propagator| propagator.name()))
            .finish()
    }
}
