use std::collections::VecDeque;

use enum_map::EnumMap;

use crate::containers::KeyedVec;
use crate::propagation::Priority;
use crate::propagation::PropagatorId;

/// The propagators which still have to run before a fixpoint is reached.
///
/// Every [`Priority`] has its own FIFO queue, and a propagator is in at most one of them.
#[derive(Debug, Clone, Default)]
pub(crate) struct PropagatorQueue {
    queues: EnumMap<Priority, VecDeque<PropagatorId>>,
    is_enqueued: KeyedVec<PropagatorId, bool>,
}

impl PropagatorQueue {
    pub(crate) fn enqueue_propagator(&mut self, propagator_id: PropagatorId, priority: Priority) {
        if self.is_propagator_enqueued(propagator_id) {
            return;
        }

        self.is_enqueued.accommodate(propagator_id, false);
        self.is_enqueued[propagator_id] = true;
        self.queues[priority].push_back(propagator_id);
    }

    /// The oldest propagator of the most urgent non-empty queue.
    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        let propagator_id = self
            .queues
            .values_mut()
            .find_map(|queue| queue.pop_front())?;
        self.is_enqueued[propagator_id] = false;

        Some(propagator_id)
    }

    pub(crate) fn clear(&mut self) {
        for queue in self.queues.values_mut() {
            for propagator_id in queue.drain(..) {
                self.is_enqueued[propagator_id] = false;
            }
        }
    }

    pub(crate) fn is_propagator_enqueued(&self, propagator_id: PropagatorId) -> bool {
        self.is_enqueued
            .get(propagator_id)
            .copied()
            .unwrap_or_default()
    }
}
