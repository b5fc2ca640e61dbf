use std::fmt::Debug;

use crate::basic_types::Random;
#[cfg(doc)]
use crate::branching::Brancher;
use crate::engine::variables::GraphId;
use crate::engine::variables::IntegerId;
use crate::engine::Assignments;
use crate::engine::GraphView;
use crate::propagation::Propagator;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorStore;

/// The context provided to the [`Brancher`]; it gives read access to the domains and to the
/// propagators (e.g. for the reduced costs of a Lagrangian relaxation), and access to a
/// [`Random`] generator.
#[derive(Debug)]
pub struct SelectionContext<'a> {
    assignments: &'a Assignments,
    propagators: &'a PropagatorStore,
    random_generator: &'a mut dyn Random,
}

impl<'a> SelectionContext<'a> {
    pub(crate) fn new(
        assignments: &'a Assignments,
        propagators: &'a PropagatorStore,
        random_generator: &'a mut dyn Random,
    ) -> SelectionContext<'a> {
        SelectionContext {
            assignments,
            propagators,
            random_generator,
        }
    }

    /// Returns a random generator which can be used to generate random values (see [`Random`] for
    /// more information).
    pub fn random(&mut self) -> &mut dyn Random {
        self.random_generator
    }

    pub fn graph(&self, graph: GraphId) -> GraphView<'a> {
        self.assignments.graph(graph)
    }

    pub fn lower_bound(&self, integer: IntegerId) -> i64 {
        self.assignments.lower_bound(integer)
    }

    pub fn upper_bound(&self, integer: IntegerId) -> i64 {
        self.assignments.upper_bound(integer)
    }

    /// Returns the propagator behind the handle, if it belongs to this solver.
    pub fn propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&'a P> {
        self.propagators.downcast(handle)
    }
}
