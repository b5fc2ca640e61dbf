//! This module exposes helpers that aid testing of propagators and branchers. The [`TestSolver`]
//! allows setting up specific scenarios under which to test the various operations of a
//! propagator.
use super::variables::Arc;
use super::variables::GraphId;
use super::variables::GraphKind;
use super::variables::IntegerId;
use super::ConstraintSatisfactionSolver;
use super::EmptyDomain;
use super::GraphView;
use crate::basic_types::ConfigurationError;
use crate::basic_types::PropagationStatus;
use crate::branching::Brancher;
use crate::branching::Decision;
use crate::branching::SelectionContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorHandle;

/// A container for graph and integer variables, which can be used to test propagators.
///
/// Unlike the [`crate::Solver`], the test solver does not propagate on its own; the test decides
/// when [`TestSolver::propagate`] runs.
#[derive(Debug, Default)]
pub(crate) struct TestSolver {
    solver: ConstraintSatisfactionSolver,
}

impl TestSolver {
    pub(crate) fn new_empty_graph(&mut self, num_nodes: usize, kind: GraphKind) -> GraphId {
        self.solver
            .new_graph(num_nodes, kind)
            .expect("a test graph has at least one node")
    }

    pub(crate) fn new_complete_graph(&mut self, num_nodes: usize, kind: GraphKind) -> GraphId {
        let graph = self.new_empty_graph(num_nodes, kind);
        for from in 0..num_nodes {
            for to in 0..num_nodes {
                if from != to {
                    self.add_arc(graph, from, to);
                }
            }
        }
        graph
    }

    pub(crate) fn add_arc(&mut self, graph: GraphId, from: usize, to: usize) {
        self.solver
            .add_arc_to_envelope(graph, from, to)
            .expect("a valid arc on an unconstrained graph");
    }

    pub(crate) fn new_integer(&mut self, lower_bound: i64, upper_bound: i64) -> IntegerId {
        self.solver
            .new_integer(lower_bound, upper_bound)
            .expect("non-empty bounds")
    }

    /// Creates the propagator and enqueues it; nothing is propagated yet.
    pub(crate) fn new_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, ConfigurationError>
    where
        Constructor: PropagatorConstructor,
    {
        self.solver.register_propagator(constructor)
    }

    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.solver.get_propagator(handle)
    }

    pub(crate) fn propagate(&mut self) -> PropagationStatus {
        self.solver.propagate()
    }

    pub(crate) fn enforce_arc(
        &mut self,
        graph: GraphId,
        from: usize,
        to: usize,
    ) -> Result<bool, EmptyDomain> {
        self.solver
            .assignments
            .enforce_arc(graph, Arc::new(from, to))
    }

    pub(crate) fn remove_arc(
        &mut self,
        graph: GraphId,
        from: usize,
        to: usize,
    ) -> Result<bool, EmptyDomain> {
        self.solver
            .assignments
            .remove_arc(graph, Arc::new(from, to))
    }

    pub(crate) fn graph(&self, graph: GraphId) -> GraphView<'_> {
        self.solver.assignments.graph(graph)
    }

    pub(crate) fn is_arc_in_envelope(&self, graph: GraphId, from: usize, to: usize) -> bool {
        self.graph(graph).is_arc_in_envelope(from, to)
    }

    pub(crate) fn is_arc_in_kernel(&self, graph: GraphId, from: usize, to: usize) -> bool {
        self.graph(graph).is_arc_in_kernel(from, to)
    }

    pub(crate) fn is_instantiated(&self, graph: GraphId) -> bool {
        self.graph(graph).is_instantiated()
    }

    pub(crate) fn num_kernel_arcs(&self, graph: GraphId) -> usize {
        self.graph(graph).num_kernel_arcs()
    }

    pub(crate) fn lower_bound(&self, integer: IntegerId) -> i64 {
        self.solver.assignments.lower_bound(integer)
    }

    pub(crate) fn upper_bound(&self, integer: IntegerId) -> i64 {
        self.solver.assignments.upper_bound(integer)
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.solver.new_checkpoint();
    }

    /// Restores the domains of `level` and synchronises the propagators.
    pub(crate) fn backtrack(&mut self, level: usize) {
        self.solver.synchronise(level);
    }

    /// Asks the brancher for its next decision in the current state.
    pub(crate) fn next_decision(&mut self, brancher: &mut impl Brancher) -> Option<Decision> {
        let solver = &mut self.solver;
        let mut context = SelectionContext::new(
            &solver.assignments,
            &solver.propagators,
            &mut solver.random_generator,
        );
        brancher.next_decision(&mut context)
    }
}
