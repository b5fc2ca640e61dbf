#[cfg(doc)]
use super::PropagatorConstructorContext;
use crate::engine::variables::Arc;
use crate::engine::variables::GraphId;
use crate::engine::variables::IntegerId;
use crate::engine::Assignments;
use crate::engine::Domains;
use crate::engine::EmptyDomain;
use crate::engine::GraphView;
use crate::engine::TrailedInteger;

/// Provides a propagator with read access to every domain and the operations to shrink them.
///
/// Every change made through this context is trailed, and results in domain events which are
/// dispatched once the propagator returns.
///
/// Nodes never leave the envelope: a Hamiltonian structure visits every node, and the component
/// and relaxation propagators rely on that.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    pub(crate) assignments: &'a mut Assignments,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(assignments: &'a mut Assignments) -> PropagationContext<'a> {
        PropagationContext { assignments }
    }

    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self.assignments)
    }

    pub fn graph(&self, graph: GraphId) -> GraphView<'_> {
        self.assignments.graph(graph)
    }

    pub fn lower_bound(&self, integer: IntegerId) -> i64 {
        self.assignments.lower_bound(integer)
    }

    pub fn upper_bound(&self, integer: IntegerId) -> i64 {
        self.assignments.upper_bound(integer)
    }

    pub fn get_decision_level(&self) -> usize {
        self.assignments.get_decision_level()
    }

    /// The current value of a cell created through
    /// [`PropagatorConstructorContext::new_trailed_integer`].
    pub fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.assignments.read_trailed_integer(trailed_integer)
    }

    /// Overwrites a cell; backtracking restores the value it had at the target decision level.
    pub fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.assignments.assign_trailed_integer(trailed_integer, value)
    }

    /// Removes the arc from the envelope; fails when the arc is in the kernel.
    pub fn remove_arc(&mut self, graph: GraphId, arc: Arc) -> Result<bool, EmptyDomain> {
        self.assignments.remove_arc(graph, arc)
    }

    /// Moves the arc into the kernel; fails when the arc is no longer in the envelope.
    pub fn enforce_arc(&mut self, graph: GraphId, arc: Arc) -> Result<bool, EmptyDomain> {
        self.assignments.enforce_arc(graph, arc)
    }

    pub fn enforce_node(&mut self, graph: GraphId, node: usize) -> Result<bool, EmptyDomain> {
        self.assignments.enforce_node(graph, node)
    }

    pub fn tighten_lower_bound(
        &mut self,
        integer: IntegerId,
        value: i64,
    ) -> Result<bool, EmptyDomain> {
        self.assignments.tighten_lower_bound(integer, value)
    }

    pub fn tighten_upper_bound(
        &mut self,
        integer: IntegerId,
        value: i64,
    ) -> Result<bool, EmptyDomain> {
        self.assignments.tighten_upper_bound(integer, value)
    }
}
