use super::domain_events::Change;
use super::domain_events::DomainEvent;
use super::domain_events::EventRecord;
use super::domains::GraphDomain;
use super::domains::IntegerDomain;
use super::domains::ReversibleSparseSet;
use super::variables::Arc;
use super::variables::DomainRef;
use super::variables::GraphId;
use super::variables::GraphKind;
use super::variables::IntegerId;
use super::TrailedInteger;
use super::TrailedValues;
use crate::containers::KeyedVec;

/// Signals that an operation would have emptied a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyDomain;

/// Owns every domain of a model together with the reversible store they live in.
///
/// All mutations go through this structure so that they are trailed and recorded as
/// [`EventRecord`]s, which the solver dispatches to the subscribed propagators.
#[derive(Debug, Default, Clone)]
pub(crate) struct Assignments {
    trailed_values: TrailedValues,
    graphs: KeyedVec<GraphId, GraphDomain>,
    integers: KeyedVec<IntegerId, IntegerDomain>,
    events: Vec<EventRecord>,
}

impl Assignments {
    pub(crate) fn new_graph(&mut self, num_nodes: usize, kind: GraphKind) -> GraphId {
        let domain = GraphDomain::new(num_nodes, kind, &mut self.trailed_values);
        self.graphs.push(domain)
    }

    pub(crate) fn new_integer(&mut self, lower_bound: i64, upper_bound: i64) -> IntegerId {
        let domain = IntegerDomain::new(lower_bound, upper_bound, &mut self.trailed_values);
        self.integers.push(domain)
    }

    pub(crate) fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.trailed_values.grow(initial_value)
    }

    pub(crate) fn read_trailed_integer(&self, trailed_integer: TrailedInteger) -> i64 {
        self.trailed_values.read(trailed_integer)
    }

    pub(crate) fn assign_trailed_integer(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.trailed_values.assign(trailed_integer, value)
    }

    pub(crate) fn get_decision_level(&self) -> usize {
        self.trailed_values.get_checkpoint()
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trailed_values.new_checkpoint()
    }

    /// Restores every domain to the state it had at `decision_level`; pending events are
    /// dropped since the changes they describe no longer exist.
    pub(crate) fn synchronise(&mut self, decision_level: usize) {
        self.trailed_values.synchronise(decision_level);
        self.events.clear();
    }

    pub(crate) fn graph_ids(&self) -> impl Iterator<Item = GraphId> {
        self.graphs.keys()
    }

    pub(crate) fn integer_ids(&self) -> impl Iterator<Item = IntegerId> {
        self.integers.keys()
    }

    pub(crate) fn num_graphs(&self) -> usize {
        self.graphs.len()
    }

    pub(crate) fn num_integers(&self) -> usize {
        self.integers.len()
    }

    pub(crate) fn graph(&self, graph: GraphId) -> GraphView<'_> {
        GraphView {
            domain: &self.graphs[graph],
            trailed_values: &self.trailed_values,
        }
    }

    pub(crate) fn lower_bound(&self, integer: IntegerId) -> i64 {
        self.integers[integer].lower_bound(&self.trailed_values)
    }

    pub(crate) fn upper_bound(&self, integer: IntegerId) -> i64 {
        self.integers[integer].upper_bound(&self.trailed_values)
    }

    pub(crate) fn drain_events(&mut self) -> std::vec::Drain<'_, EventRecord> {
        self.events.drain(..)
    }

    pub(crate) fn clear_events(&mut self) {
        self.events.clear()
    }

    pub(crate) fn add_arc_to_envelope(&mut self, graph: GraphId, arc: Arc) -> bool {
        self.graphs[graph].add_arc_to_envelope(arc, &mut self.trailed_values)
    }

    pub(crate) fn remove_arc(&mut self, graph: GraphId, arc: Arc) -> Result<bool, EmptyDomain> {
        let domain = &mut self.graphs[graph];
        let removed = domain.remove_arc(arc, &mut self.trailed_values)?;
        if removed {
            self.events.push(EventRecord {
                domain: DomainRef::Graph(graph),
                event: DomainEvent::ArcRemoved,
                change: Change::Arc(arc.normalised(domain.kind())),
            });
        }
        Ok(removed)
    }

    /// Enforces an arc together with both of its endpoints.
    pub(crate) fn enforce_arc(&mut self, graph: GraphId, arc: Arc) -> Result<bool, EmptyDomain> {
        let domain = &mut self.graphs[graph];
        let enforced = domain.enforce_arc(arc, &mut self.trailed_values)?;
        if enforced {
            self.events.push(EventRecord {
                domain: DomainRef::Graph(graph),
                event: DomainEvent::ArcEnforced,
                change: Change::Arc(arc.normalised(domain.kind())),
            });
            let _ = self.enforce_node(graph, arc.from)?;
            let _ = self.enforce_node(graph, arc.to)?;
        }
        Ok(enforced)
    }

    pub(crate) fn enforce_node(
        &mut self,
        graph: GraphId,
        node: usize,
    ) -> Result<bool, EmptyDomain> {
        let enforced = self.graphs[graph].enforce_node(node, &mut self.trailed_values)?;
        if enforced {
            self.events.push(EventRecord {
                domain: DomainRef::Graph(graph),
                event: DomainEvent::NodeEnforced,
                change: Change::Node(node),
            });
        }
        Ok(enforced)
    }

    pub(crate) fn tighten_lower_bound(
        &mut self,
        integer: IntegerId,
        value: i64,
    ) -> Result<bool, EmptyDomain> {
        let changed = self.integers[integer].tighten_lower_bound(value, &mut self.trailed_values)?;
        if changed {
            self.events.push(EventRecord {
                domain: DomainRef::Integer(integer),
                event: DomainEvent::LowerBound,
                change: Change::Bound(value),
            });
        }
        Ok(changed)
    }

    pub(crate) fn tighten_upper_bound(
        &mut self,
        integer: IntegerId,
        value: i64,
    ) -> Result<bool, EmptyDomain> {
        let changed = self.integers[integer].tighten_upper_bound(value, &mut self.trailed_values)?;
        if changed {
            self.events.push(EventRecord {
                domain: DomainRef::Integer(integer),
                event: DomainEvent::UpperBound,
                change: Change::Bound(value),
            });
        }
        Ok(changed)
    }
}

/// A read-only view on the current domain of a graph variable.
#[derive(Debug, Clone, Copy)]
pub struct GraphView<'a> {
    domain: &'a GraphDomain,
    trailed_values: &'a TrailedValues,
}

impl<'a> GraphView<'a> {
    pub fn num_nodes(&self) -> usize {
        self.domain.num_nodes()
    }

    pub fn kind(&self) -> GraphKind {
        self.domain.kind()
    }

    pub fn is_directed(&self) -> bool {
        self.domain.kind() == GraphKind::Directed
    }

    pub fn is_node_in_envelope(&self, node: usize) -> bool {
        self.domain.is_node_in_envelope(node, self.trailed_values)
    }

    pub fn is_node_in_kernel(&self, node: usize) -> bool {
        self.domain.is_node_in_kernel(node, self.trailed_values)
    }

    pub fn is_arc_in_envelope(&self, from: usize, to: usize) -> bool {
        self.domain
            .is_arc_in_envelope(Arc::new(from, to), self.trailed_values)
    }

    pub fn is_arc_in_kernel(&self, from: usize, to: usize) -> bool {
        self.domain
            .is_arc_in_kernel(Arc::new(from, to), self.trailed_values)
    }

    /// The successors of `node` in the envelope; the neighbours for undirected graphs.
    pub fn envelope_successors(&self, node: usize) -> impl Iterator<Item = usize> + 'a {
        self.iterate(self.domain.envelope_successors(node))
    }

    /// The predecessors of `node` in the envelope; the neighbours for undirected graphs.
    pub fn envelope_predecessors(&self, node: usize) -> impl Iterator<Item = usize> + 'a {
        self.iterate(self.domain.envelope_predecessors(node))
    }

    pub fn kernel_successors(&self, node: usize) -> impl Iterator<Item = usize> + 'a {
        self.iterate(self.domain.kernel_successors(node))
    }

    pub fn kernel_predecessors(&self, node: usize) -> impl Iterator<Item = usize> + 'a {
        self.iterate(self.domain.kernel_predecessors(node))
    }

    pub fn envelope_out_degree(&self, node: usize) -> usize {
        self.domain.envelope_successors(node).len(self.trailed_values)
    }

    pub fn envelope_in_degree(&self, node: usize) -> usize {
        self.domain.envelope_predecessors(node).len(self.trailed_values)
    }

    pub fn kernel_out_degree(&self, node: usize) -> usize {
        self.domain.kernel_successors(node).len(self.trailed_values)
    }

    pub fn kernel_in_degree(&self, node: usize) -> usize {
        self.domain.kernel_predecessors(node).len(self.trailed_values)
    }

    pub fn envelope_nodes(&self) -> impl Iterator<Item = usize> + 'a {
        self.iterate(self.domain.envelope_nodes())
    }

    pub fn kernel_nodes(&self) -> impl Iterator<Item = usize> + 'a {
        self.iterate(self.domain.kernel_nodes())
    }

    pub fn num_envelope_arcs(&self) -> usize {
        self.domain.num_envelope_arcs(self.trailed_values)
    }

    pub fn num_kernel_arcs(&self) -> usize {
        self.domain.num_kernel_arcs(self.trailed_values)
    }

    pub fn is_instantiated(&self) -> bool {
        self.domain.is_instantiated(self.trailed_values)
    }

    /// Every envelope arc, reported once per edge for undirected graphs.
    pub fn envelope_arcs(&self) -> impl Iterator<Item = Arc> + 'a {
        let view = *self;
        (0..self.num_nodes()).flat_map(move |from| {
            view.envelope_successors(from)
                .filter(move |&to| view.is_directed() || from < to)
                .map(move |to| Arc::new(from, to))
        })
    }

    /// Every kernel arc, reported once per edge for undirected graphs.
    pub fn kernel_arcs(&self) -> impl Iterator<Item = Arc> + 'a {
        let view = *self;
        (0..self.num_nodes()).flat_map(move |from| {
            view.kernel_successors(from)
                .filter(move |&to| view.is_directed() || from < to)
                .map(move |to| Arc::new(from, to))
        })
    }

    fn iterate(&self, set: &'a ReversibleSparseSet) -> impl Iterator<Item = usize> + 'a {
        set.iter(self.trailed_values)
    }
}

/// Read-only access to all domains, handed to propagators when they are notified or
/// synchronised.
#[derive(Debug, Clone, Copy)]
pub struct Domains<'a> {
    assignments: &'a Assignments,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(assignments: &'a Assignments) -> Domains<'a> {
        Domains { assignments }
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

    pub(crate) fn read_trailed_integer(&self, trailed_integer: TrailedInteger) -> i64 {
        self.assignments.read_trailed_integer(trailed_integer)
    }
}
