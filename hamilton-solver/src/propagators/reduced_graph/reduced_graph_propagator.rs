use std::collections::VecDeque;

use log::trace;

use super::strongly_connected_components::tarjan;
use crate::basic_types::ConfigurationError;
use crate::basic_types::ContradictionReason;
use crate::basic_types::PropagationStatus;
use crate::create_statistics_struct;
use crate::engine::domain_events::Change;
use crate::engine::domain_events::DomainEvent;
use crate::engine::domain_events::DomainEvents;
use crate::engine::variables::Arc;
use crate::engine::variables::DomainRef;
use crate::engine::variables::GraphId;
use crate::engine::Domains;
use crate::engine::TrailedInteger;
use crate::propagation::EnqueueDecision;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagators::HamiltonianShape;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(ReducedGraphStatistics {
    component_splits: u64,
    skip_arcs_removed: u64,
    door_arcs_removed: u64,
    door_arcs_enforced: u64,
    internal_arcs_removed: u64,
});

/// The constructor of the [`ReducedGraphPropagator`].
#[derive(Debug, Clone, Copy)]
pub struct ReducedGraphArgs {
    pub graph: GraphId,
    pub shape: HamiltonianShape,
}

impl PropagatorConstructor for ReducedGraphArgs {
    type PropagatorImpl = ReducedGraphPropagator;

    fn create(
        self,
        mut context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, ConfigurationError> {
        context.check_graph(self.graph)?;
        let num_nodes = context.graph(self.graph).num_nodes();
        self.shape.validate(num_nodes)?;

        let component_of = (0..num_nodes)
            .map(|_| context.new_trailed_integer(0))
            .collect();
        let num_components = context.new_trailed_integer(1);

        context.register(DomainRef::Graph(self.graph), DomainEvents::ARCS);

        let mut is_dirty = vec![false; num_nodes];
        is_dirty[0] = true;

        Ok(ReducedGraphPropagator {
            graph: self.graph,
            shape: self.shape,
            component_of,
            num_components,
            dirty_components: vec![0],
            is_dirty,
            statistics: ReducedGraphStatistics::default(),
        })
    }
}

/// Maintains the strongly connected components of the envelope and filters arcs based on the
/// reduced graph in which every component is contracted into a single node.
///
/// The components only ever split while the envelope shrinks, so a component is recomputed only
/// when an arc inside of it was removed. Every Hamiltonian circuit is strongly connected, hence
/// circuits (and undirected structures) require a single component.
///
/// A directed Hamiltonian path visits the components one after the other, which gives the
/// following rules:
/// - the reduced graph has to be a chain from the component of the source to the component of
///   the sink; arcs skipping a component are removed;
/// - every component is entered and left through exactly one door arc, so a single remaining
///   door is enforced and a mandatory door removes the others;
/// - a single entry (exit) node cannot have predecessors (successors) inside its component;
/// - the entry node cannot be the exit node of a component with several nodes, and it cannot
///   lead directly to the exit node when the component has more than two nodes.
///
/// # Bibliography
/// \[1\] P. Benchimol, W.-J. van Hoeve, J.-C. Régin, L.-M. Rousseau and M. Rueher, ‘Improved
/// filtering for weighted circuit constraints’, Constraints, vol. 17, no. 3, pp. 205–233, 2012.
///
/// \[2\] J.-G. Fages and X. Lorca, ‘Improving the asymmetric TSP by considering graph
/// structure’, arXiv:1206.3437, 2012.
#[derive(Debug, Clone)]
pub struct ReducedGraphPropagator {
    graph: GraphId,
    shape: HamiltonianShape,
    component_of: Vec<TrailedInteger>,
    num_components: TrailedInteger,
    dirty_components: Vec<usize>,
    is_dirty: Vec<bool>,
    statistics: ReducedGraphStatistics,
}

impl ReducedGraphPropagator {
    fn mark_dirty(&mut self, component: usize) {
        if !self.is_dirty[component] {
            self.is_dirty[component] = true;
            self.dirty_components.push(component);
        }
    }

    fn component(&self, context: &PropagationContext, node: usize) -> usize {
        context.read(self.component_of[node]) as usize
    }

    /// Recomputes the components which lost an internal arc and renumbers the new pieces.
    fn split_dirty_components(&mut self, context: &mut PropagationContext) {
        let num_nodes = context.graph(self.graph).num_nodes();
        let component_of = (0..num_nodes)
            .map(|node| self.component(context, node))
            .collect::<Vec<_>>();

        let graph = context.graph(self.graph);
        let mut splits = vec![];
        for component in std::mem::take(&mut self.dirty_components) {
            self.is_dirty[component] = false;

            let members = (0..num_nodes)
                .filter(|&node| component_of[node] == component)
                .collect::<Vec<_>>();
            let pieces = tarjan(graph, &members, |node| component_of[node] == component);
            if pieces.len() > 1 {
                trace!("component {component} splits into {} pieces", pieces.len());
                self.statistics.component_splits += 1;
                splits.push(pieces);
            }
        }

        // The first piece keeps the number of the component it split from.
        for pieces in splits {
            for piece in pieces.into_iter().skip(1) {
                let new_component = context.read(self.num_components);
                context.assign(self.num_components, new_component + 1);
                for node in piece {
                    context.assign(self.component_of[node], new_component);
                }
            }
        }
    }

    fn propagate_path(
        &mut self,
        context: &mut PropagationContext,
        source: usize,
        sink: usize,
    ) -> PropagationStatus {
        let graph = context.graph(self.graph);
        let num_nodes = graph.num_nodes();
        let num_components = context.read(self.num_components) as usize;
        let component_of = (0..num_nodes)
            .map(|node| self.component(context, node))
            .collect::<Vec<_>>();

        // The reduced graph has to be a chain; Kahn's algorithm must never have a choice.
        let mut successors = vec![vec![]; num_components];
        let mut in_degree = vec![0_usize; num_components];
        for arc in graph.envelope_arcs() {
            let (from, to) = (component_of[arc.from], component_of[arc.to]);
            if from != to && !successors[from].contains(&to) {
                successors[from].push(to);
                in_degree[to] += 1;
            }
        }

        let mut position = vec![0_usize; num_components];
        let mut order = Vec::with_capacity(num_components);
        let mut ready = (0..num_components)
            .filter(|&component| in_degree[component] == 0)
            .collect::<VecDeque<_>>();
        while let Some(component) = ready.pop_front() {
            if !ready.is_empty() {
                return Err(ContradictionReason::ComponentOrder.into());
            }
            position[component] = order.len();
            order.push(component);
            for &successor in &successors[component] {
                in_degree[successor] -= 1;
                if in_degree[successor] == 0 {
                    ready.push_back(successor);
                }
            }
        }
        if order.first() != Some(&component_of[source])
            || order.last() != Some(&component_of[sink])
            || order.len() != num_components
        {
            return Err(ContradictionReason::ComponentOrder.into());
        }

        let skip_arcs = graph
            .envelope_arcs()
            .filter(|arc| {
                let (from, to) = (component_of[arc.from], component_of[arc.to]);
                from != to && position[to] != position[from] + 1
            })
            .collect::<Vec<_>>();
        for arc in skip_arcs {
            if context.remove_arc(self.graph, arc)? {
                self.statistics.skip_arcs_removed += 1;
            }
        }

        // The door arcs between the component at position `p` and the one at `p + 1`.
        let mut doors = vec![vec![]; num_components.saturating_sub(1)];
        for arc in context.graph(self.graph).envelope_arcs() {
            let (from, to) = (component_of[arc.from], component_of[arc.to]);
            if from != to {
                doors[position[from]].push(arc);
            }
        }

        for doors in &doors {
            self.filter_doors(context, doors)?;
        }

        for (index, &component) in order.iter().enumerate() {
            let entries = if index == 0 {
                vec![source]
            } else {
                door_endpoints(context, self.graph, &doors[index - 1], |arc| arc.to)
            };
            let exits = if index + 1 == num_components {
                vec![sink]
            } else {
                door_endpoints(context, self.graph, &doors[index], |arc| arc.from)
            };
            let members = (0..num_nodes)
                .filter(|&node| component_of[node] == component)
                .collect::<Vec<_>>();

            self.filter_component(context, &members, &entries, &exits)?;
        }

        Ok(())
    }

    /// Exactly one door arc connects two consecutive components.
    fn filter_doors(
        &mut self,
        context: &mut PropagationContext,
        doors: &[Arc],
    ) -> PropagationStatus {
        let graph = context.graph(self.graph);
        let remaining = doors
            .iter()
            .copied()
            .filter(|arc| graph.is_arc_in_envelope(arc.from, arc.to))
            .collect::<Vec<_>>();
        let mandatory = remaining
            .iter()
            .copied()
            .filter(|arc| graph.is_arc_in_kernel(arc.from, arc.to))
            .collect::<Vec<_>>();

        match (remaining.len(), mandatory.len()) {
            (0, _) => Err(ContradictionReason::Disconnected.into()),
            (_, num_mandatory) if num_mandatory > 1 => {
                Err(ContradictionReason::DoorViolation.into())
            }
            (1, 0) => {
                if context.enforce_arc(self.graph, remaining[0])? {
                    self.statistics.door_arcs_enforced += 1;
                }
                Ok(())
            }
            (_, 1) => {
                for arc in remaining.into_iter().filter(|arc| *arc != mandatory[0]) {
                    if context.remove_arc(self.graph, arc)? {
                        self.statistics.door_arcs_removed += 1;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn filter_component(
        &mut self,
        context: &mut PropagationContext,
        members: &[usize],
        entries: &[usize],
        exits: &[usize],
    ) -> PropagationStatus {
        let graph = context.graph(self.graph);
        let mut removable = vec![];

        if let [entry] = entries {
            removable.extend(
                graph
                    .envelope_predecessors(*entry)
                    .filter(|from| members.contains(from))
                    .map(|from| Arc::new(from, *entry)),
            );
        }
        if let [exit] = exits {
            removable.extend(
                graph
                    .envelope_successors(*exit)
                    .filter(|to| members.contains(to))
                    .map(|to| Arc::new(*exit, to)),
            );
        }
        if let ([entry], [exit]) = (entries, exits) {
            if entry == exit && members.len() > 1 {
                return Err(ContradictionReason::DoorViolation.into());
            }
            if entry != exit && members.len() > 2 && graph.is_arc_in_envelope(*entry, *exit) {
                removable.push(Arc::new(*entry, *exit));
            }
        }

        for arc in removable {
            if context.remove_arc(self.graph, arc)? {
                self.statistics.internal_arcs_removed += 1;
            }
        }
        Ok(())
    }
}

/// The distinct endpoints of the door arcs which are still in the envelope.
fn door_endpoints(
    context: &PropagationContext,
    graph: GraphId,
    doors: &[Arc],
    endpoint: impl Fn(&Arc) -> usize,
) -> Vec<usize> {
    let graph = context.graph(graph);
    let mut endpoints = doors
        .iter()
        .filter(|arc| graph.is_arc_in_envelope(arc.from, arc.to))
        .map(endpoint)
        .collect::<Vec<_>>();
    endpoints.sort_unstable();
    endpoints.dedup();
    endpoints
}

impl Propagator for ReducedGraphPropagator {
    fn name(&self) -> &str {
        "ReducedGraph"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn notify(
        &mut self,
        domains: Domains,
        _domain: DomainRef,
        event: DomainEvent,
        change: Change,
    ) -> EnqueueDecision {
        if let (DomainEvent::ArcRemoved, Change::Arc(arc)) = (event, change) {
            let from = domains.read_trailed_integer(self.component_of[arc.from]) as usize;
            let to = domains.read_trailed_integer(self.component_of[arc.to]) as usize;
            if from == to {
                self.mark_dirty(from);
            }
        }
        EnqueueDecision::Enqueue
    }

    fn synchronise(&mut self, _domains: Domains) {
        for component in self.dirty_components.drain(..) {
            self.is_dirty[component] = false;
        }
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        self.split_dirty_components(&mut context);

        let directed = context.graph(self.graph).is_directed();
        match self.shape {
            HamiltonianShape::Path { source, sink } if directed => {
                self.propagate_path(&mut context, source, sink)
            }
            _ => {
                if context.read(self.num_components) > 1 {
                    return Err(ContradictionReason::Disconnected.into());
                }
                Ok(())
            }
        }
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}
