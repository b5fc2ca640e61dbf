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
use crate::engine::variables::GraphKind;
use crate::engine::Domains;
use crate::propagation::EnqueueDecision;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagators::HamiltonianShape;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(DegreeStatistics {
    arcs_removed: u64,
    arcs_enforced: u64,
});

/// The constructor of the [`DegreePropagator`].
#[derive(Debug, Clone, Copy)]
pub struct DegreeArgs {
    pub graph: GraphId,
    pub shape: HamiltonianShape,
}

impl PropagatorConstructor for DegreeArgs {
    type PropagatorImpl = DegreePropagator;

    fn create(
        self,
        mut context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, ConfigurationError> {
        context.check_graph(self.graph)?;
        let num_nodes = context.graph(self.graph).num_nodes();
        self.shape.validate(num_nodes)?;

        context.register(DomainRef::Graph(self.graph), DomainEvents::ARCS);

        Ok(DegreePropagator {
            graph: self.graph,
            shape: self.shape,
            dirty_nodes: (0..num_nodes).collect(),
            is_dirty: vec![true; num_nodes],
            statistics: DegreeStatistics::default(),
        })
    }
}

/// Which incident arcs of a node are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Successors,
    Predecessors,
}

/// Enforces the number of mandatory incident arcs of every node in a Hamiltonian structure.
///
/// For directed graphs every node has exactly one successor and one predecessor, except for the
/// sink (no successor) and the source (no predecessor) of a path. For undirected graphs every
/// node has two incident edges, except for the terminals of a path which have one.
///
/// Once a node has as many kernel arcs as it needs, its remaining envelope arcs are removed;
/// once its envelope arcs are exactly as many as it needs, they are all enforced. Only the
/// endpoints of changed arcs are revisited.
#[derive(Debug, Clone)]
pub struct DegreePropagator {
    graph: GraphId,
    shape: HamiltonianShape,
    dirty_nodes: Vec<usize>,
    is_dirty: Vec<bool>,
    statistics: DegreeStatistics,
}

impl DegreePropagator {
    fn mark_dirty(&mut self, node: usize) {
        if !self.is_dirty[node] {
            self.is_dirty[node] = true;
            self.dirty_nodes.push(node);
        }
    }

    fn filter_side(
        &mut self,
        context: &mut PropagationContext,
        node: usize,
        side: Side,
        target: usize,
    ) -> PropagationStatus {
        let graph = context.graph(self.graph);
        let (kernel, envelope) = match side {
            Side::Successors => (graph.kernel_out_degree(node), graph.envelope_out_degree(node)),
            Side::Predecessors => (graph.kernel_in_degree(node), graph.envelope_in_degree(node)),
        };

        if kernel > target {
            return Err(ContradictionReason::DegreeExceeded.into());
        }
        if envelope < target {
            return Err(ContradictionReason::DegreeUnreachable.into());
        }
        if envelope == kernel {
            return Ok(());
        }

        let optional_arcs = match side {
            Side::Successors => graph
                .envelope_successors(node)
                .filter(|&other| !graph.is_arc_in_kernel(node, other))
                .map(|other| Arc::new(node, other))
                .collect::<Vec<_>>(),
            Side::Predecessors => graph
                .envelope_predecessors(node)
                .filter(|&other| !graph.is_arc_in_kernel(other, node))
                .map(|other| Arc::new(other, node))
                .collect::<Vec<_>>(),
        };

        if kernel == target {
            for arc in optional_arcs {
                if context.remove_arc(self.graph, arc)? {
                    self.statistics.arcs_removed += 1;
                }
            }
        } else if envelope == target {
            for arc in optional_arcs {
                if context.enforce_arc(self.graph, arc)? {
                    self.statistics.arcs_enforced += 1;
                }
            }
        }

        Ok(())
    }
}

impl Propagator for DegreePropagator {
    fn name(&self) -> &str {
        "Degree"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn notify(
        &mut self,
        _domains: Domains,
        _domain: DomainRef,
        _event: DomainEvent,
        change: Change,
    ) -> EnqueueDecision {
        match change {
            Change::Arc(arc) => {
                self.mark_dirty(arc.from);
                self.mark_dirty(arc.to);
                EnqueueDecision::Enqueue
            }
            _ => EnqueueDecision::Skip,
        }
    }

    fn synchronise(&mut self, _domains: Domains) {
        for node in self.dirty_nodes.drain(..) {
            self.is_dirty[node] = false;
        }
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        let kind = context.graph(self.graph).kind();

        while let Some(node) = self.dirty_nodes.pop() {
            self.is_dirty[node] = false;

            match kind {
                GraphKind::Directed => {
                    let out_degree = self.shape.out_degree(node);
                    let in_degree = self.shape.in_degree(node);
                    self.filter_side(&mut context, node, Side::Successors, out_degree)?;
                    self.filter_side(&mut context, node, Side::Predecessors, in_degree)?;
                }
                GraphKind::Undirected => {
                    let degree = self.shape.degree(node);
                    self.filter_side(&mut context, node, Side::Successors, degree)?;
                }
            }
        }

        Ok(())
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}
