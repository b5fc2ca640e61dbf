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

create_statistics_struct!(CircuitStatistics {
    merged_segments: u64,
    closing_arcs_removed: u64,
    completed_structures: u64,
});

/// The constructor of the [`CircuitPropagator`].
#[derive(Debug, Clone, Copy)]
pub struct CircuitArgs {
    pub graph: GraphId,
    pub shape: HamiltonianShape,
}

impl PropagatorConstructor for CircuitArgs {
    type PropagatorImpl = CircuitPropagator;

    fn create(
        self,
        mut context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, ConfigurationError> {
        context.check_graph(self.graph)?;
        let graph = context.graph(self.graph);
        let num_nodes = graph.num_nodes();
        let kind = graph.kind();
        self.shape.validate(num_nodes)?;
        if kind == GraphKind::Undirected && self.shape == HamiltonianShape::Circuit && num_nodes < 3
        {
            return Err(ConfigurationError::Unsupported(
                "an undirected circuit needs at least three nodes",
            ));
        }

        // Arcs which are already mandatory are merged during the first propagation.
        let pending_arcs = graph.kernel_arcs().collect::<Vec<_>>();

        let segments = match kind {
            GraphKind::Directed => Segments::Directed {
                origin: (0..num_nodes)
                    .map(|node| context.new_trailed_integer(node as i64))
                    .collect(),
                end: (0..num_nodes)
                    .map(|node| context.new_trailed_integer(node as i64))
                    .collect(),
            },
            GraphKind::Undirected => Segments::Undirected {
                other_end: (0..num_nodes)
                    .map(|node| context.new_trailed_integer(node as i64))
                    .collect(),
            },
        };
        let size = (0..num_nodes)
            .map(|_| context.new_trailed_integer(1))
            .collect();

        context.register(DomainRef::Graph(self.graph), DomainEvents::ARC_ENFORCED);

        Ok(CircuitPropagator {
            graph: self.graph,
            shape: self.shape,
            num_nodes,
            segments,
            size,
            pending_arcs,
            statistics: CircuitStatistics::default(),
        })
    }
}

/// The endpoints of the vertex-disjoint paths formed by the kernel.
///
/// The cells are only meaningful at the extremities of a segment; the other nodes keep stale
/// values. For directed graphs `end[s]` is valid when `s` starts a segment and `origin[e]` when
/// `e` ends one. A node `i` ends a segment exactly when `end[origin[i]] == i`, since a stale
/// `origin` cell points to a node whose `end` has moved past `i`. The undirected case uses the
/// same reasoning with a single `other_end` cell.
#[derive(Debug, Clone)]
enum Segments {
    Directed {
        origin: Vec<TrailedInteger>,
        end: Vec<TrailedInteger>,
    },
    Undirected {
        other_end: Vec<TrailedInteger>,
    },
}

/// Outcome of adding a single kernel arc to the segments.
enum Merge {
    /// Two segments were joined; the new segment runs from `first` to `last` over `size` nodes.
    Joined {
        first: usize,
        last: usize,
        size: usize,
    },
    /// The arc closed the segment into a Hamiltonian circuit.
    Closed,
}

fn read_node(context: &PropagationContext, cell: TrailedInteger) -> usize {
    context.read(cell) as usize
}

/// Incremental no-subtour propagator for Hamiltonian circuits and paths.
///
/// The kernel of a partial Hamiltonian structure is a set of vertex-disjoint paths (segments).
/// Whenever an arc is enforced, the two segments it connects are merged in constant time; the
/// arc which would close the merged segment into a cycle is then removed, unless the segment
/// visits every node, in which case a circuit is closed by enforcing it. An enforced arc which
/// connects a segment to itself is a sub-cycle and fails.
///
/// # Bibliography
/// \[1\] Y. Caseau and F. Laburthe, ‘Solving small TSPs with constraints’, in International
/// Conference on Logic Programming, 1997, pp. 316–330.
///
/// \[2\] G. Pesant, M. Gendreau, J.-Y. Potvin and J.-M. Rousseau, ‘An exact constraint logic
/// programming algorithm for the traveling salesman problem with time windows’, Transportation
/// Science, vol. 32, no. 1, pp. 12–29, 1998.
#[derive(Debug, Clone)]
pub struct CircuitPropagator {
    graph: GraphId,
    shape: HamiltonianShape,
    num_nodes: usize,
    segments: Segments,
    /// Valid at the extremities of a segment.
    size: Vec<TrailedInteger>,
    /// Enforced arcs which have not been merged yet.
    pending_arcs: Vec<Arc>,
    statistics: CircuitStatistics,
}

impl CircuitPropagator {
    fn merge(
        &self,
        context: &mut PropagationContext,
        arc: Arc,
    ) -> Result<Merge, ContradictionReason> {
        let Arc { from, to } = arc;
        match &self.segments {
            Segments::Directed { origin, end } => {
                let first = read_node(context, origin[from]);
                let last = read_node(context, end[to]);
                if read_node(context, end[first]) != from
                    || read_node(context, origin[last]) != to
                {
                    return Err(ContradictionReason::DegreeExceeded);
                }

                if first == to {
                    return self.close(context, first);
                }

                let size =
                    read_node(context, self.size[first]) + read_node(context, self.size[to]);
                context.assign(end[first], last as i64);
                context.assign(origin[last], first as i64);
                context.assign(self.size[first], size as i64);
                context.assign(self.size[last], size as i64);

                Ok(Merge::Joined { first, last, size })
            }
            Segments::Undirected { other_end } => {
                let first = read_node(context, other_end[from]);
                let last = read_node(context, other_end[to]);
                if read_node(context, other_end[first]) != from
                    || read_node(context, other_end[last]) != to
                {
                    return Err(ContradictionReason::DegreeExceeded);
                }

                if first == to {
                    return self.close(context, first);
                }

                let size =
                    read_node(context, self.size[first]) + read_node(context, self.size[last]);
                context.assign(other_end[first], last as i64);
                context.assign(other_end[last], first as i64);
                context.assign(self.size[first], size as i64);
                context.assign(self.size[last], size as i64);

                Ok(Merge::Joined { first, last, size })
            }
        }
    }

    /// An arc connects the two extremities of the segment starting in `first`.
    fn close(
        &self,
        context: &PropagationContext,
        first: usize,
    ) -> Result<Merge, ContradictionReason> {
        let size = context.read(self.size[first]) as usize;
        if self.shape == HamiltonianShape::Circuit && size == self.num_nodes {
            Ok(Merge::Closed)
        } else {
            Err(ContradictionReason::SubCycle)
        }
    }

    /// Removes every arc which is not in the kernel, which instantiates the graph.
    fn complete(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.statistics.completed_structures += 1;
        let optional_arcs = context
            .graph(self.graph)
            .envelope_arcs()
            .filter(|arc| !context.graph(self.graph).is_arc_in_kernel(arc.from, arc.to))
            .collect::<Vec<_>>();
        for arc in optional_arcs {
            let _ = context.remove_arc(self.graph, arc)?;
        }
        Ok(())
    }

    fn after_join(
        &mut self,
        context: &mut PropagationContext,
        first: usize,
        last: usize,
        size: usize,
    ) -> PropagationStatus {
        self.statistics.merged_segments += 1;
        let directed = context.graph(self.graph).is_directed();

        match self.shape {
            HamiltonianShape::Circuit if size == self.num_nodes => {
                let _ = context.enforce_arc(self.graph, Arc::new(last, first))?;
            }
            HamiltonianShape::Path { source, sink } => {
                let connects_terminals = if directed {
                    first == source && last == sink
                } else {
                    (first == source && last == sink) || (first == sink && last == source)
                };
                if connects_terminals {
                    if size < self.num_nodes {
                        return Err(ContradictionReason::PrematurePath.into());
                    }
                    return self.complete(context);
                }
                self.remove_closing_arc(context, first, last, size, directed)?;
            }
            HamiltonianShape::Circuit => {
                self.remove_closing_arc(context, first, last, size, directed)?;
            }
        }
        Ok(())
    }

    fn remove_closing_arc(
        &mut self,
        context: &mut PropagationContext,
        first: usize,
        last: usize,
        size: usize,
        directed: bool,
    ) -> PropagationStatus {
        // An undirected segment of two nodes is closed by the very edge which created it.
        if !directed && size < 3 {
            return Ok(());
        }
        // A closing arc which is already mandatory is a sub-cycle waiting to be merged.
        if context.graph(self.graph).is_arc_in_kernel(last, first) {
            return Err(ContradictionReason::SubCycle.into());
        }
        if context.remove_arc(self.graph, Arc::new(last, first))? {
            self.statistics.closing_arcs_removed += 1;
        }
        Ok(())
    }
}

impl Propagator for CircuitPropagator {
    fn name(&self) -> &str {
        "Circuit"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn notify(
        &mut self,
        _domains: Domains,
        _domain: DomainRef,
        event: DomainEvent,
        change: Change,
    ) -> EnqueueDecision {
        match (event, change) {
            (DomainEvent::ArcEnforced, Change::Arc(arc)) => {
                self.pending_arcs.push(arc);
                EnqueueDecision::Enqueue
            }
            _ => EnqueueDecision::Skip,
        }
    }

    fn synchronise(&mut self, _domains: Domains) {
        self.pending_arcs.clear();
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        let pending_arcs = std::mem::take(&mut self.pending_arcs);

        for arc in pending_arcs {
            match self.merge(&mut context, arc)? {
                // A circuit visiting every node is closed by enforcing its last arc, which is
                // merged once its event arrives.
                Merge::Joined { first, last, size } => {
                    self.after_join(&mut context, first, last, size)?;
                }
                Merge::Closed => {
                    self.complete(&mut context)?;
                }
            }
        }

        Ok(())
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::Inconsistency;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn enforcing_a_short_cycle_fails() {
        let mut solver = TestSolver::default();
        let graph = solver.new_complete_graph(6, GraphKind::Directed);
        let _ = solver
            .new_propagator(CircuitArgs {
                graph,
                shape: HamiltonianShape::Circuit,
            })
            .expect("no failure at the root");

        solver.new_checkpoint();
        solver.enforce_arc(graph, 0, 1).expect("in envelope");
        solver.enforce_arc(graph, 1, 2).expect("in envelope");
        solver.enforce_arc(graph, 2, 0).expect("in envelope");

        let result = solver.propagate();
        assert_eq!(
            result,
            Err(Inconsistency::from(ContradictionReason::SubCycle))
        );
    }

    #[test]
    fn the_arc_closing_a_segment_is_removed() {
        let mut solver = TestSolver::default();
        let graph = solver.new_complete_graph(6, GraphKind::Directed);
        let _ = solver
            .new_propagator(CircuitArgs {
                graph,
                shape: HamiltonianShape::Circuit,
            })
            .expect("no failure at the root");

        solver.new_checkpoint();
        solver.enforce_arc(graph, 0, 1).expect("in envelope");
        solver.enforce_arc(graph, 1, 2).expect("in envelope");
        solver.propagate().expect("no sub-cycle yet");

        assert!(!solver.is_arc_in_envelope(graph, 2, 0));
        assert!(!solver.is_arc_in_envelope(graph, 1, 0));
        assert!(solver.is_arc_in_envelope(graph, 2, 3));

        solver.backtrack(0);
        assert!(solver.is_arc_in_envelope(graph, 2, 0));
        assert!(solver.is_arc_in_envelope(graph, 1, 0));
    }

    #[test]
    fn a_full_segment_is_closed_into_a_circuit() {
        let mut solver = TestSolver::default();
        let graph = solver.new_complete_graph(4, GraphKind::Directed);
        let _ = solver
            .new_propagator(CircuitArgs {
                graph,
                shape: HamiltonianShape::Circuit,
            })
            .expect("no failure at the root");

        solver.enforce_arc(graph, 2, 0).expect("in envelope");
        solver.enforce_arc(graph, 0, 3).expect("in envelope");
        solver.enforce_arc(graph, 3, 1).expect("in envelope");
        solver.propagate().expect("a Hamiltonian circuit");

        assert!(solver.is_arc_in_kernel(graph, 1, 2));
        assert!(solver.is_instantiated(graph));
        assert_eq!(solver.num_kernel_arcs(graph), 4);
    }

    #[test]
    fn undirected_segments_are_merged_at_both_ends() {
        let mut solver = TestSolver::default();
        let graph = solver.new_complete_graph(5, GraphKind::Undirected);
        let _ = solver
            .new_propagator(CircuitArgs {
                graph,
                shape: HamiltonianShape::Circuit,
            })
            .expect("no failure at the root");

        solver.new_checkpoint();
        solver.enforce_arc(graph, 3, 1).expect("in envelope");
        solver.propagate().expect("consistent");
        assert!(solver.is_arc_in_kernel(graph, 1, 3));

        solver.enforce_arc(graph, 4, 3).expect("in envelope");
        solver.propagate().expect("consistent");
        assert!(!solver.is_arc_in_envelope(graph, 1, 4));

        solver.enforce_arc(graph, 1, 0).expect("in envelope");
        solver.propagate().expect("consistent");
        assert!(!solver.is_arc_in_envelope(graph, 0, 4));
        assert!(solver.is_arc_in_envelope(graph, 0, 2));
    }

    #[test]
    fn a_path_between_the_terminals_has_to_visit_every_node() {
        let mut solver = TestSolver::default();
        let graph = solver.new_complete_graph(4, GraphKind::Directed);
        let _ = solver
            .new_propagator(CircuitArgs {
                graph,
                shape: HamiltonianShape::Path { source: 0, sink: 3 },
            })
            .expect("no failure at the root");

        solver.new_checkpoint();
        solver.enforce_arc(graph, 0, 1).expect("in envelope");
        solver.enforce_arc(graph, 1, 3).expect("in envelope");

        assert_eq!(
            solver.propagate(),
            Err(Inconsistency::from(ContradictionReason::PrematurePath))
        );
    }

    #[test]
    fn a_node_with_two_successors_fails() {
        let mut solver = TestSolver::default();
        let graph = solver.new_complete_graph(4, GraphKind::Directed);
        let _ = solver
            .new_propagator(CircuitArgs {
                graph,
                shape: HamiltonianShape::Circuit,
            })
            .expect("no failure at the root");

        solver.new_checkpoint();
        solver.enforce_arc(graph, 0, 1).expect("in envelope");
        solver.enforce_arc(graph, 0, 2).expect("in envelope");

        assert_eq!(
            solver.propagate(),
            Err(Inconsistency::from(ContradictionReason::DegreeExceeded))
        );
    }
}
