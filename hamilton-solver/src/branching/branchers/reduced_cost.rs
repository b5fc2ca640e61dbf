use super::MinDomainBrancher;
use crate::branching::tie_breaking::InOrderTieBreaker;
use crate::branching::Brancher;
use crate::branching::Decision;
use crate::branching::SelectionContext;
use crate::create_statistics_struct;
use crate::engine::variables::GraphId;
use crate::propagation::PropagatorHandle;
use crate::propagators::HeldKarpPropagator;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(ReducedCostStatistics {
    guided_decisions: u64,
    fallback_decisions: u64,
});

/// Follows the Lagrangian relaxation: enforces the undecided arc of the latest relaxation with
/// the smallest reduced cost.
///
/// Before the relaxation has run (or once all of its arcs are decided) it falls back to
/// [`MinDomainBrancher`].
#[derive(Debug)]
pub struct ReducedCostBrancher {
    held_karp: PropagatorHandle<HeldKarpPropagator>,
    fallback: MinDomainBrancher<InOrderTieBreaker<usize, usize>>,
    statistics: ReducedCostStatistics,
}

impl ReducedCostBrancher {
    pub fn new(graph: GraphId, held_karp: PropagatorHandle<HeldKarpPropagator>) -> Self {
        ReducedCostBrancher {
            held_karp,
            fallback: MinDomainBrancher::new(graph),
            statistics: ReducedCostStatistics::default(),
        }
    }
}

impl Brancher for ReducedCostBrancher {
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Decision> {
        if let Some(held_karp) = context.propagator(self.held_karp) {
            let graph = context.graph(held_karp.graph());
            let cheapest = held_karp
                .tree_arcs()
                .iter()
                .filter(|arc| {
                    graph.is_arc_in_envelope(arc.from, arc.to)
                        && !graph.is_arc_in_kernel(arc.from, arc.to)
                })
                .min_by(|first, second| {
                    held_karp
                        .reduced_cost(**first)
                        .total_cmp(&held_karp.reduced_cost(**second))
                });

            if let Some(&arc) = cheapest {
                self.statistics.guided_decisions += 1;
                return Some(Decision::EnforceArc {
                    graph: held_karp.graph(),
                    arc,
                });
            }
        }

        let decision = self.fallback.next_decision(context)?;
        self.statistics.fallback_decisions += 1;
        Some(decision)
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}
