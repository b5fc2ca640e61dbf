use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::optional_arcs;
use crate::basic_types::CostMatrix;
use crate::branching::tie_breaking::Direction;
use crate::branching::tie_breaking::InOrderTieBreaker;
use crate::branching::tie_breaking::RandomTieBreaker;
use crate::branching::tie_breaking::TieBreaker;
use crate::branching::Brancher;
use crate::branching::Decision;
use crate::branching::SelectionContext;
use crate::create_statistics_struct;
use crate::engine::variables::GraphId;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(MinDomainStatistics { num_decisions: u64 });

/// Branches on the node with the fewest undecided arcs (first fail); among its undecided arcs the
/// cheapest one is enforced when costs are known, otherwise the one to the smallest node.
#[derive(Debug)]
pub struct MinDomainBrancher<TieBreaking> {
    graph: GraphId,
    tie_breaker: TieBreaking,
    costs: Option<CostMatrix>,
    statistics: MinDomainStatistics,
}

impl MinDomainBrancher<InOrderTieBreaker<usize, usize>> {
    /// Ties between nodes go to the smallest node.
    pub fn new(graph: GraphId) -> Self {
        MinDomainBrancher {
            graph,
            tie_breaker: InOrderTieBreaker::new(Direction::Minimum),
            costs: None,
            statistics: MinDomainStatistics::default(),
        }
    }
}

impl MinDomainBrancher<RandomTieBreaker<usize, usize>> {
    /// Ties between nodes are broken uniformly at random.
    pub fn with_random_tie_breaking(graph: GraphId, seed: u64) -> Self {
        MinDomainBrancher {
            graph,
            tie_breaker: RandomTieBreaker::new(
                Direction::Minimum,
                Box::new(SmallRng::seed_from_u64(seed)),
            ),
            costs: None,
            statistics: MinDomainStatistics::default(),
        }
    }
}

impl<TieBreaking> MinDomainBrancher<TieBreaking> {
    /// Enforces the cheapest undecided arc of the selected node.
    pub fn with_costs(mut self, costs: CostMatrix) -> Self {
        self.costs = Some(costs);
        self
    }
}

impl<TieBreaking: TieBreaker<usize, usize>> Brancher for MinDomainBrancher<TieBreaking> {
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Decision> {
        let graph = context.graph(self.graph);

        for node in 0..graph.num_nodes() {
            let num_optional = graph.envelope_out_degree(node) - graph.kernel_out_degree(node);
            if num_optional > 0 {
                self.tie_breaker.consider(node, num_optional);
            }
        }
        let node = self.tie_breaker.select()?;

        let arc = match &self.costs {
            Some(costs) => optional_arcs(graph, node)
                .min_by_key(|arc| (costs.cost(arc.from, arc.to), arc.to)),
            None => optional_arcs(graph, node).min_by_key(|arc| arc.to),
        }?;

        self.statistics.num_decisions += 1;
        Some(Decision::EnforceArc {
            graph: self.graph,
            arc,
        })
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;
    use crate::engine::variables::Arc;
    use crate::engine::variables::GraphKind;

    #[test]
    fn the_node_with_the_fewest_undecided_arcs_is_selected() {
        let mut solver = TestSolver::default();
        let graph = solver.new_complete_graph(4, GraphKind::Directed);
        solver.remove_arc(graph, 2, 0).expect("not mandatory");
        solver.remove_arc(graph, 2, 1).expect("not mandatory");

        let mut brancher = MinDomainBrancher::new(graph);

        assert_eq!(
            solver.next_decision(&mut brancher),
            Some(Decision::EnforceArc {
                graph,
                arc: Arc::new(2, 3)
            })
        );
    }

    #[test]
    fn costs_select_the_cheapest_arc() {
        let mut solver = TestSolver::default();
        let graph = solver.new_complete_graph(3, GraphKind::Directed);
        let costs = CostMatrix::new(vec![vec![0, 7, 2], vec![1, 0, 1], vec![1, 1, 0]])
            .expect("square matrix");

        let mut brancher = MinDomainBrancher::new(graph).with_costs(costs);

        assert_eq!(
            solver.next_decision(&mut brancher),
            Some(Decision::EnforceArc {
                graph,
                arc: Arc::new(0, 2)
            })
        );
    }
}
