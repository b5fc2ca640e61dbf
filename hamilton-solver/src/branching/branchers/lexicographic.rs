use super::optional_arcs;
use crate::branching::Brancher;
use crate::branching::Decision;
use crate::branching::SelectionContext;
use crate::create_statistics_struct;
use crate::engine::variables::GraphId;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(LexicographicStatistics { num_decisions: u64 });

/// Enforces the smallest undecided arc leaving the smallest node which still has one.
#[derive(Debug)]
pub struct LexicographicBrancher {
    graph: GraphId,
    statistics: LexicographicStatistics,
}

impl LexicographicBrancher {
    pub fn new(graph: GraphId) -> LexicographicBrancher {
        LexicographicBrancher {
            graph,
            statistics: LexicographicStatistics::default(),
        }
    }
}

impl Brancher for LexicographicBrancher {
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Decision> {
        let graph = context.graph(self.graph);
        let arc = (0..graph.num_nodes())
            .find_map(|node| optional_arcs(graph, node).min_by_key(|arc| arc.to))?;

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
    fn the_smallest_undecided_arc_is_enforced() {
        let mut solver = TestSolver::default();
        let graph = solver.new_complete_graph(3, GraphKind::Directed);
        solver.enforce_arc(graph, 0, 2).expect("in envelope");
        solver.remove_arc(graph, 1, 0).expect("not mandatory");

        let mut brancher = LexicographicBrancher::new(graph);
        let decision = solver.next_decision(&mut brancher);

        // Node 0 still has the optional arc to 1.
        assert_eq!(
            decision,
            Some(Decision::EnforceArc {
                graph,
                arc: Arc::new(0, 1)
            })
        );
    }

    #[test]
    fn an_instantiated_graph_yields_no_decision() {
        let mut solver = TestSolver::default();
        let graph = solver.new_empty_graph(2, GraphKind::Directed);
        solver.add_arc(graph, 0, 1);
        solver.enforce_arc(graph, 0, 1).expect("in envelope");

        let mut brancher = LexicographicBrancher::new(graph);

        assert_eq!(solver.next_decision(&mut brancher), None);
    }
}
