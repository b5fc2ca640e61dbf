use std::fmt::Debug;

use crate::basic_types::CostMatrix;
use crate::engine::GraphView;
use crate::propagators::HamiltonianShape;

/// An additional source of lower bounds on the objective, consulted by the Held-Karp propagator
/// before the subgradient ascent.
///
/// A generator which cannot produce a bound (e.g. because an external solver failed) returns
/// `None`, in which case only the Lagrangian bound is used.
pub trait CutGenerator: Debug {
    fn name(&self) -> &str;

    /// A lower bound on the cost of every Hamiltonian structure of the given shape within the
    /// envelope of `graph`.
    fn lower_bound(
        &mut self,
        graph: GraphView,
        costs: &CostMatrix,
        shape: HamiltonianShape,
    ) -> Option<i64>;
}

/// Every node is left and entered through its cheapest admissible arcs; kernel arcs are always
/// used.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheapestArcCuts;

impl CheapestArcCuts {
    /// The cost of the `required` cheapest arcs, where the kernel arcs are taken first.
    fn cheapest(
        required: usize,
        arcs: impl Iterator<Item = (i64, bool)>,
    ) -> Option<i64> {
        let (kernel, mut optional): (Vec<_>, Vec<_>) = arcs.partition(|&(_, mandatory)| mandatory);
        let missing = required.checked_sub(kernel.len())?;
        if optional.len() < missing {
            return None;
        }
        optional.sort_unstable();
        Some(
            kernel.iter().map(|&(cost, _)| cost).sum::<i64>()
                + optional[..missing].iter().map(|&(cost, _)| cost).sum::<i64>(),
        )
    }
}

impl CutGenerator for CheapestArcCuts {
    fn name(&self) -> &str {
        "CheapestArcCuts"
    }

    fn lower_bound(
        &mut self,
        graph: GraphView,
        costs: &CostMatrix,
        shape: HamiltonianShape,
    ) -> Option<i64> {
        let nodes = 0..graph.num_nodes();

        if graph.is_directed() {
            let leaving = nodes
                .clone()
                .map(|node| {
                    Self::cheapest(
                        shape.out_degree(node),
                        graph
                            .envelope_successors(node)
                            .map(|to| (costs.cost(node, to), graph.is_arc_in_kernel(node, to))),
                    )
                })
                .sum::<Option<i64>>()?;
            let entering = nodes
                .map(|node| {
                    Self::cheapest(
                        shape.in_degree(node),
                        graph
                            .envelope_predecessors(node)
                            .map(|from| {
                                (costs.cost(from, node), graph.is_arc_in_kernel(from, node))
                            }),
                    )
                })
                .sum::<Option<i64>>()?;
            Some(leaving.max(entering))
        } else {
            let incident = nodes
                .map(|node| {
                    Self::cheapest(
                        shape.degree(node),
                        graph
                            .envelope_successors(node)
                            .map(|other| {
                                (costs.cost(node, other), graph.is_arc_in_kernel(node, other))
                            }),
                    )
                })
                .sum::<Option<i64>>()?;
            // Every edge is counted at both of its endpoints.
            Some((incident + 1).div_euclid(2))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;
    use crate::engine::variables::GraphKind;

    #[test]
    fn cheapest_arcs_bound_a_directed_circuit() {
        let mut solver = TestSolver::default();
        let graph = solver.new_complete_graph(3, GraphKind::Directed);
        let costs = CostMatrix::new(vec![vec![0, 1, 5], vec![5, 0, 1], vec![1, 5, 0]])
            .expect("square matrix");

        let bound =
            CheapestArcCuts.lower_bound(solver.graph(graph), &costs, HamiltonianShape::Circuit);

        assert_eq!(bound, Some(3));
    }

    #[test]
    fn a_node_without_enough_arcs_gives_no_bound() {
        let mut solver = TestSolver::default();
        let graph = solver.new_empty_graph(3, GraphKind::Undirected);
        solver.add_arc(graph, 0, 1);
        solver.add_arc(graph, 1, 2);
        let costs = CostMatrix::from_fn(3, |_, _| 1);

        let bound =
            CheapestArcCuts.lower_bound(solver.graph(graph), &costs, HamiltonianShape::Circuit);

        assert_eq!(bound, None);
    }
}
