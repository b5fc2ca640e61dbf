use crate::engine::variables::GraphKind;

/// The structure whose weight bounds the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum RelaxationKind {
    /// A minimum spanning tree for paths, a minimum 1-tree rooted in node 0 for circuits.
    #[default]
    SpanningTree,
    /// For directed paths: a minimum spanning tree of every strongly connected component,
    /// chained through the cheapest door arc between consecutive components. Falls back to
    /// [`RelaxationKind::SpanningTree`] when the components do not form a chain.
    ReducedGraph,
}

/// The subgradient schedule of the Held-Karp propagator.
///
/// Every round performs a number of subgradient iterations, after which the step factor `alpha`
/// is multiplied by `beta` and `beta` is halved. The ascent stops after `max_rounds` rounds or
/// after `max_non_improving_rounds` rounds without improving the bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeldKarpOptions {
    pub relaxation: RelaxationKind,
    /// Keeps the propagator inactive until a first solution has been found.
    pub wait_first_solution: bool,
    pub max_rounds: usize,
    pub max_non_improving_rounds: usize,
    pub alpha: f64,
    pub beta: f64,
    /// The number of iterations per round; when absent this is half the number of nodes for
    /// directed graphs and 30 for undirected graphs.
    pub iterations_per_round: Option<usize>,
}

impl Default for HeldKarpOptions {
    fn default() -> Self {
        HeldKarpOptions {
            relaxation: RelaxationKind::SpanningTree,
            wait_first_solution: false,
            max_rounds: 5,
            max_non_improving_rounds: 2,
            alpha: 2.0,
            beta: 0.5,
            iterations_per_round: None,
        }
    }
}

impl HeldKarpOptions {
    pub(crate) fn iterations_per_round(&self, kind: GraphKind, num_nodes: usize) -> usize {
        self.iterations_per_round.unwrap_or(match kind {
            GraphKind::Directed => (num_nodes / 2).max(1),
            GraphKind::Undirected => 30,
        })
    }
}
