#![allow(dead_code, reason = "every test binary uses a different part of the helpers")]

use std::collections::BTreeSet;

use hamilton_solver::branching::Brancher;
use hamilton_solver::branching::Decision;
use hamilton_solver::branching::SelectionContext;
use hamilton_solver::propagators::HamiltonianShape;
use hamilton_solver::results::SolutionReference;
use hamilton_solver::variables::Arc;
use hamilton_solver::variables::GraphId;
use hamilton_solver::variables::GraphKind;
use hamilton_solver::variables::IntegerId;
use hamilton_solver::CostMatrix;
use hamilton_solver::GraphView;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Draws a cost matrix with costs in `1..=max_cost`; undirected instances are symmetric.
pub(crate) fn random_costs(
    rng: &mut SmallRng,
    num_nodes: usize,
    kind: GraphKind,
    max_cost: i64,
) -> CostMatrix {
    let mut rows = vec![vec![0; num_nodes]; num_nodes];
    for from in 0..num_nodes {
        for to in 0..num_nodes {
            if from == to {
                continue;
            }
            rows[from][to] = match kind {
                GraphKind::Undirected if to < from => rows[to][from],
                _ => rng.gen_range(1..=max_cost),
            };
        }
    }
    CostMatrix::new(rows).expect("a square matrix")
}

pub(crate) fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// The arcs of a tour visiting the nodes in the given order, normalised for undirected graphs.
fn tour_arcs(order: &[usize], kind: GraphKind) -> BTreeSet<Arc> {
    (0..order.len())
        .map(|index| {
            let from = order[index];
            let to = order[(index + 1) % order.len()];
            match kind {
                GraphKind::Undirected if from > to => Arc::new(to, from),
                _ => Arc::new(from, to),
            }
        })
        .collect()
}

/// The cheapest Hamiltonian circuit in the envelope of `graph` which contains every kernel arc,
/// found by enumerating all tours which start in node 0.
pub(crate) fn cheapest_consistent_circuit(graph: GraphView, costs: &CostMatrix) -> Option<i64> {
    let num_nodes = graph.num_nodes();
    let kernel = graph.kernel_arcs().collect::<BTreeSet<_>>();

    let mut best = None;
    let mut order = vec![0];
    let mut visited = vec![false; num_nodes];
    visited[0] = true;
    extend_tour(
        graph,
        costs,
        &kernel,
        &mut order,
        &mut visited,
        &mut best,
    );
    best
}

fn extend_tour(
    graph: GraphView,
    costs: &CostMatrix,
    kernel: &BTreeSet<Arc>,
    order: &mut Vec<usize>,
    visited: &mut [bool],
    best: &mut Option<i64>,
) {
    let num_nodes = graph.num_nodes();
    let last = order[order.len() - 1];

    if order.len() == num_nodes {
        if !graph.is_arc_in_envelope(last, order[0]) {
            return;
        }
        let arcs = tour_arcs(order, graph.kind());
        if !kernel.is_subset(&arcs) {
            return;
        }
        let cost = (0..num_nodes)
            .map(|index| costs.cost(order[index], order[(index + 1) % num_nodes]))
            .sum::<i64>();
        if !best.is_some_and(|best| best <= cost) {
            *best = Some(cost);
        }
        return;
    }

    for next in 0..num_nodes {
        if visited[next] || !graph.is_arc_in_envelope(last, next) {
            continue;
        }
        visited[next] = true;
        order.push(next);
        extend_tour(graph, costs, kernel, order, visited, best);
        let _ = order.pop();
        visited[next] = false;
    }
}

/// The cheapest Hamiltonian path from `source` to `sink` in the envelope of `graph` which
/// contains every kernel arc.
pub(crate) fn cheapest_consistent_path(
    graph: GraphView,
    costs: &CostMatrix,
    source: usize,
    sink: usize,
) -> Option<i64> {
    let kernel = graph.kernel_arcs().collect::<BTreeSet<_>>();

    let mut best = None;
    let mut order = vec![source];
    let mut visited = vec![false; graph.num_nodes()];
    visited[source] = true;
    extend_path(
        graph,
        costs,
        &kernel,
        sink,
        &mut order,
        &mut visited,
        &mut best,
    );
    best
}

fn extend_path(
    graph: GraphView,
    costs: &CostMatrix,
    kernel: &BTreeSet<Arc>,
    sink: usize,
    order: &mut Vec<usize>,
    visited: &mut [bool],
    best: &mut Option<i64>,
) {
    let num_nodes = graph.num_nodes();
    let last = order[order.len() - 1];

    if order.len() == num_nodes {
        let arcs = order
            .windows(2)
            .map(|pair| match graph.kind() {
                GraphKind::Undirected if pair[0] > pair[1] => Arc::new(pair[1], pair[0]),
                _ => Arc::new(pair[0], pair[1]),
            })
            .collect::<BTreeSet<_>>();
        if last != sink || !kernel.is_subset(&arcs) {
            return;
        }
        let cost = order
            .windows(2)
            .map(|pair| costs.cost(pair[0], pair[1]))
            .sum::<i64>();
        if !best.is_some_and(|best| best <= cost) {
            *best = Some(cost);
        }
        return;
    }

    for next in 0..num_nodes {
        // The sink can only close the path.
        if visited[next]
            || (next == sink && order.len() + 1 < num_nodes)
            || !graph.is_arc_in_envelope(last, next)
        {
            continue;
        }
        visited[next] = true;
        order.push(next);
        extend_path(graph, costs, kernel, sink, order, visited, best);
        let _ = order.pop();
        visited[next] = false;
    }
}

/// Wraps a brancher and asserts, at every node of the search tree, that the lower bound of the
/// objective does not exceed the cheapest circuit or path which is still consistent with the
/// graph.
#[derive(Debug)]
pub(crate) struct BoundCheckingBrancher<B> {
    pub(crate) inner: B,
    pub(crate) graph: GraphId,
    pub(crate) shape: HamiltonianShape,
    pub(crate) objective: IntegerId,
    pub(crate) costs: CostMatrix,
    pub(crate) num_checked_nodes: usize,
}

impl<B: Brancher> Brancher for BoundCheckingBrancher<B> {
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Decision> {
        let graph = context.graph(self.graph);
        let cheapest = match self.shape {
            HamiltonianShape::Circuit => cheapest_consistent_circuit(graph, &self.costs),
            HamiltonianShape::Path { source, sink } => {
                cheapest_consistent_path(graph, &self.costs, source, sink)
            }
        };
        if let Some(cheapest) = cheapest {
            assert!(
                context.lower_bound(self.objective) <= cheapest,
                "the lower bound {} exceeds the cheapest consistent {:?} {cheapest}",
                context.lower_bound(self.objective),
                self.shape
            );
        }
        self.num_checked_nodes += 1;
        self.inner.next_decision(context)
    }

    fn on_conflict(&mut self) {
        self.inner.on_conflict()
    }

    fn on_backtrack(&mut self) {
        self.inner.on_backtrack()
    }

    fn on_solution(&mut self, solution: SolutionReference) {
        self.inner.on_solution(solution)
    }

    fn synchronise(&mut self, context: &mut SelectionContext) {
        self.inner.synchronise(context)
    }
}

/// Records the sizes of the envelope and the kernel at every node, and asserts that they only
/// shrink and grow respectively between a node and its child.
#[derive(Debug)]
pub(crate) struct MonotonicityBrancher<B> {
    pub(crate) inner: B,
    pub(crate) graph: GraphId,
    /// The (envelope, kernel) sizes along the current branch.
    branch: Vec<(usize, usize)>,
    pub(crate) num_checked_nodes: usize,
}

impl<B> MonotonicityBrancher<B> {
    pub(crate) fn new(inner: B, graph: GraphId) -> Self {
        MonotonicityBrancher {
            inner,
            graph,
            branch: vec![],
            num_checked_nodes: 0,
        }
    }
}

impl<B: Brancher> Brancher for MonotonicityBrancher<B> {
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Decision> {
        let graph = context.graph(self.graph);
        let sizes = (graph.num_envelope_arcs(), graph.num_kernel_arcs());
        assert!(graph
            .kernel_arcs()
            .all(|arc| graph.is_arc_in_envelope(arc.from, arc.to)));

        if let Some(&(envelope, kernel)) = self.branch.last() {
            assert!(sizes.0 <= envelope, "the envelope grew along a branch");
            assert!(sizes.1 >= kernel, "the kernel shrank along a branch");
        }
        self.num_checked_nodes += 1;

        let decision = self.inner.next_decision(context);
        if decision.is_some() {
            self.branch.push(sizes);
        }
        decision
    }

    fn on_conflict(&mut self) {
        self.inner.on_conflict()
    }

    fn on_backtrack(&mut self) {
        self.inner.on_backtrack()
    }

    fn on_solution(&mut self, solution: SolutionReference) {
        self.inner.on_solution(solution)
    }

    fn synchronise(&mut self, context: &mut SelectionContext) {
        // After backtracking, the branch is cut back to the nodes above the current one.
        let graph = context.graph(self.graph);
        let kernel = graph.num_kernel_arcs();
        let envelope = graph.num_envelope_arcs();
        while let Some(&(parent_envelope, parent_kernel)) = self.branch.last() {
            if envelope <= parent_envelope && kernel >= parent_kernel {
                break;
            }
            let _ = self.branch.pop();
        }
        self.inner.synchronise(context)
    }
}
