use crate::engine::variables::Arc;
use crate::engine::GraphView;
use crate::propagators::HamiltonianShape;

/// The decomposition of the envelope of a graph variable into strongly connected components.
///
/// Components are numbered in a topological order of the reduced graph, i.e. every arc between
/// two components goes from a lower to a higher number. For undirected graphs the components are
/// the connected components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StronglyConnectedComponents {
    component_of: Vec<usize>,
    members: Vec<Vec<usize>>,
}

impl StronglyConnectedComponents {
    /// Decomposes the nodes in the envelope of `graph`.
    ///
    /// # Example
    /// ```rust
    /// # use hamilton_solver::Solver;
    /// # use hamilton_solver::variables::GraphKind;
    /// # use hamilton_solver::propagators::StronglyConnectedComponents;
    /// let mut solver = Solver::default();
    /// let graph = solver.new_graph_variable(4, GraphKind::Directed).unwrap();
    /// for (from, to) in [(0, 1), (1, 0), (1, 2), (2, 3), (3, 2)] {
    ///     solver.add_arc_to_envelope(graph, from, to).unwrap();
    /// }
    ///
    /// let components = StronglyConnectedComponents::compute(solver.graph(graph));
    /// assert_eq!(components.num_components(), 2);
    /// assert!(components.component_of(0) < components.component_of(3));
    /// ```
    pub fn compute(graph: GraphView) -> StronglyConnectedComponents {
        let nodes = graph.envelope_nodes().collect::<Vec<_>>();
        let mut in_envelope = vec![false; graph.num_nodes()];
        for &node in &nodes {
            in_envelope[node] = true;
        }

        let mut members = tarjan(graph, &nodes, |node| in_envelope[node]);
        // Tarjan closes the components in reverse topological order.
        members.reverse();

        let mut component_of = vec![usize::MAX; graph.num_nodes()];
        for (component, nodes) in members.iter().enumerate() {
            for &node in nodes {
                component_of[node] = component;
            }
        }

        StronglyConnectedComponents {
            component_of,
            members,
        }
    }

    pub fn num_components(&self) -> usize {
        self.members.len()
    }

    /// The component of `node`; nodes outside of the envelope belong to no component.
    pub fn component_of(&self, node: usize) -> usize {
        self.component_of[node]
    }

    pub fn members(&self, component: usize) -> &[usize] {
        &self.members[component]
    }

    pub fn same_component(&self, first: usize, second: usize) -> bool {
        self.component_of[first] == self.component_of[second]
    }

    /// The envelope arcs by which the walk can leave `component`.
    pub fn outgoing_arcs<'a>(
        &'a self,
        graph: GraphView<'a>,
        component: usize,
    ) -> impl Iterator<Item = Arc> + 'a {
        self.members[component].iter().flat_map(move |&from| {
            graph
                .envelope_successors(from)
                .filter(move |&to| self.component_of[to] != component)
                .map(move |to| Arc::new(from, to))
        })
    }

    /// The envelope arcs by which the walk can enter `component`.
    pub fn incoming_arcs<'a>(
        &'a self,
        graph: GraphView<'a>,
        component: usize,
    ) -> impl Iterator<Item = Arc> + 'a {
        self.members[component].iter().flat_map(move |&to| {
            graph
                .envelope_predecessors(to)
                .filter(move |&from| self.component_of[from] != component)
                .map(move |from| Arc::new(from, to))
        })
    }

    /// The successors of every component in the reduced graph, sorted and without duplicates.
    pub fn reduced_graph(&self, graph: GraphView) -> Vec<Vec<usize>> {
        (0..self.num_components())
            .map(|component| {
                let mut successors = self
                    .outgoing_arcs(graph, component)
                    .map(|arc| self.component_of[arc.to])
                    .collect::<Vec<_>>();
                successors.sort_unstable();
                successors.dedup();
                successors
            })
            .collect()
    }

    /// Whether a Hamiltonian structure of the given shape has to enter and leave `component`
    /// through a single door each, which is the case as soon as there is more than one component.
    /// The components holding the source or the sink of a path have no entry or no exit
    /// respectively; a component holding both is not limited.
    pub fn is_door_limited(&self, component: usize, shape: HamiltonianShape) -> bool {
        if self.num_components() < 2 {
            return false;
        }
        match shape {
            HamiltonianShape::Circuit => true,
            HamiltonianShape::Path { source, sink } => {
                self.component_of[source] != component || self.component_of[sink] != component
            }
        }
    }
}

/// Iterative variant of Tarjan's algorithm, restricted to `nodes` and to the arcs between nodes
/// for which `in_scope` holds. The components are returned in reverse topological order.
pub(crate) fn tarjan(
    graph: GraphView,
    nodes: &[usize],
    in_scope: impl Fn(usize) -> bool,
) -> Vec<Vec<usize>> {
    const UNVISITED: usize = usize::MAX;

    struct Frame {
        node: usize,
        successors: Vec<usize>,
        next: usize,
    }

    let num_nodes = graph.num_nodes();
    let mut dfs_number = vec![UNVISITED; num_nodes];
    let mut low_link = vec![0; num_nodes];
    let mut on_stack = vec![false; num_nodes];
    let mut stack = vec![];
    let mut components = vec![];
    let mut next_number = 0;

    let mut open = |node: usize,
                    dfs_number: &mut Vec<usize>,
                    low_link: &mut Vec<usize>,
                    on_stack: &mut Vec<bool>,
                    stack: &mut Vec<usize>| {
        dfs_number[node] = next_number;
        low_link[node] = next_number;
        next_number += 1;
        on_stack[node] = true;
        stack.push(node);
        Frame {
            node,
            successors: graph
                .envelope_successors(node)
                .filter(|&successor| in_scope(successor))
                .collect(),
            next: 0,
        }
    };

    for &root in nodes {
        if dfs_number[root] != UNVISITED {
            continue;
        }

        let mut frames = vec![open(
            root,
            &mut dfs_number,
            &mut low_link,
            &mut on_stack,
            &mut stack,
        )];

        while let Some(frame) = frames.last_mut() {
            if frame.next < frame.successors.len() {
                let node = frame.node;
                let successor = frame.successors[frame.next];
                frame.next += 1;

                if dfs_number[successor] == UNVISITED {
                    let frame = open(
                        successor,
                        &mut dfs_number,
                        &mut low_link,
                        &mut on_stack,
                        &mut stack,
                    );
                    frames.push(frame);
                } else if on_stack[successor] {
                    low_link[node] = low_link[node].min(dfs_number[successor]);
                }
                continue;
            }

            let node = frame.node;
            let _ = frames.pop();
            if let Some(parent) = frames.last() {
                low_link[parent.node] = low_link[parent.node].min(low_link[node]);
            }

            if low_link[node] == dfs_number[node] {
                let mut component = vec![];
                while let Some(member) = stack.pop() {
                    on_stack[member] = false;
                    component.push(member);
                    if member == node {
                        break;
                    }
                }
                component.sort_unstable();
                components.push(component);
            }
        }
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;
    use crate::engine::variables::GraphKind;

    #[test]
    fn two_disjoint_cycles_are_two_door_limited_components() {
        let mut solver = TestSolver::default();
        let graph = solver.new_empty_graph(6, GraphKind::Directed);
        for (from, to) in [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)] {
            solver.add_arc(graph, from, to);
        }

        let components = StronglyConnectedComponents::compute(solver.graph(graph));

        assert_eq!(components.num_components(), 2);
        for component in 0..2 {
            assert_eq!(components.members(component).len(), 3);
            assert!(components.is_door_limited(component, HamiltonianShape::Circuit));
        }
        assert!(components.same_component(0, 2));
        assert!(!components.same_component(2, 3));
    }

    #[test]
    fn components_are_numbered_topologically() {
        let mut solver = TestSolver::default();
        let graph = solver.new_empty_graph(5, GraphKind::Directed);
        for (from, to) in [(3, 4), (4, 3), (1, 2), (2, 1), (2, 3), (0, 1)] {
            solver.add_arc(graph, from, to);
        }

        let components = StronglyConnectedComponents::compute(solver.graph(graph));

        assert_eq!(components.num_components(), 3);
        assert_eq!(components.members(0), &[0]);
        assert_eq!(components.members(1), &[1, 2]);
        assert_eq!(components.members(2), &[3, 4]);
        assert_eq!(
            components.reduced_graph(solver.graph(graph)),
            vec![vec![1], vec![2], vec![]]
        );
        assert_eq!(
            components
                .outgoing_arcs(solver.graph(graph), 1)
                .collect::<Vec<_>>(),
            vec![Arc::new(2, 3)]
        );
    }

    #[test]
    fn a_path_component_holding_both_terminals_is_not_limited() {
        let mut solver = TestSolver::default();
        let graph = solver.new_empty_graph(4, GraphKind::Directed);
        for (from, to) in [(0, 1), (1, 0), (2, 3), (3, 2), (1, 2)] {
            solver.add_arc(graph, from, to);
        }
        let components = StronglyConnectedComponents::compute(solver.graph(graph));

        let shape = HamiltonianShape::Path { source: 0, sink: 3 };
        assert!(components.is_door_limited(0, shape));
        assert!(components.is_door_limited(1, shape));

        solver.add_arc(graph, 2, 1);
        let single = StronglyConnectedComponents::compute(solver.graph(graph));
        assert_eq!(single.num_components(), 1);
        assert!(!single.is_door_limited(0, shape));
    }

    #[test]
    fn undirected_components_are_connected_components() {
        let mut solver = TestSolver::default();
        let graph = solver.new_empty_graph(5, GraphKind::Undirected);
        for (from, to) in [(0, 1), (1, 2), (3, 4)] {
            solver.add_arc(graph, from, to);
        }

        let components = StronglyConnectedComponents::compute(solver.graph(graph));

        assert_eq!(components.num_components(), 2);
        assert!(components.same_component(0, 2));
        assert!(components.same_component(3, 4));
    }
}
