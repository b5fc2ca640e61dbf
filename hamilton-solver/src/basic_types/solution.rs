use crate::engine::variables::Arc;
use crate::engine::variables::GraphId;
use crate::engine::variables::IntegerId;
use crate::engine::Assignments;
use crate::engine::GraphView;
use crate::hamilton_assert_moderate;

/// The queries shared by [`Solution`] and [`SolutionReference`].
pub trait ProblemSolution {
    /// The final domain of a graph variable; its envelope equals its kernel.
    fn graph(&self, graph: GraphId) -> GraphView<'_>;

    /// The value assigned to an integer variable.
    fn integer_value(&self, integer: IntegerId) -> i64;

    /// The arcs selected for a graph variable.
    fn arcs(&self, graph: GraphId) -> Vec<Arc> {
        self.graph(graph).kernel_arcs().collect()
    }

    fn contains_arc(&self, graph: GraphId, from: usize, to: usize) -> bool {
        self.graph(graph).is_arc_in_kernel(from, to)
    }

    /// The successor of `node` in a directed graph variable, if it has one.
    fn successor(&self, graph: GraphId, node: usize) -> Option<usize> {
        self.graph(graph).kernel_successors(node).next()
    }
}

/// A solution which borrows the current state of the solver.
#[derive(Debug, Clone, Copy)]
pub struct SolutionReference<'a> {
    assignments: &'a Assignments,
}

impl<'a> SolutionReference<'a> {
    pub(crate) fn new(assignments: &'a Assignments) -> SolutionReference<'a> {
        SolutionReference { assignments }
    }
}

impl ProblemSolution for SolutionReference<'_> {
    fn graph(&self, graph: GraphId) -> GraphView<'_> {
        self.assignments.graph(graph)
    }

    fn integer_value(&self, integer: IntegerId) -> i64 {
        integer_value(self.assignments, integer)
    }
}

/// A solution which owns a snapshot of the domains at the time it was found.
#[derive(Debug, Clone)]
pub struct Solution {
    assignments: Assignments,
}

impl Solution {
    pub(crate) fn new(assignments: Assignments) -> Solution {
        Solution { assignments }
    }

    pub fn as_reference(&self) -> SolutionReference<'_> {
        SolutionReference::new(&self.assignments)
    }
}

impl From<SolutionReference<'_>> for Solution {
    fn from(solution: SolutionReference<'_>) -> Self {
        Solution::new(solution.assignments.clone())
    }
}

impl ProblemSolution for Solution {
    fn graph(&self, graph: GraphId) -> GraphView<'_> {
        self.assignments.graph(graph)
    }

    fn integer_value(&self, integer: IntegerId) -> i64 {
        integer_value(&self.assignments, integer)
    }
}

/// Integers which no propagator fixed take their smallest remaining value.
fn integer_value(assignments: &Assignments, integer: IntegerId) -> i64 {
    hamilton_assert_moderate!(
        assignments.lower_bound(integer) <= assignments.upper_bound(integer),
        "The domain of {integer} is empty in a solution"
    );
    assignments.lower_bound(integer)
}
