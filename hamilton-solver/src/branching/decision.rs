use std::fmt::Display;

use crate::engine::variables::Arc;
use crate::engine::variables::GraphId;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;

/// A branching decision on a single arc of a graph variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Moves the arc into the kernel.
    EnforceArc { graph: GraphId, arc: Arc },
    /// Removes the arc from the envelope.
    RemoveArc { graph: GraphId, arc: Arc },
}

impl Decision {
    /// The decision which holds in the other branch.
    ///
    /// # Example
    /// ```rust
    /// # use hamilton_solver::branching::Decision;
    /// # use hamilton_solver::variables::Arc;
    /// # use hamilton_solver::variables::GraphKind;
    /// # use hamilton_solver::Solver;
    /// let mut solver = Solver::default();
    /// let graph = solver.new_graph_variable(3, GraphKind::Directed).unwrap();
    ///
    /// let decision = Decision::EnforceArc { graph, arc: Arc::new(0, 2) };
    /// assert_eq!(decision.negate(), Decision::RemoveArc { graph, arc: Arc::new(0, 2) });
    /// assert_eq!(decision.negate().negate(), decision);
    /// ```
    pub fn negate(self) -> Decision {
        match self {
            Decision::EnforceArc { graph, arc } => Decision::RemoveArc { graph, arc },
            Decision::RemoveArc { graph, arc } => Decision::EnforceArc { graph, arc },
        }
    }

    pub fn graph(&self) -> GraphId {
        match self {
            Decision::EnforceArc { graph, .. } | Decision::RemoveArc { graph, .. } => *graph,
        }
    }

    pub fn arc(&self) -> Arc {
        match self {
            Decision::EnforceArc { arc, .. } | Decision::RemoveArc { arc, .. } => *arc,
        }
    }

    /// Applies the decision; returns whether a domain changed.
    pub(crate) fn apply(self, assignments: &mut Assignments) -> Result<bool, EmptyDomain> {
        match self {
            Decision::EnforceArc { graph, arc } => assignments.enforce_arc(graph, arc),
            Decision::RemoveArc { graph, arc } => assignments.remove_arc(graph, arc),
        }
    }
}

impl Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::EnforceArc { graph, arc } => write!(f, "[{graph} enforce {arc}]"),
            Decision::RemoveArc { graph, arc } => write!(f, "[{graph} remove {arc}]"),
        }
    }
}
