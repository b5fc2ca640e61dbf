//! Handles to the decision variables of a model.
use std::fmt::Display;

use crate::containers::StorageKey;

/// Identifies a graph variable created by [`crate::Solver::new_graph_variable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId {
    id: u32,
}

impl StorageKey for GraphId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        GraphId { id: index as u32 }
    }
}

impl Display for GraphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "graph{}", self.id)
    }
}

/// Identifies a bounded integer variable created by [`crate::Solver::new_bounded_integer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntegerId {
    id: u32,
}

impl StorageKey for IntegerId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        IntegerId { id: index as u32 }
    }
}

impl Display for IntegerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}

/// Whether the arcs of a graph variable are oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum GraphKind {
    Directed,
    Undirected,
}

/// An arc `from -> to`. For undirected graphs the arc stands for the edge `{from, to}` and is
/// normalised such that `from < to` whenever it is reported by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Arc {
    pub from: usize,
    pub to: usize,
}

impl Arc {
    pub fn new(from: usize, to: usize) -> Arc {
        Arc { from, to }
    }

    pub(crate) fn normalised(self, kind: GraphKind) -> Arc {
        match kind {
            GraphKind::Directed => self,
            GraphKind::Undirected if self.from > self.to => Arc::new(self.to, self.from),
            GraphKind::Undirected => self,
        }
    }
}

impl Display for Arc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} -> {})", self.from, self.to)
    }
}

/// Refers to either kind of variable; used to dispatch domain events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainRef {
    Graph(GraphId),
    Integer(IntegerId),
}
