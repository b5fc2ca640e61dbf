use thiserror::Error;

#[cfg(doc)]
use crate::Solver;

/// Errors raised while building a model with the [`Solver`].
///
/// These are reported at model-construction time; a search never starts on a model which failed
/// to build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A graph variable needs at least one node.
    #[error("a graph variable requires at least one node")]
    EmptyGraph,
    /// A node index does not belong to the graph.
    #[error("node {node} is out of range for a graph with {num_nodes} nodes")]
    NodeOutOfRange { node: usize, num_nodes: usize },
    /// Self loops cannot be part of a Hamiltonian structure.
    #[error("self loop on node {node} is not allowed")]
    SelfLoop { node: usize },
    /// The cost matrix does not match the size of the graph.
    #[error("expected a {expected}x{expected} cost matrix, got {rows} rows with {columns} columns")]
    CostMatrixDimension {
        expected: usize,
        rows: usize,
        columns: usize,
    },
    /// An undirected cost matrix has to be symmetric.
    #[error("the cost of edge ({from}, {to}) differs from the cost of ({to}, {from})")]
    AsymmetricCosts { from: usize, to: usize },
    /// The lower bound of an integer variable is larger than its upper bound.
    #[error("invalid bounds [{lower_bound}, {upper_bound}]")]
    InvalidBounds { lower_bound: i64, upper_bound: i64 },
    /// The source and the sink of a Hamiltonian path coincide.
    #[error("source and sink of a path must differ, both are {node}")]
    SourceEqualsSink { node: usize },
    /// A variable handle does not belong to this solver.
    #[error("the variable does not belong to this solver")]
    UnknownVariable,
    /// The model can only be changed while the solver is at the root.
    #[error("the model can only be modified at the root")]
    NotAtRoot,
    /// The requested combination of variables and propagators is not supported.
    #[error("unsupported configuration: {0}")]
    Unsupported(&'static str),
}
