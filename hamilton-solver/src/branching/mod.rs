//! Contains the structures and traits which define the decision making procedure of the
//! [`Solver`].
//!
//! A [`Brancher`] selects an undecided arc of a graph variable and returns a [`Decision`] to
//! enforce or remove it; the search explores the [`Decision`] first and its negation after
//! backtracking. The [`BranchingStrategy`] names the branchers which ship with the solver; a
//! brancher is passed to [`Solver::satisfy`] and [`Solver::optimise`].
//!
//! # Example
//! ```rust
//! # use hamilton_solver::branching::branchers::LexicographicBrancher;
//! # use hamilton_solver::constraints;
//! # use hamilton_solver::results::SatisfactionResult;
//! # use hamilton_solver::termination::Indefinite;
//! # use hamilton_solver::variables::GraphKind;
//! # use hamilton_solver::Solver;
//! let mut solver = Solver::default();
//! let graph = solver.new_complete_graph(4, GraphKind::Directed).unwrap();
//! solver
//!     .add_constraint(constraints::hamiltonian_circuit(graph))
//!     .unwrap();
//!
//! let mut brancher = LexicographicBrancher::new(graph);
//! let result = solver.satisfy(&mut brancher, &mut Indefinite);
//! assert!(matches!(result, SatisfactionResult::Satisfiable(_)));
//! ```
mod brancher;
pub mod branchers;
mod decision;
mod selection_context;
pub mod tie_breaking;

pub use brancher::*;
pub use decision::*;
pub use selection_context::SelectionContext;

#[cfg(doc)]
use crate::Solver;

/// The branchers which can be selected by name, e.g. from a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum BranchingStrategy {
    /// See [`branchers::LexicographicBrancher`].
    Lexicographic,
    /// See [`branchers::MinDomainBrancher`].
    #[default]
    MinDomain,
    /// See [`branchers::ReducedCostBrancher`]; requires a Lagrangian relaxation.
    ReducedCost,
}

impl std::fmt::Display for BranchingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BranchingStrategy::Lexicographic => write!(f, "lexicographic"),
            BranchingStrategy::MinDomain => write!(f, "min-domain"),
            BranchingStrategy::ReducedCost => write!(f, "reduced-cost"),
        }
    }
}
