pub use crate::basic_types::ProblemSolution;
use crate::basic_types::Solution;
pub use crate::basic_types::SolutionReference;
#[cfg(doc)]
use crate::termination::TerminationCondition;
#[cfg(doc)]
use crate::Solver;

/// What [`Solver::satisfy`] learned about the model.
#[derive(Debug)]
#[allow(
    clippy::large_enum_variant,
    reason = "the solution is moved out right after the call"
)]
pub enum SatisfactionResult {
    /// A snapshot of the first fully instantiated graph that passed all propagators.
    Satisfiable(Solution),
    /// The search tree was exhausted without finding a Hamiltonian structure.
    Unsatisfiable,
    /// The [`TerminationCondition`] stopped the search before it could decide.
    Unknown,
}

/// What [`Solver::optimise`] learned about the model.
#[derive(Debug)]
pub enum OptimisationResult {
    /// The incumbent, together with a proof that no better tour exists.
    Optimal(Solution),
    /// The best tour found before the [`TerminationCondition`] stopped the search.
    Satisfiable(Solution),
    /// The model admits no tour at all.
    Unsatisfiable,
    /// The search stopped before finding any tour.
    Unknown,
}

impl OptimisationResult {
    /// The incumbent, whether or not it was proven optimal.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            OptimisationResult::Optimal(solution) | OptimisationResult::Satisfiable(solution) => {
                Some(solution)
            }
            OptimisationResult::Unsatisfiable | OptimisationResult::Unknown => None,
        }
    }

    /// Whether the search finished, either with a proven optimum or with a proof that there is
    /// nothing to optimise.
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            OptimisationResult::Optimal(_) | OptimisationResult::Unsatisfiable
        )
    }
}
