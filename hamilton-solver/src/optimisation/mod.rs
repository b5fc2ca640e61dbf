//! Contains structures related to optimisation.
//!
//! Both procedures drive the same depth-first search; they differ in the way the objective bound
//! is tightened:
//! - [`LinearSatUnsat`] is the top-down branch and bound: every solution tightens the bound to
//!   strictly improve on it, and the search continues from the node of the solution.
//! - [`LinearUnsatSat`] starts from the lower bound of the objective and relaxes it one step at a
//!   time until the bounded problem becomes satisfiable.
use std::fmt::Display;

#[cfg(feature = "clap")]
use clap::ValueEnum;

use crate::branching::Brancher;
use crate::engine::constraint_satisfaction_solver::ObjectiveBound;
use crate::engine::variables::IntegerId;
use crate::results::OptimisationResult;
use crate::termination::TerminationCondition;
use crate::Solver;

mod linear_sat_unsat;
mod linear_unsat_sat;
mod solution_callback;

pub use linear_sat_unsat::LinearSatUnsat;
pub use linear_unsat_sat::LinearUnsatSat;
pub use solution_callback::SolutionCallback;

pub trait OptimisationProcedure<B: Brancher> {
    fn optimise(
        &mut self,
        brancher: &mut B,
        termination: &mut impl TerminationCondition,
        solver: &mut Solver,
    ) -> OptimisationResult;
}

/// The type of search which is performed by the solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(ValueEnum))]
pub enum OptimisationStrategy {
    /// Linear SAT-UNSAT - Starts with a satisfiable solution and tightens the bound on the
    /// objective variable until an UNSAT result is reached. Can be seen as upper-bounding search.
    #[default]
    LinearSatUnsat,
    /// Linear UNSAT-SAT - Starts with an unsatisfiable solution and tightens the bound on the
    /// objective variable until a SAT result is reached. Can be seen as lower-bounding search.
    LinearUnsatSat,
}

impl Display for OptimisationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimisationStrategy::LinearSatUnsat => write!(f, "linear-sat-unsat"),
            OptimisationStrategy::LinearUnsatSat => write!(f, "linear-unsat-sat"),
        }
    }
}

/// The direction of the optimisation, either maximising or minimising.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimisationDirection {
    Maximise,
    Minimise,
}

impl OptimisationDirection {
    /// The bound which only admits solutions strictly better than `value`.
    pub(crate) fn improving_bound(self, objective: IntegerId, value: i64) -> ObjectiveBound {
        match self {
            OptimisationDirection::Minimise => ObjectiveBound::AtMost(objective, value - 1),
            OptimisationDirection::Maximise => ObjectiveBound::AtLeast(objective, value + 1),
        }
    }

    /// The bound which only admits solutions at least as good as `value`.
    pub(crate) fn bound_at(self, objective: IntegerId, value: i64) -> ObjectiveBound {
        match self {
            OptimisationDirection::Minimise => ObjectiveBound::AtMost(objective, value),
            OptimisationDirection::Maximise => ObjectiveBound::AtLeast(objective, value),
        }
    }

    /// The bound which excludes `value` and everything better than it.
    pub(crate) fn excluding_bound(self, objective: IntegerId, value: i64) -> ObjectiveBound {
        match self {
            OptimisationDirection::Minimise => ObjectiveBound::AtLeast(objective, value + 1),
            OptimisationDirection::Maximise => ObjectiveBound::AtMost(objective, value - 1),
        }
    }

    /// Whether `candidate` is a better objective value than `incumbent`.
    pub(crate) fn improves(self, candidate: i64, incumbent: i64) -> bool {
        match self {
            OptimisationDirection::Minimise => candidate < incumbent,
            OptimisationDirection::Maximise => candidate > incumbent,
        }
    }
}
