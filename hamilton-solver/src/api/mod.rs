mod outputs;
pub(crate) mod solver;

pub mod results {
    //! Contains the outputs of solving using the [`Solver`].
    //!
    //! We differentiate between 2 different types of results:
    //! - For a **satisfaction** problem ([`SatisfactionResult`])
    //! - For an **optimisation** problem ([`OptimisationResult`])
    //!
    //! A [`Solution`] owns a snapshot of the domains at the time it was found, whereas a
    //! [`SolutionReference`] borrows the current domains of the [`Solver`]; both are queried
    //! through [`ProblemSolution`].
    pub use crate::api::outputs::OptimisationResult;
    pub use crate::api::outputs::ProblemSolution;
    pub use crate::api::outputs::SatisfactionResult;
    pub use crate::api::outputs::SolutionReference;
    pub use crate::basic_types::Solution;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod variables {
    //! Contains the variables which are used by the [`Solver`].
    //!
    //! We define 2 types of variables:
    //! - Graph variables ([`GraphId`]) - The domain of a graph variable is a pair of graphs: the
    //!   envelope holds the nodes and arcs which may still be selected, the kernel those which are
    //!   selected. These variables are created using [`Solver::new_graph_variable`].
    //! - Integer variables ([`IntegerId`]) - These have an interval domain and typically represent
    //!   the objective. They are created using [`Solver::new_bounded_integer`].
    //!
    //! Propagators subscribe to either kind of variable through a [`DomainRef`].
    pub use crate::engine::variables::Arc;
    pub use crate::engine::variables::DomainRef;
    pub use crate::engine::variables::GraphId;
    pub use crate::engine::variables::GraphKind;
    pub use crate::engine::variables::IntegerId;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod options {
    //! Contains the options which can be passed to the [`Solver`].
    //!
    //! These influence the following aspects:
    //! - The random generator of the solver
    //! - The schedule of the Lagrangian relaxation
    pub use crate::engine::SolverOptions;
    pub use crate::propagators::HeldKarpOptions;
    pub use crate::propagators::RelaxationKind;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod termination {
    //! Contains the conditions which are used to determine when the [`Solver`] should terminate
    //! even when the state of the satisfaction/optimization problem is unknown.
    //!
    //! The main [`TerminationCondition`] is a condition which is polled by the [`Solver`] during
    //! the search process. It indicates when the [`Solver`] should stop, even if no definitive
    //! conclusions have been made.
    //!
    //! The most common example would be [`TimeBudget`], which terminates the [`Solver`] whenever
    //! the time budget is exceeded.
    pub use crate::engine::termination::*;
    #[cfg(doc)]
    use crate::Solver;
}

#[doc(hidden)]
pub mod asserts {
    pub use crate::hamilton_asserts::HAMILTON_ASSERT_ADVANCED;
    pub use crate::hamilton_asserts::HAMILTON_ASSERT_EXTREME;
    pub use crate::hamilton_asserts::HAMILTON_ASSERT_LEVEL_DEFINITION;
    pub use crate::hamilton_asserts::HAMILTON_ASSERT_MODERATE;
    pub use crate::hamilton_asserts::HAMILTON_ASSERT_SIMPLE;
}
