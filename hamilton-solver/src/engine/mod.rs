pub(crate) mod assignments;
mod branch_and_bound;
pub(crate) mod constraint_satisfaction_solver;
pub mod domain_events;
mod domains;
mod propagator_queue;
mod solver_statistics;
pub mod termination;
#[cfg(test)]
pub(crate) mod test_solver;
mod trailed_values;
pub mod variables;
mod watch_lists;

pub(crate) use assignments::Assignments;
pub use assignments::Domains;
pub use assignments::EmptyDomain;
pub use assignments::GraphView;
pub(crate) use constraint_satisfaction_solver::ConstraintSatisfactionSolver;
pub use constraint_satisfaction_solver::SolverOptions;
pub(crate) use propagator_queue::PropagatorQueue;
pub use trailed_values::TrailedInteger;
pub(crate) use trailed_values::TrailedValues;
pub(crate) use watch_lists::WatchLists;
