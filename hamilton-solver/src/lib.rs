//! # Hamilton
//! Hamilton is a constraint solver over graph variables, aimed at Hamiltonian path and circuit
//! problems such as the travelling salesman problem.
//!
//! The domain of a graph variable is a pair of graphs: the envelope holds the nodes and arcs which
//! may still be part of a solution and the kernel those which are part of every solution below
//! the current search node. Propagators shrink the envelope and grow the kernel until both
//! coincide.
//!
//! The solver currently supports the following:
//! - A no-subtour propagator which keeps the kernel free of premature cycles
//! - A degree propagator which enforces the successor and predecessor counts of a circuit or path
//! - A reduced-graph propagator which reasons over the strongly connected components of the
//!   envelope
//! - An arc-cost propagator which links a cost matrix to an objective variable
//! - A Held-Karp Lagrangian relaxation which bounds the objective from below and filters arcs by
//!   their reduced cost
//! - Satisfaction and optimisation through depth-first branch and bound
//!
//! # Using Hamilton
//! The first step to using Hamilton is to create a [`Solver`]; the model then consists of graph
//! variables, the objective and the [`constraints`] posted on them.
//! ```rust
//! # use hamilton_solver::constraints;
//! # use hamilton_solver::optimisation::OptimisationDirection;
//! # use hamilton_solver::optimisation::OptimisationStrategy;
//! # use hamilton_solver::propagators::HamiltonianShape;
//! # use hamilton_solver::results::OptimisationResult;
//! # use hamilton_solver::results::ProblemSolution;
//! # use hamilton_solver::variables::GraphKind;
//! # use hamilton_solver::branching::BranchingStrategy;
//! # use hamilton_solver::CostMatrix;
//! # use hamilton_solver::Solver;
//! let mut solver = Solver::default();
//!
//! // Four cities on a line; every tour travels the line twice.
//! let graph = solver.new_complete_graph(4, GraphKind::Undirected).unwrap();
//! let objective = solver.new_bounded_integer(0, 100).unwrap();
//! let costs = CostMatrix::from_fn(4, |from, to| (from as i64 - to as i64).abs());
//!
//! let held_karp = constraints::travelling_salesman(
//!     graph,
//!     HamiltonianShape::Circuit,
//!     costs,
//!     objective,
//! )
//! .post_with_bound(&mut solver)
//! .unwrap();
//!
//! let mut brancher = solver.brancher(BranchingStrategy::ReducedCost, graph, Some(held_karp));
//! let result = solver.find_optimal_solution(
//!     &mut brancher,
//!     OptimisationDirection::Minimise,
//!     objective,
//!     OptimisationStrategy::LinearSatUnsat,
//! );
//!
//! let OptimisationResult::Optimal(solution) = result else {
//!     panic!("the instance has a tour");
//! };
//! assert_eq!(solution.integer_value(objective), 6);
//! assert_eq!(solution.arcs(graph).len(), 4);
//! ```
//!
//! Next to the bundled constraints, custom propagators can be added through
//! [`Solver::add_propagator`]; see [`propagation`] for the building blocks.
pub(crate) mod basic_types;
pub(crate) mod containers;
pub(crate) mod engine;
pub(crate) mod hamilton_asserts;

pub mod branching;
pub mod constraints;
pub mod optimisation;
pub mod propagation;
pub mod propagators;
pub mod statistics;

pub use rand;

// The api module is private with a public glob use, so that `hamilton_solver::Solver` can be
// written instead of `hamilton_solver::api::Solver`.
mod api;

pub use api::*;

pub use crate::api::solver::Solver;
pub use crate::basic_types::ConfigurationError;
pub use crate::basic_types::Contradiction;
pub use crate::basic_types::ContradictionReason;
pub use crate::basic_types::CostMatrix;
pub use crate::basic_types::Inconsistency;
pub use crate::basic_types::PropagationStatus;
pub use crate::basic_types::Random;
pub use crate::engine::Domains;
pub use crate::engine::EmptyDomain;
pub use crate::engine::GraphView;
