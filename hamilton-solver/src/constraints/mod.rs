//! Defines the constraints that can be added to the [`Solver`] out of the box.
//!
//! A constraint is a relation over variables. In the solver, constraints are enforced through
//! propagators, and therefore constraints can be viewed as a collection of propagators; e.g.
//! [`hamiltonian_circuit`] posts the no-subtour, degree and reduced-graph propagators over a
//! single graph variable.
//!
//! # Example
//! ```
//! # use hamilton_solver::constraints;
//! # use hamilton_solver::variables::GraphKind;
//! # use hamilton_solver::Solver;
//! let mut solver = Solver::default();
//!
//! let graph = solver.new_complete_graph(5, GraphKind::Directed).unwrap();
//!
//! solver
//!     .add_constraint(constraints::hamiltonian_path(graph, 0, 4))
//!     .unwrap();
//!
//! // The sink has no successors in a path.
//! assert_eq!(solver.graph(graph).envelope_out_degree(4), 0);
//! ```
mod hamiltonian;
mod travelling_salesman;

pub use hamiltonian::*;
pub use travelling_salesman::*;

use crate::basic_types::ConfigurationError;
use crate::propagation::PropagatorConstructor;
use crate::Solver;

/// A [`Constraint`] is a relation over variables. It disqualifies certain partial assignments of
/// making it into a solution of the problem.
pub trait Constraint {
    /// Add the [`Constraint`] to the [`Solver`].
    ///
    /// This method returns a [`ConfigurationError`] if the constraint does not fit the model. A
    /// constraint which renders the root inconsistent is added nevertheless; the solver then
    /// reports every later search as unsatisfiable.
    fn post(self, solver: &mut Solver) -> Result<(), ConfigurationError>;
}

impl<Constructor> Constraint for Constructor
where
    Constructor: PropagatorConstructor,
{
    fn post(self, solver: &mut Solver) -> Result<(), ConfigurationError> {
        let _ = solver.add_propagator(self)?;
        Ok(())
    }
}

impl<C: Constraint> Constraint for Vec<C> {
    fn post(self, solver: &mut Solver) -> Result<(), ConfigurationError> {
        self.into_iter().try_for_each(|c| c.post(solver))
    }
}
