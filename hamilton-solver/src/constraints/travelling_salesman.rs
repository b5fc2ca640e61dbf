use super::hamiltonian;
use super::Constraint;
use crate::basic_types::ConfigurationError;
use crate::basic_types::CostMatrix;
use crate::engine::variables::GraphId;
use crate::engine::variables::IntegerId;
use crate::propagation::PropagatorHandle;
use crate::propagators::ArcCostArgs;
use crate::propagators::CutGenerator;
use crate::propagators::HamiltonianShape;
use crate::propagators::HeldKarpArgs;
use crate::propagators::HeldKarpOptions;
use crate::propagators::HeldKarpPropagator;
use crate::Solver;

/// Creates the [`Constraint`] that the kernel of `graph` has the given [`HamiltonianShape`] and
/// that `objective` equals the total cost of its arcs.
///
/// Next to the structural propagators of [`hamiltonian`], this posts the arc-cost propagator and
/// the Held-Karp Lagrangian relaxation.
///
/// # Example
/// ```
/// # use hamilton_solver::constraints;
/// # use hamilton_solver::propagators::HamiltonianShape;
/// # use hamilton_solver::variables::GraphKind;
/// # use hamilton_solver::CostMatrix;
/// # use hamilton_solver::Solver;
/// let mut solver = Solver::default();
/// let graph = solver.new_complete_graph(4, GraphKind::Undirected).unwrap();
/// let objective = solver.new_bounded_integer(0, 1000).unwrap();
/// let costs = CostMatrix::from_fn(4, |from, to| (from as i64 - to as i64).abs());
///
/// solver
///     .add_constraint(constraints::travelling_salesman(
///         graph,
///         HamiltonianShape::Circuit,
///         costs,
///         objective,
///     ))
///     .unwrap();
///
/// // The two cheapest edges at every node already cost 5 in total.
/// assert!(solver.lower_bound(objective) >= 5);
/// ```
pub fn travelling_salesman(
    graph: GraphId,
    shape: HamiltonianShape,
    costs: CostMatrix,
    objective: IntegerId,
) -> TravellingSalesman {
    TravellingSalesman {
        graph,
        shape,
        costs,
        objective,
        options: HeldKarpOptions::default(),
        cut_generator: None,
    }
}

/// The constraint created by [`travelling_salesman`].
#[derive(Debug)]
pub struct TravellingSalesman {
    graph: GraphId,
    shape: HamiltonianShape,
    costs: CostMatrix,
    objective: IntegerId,
    options: HeldKarpOptions,
    cut_generator: Option<Box<dyn CutGenerator>>,
}

impl TravellingSalesman {
    /// Replaces the default schedule of the Lagrangian relaxation.
    pub fn with_options(mut self, options: HeldKarpOptions) -> Self {
        self.options = options;
        self
    }

    /// Lets the Lagrangian relaxation consult a [`CutGenerator`] for an additional bound.
    pub fn with_cut_generator(mut self, cut_generator: Box<dyn CutGenerator>) -> Self {
        self.cut_generator = Some(cut_generator);
        self
    }

    /// Posts the constraint and returns the handle of the Held-Karp propagator, which the
    /// reduced-cost brancher consults.
    pub fn post_with_bound(
        self,
        solver: &mut Solver,
    ) -> Result<PropagatorHandle<HeldKarpPropagator>, ConfigurationError> {
        let TravellingSalesman {
            graph,
            shape,
            costs,
            objective,
            options,
            cut_generator,
        } = self;

        hamiltonian(graph, shape).post(solver)?;
        let _ = solver.add_propagator(ArcCostArgs {
            graph,
            shape,
            costs: costs.clone(),
            objective,
        })?;
        solver.add_propagator(HeldKarpArgs {
            graph,
            shape,
            costs,
            objective,
            options,
            cut_generator,
        })
    }
}

impl Constraint for TravellingSalesman {
    fn post(self, solver: &mut Solver) -> Result<(), ConfigurationError> {
        let _ = self.post_with_bound(solver)?;
        Ok(())
    }
}
