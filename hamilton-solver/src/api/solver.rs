use std::time::Duration;

use log::warn;

use crate::basic_types::ConfigurationError;
use crate::basic_types::CostMatrix;
use crate::branching::branchers::LexicographicBrancher;
use crate::branching::branchers::MinDomainBrancher;
use crate::branching::branchers::ReducedCostBrancher;
use crate::branching::Brancher;
use crate::branching::BranchingStrategy;
use crate::constraints::Constraint;
use crate::engine::constraint_satisfaction_solver::CSPSolverExecutionFlag;
use crate::engine::constraint_satisfaction_solver::ObjectiveBound;
use crate::engine::variables::GraphId;
use crate::engine::variables::GraphKind;
use crate::engine::variables::IntegerId;
use crate::engine::ConstraintSatisfactionSolver;
use crate::engine::GraphView;
use crate::optimisation::LinearSatUnsat;
use crate::optimisation::LinearUnsatSat;
use crate::optimisation::OptimisationDirection;
use crate::optimisation::OptimisationProcedure;
use crate::optimisation::OptimisationStrategy;
use crate::options::SolverOptions;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorHandle;
use crate::propagators::HeldKarpPropagator;
use crate::results::OptimisationResult;
use crate::results::SatisfactionResult;
use crate::results::Solution;
use crate::results::SolutionReference;
use crate::statistics::log_statistic;
use crate::statistics::should_log_statistics;
use crate::statistics::StatisticLogger;
use crate::termination::Combinator;
use crate::termination::DecisionBudget;
use crate::termination::TerminationCondition;
use crate::termination::TimeBudget;

/// The main interaction point which allows the creation of variables, the addition of
/// constraints, and solving problems.
///
/// # Creating Variables
/// A model consists of graph variables, created with [`Solver::new_graph_variable`] (or
/// [`Solver::new_complete_graph`]), and bounded integers such as an objective, created with
/// [`Solver::new_bounded_integer`]. The envelope of a new graph holds every node and no arcs; arcs
/// are added with [`Solver::add_arc_to_envelope`] before constraints are posted on the graph.
///
/// # Using the Solver
/// For examples on how to use the solver, see the [root-level crate documentation](crate).
#[derive(Debug, Default)]
pub struct Solver {
    /// The internal [`ConstraintSatisfactionSolver`] which is used to solve the problems.
    pub(crate) satisfaction_solver: ConstraintSatisfactionSolver,
    /// The objective value of the best solution found by the last optimisation.
    pub(crate) best_objective_value: Option<i64>,
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
}

impl Solver {
    /// Creates a solver with the provided [`SolverOptions`].
    pub fn with_options(solver_options: SolverOptions) -> Self {
        Solver {
            satisfaction_solver: ConstraintSatisfactionSolver::new(solver_options),
            best_objective_value: None,
            time_limit: None,
            node_limit: None,
        }
    }

    /// Logs the statistics of the search, the propagators and the best objective value, if
    /// statistic logging is configured.
    pub fn log_statistics(&self) {
        if should_log_statistics() {
            if let Some(value) = self.best_objective_value {
                log_statistic("objective", value);
            }
            self.satisfaction_solver.log_statistics();
        }
    }

    /// Logs the statistics of the brancher under its own prefix.
    pub fn log_brancher_statistics(&self, brancher: &impl Brancher) {
        if should_log_statistics() {
            brancher.log_statistics(StatisticLogger::for_brancher());
        }
    }

    /// The current state of the domains; after a search this is the root state.
    pub fn get_solution_reference(&self) -> SolutionReference<'_> {
        SolutionReference::new(&self.satisfaction_solver.assignments)
    }

    pub fn lower_bound(&self, integer: IntegerId) -> i64 {
        self.satisfaction_solver.assignments.lower_bound(integer)
    }

    pub fn upper_bound(&self, integer: IntegerId) -> i64 {
        self.satisfaction_solver.assignments.upper_bound(integer)
    }

    /// The current envelope and kernel of a graph variable.
    pub fn graph(&self, graph: GraphId) -> GraphView<'_> {
        self.satisfaction_solver.assignments.graph(graph)
    }

    pub fn is_instantiated(&self, graph: GraphId) -> bool {
        self.graph(graph).is_instantiated()
    }

    /// Whether the model was proven to have no solution, either at the root or by a search.
    pub fn is_infeasible(&self) -> bool {
        self.satisfaction_solver.is_infeasible()
    }
}

/// Functions to create and retrieve variables.
impl Solver {
    /// Creates a graph variable with `num_nodes` nodes; its envelope holds every node and no arcs.
    ///
    /// # Example
    /// ```rust
    /// # use hamilton_solver::variables::GraphKind;
    /// # use hamilton_solver::ConfigurationError;
    /// # use hamilton_solver::Solver;
    /// let mut solver = Solver::default();
    ///
    /// let graph = solver.new_graph_variable(3, GraphKind::Undirected).unwrap();
    /// assert_eq!(solver.graph(graph).num_envelope_arcs(), 0);
    ///
    /// assert_eq!(
    ///     solver.new_graph_variable(0, GraphKind::Directed),
    ///     Err(ConfigurationError::EmptyGraph)
    /// );
    /// ```
    pub fn new_graph_variable(
        &mut self,
        num_nodes: usize,
        kind: GraphKind,
    ) -> Result<GraphId, ConfigurationError> {
        self.satisfaction_solver.new_graph(num_nodes, kind)
    }

    /// Creates a graph variable whose envelope holds every arc between distinct nodes.
    pub fn new_complete_graph(
        &mut self,
        num_nodes: usize,
        kind: GraphKind,
    ) -> Result<GraphId, ConfigurationError> {
        let graph = self.new_graph_variable(num_nodes, kind)?;
        for from in 0..num_nodes {
            let first_target = match kind {
                GraphKind::Directed => 0,
                GraphKind::Undirected => from + 1,
            };
            for to in (first_target..num_nodes).filter(|&to| to != from) {
                self.add_arc_to_envelope(graph, from, to)?;
            }
        }
        Ok(graph)
    }

    /// Creates a graph variable whose envelope holds the arcs with a cost in `costs`; the arcs
    /// without a cost are left out.
    pub fn new_graph_from_costs(
        &mut self,
        costs: &[Vec<Option<i64>>],
        kind: GraphKind,
    ) -> Result<(GraphId, CostMatrix), ConfigurationError> {
        let num_nodes = costs.len();
        let graph = self.new_graph_variable(num_nodes, kind)?;

        let mut rows = Vec::with_capacity(num_nodes);
        for (from, row) in costs.iter().enumerate() {
            if row.len() != num_nodes {
                return Err(ConfigurationError::CostMatrixDimension {
                    expected: num_nodes,
                    rows: num_nodes,
                    columns: row.len(),
                });
            }
            for (to, cost) in row.iter().enumerate() {
                if from != to && cost.is_some() {
                    self.add_arc_to_envelope(graph, from, to)?;
                }
            }
            rows.push(row.iter().map(|cost| cost.unwrap_or(0)).collect());
        }

        Ok((graph, CostMatrix::new(rows)?))
    }

    /// Adds the arc `(from, to)` to the envelope of `graph`.
    ///
    /// Arcs have to be added before any constraint is posted on the graph.
    pub fn add_arc_to_envelope(
        &mut self,
        graph: GraphId,
        from: usize,
        to: usize,
    ) -> Result<(), ConfigurationError> {
        self.satisfaction_solver.add_arc_to_envelope(graph, from, to)
    }

    /// Makes `node` a mandatory node of `graph`.
    pub fn activate_node(&mut self, graph: GraphId, node: usize) -> Result<(), ConfigurationError> {
        self.satisfaction_solver.enforce_node(graph, node)
    }

    /// Creates a bounded integer variable with the domain `[lower_bound, upper_bound]`.
    pub fn new_bounded_integer(
        &mut self,
        lower_bound: i64,
        upper_bound: i64,
    ) -> Result<IntegerId, ConfigurationError> {
        self.satisfaction_solver.new_integer(lower_bound, upper_bound)
    }

    /// Restricts the domain of an integer, typically the objective, to `[lower_bound,
    /// upper_bound]`.
    pub fn set_objective_bounds(
        &mut self,
        objective: IntegerId,
        lower_bound: i64,
        upper_bound: i64,
    ) -> Result<(), ConfigurationError> {
        self.satisfaction_solver.check_integer(objective)?;
        if lower_bound > upper_bound {
            return Err(ConfigurationError::InvalidBounds {
                lower_bound,
                upper_bound,
            });
        }
        if self.satisfaction_solver.get_decision_level() != 0 {
            return Err(ConfigurationError::NotAtRoot);
        }

        self.satisfaction_solver
            .tighten_root_objective(ObjectiveBound::AtLeast(objective, lower_bound));
        self.satisfaction_solver
            .tighten_root_objective(ObjectiveBound::AtMost(objective, upper_bound));
        Ok(())
    }
}

/// Functions for adding new constraints to the solver.
impl Solver {
    /// Add a constraint to the solver.
    ///
    /// A constraint which is inconsistent at the root is added nevertheless; the solver then
    /// reports every search as unsatisfiable (see [`Solver::is_infeasible`]).
    pub fn add_constraint<C: Constraint>(
        &mut self,
        constraint: C,
    ) -> Result<(), ConfigurationError> {
        constraint.post(self)
    }

    /// Creates a propagator from its constructor, subscribes it to the events it registers for
    /// and propagates at the root.
    pub fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, ConfigurationError>
    where
        Constructor: PropagatorConstructor,
    {
        self.satisfaction_solver.add_propagator(constructor)
    }

    /// Retrieves a propagator which was added through [`Solver::add_propagator`].
    pub fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.satisfaction_solver.get_propagator(handle)
    }
}

/// Functions which solve the model.
impl Solver {
    /// Limits the wall-clock time of every following call to [`Solver::find_solution`] and
    /// [`Solver::find_optimal_solution`].
    pub fn set_time_limit(&mut self, time_limit: Duration) {
        self.time_limit = Some(time_limit);
    }

    /// Limits the number of decisions of every following call to [`Solver::find_solution`] and
    /// [`Solver::find_optimal_solution`].
    pub fn set_node_limit(&mut self, node_limit: u64) {
        self.node_limit = Some(node_limit);
    }

    fn configured_termination(&self) -> Combinator<Option<TimeBudget>, Option<DecisionBudget>> {
        Combinator::new(
            self.time_limit.map(TimeBudget::starting_now),
            self.node_limit.map(DecisionBudget::new),
        )
    }

    /// Searches for a solution within the configured limits.
    pub fn find_solution<B: Brancher>(&mut self, brancher: &mut B) -> SatisfactionResult {
        let mut termination = self.configured_termination();
        self.satisfy(brancher, &mut termination)
    }

    /// Searches for an optimal solution within the configured limits.
    pub fn find_optimal_solution<B: Brancher>(
        &mut self,
        brancher: &mut B,
        direction: OptimisationDirection,
        objective: IntegerId,
        strategy: OptimisationStrategy,
    ) -> OptimisationResult {
        let mut termination = self.configured_termination();
        let no_callback: Option<fn(&Solver, SolutionReference)> = None;

        match strategy {
            OptimisationStrategy::LinearSatUnsat => self.optimise(
                brancher,
                &mut termination,
                LinearSatUnsat::new(direction, objective, no_callback),
            ),
            OptimisationStrategy::LinearUnsatSat => self.optimise(
                brancher,
                &mut termination,
                LinearUnsatSat::new(direction, objective, no_callback),
            ),
        }
    }

    /// Solves the current model in the [`Solver`] until it finds a solution (or is indicated to
    /// terminate by the provided [`TerminationCondition`]) and returns a [`SatisfactionResult`]
    /// which can be used to obtain the found solution or find other solutions.
    ///
    /// The solver returns to the root afterwards, so that the model can be extended.
    pub fn satisfy<B: Brancher, T: TerminationCondition>(
        &mut self,
        brancher: &mut B,
        termination: &mut T,
    ) -> SatisfactionResult {
        self.satisfaction_solver.objective_bound = None;

        let result = match self.satisfaction_solver.solve(termination, brancher) {
            CSPSolverExecutionFlag::Feasible => {
                SatisfactionResult::Satisfiable(Solution::from(self.get_solution_reference()))
            }
            CSPSolverExecutionFlag::Infeasible => SatisfactionResult::Unsatisfiable,
            CSPSolverExecutionFlag::Timeout => SatisfactionResult::Unknown,
        };

        self.satisfaction_solver.restore_state_at_root(brancher);
        result
    }

    /// Solves the model currently in the [`Solver`] to optimality with the provided
    /// [`OptimisationProcedure`].
    ///
    /// The solver returns to the root afterwards, so that the model can be extended.
    pub fn optimise<B, Procedure>(
        &mut self,
        brancher: &mut B,
        termination: &mut impl TerminationCondition,
        mut optimisation_procedure: Procedure,
    ) -> OptimisationResult
    where
        B: Brancher,
        Procedure: OptimisationProcedure<B>,
    {
        self.best_objective_value = None;
        optimisation_procedure.optimise(brancher, termination, self)
    }

    /// Creates one of the branchers which ship with the solver.
    ///
    /// The [`BranchingStrategy::ReducedCost`] brancher needs the handle of a Held-Karp
    /// propagator (see [`crate::constraints::TravellingSalesman::post_with_bound`]); without it,
    /// the minimum-domain brancher is used instead.
    pub fn brancher(
        &self,
        strategy: BranchingStrategy,
        graph: GraphId,
        held_karp: Option<PropagatorHandle<HeldKarpPropagator>>,
    ) -> Box<dyn Brancher> {
        match (strategy, held_karp) {
            (BranchingStrategy::Lexicographic, _) => Box::new(LexicographicBrancher::new(graph)),
            (BranchingStrategy::MinDomain, _) => Box::new(MinDomainBrancher::new(graph)),
            (BranchingStrategy::ReducedCost, Some(held_karp)) => {
                Box::new(ReducedCostBrancher::new(graph, held_karp))
            }
            (BranchingStrategy::ReducedCost, None) => {
                warn!(
                    "Reduced-cost branching requires a Lagrangian relaxation, using min-domain \
                     branching instead"
                );
                Box::new(MinDomainBrancher::new(graph))
            }
        }
    }
}

/// Functions which report on the searches performed so far.
impl Solver {
    /// The number of solutions found, including the ones which were improved upon later.
    pub fn num_solutions(&self) -> u64 {
        self.satisfaction_solver
            .solver_statistics
            .engine_statistics
            .num_solutions
    }

    /// The number of contradictions the search encountered.
    pub fn num_failures(&self) -> u64 {
        self.satisfaction_solver
            .solver_statistics
            .engine_statistics
            .num_failures
    }

    /// The number of decisions the search made, i.e. the number of search nodes.
    pub fn num_decisions(&self) -> u64 {
        self.satisfaction_solver
            .solver_statistics
            .engine_statistics
            .num_decisions
    }

    /// The objective value of the best solution found by the last optimisation.
    pub fn best_objective_value(&self) -> Option<i64> {
        self.best_objective_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints;
    use crate::results::ProblemSolution;
    use crate::termination::Indefinite;

    #[test]
    fn an_undirected_complete_graph_lists_every_edge_once() {
        let mut solver = Solver::default();

        let graph = solver.new_complete_graph(4, GraphKind::Undirected).unwrap();

        assert_eq!(solver.graph(graph).num_envelope_arcs(), 6);
    }

    #[test]
    fn graphs_from_costs_leave_out_the_missing_arcs() {
        let mut solver = Solver::default();
        let costs = vec![
            vec![None, Some(4), None],
            vec![None, None, Some(2)],
            vec![Some(7), Some(1), None],
        ];

        let (graph, costs) = solver
            .new_graph_from_costs(&costs, GraphKind::Directed)
            .unwrap();

        assert_eq!(solver.graph(graph).num_envelope_arcs(), 4);
        assert!(!solver.graph(graph).is_arc_in_envelope(0, 2));
        assert_eq!(costs.cost(2, 0), 7);
    }

    #[test]
    fn the_solver_is_back_at_the_root_after_satisfy() {
        let mut solver = Solver::default();
        let graph = solver.new_complete_graph(4, GraphKind::Directed).unwrap();
        solver
            .add_constraint(constraints::hamiltonian_circuit(graph))
            .unwrap();
        let mut brancher = LexicographicBrancher::new(graph);

        let result = solver.satisfy(&mut brancher, &mut Indefinite);

        let SatisfactionResult::Satisfiable(solution) = result else {
            panic!("a complete graph has a Hamiltonian circuit");
        };
        assert_eq!(solution.arcs(graph).len(), 4);
        assert!(!solver.is_instantiated(graph));
        assert!(solver.add_arc_to_envelope(graph, 0, 1).is_err());
        assert_eq!(solver.num_solutions(), 1);
    }

    #[test]
    fn a_node_limit_of_zero_yields_unknown() {
        let mut solver = Solver::default();
        let graph = solver.new_complete_graph(5, GraphKind::Directed).unwrap();
        solver
            .add_constraint(constraints::hamiltonian_circuit(graph))
            .unwrap();
        solver.set_node_limit(0);

        let mut brancher = solver.brancher(BranchingStrategy::MinDomain, graph, None);
        let result = solver.find_solution(&mut brancher);

        assert!(matches!(result, SatisfactionResult::Unknown));
        assert!(!solver.is_infeasible());
    }

    #[test]
    fn objective_bounds_have_to_be_ordered() {
        let mut solver = Solver::default();
        let objective = solver.new_bounded_integer(0, 10).unwrap();

        assert_eq!(
            solver.set_objective_bounds(objective, 5, 4),
            Err(ConfigurationError::InvalidBounds {
                lower_bound: 5,
                upper_bound: 4
            })
        );

        solver.set_objective_bounds(objective, 2, 8).unwrap();
        assert_eq!(solver.lower_bound(objective), 2);
        assert_eq!(solver.upper_bound(objective), 8);
    }
}
