use log::info;

use super::OptimisationDirection;
use super::OptimisationProcedure;
use super::SolutionCallback;
use crate::branching::Brancher;
use crate::engine::constraint_satisfaction_solver::CSPSolverExecutionFlag;
use crate::engine::variables::IntegerId;
use crate::results::OptimisationResult;
use crate::results::ProblemSolution;
use crate::results::Solution;
use crate::termination::TerminationCondition;
use crate::Solver;

/// Implements the linear SAT-UNSAT (LSU) optimisation procedure, i.e. a top-down branch and bound.
///
/// After every solution the objective is bounded to strictly improve on it, and the search
/// resumes at the node of the solution instead of restarting from the root.
#[derive(Debug, Clone, Copy)]
pub struct LinearSatUnsat<Callback> {
    direction: OptimisationDirection,
    objective: IntegerId,
    solution_callback: Callback,
}

impl<Callback> LinearSatUnsat<Callback> {
    /// Create a new instance of [`LinearSatUnsat`].
    pub fn new(
        direction: OptimisationDirection,
        objective: IntegerId,
        solution_callback: Callback,
    ) -> Self {
        Self {
            direction,
            objective,
            solution_callback,
        }
    }
}

impl<Callback, B> OptimisationProcedure<B> for LinearSatUnsat<Callback>
where
    B: Brancher,
    Callback: SolutionCallback,
{
    fn optimise(
        &mut self,
        brancher: &mut B,
        termination: &mut impl TerminationCondition,
        solver: &mut Solver,
    ) -> OptimisationResult {
        let mut best_solution: Option<Solution> = None;
        solver.satisfaction_solver.objective_bound = None;

        let result = loop {
            match solver.satisfaction_solver.solve(&mut *termination, brancher) {
                CSPSolverExecutionFlag::Feasible => {}
                CSPSolverExecutionFlag::Infeasible => {
                    break match best_solution.take() {
                        Some(solution) => OptimisationResult::Optimal(solution),
                        None => OptimisationResult::Unsatisfiable,
                    };
                }
                CSPSolverExecutionFlag::Timeout => {
                    break match best_solution.take() {
                        Some(solution) => OptimisationResult::Satisfiable(solution),
                        None => OptimisationResult::Unknown,
                    };
                }
            }

            let solution = solver.get_solution_reference();
            let value = solution.integer_value(self.objective);
            info!("Found a solution with objective value {value}");

            self.solution_callback.on_solution_callback(solver, solution);
            best_solution = Some(solution.into());
            solver.best_objective_value = Some(value);

            solver.satisfaction_solver.objective_bound =
                Some(self.direction.improving_bound(self.objective, value));
        };

        solver.satisfaction_solver.objective_bound = None;
        solver.satisfaction_solver.restore_state_at_root(brancher);
        result
    }
}
