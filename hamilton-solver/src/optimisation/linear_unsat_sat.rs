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

/// Implements the linear UNSAT-SAT (LUS) optimisation procedure, i.e. a bottom-up search.
///
/// After an initial feasibility check, the objective is fixed to its current best possible value.
/// When no solution attains it, that value is excluded at the root and the next one is tried; the
/// first solution found this way is optimal.
#[derive(Debug, Clone, Copy)]
pub struct LinearUnsatSat<Callback> {
    direction: OptimisationDirection,
    objective: IntegerId,
    solution_callback: Callback,
}

impl<Callback> LinearUnsatSat<Callback> {
    /// Create a new instance of [`LinearUnsatSat`].
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

impl<Callback: SolutionCallback> LinearUnsatSat<Callback> {
    fn process_solution(&self, solver: &mut Solver) -> (i64, Solution) {
        let solution = solver.get_solution_reference();
        let value = solution.integer_value(self.objective);
        info!("Found a solution with objective value {value}");

        self.solution_callback.on_solution_callback(solver, solution);
        let solution = Solution::from(solution);
        solver.best_objective_value = Some(value);
        (value, solution)
    }

    /// The most optimistic objective value which is still possible at the root.
    fn optimistic_value(&self, solver: &Solver) -> i64 {
        match self.direction {
            OptimisationDirection::Minimise => solver.lower_bound(self.objective),
            OptimisationDirection::Maximise => solver.upper_bound(self.objective),
        }
    }
}

impl<Callback, B> OptimisationProcedure<B> for LinearUnsatSat<Callback>
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
        solver.satisfaction_solver.objective_bound = None;

        // First we do a feasibility check
        match solver.satisfaction_solver.solve(&mut *termination, brancher) {
            CSPSolverExecutionFlag::Feasible => {}
            CSPSolverExecutionFlag::Infeasible => {
                solver.satisfaction_solver.restore_state_at_root(brancher);
                return OptimisationResult::Unsatisfiable;
            }
            CSPSolverExecutionFlag::Timeout => {
                solver.satisfaction_solver.restore_state_at_root(brancher);
                return OptimisationResult::Unknown;
            }
        }

        let (best_value, best_solution) = self.process_solution(solver);
        solver.satisfaction_solver.restore_state_at_root(brancher);

        let result = loop {
            let target = self.optimistic_value(solver);
            if solver.satisfaction_solver.is_infeasible()
                || !self.direction.improves(target, best_value)
            {
                break OptimisationResult::Optimal(best_solution);
            }

            info!("Lower-bounding search - attempting to find a solution with objective {target}");
            solver.satisfaction_solver.objective_bound =
                Some(self.direction.bound_at(self.objective, target));

            match solver.satisfaction_solver.solve(&mut *termination, brancher) {
                CSPSolverExecutionFlag::Feasible => {
                    let (_, solution) = self.process_solution(solver);
                    break OptimisationResult::Optimal(solution);
                }
                CSPSolverExecutionFlag::Infeasible => {
                    solver.satisfaction_solver.objective_bound = None;
                    solver.satisfaction_solver.restore_state_at_root(brancher);
                    let excluded = self.direction.excluding_bound(self.objective, target);
                    solver.satisfaction_solver.tighten_root_objective(excluded);
                }
                CSPSolverExecutionFlag::Timeout => {
                    break OptimisationResult::Satisfiable(best_solution);
                }
            }
        };

        solver.satisfaction_solver.objective_bound = None;
        solver.satisfaction_solver.restore_state_at_root(brancher);
        result
    }
}
