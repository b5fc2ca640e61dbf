use crate::results::SolutionReference;
use crate::Solver;

/// Called by the optimisation procedures for every improving solution.
pub trait SolutionCallback {
    fn on_solution_callback(&self, solver: &Solver, solution: SolutionReference);
}

impl<T: Fn(&Solver, SolutionReference)> SolutionCallback for T {
    fn on_solution_callback(&self, solver: &Solver, solution: SolutionReference) {
        (self)(solver, solution)
    }
}

impl<T: SolutionCallback> SolutionCallback for Option<T> {
    fn on_solution_callback(&self, solver: &Solver, solution: SolutionReference) {
        if let Some(callback) = self {
            callback.on_solution_callback(solver, solution)
        }
    }
}
