use std::time::Duration;

use crate::statistics::log_statistic;

/// Statistics of the search performed by the solver.
#[derive(Debug, Default)]
pub(crate) struct SolverStatistics {
    pub(crate) engine_statistics: EngineStatistics,
}

impl SolverStatistics {
    pub(crate) fn log(&self) {
        log_statistic("nodes", self.engine_statistics.num_decisions);
        log_statistic("failures", self.engine_statistics.num_failures);
        log_statistic("solutions", self.engine_statistics.num_solutions);
        log_statistic("propagations", self.engine_statistics.num_propagations);
        log_statistic("peakDepth", self.engine_statistics.peak_depth);
        log_statistic(
            "solveTime",
            self.engine_statistics.time_spent_in_solver.as_secs_f64(),
        );
    }
}

/// Core statistics of the search (e.g. the number of decisions).
#[derive(Debug, Default)]
pub(crate) struct EngineStatistics {
    /// The number of decisions taken by the solver
    pub(crate) num_decisions: u64,
    /// The number of contradictions encountered in the search tree
    pub(crate) num_failures: u64,
    /// The number of solutions found, including the non-improving ones
    pub(crate) num_solutions: u64,
    /// The number of times a propagator was invoked
    pub(crate) num_propagations: u64,
    /// The peak depth of the search tree
    pub(crate) peak_depth: u64,
    pub(crate) time_spent_in_solver: Duration,
}
