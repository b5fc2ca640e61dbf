use super::Decision;
use super::SelectionContext;
use crate::basic_types::SolutionReference;
#[cfg(doc)]
use crate::create_statistics_struct;
use crate::statistics::StatisticLogger;
#[cfg(doc)]
use crate::Solver;

/// A trait for defining a branching strategy over the arcs of graph variables.
///
/// The search asks the brancher for a [`Decision`] at every node of the search tree; the decision
/// has to shrink a domain, i.e. it concerns an arc which is in the envelope but not in the kernel.
/// When the brancher returns [`None`], the current state is taken to be a solution, so a brancher
/// may only do so once the graphs it branches over are instantiated.
///
/// If a [`Brancher`] is implemented incorrectly then the behaviour of the solver is undefined.
pub trait Brancher {
    /// Logs statistics of the brancher using the provided [`StatisticLogger`].
    ///
    /// It is recommended to create a struct through the [`create_statistics_struct!`] macro!
    fn log_statistics(&self, _statistic_logger: StatisticLogger) {}

    /// Returns the next decision, or [`None`] if every arc under consideration is decided.
    ///
    /// The [`SelectionContext`] is only mutable to give access to the random generator; the
    /// decision is applied by the [`Solver`].
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Decision>;

    /// Called after a contradiction has been found, before backtracking.
    fn on_conflict(&mut self) {}

    /// Called whenever the [`Solver`] backtracks.
    fn on_backtrack(&mut self) {}

    /// Called for every solution the search finds.
    fn on_solution(&mut self, _solution: SolutionReference) {}

    /// Called after backtracking, allowing the brancher to reset its internal data structures.
    fn synchronise(&mut self, _context: &mut SelectionContext) {}
}

impl<B: Brancher + ?Sized> Brancher for Box<B> {
    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        (**self).log_statistics(statistic_logger)
    }

    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Decision> {
        (**self).next_decision(context)
    }

    fn on_conflict(&mut self) {
        (**self).on_conflict()
    }

    fn on_backtrack(&mut self) {
        (**self).on_backtrack()
    }

    fn on_solution(&mut self, solution: SolutionReference) {
        (**self).on_solution(solution)
    }

    fn synchronise(&mut self, context: &mut SelectionContext) {
        (**self).synchronise(context)
    }
}
