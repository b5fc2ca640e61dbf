use std::time::Instant;

use log::debug;
use log::trace;

use super::constraint_satisfaction_solver::CSPSolverExecutionFlag;
use super::ConstraintSatisfactionSolver;
use crate::basic_types::SolutionReference;
use crate::branching::Brancher;
use crate::branching::Decision;
use crate::branching::SelectionContext;
use crate::engine::termination::TerminationCondition;
use crate::hamilton_assert_moderate;
use crate::hamilton_assert_simple;

/// The level at which the search starts branching. It holds the objective bound, so that the
/// bound and the refutations taken at this level are undone when the solver returns to the root.
pub(crate) const BASE_LEVEL: usize = 1;

/// The states of the depth-first search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchState {
    RootPropagation,
    SelectDecision,
    Apply(Decision),
    Propagate,
    Solution,
    Contradiction,
    Backtrack,
    Exhausted,
}

impl ConstraintSatisfactionSolver {
    /// Searches for the next solution.
    ///
    /// When the solver still contains the previous solution, the search resumes by refuting the
    /// last decision which led to it. Otherwise the search starts from the root. The domains are
    /// left at the node of the solution, so that it can be inspected; the caller restores the
    /// root afterwards.
    pub(crate) fn solve(
        &mut self,
        mut termination: impl TerminationCondition,
        brancher: &mut impl Brancher,
    ) -> CSPSolverExecutionFlag {
        if self.state.is_infeasible() {
            return CSPSolverExecutionFlag::Infeasible;
        }

        let start_time = Instant::now();
        let mut search_state = if self.state.has_solution() {
            SearchState::Backtrack
        } else {
            self.restore_state_at_root(brancher);
            SearchState::RootPropagation
        };
        self.state.declare_solving();

        let flag = loop {
            search_state = match search_state {
                SearchState::RootPropagation => self.propagate_root(),
                SearchState::SelectDecision => {
                    if termination.should_stop() {
                        break CSPSolverExecutionFlag::Timeout;
                    }
                    self.select_decision(brancher)
                }
                SearchState::Apply(decision) => {
                    termination.decision_has_been_made();
                    self.apply_decision(decision)
                }
                SearchState::Propagate => self.propagate_node(),
                SearchState::Solution => {
                    self.on_solution(brancher);
                    break CSPSolverExecutionFlag::Feasible;
                }
                SearchState::Contradiction => {
                    self.solver_statistics.engine_statistics.num_failures += 1;
                    brancher.on_conflict();
                    SearchState::Backtrack
                }
                SearchState::Backtrack => self.refute_last_decision(brancher),
                SearchState::Exhausted => break CSPSolverExecutionFlag::Infeasible,
            };
        };

        match flag {
            CSPSolverExecutionFlag::Feasible => self.state.declare_solution_found(),
            CSPSolverExecutionFlag::Timeout => self.state.declare_timeout(),
            CSPSolverExecutionFlag::Infeasible => {
                // Without an objective bound, the whole search space has been refuted.
                if self.objective_bound.is_none() || self.state.is_infeasible() {
                    self.state.declare_infeasible();
                } else {
                    self.state.declare_ready();
                }
            }
        }

        self.solver_statistics.engine_statistics.time_spent_in_solver += start_time.elapsed();
        flag
    }

    /// Propagates the model at the root, and opens the base level holding the objective bound.
    fn propagate_root(&mut self) -> SearchState {
        hamilton_assert_simple!(self.get_decision_level() == 0);
        self.decisions.clear();

        if let Err(inconsistency) = self.propagate() {
            debug!("The root is inconsistent: {inconsistency:?}");
            self.state.declare_infeasible();
            return SearchState::Exhausted;
        }

        self.new_checkpoint();
        hamilton_assert_simple!(self.get_decision_level() == BASE_LEVEL);
        SearchState::Propagate
    }

    fn select_decision(&mut self, brancher: &mut impl Brancher) -> SearchState {
        let mut context = SelectionContext::new(
            &self.assignments,
            &self.propagators,
            &mut self.random_generator,
        );

        match brancher.next_decision(&mut context) {
            Some(decision) => SearchState::Apply(decision),
            None => SearchState::Solution,
        }
    }

    fn apply_decision(&mut self, decision: Decision) -> SearchState {
        self.new_checkpoint();
        self.decisions.push(decision);

        let statistics = &mut self.solver_statistics.engine_statistics;
        statistics.num_decisions += 1;
        statistics.peak_depth = statistics.peak_depth.max(self.decisions.len() as u64);
        trace!("Decision {decision} at depth {}", self.decisions.len());

        match decision.apply(&mut self.assignments) {
            Ok(changed) => {
                hamilton_assert_simple!(
                    changed,
                    "Decision {decision} does not change the domain of {}",
                    decision.graph()
                );
                SearchState::Propagate
            }
            Err(_) => SearchState::Contradiction,
        }
    }

    /// Enforces the objective bound on the current node and runs the propagators to a fixpoint.
    fn propagate_node(&mut self) -> SearchState {
        self.enqueue_activated_propagators();

        if let Some(bound) = self.objective_bound {
            if bound.apply(&mut self.assignments).is_err() {
                self.assignments.clear_events();
                return SearchState::Contradiction;
            }
        }

        match self.propagate() {
            Ok(()) => SearchState::SelectDecision,
            Err(_) => SearchState::Contradiction,
        }
    }

    fn on_solution(&mut self, brancher: &mut impl Brancher) {
        hamilton_assert_moderate!(
            self.assignments
                .graph_ids()
                .all(|graph| self.assignments.graph(graph).is_instantiated()),
            "The brancher reported a solution while a graph is not instantiated"
        );

        self.solver_statistics.engine_statistics.num_solutions += 1;
        self.declare_first_solution_found();
        brancher.on_solution(SolutionReference::new(&self.assignments));
    }

    /// Undoes the most recent decision and applies its negation at the level above it.
    fn refute_last_decision(&mut self, brancher: &mut impl Brancher) -> SearchState {
        let Some(decision) = self.decisions.pop() else {
            return SearchState::Exhausted;
        };

        self.backtrack(BASE_LEVEL + self.decisions.len(), brancher);

        let refutation = decision.negate();
        trace!("Refutation {refutation} at depth {}", self.decisions.len());
        match refutation.apply(&mut self.assignments) {
            Ok(_) => SearchState::Propagate,
            Err(_) => SearchState::Contradiction,
        }
    }
}
