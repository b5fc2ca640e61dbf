use std::fmt::Debug;

use log::debug;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::solver_statistics::SolverStatistics;
use super::variables::Arc;
use super::variables::DomainRef;
use super::variables::GraphId;
use super::variables::GraphKind;
use super::variables::IntegerId;
use super::Assignments;
use super::Domains;
use super::EmptyDomain;
use super::PropagatorQueue;
use super::WatchLists;
use crate::basic_types::ConfigurationError;
use crate::basic_types::PropagationStatus;
use crate::branching::Brancher;
use crate::branching::Decision;
use crate::branching::SelectionContext;
use crate::containers::StorageKey;
use crate::hamilton_assert_simple;
use crate::propagation::EnqueueDecision;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorStore;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::statistics::StatisticLogger;

/// Options for the [`crate::Solver`] which determine how it behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverOptions {
    /// Seeds the generator which the branchers draw from through
    /// [`SelectionContext::random`](crate::branching::SelectionContext::random).
    pub random_seed: u64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions { random_seed: 42 }
    }
}

/// The outcome of a single run of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CSPSolverExecutionFlag {
    Feasible,
    Infeasible,
    Timeout,
}

/// A bound on the objective which every node of the search tree has to respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ObjectiveBound {
    AtMost(IntegerId, i64),
    AtLeast(IntegerId, i64),
}

impl ObjectiveBound {
    pub(crate) fn apply(self, assignments: &mut Assignments) -> Result<bool, EmptyDomain> {
        match self {
            ObjectiveBound::AtMost(objective, bound) => {
                assignments.tighten_upper_bound(objective, bound)
            }
            ObjectiveBound::AtLeast(objective, bound) => {
                assignments.tighten_lower_bound(objective, bound)
            }
        }
    }
}

/// The propagation engine together with the state of the depth-first search.
///
/// The search itself lives in [`ConstraintSatisfactionSolver::solve`]; this file contains the
/// model construction and the propagation loop.
pub(crate) struct ConstraintSatisfactionSolver {
    pub(crate) state: CSPSolverState,
    pub(crate) assignments: Assignments,
    pub(crate) propagators: PropagatorStore,
    watch_lists: WatchLists,
    propagator_queue: PropagatorQueue,
    /// Whether the propagators which wait for the first solution have been activated.
    first_solution_found: bool,
    /// Set when the waiting propagators still have to be enqueued for the first time.
    pending_activation: bool,
    /// The decisions from the base level to the current node.
    pub(crate) decisions: Vec<Decision>,
    pub(crate) objective_bound: Option<ObjectiveBound>,
    pub(crate) solver_statistics: SolverStatistics,
    pub(crate) random_generator: SmallRng,
}

impl Debug for ConstraintSatisfactionSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintSatisfactionSolver")
            .field("state", &self.state)
            .field("assignments", &self.assignments)
            .field("propagators", &self.propagators)
            .field("decisions", &self.decisions)
            .field("objective_bound", &self.objective_bound)
            .finish_non_exhaustive()
    }
}

impl Default for ConstraintSatisfactionSolver {
    fn default() -> Self {
        ConstraintSatisfactionSolver::new(SolverOptions::default())
    }
}

impl ConstraintSatisfactionSolver {
    pub(crate) fn new(solver_options: SolverOptions) -> ConstraintSatisfactionSolver {
        ConstraintSatisfactionSolver {
            state: CSPSolverState::default(),
            assignments: Assignments::default(),
            propagators: PropagatorStore::default(),
            watch_lists: WatchLists::default(),
            propagator_queue: PropagatorQueue::default(),
            first_solution_found: false,
            pending_activation: false,
            decisions: vec![],
            objective_bound: None,
            solver_statistics: SolverStatistics::default(),
            random_generator: SmallRng::seed_from_u64(solver_options.random_seed),
        }
    }

    pub(crate) fn get_decision_level(&self) -> usize {
        self.assignments.get_decision_level()
    }

    pub(crate) fn is_infeasible(&self) -> bool {
        self.state.is_infeasible()
    }

    fn check_root(&self) -> Result<(), ConfigurationError> {
        if self.get_decision_level() == 0 {
            Ok(())
        } else {
            Err(ConfigurationError::NotAtRoot)
        }
    }

    pub(crate) fn check_graph(&self, graph: GraphId) -> Result<(), ConfigurationError> {
        if graph.index() < self.assignments.num_graphs() {
            Ok(())
        } else {
            Err(ConfigurationError::UnknownVariable)
        }
    }

    pub(crate) fn check_integer(&self, integer: IntegerId) -> Result<(), ConfigurationError> {
        if integer.index() < self.assignments.num_integers() {
            Ok(())
        } else {
            Err(ConfigurationError::UnknownVariable)
        }
    }

    fn check_node(&self, graph: GraphId, node: usize) -> Result<(), ConfigurationError> {
        let num_nodes = self.assignments.graph(graph).num_nodes();
        if node < num_nodes {
            Ok(())
        } else {
            Err(ConfigurationError::NodeOutOfRange { node, num_nodes })
        }
    }

    /// Creates a graph variable whose envelope holds every node and no arcs.
    pub(crate) fn new_graph(
        &mut self,
        num_nodes: usize,
        kind: GraphKind,
    ) -> Result<GraphId, ConfigurationError> {
        self.check_root()?;
        if num_nodes == 0 {
            return Err(ConfigurationError::EmptyGraph);
        }

        Ok(self.assignments.new_graph(num_nodes, kind))
    }

    /// Adds an arc to the envelope of a graph variable.
    ///
    /// Arcs can only be added as long as no propagator has subscribed to the graph, since the
    /// propagators build their incremental structures from the envelope they are created with.
    pub(crate) fn add_arc_to_envelope(
        &mut self,
        graph: GraphId,
        from: usize,
        to: usize,
    ) -> Result<(), ConfigurationError> {
        self.check_root()?;
        self.check_graph(graph)?;
        self.check_node(graph, from)?;
        self.check_node(graph, to)?;
        if from == to {
            return Err(ConfigurationError::SelfLoop { node: from });
        }
        if self.watch_lists.is_watched(DomainRef::Graph(graph)) {
            return Err(ConfigurationError::Unsupported(
                "arcs have to be added before constraints are posted on the graph",
            ));
        }

        let _ = self.assignments.add_arc_to_envelope(graph, Arc::new(from, to));
        Ok(())
    }

    /// Makes a node mandatory at the root.
    ///
    /// The resulting change is propagated immediately; an inconsistency renders the solver
    /// infeasible.
    pub(crate) fn enforce_node(
        &mut self,
        graph: GraphId,
        node: usize,
    ) -> Result<(), ConfigurationError> {
        self.check_root()?;
        self.check_graph(graph)?;
        self.check_node(graph, node)?;

        if self.state.is_infeasible() {
            return Ok(());
        }

        if self.assignments.enforce_node(graph, node).is_err() {
            self.state.declare_infeasible();
            return Ok(());
        }
        self.propagate_at_root();
        Ok(())
    }

    /// Adds a proven bound on the objective to the root.
    pub(crate) fn tighten_root_objective(&mut self, bound: ObjectiveBound) {
        hamilton_assert_simple!(self.get_decision_level() == 0);

        if self.state.is_infeasible() {
            return;
        }

        if bound.apply(&mut self.assignments).is_err() {
            self.state.declare_infeasible();
            return;
        }
        self.propagate_at_root();
    }

    pub(crate) fn new_integer(
        &mut self,
        lower_bound: i64,
        upper_bound: i64,
    ) -> Result<IntegerId, ConfigurationError> {
        self.check_root()?;
        if lower_bound > upper_bound {
            return Err(ConfigurationError::InvalidBounds {
                lower_bound,
                upper_bound,
            });
        }

        Ok(self.assignments.new_integer(lower_bound, upper_bound))
    }

    /// Creates a propagator, subscribes it to its events and propagates at the root.
    ///
    /// A propagator which finds the root inconsistent still gets added; the solver is then
    /// infeasible and every later search reports so.
    pub(crate) fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, ConfigurationError>
    where
        Constructor: PropagatorConstructor,
    {
        self.check_root()?;
        let handle = self.register_propagator(constructor)?;

        if !self.state.is_infeasible() {
            self.propagate_at_root();
        }

        Ok(handle)
    }

    /// Creates a propagator and enqueues it without propagating.
    pub(crate) fn register_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, ConfigurationError>
    where
        Constructor: PropagatorConstructor,
    {
        // The pending events belong to the existing propagators.
        self.dispatch_events();

        let propagator_id = self.propagators.next_id();
        let mut registrations = vec![];
        let context = PropagatorConstructorContext::new(&mut self.assignments, &mut registrations);
        let propagator = constructor.create(context)?;

        let handle = self.propagators.insert(propagator);
        hamilton_assert_simple!(handle.propagator_id() == propagator_id);

        for (domain, events) in registrations {
            self.watch_lists.watch(domain, events, propagator_id);
        }

        let propagator = &self.propagators[propagator_id];
        if self.first_solution_found || !propagator.wait_first_solution() {
            self.propagator_queue
                .enqueue_propagator(propagator_id, propagator.priority());
        }

        Ok(handle)
    }

    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators.downcast(handle)
    }

    fn propagate_at_root(&mut self) {
        hamilton_assert_simple!(self.get_decision_level() == 0);

        if let Err(inconsistency) = self.propagate() {
            debug!("The root is inconsistent: {inconsistency:?}");
            self.state.declare_infeasible();
        }
    }

    /// Hands every pending domain event to the subscribed propagators and enqueues the ones
    /// which ask for it.
    fn dispatch_events(&mut self) {
        let events = self.assignments.drain_events().collect::<Vec<_>>();

        for record in events {
            for &propagator_id in self.watch_lists.get_watchers(record.domain, record.event) {
                let propagator = &mut self.propagators[propagator_id];
                if !self.first_solution_found && propagator.wait_first_solution() {
                    continue;
                }

                let decision = propagator.notify(
                    Domains::new(&self.assignments),
                    record.domain,
                    record.event,
                    record.change,
                );

                if decision == EnqueueDecision::Enqueue {
                    self.propagator_queue
                        .enqueue_propagator(propagator_id, propagator.priority());
                }
            }
        }
    }

    /// Runs the enqueued propagators until no propagator is enqueued anymore.
    ///
    /// On an inconsistency the queue and the pending events are discarded; the caller is
    /// expected to backtrack.
    pub(crate) fn propagate(&mut self) -> PropagationStatus {
        loop {
            self.dispatch_events();

            let Some(propagator_id) = self.propagator_queue.pop() else {
                return Ok(());
            };

            self.solver_statistics.engine_statistics.num_propagations += 1;
            let context = PropagationContext::new(&mut self.assignments);
            let result = self.propagators[propagator_id].propagate(context);

            if let Err(inconsistency) = result {
                self.propagator_queue.clear();
                self.assignments.clear_events();
                return Err(inconsistency);
            }
        }
    }

    /// Activates the propagators which wait for the first solution; they are enqueued by the
    /// next propagation.
    pub(crate) fn declare_first_solution_found(&mut self) {
        if !self.first_solution_found {
            self.first_solution_found = true;
            self.pending_activation = self
                .propagators
                .iter()
                .any(|propagator| propagator.wait_first_solution());
        }
    }

    pub(crate) fn enqueue_activated_propagators(&mut self) {
        if !std::mem::take(&mut self.pending_activation) {
            return;
        }

        for propagator_id in self.propagators.ids().collect::<Vec<_>>() {
            let propagator = &self.propagators[propagator_id];
            if propagator.wait_first_solution() {
                self.propagator_queue
                    .enqueue_propagator(propagator_id, propagator.priority());
            }
        }
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.assignments.new_checkpoint();
    }

    /// Restores the domains of `level` and lets the propagators reset their internal state.
    pub(crate) fn synchronise(&mut self, level: usize) {
        hamilton_assert_simple!(level <= self.get_decision_level());

        self.assignments.synchronise(level);
        self.propagator_queue.clear();
        for propagator in self.propagators.iter_mut() {
            propagator.synchronise(Domains::new(&self.assignments));
        }
    }

    pub(crate) fn backtrack(&mut self, level: usize, brancher: &mut impl Brancher) {
        brancher.on_backtrack();
        self.synchronise(level);

        let mut context = SelectionContext::new(
            &self.assignments,
            &self.propagators,
            &mut self.random_generator,
        );
        brancher.synchronise(&mut context);
    }

    /// Brings the solver back to the root, where the model can be modified again.
    pub(crate) fn restore_state_at_root(&mut self, brancher: &mut impl Brancher) {
        if self.get_decision_level() != 0 {
            self.backtrack(0, brancher);
        }
        self.decisions.clear();

        if !self.state.is_infeasible() {
            self.state.declare_ready();
        }
    }

    pub(crate) fn log_statistics(&self) {
        if should_log_statistics() {
            self.solver_statistics.log();
            for (index, propagator) in self.propagators.iter().enumerate() {
                propagator
                    .log_statistics(StatisticLogger::for_propagator(propagator.name(), index));
            }
            log_statistic_postfix();
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
enum CSPSolverStateInternal {
    #[default]
    Ready,
    Solving,
    ContainsSolution,
    Infeasible,
    Timeout,
}

#[derive(Default, Debug, Clone, Copy)]
pub(crate) struct CSPSolverState {
    internal_state: CSPSolverStateInternal,
}

impl CSPSolverState {
    pub(crate) fn is_ready(&self) -> bool {
        self.internal_state == CSPSolverStateInternal::Ready
    }

    /// Infeasibility is final; no later search can change it.
    pub(crate) fn is_infeasible(&self) -> bool {
        self.internal_state == CSPSolverStateInternal::Infeasible
    }

    pub(crate) fn has_solution(&self) -> bool {
        self.internal_state == CSPSolverStateInternal::ContainsSolution
    }

    pub(crate) fn declare_ready(&mut self) {
        hamilton_assert_simple!(!self.is_infeasible());
        self.internal_state = CSPSolverStateInternal::Ready;
    }

    pub(crate) fn declare_solving(&mut self) {
        hamilton_assert_simple!((self.is_ready() || self.has_solution()) && !self.is_infeasible());
        self.internal_state = CSPSolverStateInternal::Solving;
    }

    pub(crate) fn declare_infeasible(&mut self) {
        self.internal_state = CSPSolverStateInternal::Infeasible;
    }

    pub(crate) fn declare_solution_found(&mut self) {
        hamilton_assert_simple!(!self.is_infeasible());
        self.internal_state = CSPSolverStateInternal::ContainsSolution;
    }

    pub(crate) fn declare_timeout(&mut self) {
        hamilton_assert_simple!(!self.is_infeasible());
        self.internal_state = CSPSolverStateInternal::Timeout;
    }
}
