use downcast_rs::impl_downcast;
use downcast_rs::Downcast;
use enum_map::Enum;

use super::PropagationContext;
use crate::basic_types::PropagationStatus;
#[cfg(doc)]
use crate::create_statistics_struct;
use crate::engine::domain_events::Change;
use crate::engine::domain_events::DomainEvent;
use crate::engine::variables::DomainRef;
use crate::engine::Domains;
#[cfg(doc)]
use crate::propagation::PropagatorConstructorContext;
use crate::statistics::StatisticLogger;

// Allows retrieving the concrete propagator behind a `Box<dyn Propagator>`, e.g. for the
// branching heuristics which read the reduced costs of the Lagrangian propagator.
impl_downcast!(Propagator);

/// A propagator removes arcs (or bound values) which cannot be part of any solution, or reports
/// that the current domains are inconsistent with its constraint.
///
/// The only required functions are [`Propagator::name`] and [`Propagator::propagate`]; all other
/// functions have default implementations.
pub trait Propagator: Downcast {
    /// Return the name of the propagator, used for logging.
    fn name(&self) -> &str;

    /// Filters the domains through the provided [`PropagationContext`].
    ///
    /// Returns an [`Err`] when the domains are found to be inconsistent, either because one of
    /// the domain operations emptied a domain or because the logic of the propagator detected
    /// the inconsistency itself.
    ///
    /// Propagators are not required to reach a fixpoint by themselves; they are re-invoked for
    /// the changes they made as long as they are subscribed to them.
    fn propagate(&mut self, context: PropagationContext) -> PropagationStatus;

    /// Called for every event the propagator subscribed to (see
    /// [`PropagatorConstructorContext::register`]). Returns whether the propagator should be
    /// enqueued.
    ///
    /// This hook can be used to maintain incremental data structures, but it should stay cheap;
    /// the actual filtering belongs in [`Propagator::propagate`].
    fn notify(
        &mut self,
        _domains: Domains,
        _domain: DomainRef,
        _event: DomainEvent,
        _change: Change,
    ) -> EnqueueDecision {
        EnqueueDecision::Enqueue
    }

    /// Called after backtracking, allowing the propagator to reset the internal state which is
    /// not stored in trailed cells.
    fn synchronise(&mut self, _domains: Domains) {}

    /// The [`Priority`] with which the propagator is enqueued.
    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    /// Whether the propagator should stay inactive until the first solution has been found.
    ///
    /// Such a propagator is neither notified nor enqueued before then.
    fn wait_first_solution(&self) -> bool {
        false
    }

    /// Logs statistics of the propagator using the provided [`StatisticLogger`].
    ///
    /// It is recommended to create a struct through the [`create_statistics_struct!`] macro.
    fn log_statistics(&self, _statistic_logger: StatisticLogger) {}
}

/// Indicator of what to do when a propagator is notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueDecision {
    /// The propagator should be enqueued.
    Enqueue,
    /// The propagator should not be enqueued.
    Skip,
}

/// The priority of a propagator, used for determining the order in which propagators run.
///
/// Cheap propagators (the circuit and degree checks) should run before the expensive ones (the
/// reduced graph and the Lagrangian relaxation), which then see a smaller envelope.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, Enum)]
#[repr(u8)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    #[default]
    VeryLow = 3,
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        ((*self) as u8).partial_cmp(&((*other) as u8))
    }
}
