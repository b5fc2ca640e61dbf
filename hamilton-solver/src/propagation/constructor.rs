#[cfg(doc)]
use super::PropagationContext;
use super::Propagator;
use crate::basic_types::ConfigurationError;
#[cfg(doc)]
use crate::engine::domain_events::DomainEvent;
use crate::engine::domain_events::DomainEvents;
use crate::engine::variables::DomainRef;
use crate::engine::variables::GraphId;
use crate::engine::variables::IntegerId;
use crate::engine::Assignments;
use crate::engine::Domains;
use crate::engine::GraphView;
use crate::engine::TrailedInteger;

/// A propagator constructor creates a fully initialised instance of a [`Propagator`].
///
/// The constructor validates its input against the model, indicates on which events the
/// propagator should be enqueued, and allocates the trailed cells the propagator needs.
pub trait PropagatorConstructor {
    /// The propagator that is produced by this constructor.
    type PropagatorImpl: Propagator;

    /// Create the propagator instance from `Self`.
    fn create(
        self,
        context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, ConfigurationError>;
}

/// The communication point between the solver and a [`PropagatorConstructor`].
///
/// The subscriptions made through [`PropagatorConstructorContext::register`] only take effect
/// once the constructor succeeded.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    assignments: &'a mut Assignments,
    registrations: &'a mut Vec<(DomainRef, DomainEvents)>,
}

impl<'a> PropagatorConstructorContext<'a> {
    pub(crate) fn new(
        assignments: &'a mut Assignments,
        registrations: &'a mut Vec<(DomainRef, DomainEvents)>,
    ) -> PropagatorConstructorContext<'a> {
        PropagatorConstructorContext {
            assignments,
            registrations,
        }
    }

    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self.assignments)
    }

    pub fn graph(&self, graph: GraphId) -> GraphView<'_> {
        self.assignments.graph(graph)
    }

    pub fn lower_bound(&self, integer: IntegerId) -> i64 {
        self.assignments.lower_bound(integer)
    }

    pub fn upper_bound(&self, integer: IntegerId) -> i64 {
        self.assignments.upper_bound(integer)
    }

    /// Subscribes the propagator to the given [`DomainEvents`] of a variable.
    ///
    /// For each [`DomainEvent`] which happens to the variable, [`Propagator::notify`] is called.
    pub fn register(&mut self, domain: DomainRef, domain_events: DomainEvents) {
        self.registrations.push((domain, domain_events));
    }

    /// Checks that `graph` refers to an existing graph variable.
    pub fn check_graph(&self, graph: GraphId) -> Result<(), ConfigurationError> {
        if self.assignments.graph_ids().any(|existing| existing == graph) {
            Ok(())
        } else {
            Err(ConfigurationError::UnknownVariable)
        }
    }

    /// Checks that `integer` refers to an existing integer variable.
    pub fn check_integer(&self, integer: IntegerId) -> Result<(), ConfigurationError> {
        if self.assignments.integer_ids().any(|existing| existing == integer) {
            Ok(())
        } else {
            Err(ConfigurationError::UnknownVariable)
        }
    }

    /// Allocates a reversible integer cell, which the propagator reads and writes through its
    /// [`PropagationContext`].
    pub fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.assignments.new_trailed_integer(initial_value)
    }
}
