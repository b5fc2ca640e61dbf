use std::fmt::Display;

use enum_map::Enum;
use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

use crate::engine::variables::Arc;
use crate::engine::variables::DomainRef;

/// The kinds of changes which can happen to a domain.
#[derive(Debug, EnumSetType, Enum, Hash)]
pub enum DomainEvent {
    /// An arc moved from the envelope into the kernel.
    ArcEnforced,
    /// An arc left the envelope.
    ArcRemoved,
    /// A node became mandatory.
    NodeEnforced,
    /// The lower bound of an integer increased.
    LowerBound,
    /// The upper bound of an integer decreased.
    UpperBound,
}

impl Display for DomainEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainEvent::ArcEnforced => write!(f, "[Event:Enforce]"),
            DomainEvent::ArcRemoved => write!(f, "[Event:Remove]"),
            DomainEvent::NodeEnforced => write!(f, "[Event:NodeEnforce]"),
            DomainEvent::LowerBound => write!(f, "[Event:LB]"),
            DomainEvent::UpperBound => write!(f, "[Event:UB]"),
        }
    }
}

/// A set of [`DomainEvent`]s a propagator subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainEvents {
    events: EnumSet<DomainEvent>,
}

impl DomainEvents {
    /// Arcs entering the kernel or leaving the envelope.
    pub const ARCS: DomainEvents =
        DomainEvents::new(enum_set!(DomainEvent::ArcEnforced | DomainEvent::ArcRemoved));
    pub const ARC_ENFORCED: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::ArcEnforced));
    pub const ARC_REMOVED: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::ArcRemoved));
    /// Every change to a graph, including its nodes.
    pub const ANY_GRAPH: DomainEvents = DomainEvents::new(enum_set!(
        DomainEvent::ArcEnforced | DomainEvent::ArcRemoved | DomainEvent::NodeEnforced
    ));
    /// Both bounds of an integer.
    pub const BOUNDS: DomainEvents =
        DomainEvents::new(enum_set!(DomainEvent::LowerBound | DomainEvent::UpperBound));
    pub const UPPER_BOUND: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::UpperBound));

    pub(crate) const fn new(events: EnumSet<DomainEvent>) -> DomainEvents {
        DomainEvents { events }
    }

    pub(crate) fn events(&self) -> EnumSet<DomainEvent> {
        self.events
    }
}

/// What exactly changed in a domain event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Arc(Arc),
    Node(usize),
    Bound(i64),
}

/// A domain event waiting to be dispatched to the subscribed propagators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EventRecord {
    pub(crate) domain: DomainRef,
    pub(crate) event: DomainEvent,
    pub(crate) change: Change,
}
