use std::fmt::Display;

use crate::engine::EmptyDomain;

/// The result of invoking a propagator: either the domains are (locally) consistent or an
/// [`Inconsistency`] has been detected, after which the search has to backtrack.
pub type PropagationStatus = Result<(), Inconsistency>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inconsistency {
    /// A domain operation would have left a domain without any value (e.g. removing a kernel arc
    /// from the envelope, or crossing the bounds of an integer).
    EmptyDomain,
    /// A propagator found the current domains to be inconsistent with its constraint.
    Contradiction(Contradiction),
}

impl From<EmptyDomain> for Inconsistency {
    fn from(_: EmptyDomain) -> Self {
        Inconsistency::EmptyDomain
    }
}

impl From<Contradiction> for Inconsistency {
    fn from(contradiction: Contradiction) -> Self {
        Inconsistency::Contradiction(contradiction)
    }
}

impl From<ContradictionReason> for Inconsistency {
    fn from(reason: ContradictionReason) -> Self {
        Inconsistency::Contradiction(Contradiction { reason })
    }
}

/// A contradiction stated by a propagator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contradiction {
    pub reason: ContradictionReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContradictionReason {
    /// The kernel contains a cycle which does not visit every node.
    SubCycle,
    /// A node has more mandatory incident arcs than allowed.
    DegreeExceeded,
    /// A node can no longer reach its required degree.
    DegreeUnreachable,
    /// The path from the source to the sink has been closed before visiting every node.
    PrematurePath,
    /// The envelope is not connected enough to contain a Hamiltonian structure.
    Disconnected,
    /// The strongly connected components cannot be visited one after the other.
    ComponentOrder,
    /// A component cannot be entered and left exactly once.
    DoorViolation,
    /// The relaxation bound exceeds the upper bound of the objective.
    BoundExceeded,
}

impl Display for ContradictionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContradictionReason::SubCycle => write!(f, "sub-cycle"),
            ContradictionReason::DegreeExceeded => write!(f, "degree-exceeded"),
            ContradictionReason::DegreeUnreachable => write!(f, "degree-unreachable"),
            ContradictionReason::PrematurePath => write!(f, "premature-path"),
            ContradictionReason::Disconnected => write!(f, "disconnected"),
            ContradictionReason::ComponentOrder => write!(f, "component-order"),
            ContradictionReason::DoorViolation => write!(f, "door-violation"),
            ContradictionReason::BoundExceeded => write!(f, "bound-exceeded"),
        }
    }
}
