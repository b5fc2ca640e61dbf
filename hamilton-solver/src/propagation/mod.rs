//! Contains the building blocks for propagators.
//!
//! A propagator takes the domains of the variables of its constraint and shrinks them: for a
//! graph variable it removes arcs from the envelope or moves arcs into the kernel, for an integer
//! variable it tightens the bounds. A propagator is at fixpoint when running it again would not
//! change any domain.
//!
//! Each propagator implements the [`Propagator`] trait and is created by a
//! [`PropagatorConstructor`], which registers the domain events the propagator reacts to through
//! the [`PropagatorConstructorContext`]. The solver runs propagators from a priority queue until
//! none of them is enqueued anymore, re-enqueueing those which are subscribed to the changes made
//! along the way. Propagators are not required to be idempotent.
//!
//! Propagators are added to the solver through [`crate::Solver::add_propagator`].
mod constructor;
mod contexts;
mod propagator;
mod propagator_id;
mod store;

pub use constructor::*;
pub use contexts::*;
pub use propagator::*;
pub use propagator_id::*;
pub(crate) use store::PropagatorStore;

pub use crate::engine::domain_events::Change;
pub use crate::engine::domain_events::DomainEvent;
pub use crate::engine::domain_events::DomainEvents;
pub use crate::engine::TrailedInteger;
