//! Contains the propagators for Hamiltonian structures on graph variables.
//!
//! Each propagator is created from its `...Args` constructor (see
//! [`PropagatorConstructor`](crate::propagation::PropagatorConstructor)); the bundles in
//! [`crate::constraints`] combine them into the usual models.
mod arc_cost;
mod circuit;
mod degree;
mod hamiltonian_shape;
mod lagrangian;
mod reduced_graph;

pub use arc_cost::*;
pub use circuit::*;
pub use degree::*;
pub use hamiltonian_shape::*;
pub use lagrangian::*;
pub use reduced_graph::*;
