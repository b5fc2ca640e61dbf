//! Structural filtering on the condensation of the envelope into its strongly connected
//! components.
mod reduced_graph_propagator;
mod strongly_connected_components;

pub use reduced_graph_propagator::*;
pub use strongly_connected_components::*;
