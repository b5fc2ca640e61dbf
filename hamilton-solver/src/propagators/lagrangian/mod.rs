//! Lagrangian relaxation of the degree constraints of a Hamiltonian structure (the Held-Karp
//! bound), which tightens the objective and removes arcs with a too large marginal cost.
mod cut_generator;
mod held_karp;
mod options;
mod spanning_tree;

pub use cut_generator::*;
pub use held_karp::*;
pub use options::*;
