//! The branchers over graph variables which ship with the solver.
mod lexicographic;
mod min_domain;
mod reduced_cost;

pub use lexicographic::*;
pub use min_domain::*;
pub use reduced_cost::*;

use crate::engine::variables::Arc;
use crate::engine::GraphView;

/// The arcs leaving `node` which are in the envelope but not in the kernel.
fn optional_arcs<'a>(graph: GraphView<'a>, node: usize) -> impl Iterator<Item = Arc> + 'a {
    graph
        .envelope_successors(node)
        .filter(move |&successor| !graph.is_arc_in_kernel(node, successor))
        .map(move |successor| Arc::new(node, successor))
}
