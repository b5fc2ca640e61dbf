use super::Constraint;
use crate::basic_types::ConfigurationError;
use crate::engine::variables::GraphId;
use crate::propagators::CircuitArgs;
use crate::propagators::DegreeArgs;
use crate::propagators::HamiltonianShape;
use crate::propagators::ReducedGraphArgs;
use crate::Solver;

/// Creates the [`Constraint`] that the kernel of `graph` is a Hamiltonian circuit.
pub fn hamiltonian_circuit(graph: GraphId) -> Hamiltonian {
    hamiltonian(graph, HamiltonianShape::Circuit)
}

/// Creates the [`Constraint`] that the kernel of `graph` is a Hamiltonian path from `source` to
/// `sink`.
pub fn hamiltonian_path(graph: GraphId, source: usize, sink: usize) -> Hamiltonian {
    hamiltonian(graph, HamiltonianShape::Path { source, sink })
}

/// Creates the [`Constraint`] that the kernel of `graph` has the given [`HamiltonianShape`].
pub fn hamiltonian(graph: GraphId, shape: HamiltonianShape) -> Hamiltonian {
    Hamiltonian { graph, shape }
}

/// Posts the degree, no-subtour and reduced-graph propagators, in this order, over one graph.
#[derive(Debug, Clone, Copy)]
pub struct Hamiltonian {
    graph: GraphId,
    shape: HamiltonianShape,
}

impl Constraint for Hamiltonian {
    fn post(self, solver: &mut Solver) -> Result<(), ConfigurationError> {
        let Hamiltonian { graph, shape } = self;

        DegreeArgs { graph, shape }.post(solver)?;
        CircuitArgs { graph, shape }.post(solver)?;
        ReducedGraphArgs { graph, shape }.post(solver)
    }
}
