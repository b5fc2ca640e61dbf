use crate::basic_types::ConfigurationError;

/// The structure the kernel of a graph variable has to form in a solution.
///
/// Every node has to be visited. A circuit closes on itself; a path starts in `source` and ends
/// in `sink`. For directed graphs the path is oriented from the source to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HamiltonianShape {
    Circuit,
    Path { source: usize, sink: usize },
}

impl HamiltonianShape {
    pub(crate) fn validate(&self, num_nodes: usize) -> Result<(), ConfigurationError> {
        match *self {
            HamiltonianShape::Circuit => {
                if num_nodes < 2 {
                    return Err(ConfigurationError::Unsupported(
                        "a circuit needs at least two nodes",
                    ));
                }
            }
            HamiltonianShape::Path { source, sink } => {
                for node in [source, sink] {
                    if node >= num_nodes {
                        return Err(ConfigurationError::NodeOutOfRange { node, num_nodes });
                    }
                }
                if source == sink {
                    return Err(ConfigurationError::SourceEqualsSink { node: source });
                }
            }
        }
        Ok(())
    }

    pub(crate) fn is_path(&self) -> bool {
        matches!(self, HamiltonianShape::Path { .. })
    }

    pub(crate) fn source(&self) -> Option<usize> {
        match *self {
            HamiltonianShape::Circuit => None,
            HamiltonianShape::Path { source, .. } => Some(source),
        }
    }

    pub(crate) fn sink(&self) -> Option<usize> {
        match *self {
            HamiltonianShape::Circuit => None,
            HamiltonianShape::Path { sink, .. } => Some(sink),
        }
    }

    /// The number of kernel successors `node` has in a directed solution.
    pub(crate) fn out_degree(&self, node: usize) -> usize {
        usize::from(self.sink() != Some(node))
    }

    /// The number of kernel predecessors `node` has in a directed solution.
    pub(crate) fn in_degree(&self, node: usize) -> usize {
        usize::from(self.source() != Some(node))
    }

    /// The number of kernel edges incident to `node` in an undirected solution.
    pub(crate) fn degree(&self, node: usize) -> usize {
        match *self {
            HamiltonianShape::Circuit => 2,
            HamiltonianShape::Path { source, sink } if node == source || node == sink => 1,
            HamiltonianShape::Path { .. } => 2,
        }
    }
}
