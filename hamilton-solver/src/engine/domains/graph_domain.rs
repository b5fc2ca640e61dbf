use super::ReversibleSparseSet;
use crate::engine::variables::Arc;
use crate::engine::variables::GraphKind;
use crate::engine::EmptyDomain;
use crate::engine::TrailedInteger;
use crate::engine::TrailedValues;
use crate::hamilton_assert_moderate;

/// The domain of a graph variable: an envelope of arcs which may still be selected and a kernel
/// of arcs which have to be selected, together with the same split for the nodes.
///
/// Adjacency is stored per node as [`ReversibleSparseSet`]s, which gives O(1) membership tests,
/// O(1) updates and iteration proportional to the degree. For undirected graphs only the
/// successor sets are used and they hold the neighbours of a node.
///
/// It always holds that the kernel is contained in the envelope. Removing a kernel arc (or node)
/// from the envelope, or enforcing an arc (or node) which is not in the envelope, wipes out the
/// domain.
#[derive(Debug, Clone)]
pub(crate) struct GraphDomain {
    kind: GraphKind,
    num_nodes: usize,
    envelope_nodes: ReversibleSparseSet,
    kernel_nodes: ReversibleSparseSet,
    envelope_successors: Vec<ReversibleSparseSet>,
    kernel_successors: Vec<ReversibleSparseSet>,
    envelope_predecessors: Vec<ReversibleSparseSet>,
    kernel_predecessors: Vec<ReversibleSparseSet>,
    num_envelope_arcs: TrailedInteger,
    num_kernel_arcs: TrailedInteger,
}

impl GraphDomain {
    /// Creates a graph whose envelope contains every node but no arcs, with an empty kernel.
    pub(crate) fn new(
        num_nodes: usize,
        kind: GraphKind,
        trailed_values: &mut TrailedValues,
    ) -> GraphDomain {
        let mut create_sets = |count: usize| {
            (0..count)
                .map(|_| ReversibleSparseSet::new(num_nodes, trailed_values))
                .collect::<Vec<_>>()
        };

        let mut envelope_nodes = create_sets(1).remove(0);
        let kernel_nodes = create_sets(1).remove(0);
        let envelope_successors = create_sets(num_nodes);
        let kernel_successors = create_sets(num_nodes);
        let num_predecessor_sets = match kind {
            GraphKind::Directed => num_nodes,
            GraphKind::Undirected => 0,
        };
        let envelope_predecessors = create_sets(num_predecessor_sets);
        let kernel_predecessors = create_sets(num_predecessor_sets);

        for node in 0..num_nodes {
            let _ = envelope_nodes.insert(node, trailed_values);
        }

        GraphDomain {
            kind,
            num_nodes,
            envelope_nodes,
            kernel_nodes,
            envelope_successors,
            kernel_successors,
            envelope_predecessors,
            kernel_predecessors,
            num_envelope_arcs: trailed_values.grow(0),
            num_kernel_arcs: trailed_values.grow(0),
        }
    }

    pub(crate) fn kind(&self) -> GraphKind {
        self.kind
    }

    pub(crate) fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub(crate) fn is_node_in_envelope(&self, node: usize, trailed_values: &TrailedValues) -> bool {
        self.envelope_nodes.contains(node, trailed_values)
    }

    pub(crate) fn is_node_in_kernel(&self, node: usize, trailed_values: &TrailedValues) -> bool {
        self.kernel_nodes.contains(node, trailed_values)
    }

    pub(crate) fn is_arc_in_envelope(&self, arc: Arc, trailed_values: &TrailedValues) -> bool {
        self.envelope_successors[arc.from].contains(arc.to, trailed_values)
    }

    pub(crate) fn is_arc_in_kernel(&self, arc: Arc, trailed_values: &TrailedValues) -> bool {
        self.kernel_successors[arc.from].contains(arc.to, trailed_values)
    }

    pub(crate) fn envelope_nodes(&self) -> &ReversibleSparseSet {
        &self.envelope_nodes
    }

    pub(crate) fn kernel_nodes(&self) -> &ReversibleSparseSet {
        &self.kernel_nodes
    }

    pub(crate) fn envelope_successors(&self, node: usize) -> &ReversibleSparseSet {
        &self.envelope_successors[node]
    }

    pub(crate) fn kernel_successors(&self, node: usize) -> &ReversibleSparseSet {
        &self.kernel_successors[node]
    }

    pub(crate) fn envelope_predecessors(&self, node: usize) -> &ReversibleSparseSet {
        match self.kind {
            GraphKind::Directed => &self.envelope_predecessors[node],
            GraphKind::Undirected => &self.envelope_successors[node],
        }
    }

    pub(crate) fn kernel_predecessors(&self, node: usize) -> &ReversibleSparseSet {
        match self.kind {
            GraphKind::Directed => &self.kernel_predecessors[node],
            GraphKind::Undirected => &self.kernel_successors[node],
        }
    }

    pub(crate) fn num_envelope_arcs(&self, trailed_values: &TrailedValues) -> usize {
        trailed_values.read(self.num_envelope_arcs) as usize
    }

    pub(crate) fn num_kernel_arcs(&self, trailed_values: &TrailedValues) -> usize {
        trailed_values.read(self.num_kernel_arcs) as usize
    }

    /// A graph is instantiated when its envelope and kernel coincide, both for nodes and arcs.
    pub(crate) fn is_instantiated(&self, trailed_values: &TrailedValues) -> bool {
        self.num_envelope_arcs(trailed_values) == self.num_kernel_arcs(trailed_values)
            && self.envelope_nodes.len(trailed_values) == self.kernel_nodes.len(trailed_values)
    }

    /// Adds an arc to the envelope; only used while the model is built.
    pub(crate) fn add_arc_to_envelope(
        &mut self,
        arc: Arc,
        trailed_values: &mut TrailedValues,
    ) -> bool {
        hamilton_assert_moderate!(trailed_values.get_checkpoint() == 0);

        if !self.is_node_in_envelope(arc.from, trailed_values)
            || !self.is_node_in_envelope(arc.to, trailed_values)
        {
            return false;
        }

        let inserted = self.envelope_successors[arc.from].insert(arc.to, trailed_values);
        if inserted {
            match self.kind {
                GraphKind::Directed => {
                    let _ = self.envelope_predecessors[arc.to].insert(arc.from, trailed_values);
                }
                GraphKind::Undirected => {
                    let _ = self.envelope_successors[arc.to].insert(arc.from, trailed_values);
                }
            }
            trailed_values.add_assign(self.num_envelope_arcs, 1);
        }
        inserted
    }

    /// Removes an arc from the envelope. Returns whether the domain changed.
    pub(crate) fn remove_arc(
        &mut self,
        arc: Arc,
        trailed_values: &mut TrailedValues,
    ) -> Result<bool, EmptyDomain> {
        if self.is_arc_in_kernel(arc, trailed_values) {
            return Err(EmptyDomain);
        }

        let removed = self.envelope_successors[arc.from].remove(arc.to, trailed_values);
        if removed {
            match self.kind {
                GraphKind::Directed => {
                    let _ = self.envelope_predecessors[arc.to].remove(arc.from, trailed_values);
                }
                GraphKind::Undirected => {
                    let _ = self.envelope_successors[arc.to].remove(arc.from, trailed_values);
                }
            }
            trailed_values.add_assign(self.num_envelope_arcs, -1);
        }
        Ok(removed)
    }

    /// Moves an arc of the envelope into the kernel. Returns whether the domain changed.
    ///
    /// The endpoints of the arc are not enforced by this method.
    pub(crate) fn enforce_arc(
        &mut self,
        arc: Arc,
        trailed_values: &mut TrailedValues,
    ) -> Result<bool, EmptyDomain> {
        if !self.is_arc_in_envelope(arc, trailed_values) {
            return Err(EmptyDomain);
        }

        let inserted = self.kernel_successors[arc.from].insert(arc.to, trailed_values);
        if inserted {
            match self.kind {
                GraphKind::Directed => {
                    let _ = self.kernel_predecessors[arc.to].insert(arc.from, trailed_values);
                }
                GraphKind::Undirected => {
                    let _ = self.kernel_successors[arc.to].insert(arc.from, trailed_values);
                }
            }
            trailed_values.add_assign(self.num_kernel_arcs, 1);
        }
        Ok(inserted)
    }

    /// Makes a node mandatory. Returns whether the domain changed.
    pub(crate) fn enforce_node(
        &mut self,
        node: usize,
        trailed_values: &mut TrailedValues,
    ) -> Result<bool, EmptyDomain> {
        if !self.is_node_in_envelope(node, trailed_values) {
            return Err(EmptyDomain);
        }
        Ok(self.kernel_nodes.insert(node, trailed_values))
    }
}
