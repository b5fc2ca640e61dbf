use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::engine::variables::Arc;

/// An envelope arc with its Lagrangian weight.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WeightedArc {
    pub(crate) arc: Arc,
    pub(crate) weight: f64,
    /// Kernel arcs are selected before all others.
    pub(crate) mandatory: bool,
}

impl WeightedArc {
    /// Mandatory arcs first, then by increasing weight.
    pub(crate) fn preference(&self, other: &WeightedArc) -> Ordering {
        other
            .mandatory
            .cmp(&self.mandatory)
            .then(self.weight.total_cmp(&other.weight))
    }
}

/// Disjoint sets with path halving and union by rank.
#[derive(Debug, Clone)]
pub(crate) struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub(crate) fn new(num_elements: usize) -> UnionFind {
        UnionFind {
            parent: (0..num_elements).collect(),
            rank: vec![0; num_elements],
        }
    }

    pub(crate) fn find(&mut self, mut element: usize) -> usize {
        while self.parent[element] != element {
            self.parent[element] = self.parent[self.parent[element]];
            element = self.parent[element];
        }
        element
    }

    /// Merges the sets of both elements; returns `false` if they already were in the same set.
    pub(crate) fn union(&mut self, first: usize, second: usize) -> bool {
        let (first, second) = (self.find(first), self.find(second));
        if first == second {
            return false;
        }
        match self.rank[first].cmp(&self.rank[second]) {
            Ordering::Less => self.parent[first] = second,
            Ordering::Greater => self.parent[second] = first,
            Ordering::Equal => {
                self.parent[second] = first;
                self.rank[first] += 1;
            }
        }
        true
    }
}

/// Kruskal's algorithm over the candidates for which `eligible` holds; returns the indices of
/// the selected candidates. Mandatory candidates are considered first.
pub(crate) fn kruskal(
    num_nodes: usize,
    candidates: &[WeightedArc],
    eligible: impl Fn(usize) -> bool,
) -> Vec<usize> {
    let mut order = (0..candidates.len())
        .filter(|&index| eligible(index))
        .collect::<Vec<_>>();
    order.sort_by(|&first, &second| candidates[first].preference(&candidates[second]));

    let mut union_find = UnionFind::new(num_nodes);
    order
        .into_iter()
        .filter(|&index| {
            let arc = candidates[index].arc;
            union_find.union(arc.from, arc.to)
        })
        .collect()
}

/// A forest with parent pointers, answering which tree arcs lie on the path between two nodes.
#[derive(Debug, Clone)]
pub(crate) struct RootedForest {
    /// The parent of every node and the index of the tree arc connecting them.
    parent: Vec<Option<(usize, usize)>>,
    depth: Vec<usize>,
}

impl RootedForest {
    /// Roots every tree of the forest spanned by `tree_arcs`, given as `(index, arc)`, in its
    /// smallest node.
    pub(crate) fn new(
        num_nodes: usize,
        tree_arcs: impl IntoIterator<Item = (usize, Arc)>,
    ) -> RootedForest {
        let mut neighbours = vec![vec![]; num_nodes];
        for (index, arc) in tree_arcs {
            neighbours[arc.from].push((arc.to, index));
            neighbours[arc.to].push((arc.from, index));
        }

        let mut parent = vec![None; num_nodes];
        let mut depth = vec![0; num_nodes];
        let mut visited = vec![false; num_nodes];
        let mut queue = VecDeque::new();

        for root in 0..num_nodes {
            if visited[root] {
                continue;
            }
            visited[root] = true;
            queue.push_back(root);
            while let Some(node) = queue.pop_front() {
                for &(neighbour, index) in &neighbours[node] {
                    if !visited[neighbour] {
                        visited[neighbour] = true;
                        parent[neighbour] = Some((node, index));
                        depth[neighbour] = depth[node] + 1;
                        queue.push_back(neighbour);
                    }
                }
            }
        }

        RootedForest { parent, depth }
    }

    /// The indices of the tree arcs on the path between `first` and `second`, or `None` when
    /// they are in different trees.
    pub(crate) fn path(&self, mut first: usize, mut second: usize) -> Option<Vec<usize>> {
        let mut path = vec![];
        while first != second {
            let deeper = if self.depth[first] >= self.depth[second] {
                &mut first
            } else {
                &mut second
            };
            let (parent, index) = self.parent[*deeper]?;
            path.push(index);
            *deeper = parent;
        }
        Some(path)
    }
}
