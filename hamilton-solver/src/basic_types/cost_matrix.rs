use super::ConfigurationError;

/// A dense `n x n` matrix of arc costs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    num_nodes: usize,
    costs: Vec<i64>,
}

impl CostMatrix {
    /// Creates a cost matrix from its rows; every row needs exactly one entry per node.
    ///
    /// # Example
    /// ```rust
    /// # use hamilton_solver::CostMatrix;
    /// let costs = CostMatrix::new(vec![vec![0, 3], vec![4, 0]]).unwrap();
    /// assert_eq!(costs.cost(1, 0), 4);
    ///
    /// assert!(CostMatrix::new(vec![vec![0, 3, 1], vec![4, 0, 1]]).is_err());
    /// ```
    pub fn new(rows: Vec<Vec<i64>>) -> Result<CostMatrix, ConfigurationError> {
        let num_nodes = rows.len();
        let mut costs = Vec::with_capacity(num_nodes * num_nodes);

        for row in rows {
            if row.len() != num_nodes {
                return Err(ConfigurationError::CostMatrixDimension {
                    expected: num_nodes,
                    rows: num_nodes,
                    columns: row.len(),
                });
            }
            costs.extend(row);
        }

        Ok(CostMatrix { num_nodes, costs })
    }

    /// Creates a cost matrix by evaluating `cost(from, to)` for every pair of nodes.
    pub fn from_fn(num_nodes: usize, mut cost: impl FnMut(usize, usize) -> i64) -> CostMatrix {
        let costs = (0..num_nodes)
            .flat_map(|from| (0..num_nodes).map(move |to| (from, to)))
            .map(|(from, to)| cost(from, to))
            .collect();

        CostMatrix { num_nodes, costs }
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn cost(&self, from: usize, to: usize) -> i64 {
        self.costs[from * self.num_nodes + to]
    }

    pub(crate) fn check_dimension(&self, num_nodes: usize) -> Result<(), ConfigurationError> {
        if self.num_nodes != num_nodes {
            return Err(ConfigurationError::CostMatrixDimension {
                expected: num_nodes,
                rows: self.num_nodes,
                columns: self.num_nodes,
            });
        }
        Ok(())
    }

    pub(crate) fn check_symmetric(&self) -> Result<(), ConfigurationError> {
        for from in 0..self.num_nodes {
            for to in from + 1..self.num_nodes {
                if self.cost(from, to) != self.cost(to, from) {
                    return Err(ConfigurationError::AsymmetricCosts { from, to });
                }
            }
        }
        Ok(())
    }
}
