mod graph_domain;
mod integer_domain;
mod reversible_sparse_set;

pub(crate) use graph_domain::*;
pub(crate) use integer_domain::*;
pub(crate) use reversible_sparse_set::*;
