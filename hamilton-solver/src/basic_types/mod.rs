mod configuration_error;
mod cost_matrix;
mod propagation_status;
pub(crate) mod random;
mod solution;
mod trail;

pub use configuration_error::*;
pub use cost_matrix::*;
pub use propagation_status::*;
pub use random::Random;
pub use solution::*;
pub(crate) use trail::*;
