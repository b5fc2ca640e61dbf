use std::fmt::Display;

use convert_case::Case;
use convert_case::Casing;
use itertools::Itertools;

use super::statistic_logging::log_statistic;
#[cfg(doc)]
use crate::branching::Brancher;
#[cfg(doc)]
use crate::propagation::Propagator;

/// Names the statistics of one component of the solver.
///
/// Every line starts with the name of the component, e.g. `held_karp_3_num_rounds` for the
/// counter `num_rounds` of the Held-Karp propagator with id 3.
#[derive(Debug, Default, Clone)]
pub struct StatisticLogger {
    name_prefix: String,
}

impl StatisticLogger {
    /// Joins the parts of the prefix with underscores.
    pub fn new<Input: IntoIterator<Item = impl Display>>(name_prefix: Input) -> Self {
        StatisticLogger {
            name_prefix: name_prefix.into_iter().join("_"),
        }
    }

    /// The prefix of a [`Propagator`]: its name in snake case followed by its id, so that two
    /// instances of the same propagator stay apart.
    pub fn for_propagator(name: &str, propagator_index: usize) -> Self {
        StatisticLogger::new([name.to_case(Case::Snake), propagator_index.to_string()])
    }

    /// The prefix of the [`Brancher`] of a search.
    pub fn for_brancher() -> Self {
        StatisticLogger::new(["brancher"])
    }

    /// A logger for one statistic of this component.
    pub fn attach_to_prefix(&self, addition_to_prefix: impl Display) -> Self {
        StatisticLogger {
            name_prefix: format!("{}_{addition_to_prefix}", self.name_prefix),
        }
    }

    pub fn log_statistic(&self, value: impl Display) {
        log_statistic(&self.name_prefix, value);
    }
}
