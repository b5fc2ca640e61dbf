//! A [`TerminationCondition`] is polled by the search before every decision. It can stop the
//! search before it has proven optimality or infeasibility, in which case the best solution
//! found so far (if any) is reported.
mod budgets;
mod combinator;

pub use budgets::*;
pub use combinator::*;

/// Determines when the search should give up.
pub trait TerminationCondition {
    /// Returns `true` when the search should stop.
    fn should_stop(&mut self) -> bool;

    /// Called every time the search branches, i.e. opens a new node of the search tree.
    fn decision_has_been_made(&mut self) {}
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        match self {
            Some(condition) => condition.should_stop(),
            None => false,
        }
    }

    fn decision_has_been_made(&mut self) {
        if let Some(condition) = self {
            condition.decision_has_been_made()
        }
    }
}

impl<T: TerminationCondition + ?Sized> TerminationCondition for &mut T {
    fn should_stop(&mut self) -> bool {
        (**self).should_stop()
    }

    fn decision_has_been_made(&mut self) {
        (**self).decision_has_been_made()
    }
}
