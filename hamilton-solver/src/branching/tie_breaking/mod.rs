//! Tie breakers decide between elements which are equally good according to a branching
//! heuristic.
mod in_order_tie_breaker;
mod random_tie_breaker;

pub use in_order_tie_breaker::*;
pub use random_tie_breaker::*;

/// The interface for a tie-breaker which considers elements with values; depending on the
/// [`Direction`] it only considers elements with the "best" value for selection.
pub trait TieBreaker<Var, Value> {
    /// Consider the next element with its value.
    fn consider(&mut self, variable: Var, value: Value);

    /// Get the selected element and reset the tie-breaker, such that it never returns an element
    /// whose value is out-of-date.
    fn select(&mut self) -> Option<Var>;

    /// Returns whether the tie-breaker is attempting to find the minimum ([`Direction::Minimum`])
    /// or maximum ([`Direction::Maximum`]) element.
    fn get_direction(&self) -> Direction;
}

/// Whether the tie-breaker looks for the element with the maximum or the minimum value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Maximum,
    Minimum,
}

impl Direction {
    /// Whether `value` is strictly better than `current` in this direction.
    pub(crate) fn improves<Value: PartialOrd>(self, value: &Value, current: &Value) -> bool {
        match self {
            Direction::Maximum => value > current,
            Direction::Minimum => value < current,
        }
    }
}
