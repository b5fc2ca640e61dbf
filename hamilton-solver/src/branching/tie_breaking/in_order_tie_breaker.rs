use super::Direction;
use super::TieBreaker;

/// Keeps the earliest candidate with the best score.
///
/// The min-domain brancher offers the nodes in increasing order, scored by their number of
/// undecided arcs, so ties go to the smallest node and the search stays deterministic.
#[derive(Debug, Clone)]
pub struct InOrderTieBreaker<Var, Value> {
    best: Option<(Var, Value)>,
    direction: Direction,
}

impl<Var, Value> InOrderTieBreaker<Var, Value> {
    pub fn new(direction: Direction) -> Self {
        InOrderTieBreaker {
            best: None,
            direction,
        }
    }
}

impl<Var: Copy, Value: PartialOrd> TieBreaker<Var, Value> for InOrderTieBreaker<Var, Value> {
    fn consider(&mut self, variable: Var, value: Value) {
        // Equal scores never replace the earlier candidate.
        let is_new_best = match &self.best {
            Some((_, best)) => self.direction.improves(&value, best),
            None => true,
        };
        if is_new_best {
            self.best = Some((variable, value));
        }
    }

    fn select(&mut self) -> Option<Var> {
        let (variable, _) = self.best.take()?;
        Some(variable)
    }

    fn get_direction(&self) -> Direction {
        self.direction
    }
}
