use super::Direction;
use super::TieBreaker;
use crate::basic_types::Random;

/// A tie breaker which selects an element with the "best" value (according to the
/// [`Direction`]); among tied elements every one is selected with equal probability.
///
/// A newly considered element with a value equal to the selected one replaces it with
/// probability `1 / k`, where `k` is the number of elements seen with that value.
pub struct RandomTieBreaker<Var, Value> {
    selected: Option<(Var, Value)>,
    num_tied: usize,
    rng: Box<dyn Random>,
    direction: Direction,
}

impl<Var, Value> std::fmt::Debug for RandomTieBreaker<Var, Value> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomTieBreaker")
            .field("num_tied", &self.num_tied)
            .field("direction", &self.direction)
            .finish()
    }
}

impl<Var, Value> RandomTieBreaker<Var, Value> {
    pub fn new(direction: Direction, rng: Box<dyn Random>) -> Self {
        Self {
            selected: None,
            num_tied: 0,
            rng,
            direction,
        }
    }
}

impl<Var: Copy, Value: PartialOrd> TieBreaker<Var, Value> for RandomTieBreaker<Var, Value> {
    fn consider(&mut self, variable: Var, value: Value) {
        let (is_better, is_tied) = match &self.selected {
            Some((_, selected_value)) => (
                self.direction.improves(&value, selected_value),
                value == *selected_value,
            ),
            None => (true, false),
        };

        if is_better {
            self.selected = Some((variable, value));
            self.num_tied = 1;
        } else if is_tied {
            self.num_tied += 1;
            if self.rng.generate_bool(1.0 / self.num_tied as f64) {
                self.selected = Some((variable, value));
            }
        }
    }

    fn select(&mut self) -> Option<Var> {
        self.num_tied = 0;
        self.selected.take().map(|(variable, _)| variable)
    }

    fn get_direction(&self) -> Direction {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::random::tests::ScriptedRandom;

    #[test]
    fn a_strictly_better_value_always_wins() {
        let mut breaker = RandomTieBreaker::new(
            Direction::Minimum,
            Box::new(ScriptedRandom::default()),
        );

        breaker.consider(0, 8);
        breaker.consider(1, 2);
        breaker.consider(2, 5);

        assert_eq!(breaker.select(), Some(1));
    }

    #[test]
    fn ties_are_resolved_by_the_generator() {
        let mut breaker = RandomTieBreaker::new(
            Direction::Maximum,
            Box::new(ScriptedRandom {
                coin_flips: [true, false].into(),
                ..ScriptedRandom::default()
            }),
        );

        breaker.consider(0, 4);
        breaker.consider(1, 4);
        breaker.consider(2, 4);

        assert_eq!(breaker.select(), Some(1));
    }
}
