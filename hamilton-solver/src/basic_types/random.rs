use std::fmt::Debug;

use rand::Rng;

#[cfg(doc)]
use crate::branching::SelectionContext;
use crate::hamilton_assert_moderate;
#[cfg(doc)]
use crate::options::SolverOptions;

/// The randomness available to the branchers.
///
/// The solver owns a generator seeded from [`SolverOptions::random_seed`] and lends it out through
/// [`SelectionContext::random`]. Two runs on the same model with the same seed make the same
/// decisions.
///
/// # Example
/// ```rust
/// # use rand::rngs::SmallRng;
/// # use rand::SeedableRng;
/// # use hamilton_solver::Random;
/// let mut first = SmallRng::seed_from_u64(7);
/// let mut second = SmallRng::seed_from_u64(7);
///
/// let picks = |rng: &mut SmallRng| (0..5).map(|_| rng.generate_index(10)).collect::<Vec<_>>();
/// assert_eq!(picks(&mut first), picks(&mut second));
/// assert_eq!(first.generate_index(0), None);
/// ```
pub trait Random: Debug {
    /// Lands on `true` with the given probability, which lies in `[0, 1]`.
    ///
    /// The random tie-breaker flips one of these for every node which ties with its current
    /// choice.
    fn generate_bool(&mut self, probability: f64) -> bool;

    /// A uniformly drawn position in a list of `num_candidates` arcs or nodes; `None` when the
    /// list is empty.
    fn generate_index(&mut self, num_candidates: usize) -> Option<usize>;
}

impl<T: Rng + Debug> Random for T {
    fn generate_bool(&mut self, probability: f64) -> bool {
        hamilton_assert_moderate!(
            (0.0..=1.0).contains(&probability),
            "a probability of {probability} lies outside [0, 1]"
        );

        self.gen_bool(probability)
    }

    fn generate_index(&mut self, num_candidates: usize) -> Option<usize> {
        (num_candidates > 0).then(|| self.gen_range(0..num_candidates))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;

    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::Random;

    /// Hands out a fixed script of coin flips and indices.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedRandom {
        pub(crate) coin_flips: VecDeque<bool>,
        pub(crate) indices: VecDeque<usize>,
    }

    impl Random for ScriptedRandom {
        fn generate_bool(&mut self, _probability: f64) -> bool {
            self.coin_flips.pop_front().expect("a scripted coin flip")
        }

        fn generate_index(&mut self, num_candidates: usize) -> Option<usize> {
            let index = self.indices.pop_front().expect("a scripted index");
            (index < num_candidates).then_some(index)
        }
    }

    #[test]
    fn drawn_indices_stay_within_the_candidates() {
        let mut rng = SmallRng::seed_from_u64(3);

        for num_candidates in 1..20 {
            let index = rng.generate_index(num_candidates).expect("a non-empty list");
            assert!(index < num_candidates);
        }
    }

    #[test]
    fn certain_coin_flips_are_not_random() {
        let mut rng = SmallRng::seed_from_u64(11);

        assert!((0..10).all(|_| rng.generate_bool(1.0)));
        assert!((0..10).all(|_| !rng.generate_bool(0.0)));
    }
}
