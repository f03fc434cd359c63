use std::collections::HashMap;

use ordered_float::OrderedFloat;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::environment::{Movement, Pos};

/// Action-value table keyed by `(state, action)`.
///
/// Pairs that were never written read as `0.0`; entries are only created by
/// [`QTable::set`] and are never removed.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    values: HashMap<(Pos, Movement), f64>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, state: Pos, action: Movement) -> f64 {
        self.values.get(&(state, action)).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, state: Pos, action: Movement, value: f64) {
        self.values.insert((state, action), value);
    }

    pub fn max_value(&self, state: Pos) -> f64 {
        Movement::ALL
            .iter()
            .map(|a| OrderedFloat(self.get(state, *a)))
            .max()
            .map_or(0.0, OrderedFloat::into_inner)
    }

    /// All actions whose value equals the maximum at `state`.
    pub fn best_actions(&self, state: Pos) -> Vec<Movement> {
        let best = self.max_value(state);
        Movement::ALL
            .into_iter()
            .filter(|a| self.get(state, *a) == best)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub trait ExplorationStrategy {
    fn select(&mut self, state: Pos, table: &QTable) -> Movement;
}

/// Random action with probability `epsilon`, greedy action otherwise.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    epsilon: f64,
    rng: Pcg64,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f64, seed: u64) -> Self {
        EpsilonGreedy {
            epsilon,
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }
}

impl ExplorationStrategy for EpsilonGreedy {
    fn select(&mut self, state: Pos, table: &QTable) -> Movement {
        if self.rng.gen::<f64>() < self.epsilon {
            return self.rng.gen::<Movement>();
        }
        max_value_next_action(state, table, &mut self.rng)
    }
}

/// Pure exploitation, still breaking ties at random.
#[derive(Debug, Clone)]
pub struct Greedy {
    rng: Pcg64,
}

impl Greedy {
    pub fn new(seed: u64) -> Self {
        Greedy {
            rng: Pcg64::seed_from_u64(seed),
        }
    }
}

impl ExplorationStrategy for Greedy {
    fn select(&mut self, state: Pos, table: &QTable) -> Movement {
        max_value_next_action(state, table, &mut self.rng)
    }
}

fn max_value_next_action<R: Rng>(state: Pos, table: &QTable, rng: &mut R) -> Movement {
    let best = table.best_actions(state);
    // a NaN maximum matches no action
    let candidates: &[Movement] = if best.is_empty() { &Movement::ALL } else { &best };
    candidates[rng.gen_range(0..candidates.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATE: Pos = Pos::new(2, 2);

    #[test]
    fn unseen_pairs_read_as_zero() {
        let mut table = QTable::new();
        assert_eq!(table.get(STATE, Movement::Left), 0.0);
        assert!(table.is_empty());

        table.set(STATE, Movement::Left, -0.5);
        assert_eq!(table.get(STATE, Movement::Left), -0.5);
        assert_eq!(table.max_value(STATE), 0.0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn best_actions_collects_every_tie() {
        let mut table = QTable::new();
        table.set(STATE, Movement::Up, 0.3);
        table.set(STATE, Movement::Right, 0.3);
        table.set(STATE, Movement::Down, 0.1);

        let mut best = table.best_actions(STATE);
        best.sort_by_key(|m| format!("{:?}", m));
        assert_eq!(best, vec![Movement::Right, Movement::Up]);
        assert_eq!(table.max_value(STATE), 0.3);
    }

    #[test]
    fn zero_epsilon_always_exploits() {
        let mut table = QTable::new();
        table.set(STATE, Movement::Down, 1.0);
        let mut strategy = EpsilonGreedy::new(0.0, 3);
        for _ in 0..100 {
            assert_eq!(strategy.select(STATE, &table), Movement::Down);
        }
    }

    #[test]
    fn full_epsilon_explores_every_action() {
        let mut table = QTable::new();
        table.set(STATE, Movement::Down, 1.0);
        let mut strategy = EpsilonGreedy::new(1.0, 5);
        let mut seen: Vec<Movement> = (0..200).map(|_| strategy.select(STATE, &table)).collect();
        seen.sort_by_key(|m| format!("{:?}", m));
        seen.dedup();
        assert_eq!(seen.len(), 4);
    }
}
