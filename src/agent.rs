use crate::environment::{GridWorld, Movement, Pos};
use crate::error::{Error, Result};
use crate::policy::{EpsilonGreedy, ExplorationStrategy, QTable};

#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub exploration_rate: f64,
    /// Seed of the exploration RNG.
    pub seed: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            exploration_rate: 0.3,
            seed: 0,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        check_unit("learning_rate", self.learning_rate)?;
        check_unit("discount_factor", self.discount_factor)?;
        check_unit("exploration_rate", self.exploration_rate)
    }
}

fn check_unit(name: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::InvalidParameter {
            name,
            reason: format!("{} is not in [0, 1]", value),
        });
    }
    Ok(())
}

/// Tabular one-step Q-learner.
///
/// The state is the agent coordinate alone, so two visits to the same cell
/// share their values whatever the obstacle layout looks like.
#[derive(Debug, Clone)]
pub struct QLearningAgent<S = EpsilonGreedy> {
    table: QTable,
    learning_rate: f64,
    discount_factor: f64,
    strategy: S,
}

impl QLearningAgent<EpsilonGreedy> {
    pub fn new(config: AgentConfig) -> Result<Self> {
        config.validate()?;
        Self::with_strategy(
            &config,
            EpsilonGreedy::new(config.exploration_rate, config.seed),
        )
    }

    pub fn exploration_rate(&self) -> f64 {
        self.strategy.epsilon()
    }

    /// Meant for evaluating a trained agent, e.g. with `0.0` for a purely
    /// greedy rollout.
    pub fn set_exploration_rate(&mut self, exploration_rate: f64) -> Result<()> {
        check_unit("exploration_rate", exploration_rate)?;
        self.strategy.set_epsilon(exploration_rate);
        Ok(())
    }
}

impl<S: ExplorationStrategy> QLearningAgent<S> {
    /// Builds an agent around a custom strategy; `exploration_rate` and
    /// `seed` in `config` are ignored.
    pub fn with_strategy(config: &AgentConfig, strategy: S) -> Result<Self> {
        check_unit("learning_rate", config.learning_rate)?;
        check_unit("discount_factor", config.discount_factor)?;
        Ok(Self {
            table: QTable::new(),
            learning_rate: config.learning_rate,
            discount_factor: config.discount_factor,
            strategy,
        })
    }

    pub fn get_state(&self, env: &GridWorld) -> Pos {
        env.agent_pos()
    }

    pub fn choose_action(&mut self, state: Pos) -> Movement {
        self.strategy.select(state, &self.table)
    }

    /// Q(s,a) <- Q(s,a) + lr * (r + gamma * max_a' Q(s',a') - Q(s,a))
    pub fn learn(&mut self, state: Pos, action: Movement, reward: f64, next_state: Pos) {
        let current = self.table.get(state, action);
        let t_d = reward + self.discount_factor * self.table.max_value(next_state) - current;
        self.table.set(state, action, current + self.learning_rate * t_d);
    }

    pub fn q_value(&self, state: Pos, action: Movement) -> f64 {
        self.table.get(state, action)
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }
}
