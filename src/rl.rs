use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::agent::QLearningAgent;
use crate::environment::{GridWorld, Pos};
use crate::error::{Error, Result};
use crate::policy::ExplorationStrategy;

/// Decides whether an episode extends the success streak.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SuccessCriterion {
    /// Total episode reward is strictly positive. A very long path to the
    /// target can still count as a failure.
    #[default]
    PositiveReward,
    /// The agent stepped onto the target, whatever the reward.
    ReachedTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub episodes: usize,
    /// Consecutive successes needed before an obstacle is added.
    pub success_threshold: usize,
    /// Per-episode step cap; `None` runs until the target is reached.
    pub max_steps: Option<usize>,
    pub success: SuccessCriterion,
    /// Seed of the obstacle placement RNG.
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            success_threshold: 5,
            max_steps: Some(10_000),
            success: SuccessCriterion::PositiveReward,
            seed: 0,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.success_threshold == 0 {
            return Err(Error::InvalidParameter {
                name: "success_threshold",
                reason: "must be at least 1".to_owned(),
            });
        }
        if self.max_steps == Some(0) {
            return Err(Error::InvalidParameter {
                name: "max_steps",
                reason: "must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeOutcome {
    pub reward: f64,
    pub steps: usize,
    pub reached_target: bool,
    /// Obstacle placed after this episode, if the streak triggered one.
    pub obstacle: Option<Pos>,
}

/// Runs episodes and grows the obstacle layout as the agent keeps
/// succeeding.
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainingConfig,
    streak: usize,
    rng: Pcg64,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        let rng = Pcg64::seed_from_u64(config.seed);
        Ok(Self {
            config,
            streak: 0,
            rng,
        })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Current number of consecutive successful episodes.
    pub fn streak(&self) -> usize {
        self.streak
    }

    /// Trains for `config.episodes` episodes and returns the total reward of
    /// each one, in order.
    pub fn train<S: ExplorationStrategy>(
        &mut self,
        agent: &mut QLearningAgent<S>,
        env: &mut GridWorld,
    ) -> Result<Vec<f64>> {
        let mut total_rewards = Vec::with_capacity(self.config.episodes);
        let mut reached = 0;

        for episode in 0..self.config.episodes {
            let mut outcome = self.run_episode(agent, env);
            outcome.obstacle = self.record(&outcome, env)?;
            tracing::trace!(
                episode,
                reward = outcome.reward,
                steps = outcome.steps,
                reached = outcome.reached_target,
                "episode finished"
            );
            if outcome.reached_target {
                reached += 1;
            }
            total_rewards.push(outcome.reward);
        }

        tracing::info!(
            episodes = self.config.episodes,
            reached,
            obstacles = env.obstacles().len(),
            "training finished"
        );
        Ok(total_rewards)
    }

    /// Plays one episode from a fresh reset, updating the agent after every
    /// step. Does not touch the success streak.
    pub fn run_episode<S: ExplorationStrategy>(
        &mut self,
        agent: &mut QLearningAgent<S>,
        env: &mut GridWorld,
    ) -> EpisodeOutcome {
        env.reset();
        let mut state = agent.get_state(env);
        let mut reward = 0.0;
        let mut steps = 0;

        while !env.is_finished() && self.config.max_steps.map_or(true, |cap| steps < cap) {
            let action = agent.choose_action(state);
            let r = env.move_agent(action);
            let next_state = agent.get_state(env);
            agent.learn(state, action, r, next_state);
            reward += r;
            steps += 1;
            state = next_state;
        }

        if !env.is_finished() {
            tracing::debug!(steps, "episode hit the step cap");
        }

        EpisodeOutcome {
            reward,
            steps,
            reached_target: env.is_finished(),
            obstacle: None,
        }
    }

    /// Updates the streak with a finished episode. Once the streak reaches
    /// the threshold it is reset and an obstacle is tried at a random
    /// interior cell; the cell is returned when it was actually placed.
    pub fn record(&mut self, outcome: &EpisodeOutcome, env: &mut GridWorld) -> Result<Option<Pos>> {
        let success = match self.config.success {
            SuccessCriterion::PositiveReward => outcome.reward > 0.0,
            SuccessCriterion::ReachedTarget => outcome.reached_target,
        };
        if !success {
            self.streak = 0;
            return Ok(None);
        }

        self.streak += 1;
        if self.streak < self.config.success_threshold {
            return Ok(None);
        }
        self.streak = 0;

        let Some(pos) = self.sample_interior(env.size()) else {
            tracing::debug!(size = env.size(), "grid has no interior cell, skipping obstacle");
            return Ok(None);
        };
        if env.add_obstacle(pos)? {
            Ok(Some(pos))
        } else {
            tracing::debug!(%pos, "obstacle cell already occupied");
            Ok(None)
        }
    }

    /// Uniform cell off the outer border ring, if the grid has one.
    fn sample_interior(&mut self, size: usize) -> Option<Pos> {
        if size < 3 {
            return None;
        }
        let row = self.rng.gen_range(1..size - 1);
        let col = self.rng.gen_range(1..size - 1);
        Some(Pos::new(row, col))
    }
}

/// Convenience wrapper around [`Trainer::train`].
pub fn train_agent<S: ExplorationStrategy>(
    agent: &mut QLearningAgent<S>,
    env: &mut GridWorld,
    config: TrainingConfig,
) -> Result<Vec<f64>> {
    Trainer::new(config)?.train(agent, env)
}
