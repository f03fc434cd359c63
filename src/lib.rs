//! Grid-world sandbox for tabular Q-learning.
//!
//! A single agent walks from the bottom-left corner of a square grid to a
//! target in the top-right corner. A [`rl::Trainer`] drives a
//! [`agent::QLearningAgent`] through repeated episodes and drops an obstacle
//! on a random interior cell each time the agent chains enough successes.

pub mod agent;
pub mod environment;
pub mod error;
pub mod policy;
pub mod report;
pub mod rl;

pub use agent::{AgentConfig, QLearningAgent};
pub use environment::{Cell, GridConfig, GridWorld, Movement, Pos, StepOutcome};
pub use error::{Error, Result};
pub use policy::{EpsilonGreedy, ExplorationStrategy, Greedy, QTable};
pub use rl::{train_agent, EpisodeOutcome, SuccessCriterion, Trainer, TrainingConfig};
