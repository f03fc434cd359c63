use std::io;

use adaptive_gridworld::{
    report, AgentConfig, GridConfig, GridWorld, QLearningAgent, Trainer, TrainingConfig,
};
use tracing_subscriber::EnvFilter;

fn main() -> adaptive_gridworld::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let mut env = GridWorld::new(GridConfig::default())?;
    let mut agent = QLearningAgent::new(AgentConfig::default())?;
    let mut trainer = Trainer::new(TrainingConfig::default())?;

    tracing::info!(size = env.size(), episodes = trainer.config().episodes, "training started");
    let rewards = trainer.train(&mut agent, &mut env)?;

    let start = env.start_pos();
    tracing::info!(
        %start,
        best_value = agent.table().max_value(start),
        best_moves = ?agent.table().best_actions(start),
        "learned values"
    );

    env.reset();
    eprint!("{}", env);

    report::write_rewards(io::stdout().lock(), &rewards)
}
