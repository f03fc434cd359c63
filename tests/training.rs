use adaptive_gridworld::{
    train_agent, AgentConfig, GridConfig, GridWorld, Movement, Pos, QLearningAgent, StepOutcome,
    Trainer, TrainingConfig,
};

fn grid(keep_obstacles: bool) -> GridWorld {
    GridWorld::new(GridConfig { size: 5, keep_obstacles }).unwrap()
}

fn is_interior(pos: Pos, size: usize) -> bool {
    (1..size - 1).contains(&pos.row) && (1..size - 1).contains(&pos.col)
}

#[test]
fn random_episode_reward_matches_its_length() {
    let mut env = grid(true);
    let mut agent = QLearningAgent::new(AgentConfig {
        exploration_rate: 1.0,
        seed: 21,
        ..AgentConfig::default()
    })
    .unwrap();
    let mut trainer = Trainer::new(TrainingConfig {
        episodes: 1,
        max_steps: None,
        ..TrainingConfig::default()
    })
    .unwrap();

    assert_eq!(env.agent_pos(), Pos::new(4, 0));
    assert_eq!(env.target_pos(), Pos::new(0, 4));

    let outcome = trainer.run_episode(&mut agent, &mut env);
    assert!(outcome.reached_target);
    assert!(outcome.steps >= 8);

    let expected = StepOutcome::REACHED_REWARD
        + StepOutcome::STEP_REWARD * (outcome.steps - 1) as f64;
    assert!(
        (outcome.reward - expected).abs() < 1e-9,
        "reward {} after {} steps",
        outcome.reward,
        outcome.steps
    );
}

#[test]
fn q_values_at_start_converge_to_a_positive_best_action() {
    let mut env = grid(true);
    let mut agent = QLearningAgent::new(AgentConfig { seed: 1, ..AgentConfig::default() }).unwrap();
    let config = TrainingConfig {
        episodes: 1000,
        success_threshold: usize::MAX,
        seed: 2,
        ..TrainingConfig::default()
    };

    let rewards = train_agent(&mut agent, &mut env, config).unwrap();
    assert_eq!(rewards.len(), 1000);
    assert!(env.obstacles().is_empty());

    let start = env.start_pos();
    let best = agent.table().max_value(start);
    assert!(best > 0.0, "start value {}", best);
    assert!(
        best > agent.q_value(start, Movement::Down) || best > agent.q_value(start, Movement::Left),
        "no suboptimal action below the best value {}",
        best
    );

    agent.set_exploration_rate(0.0).unwrap();
    let mut evaluator = Trainer::new(TrainingConfig {
        max_steps: Some(100),
        ..TrainingConfig::default()
    })
    .unwrap();
    let outcome = evaluator.run_episode(&mut agent, &mut env);
    assert!(outcome.reached_target, "greedy rollout stuck after {} steps", outcome.steps);
    assert!(outcome.reward > 0.0);
}

#[test]
fn streaks_grow_interior_obstacles_that_persist() {
    let mut env = grid(true);
    let mut agent = QLearningAgent::new(AgentConfig { seed: 5, ..AgentConfig::default() }).unwrap();
    let config = TrainingConfig { episodes: 300, seed: 6, ..TrainingConfig::default() };

    let rewards = train_agent(&mut agent, &mut env, config).unwrap();
    assert_eq!(rewards.len(), 300);

    let obstacles = env.obstacles();
    assert!(!obstacles.is_empty());
    assert!(obstacles.len() <= 300 / 5);
    for pos in obstacles {
        assert!(is_interior(pos, env.size()), "{} on the border", pos);
    }
}

#[test]
fn wiping_reset_leaves_at_most_the_last_obstacle() {
    let mut env = grid(false);
    let mut agent = QLearningAgent::new(AgentConfig { seed: 5, ..AgentConfig::default() }).unwrap();
    let config = TrainingConfig { episodes: 300, seed: 6, ..TrainingConfig::default() };

    train_agent(&mut agent, &mut env, config).unwrap();
    assert!(env.obstacles().len() <= 1);
    env.reset();
    assert!(env.obstacles().is_empty());
}

#[test]
fn same_seeds_reproduce_the_same_run() {
    let run = || {
        let mut env = grid(true);
        let mut agent =
            QLearningAgent::new(AgentConfig { seed: 42, ..AgentConfig::default() }).unwrap();
        let config = TrainingConfig { episodes: 50, seed: 43, ..TrainingConfig::default() };
        let rewards = train_agent(&mut agent, &mut env, config).unwrap();
        (rewards, env.obstacles())
    };

    assert_eq!(run(), run());
}
