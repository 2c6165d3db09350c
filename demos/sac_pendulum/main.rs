use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
use once_cell::sync::Lazy;
use sac_rl::{algo::sac::SACAgentConfig, gym::Pendulum};

type SACBackend = Autodiff<NdArray>;

static DEVICE: Lazy<NdArrayDevice> = Lazy::new(NdArrayDevice::default);

const MAX_STEPS_PER_EPISODE: usize = 200;
const EVAL_EPISODES: usize = 10;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut env = Pendulum::new(MAX_STEPS_PER_EPISODE);

    // Reference hyperparameters: γ = 0.98, τ = 0.01, α = 0.05, batch 32,
    // 20 rounds after every episode once 1000 transitions are stored
    let config = SACAgentConfig::default();
    let mut agent = config.init::<SACBackend>(&*DEVICE)?;

    log::info!("Starting SAC training on Pendulum...");
    log::info!("  - Episodes: {}", config.num_episodes);
    log::info!("  - Memory capacity: {}", config.memory_capacity);
    log::info!("  - Batch size: {}", config.batch_size);

    agent.go(&mut env)?;

    let mean_return = agent.evaluate(&mut env, EVAL_EPISODES);
    log::info!(
        "Training complete! Deterministic return over {} episodes: {:.1}",
        EVAL_EPISODES,
        mean_return
    );

    Ok(())
}
