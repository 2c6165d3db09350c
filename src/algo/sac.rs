//! Soft Actor-Critic (SAC)
//!
//! SAC is an off-policy actor-critic algorithm for continuous action spaces
//! based on the maximum entropy framework: the policy maximizes expected return
//! plus an entropy bonus.
//!
//! # Algorithm Overview
//!
//! The agent maintains:
//! - **Policy network**: a tanh-squashed Gaussian sampled with the
//!   reparameterization trick
//! - **Two critic networks**: Q₁(s,a) and Q₂(s,a), trained independently
//! - **Two target critics**: Polyak-averaged copies used for bootstrapping
//!
//! Each optimization round samples one batch and then:
//! 1. computes `y = r + γ · mask · (min(Q₁′, Q₂′)(s′, a′) − α · log π)` with
//!    `a′ ~ π(s′)` and no gradient flowing anywhere
//! 2. regresses Q₁ and Q₂ onto `y` with a Huber loss
//! 3. updates the policy to maximize `min(Q₁, Q₂)(s, a) − α · log π` at
//!    `a ~ π(s)`
//! 4. soft-updates both target critics
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
//! use sac_rl::{algo::sac::SACAgentConfig, gym::Pendulum};
//!
//! let device = NdArrayDevice::default();
//! let mut env = Pendulum::new(200);
//! let mut agent = SACAgentConfig::default().init::<Autodiff<NdArray>>(&device)?;
//!
//! agent.go(&mut env)?;
//! println!("mean return: {}", agent.evaluate(&mut env, 10));
//! ```

use burn::{
    module::AutodiffModule,
    nn::loss::{HuberLossConfig, Reduction},
    optim::{AdamConfig, Optimizer},
    prelude::*,
    tensor::backend::{AutodiffBackend, Backend},
};
use rand::{rngs::StdRng, SeedableRng};

use super::network::{OnlineNetwork, TargetNetwork};
use crate::{
    env::{Environment, State, Transition},
    error::{ConfigError, SacError},
    memory::{BatchTensors, ReplayBuffer},
    nn::{
        policy::{standard_normal, state_tensor},
        PolicyNetwork, PolicyNetworkConfig, QNetwork, QNetworkConfig,
    },
    traits::TrainingMetrics,
};

/// Configuration for the [`SACAgent`]
#[derive(Debug, Clone)]
pub struct SACAgentConfig {
    // Memory configuration
    /// The capacity of the replay memory
    ///
    /// **Default:** `50_000`
    pub memory_capacity: usize,
    /// The size of batches sampled from the replay memory
    ///
    /// **Default:** `32`
    pub batch_size: usize,

    // SAC hyperparameters
    /// The discount factor γ
    ///
    /// **Default:** `0.98`
    pub gamma: f32,
    /// The soft update rate τ for target critics
    ///
    /// **Default:** `0.01`
    pub tau: f32,
    /// The fixed temperature α weighting the entropy bonus
    ///
    /// **Default:** `0.05`
    pub alpha: f32,
    /// The learning rate for the policy network
    ///
    /// **Default:** `5e-4`
    pub lr_actor: f64,
    /// The learning rate for each critic network
    ///
    /// **Default:** `1e-3`
    pub lr_critic: f64,
    /// Factor applied to raw rewards before they are stored
    ///
    /// **Default:** `0.1`
    pub reward_scale: f32,

    // Training configuration
    /// Optimization starts once the memory holds more than this many transitions
    ///
    /// **Default:** `1000`
    pub learning_starts: usize,
    /// Number of optimization rounds run after each episode
    ///
    /// **Default:** `20`
    pub gradient_steps: usize,
    /// Number of episodes [`SACAgent::go`] trains for
    ///
    /// **Default:** `10_000`
    pub num_episodes: usize,
    /// Report the average score every N episodes
    ///
    /// **Default:** `20`
    pub log_interval: usize,
    /// Seed for buffer sampling and policy noise; `None` seeds from entropy
    ///
    /// **Default:** `None`
    pub seed: Option<u64>,

    // Networks
    /// Shape and action bound of the policy network
    pub policy: PolicyNetworkConfig,
    /// Shape of all four critic networks
    pub critic: QNetworkConfig,
}

impl Default for SACAgentConfig {
    fn default() -> Self {
        Self {
            memory_capacity: 50_000,
            batch_size: 32,
            gamma: 0.98,
            tau: 0.01,
            alpha: 0.05,
            lr_actor: 5e-4,
            lr_critic: 1e-3,
            reward_scale: 0.1,
            learning_starts: 1000,
            gradient_steps: 20,
            num_episodes: 10_000,
            log_interval: 20,
            seed: None,
            policy: PolicyNetworkConfig::new(),
            critic: QNetworkConfig::new(),
        }
    }
}

impl SACAgentConfig {
    /// Check every hyperparameter against its valid range
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("memory_capacity", self.memory_capacity),
            ("batch_size", self.batch_size),
            ("gradient_steps", self.gradient_steps),
            ("log_interval", self.log_interval),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidCount { field, value });
            }
        }

        let in_range = |field, value: f64, min: f64, max: f64| {
            if (min..=max).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange {
                    field,
                    value,
                    min,
                    max,
                })
            }
        };
        in_range("gamma", self.gamma as f64, 0.0, 1.0)?;
        in_range("tau", self.tau as f64, 0.0, 1.0)?;
        in_range("alpha", self.alpha as f64, 0.0, f64::MAX)?;
        in_range("lr_actor", self.lr_actor, f64::MIN_POSITIVE, f64::MAX)?;
        in_range("lr_critic", self.lr_critic, f64::MIN_POSITIVE, f64::MAX)?;
        in_range("action_bound", self.policy.action_bound, f64::MIN_POSITIVE, f64::MAX)?;

        if self.batch_size > self.memory_capacity {
            return Err(ConfigError::BatchExceedsCapacity {
                batch_size: self.batch_size,
                capacity: self.memory_capacity,
            });
        }

        Ok(())
    }

    /// Build an agent with freshly initialized networks and Adam optimizers
    pub fn init<B: AutodiffBackend>(
        &self,
        device: &B::Device,
    ) -> Result<
        SACAgent<B, impl Optimizer<PolicyNetwork<B>, B>, impl Optimizer<QNetwork<B>, B>>,
        ConfigError,
    > {
        let actor = OnlineNetwork::new(
            self.policy.init::<B>(device),
            AdamConfig::new().init::<B, PolicyNetwork<B>>(),
            self.lr_actor,
        );
        let critic1 = OnlineNetwork::new(
            self.critic.init::<B>(device),
            AdamConfig::new().init::<B, QNetwork<B>>(),
            self.lr_critic,
        );
        let critic2 = OnlineNetwork::new(
            self.critic.init::<B>(device),
            AdamConfig::new().init::<B, QNetwork<B>>(),
            self.lr_critic,
        );

        SACAgent::new(actor, critic1, critic2, self.clone(), device)
    }
}

/// Entropy-regularized bootstrap target for both critics
///
/// `y = r + γ · mask · (min(Q₁′, Q₂′)(s′, a′) − α · log π(a′|s′))`, with
/// `(a′, log π)` drawn from `policy` at the next states using `noise`.
/// A zero mask makes `y` exactly the reward.
///
/// Call it with inner (non-autodiff) modules and tensors: the result is a
/// fixed regression target.
pub fn soft_q_target<B: Backend>(
    policy: &PolicyNetwork<B>,
    target_critic1: &QNetwork<B>,
    target_critic2: &QNetwork<B>,
    batch: &BatchTensors<B>,
    noise: Tensor<B, 2>,
    gamma: f32,
    alpha: f32,
) -> Tensor<B, 2> {
    let (next_actions, log_prob) = policy.forward(batch.next_states.clone(), noise);
    let entropy = log_prob.mul_scalar(-alpha);

    let q1 = target_critic1.forward(batch.next_states.clone(), next_actions.clone());
    let q2 = target_critic2.forward(batch.next_states.clone(), next_actions);
    let min_q = q1.min_pair(q2);

    let future = batch.masks.clone().mul(min_q.add(entropy)).mul_scalar(gamma);
    batch.rewards.clone().add(future)
}

/// Huber (smooth L1, δ = 1) regression loss of `critic` against `target`, batch mean
pub fn critic_loss<B: Backend>(
    critic: &QNetwork<B>,
    states: Tensor<B, 2>,
    actions: Tensor<B, 2>,
    target: Tensor<B, 2>,
) -> Tensor<B, 1> {
    let prediction = critic.forward(states, actions);
    HuberLossConfig::new(1.0)
        .init()
        .forward(prediction, target, Reduction::Mean)
}

/// Policy loss `-(min(Q₁, Q₂)(s, a) − α · log π(a|s))` averaged over the batch
///
/// Returns `(loss, mean_entropy_bonus)`.
pub fn actor_loss<B: Backend>(
    policy: &PolicyNetwork<B>,
    critic1: &QNetwork<B>,
    critic2: &QNetwork<B>,
    states: Tensor<B, 2>,
    noise: Tensor<B, 2>,
    alpha: f32,
) -> (Tensor<B, 1>, Tensor<B, 1>) {
    let (actions, log_prob) = policy.forward(states.clone(), noise);
    let entropy = log_prob.mul_scalar(-alpha);

    let q1 = critic1.forward(states.clone(), actions.clone());
    let q2 = critic2.forward(states, actions);
    let min_q = q1.min_pair(q2);

    let loss = min_q.add(entropy.clone()).neg().mean();
    (loss, entropy.mean())
}

/// What happened during one call to [`SACAgent::run_episode`]
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeReport {
    /// Sum of raw (unscaled) rewards
    pub score: f32,
    /// Number of environment steps taken
    pub steps: usize,
    /// Averaged metrics of the optimization rounds run after the episode,
    /// `None` while the memory is still warming up
    pub metrics: Option<TrainingMetrics>,
}

/// A Soft Actor-Critic agent for environments with a 3-dimensional state and
/// a scalar bounded action
///
/// ### Generics
/// - `B` - A burn autodiff backend
/// - `PO` - The policy optimizer
/// - `CO` - The optimizer type of each critic (one instance per critic)
pub struct SACAgent<B: AutodiffBackend, PO, CO> {
    actor: OnlineNetwork<B, PolicyNetwork<B>, PO>,
    critic1: OnlineNetwork<B, QNetwork<B>, CO>,
    critic2: OnlineNetwork<B, QNetwork<B>, CO>,
    target_critic1: TargetNetwork<B, QNetwork<B>>,
    target_critic2: TargetNetwork<B, QNetwork<B>>,

    memory: ReplayBuffer,
    rng: StdRng,
    device: B::Device,
    config: SACAgentConfig,

    total_steps: usize,
    episodes_elapsed: usize,
}

impl<B, PO, CO> SACAgent<B, PO, CO>
where
    B: AutodiffBackend,
    PO: Optimizer<PolicyNetwork<B>, B>,
    CO: Optimizer<QNetwork<B>, B>,
{
    /// Create a new SAC agent from already built online networks
    ///
    /// Target critics start as exact copies of `critic1` and `critic2`.
    pub fn new(
        actor: OnlineNetwork<B, PolicyNetwork<B>, PO>,
        critic1: OnlineNetwork<B, QNetwork<B>, CO>,
        critic2: OnlineNetwork<B, QNetwork<B>, CO>,
        config: SACAgentConfig,
        device: &B::Device,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            target_critic1: TargetNetwork::from_online(&critic1),
            target_critic2: TargetNetwork::from_online(&critic2),
            actor,
            critic1,
            critic2,
            memory: ReplayBuffer::new(config.memory_capacity),
            rng,
            device: device.clone(),
            config,
            total_steps: 0,
            episodes_elapsed: 0,
        })
    }

    /// Sample an exploratory action for `state`
    pub fn act(&mut self, state: State) -> f32 {
        let state = state_tensor::<B>(state, &self.device).inner();
        let (action, _) = self.actor.model().valid().sample(state, &mut self.rng);
        action.into_scalar().elem()
    }

    /// Deterministic action `bound * tanh(mu)` for evaluation
    pub fn greedy_action(&self, state: State) -> f32 {
        let state = state_tensor::<B>(state, &self.device).inner();
        self.actor.model().valid().mean_action(state).into_scalar().elem()
    }

    /// Store a transition, scaling its reward by `reward_scale`
    pub fn remember(
        &mut self,
        state: State,
        action: f32,
        reward: f32,
        next_state: State,
        done: bool,
    ) {
        let reward = reward * self.config.reward_scale;
        self.memory
            .put(Transition::new(state, action, reward, next_state, done));
    }

    /// One optimization round on a freshly sampled batch
    ///
    /// Both critics regress onto the same target, computed once from the
    /// current target-critic snapshot. The policy is then updated against the
    /// refreshed critics, and finally both targets are soft-updated.
    pub fn train_round(&mut self) -> Result<TrainingMetrics, SacError> {
        let SACAgentConfig {
            batch_size,
            gamma,
            tau,
            alpha,
            ..
        } = self.config;

        let batch = self
            .memory
            .sample(batch_size, &mut self.rng)?
            .to_tensors::<B>(&self.device);

        let target = {
            let inner = BatchTensors {
                states: batch.states.clone().inner(),
                actions: batch.actions.clone().inner(),
                rewards: batch.rewards.clone().inner(),
                next_states: batch.next_states.clone().inner(),
                masks: batch.masks.clone().inner(),
            };
            let noise = standard_normal::<B::InnerBackend, _>(
                batch_size,
                &inner.next_states.device(),
                &mut self.rng,
            );
            let target = soft_q_target(
                &self.actor.model().valid(),
                self.target_critic1.model(),
                self.target_critic2.model(),
                &inner,
                noise,
                gamma,
                alpha,
            );
            Tensor::<B, 2>::from_inner(target)
        };

        let loss = critic_loss(
            self.critic1.model(),
            batch.states.clone(),
            batch.actions.clone(),
            target.clone(),
        );
        let critic1_loss = finite("critic1", &loss)?;
        self.critic1.step(loss);

        let loss = critic_loss(
            self.critic2.model(),
            batch.states.clone(),
            batch.actions.clone(),
            target,
        );
        let critic2_loss = finite("critic2", &loss)?;
        self.critic2.step(loss);

        let noise = standard_normal::<B, _>(batch_size, &self.device, &mut self.rng);
        let (loss, entropy) = actor_loss(
            self.actor.model(),
            self.critic1.model(),
            self.critic2.model(),
            batch.states,
            noise,
            alpha,
        );
        let policy_loss = finite("policy", &loss)?;
        self.actor.step(loss);

        self.target_critic1.soft_update(&self.critic1, tau);
        self.target_critic2.soft_update(&self.critic2, tau);

        let metrics = TrainingMetrics {
            critic1_loss,
            critic2_loss,
            policy_loss,
            entropy: entropy.into_scalar().elem(),
            n_updates: 1,
        };
        log::debug!(
            "round: q1 {:.4} q2 {:.4} pi {:.4} entropy {:.4}",
            metrics.critic1_loss,
            metrics.critic2_loss,
            metrics.policy_loss,
            metrics.entropy
        );

        Ok(metrics)
    }

    /// Play one episode with the stochastic policy, then train
    ///
    /// Every step is stored in the replay memory. Once the memory holds more
    /// than `learning_starts` transitions, `gradient_steps` optimization
    /// rounds follow the episode.
    pub fn run_episode<E: Environment>(&mut self, env: &mut E) -> Result<EpisodeReport, SacError> {
        let mut state = env.reset();
        let mut score = 0.0;
        let mut steps = 0;

        loop {
            let action = self.act(state);
            let (next_state, reward, done) = env.step(action);
            self.remember(state, action, reward, next_state, done);

            score += reward;
            steps += 1;
            state = next_state;
            if done {
                break;
            }
        }
        self.total_steps += steps;
        self.episodes_elapsed += 1;

        let mut rounds = Vec::new();
        if self.memory.len() > self.config.learning_starts {
            for _ in 0..self.config.gradient_steps {
                rounds.push(self.train_round()?);
            }
        }

        Ok(EpisodeReport {
            score,
            steps,
            metrics: TrainingMetrics::mean(&rounds),
        })
    }

    /// Train the agent on an environment for `num_episodes` episodes
    ///
    /// Every `log_interval` episodes the average raw score over the interval
    /// is logged and the accumulator resets.
    pub fn go<E: Environment>(&mut self, env: &mut E) -> Result<(), SacError> {
        let mut score = 0.0;

        for n_epi in 0..self.config.num_episodes {
            let report = self.run_episode(env)?;
            score += report.score;

            if n_epi % self.config.log_interval == 0 && n_epi != 0 {
                let losses = report
                    .metrics
                    .map(|m| {
                        format!(
                            ", q1 loss : {:.4}, pi loss : {:.4}",
                            m.critic1_loss, m.policy_loss
                        )
                    })
                    .unwrap_or_default();
                log::info!(
                    "# of episode :{}, avg score : {:.1}, buffer : {}{}",
                    n_epi,
                    score / self.config.log_interval as f32,
                    self.memory.len(),
                    losses
                );
                score = 0.0;
            }
        }

        Ok(())
    }

    /// Mean raw return of the deterministic policy over `episodes` episodes
    ///
    /// Nothing is stored and no parameter changes.
    pub fn evaluate<E: Environment>(&self, env: &mut E, episodes: usize) -> f32 {
        if episodes == 0 {
            return 0.0;
        }

        let mut total = 0.0;
        for _ in 0..episodes {
            let mut state = env.reset();
            loop {
                let (next_state, reward, done) = env.step(self.greedy_action(state));
                total += reward;
                state = next_state;
                if done {
                    break;
                }
            }
        }
        total / episodes as f32
    }

    pub fn memory(&self) -> &ReplayBuffer {
        &self.memory
    }

    pub fn config(&self) -> &SACAgentConfig {
        &self.config
    }

    pub fn actor(&self) -> &PolicyNetwork<B> {
        self.actor.model()
    }

    pub fn critics(&self) -> (&QNetwork<B>, &QNetwork<B>) {
        (self.critic1.model(), self.critic2.model())
    }

    pub fn target_critics(&self) -> (&QNetwork<B::InnerBackend>, &QNetwork<B::InnerBackend>) {
        (self.target_critic1.model(), self.target_critic2.model())
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn episodes_elapsed(&self) -> usize {
        self.episodes_elapsed
    }
}

fn finite<B: Backend>(loss: &'static str, value: &Tensor<B, 1>) -> Result<f32, SacError> {
    let value: f32 = value.clone().into_scalar().elem();
    if value.is_finite() {
        Ok(value)
    } else {
        log::error!("{} loss diverged to {}", loss, value);
        Err(SacError::NonFiniteLoss { loss, value })
    }
}
