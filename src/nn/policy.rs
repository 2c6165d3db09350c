use burn::{
    config::Config,
    module::Module,
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::{
        activation::{relu, softplus},
        backend::Backend,
    },
};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::{env::STATE_DIM, traits::ToTensor};

/// ln(√(2π)), the normalizer of the standard normal density
const LN_SQRT_2PI: f32 = 0.918_938_5;

/// Policy network configuration
#[derive(Config, Debug)]
pub struct PolicyNetworkConfig {
    #[config(default = 3)]
    pub state_dim: usize,
    #[config(default = 128)]
    pub hidden_size: usize,
    /// Actions are squashed into `[-action_bound, action_bound]`
    #[config(default = 2.0)]
    pub action_bound: f64,
}

/// Stochastic tanh-squashed Gaussian policy
///
/// Architecture: state → fc1 (hidden) → ReLU → mu_head (1), std_head (1) → softplus
///
/// Actions are sampled with the reparameterization trick,
/// `action = bound * tanh(mu + std * z)` with `z ~ N(0, 1)`, so gradients
/// flow from the action back into the parameters.
#[derive(Module, Debug)]
pub struct PolicyNetwork<B: Backend> {
    fc1: Linear<B>,
    mu_head: Linear<B>,
    std_head: Linear<B>,
    action_bound: f64,
}

impl PolicyNetworkConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> PolicyNetwork<B> {
        PolicyNetwork {
            fc1: LinearConfig::new(self.state_dim, self.hidden_size).init(device),
            mu_head: LinearConfig::new(self.hidden_size, 1).init(device),
            std_head: LinearConfig::new(self.hidden_size, 1).init(device),
            action_bound: self.action_bound,
        }
    }
}

impl<B: Backend> PolicyNetwork<B> {
    /// Mean and standard deviation of the pre-squash Gaussian
    ///
    /// Returns `(mu, std)`, both `[batch_size, 1]`. `std` is strictly positive.
    pub fn distribution(&self, state: Tensor<B, 2>) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let x = relu(self.fc1.forward(state));
        let mu = self.mu_head.forward(x.clone());
        let std = softplus(self.std_head.forward(x), 1.0);

        (mu, std)
    }

    /// Squash the policy for a given noise draw
    ///
    /// `noise` must be `[batch_size, 1]` standard-normal samples.
    ///
    /// Returns `(action, log_prob)`, both `[batch_size, 1]`. `log_prob` is the
    /// standard normal log-density of `noise` itself, not the density of the
    /// squashed action.
    pub fn forward(
        &self,
        state: Tensor<B, 2>,
        noise: Tensor<B, 2>,
    ) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let (mu, std) = self.distribution(state);

        let log_prob = noise
            .clone()
            .mul(noise.clone())
            .mul_scalar(-0.5)
            .sub_scalar(LN_SQRT_2PI);
        let action = mu.add(std.mul(noise)).tanh().mul_scalar(self.action_bound);

        (action, log_prob)
    }

    /// Draw fresh noise from `rng` and run [`forward`](Self::forward)
    pub fn sample<R: Rng + ?Sized>(
        &self,
        state: Tensor<B, 2>,
        rng: &mut R,
    ) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let [batch_size, _] = state.dims();
        let noise = standard_normal::<B, _>(batch_size, &state.device(), rng);
        self.forward(state, noise)
    }

    /// Deterministic action `bound * tanh(mu)`, used for evaluation
    pub fn mean_action(&self, state: Tensor<B, 2>) -> Tensor<B, 2> {
        let (mu, _) = self.distribution(state);
        mu.tanh().mul_scalar(self.action_bound)
    }
}

/// `[batch_size, 1]` independent N(0, 1) samples drawn from `rng`
pub fn standard_normal<B: Backend, R: Rng + ?Sized>(
    batch_size: usize,
    device: &B::Device,
    rng: &mut R,
) -> Tensor<B, 2> {
    let values: Vec<f32> = (0..batch_size).map(|_| rng.sample(StandardNormal)).collect();
    let values: Tensor<B, 1> = values.to_tensor(device);
    values.unsqueeze_dim(1)
}

/// Pack a single state into a `[1, STATE_DIM]` tensor
pub fn state_tensor<B: Backend>(state: [f32; STATE_DIM], device: &B::Device) -> Tensor<B, 2> {
    vec![state].to_tensor(device)
}
