use burn::{
    config::Config,
    module::Module,
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::{activation::relu, backend::Backend},
};

use super::soft_update::{soft_update_linear, SoftUpdate};

/// Critic network configuration
#[derive(Config, Debug)]
pub struct QNetworkConfig {
    #[config(default = 3)]
    pub state_dim: usize,
    #[config(default = 1)]
    pub action_dim: usize,
    /// Width of each input branch
    #[config(default = 64)]
    pub branch_size: usize,
    /// Width of the layer after the branches are merged
    #[config(default = 32)]
    pub merge_size: usize,
}

/// Action-value network Q(s, a)
///
/// Architecture: state → fc_s → ReLU ┐
///                                   ├ concat → fc_cat → ReLU → fc_out (1)
///              action → fc_a → ReLU ┘
#[derive(Module, Debug)]
pub struct QNetwork<B: Backend> {
    fc_s: Linear<B>,
    fc_a: Linear<B>,
    fc_cat: Linear<B>,
    fc_out: Linear<B>,
}

impl QNetworkConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> QNetwork<B> {
        QNetwork {
            fc_s: LinearConfig::new(self.state_dim, self.branch_size).init(device),
            fc_a: LinearConfig::new(self.action_dim, self.branch_size).init(device),
            fc_cat: LinearConfig::new(2 * self.branch_size, self.merge_size).init(device),
            fc_out: LinearConfig::new(self.merge_size, 1).init(device),
        }
    }
}

impl<B: Backend> QNetwork<B> {
    /// Args:
    ///   - state: [batch_size, state_dim]
    ///   - action: [batch_size, action_dim]
    /// Returns: Q-value [batch_size, 1]
    pub fn forward(&self, state: Tensor<B, 2>, action: Tensor<B, 2>) -> Tensor<B, 2> {
        let h_s = relu(self.fc_s.forward(state));
        let h_a = relu(self.fc_a.forward(action));
        let x = Tensor::cat(vec![h_s, h_a], 1);

        let x = relu(self.fc_cat.forward(x));
        self.fc_out.forward(x)
    }
}

impl<B: Backend> SoftUpdate for QNetwork<B> {
    fn soft_update(self, online: &Self, tau: f32) -> Self {
        Self {
            fc_s: soft_update_linear(self.fc_s, &online.fc_s, tau),
            fc_a: soft_update_linear(self.fc_a, &online.fc_a, tau),
            fc_cat: soft_update_linear(self.fc_cat, &online.fc_cat, tau),
            fc_out: soft_update_linear(self.fc_out, &online.fc_out, tau),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ToTensor;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};

    fn values(tensor: Tensor<NdArray, 2>) -> Vec<f32> {
        tensor.into_data().iter::<f32>().collect()
    }

    fn params(q: &QNetwork<NdArray>) -> Vec<f32> {
        [&q.fc_s, &q.fc_a, &q.fc_cat, &q.fc_out]
            .iter()
            .flat_map(|l| {
                let mut p: Vec<f32> = l.weight.val().into_data().iter::<f32>().collect();
                if let Some(b) = &l.bias {
                    p.extend(b.val().into_data().iter::<f32>());
                }
                p
            })
            .collect()
    }

    #[test]
    fn one_value_per_batch_element() {
        let device = NdArrayDevice::default();
        let q = QNetworkConfig::new().init::<NdArray>(&device);

        for batch_size in [1, 7, 32] {
            let states = Tensor::<NdArray, 2>::random(
                [batch_size, 3],
                burn::tensor::Distribution::Uniform(-1.0, 1.0),
                &device,
            );
            let actions = Tensor::<NdArray, 2>::random(
                [batch_size, 1],
                burn::tensor::Distribution::Uniform(-2.0, 2.0),
                &device,
            );
            assert_eq!(q.forward(states, actions).dims(), [batch_size, 1]);
        }
    }

    #[test]
    fn batch_order_does_not_change_values() {
        let device = NdArrayDevice::default();
        let q = QNetworkConfig::new().init::<NdArray>(&device);

        let s = vec![[0.1_f32, 0.2, 0.3], [-1.0, 0.5, 2.0], [0.9, -0.4, -3.0]];
        let a = vec![0.5_f32, -1.5, 2.0];

        let forward = |s: Vec<[f32; 3]>, a: Vec<f32>| {
            let a: Tensor<NdArray, 1> = a.to_tensor(&device);
            values(q.forward(s.to_tensor(&device), a.unsqueeze_dim(1)))
        };

        let out = forward(s.clone(), a.clone());
        let permuted = forward(vec![s[2], s[0], s[1]], vec![a[2], a[0], a[1]]);
        assert_eq!(permuted, vec![out[2], out[0], out[1]]);
    }

    #[test]
    fn soft_update_blends_every_parameter() {
        let device = NdArrayDevice::default();
        let online = QNetworkConfig::new().init::<NdArray>(&device);
        let target = QNetworkConfig::new().init::<NdArray>(&device);
        let old = params(&target);
        let new_online = params(&online);

        let blended = params(&target.clone().soft_update(&online, 0.01));
        for ((b, o), p) in blended.iter().zip(&old).zip(&new_online) {
            assert!((b - (0.99 * o + 0.01 * p)).abs() < 1e-6);
        }

        assert_eq!(params(&target.clone().soft_update(&online, 1.0)), new_online);
        assert_eq!(params(&target.soft_update(&online, 0.0)), old);
    }
}
