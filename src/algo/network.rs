//! Online and target roles for the agent's networks
//!
//! An [`OnlineNetwork`] owns its optimizer state and is trained by gradient
//! steps. A [`TargetNetwork`] is a gradient-free copy kept on the inner
//! (non-autodiff) backend; the only way to change it is
//! [`soft_update`](TargetNetwork::soft_update).

use std::marker::PhantomData;

use burn::{
    module::AutodiffModule,
    optim::{GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::nn::SoftUpdate;

/// A network trained by gradient descent with its own optimizer
pub struct OnlineNetwork<B, M, O> {
    model: M,
    optimizer: O,
    lr: f64,
    _backend: PhantomData<B>,
}

impl<B, M, O> OnlineNetwork<B, M, O>
where
    B: AutodiffBackend,
    M: AutodiffModule<B>,
    O: Optimizer<M, B>,
{
    pub fn new(model: M, optimizer: O, lr: f64) -> Self {
        Self {
            model,
            optimizer,
            lr,
            _backend: PhantomData,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn lr(&self) -> f64 {
        self.lr
    }

    /// Apply one optimizer step minimizing `loss`
    ///
    /// Only this network's parameters move, even if `loss` also depends on
    /// other modules.
    pub fn step(&mut self, loss: Tensor<B, 1>) {
        let grads = GradientsParams::from_grads(loss.backward(), &self.model);
        self.model = self.optimizer.step(self.lr, self.model.clone(), grads);
    }
}

/// A slowly tracking, gradient-free copy of an [`OnlineNetwork`]
pub struct TargetNetwork<B: AutodiffBackend, M: AutodiffModule<B>> {
    model: M::InnerModule,
    _backend: PhantomData<B>,
}

impl<B, M> TargetNetwork<B, M>
where
    B: AutodiffBackend,
    M: AutodiffModule<B>,
{
    /// Start as an exact copy of `online`
    pub fn from_online<O>(online: &OnlineNetwork<B, M, O>) -> Self
    where
        O: Optimizer<M, B>,
    {
        Self {
            model: online.model().valid(),
            _backend: PhantomData,
        }
    }

    pub fn model(&self) -> &M::InnerModule {
        &self.model
    }

    /// θ′ ← (1 − τ)θ′ + τθ
    pub fn soft_update<O>(&mut self, online: &OnlineNetwork<B, M, O>, tau: f32)
    where
        O: Optimizer<M, B>,
        M::InnerModule: SoftUpdate,
    {
        self.model = self.model.clone().soft_update(&online.model().valid(), tau);
    }
}
