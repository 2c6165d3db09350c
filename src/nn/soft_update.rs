//! Polyak averaging of network parameters
//!
//! θ′ ← (1 − τ)θ′ + τθ

use burn::{
    module::Param,
    nn::Linear,
    prelude::*,
    tensor::backend::Backend,
};

/// A module whose parameters can be blended toward another instance of itself
pub trait SoftUpdate {
    /// Move `self` (the target) toward `online` by factor `tau`
    ///
    /// `tau = 0` leaves `self` unchanged, `tau = 1` makes it a copy of `online`.
    fn soft_update(self, online: &Self, tau: f32) -> Self;
}

pub fn soft_update_tensor<B: Backend, const D: usize>(
    this: Param<Tensor<B, D>>,
    that: &Param<Tensor<B, D>>,
    tau: f32,
) -> Param<Tensor<B, D>> {
    // detach keeps the blend out of any autodiff graph
    this.map(|tensor| tensor * (1.0 - tau) + that.val().detach() * tau)
}

pub fn soft_update_linear<B: Backend>(
    mut this: Linear<B>,
    that: &Linear<B>,
    tau: f32,
) -> Linear<B> {
    this.weight = soft_update_tensor(this.weight, &that.weight, tau);
    this.bias = match (this.bias, &that.bias) {
        (Some(b1), Some(b2)) => Some(soft_update_tensor(b1, b2, tau)),
        (bias, _) => bias,
    };

    this
}
