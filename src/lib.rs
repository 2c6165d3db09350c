//! Soft Actor-Critic (SAC) for continuous control, built on [burn](https://burn.dev).
//!
//! The crate contains the learning machinery only: a replay buffer, a
//! stochastic tanh-squashed policy, twin critics with Polyak-averaged target
//! copies and the training loop that ties them to an [`Environment`].

pub mod algo;
pub mod env;
pub mod error;
pub mod gym;
pub mod memory;
pub mod nn;
pub mod traits;

pub use env::{Environment, Transition};
pub use error::{ConfigError, SacError};
