//! Soft Actor-Critic and the online/target network roles it trains

pub mod network;
pub mod sac;
