//! Experience storage for off-policy learning

pub mod replay;

pub use replay::{BatchTensors, ReplayBuffer, TransitionBatch};
