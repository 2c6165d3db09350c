use std::collections::VecDeque;

use burn::{prelude::*, tensor::backend::Backend};
use rand::{seq::index, Rng};

use crate::{
    env::{State, Transition},
    error::SacError,
    traits::ToTensor,
};

/// A bounded FIFO store of [`Transition`]s
///
/// Once `capacity` transitions are stored, every [`put`](ReplayBuffer::put)
/// evicts the oldest one first, so `len() <= capacity` always holds.
/// [`len`](ReplayBuffer::len) is the buffer's current size.
#[derive(Debug, Clone)]
pub struct ReplayBuffer {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a transition, discarding the oldest one if the buffer is full
    pub fn put(&mut self, transition: Transition) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Draw `n` distinct transitions uniformly at random, without replacement
    ///
    /// Fails with [`SacError::InsufficientSamples`] if `n > len()`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<TransitionBatch, SacError> {
        if n > self.buffer.len() {
            return Err(SacError::InsufficientSamples {
                requested: n,
                available: self.buffer.len(),
            });
        }

        let mut batch = TransitionBatch::with_capacity(n);
        for i in index::sample(rng, self.buffer.len(), n) {
            batch.push(&self.buffer[i]);
        }
        Ok(batch)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stored transitions, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }
}

/// Sampled transitions split into parallel columns
///
/// `masks` holds the continuation mask of each transition: `0.0` where the
/// episode ended, `1.0` elsewhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionBatch {
    pub states: Vec<State>,
    pub actions: Vec<f32>,
    pub rewards: Vec<f32>,
    pub next_states: Vec<State>,
    pub masks: Vec<f32>,
}

impl TransitionBatch {
    fn with_capacity(n: usize) -> Self {
        Self {
            states: Vec::with_capacity(n),
            actions: Vec::with_capacity(n),
            rewards: Vec::with_capacity(n),
            next_states: Vec::with_capacity(n),
            masks: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, transition: &Transition) {
        self.states.push(transition.state);
        self.actions.push(transition.action);
        self.rewards.push(transition.reward);
        self.next_states.push(transition.next_state);
        self.masks.push(transition.mask());
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Move the batch onto `device`
    ///
    /// States become `[batch, 3]`, every scalar column becomes `[batch, 1]`.
    pub fn to_tensors<B: Backend>(self, device: &B::Device) -> BatchTensors<B> {
        BatchTensors {
            states: self.states.to_tensor(device),
            actions: column(self.actions, device),
            rewards: column(self.rewards, device),
            next_states: self.next_states.to_tensor(device),
            masks: column(self.masks, device),
        }
    }
}

fn column<B: Backend>(values: Vec<f32>, device: &B::Device) -> Tensor<B, 2> {
    let values: Tensor<B, 1> = values.to_tensor(device);
    values.unsqueeze_dim(1)
}

/// A [`TransitionBatch`] as tensors, ready for batched evaluation
#[derive(Debug, Clone)]
pub struct BatchTensors<B: Backend> {
    pub states: Tensor<B, 2>,
    pub actions: Tensor<B, 2>,
    pub rewards: Tensor<B, 2>,
    pub next_states: Tensor<B, 2>,
    pub masks: Tensor<B, 2>,
}
