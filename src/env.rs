//! The environment contract and the transition record it produces.

/// Dimension of the state vector every supported environment emits
pub const STATE_DIM: usize = 3;

/// A state observation, e.g. Pendulum's `[cos(θ), sin(θ), θ_dot]`
pub type State = [f32; STATE_DIM];

/// A control environment with a 3-dimensional state and a scalar action
///
/// The agent only ever calls [`reset`](Environment::reset) at the start of an
/// episode and [`step`](Environment::step) until it reports `done`.
pub trait Environment {
    /// Start a new episode and return its initial state
    fn reset(&mut self) -> State;

    /// Apply `action` and advance the environment by one step
    ///
    /// Returns `(next_state, reward, done)`. When `done` is true the episode is
    /// over and the next call must be [`reset`](Environment::reset).
    fn step(&mut self, action: f32) -> (State, f32, bool);
}

/// One recorded environment interaction
///
/// `reward` is stored already normalized (scaled by the agent's reward scale),
/// never as the raw environment reward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: State,
    pub action: f32,
    pub reward: f32,
    pub next_state: State,
    pub done: bool,
}

impl Transition {
    pub fn new(state: State, action: f32, reward: f32, next_state: State, done: bool) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            done,
        }
    }

    /// Continuation mask: `0.0` at a terminal transition, `1.0` otherwise
    pub fn mask(&self) -> f32 {
        if self.done {
            0.0
        } else {
            1.0
        }
    }
}
