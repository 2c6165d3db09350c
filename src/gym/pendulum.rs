use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::PI;

use crate::env::{Environment, State};

const MAX_SPEED: f32 = 8.0;
const MAX_TORQUE: f32 = 2.0;
const DT: f32 = 0.05;
const G: f32 = 10.0;
const M: f32 = 1.0;
const L: f32 = 1.0;

/// Classic Pendulum swing-up environment with a continuous torque action
///
/// The state is `[cos(θ), sin(θ), θ_dot]` to avoid discontinuities when the
/// angle wraps around. Episodes are truncated after `max_steps` steps, and the
/// last step reports `done = true`.
///
/// # Physics
/// - Mass: 1.0 kg
/// - Length: 1.0 m
/// - Gravity: 10.0 m/s²
/// - Time step: 0.05 s
/// - Max angular velocity: 8.0 rad/s
/// - Max torque: 2.0 N⋅m
///
/// # Reward
/// r = -θ² - 0.1⋅θ̇² - 0.001⋅u²
///
/// Where θ is the angle from vertical (0 = upright), θ̇ is angular velocity,
/// and u is the applied torque, all taken before the step is integrated.
#[derive(Debug, Clone)]
pub struct Pendulum {
    theta: f32,
    theta_dot: f32,
    steps: usize,
    max_steps: usize,
    rng: StdRng,
}

impl Pendulum {
    /// Create a new Pendulum environment
    ///
    /// # Arguments
    /// * `max_steps` - Maximum number of steps per episode (typically 200)
    pub fn new(max_steps: usize) -> Self {
        Self::with_rng(max_steps, StdRng::from_entropy())
    }

    /// Same as [`Pendulum::new`] but with reproducible initial states
    pub fn with_seed(max_steps: usize, seed: u64) -> Self {
        Self::with_rng(max_steps, StdRng::seed_from_u64(seed))
    }

    fn with_rng(max_steps: usize, rng: StdRng) -> Self {
        Self {
            theta: 0.0,
            theta_dot: 0.0,
            steps: 0,
            max_steps,
            rng,
        }
    }

    fn state(&self) -> State {
        [self.theta.cos(), self.theta.sin(), self.theta_dot]
    }

    fn angle_normalize(x: f32) -> f32 {
        (x + PI).rem_euclid(2.0 * PI) - PI
    }
}

impl Environment for Pendulum {
    fn reset(&mut self) -> State {
        self.theta = self.rng.gen_range(-PI..PI);
        self.theta_dot = self.rng.gen_range(-1.0..1.0);
        self.steps = 0;
        self.state()
    }

    fn step(&mut self, action: f32) -> (State, f32, bool) {
        let torque = action.clamp(-MAX_TORQUE, MAX_TORQUE);

        let reward = -(Self::angle_normalize(self.theta).powi(2)
            + 0.1 * self.theta_dot.powi(2)
            + 0.001 * torque.powi(2));

        // θ̈ = (3g/2L)sin(θ) + (3/mL²)u
        let theta_acc = (3.0 * G / (2.0 * L)) * self.theta.sin() + (3.0 / (M * L * L)) * torque;

        self.theta_dot += theta_acc * DT;
        self.theta += self.theta_dot * DT;
        self.theta_dot = self.theta_dot.clamp(-MAX_SPEED, MAX_SPEED);

        self.steps += 1;
        (self.state(), reward, self.steps >= self.max_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pendulum_physics() {
        let mut env = Pendulum::with_seed(200, 7);

        let state = env.reset();
        assert!(state[0].abs() <= 1.0, "cos(θ) should be in [-1, 1]");
        assert!(state[1].abs() <= 1.0, "sin(θ) should be in [-1, 1]");
        assert!(state[2].abs() <= 1.0, "initial angular velocity is in [-1, 1]");

        let (_, _, done) = env.step(0.0);
        assert!(!done, "Should not be terminal after one step");

        // Out-of-range torque is clamped
        let (state, reward_high, _) = env.step(100.0);
        assert!(reward_high.is_finite());
        assert!(state[2].abs() <= MAX_SPEED);
        let (_, reward_low, _) = env.step(-100.0);
        assert!(reward_low.is_finite());
    }

    #[test]
    fn pendulum_reward() {
        let mut env = Pendulum::with_seed(200, 0);
        env.theta = 0.0;
        env.theta_dot = 0.0;

        let (_, reward, _) = env.step(0.0);
        assert_eq!(reward, 0.0, "upright, still and unforced costs nothing");

        env.theta = PI;
        env.theta_dot = 0.0;
        let (_, reward_down, _) = env.step(0.0);
        assert!(reward_down < reward, "Reward should be lower when pendulum is down");
    }

    #[test]
    fn pendulum_episode_length() {
        let mut env = Pendulum::with_seed(5, 1);
        env.reset();

        for i in 0..5 {
            let (_, _, done) = env.step(0.0);
            assert_eq!(done, i == 4, "only the fifth step is terminal");
        }

        env.reset();
        let (_, _, done) = env.step(0.0);
        assert!(!done, "reset starts a fresh episode");
    }

    #[test]
    fn seeded_resets_repeat() {
        let mut a = Pendulum::with_seed(200, 42);
        let mut b = Pendulum::with_seed(200, 42);
        assert_eq!(a.reset(), b.reset());
    }
}
