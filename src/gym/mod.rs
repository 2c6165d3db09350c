//! Built-in environments

pub mod pendulum;

pub use pendulum::Pendulum;
