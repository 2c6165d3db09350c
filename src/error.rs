use std::fmt;

/// Configuration validation error.
///
/// Returned by [`SACAgentConfig::validate`](crate::algo::sac::SACAgentConfig::validate).
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A count parameter (batch size, capacity, ...) must be positive.
    InvalidCount { field: &'static str, value: usize },
    /// A parameter is outside its valid range.
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// A batch could never be drawn from a buffer this small.
    BatchExceedsCapacity { batch_size: usize, capacity: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidCount { field, value } => {
                write!(f, "{} must be > 0, got {}", field, value)
            }
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{} must be in [{}, {}], got {}", field, min, max, value),
            ConfigError::BatchExceedsCapacity {
                batch_size,
                capacity,
            } => write!(
                f,
                "batch_size ({}) must be <= memory_capacity ({})",
                batch_size, capacity
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while training a SAC agent.
#[derive(Debug, Clone, PartialEq)]
pub enum SacError {
    /// More transitions were requested than the replay buffer holds.
    InsufficientSamples { requested: usize, available: usize },
    /// A loss became NaN or infinite. Training cannot continue.
    NonFiniteLoss { loss: &'static str, value: f32 },
    /// The agent was built from an invalid configuration.
    Config(ConfigError),
}

impl fmt::Display for SacError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SacError::InsufficientSamples {
                requested,
                available,
            } => write!(
                f,
                "cannot sample {} transitions from a buffer holding {}",
                requested, available
            ),
            SacError::NonFiniteLoss { loss, value } => {
                write!(f, "{} loss is not finite ({})", loss, value)
            }
            SacError::Config(err) => write!(f, "invalid configuration: {}", err),
        }
    }
}

impl std::error::Error for SacError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SacError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for SacError {
    fn from(err: ConfigError) -> Self {
        SacError::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = SacError::InsufficientSamples {
            requested: 32,
            available: 10,
        };
        assert_eq!(
            err.to_string(),
            "cannot sample 32 transitions from a buffer holding 10"
        );

        let err: SacError = ConfigError::InvalidCount {
            field: "batch_size",
            value: 0,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "invalid configuration: batch_size must be > 0, got 0"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
