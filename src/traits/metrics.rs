/// Losses and entropy observed during SAC optimization
///
/// Returned for a single optimization round, or averaged over all rounds run
/// after an episode.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainingMetrics {
    /// Huber loss of the first critic
    pub critic1_loss: f32,

    /// Huber loss of the second critic
    pub critic2_loss: f32,

    /// Policy loss, `-(min_q + entropy)` averaged over the batch
    pub policy_loss: f32,

    /// Mean entropy bonus `-alpha * log_prob` seen by the policy update
    pub entropy: f32,

    /// Number of optimization rounds these values cover
    pub n_updates: usize,
}

impl TrainingMetrics {
    /// Average a sequence of per-round metrics
    ///
    /// Returns `None` when no round was run.
    pub fn mean(rounds: &[TrainingMetrics]) -> Option<TrainingMetrics> {
        if rounds.is_empty() {
            return None;
        }
        let n = rounds.len() as f32;
        let sum = |f: fn(&TrainingMetrics) -> f32| rounds.iter().map(f).sum::<f32>() / n;

        Some(TrainingMetrics {
            critic1_loss: sum(|m| m.critic1_loss),
            critic2_loss: sum(|m| m.critic2_loss),
            policy_loss: sum(|m| m.policy_loss),
            entropy: sum(|m| m.entropy),
            n_updates: rounds.iter().map(|m| m.n_updates).sum(),
        })
    }
}
