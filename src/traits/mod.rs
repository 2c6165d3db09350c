pub mod metrics;
pub mod to_tensor;

pub use metrics::TrainingMetrics;
pub use to_tensor::ToTensor;
