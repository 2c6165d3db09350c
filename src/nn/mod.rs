//! Actor and critic networks

pub mod critic;
pub mod policy;
pub mod soft_update;

pub use critic::{QNetwork, QNetworkConfig};
pub use policy::{PolicyNetwork, PolicyNetworkConfig};
pub use soft_update::SoftUpdate;
