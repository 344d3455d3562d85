mod parse;
mod system;

pub use parse::{PingOutput, parse};
pub use system::SystemPing;

use crate::error::ProbeError;

/// A source of round-trip time measurements.
#[async_trait::async_trait]
pub trait Probe: Send + Sync {
    /// Measures one round-trip time to `host`, in milliseconds.
    async fn measure(&self, host: &str) -> Result<f64, ProbeError>;
}
