use std::time::Duration;

use tokio::process::Command;

use super::{Probe, parse};
use crate::error::ProbeError;

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Runs the operating system's `ping` and reads the average round-trip time.
#[derive(Debug, Clone)]
pub struct SystemPing {
    program: String,
    count: u32,
    timeout: Duration,
    retries: u32,
    retry_delay: Duration,
}

impl SystemPing {
    #[must_use]
    pub fn new(count: u32, timeout: Duration, retries: u32) -> Self {
        Self {
            program: "ping".into(),
            count: count.max(1),
            timeout,
            retries,
            retry_delay: RETRY_DELAY,
        }
    }

    /// Uses `program` in place of `ping`. It receives the same arguments.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn args(&self, host: &str) -> [String; 3] {
        let flag = if cfg!(windows) { "-n" } else { "-c" };
        [flag.into(), self.count.to_string(), host.into()]
    }

    // Ok(None) when the program ran but printed no usable round-trip time
    async fn attempt(&self, host: &str) -> Result<Option<f64>, ProbeError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args(host)).kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return Err(ProbeError::Spawn {
                    program: self.program.clone(),
                    source,
                });
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "ping timed out");
                return Ok(None);
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let parsed = parse(&stdout);
        tracing::debug!(
            status = %output.status,
            transmitted = ?parsed.transmitted,
            received = ?parsed.received,
            loss = ?parsed.loss_percent(),
            rtt = ?parsed.rtt(),
            "ping finished"
        );
        if parsed.rtt().is_none() && !output.stderr.is_empty() {
            tracing::debug!(stderr = %String::from_utf8_lossy(&output.stderr).trim(), "ping stderr");
        }
        Ok(parsed.rtt())
    }
}

#[async_trait::async_trait]
impl Probe for SystemPing {
    async fn measure(&self, host: &str) -> Result<f64, ProbeError> {
        let attempts = self.retries.saturating_add(1);
        for n in 1..=attempts {
            if let Some(rtt) = self.attempt(host).await? {
                return Ok(rtt);
            }
            if n < attempts {
                tracing::warn!(attempt = n, "error during ping, retrying");
                tokio::time::sleep(self.retry_delay).await;
            }
        }
        Err(ProbeError::Malformed { attempts })
    }
}
