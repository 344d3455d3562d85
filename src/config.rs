use std::{path::PathBuf, time::Duration};

use crate::{chart::ChartStyle, error::MonitorError};

pub const DEFAULT_ISP_URL: &str = "https://ipinfo.io/json";

/// Settings for one monitoring run.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    /// Pause between the end of one sample and the start of the next.
    pub interval: Duration,
    /// Total run time; no sample is started once it has elapsed.
    pub duration: Duration,
    /// Echo requests per ping invocation.
    pub count: u32,
    /// Extra attempts after a ping run without a round-trip time.
    pub retries: u32,
    pub timeout: Duration,
    pub output_dir: PathBuf,
    pub chart: ChartStyle,
    /// `None` disables the network identity lookup.
    pub isp_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::new(),
            interval: Duration::from_secs(1),
            duration: Duration::from_secs(60),
            count: 2,
            retries: 1,
            timeout: Duration::from_secs(10),
            output_dir: PathBuf::from("output"),
            chart: ChartStyle::default(),
            isp_url: Some(DEFAULT_ISP_URL.to_string()),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.host.trim().is_empty() {
            return Err(MonitorError::Config("host must not be empty".into()));
        }
        if self.count == 0 {
            return Err(MonitorError::Config("count must be at least 1".into()));
        }
        if self.timeout.is_zero() {
            return Err(MonitorError::Config("timeout must be non-zero".into()));
        }
        if self.chart.width_in == 0 || self.chart.height_in == 0 {
            return Err(MonitorError::Config("chart size must be non-zero".into()));
        }
        Ok(())
    }
}
