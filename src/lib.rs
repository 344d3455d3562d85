#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::empty_docs,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod chart;
mod config;
mod error;
pub mod isp;
mod monitor;
pub mod output;
pub mod probe;
mod stats;

pub use chart::{ChartStyle, ChartTitle};
pub use config::{Config, DEFAULT_ISP_URL};
pub use error::{ChartError, IspError, MonitorError, ProbeError};
pub use monitor::{Monitor, Report, StopReason};
pub use output::{CsvLog, OutputPaths};
pub use probe::{Probe, SystemPing};
pub use stats::{LatencySeries, Summary};
