use std::{path::PathBuf, time::Instant};

use chrono::Local;

use crate::{
    chart::{self, ChartTitle},
    config::Config,
    error::MonitorError,
    output::{CsvLog, OutputPaths},
    probe::Probe,
    stats::{LatencySeries, Summary},
};

const TITLE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Why a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The configured duration passed.
    Elapsed,
    /// The shutdown future resolved.
    Interrupted,
    /// No round-trip time could be measured. Carries the probe error.
    ProbeFailed(String),
}

/// Outcome of a finished run.
#[derive(Debug, Clone)]
pub struct Report {
    pub series: LatencySeries,
    pub summary: Option<Summary>,
    pub csv: PathBuf,
    pub chart: PathBuf,
    pub stop: StopReason,
}

pub struct Monitor<P: Probe> {
    config: Config,
    probe: P,
    isp: String,
    paths: OutputPaths,
}

impl<P: Probe> Monitor<P> {
    pub fn new(config: Config, probe: P, isp: impl Into<String>, paths: OutputPaths) -> Self {
        Self {
            config,
            probe,
            isp: isp.into(),
            paths,
        }
    }

    /// Samples until the duration elapses, the probe gives up, or `shutdown` resolves.
    #[tracing::instrument(name = "monitor", skip_all, fields(host = %self.config.host))]
    pub async fn run(&self, shutdown: impl Future<Output = ()>) -> Result<Report, MonitorError> {
        self.config.validate()?;
        tokio::pin!(shutdown);

        let csv = CsvLog::new(&self.paths.csv);
        let mut series = LatencySeries::new();
        let start = Instant::now();
        let mut stop = StopReason::Elapsed;

        while start.elapsed() < self.config.duration {
            let time = start.elapsed().as_secs_f64();

            let measured = tokio::select! {
                r = self.probe.measure(&self.config.host) => r,
                () = &mut shutdown => {
                    stop = StopReason::Interrupted;
                    break;
                }
            };
            let latency = match measured {
                Ok(latency) => latency,
                Err(e) => {
                    tracing::error!(error = %e, "ping failed");
                    stop = StopReason::ProbeFailed(e.to_string());
                    break;
                }
            };

            let summary = series.push(time, latency);
            self.record(&csv, &series, &summary, time)?;

            tokio::select! {
                () = tokio::time::sleep(self.config.interval) => {}
                () = &mut shutdown => {
                    stop = StopReason::Interrupted;
                    break;
                }
            }
        }

        tracing::info!(samples = series.len(), stop = ?stop, "run finished");
        Ok(Report {
            summary: series.summary(),
            series,
            csv: self.paths.csv.clone(),
            chart: self.paths.chart.clone(),
            stop,
        })
    }

    fn record(
        &self,
        csv: &CsvLog,
        series: &LatencySeries,
        summary: &Summary,
        time: f64,
    ) -> Result<(), MonitorError> {
        let latency = summary.last;
        tracing::info!(
            time,
            latency,
            min = summary.min,
            max = summary.max,
            avg = summary.avg,
            jitter = summary.jitter,
            "sample"
        );

        csv.append(time, latency)?;

        let now = Local::now().format(TITLE_DATETIME_FORMAT).to_string();
        let title = ChartTitle::new(&self.config.host, &now, &self.isp, &summary.to_string());
        if let Err(e) = chart::render(&self.paths.chart, series, &title, &self.config.chart) {
            tracing::warn!(error = %e, path = %self.paths.chart.display(), "failed to save plot");
        }
        Ok(())
    }
}
