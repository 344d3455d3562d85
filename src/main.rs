#![warn(clippy::all, clippy::pedantic)]

use std::{path::PathBuf, process::ExitCode, time::Duration};

use chrono::Local;
use clap::Parser;
use ping_plot::{
    ChartStyle, Config, DEFAULT_ISP_URL, Monitor, MonitorError, OutputPaths, StopReason,
    SystemPing, isp, output::TIMESTAMP_FORMAT,
};
use tracing_subscriber::EnvFilter;

const ISP_TIMEOUT: Duration = Duration::from_secs(5);

/// Visualize ping latency over time.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Target host (e.g. example.com)
    host: String,

    /// Interval between pings in seconds
    #[arg(short, long, default_value_t = 1)]
    interval: u64,

    /// Duration of the test in seconds
    #[arg(short, long, default_value_t = 60)]
    duration: u64,

    /// Draw the chart on a dark background
    #[arg(short = 'm', long, alias = "dark_mode")]
    dark_mode: bool,

    /// Width of the plot in inches
    #[arg(short, long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Height of the plot in inches
    #[arg(short = 'H', long, alias = "ht", default_value_t = 6, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Echo requests sent per sample
    #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,

    /// Directory for the CSV and PNG files
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Extra ping attempts when the output has no round-trip time
    #[arg(long, default_value_t = 1)]
    retries: u32,

    /// Seconds to wait for one ping invocation
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Do not look up the ISP of the current network
    #[arg(long)]
    no_isp_lookup: bool,

    /// Endpoint returning the public ip and organisation as JSON
    #[arg(long, default_value = DEFAULT_ISP_URL)]
    isp_url: String,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            host: args.host,
            interval: Duration::from_secs(args.interval),
            duration: Duration::from_secs(args.duration),
            count: args.count,
            retries: args.retries,
            timeout: Duration::from_secs(args.timeout),
            output_dir: args.output_dir,
            chart: ChartStyle {
                dark_mode: args.dark_mode,
                width_in: args.width,
                height_in: args.height,
            },
            isp_url: (!args.no_isp_lookup).then_some(args.isp_url),
        }
    }
}

async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("cannot listen for Ctrl-C, running until the duration elapses");
        std::future::pending::<()>().await;
    }
}

async fn run(config: Config) -> Result<StopReason, MonitorError> {
    config.validate()?;

    let label = isp::label_for(config.isp_url.as_deref(), ISP_TIMEOUT).await;
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let paths = OutputPaths::new(&config.output_dir, &label, &timestamp)?;
    let probe = SystemPing::new(config.count, config.timeout, config.retries);

    tracing::info!("running, use Ctrl-C to exit the program");
    let report = Monitor::new(config, probe, label, paths).run(ctrl_c()).await?;

    if report.stop == StopReason::Interrupted {
        tracing::info!("program interrupted by user");
    }
    match report.summary {
        Some(summary) => {
            tracing::info!(samples = summary.count, "{summary}");
            tracing::info!(
                "finished! plot saved to {} and data saved to {}",
                report.chart.display(),
                report.csv.display()
            );
        }
        None => tracing::info!("finished without collecting any samples"),
    }
    Ok(report.stop)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ping_plot=info")),
        )
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();

    match run(args.into()).await {
        Ok(StopReason::ProbeFailed(_)) => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "exiting");
            ExitCode::FAILURE
        }
    }
}
