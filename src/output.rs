use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

pub const CSV_HEADER: &str = "time,latency";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\-. ]").expect("valid regex"));

/// Strips characters that are awkward in file names and turns spaces into `_`.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    UNSAFE_CHARS.replace_all(name, "").replace(' ', "_")
}

/// Where one run writes its samples and chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub csv: PathBuf,
    pub chart: PathBuf,
}

impl OutputPaths {
    /// Creates `dir` if needed. `timestamp` is used verbatim in both names.
    pub fn new(dir: &Path, label: &str, timestamp: &str) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let label = sanitize_filename(label);
        Ok(Self {
            csv: dir.join(format!("ping_data_{label}_{timestamp}.csv")),
            chart: dir.join(format!("ping_plot_{label}_{timestamp}.png")),
        })
    }
}

/// Append-only CSV of `(elapsed seconds, latency ms)` rows.
#[derive(Debug, Clone)]
pub struct CsvLog {
    path: PathBuf,
}

impl CsvLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    pub fn append(&self, time: f64, latency: f64) -> io::Result<()> {
        let fresh = !self.path.is_file();
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if fresh {
            writeln!(f, "{CSV_HEADER}")?;
        }
        writeln!(f, "{time:.3},{latency:.3}")
    }
}
