use std::{fmt, io};

/// Errors that can occur while measuring a round-trip time.
#[derive(Debug)]
pub enum ProbeError {
    /// The ping program could not be started.
    Spawn {
        /// The program that was invoked.
        program: String,
        /// The underlying OS error.
        source: io::Error,
    },
    /// No round-trip time could be read from any attempt.
    Malformed {
        /// Number of invocations made before giving up.
        attempts: u32,
    },
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn { program, source } => write!(f, "failed to run `{program}`: {source}"),
            Self::Malformed { attempts } => {
                write!(f, "no round-trip time in ping output after {attempts} attempt(s)")
            }
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            Self::Malformed { .. } => None,
        }
    }
}

/// Errors that can occur when looking up the network identity.
#[derive(Debug)]
pub enum IspError {
    /// The lookup URL could not be parsed.
    InvalidUrl(url::ParseError),
    /// The HTTP request failed or returned a non-success status.
    Request(reqwest::Error),
    /// The response has no usable value for the named field.
    MissingField(&'static str),
}

impl fmt::Display for IspError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(e) => write!(f, "invalid lookup url: {e}"),
            Self::Request(e) => write!(f, "lookup request failed: {e}"),
            Self::MissingField(field) => write!(f, "lookup response has no `{field}`"),
        }
    }
}

impl std::error::Error for IspError {}

impl From<url::ParseError> for IspError {
    fn from(e: url::ParseError) -> Self { Self::InvalidUrl(e) }
}

impl From<reqwest::Error> for IspError {
    fn from(e: reqwest::Error) -> Self { Self::Request(e) }
}

/// Chart drawing failed. Carries the backend's message.
#[derive(Debug)]
pub struct ChartError(pub String);

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "chart: {}", self.0) }
}

impl std::error::Error for ChartError {}

/// Fatal errors that end a monitoring run.
#[derive(Debug)]
pub enum MonitorError {
    /// Creating the output directory or writing samples failed.
    Io(io::Error),
    /// The configuration cannot be used.
    Config(String),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "output: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Config(_) => None,
        }
    }
}

impl From<io::Error> for MonitorError {
    fn from(e: io::Error) -> Self { Self::Io(e) }
}
