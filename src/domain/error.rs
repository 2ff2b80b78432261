use std::fmt;

#[derive(Debug)]
pub enum ReportError {
    /// Network or endpoint error on the read path.
    Fetch(String),
    /// Export submission error.
    Export(String),
    /// Bad construction-time configuration, e.g. an unknown default sort key.
    Config(String),
    /// Payload did not match the expected shape.
    Parse(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Fetch(msg) => write!(f, "Fetch error: {}", msg),
            ReportError::Export(msg) => write!(f, "Export error: {}", msg),
            ReportError::Config(msg) => write!(f, "Config error: {}", msg),
            ReportError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ReportError {}

impl From<reqwest::Error> for ReportError {
    fn from(err: reqwest::Error) -> Self {
        ReportError::Fetch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
