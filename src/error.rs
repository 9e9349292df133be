//! Error taxonomy for the sales pipeline and the reporting queries.
//!
//! ETL errors abort the batch run. [`SalesError::EmptyResult`] is the only
//! variant the reporting layer produces, and [`crate::report::build_report`]
//! turns it into a placeholder rather than propagating it.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SalesError {
    /// Input path does not exist.
    #[error("File not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// Input is not readable as a sales table, or a value could not be parsed.
    #[error("Parse error{}: {message}", .line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    Parse { line: Option<u64>, message: String },

    /// Output path could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Table could not be encoded as CSV in memory.
    #[error("Failed to encode CSV: {0}")]
    Encode(#[source] std::io::Error),

    /// An aggregation was asked of an empty table.
    #[error("No rows to compute {0}")]
    EmptyResult(&'static str),

    /// Report could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid environment setting.
    #[error("Invalid value for {key}: {value:?}")]
    Config { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, SalesError>;

impl SalesError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        SalesError::Parse {
            line: None,
            message: message.into(),
        }
    }

    pub(crate) fn write(path: &Path, source: std::io::Error) -> Self {
        SalesError::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Maps an error from opening `path` for reading.
    pub(crate) fn open(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            SalesError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SalesError::parse(format!("{}: {err}", path.display()))
        }
    }
}

impl From<csv::Error> for SalesError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line());
        SalesError::Parse {
            line,
            message: err.to_string(),
        }
    }
}
