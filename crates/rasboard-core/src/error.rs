// Error types shared across the dataset, loader, and config layers.
//
// Missing optional values are never errors: they are `None` on the record
// and rendered as "N/A".

use std::path::PathBuf;

use thiserror::Error;

/// A caller passed something the dataset operations do not accept.
///
/// These are programming errors at the call boundary (a bad column name
/// from a key binding, a zero page size from config), not data problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("value `{value}` is not valid for field `{field}`")]
    InvalidFilterValue { field: String, value: String },

    #[error("page size must be greater than 0")]
    InvalidPageSize,
}

/// Loading an external data resource failed.
///
/// Reported to the user as an inline message; the dataset stays empty.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP error! Status: {status} ({url})")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        source: serde_json::Error,
    },

    #[error("CSV error in {origin}: {source}")]
    Csv { origin: String, source: csv::Error },
}
