//! Startup errors. Per-file problems never surface here; they become findings.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReferenceDataError {
    #[error("failed to parse {dataset} reference table: {source}")]
    Parse {
        dataset: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse schema '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to compile schema '{}': {message}", path.display())]
    Compile { path: PathBuf, message: String },
}
