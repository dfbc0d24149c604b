use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while reading the emissions dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("parsing JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("reading parquet {path}: {source}")]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("decoding parquet batch in {path}: {source}")]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },

    #[error("{path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{path}, row {row}: invalid '{column}' value {value:?}")]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("{path} contains no records")]
    NoRecords { path: PathBuf },

    #[error("unsupported file extension: .{extension}")]
    UnsupportedFormat { extension: String },
}
