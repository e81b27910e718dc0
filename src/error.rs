// src/error.rs

use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use std::{io, path::PathBuf};
use thiserror::Error;

/// Every failure an operator can raise. Nothing is retried or defaulted.
#[derive(Debug, Error)]
pub enum SalesError {
    #[error("column `{0}` not found in table")]
    MissingColumn(String),

    #[error("column `{column}` holds {data_type}, expected a numeric type")]
    NonNumericColumn { column: String, data_type: DataType },

    #[error("invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: i64, max: i64 },

    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("unrecognized month `{0}`")]
    UnknownMonth(String),

    #[error("null value in column `{column}` at row {row}")]
    NullValue { column: String, row: usize },

    #[error(transparent)]
    Arrow(#[from] ArrowError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("i/o failure on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SalesError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SalesError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = SalesError> = std::result::Result<T, E>;
