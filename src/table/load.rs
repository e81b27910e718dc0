// src/table/load.rs

use crate::error::{Result, SalesError};
use crate::table::{
    utils::{clean_cell, infer_arrow_dtype_from_str, widen_dtype},
    SalesTable,
};
use arrow::{
    array::{ArrayRef, Float64Array, Int64Array, StringArray},
    datatypes::DataType,
};
use csv::{ReaderBuilder, Trim};
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
    sync::Arc,
};
use tracing::debug;

#[derive(Debug)]
pub struct RawTable {
    /// Column names, from the header line.
    pub headers: Vec<String>,
    /// Each data line, as a Vec of cleaned Strings (one per field).
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Infer a dtype for column `idx` from its non-empty cells. A column with
    /// no values at all stays Utf8.
    fn infer_column_type(&self, idx: usize) -> DataType {
        self.rows
            .iter()
            .map(|r| r[idx].as_str())
            .filter(|v| !v.is_empty())
            .map(infer_arrow_dtype_from_str)
            .reduce(|a, b| widen_dtype(&a, &b))
            .unwrap_or(DataType::Utf8)
    }

    fn build_column(&self, idx: usize, ty: &DataType) -> ArrayRef {
        let cells = self.rows.iter().map(|r| r[idx].as_str());
        match ty {
            DataType::Int64 => Arc::new(
                cells
                    .map(|v| v.parse::<i64>().ok())
                    .collect::<Int64Array>(),
            ),
            DataType::Float64 => Arc::new(
                cells
                    .map(|v| v.parse::<f64>().ok())
                    .collect::<Float64Array>(),
            ),
            _ => Arc::new(
                cells
                    .map(|v| (!v.is_empty()).then_some(v))
                    .collect::<StringArray>(),
            ),
        }
    }

    /// Convert the string cells into a typed table.
    pub fn into_table(self) -> Result<SalesTable> {
        let columns: Vec<(String, ArrayRef)> = self
            .headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let ty = self.infer_column_type(idx);
                debug!(column = %name, dtype = %ty, "inferred column type");
                (name.clone(), self.build_column(idx, &ty))
            })
            .collect();
        SalesTable::try_from_columns(columns)
    }
}

/// Parse a headed, comma-delimited CSV stream into a [`SalesTable`].
///
/// Cells are trimmed and stripped of outer quotes; empty cells become nulls.
/// Each column is typed Int64, Float64 or Utf8 from its values.
#[tracing::instrument(level = "debug", skip(reader))]
pub fn read_csv<R: Read>(reader: R) -> Result<SalesTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| clean_cell(h).to_string())
        .collect();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(|c| clean_cell(c).to_string()).collect());
    }

    let raw = RawTable { headers, rows };
    debug!(
        columns = raw.headers.len(),
        rows = raw.rows.len(),
        "parsed csv"
    );
    raw.into_table()
}

/// Open `path` and parse it with [`read_csv`].
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<SalesTable> {
    let file = File::open(&path).map_err(|e| SalesError::io(path.as_ref(), e))?;
    read_csv(BufReader::new(file))
}
