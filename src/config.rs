// src/config.rs

use crate::table::columns;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

/// Column names and output location for a report run.
///
/// Only `product_columns` is required in JSON; everything else falls back to
/// the operator defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub product_columns: Vec<String>,
    #[serde(default = "default_month_column")]
    pub month_column: String,
    #[serde(default = "default_quarter_column")]
    pub quarter_column: String,
    #[serde(default = "default_max_product_column")]
    pub max_product_column: String,
    #[serde(default = "default_min_product_column")]
    pub min_product_column: String,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Reject unrecognized month labels instead of filing them under Q4.
    #[serde(default)]
    pub strict_months: bool,
}

fn default_month_column() -> String {
    columns::MONTH.to_string()
}

fn default_quarter_column() -> String {
    columns::QUARTER.to_string()
}

fn default_max_product_column() -> String {
    columns::MAX_SALES_PRODUCT.to_string()
}

fn default_min_product_column() -> String {
    columns::MIN_SALES_PRODUCT.to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("data/output.csv")
}

impl AnalyticsConfig {
    pub fn new<I, S>(product_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            product_columns: product_columns.into_iter().map(Into::into).collect(),
            month_column: default_month_column(),
            quarter_column: default_quarter_column(),
            max_product_column: default_max_product_column(),
            min_product_column: default_min_product_column(),
            output_path: default_output_path(),
            strict_months: false,
        }
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Read a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("opening config {:?}", path))?;
        serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parsing config {:?}", path))
    }
}
