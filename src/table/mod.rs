// src/table/mod.rs

pub mod load;
pub mod utils;
pub mod write;

pub use load::{load_csv, read_csv, RawTable};
pub use write::write_csv;

use crate::error::{Result, SalesError};
use arrow::{
    array::{Array, ArrayRef, Float64Array, StringArray},
    compute::cast,
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
    record_batch::RecordBatch,
};
use std::{collections::BTreeMap, sync::Arc};

/// Well-known column names produced by the derivation operators.
pub mod columns {
    pub const MONTH: &str = "Month";
    pub const QUARTER: &str = "Quarter";
    pub const TOTAL_SALES: &str = "Total_Sales";
    pub const AVERAGE_SALES: &str = "Average_Sales";
    pub const MOM_GROWTH: &str = "Month_over_Month_Growth";
    pub const MAX_SALES_PRODUCT: &str = "Max_Sales_Product";
    pub const MIN_SALES_PRODUCT: &str = "Min_Sales_Product";
    pub const TYPE: &str = "Type";
}

/// A row-ordered, column-named sales table backed by a single Arrow batch.
///
/// Lookups go through the column name and fail with
/// [`SalesError::MissingColumn`] instead of yielding nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesTable {
    batch: RecordBatch,
}

impl SalesTable {
    /// Build a table from `(name, array)` pairs, in order. All arrays must
    /// have the same length.
    pub fn try_from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ArrayRef)>,
        S: Into<String>,
    {
        let (fields, arrays): (Vec<Field>, Vec<ArrayRef>) = columns
            .into_iter()
            .map(|(name, arr)| (Field::new(name, arr.data_type().clone(), true), arr))
            .unzip();
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        Ok(Self { batch })
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema().index_of(name).is_ok()
    }

    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        let idx = self
            .batch
            .schema()
            .index_of(name)
            .map_err(|_| SalesError::MissingColumn(name.to_string()))?;
        Ok(self.batch.column(idx))
    }

    /// Read a numeric column widened to `Float64`.
    pub fn numeric_column(&self, name: &str) -> Result<Float64Array> {
        let arr = self.column(name)?;
        if !arr.data_type().is_numeric() {
            return Err(SalesError::NonNumericColumn {
                column: name.to_string(),
                data_type: arr.data_type().clone(),
            });
        }
        let widened = cast(arr, &DataType::Float64)?;
        widened
            .as_any()
            .downcast_ref::<Float64Array>()
            .cloned()
            .ok_or_else(|| cast_failure(name, &DataType::Float64))
    }

    /// Read every named column as `Float64`, failing on the first missing or
    /// non-numeric one.
    pub fn numeric_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Float64Array>> {
        names
            .iter()
            .map(|n| self.numeric_column(n.as_ref()))
            .collect()
    }

    /// Read a column as UTF-8 strings, casting non-string types.
    pub fn string_column(&self, name: &str) -> Result<StringArray> {
        let arr = self.column(name)?;
        let utf8 = match arr.data_type() {
            DataType::Utf8 => Arc::clone(arr),
            _ => cast(arr, &DataType::Utf8)?,
        };
        utf8.as_any()
            .downcast_ref::<StringArray>()
            .cloned()
            .ok_or_else(|| cast_failure(name, &DataType::Utf8))
    }

    /// Set `name` to `values`. An existing column of that name is replaced
    /// in place; otherwise the column is appended.
    pub fn with_column(self, name: &str, values: ArrayRef) -> Result<Self> {
        let schema = self.batch.schema();
        let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
        let mut arrays: Vec<ArrayRef> = self.batch.columns().to_vec();
        let field = Field::new(name, values.data_type().clone(), true);

        match schema.index_of(name) {
            Ok(idx) => {
                fields[idx] = field;
                arrays[idx] = values;
            }
            Err(_) => {
                fields.push(field);
                arrays.push(values);
            }
        }

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        Ok(Self { batch })
    }
}

fn cast_failure(column: &str, to: &DataType) -> SalesError {
    ArrowError::CastError(format!("column `{}` did not cast to {}", column, to)).into()
}

/// Group row indices by label. Null labels are dropped; groups iterate in
/// lexicographic label order, which for `Q1`..`Q4` is chronological.
pub(crate) fn group_rows(labels: &StringArray) -> BTreeMap<String, Vec<usize>> {
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (row, label) in labels.iter().enumerate() {
        if let Some(label) = label {
            groups.entry(label.to_string()).or_default().push(row);
        }
    }
    groups
}

/// Fail with `EmptyInput` when no product columns were named.
pub(crate) fn require_products<S: AsRef<str>>(product_columns: &[S]) -> Result<()> {
    if product_columns.is_empty() {
        return Err(SalesError::EmptyInput("no product columns given".into()));
    }
    Ok(())
}
