// src/analytics/pivot.rs

use crate::error::Result;
use crate::table::{columns, group_rows, require_products, SalesTable};
use arrow::{
    array::{new_null_array, Array, ArrayRef, Float64Array, StringArray},
    compute::{cast, concat},
};
use std::{iter, path::Path, sync::Arc};
use tracing::{debug, info};

/// How a quarter group collapses into one value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aggregation {
    /// Mean of the non-null cells; null when a group has none.
    Mean,
    /// Sum of the non-null cells; 0 when a group has none.
    Sum,
}

impl Aggregation {
    fn apply(&self, col: &Float64Array, rows: &[usize]) -> Option<f64> {
        let (sum, n) = rows
            .iter()
            .filter(|&&r| col.is_valid(r))
            .fold((0.0, 0usize), |(s, n), &r| (s + col.value(r), n + 1));
        match self {
            Aggregation::Sum => Some(sum),
            Aggregation::Mean => (n > 0).then(|| sum / n as f64),
        }
    }
}

/// Group by `quarter_column` and aggregate `product_columns` plus
/// `Total_Sales`. One row per distinct quarter, in ascending label order.
#[tracing::instrument(level = "debug", skip(table, product_columns))]
pub fn pivot_sales_per_quarter<S: AsRef<str>>(
    table: &SalesTable,
    product_columns: &[S],
    quarter_column: &str,
    agg: Aggregation,
) -> Result<SalesTable> {
    require_products(product_columns)?;
    let quarters = table.string_column(quarter_column)?;
    let value_names: Vec<&str> = product_columns
        .iter()
        .map(|p| p.as_ref())
        .chain(iter::once(columns::TOTAL_SALES))
        .collect();
    let values = table.numeric_columns(&value_names)?;
    let groups = group_rows(&quarters);

    let labels: StringArray = groups.keys().map(|k| Some(k.as_str())).collect();
    let mut out: Vec<(String, ArrayRef)> =
        vec![(quarter_column.to_string(), Arc::new(labels) as ArrayRef)];
    for (name, col) in value_names.iter().zip(&values) {
        let agg_col: Float64Array = groups
            .values()
            .map(|rows| agg.apply(col, rows))
            .collect();
        out.push((name.to_string(), Arc::new(agg_col) as ArrayRef));
    }

    debug!(?agg, groups = groups.len(), "pivoted per quarter");
    SalesTable::try_from_columns(out)
}

/// Mean of each product and `Total_Sales` per quarter.
#[tracing::instrument(level = "debug", skip(table))]
pub fn pivot_avg_sales_per_quarter<S: AsRef<str> + std::fmt::Debug>(
    table: &SalesTable,
    product_columns: &[S],
    quarter_column: &str,
) -> Result<SalesTable> {
    pivot_sales_per_quarter(table, product_columns, quarter_column, Aggregation::Mean)
}

/// Sum of each product and `Total_Sales` per quarter.
#[tracing::instrument(level = "debug", skip(table))]
pub fn pivot_total_sales_per_quarter<S: AsRef<str> + std::fmt::Debug>(
    table: &SalesTable,
    product_columns: &[S],
    quarter_column: &str,
) -> Result<SalesTable> {
    pivot_sales_per_quarter(table, product_columns, quarter_column, Aggregation::Sum)
}

/// Stack `avg` over `total` with a leading `Type` column (`Average` then
/// `Total`). Columns are aligned by name: `avg`'s order first, then any
/// column only `total` has; cells a side lacks are null.
#[tracing::instrument(level = "debug", skip(avg, total))]
pub fn combine_summaries(avg: &SalesTable, total: &SalesTable) -> Result<SalesTable> {
    let mut names: Vec<String> = avg.column_names();
    for name in total.column_names() {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names.retain(|n| n != columns::TYPE);

    let tags: StringArray = iter::repeat("Average")
        .take(avg.num_rows())
        .chain(iter::repeat("Total").take(total.num_rows()))
        .map(Some)
        .collect();
    let mut out: Vec<(String, ArrayRef)> =
        vec![(columns::TYPE.to_string(), Arc::new(tags) as ArrayRef)];

    for name in names {
        let (top, bottom) = match (avg.column(&name).ok(), total.column(&name).ok()) {
            (Some(a), Some(t)) if a.data_type() == t.data_type() => (Arc::clone(a), Arc::clone(t)),
            (Some(a), Some(t)) => (Arc::clone(a), cast(t, a.data_type())?),
            (Some(a), None) => (Arc::clone(a), new_null_array(a.data_type(), total.num_rows())),
            (None, Some(t)) => (new_null_array(t.data_type(), avg.num_rows()), Arc::clone(t)),
            (None, None) => continue,
        };
        let stacked = concat(&[top.as_ref(), bottom.as_ref()])?;
        out.push((name, stacked));
    }

    SalesTable::try_from_columns(out)
}

/// Combine the two summaries and write them to `path` as CSV.
/// Returns the combined table.
#[tracing::instrument(level = "info", skip(avg, total, path), fields(path = %path.as_ref().display()))]
pub fn save_combined_summary<P: AsRef<Path>>(
    avg: &SalesTable,
    total: &SalesTable,
    path: P,
) -> Result<SalesTable> {
    let combined = combine_summaries(avg, total)?;
    crate::table::write_csv(&combined, &path)?;
    info!(
        average_rows = avg.num_rows(),
        total_rows = total.num_rows(),
        "saved combined summary"
    );
    Ok(combined)
}
