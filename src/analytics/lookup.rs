use crate::error::{Result, SalesError};
use crate::table::{group_rows, require_products, SalesTable};
use arrow::array::Array;
use tracing::debug;

/// First candidate holding the largest value. NaN never wins.
fn first_max<K>(candidates: impl IntoIterator<Item = (K, f64)>) -> Option<(K, f64)> {
    let mut best: Option<(K, f64)> = None;
    for (k, v) in candidates {
        if v.is_nan() {
            continue;
        }
        match &best {
            Some((_, b)) if v <= *b => {}
            _ => best = Some((k, v)),
        }
    }
    best
}

fn require_rows(table: &SalesTable, what: &str) -> Result<()> {
    if table.num_rows() == 0 {
        return Err(SalesError::EmptyInput(format!("{} on a table with no rows", what)));
    }
    Ok(())
}

/// The month label and value of the row with the highest `total_column`.
/// Ties go to the earliest row; null totals are ignored.
#[tracing::instrument(level = "debug", skip(table))]
pub fn best_month(
    table: &SalesTable,
    month_column: &str,
    total_column: &str,
) -> Result<(String, f64)> {
    require_rows(table, "best month")?;
    let months = table.string_column(month_column)?;
    let totals = table.numeric_column(total_column)?;

    let (row, value) = first_max(
        (0..totals.len())
            .filter(|&r| totals.is_valid(r))
            .map(|r| (r, totals.value(r))),
    )
    .ok_or_else(|| SalesError::EmptyInput(format!("no values in `{}`", total_column)))?;

    if months.is_null(row) {
        return Err(SalesError::NullValue {
            column: month_column.to_string(),
            row,
        });
    }
    debug!(row, value, "best month");
    Ok((months.value(row).to_string(), value))
}

/// The product with the greatest column sum, and that sum. Ties go to the
/// earliest name in `product_columns`.
#[tracing::instrument(level = "debug", skip(table))]
pub fn best_product<S: AsRef<str> + std::fmt::Debug>(
    table: &SalesTable,
    product_columns: &[S],
) -> Result<(String, f64)> {
    require_products(product_columns)?;
    require_rows(table, "best product")?;
    let values = table.numeric_columns(product_columns)?;

    let sums = product_columns
        .iter()
        .zip(&values)
        .map(|(name, col)| (name.as_ref(), col.iter().flatten().filter(|v| !v.is_nan()).sum()));
    let (name, sum) = first_max(sums)
        .ok_or_else(|| SalesError::EmptyInput("no product sums".into()))?;
    Ok((name.to_string(), sum))
}

/// The quarter whose summed `total_column` is greatest, and that sum. Groups
/// are visited in ascending label order; ties go to the first.
#[tracing::instrument(level = "debug", skip(table))]
pub fn best_quarter(
    table: &SalesTable,
    quarter_column: &str,
    total_column: &str,
) -> Result<(String, f64)> {
    require_rows(table, "best quarter")?;
    let quarters = table.string_column(quarter_column)?;
    let totals = table.numeric_column(total_column)?;

    let groups = group_rows(&quarters);
    let sums = groups.into_iter().map(|(label, rows)| {
        let sum: f64 = rows
            .into_iter()
            .filter(|&r| totals.is_valid(r))
            .map(|r| totals.value(r))
            .sum();
        (label, sum)
    });
    first_max(sums)
        .ok_or_else(|| SalesError::EmptyInput(format!("no labels in `{}`", quarter_column)))
}
