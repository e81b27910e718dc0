// src/analytics/derive.rs

use crate::analytics::quarter::Quarter;
use crate::error::Result;
use crate::table::{columns, require_products, SalesTable};
use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use std::{cmp::Ordering, sync::Arc};
use tracing::{debug, warn};

/// Non-null, non-NaN product values of one row, paired with their column index.
fn row_values(values: &[Float64Array], row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
    values
        .iter()
        .enumerate()
        .filter(move |(_, col)| col.is_valid(row))
        .map(move |(i, col)| (i, col.value(row)))
        .filter(|(_, v)| !v.is_nan())
}

/// Add `Total_Sales`: the row-wise sum of `product_columns`. Null cells are
/// skipped, so a row with no values totals 0.
#[tracing::instrument(level = "debug", skip(table))]
pub fn add_total_sales<S: AsRef<str> + std::fmt::Debug>(
    table: SalesTable,
    product_columns: &[S],
) -> Result<SalesTable> {
    require_products(product_columns)?;
    let values = table.numeric_columns(product_columns)?;
    let totals: Float64Array = (0..table.num_rows())
        .map(|row| Some(row_values(&values, row).map(|(_, v)| v).sum::<f64>()))
        .collect();
    debug!(rows = totals.len(), "derived total sales");
    table.with_column(columns::TOTAL_SALES, Arc::new(totals))
}

/// Add `Average_Sales`: the row-wise mean of `product_columns` over the
/// non-null cells. A row with no values gets null.
#[tracing::instrument(level = "debug", skip(table))]
pub fn add_average_sales<S: AsRef<str> + std::fmt::Debug>(
    table: SalesTable,
    product_columns: &[S],
) -> Result<SalesTable> {
    require_products(product_columns)?;
    let values = table.numeric_columns(product_columns)?;
    let averages: Float64Array = (0..table.num_rows())
        .map(|row| {
            let (sum, n) = row_values(&values, row)
                .fold((0.0, 0usize), |(s, n), (_, v)| (s + v, n + 1));
            (n > 0).then(|| sum / n as f64)
        })
        .collect();
    table.with_column(columns::AVERAGE_SALES, Arc::new(averages))
}

/// Add `Month_over_Month_Growth` = 100 × (Totalᵢ − Totalᵢ₋₁) / Totalᵢ₋₁ in
/// table order. Row 0, and any row next to a null total, is null. A zero
/// predecessor gives ±inf or NaN.
#[tracing::instrument(level = "debug", skip(table))]
pub fn add_mom_growth(table: SalesTable) -> Result<SalesTable> {
    let totals = table.numeric_column(columns::TOTAL_SALES)?;
    let growth: Float64Array = (0..totals.len())
        .map(|row| {
            if row == 0 || totals.is_null(row) || totals.is_null(row - 1) {
                return None;
            }
            let (prev, cur) = (totals.value(row - 1), totals.value(row));
            Some(100.0 * (cur - prev) / prev)
        })
        .collect();
    table.with_column(columns::MOM_GROWTH, Arc::new(growth))
}

/// Add `quarter_column` from `month_column`: Jan–Mar → Q1, Apr–Jun → Q2,
/// Jul–Sep → Q3, everything else (null included) → Q4.
#[tracing::instrument(level = "debug", skip(table))]
pub fn map_month_to_quarter(
    table: SalesTable,
    month_column: &str,
    quarter_column: &str,
) -> Result<SalesTable> {
    let months = table.string_column(month_column)?;
    let mut unrecognized = 0usize;
    let quarters: StringArray = months
        .iter()
        .map(|m| {
            let m = m.unwrap_or_default();
            let q = Quarter::from_month(m);
            if q == Quarter::Q4 && !matches!(m, "Oct" | "Nov" | "Dec") {
                unrecognized += 1;
            }
            Some(q.as_str())
        })
        .collect();
    if unrecognized > 0 {
        warn!(
            column = month_column,
            count = unrecognized,
            "unrecognized month labels mapped to Q4"
        );
    }
    table.with_column(quarter_column, Arc::new(quarters))
}

/// Strict form of [`map_month_to_quarter`]: any label outside Jan..Dec,
/// or a null, fails with `UnknownMonth`.
#[tracing::instrument(level = "debug", skip(table))]
pub fn map_month_to_quarter_strict(
    table: SalesTable,
    month_column: &str,
    quarter_column: &str,
) -> Result<SalesTable> {
    let months = table.string_column(month_column)?;
    let quarters = months
        .iter()
        .map(|m| Quarter::try_from_month(m.unwrap_or_default()).map(|q| Some(q.as_str())))
        .collect::<Result<StringArray>>()?;
    table.with_column(quarter_column, Arc::new(quarters))
}

/// For each row, the product name holding the extreme value in direction
/// `want`. Ties keep the earliest column; rows with no values are null.
fn extreme_product<S: AsRef<str>>(
    table: &SalesTable,
    product_columns: &[S],
    want: Ordering,
) -> Result<ArrayRef> {
    require_products(product_columns)?;
    let values = table.numeric_columns(product_columns)?;
    let names: StringArray = (0..table.num_rows())
        .map(|row| {
            let mut best: Option<(usize, f64)> = None;
            for (i, v) in row_values(&values, row) {
                match best {
                    Some((_, b)) if v.partial_cmp(&b) != Some(want) => {}
                    _ => best = Some((i, v)),
                }
            }
            best.map(|(i, _)| product_columns[i].as_ref())
        })
        .collect();
    Ok(Arc::new(names) as ArrayRef)
}

/// Add `output_column` naming the product with the row's highest sales.
#[tracing::instrument(level = "debug", skip(table))]
pub fn add_max_sales_product<S: AsRef<str> + std::fmt::Debug>(
    table: SalesTable,
    product_columns: &[S],
    output_column: &str,
) -> Result<SalesTable> {
    let names = extreme_product(&table, product_columns, Ordering::Greater)?;
    table.with_column(output_column, names)
}

/// Add `output_column` naming the product with the row's lowest sales.
#[tracing::instrument(level = "debug", skip(table))]
pub fn add_min_sales_product<S: AsRef<str> + std::fmt::Debug>(
    table: SalesTable,
    product_columns: &[S],
    output_column: &str,
) -> Result<SalesTable> {
    let names = extreme_product(&table, product_columns, Ordering::Less)?;
    table.with_column(output_column, names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SalesError;
    use arrow::array::Int64Array;

    const EPS: f64 = 1e-9;

    fn two_month_table() -> SalesTable {
        SalesTable::try_from_columns(vec![
            (
                "Month",
                Arc::new(StringArray::from(vec!["Jan", "Feb"])) as ArrayRef,
            ),
            ("ProdA", Arc::new(Int64Array::from(vec![10, 30])) as ArrayRef),
            ("ProdB", Arc::new(Int64Array::from(vec![20, 10])) as ArrayRef),
        ])
        .unwrap()
    }

    const PRODUCTS: [&str; 2] = ["ProdA", "ProdB"];

    #[test]
    fn totals_and_averages() {
        let table = add_total_sales(two_month_table(), &PRODUCTS).unwrap();
        let table = add_average_sales(table, &PRODUCTS).unwrap();

        let totals = table.numeric_column(columns::TOTAL_SALES).unwrap();
        let avgs = table.numeric_column(columns::AVERAGE_SALES).unwrap();
        assert_eq!(totals.values().to_vec(), vec![30.0, 40.0]);
        for row in 0..2 {
            assert!((avgs.value(row) - totals.value(row) / 2.0).abs() < EPS);
        }
    }

    #[test]
    fn totals_skip_null_cells() {
        let table = SalesTable::try_from_columns(vec![
            (
                "ProdA",
                Arc::new(Float64Array::from(vec![Some(1.5), None])) as ArrayRef,
            ),
            (
                "ProdB",
                Arc::new(Float64Array::from(vec![Some(2.0), None])) as ArrayRef,
            ),
        ])
        .unwrap();
        let table = add_total_sales(table, &PRODUCTS).unwrap();
        let table = add_average_sales(table, &PRODUCTS).unwrap();
        let totals = table.numeric_column(columns::TOTAL_SALES).unwrap();
        let avgs = table.numeric_column(columns::AVERAGE_SALES).unwrap();
        assert!((totals.value(0) - 3.5).abs() < EPS);
        assert_eq!(totals.value(1), 0.0);
        assert!(avgs.is_null(1));
    }

    #[test]
    fn missing_product_column_fails() {
        let err = add_total_sales(two_month_table(), &["ProdA", "ProdZ"]).unwrap_err();
        assert!(matches!(err, SalesError::MissingColumn(ref c) if c == "ProdZ"));
    }

    #[test]
    fn empty_product_list_fails() {
        let none: [&str; 0] = [];
        let err = add_total_sales(two_month_table(), &none).unwrap_err();
        assert!(matches!(err, SalesError::EmptyInput(_)));
    }

    #[test]
    fn growth_needs_totals() {
        let err = add_mom_growth(two_month_table()).unwrap_err();
        assert!(matches!(err, SalesError::MissingColumn(ref c) if c == columns::TOTAL_SALES));
    }

    #[test]
    fn growth_is_percent_change() {
        let table = add_total_sales(two_month_table(), &PRODUCTS).unwrap();
        let table = add_mom_growth(table).unwrap();
        let growth = table.numeric_column(columns::MOM_GROWTH).unwrap();
        assert!(growth.is_null(0));
        assert!((growth.value(1) - 100.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn growth_from_zero_is_infinite() {
        let table = SalesTable::try_from_columns(vec![(
            columns::TOTAL_SALES,
            Arc::new(Float64Array::from(vec![0.0, 5.0, 0.0, 0.0])) as ArrayRef,
        )])
        .unwrap();
        let growth = add_mom_growth(table)
            .unwrap()
            .numeric_column(columns::MOM_GROWTH)
            .unwrap();
        assert!(growth.value(1).is_infinite());
        assert_eq!(growth.value(2), -100.0);
        assert!(growth.value(3).is_nan());
    }

    #[test]
    fn quarter_mapping_with_fallthrough() {
        let table = SalesTable::try_from_columns(vec![(
            "Month",
            Arc::new(StringArray::from(vec![
                Some("Jan"),
                Some("May"),
                Some("Sep"),
                Some("Dec"),
                Some("Jnu"),
                None,
            ])) as ArrayRef,
        )])
        .unwrap();
        let table = map_month_to_quarter(table, "Month", "Quarter").unwrap();
        let q = table.string_column("Quarter").unwrap();
        let got: Vec<&str> = q.iter().map(|v| v.unwrap()).collect();
        assert_eq!(got, vec!["Q1", "Q2", "Q3", "Q4", "Q4", "Q4"]);
    }

    #[test]
    fn strict_quarter_mapping_rejects_typos() {
        let table = SalesTable::try_from_columns(vec![(
            "Month",
            Arc::new(StringArray::from(vec!["Jan", "Jnu"])) as ArrayRef,
        )])
        .unwrap();
        let err = map_month_to_quarter_strict(table, "Month", "Quarter").unwrap_err();
        assert!(matches!(err, SalesError::UnknownMonth(ref m) if m == "Jnu"));
    }

    #[test]
    fn max_and_min_product_per_row() {
        let table =
            add_max_sales_product(two_month_table(), &PRODUCTS, "Max_Sales_Product").unwrap();
        let table = add_min_sales_product(table, &PRODUCTS, "Min_Sales_Product").unwrap();

        let max = table.string_column("Max_Sales_Product").unwrap();
        let min = table.string_column("Min_Sales_Product").unwrap();
        assert_eq!(max.value(0), "ProdB");
        assert_eq!(max.value(1), "ProdA");
        assert_eq!(min.value(0), "ProdA");
        assert_eq!(min.value(1), "ProdB");

        // the named column really holds the row maximum
        for row in 0..table.num_rows() {
            let winner = table.numeric_column(max.value(row)).unwrap().value(row);
            let row_max = PRODUCTS
                .iter()
                .map(|p| table.numeric_column(p).unwrap().value(row))
                .fold(f64::MIN, f64::max);
            assert_eq!(winner, row_max);
        }
    }

    #[test]
    fn extreme_product_ties_keep_first_column() {
        let table = SalesTable::try_from_columns(vec![
            ("ProdA", Arc::new(Int64Array::from(vec![5])) as ArrayRef),
            ("ProdB", Arc::new(Int64Array::from(vec![5])) as ArrayRef),
        ])
        .unwrap();
        let table = add_max_sales_product(table, &PRODUCTS, "Max").unwrap();
        let table = add_min_sales_product(table, &PRODUCTS, "Min").unwrap();
        assert_eq!(table.string_column("Max").unwrap().value(0), "ProdA");
        assert_eq!(table.string_column("Min").unwrap().value(0), "ProdA");
    }
}
