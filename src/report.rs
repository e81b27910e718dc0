// src/report.rs

use crate::analytics::{
    add_average_sales, add_max_sales_product, add_min_sales_product, add_mom_growth,
    add_total_sales, best_month, best_product, best_quarter, map_month_to_quarter,
    map_month_to_quarter_strict, pivot_avg_sales_per_quarter, pivot_total_sales_per_quarter,
    save_combined_summary,
};
use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::table::{columns, SalesTable};
use tracing::info;

/// Everything one report run produces.
#[derive(Debug, Clone)]
pub struct SalesReport {
    /// Input table with every derived column added.
    pub table: SalesTable,
    /// Average rows followed by total rows, as written to disk.
    pub summary: SalesTable,
    pub best_month: (String, f64),
    pub best_product: (String, f64),
    pub best_quarter: (String, f64),
}

/// Derive all columns in dependency order, pivot per quarter, write the
/// combined summary to `config.output_path` and run the lookups.
#[tracing::instrument(level = "info", skip_all, fields(output = %config.output_path.display()))]
pub fn run_report(table: SalesTable, config: &AnalyticsConfig) -> Result<SalesReport> {
    let products = config.product_columns.as_slice();

    // ─── 1) row-wise derivations ─────────────────────────────────────
    let table = add_total_sales(table, products)?;
    let table = add_average_sales(table, products)?;
    let table = add_mom_growth(table)?;
    let table = if config.strict_months {
        map_month_to_quarter_strict(table, &config.month_column, &config.quarter_column)?
    } else {
        map_month_to_quarter(table, &config.month_column, &config.quarter_column)?
    };
    let table = add_max_sales_product(table, products, &config.max_product_column)?;
    let table = add_min_sales_product(table, products, &config.min_product_column)?;

    // ─── 2) quarterly summaries ──────────────────────────────────────
    let avg = pivot_avg_sales_per_quarter(&table, products, &config.quarter_column)?;
    let total = pivot_total_sales_per_quarter(&table, products, &config.quarter_column)?;
    let summary = save_combined_summary(&avg, &total, &config.output_path)?;

    // ─── 3) extremal lookups ─────────────────────────────────────────
    let best_month = best_month(&table, &config.month_column, columns::TOTAL_SALES)?;
    let best_product = best_product(&table, products)?;
    let best_quarter = best_quarter(&table, &config.quarter_column, columns::TOTAL_SALES)?;

    info!(
        month = %best_month.0,
        product = %best_product.0,
        quarter = %best_quarter.0,
        "report complete"
    );

    Ok(SalesReport {
        table,
        summary,
        best_month,
        best_product,
        best_quarter,
    })
}
