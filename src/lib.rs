//! Descriptive sales analytics over a monthly per-product sales table.
//!
//! Tables are Arrow record batches wrapped in [`SalesTable`]. Column
//! derivations take the table by value and hand back the augmented table;
//! pivots and lookups borrow it.

pub mod analytics;
pub mod config;
pub mod error;
pub mod generate;
pub mod report;
pub mod table;

pub use analytics::{
    add_average_sales, add_max_sales_product, add_min_sales_product, add_mom_growth,
    add_total_sales, best_month, best_product, best_quarter, combine_summaries,
    map_month_to_quarter, map_month_to_quarter_strict, pivot_avg_sales_per_quarter,
    pivot_total_sales_per_quarter, save_combined_summary, Quarter,
};
pub use config::AnalyticsConfig;
pub use error::{Result, SalesError};
pub use generate::{generate_random_sales, seeded_rng, synthetic_sales_table};
pub use report::{run_report, SalesReport};
pub use table::{columns, load_csv, read_csv, write_csv, SalesTable};
