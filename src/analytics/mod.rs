pub mod derive;
pub mod lookup;
pub mod pivot;
pub mod quarter;

pub use derive::{
    add_average_sales, add_max_sales_product, add_min_sales_product, add_mom_growth,
    add_total_sales, map_month_to_quarter, map_month_to_quarter_strict,
};
pub use lookup::{best_month, best_product, best_quarter};
pub use pivot::{
    combine_summaries, pivot_avg_sales_per_quarter, pivot_sales_per_quarter,
    pivot_total_sales_per_quarter, save_combined_summary, Aggregation,
};
pub use quarter::{Quarter, MONTHS};
