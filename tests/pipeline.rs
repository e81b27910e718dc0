use anyhow::Result;
use arrow::array::{Array, ArrayRef, Int64Array, StringArray};
use salesboard::{
    columns, load_csv, run_report, seeded_rng, synthetic_sales_table, AnalyticsConfig,
    SalesError, SalesTable,
};
use std::sync::Arc;
use tempfile::tempdir;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,salesboard=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

const PRODUCTS: [&str; 3] = ["Laptops", "Phones", "Tablets"];

#[test]
fn full_report_on_synthetic_year() -> Result<()> {
    init_test_logging();
    let dir = tempdir()?;
    let out = dir.path().join("output.csv");

    let mut rng = seeded_rng(Some(2024));
    let table = synthetic_sales_table(&mut rng, &PRODUCTS, 1_000, 5_000)?;
    let config = AnalyticsConfig::new(PRODUCTS).with_output_path(&out);
    let report = run_report(table, &config)?;

    // every derived column is present
    for col in [
        columns::TOTAL_SALES,
        columns::AVERAGE_SALES,
        columns::MOM_GROWTH,
        columns::QUARTER,
        columns::MAX_SALES_PRODUCT,
        columns::MIN_SALES_PRODUCT,
    ] {
        assert!(report.table.has_column(col), "missing {}", col);
    }

    // total = sum of products, average = total / n
    let totals = report.table.numeric_column(columns::TOTAL_SALES)?;
    let avgs = report.table.numeric_column(columns::AVERAGE_SALES)?;
    let products = report.table.numeric_columns(&PRODUCTS)?;
    for row in 0..report.table.num_rows() {
        let sum: f64 = products.iter().map(|c| c.value(row)).sum();
        assert!((totals.value(row) - sum).abs() < 1e-9);
        assert!((avgs.value(row) - sum / PRODUCTS.len() as f64).abs() < 1e-9);
    }

    // growth follows the totals
    let growth = report.table.numeric_column(columns::MOM_GROWTH)?;
    assert!(growth.is_null(0));
    for row in 1..growth.len() {
        let expected = 100.0 * (totals.value(row) - totals.value(row - 1)) / totals.value(row - 1);
        assert!((growth.value(row) - expected).abs() < 1e-9);
    }

    // four quarters, average rows then total rows
    assert_eq!(report.summary.num_rows(), 8);
    let quarterly_total: f64 = report
        .summary
        .numeric_column(columns::TOTAL_SALES)?
        .iter()
        .skip(4)
        .flatten()
        .sum();
    let grand: f64 = totals.values().iter().sum();
    assert!((quarterly_total - grand).abs() < 1e-6);

    // best month is a brute-force argmax
    let months = report.table.string_column(columns::MONTH)?;
    let mut best = 0;
    for row in 1..totals.len() {
        if totals.value(row) > totals.value(best) {
            best = row;
        }
    }
    assert_eq!(report.best_month.0, months.value(best));
    assert_eq!(report.best_month.1, totals.value(best));
    assert!(PRODUCTS.contains(&report.best_product.0.as_str()));
    assert!(["Q1", "Q2", "Q3", "Q4"].contains(&report.best_quarter.0.as_str()));

    // the written file reparses to the same summary
    let reread = load_csv(&out)?;
    assert_eq!(reread.column_names(), report.summary.column_names());
    assert_eq!(
        reread.column_names(),
        vec!["Type", "Quarter", "Laptops", "Phones", "Tablets", "Total_Sales"]
    );
    assert_eq!(reread.num_rows(), report.summary.num_rows());
    let types = reread.string_column(columns::TYPE)?;
    let tags: Vec<&str> = types.iter().flatten().collect();
    assert_eq!(tags[..4], ["Average"; 4]);
    assert_eq!(tags[4..], ["Total"; 4]);
    for name in PRODUCTS.iter().chain(&[columns::TOTAL_SALES]) {
        let a = reread.numeric_column(name)?;
        let b = report.summary.numeric_column(name)?;
        assert_eq!(a.values().to_vec(), b.values().to_vec(), "{}", name);
    }
    Ok(())
}

#[test]
fn report_into_missing_directory_fails() -> Result<()> {
    init_test_logging();
    let dir = tempdir()?;
    let out = dir.path().join("nope").join("output.csv");
    let table = synthetic_sales_table(&mut seeded_rng(Some(1)), &PRODUCTS, 1, 10)?;
    let config = AnalyticsConfig::new(PRODUCTS).with_output_path(&out);

    let err = run_report(table, &config).unwrap_err();
    assert!(matches!(err, SalesError::Io { .. }));
    assert!(!out.exists());
    Ok(())
}

#[test]
fn strict_months_reject_typos() -> Result<()> {
    init_test_logging();
    let dir = tempdir()?;
    let table = SalesTable::try_from_columns(vec![
        (
            "Month",
            Arc::new(StringArray::from(vec!["Jan", "Fbe"])) as ArrayRef,
        ),
        ("ProdA", Arc::new(Int64Array::from(vec![10, 30])) as ArrayRef),
    ])?;

    let mut config = AnalyticsConfig::new(["ProdA"]).with_output_path(dir.path().join("o.csv"));
    config.strict_months = true;
    let err = run_report(table.clone(), &config).unwrap_err();
    assert!(matches!(err, SalesError::UnknownMonth(ref m) if m == "Fbe"));

    // lenient mode files the typo under Q4
    config.strict_months = false;
    let report = run_report(table, &config)?;
    let quarters = report.table.string_column(columns::QUARTER)?;
    assert_eq!(quarters.value(1), "Q4");
    Ok(())
}
