use crate::analytics::quarter::MONTHS;
use crate::error::{Result, SalesError};
use crate::table::{columns, SalesTable};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// A `StdRng` seeded from `seed`, or from OS entropy when there is none.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Draw `count` integers uniformly from `[min, max]`.
#[tracing::instrument(level = "debug", skip(rng))]
pub fn generate_random_sales<R: Rng>(
    rng: &mut R,
    min: i64,
    max: i64,
    count: usize,
) -> Result<Vec<i64>> {
    if min > max {
        return Err(SalesError::InvalidRange { min, max });
    }
    Ok((0..count).map(|_| rng.gen_range(min..=max)).collect())
}

/// Twelve rows, `Month` Jan..Dec, plus one Int64 column per product with
/// values drawn from `[min, max]`.
#[tracing::instrument(level = "debug", skip(rng, products))]
pub fn synthetic_sales_table<R: Rng, S: AsRef<str>>(
    rng: &mut R,
    products: &[S],
    min: i64,
    max: i64,
) -> Result<SalesTable> {
    let mut cols: Vec<(String, ArrayRef)> = vec![(
        columns::MONTH.to_string(),
        Arc::new(StringArray::from(MONTHS.to_vec())) as ArrayRef,
    )];
    for product in products {
        let sales = generate_random_sales(rng, min, max, MONTHS.len())?;
        let sales: ArrayRef = Arc::new(Int64Array::from(sales));
        cols.push((product.as_ref().to_string(), sales));
    }
    SalesTable::try_from_columns(cols)
}
