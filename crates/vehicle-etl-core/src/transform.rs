use chrono::{Datelike, Utc};
use polars::prelude::*;
use tracing::{error, info};

use crate::error::{PipelineError, Result};

/// Apply the cleaning/enrichment policy to an extracted dataset.
///
/// Exact-duplicate rows are dropped (first occurrence kept, order
/// preserved), `price` and `mileage` nulls are imputed with the respective
/// post-dedup column medians, null `fuel` becomes `"unknown"`, `fuel` and
/// `transmission` are lowercased and trimmed, and a `car_age` column is
/// derived from `year`. Null `transmission` values pass through untouched.
pub fn transform_data(df: DataFrame) -> Result<DataFrame> {
    clean(df).map_err(|err| {
        error!("transform failed: {err}");
        err
    })
}

fn clean(df: DataFrame) -> Result<DataFrame> {
    // medians are taken over the deduplicated rows, so dedup runs first
    let deduped = df
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()
        .map_err(|err| PipelineError::transform(err))?;

    let price_median = column_median(&deduped, "price")?;
    let mileage_median = column_median(&deduped, "mileage")?;
    let current_year = i64::from(Utc::now().year());

    let cleaned = deduped
        .lazy()
        .with_columns([
            col("price")
                .cast(DataType::Float64)
                .fill_null(lit(price_median)),
            col("mileage")
                .cast(DataType::Float64)
                .fill_null(lit(mileage_median)),
            col("fuel").fill_null(lit("unknown")),
        ])
        .with_columns([
            col("fuel").str().to_lowercase().str().strip_chars(lit(NULL)),
            col("transmission")
                .str()
                .to_lowercase()
                .str()
                .strip_chars(lit(NULL)),
        ])
        .with_column((lit(current_year) - col("year")).alias("car_age"))
        .collect()
        .map_err(|err| PipelineError::transform(err))?;

    info!(
        rows = cleaned.height(),
        price_median, mileage_median, "transformed dataset"
    );
    Ok(cleaned)
}

fn column_median(df: &DataFrame, name: &str) -> Result<f64> {
    let series = df
        .column(name)
        .and_then(|column| column.as_materialized_series().cast(&DataType::Float64))
        .map_err(|err| PipelineError::transform(err))?;

    series
        .f64()
        .map_err(|err| PipelineError::transform(err))?
        .median()
        .ok_or_else(|| {
            PipelineError::transform(format!("column '{name}' has no values to impute from"))
        })
}
