use std::path::Path;

use tracing::info;

use crate::db;
use crate::error::Result;
use crate::extract::extract_data;
use crate::load::load_data;
use crate::transform::transform_data;

pub const DEFAULT_DATASET_PATH: &str = "data/vehicles_dataset.csv";
pub const DEFAULT_DB_PATH: &str = "data/vehicles.db";
pub const DEFAULT_TABLE: &str = "vehicles";

/// Run the full extract → transform → load sequence with the compiled-in
/// defaults.
pub async fn run() -> Result<()> {
    run_with(
        Path::new(DEFAULT_DATASET_PATH),
        Path::new(DEFAULT_DB_PATH),
        DEFAULT_TABLE,
    )
    .await
}

/// Run the pipeline against explicit locations. The store pool is scoped to
/// this call and closed before it returns, success or failure.
pub async fn run_with(dataset_path: &Path, db_path: &Path, table: &str) -> Result<()> {
    info!("starting vehicle data ETL pipeline");

    let df = extract_data(dataset_path)?;
    let cleaned = transform_data(df)?;

    let pool = db::connect(db_path).await?;
    let outcome = load_data(&pool, &cleaned, table).await;
    pool.close().await;
    outcome?;

    info!("ETL pipeline completed");
    Ok(())
}
