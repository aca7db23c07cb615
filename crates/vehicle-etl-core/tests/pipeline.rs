use std::path::PathBuf;

use chrono::{Datelike, Utc};
use tempfile::TempDir;

use vehicle_etl_core::db;
use vehicle_etl_core::error::PipelineError;
use vehicle_etl_core::pipeline::run_with;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

#[tokio::test]
async fn pipeline_end_to_end() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("vehicles.db");
    let dataset = fixture_path("vehicles_dataset.csv");

    run_with(&dataset, &db_path, "vehicles").await?;

    let pool = db::connect(&db_path).await?;

    // 5 input rows with one exact duplicate pair
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vehicles")
        .fetch_one(&pool)
        .await?;
    assert_eq!(count, 4);

    // missing price imputed with the median of the three present prices
    let price: f64 = sqlx::query_scalar("SELECT price FROM vehicles WHERE model = 'honda civic'")
        .fetch_one(&pool)
        .await?;
    assert_eq!(price, 12000.0);

    let mileage: f64 = sqlx::query_scalar("SELECT mileage FROM vehicles WHERE model = 'ford focus'")
        .fetch_one(&pool)
        .await?;
    assert_eq!(mileage, 45000.0);

    // missing fuel defaulted, present fuel trimmed and lowercased
    let fuel: String = sqlx::query_scalar("SELECT fuel FROM vehicles WHERE model = 'ford focus'")
        .fetch_one(&pool)
        .await?;
    assert_eq!(fuel, "unknown");
    let fuel: String = sqlx::query_scalar("SELECT fuel FROM vehicles WHERE model = 'honda civic'")
        .fetch_one(&pool)
        .await?;
    assert_eq!(fuel, "diesel");

    // missing transmission stays missing
    let nulls: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vehicles WHERE transmission IS NULL")
        .fetch_one(&pool)
        .await?;
    assert_eq!(nulls, 1);

    let current_year = i64::from(Utc::now().year());
    let car_age: i64 =
        sqlx::query_scalar("SELECT car_age FROM vehicles WHERE model = 'toyota corolla'")
            .fetch_one(&pool)
            .await?;
    assert_eq!(car_age, current_year - 2018);

    pool.close().await;

    // a second full run replaces the table rather than appending to it
    run_with(&dataset, &db_path, "vehicles").await?;

    let pool = db::connect(&db_path).await?;
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vehicles")
        .fetch_one(&pool)
        .await?;
    assert_eq!(count, 4);
    pool.close().await;

    Ok(())
}

#[tokio::test]
async fn missing_source_aborts_before_any_write() {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("vehicles.db");

    let err = run_with(&fixture_path("does_not_exist.csv"), &db_path, "vehicles")
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::DataAccess { .. }));
    assert!(!db_path.exists());
}
