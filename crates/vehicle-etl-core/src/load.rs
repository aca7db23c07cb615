// crates/vehicle-etl-core/src/load.rs

use polars::prelude::*;
use tracing::{error, info};

use crate::db::DbPool;
use crate::error::{PipelineError, Result};

/// Persist a cleaned dataset into the named table, destructively replacing
/// any prior contents and schema.
///
/// Rows are written to a staging table which is swapped over the target
/// inside a single transaction, so a failed write leaves whatever table was
/// there before untouched.
pub async fn load_data(pool: &DbPool, df: &DataFrame, table: &str) -> Result<()> {
    replace_table(pool, df, table).await.map_err(|err| {
        error!(table, "load failed: {err}");
        err
    })
}

async fn replace_table(pool: &DbPool, df: &DataFrame, table: &str) -> Result<()> {
    let staging = format!("{table}_staging");
    let sql_err = |err: sqlx::Error| {
        PipelineError::persistence(format!("replacing table '{table}'"), err)
    };

    let column_defs = df
        .get_columns()
        .iter()
        .map(|column| format!("\"{}\" {}", column.name(), sql_type(column.dtype())))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; df.width()].join(", ");
    let column_names = df
        .get_columns()
        .iter()
        .map(|column| format!("\"{}\"", column.name()))
        .collect::<Vec<_>>()
        .join(", ");
    let insert_sql = format!("INSERT INTO \"{staging}\" ({column_names}) VALUES ({placeholders})");

    let mut tx = pool.begin().await.map_err(sql_err)?;

    sqlx::query(&format!("DROP TABLE IF EXISTS \"{staging}\""))
        .execute(&mut *tx)
        .await
        .map_err(sql_err)?;
    sqlx::query(&format!("CREATE TABLE \"{staging}\" ({column_defs})"))
        .execute(&mut *tx)
        .await
        .map_err(sql_err)?;

    for idx in 0..df.height() {
        let mut query = sqlx::query(&insert_sql);
        for column in df.get_columns() {
            let value = column.as_materialized_series().get(idx).map_err(|err| {
                PipelineError::persistence(format!("reading row {idx} of '{}'", column.name()), err)
            })?;
            query = match sql_value(value) {
                SqlValue::Null => query.bind(Option::<String>::None),
                SqlValue::Int(v) => query.bind(v),
                SqlValue::Real(v) => query.bind(v),
                SqlValue::Text(v) => query.bind(v),
            };
        }
        query.execute(&mut *tx).await.map_err(sql_err)?;
    }

    sqlx::query(&format!("DROP TABLE IF EXISTS \"{table}\""))
        .execute(&mut *tx)
        .await
        .map_err(sql_err)?;
    sqlx::query(&format!("ALTER TABLE \"{staging}\" RENAME TO \"{table}\""))
        .execute(&mut *tx)
        .await
        .map_err(sql_err)?;

    tx.commit().await.map_err(sql_err)?;

    info!(rows = df.height(), table, "loaded dataset into store");
    Ok(())
}

enum SqlValue {
    Null,
    Int(i64),
    Real(f64),
    Text(String),
}

fn sql_value(value: AnyValue) -> SqlValue {
    match value {
        AnyValue::Null => SqlValue::Null,
        AnyValue::Boolean(v) => SqlValue::Int(i64::from(v)),
        AnyValue::Int8(v) => SqlValue::Int(i64::from(v)),
        AnyValue::Int16(v) => SqlValue::Int(i64::from(v)),
        AnyValue::Int32(v) => SqlValue::Int(i64::from(v)),
        AnyValue::Int64(v) => SqlValue::Int(v),
        AnyValue::UInt8(v) => SqlValue::Int(i64::from(v)),
        AnyValue::UInt16(v) => SqlValue::Int(i64::from(v)),
        AnyValue::UInt32(v) => SqlValue::Int(i64::from(v)),
        AnyValue::UInt64(v) => SqlValue::Int(v as i64),
        AnyValue::Float32(v) => SqlValue::Real(f64::from(v)),
        AnyValue::Float64(v) => SqlValue::Real(v),
        AnyValue::String(v) => SqlValue::Text(v.to_string()),
        AnyValue::StringOwned(v) => SqlValue::Text(v.to_string()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn sql_type(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::Boolean
        | DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => "INTEGER",
        DataType::Float32 | DataType::Float64 => "REAL",
        _ => "TEXT",
    }
}
