use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::error::{PipelineError, Result};

pub type DbPool = Pool<Sqlite>;

/// Open the single-file store backing the pipeline, creating the database
/// file and its parent directory if they do not exist yet.
pub async fn connect(db_path: &Path) -> Result<DbPool> {
    if let Some(dir) = db_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|err| {
            PipelineError::persistence(format!("creating store directory '{}'", dir.display()), err)
        })?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|err| {
            PipelineError::persistence(format!("opening store at '{}'", db_path.display()), err)
        })
}
