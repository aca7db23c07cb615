use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use tracing::{error, info};

use crate::error::{PipelineError, Result};

const SCHEMA_INFER_ROWS: usize = 500;

/// Read the source CSV into a DataFrame, preserving column names and row
/// order. Columns beyond the ones the transform touches pass through as-is.
pub fn extract_data(path: &Path) -> Result<DataFrame> {
    read_csv(path).map_err(|err| {
        error!(path = %path.display(), "extraction failed: {err}");
        err
    })
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|err| PipelineError::data_access(path, err))?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(SCHEMA_INFER_ROWS))
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|err| PipelineError::data_access(path, err))?;

    info!(
        rows = df.height(),
        columns = df.width(),
        "extracted dataset from {}",
        path.display()
    );
    Ok(df)
}
