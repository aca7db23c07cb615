// crates/vehicle-etl-core/src/error.rs

use std::path::PathBuf;

use thiserror::Error;

type Source = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("data access failed for '{}': {source}", .path.display())]
    DataAccess {
        path: PathBuf,
        #[source]
        source: Source,
    },

    #[error("transform failed: {source}")]
    Transform {
        #[source]
        source: Source,
    },

    #[error("persistence failed while {context}: {source}")]
    Persistence {
        context: String,
        #[source]
        source: Source,
    },
}

impl PipelineError {
    pub fn data_access(path: impl Into<PathBuf>, source: impl Into<Source>) -> Self {
        Self::DataAccess {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn transform(source: impl Into<Source>) -> Self {
        Self::Transform {
            source: source.into(),
        }
    }

    pub fn persistence(context: impl Into<String>, source: impl Into<Source>) -> Self {
        Self::Persistence {
            context: context.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
