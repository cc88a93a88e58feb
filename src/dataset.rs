//! Dataset file loading.
//!
//! The athlete dataset is a single JSON document with an `athletes` array
//! and optional `metadata`.

use crate::models::AthletesData;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while loading the dataset file.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dataset {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a dataset from a JSON string.
pub fn parse_dataset(content: &str) -> Result<AthletesData, serde_json::Error> {
    serde_json::from_str(content)
}

/// Load the dataset from `path`.
pub fn load_dataset(path: &Path) -> Result<AthletesData, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let data = parse_dataset(&content).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if data.athletes.is_empty() {
        warn!("Dataset {} contains no athletes", path.display());
    }
    debug!(
        "Loaded {} athletes from {} (last updated: {})",
        data.athletes.len(),
        path.display(),
        data.last_updated().unwrap_or("unknown")
    );

    Ok(data)
}
