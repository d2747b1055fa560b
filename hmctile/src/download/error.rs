//! Download error types.

use std::fmt;

use thiserror::Error;

use crate::coord::TileId;
use crate::fetch::FetchError;
use crate::store::StoreError;

/// Result type for download runs.
pub type DownloadResult<T> = Result<T, DownloadError>;

/// A partition that could not be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionFailure {
    pub layer: String,
    pub tile: TileId,
    pub error: FetchError,
}

impl fmt::Display for PartitionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}: {}", self.layer, self.tile, self.error)
    }
}

/// Errors that end a download run.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// A fetch failed and the run stopped there.
    #[error("failed to fetch layer {layer} tile {tile}: {source}")]
    Fetch {
        layer: String,
        tile: TileId,
        source: FetchError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The cancel flag was raised between requests.
    #[error("download cancelled after {completed} of {total} partitions")]
    Cancelled { completed: usize, total: usize },

    /// The run continued past fetch errors and some partitions are missing.
    #[error("{} of {total} partitions failed", failures.len())]
    Incomplete {
        failures: Vec<PartitionFailure>,
        total: usize,
    },
}
