//! On-disk layout for downloaded partitions.
//!
//! ```text
//! <root>/<hrn with ':' as '_'>/heretile/<tile>/<layer>_<tile>_v<version><suffix>.<ext>
//! ```
//!
//! A file that already exists is never rewritten.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::fetch::{PartitionFormat, PartitionRequest};

/// Tiling scheme directory component.
const TILING_SCHEME_DIR: &str = "heretile";

/// Errors writing partitions.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// What [`PartitionStore::write`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome {
    Written { path: PathBuf, bytes: usize },
    Skipped { path: PathBuf },
}

impl StoreOutcome {
    pub fn path(&self) -> &Path {
        match self {
            StoreOutcome::Written { path, .. } | StoreOutcome::Skipped { path } => path,
        }
    }
}

/// Directory tree partitions are written into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionStore {
    root: PathBuf,
}

impl PartitionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where a partition at `version` lives.
    pub fn path_for(
        &self,
        request: &PartitionRequest,
        version: u64,
        format: PartitionFormat,
    ) -> PathBuf {
        let tile = request.tile.to_string();
        let file_name = format!(
            "{}_{}_v{}{}.{}",
            request.layer, tile, version, format.suffix, format.extension
        );
        self.root
            .join(request.catalog.hrn().replace(':', "_"))
            .join(TILING_SCHEME_DIR)
            .join(&tile)
            .join(file_name)
    }

    pub fn contains(
        &self,
        request: &PartitionRequest,
        version: u64,
        format: PartitionFormat,
    ) -> bool {
        self.path_for(request, version, format).is_file()
    }

    /// Writes a payload unless the file is already there.
    ///
    /// The payload goes to a temporary sibling first and is renamed into
    /// place, so an interrupted run never leaves a truncated partition.
    pub fn write(
        &self,
        request: &PartitionRequest,
        version: u64,
        format: PartitionFormat,
        payload: &[u8],
    ) -> Result<StoreOutcome, StoreError> {
        let path = self.path_for(request, version, format);
        if path.is_file() {
            debug!(path = %path.display(), "Partition exists, skipping");
            return Ok(StoreOutcome::Skipped { path });
        }

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let partial = path.with_extension(format!("{}.part", format.extension));
        fs::write(&partial, payload)
            .and_then(|()| fs::rename(&partial, &path))
            .map_err(|source| {
                let _ = fs::remove_file(&partial);
                StoreError::Write {
                    path: path.clone(),
                    source,
                }
            })?;

        debug!(path = %path.display(), bytes = payload.len(), "Wrote partition");
        Ok(StoreOutcome::Written {
            path,
            bytes: payload.len(),
        })
    }
}
