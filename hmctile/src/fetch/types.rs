//! Core types for partition fetching.

use thiserror::Error;

use crate::config::Catalog;
use crate::coord::TileId;

/// One (layer, tile) partition to fetch from a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionRequest {
    pub catalog: Catalog,
    pub layer: String,
    pub tile: TileId,
    /// `None` asks the fetcher to look the version up.
    pub version: Option<u64>,
}

impl PartitionRequest {
    pub fn new(catalog: Catalog, layer: impl Into<String>, tile: TileId) -> Self {
        Self {
            catalog,
            layer: layer.into(),
            tile,
            version: None,
        }
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }
}

/// A fetched partition payload.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPartition {
    /// Catalog version the payload belongs to.
    pub version: u64,
    pub payload: Vec<u8>,
}

/// How a fetcher's payloads are named on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionFormat {
    /// File extension without the dot.
    pub extension: &'static str,
    /// Appended to the file stem after the version.
    pub suffix: &'static str,
}

/// Errors that can occur while fetching a partition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("missing credentials: {0}")]
    Auth(String),

    #[error("command failed: {0}")]
    Command(String),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

/// Strategy for pulling partitions out of a catalog.
///
/// Implementations are selected by the configured download method; the
/// rest of the pipeline only sees this trait.
pub trait PartitionFetcher {
    /// Human readable strategy name, for logs.
    fn name(&self) -> &str;

    /// File naming for payloads from this fetcher.
    fn format(&self) -> PartitionFormat;

    /// Looks up the version to fetch when none is configured.
    fn resolve_version(&self, request: &PartitionRequest) -> Result<u64, FetchError>;

    /// Fetches one partition. A request without a version is resolved first.
    fn fetch(&self, request: &PartitionRequest) -> Result<FetchedPartition, FetchError>;
}

impl<F: PartitionFetcher + ?Sized> PartitionFetcher for Box<F> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn format(&self) -> PartitionFormat {
        (**self).format()
    }

    fn resolve_version(&self, request: &PartitionRequest) -> Result<u64, FetchError> {
        (**self).resolve_version(request)
    }

    fn fetch(&self, request: &PartitionRequest) -> Result<FetchedPartition, FetchError> {
        (**self).fetch(request)
    }
}
