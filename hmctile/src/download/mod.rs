//! Sequential partition download loop.
//!
//! The [`Downloader`] walks a [`ResolvedRequest`] layer by layer, fetching
//! each (layer, tile) partition through a [`PartitionFetcher`] and writing it
//! into a [`PartitionStore`]. Partitions already on disk are skipped.
//!
//! A shared cancel flag is checked before every request; an in-flight
//! request always completes and is written before the run stops.

mod error;
mod report;

pub use error::{DownloadError, DownloadResult, PartitionFailure};
pub use report::{DownloadReport, PartitionStatus, ProgressCallback, ProgressUpdate};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::coord::TileId;
use crate::fetch::{FetchError, PartitionFetcher, PartitionRequest};
use crate::store::{PartitionStore, StoreOutcome};
use crate::target::ResolvedRequest;

/// Fetches every partition of a resolved request.
pub struct Downloader<F: PartitionFetcher> {
    fetcher: F,
    store: PartitionStore,
    keep_going: bool,
    cancel: Arc<AtomicBool>,
    on_progress: Option<ProgressCallback>,
}

impl<F: PartitionFetcher> Downloader<F> {
    pub fn new(fetcher: F, store: PartitionStore) -> Self {
        Self {
            fetcher,
            store,
            keep_going: false,
            cancel: Arc::new(AtomicBool::new(false)),
            on_progress: None,
        }
    }

    /// Continue past fetch errors and report them all at the end.
    pub fn with_keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// Share a cancel flag, typically set from a signal handler.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn store(&self) -> &PartitionStore {
        &self.store
    }

    /// Downloads every (layer, tile) pair, layer-major.
    ///
    /// # Errors
    ///
    /// * [`DownloadError::Fetch`] on the first fetch failure, unless keep-going is set
    /// * [`DownloadError::Incomplete`] at the end of a keep-going run with failures
    /// * [`DownloadError::Store`] when a partition cannot be written
    /// * [`DownloadError::Cancelled`] when the cancel flag is raised
    pub fn run(&self, request: &ResolvedRequest) -> DownloadResult<DownloadReport> {
        let total = request.request_count();
        let mut report = DownloadReport::default();
        let mut failures = Vec::new();

        info!(
            fetcher = self.fetcher.name(),
            catalog = %request.catalog,
            layers = request.layers.len(),
            tiles = request.tiles.len(),
            "Starting download"
        );

        for layer in &request.layers {
            info!(layer = %layer, "Downloading layer");

            for &tile in &request.tiles {
                let completed = report.completed() + failures.len();
                if self.cancel.load(Ordering::SeqCst) {
                    warn!(completed, total, "Download cancelled");
                    return Err(DownloadError::Cancelled { completed, total });
                }

                let mut partition = PartitionRequest::new(request.catalog, layer.as_str(), tile);
                partition.version = request.version;

                let status = match self.download_partition(&partition) {
                    Ok(StoreOutcome::Written { bytes, .. }) => {
                        report.written += 1;
                        report.bytes += bytes as u64;
                        PartitionStatus::Written
                    }
                    Ok(StoreOutcome::Skipped { .. }) => {
                        report.skipped += 1;
                        PartitionStatus::Skipped
                    }
                    Err(PartitionError::Store(e)) => return Err(e.into()),
                    Err(PartitionError::Fetch(source)) if self.keep_going => {
                        warn!(layer = %layer, tile = %tile, error = %source, "Partition failed");
                        failures.push(PartitionFailure {
                            layer: layer.clone(),
                            tile,
                            error: source,
                        });
                        PartitionStatus::Failed
                    }
                    Err(PartitionError::Fetch(source)) => {
                        return Err(DownloadError::Fetch {
                            layer: layer.clone(),
                            tile,
                            source,
                        })
                    }
                };

                self.report_progress(completed + 1, total, layer, tile, status);
            }
        }

        if !failures.is_empty() {
            return Err(DownloadError::Incomplete { failures, total });
        }

        info!(
            written = report.written,
            skipped = report.skipped,
            bytes = report.bytes,
            "Download complete"
        );
        Ok(report)
    }

    fn download_partition(
        &self,
        request: &PartitionRequest,
    ) -> Result<StoreOutcome, PartitionError> {
        let format = self.fetcher.format();
        let version = self
            .fetcher
            .resolve_version(request)
            .map_err(PartitionError::Fetch)?;

        if self.store.contains(request, version, format) {
            debug!(layer = %request.layer, tile = %request.tile, version, "Already downloaded");
            return Ok(StoreOutcome::Skipped {
                path: self.store.path_for(request, version, format),
            });
        }

        let fetched = self
            .fetcher
            .fetch(&request.clone().with_version(version))
            .map_err(PartitionError::Fetch)?;

        self.store
            .write(request, fetched.version, format, &fetched.payload)
            .map_err(PartitionError::Store)
    }

    fn report_progress(
        &self,
        completed: usize,
        total: usize,
        layer: &str,
        tile: TileId,
        status: PartitionStatus,
    ) {
        if let Some(on_progress) = &self.on_progress {
            on_progress(&ProgressUpdate {
                completed,
                total,
                layer,
                tile,
                status,
            });
        }
    }
}

enum PartitionError {
    Fetch(FetchError),
    Store(crate::store::StoreError),
}
