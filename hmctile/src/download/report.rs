//! Progress updates and run summaries.

use crate::coord::TileId;

/// What happened to one partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionStatus {
    Written,
    /// Already on disk.
    Skipped,
    Failed,
}

/// Passed to the progress callback after each partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate<'a> {
    pub completed: usize,
    pub total: usize,
    pub layer: &'a str,
    pub tile: TileId,
    pub status: PartitionStatus,
}

/// Progress callback, called from the download loop.
pub type ProgressCallback = Box<dyn Fn(&ProgressUpdate<'_>) + Send + Sync>;

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub written: usize,
    pub skipped: usize,
    /// Payload bytes written in this run.
    pub bytes: u64,
}

impl DownloadReport {
    pub fn completed(&self) -> usize {
        self.written + self.skipped
    }
}
