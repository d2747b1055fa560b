//! Fetcher driving the `olp` command line tool (`OLP_CLI` download method).
//!
//! Without a configured version the partition is listed first and the
//! version taken from the suffix of its data handle:
//!
//! ```text
//! olp catalog layer partition list <hrn> <layer> --filter <tile> --json
//! olp catalog layer partition get  <hrn> <layer> --partitions <tile> --version <v> --decode true
//! ```
//!
//! The decoded partition printed by `get` is the payload.

use serde::Deserialize;
use tracing::debug;

use super::command::CommandRunner;
use super::types::{FetchError, FetchedPartition, PartitionFetcher, PartitionFormat, PartitionRequest};

/// Program name used when none is configured.
pub const DEFAULT_OLP_PROGRAM: &str = "olp";

#[derive(Debug, Deserialize)]
struct ListOutput {
    #[serde(default)]
    results: ListResults,
}

#[derive(Debug, Default, Deserialize)]
struct ListResults {
    #[serde(default)]
    items: Vec<ListItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListItem {
    data_handle: String,
}

/// [`PartitionFetcher`] shelling out to `olp`.
pub struct OlpCliFetcher<R: CommandRunner> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> OlpCliFetcher<R> {
    pub fn new(runner: R) -> Self {
        Self::with_program(runner, DEFAULT_OLP_PROGRAM)
    }

    /// Uses `program` instead of `olp` from `PATH`.
    pub fn with_program(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    fn list_args(request: &PartitionRequest) -> Vec<String> {
        let mut args = partition_args("list", request);
        args.extend([
            "--filter".to_string(),
            request.tile.to_string(),
            "--json".to_string(),
        ]);
        args
    }

    fn get_args(request: &PartitionRequest, version: u64) -> Vec<String> {
        let mut args = partition_args("get", request);
        args.extend([
            "--partitions".to_string(),
            request.tile.to_string(),
            "--version".to_string(),
            version.to_string(),
            "--decode".to_string(),
            "true".to_string(),
        ]);
        args
    }
}

impl<R: CommandRunner> PartitionFetcher for OlpCliFetcher<R> {
    fn name(&self) -> &str {
        "OLP CLI"
    }

    fn format(&self) -> PartitionFormat {
        PartitionFormat {
            extension: "json",
            suffix: "_olpcli",
        }
    }

    fn resolve_version(&self, request: &PartitionRequest) -> Result<u64, FetchError> {
        if let Some(version) = request.version {
            return Ok(version);
        }

        let stdout = self.runner.run(&self.program, &Self::list_args(request))?;
        let listing: ListOutput = serde_json::from_slice(&stdout)
            .map_err(|e| FetchError::InvalidResponse(format!("partition list: {}", e)))?;

        let item = listing.results.items.first().ok_or_else(|| {
            FetchError::NotFound(format!("No partition info found for {}", request.tile))
        })?;
        let version = version_from_data_handle(&item.data_handle)?;

        debug!(
            layer = %request.layer,
            tile = %request.tile,
            version,
            "Resolved partition version"
        );
        Ok(version)
    }

    fn fetch(&self, request: &PartitionRequest) -> Result<FetchedPartition, FetchError> {
        let version = self.resolve_version(request)?;
        let payload = self
            .runner
            .run(&self.program, &Self::get_args(request, version))?;
        Ok(FetchedPartition { version, payload })
    }
}

fn partition_args(action: &str, request: &PartitionRequest) -> Vec<String> {
    ["catalog", "layer", "partition", action]
        .into_iter()
        .map(str::to_string)
        .chain([request.catalog.hrn().to_string(), request.layer.clone()])
        .collect()
}

/// Data handles end in `.<version>`.
fn version_from_data_handle(handle: &str) -> Result<u64, FetchError> {
    handle
        .rsplit('.')
        .next()
        .and_then(|suffix| suffix.parse().ok())
        .ok_or_else(|| {
            FetchError::InvalidResponse(format!("data handle '{}' has no version suffix", handle))
        })
}
