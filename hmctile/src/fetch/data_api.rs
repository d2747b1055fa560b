//! HERE Data API fetcher (`DATA_SDK` download method).
//!
//! A partition takes up to three requests:
//!
//! 1. `GET {metadata}/catalogs/{hrn}/versions/latest?startVersion=-1` for the
//!    latest catalog version, once per catalog, when none is configured
//! 2. `GET {query}/catalogs/{hrn}/layers/{layer}/partitions?partition={id}&version={v}`
//!    to find the partition's data handle
//! 3. `GET {blob}/catalogs/{hrn}/layers/{layer}/data/{handle}` for the payload
//!
//! Payloads are stored as returned (protobuf).

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Deserialize;
use tracing::debug;

use super::http::HttpClient;
use super::types::{FetchError, FetchedPartition, PartitionFetcher, PartitionFormat, PartitionRequest};
use crate::config::Catalog;

/// Base URLs of the Data API services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataApiEndpoints {
    pub metadata: String,
    pub query: String,
    pub blob: String,
}

impl Default for DataApiEndpoints {
    fn default() -> Self {
        Self {
            metadata: "https://metadata.data.api.platform.here.com/metadata/v1".to_string(),
            query: "https://query.data.api.platform.here.com/query/v1".to_string(),
            blob: "https://blob.data.api.platform.here.com/blob/v1".to_string(),
        }
    }
}

impl DataApiEndpoints {
    /// All three services under one base URL, as a local proxy or test server would serve them.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            metadata: format!("{base}/metadata/v1"),
            query: format!("{base}/query/v1"),
            blob: format!("{base}/blob/v1"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestVersion {
    version: i64,
}

#[derive(Debug, Deserialize)]
struct PartitionsResponse {
    #[serde(default)]
    partitions: Vec<PartitionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartitionEntry {
    partition: String,
    data_handle: Option<String>,
}

/// [`PartitionFetcher`] over the HERE Data API.
pub struct DataApiFetcher<C: HttpClient> {
    http_client: C,
    endpoints: DataApiEndpoints,
    latest_versions: Mutex<HashMap<Catalog, u64>>,
}

impl<C: HttpClient> DataApiFetcher<C> {
    pub fn new(http_client: C) -> Self {
        Self::with_endpoints(http_client, DataApiEndpoints::default())
    }

    pub fn with_endpoints(http_client: C, endpoints: DataApiEndpoints) -> Self {
        Self {
            http_client,
            endpoints,
            latest_versions: Mutex::new(HashMap::new()),
        }
    }

    fn latest_version_url(&self, catalog: Catalog) -> String {
        format!(
            "{}/catalogs/{}/versions/latest?startVersion=-1",
            self.endpoints.metadata,
            catalog.hrn()
        )
    }

    fn partition_url(&self, request: &PartitionRequest, version: u64) -> String {
        format!(
            "{}/catalogs/{}/layers/{}/partitions?partition={}&version={}",
            self.endpoints.query,
            request.catalog.hrn(),
            request.layer,
            request.tile,
            version
        )
    }

    fn blob_url(&self, request: &PartitionRequest, data_handle: &str) -> String {
        format!(
            "{}/catalogs/{}/layers/{}/data/{}",
            self.endpoints.blob,
            request.catalog.hrn(),
            request.layer,
            data_handle
        )
    }

    fn latest_version(&self, catalog: Catalog) -> Result<u64, FetchError> {
        if let Some(version) = self.cached_version(catalog) {
            return Ok(version);
        }

        let body = self.http_client.get(&self.latest_version_url(catalog))?;
        let latest: LatestVersion = parse_json(&body)?;
        let version = u64::try_from(latest.version).map_err(|_| {
            FetchError::InvalidResponse(format!(
                "catalog {} has no published version ({})",
                catalog, latest.version
            ))
        })?;

        debug!(catalog = %catalog, version, "Resolved latest catalog version");
        if let Ok(mut cache) = self.latest_versions.lock() {
            cache.insert(catalog, version);
        }
        Ok(version)
    }

    fn cached_version(&self, catalog: Catalog) -> Option<u64> {
        self.latest_versions
            .lock()
            .ok()
            .and_then(|cache| cache.get(&catalog).copied())
    }

    fn data_handle(&self, request: &PartitionRequest, version: u64) -> Result<String, FetchError> {
        let body = self.http_client.get(&self.partition_url(request, version))?;
        let response: PartitionsResponse = parse_json(&body)?;
        let partition = request.tile.to_string();

        response
            .partitions
            .into_iter()
            .find(|entry| entry.partition == partition)
            .and_then(|entry| entry.data_handle)
            .ok_or_else(|| {
                FetchError::NotFound(format!(
                    "partition {} in layer {} at version {}",
                    partition, request.layer, version
                ))
            })
    }
}

impl<C: HttpClient> PartitionFetcher for DataApiFetcher<C> {
    fn name(&self) -> &str {
        "HERE Data API"
    }

    fn format(&self) -> PartitionFormat {
        PartitionFormat {
            extension: "pb",
            suffix: "",
        }
    }

    fn resolve_version(&self, request: &PartitionRequest) -> Result<u64, FetchError> {
        match request.version {
            Some(version) => Ok(version),
            None => self.latest_version(request.catalog),
        }
    }

    fn fetch(&self, request: &PartitionRequest) -> Result<FetchedPartition, FetchError> {
        let version = self.resolve_version(request)?;
        let handle = self.data_handle(request, version)?;
        let payload = self.http_client.get(&self.blob_url(request, &handle))?;

        debug!(
            layer = %request.layer,
            tile = %request.tile,
            version,
            bytes = payload.len(),
            "Fetched partition"
        );
        Ok(FetchedPartition { version, payload })
    }
}

fn parse_json<'a, T: Deserialize<'a>>(body: &'a [u8]) -> Result<T, FetchError> {
    serde_json::from_slice(body).map_err(|e| FetchError::InvalidResponse(e.to_string()))
}
