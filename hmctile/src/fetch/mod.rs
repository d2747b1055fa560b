//! Partition fetch strategies.
//!
//! A [`PartitionFetcher`] pulls one (layer, tile) partition out of a catalog.
//! Two strategies exist, matching the configured download method:
//!
//! - [`DataApiFetcher`] talks to the HERE Data API through an [`HttpClient`]
//! - [`OlpCliFetcher`] drives the `olp` tool through a [`CommandRunner`]
//!
//! Both seams are traits so tests run without network access or `olp`.

mod command;
mod data_api;
mod http;
mod olp_cli;
mod types;

pub use command::{CommandRunner, SystemCommandRunner};
pub use data_api::{DataApiEndpoints, DataApiFetcher};
pub use http::{HttpClient, ReqwestClient, ACCESS_TOKEN_ENV};
pub use olp_cli::{OlpCliFetcher, DEFAULT_OLP_PROGRAM};
pub use types::{FetchError, FetchedPartition, PartitionFetcher, PartitionFormat, PartitionRequest};

#[cfg(test)]
pub use command::tests::MockCommandRunner;
#[cfg(test)]
pub use http::tests::MockHttpClient;

use crate::config::DownloadMethod;

/// Builds the fetcher for a configured download method.
///
/// `olp_program` replaces `olp` on `PATH` for [`DownloadMethod::OlpCli`].
/// [`DownloadMethod::DataSdk`] needs `HERE_ACCESS_TOKEN` to be set.
pub fn fetcher_for(
    method: DownloadMethod,
    olp_program: Option<&str>,
) -> Result<Box<dyn PartitionFetcher>, FetchError> {
    let fetcher: Box<dyn PartitionFetcher> = match method {
        DownloadMethod::DataSdk => Box::new(DataApiFetcher::new(ReqwestClient::from_env()?)),
        DownloadMethod::OlpCli => Box::new(OlpCliFetcher::with_program(
            SystemCommandRunner,
            olp_program.unwrap_or(DEFAULT_OLP_PROGRAM),
        )),
    };
    Ok(fetcher)
}
