//! hmctile - HERE map content tile downloader
//!
//! This library turns a geographic target (a point, a box, explicit tile ids
//! or a list of countries) into the set of HERE tiles covering it, and
//! downloads the matching catalog partitions to disk.
//!
//! # High-Level API
//!
//! ```ignore
//! use hmctile::config::Config;
//! use hmctile::download::Downloader;
//! use hmctile::fetch::fetcher_for;
//! use hmctile::geometry::HereTileBackend;
//! use hmctile::store::PartitionStore;
//! use hmctile::target::{ResolvedRequest, Resolver};
//!
//! let config = Config::load(Path::new("config.yaml"))?;
//! let resolver = Resolver::new(HereTileBackend::with_builtin_boundaries()?);
//! let tiles = resolver.resolve(&config.target, config.tile_level())?;
//!
//! let request = ResolvedRequest::for_config(&config, tiles);
//! let fetcher = fetcher_for(config.download_method, None)?;
//! let report = Downloader::new(fetcher, PartitionStore::new(&config.output_dir)).run(&request)?;
//! ```

pub mod config;
pub mod coord;
pub mod download;
pub mod export;
pub mod fetch;
pub mod geometry;
pub mod logging;
pub mod store;
pub mod target;

/// Version of the hmctile library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
