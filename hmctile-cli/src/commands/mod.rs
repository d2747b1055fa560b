//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`download`] - Main command (resolve the config's target, fetch partitions)
//! - [`init`] - Sample configuration
//! - [`tile`] - Tile id inspection and coordinate lookup

pub mod common;
pub mod download;
pub mod init;
pub mod tile;
