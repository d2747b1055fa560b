//! Init command - write a sample configuration file.

use std::fs;
use std::path::Path;

use hmctile::config::sample_yaml;

use crate::error::CliError;

/// Run the init command.
///
/// Never overwrites an existing file.
pub fn run(path: &Path) -> Result<(), CliError> {
    if path.exists() {
        return Err(CliError::FileExists(path.to_path_buf()));
    }

    let yaml = sample_yaml()?;
    fs::write(path, yaml).map_err(|error| CliError::FileWrite {
        path: path.to_path_buf(),
        error,
    })?;

    println!("Sample configuration written to {}", path.display());
    println!();
    println!("Edit the target and layers, then run:");
    println!("  hmctile --config {}", path.display());
    Ok(())
}
