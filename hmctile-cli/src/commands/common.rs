//! Common utilities shared across CLI commands.

use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use hmctile::config::Config;
use hmctile::download::{PartitionStatus, ProgressCallback, ProgressUpdate};
use hmctile::geometry::{CountryBoundaries, HereTileBackend};

use crate::error::CliError;

/// Geometry backend for a configuration: the user's boundary file when one
/// is configured, the bundled table otherwise.
pub fn build_backend(config: &Config) -> Result<HereTileBackend, CliError> {
    let boundaries = match &config.boundaries {
        Some(path) => {
            let boundaries = CountryBoundaries::from_file(path)?;
            info!(
                path = %path.display(),
                countries = boundaries.len(),
                "Using country boundaries from file"
            );
            boundaries
        }
        None => CountryBoundaries::builtin()?,
    };
    Ok(HereTileBackend::new(boundaries))
}

/// Installs a Ctrl-C handler raising the returned flag.
pub fn install_cancel_handler() -> Result<Arc<AtomicBool>, CliError> {
    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_clone = Arc::clone(&cancel);

    ctrlc::set_handler(move || {
        eprintln!();
        eprintln!("Received interrupt, finishing current partition...");
        cancel_clone.store(true, Ordering::SeqCst);
    })
    .map_err(|e| CliError::SignalHandler(e.to_string()))?;

    Ok(cancel)
}

/// Progress bar over `total` partitions; hidden when stderr is not a terminal.
pub fn progress_bar(total: usize) -> ProgressBar {
    if !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template(
        "{elapsed_precise} [{bar:40.cyan/blue}] {pos}/{len} eta {eta} | {msg}",
    )
    .map(|style| style.progress_chars("█▓▒░ "))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

/// Downloader progress callback driving `bar`.
pub fn progress_callback(bar: &ProgressBar) -> ProgressCallback {
    let bar = bar.clone();
    Box::new(move |update: &ProgressUpdate<'_>| {
        bar.set_position(update.completed as u64);
        let status = match update.status {
            PartitionStatus::Written => "fetched",
            PartitionStatus::Skipped => "skipped",
            PartitionStatus::Failed => "failed",
        };
        bar.set_message(format!("{} {} {}", update.layer, update.tile, status));
    })
}
