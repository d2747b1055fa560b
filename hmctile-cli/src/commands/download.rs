//! Download command - resolve the configured target and fetch its partitions.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use hmctile::config::Config;
use hmctile::download::Downloader;
use hmctile::export::write_tiles_geojson;
use hmctile::fetch::fetcher_for;
use hmctile::logging::init_logging;
use hmctile::store::PartitionStore;
use hmctile::target::{ResolvedRequest, Resolver};

use super::common::{build_backend, install_cancel_handler, progress_bar, progress_callback};
use crate::error::CliError;

/// Arguments for the download command (the default command).
#[derive(Debug, Default, Args)]
pub struct DownloadArgs {
    /// Path to the YAML config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Resolve the target and print tile ids without downloading
    #[arg(long)]
    pub dry_run: bool,

    /// Continue past failed partitions and report them at the end
    #[arg(long)]
    pub keep_going: bool,

    /// Directory to write partitions into (overrides output_dir)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Also write the resolved tiles as a GeoJSON FeatureCollection
    #[arg(long, value_name = "FILE")]
    pub tiles_geojson: Option<PathBuf>,

    /// Path to the olp executable (OLP_CLI download method)
    #[arg(long, value_name = "PATH")]
    pub olp_bin: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

/// Run the download command.
pub fn run(args: DownloadArgs) -> Result<(), CliError> {
    let _logging_guard = init_logging(args.verbose, args.log_file.as_deref())
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    let config_path = args.config.ok_or_else(|| {
        CliError::Usage("--config <PATH> is required (or run `hmctile init`)".to_string())
    })?;
    let mut config = Config::load(&config_path)?;
    if let Some(output_dir) = args.output_dir {
        config = config.with_output_dir(output_dir);
    }

    let resolver = Resolver::new(build_backend(&config)?);
    let level = config.tile_level();
    let tiles = resolver.resolve(&config.target, level)?;
    info!(
        catalog = %config.catalog,
        level,
        target = config.target.kind(),
        tiles = tiles.len(),
        "Resolved target"
    );

    if let Some(path) = &args.tiles_geojson {
        write_tiles_geojson(path, &tiles)?;
    }

    if tiles.is_empty() {
        println!("No partition IDs resolved.");
        return Ok(());
    }

    if args.dry_run {
        for tile in &tiles {
            println!("{}", tile);
        }
        return Ok(());
    }

    let request = ResolvedRequest::for_config(&config, tiles);
    let fetcher = fetcher_for(config.download_method, args.olp_bin.as_deref())?;
    let cancel = install_cancel_handler()?;
    let bar = progress_bar(request.request_count());

    let downloader = Downloader::new(fetcher, PartitionStore::new(&config.output_dir))
        .with_keep_going(args.keep_going)
        .with_cancel_flag(cancel)
        .with_progress(progress_callback(&bar));

    let result = downloader.run(&request);
    match &result {
        Ok(_) => bar.finish_and_clear(),
        Err(_) => bar.abandon(),
    }
    let report = result?;

    println!(
        "Downloaded {} partitions ({} already present) into {}",
        report.written,
        report.skipped,
        config.output_dir.display()
    );
    Ok(())
}
