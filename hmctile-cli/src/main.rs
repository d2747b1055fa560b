//! hmctile CLI - Command-line interface
//!
//! This binary provides a command-line interface to the hmctile library.
//!
//! Without a subcommand it downloads what a YAML config describes:
//!
//! ```text
//! hmctile --config config.yaml [--dry-run] [--keep-going] [--output-dir DIR]
//! hmctile init [config.yaml]
//! hmctile tile 23618402
//! hmctile locate --lat 52.5 --lng 13.4 --level 12
//! ```

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::download::DownloadArgs;
use hmctile::config::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(name = "hmctile")]
#[command(version = hmctile::VERSION)]
#[command(about = "Download HERE map content tiles using a YAML config", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(flatten)]
    download: DownloadArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample config file
    Init {
        /// Where to write the config
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },

    /// Show level, column, row, quadkey and bounds of a tile id
    Tile {
        /// HERE tile id (long key)
        id: String,
    },

    /// Print the id of the tile containing a coordinate
    Locate {
        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,

        /// Tiling level
        #[arg(long, default_value = "12")]
        level: u8,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Init { path }) => commands::init::run(&path),
        Some(Commands::Tile { id }) => commands::tile::run_tile(&id),
        Some(Commands::Locate { lat, lng, level }) => commands::tile::run_locate(lat, lng, level),
        None => commands::download::run(cli.download),
    };

    if let Err(e) = result {
        e.exit();
    }
}
