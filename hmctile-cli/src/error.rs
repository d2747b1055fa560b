//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use hmctile::config::ConfigError;
use hmctile::coord::CoordError;
use hmctile::download::DownloadError;
use hmctile::export::ExportError;
use hmctile::fetch::{FetchError, ACCESS_TOKEN_ENV};
use hmctile::geometry::BoundaryError;
use hmctile::target::ResolveError;

/// Exit code for runtime failures.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code for unusable configuration or arguments.
pub const EXIT_CONFIG: i32 = 2;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Missing or conflicting command line arguments
    Usage(String),
    /// Configuration file could not be loaded
    Config(ConfigError),
    /// Boundary file named by the configuration could not be loaded
    Boundaries(BoundaryError),
    /// Target could not be turned into tiles
    Resolve(ResolveError),
    /// Fetcher could not be set up
    Fetcher(FetchError),
    /// Download run failed
    Download(DownloadError),
    /// Tile GeoJSON could not be written
    Export(ExportError),
    /// Invalid tile id or coordinates
    Coord(CoordError),
    /// Refusing to overwrite an existing file
    FileExists(PathBuf),
    /// Failed to write output file
    FileWrite {
        path: PathBuf,
        error: std::io::Error,
    },
    /// Failed to install the Ctrl-C handler
    SignalHandler(String),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) | CliError::Config(_) | CliError::Boundaries(_) => EXIT_CONFIG,
            _ => EXIT_FAILURE,
        }
    }

    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Download(DownloadError::Incomplete { failures, .. }) => {
                eprintln!();
                eprintln!("Failed partitions:");
                for failure in failures {
                    eprintln!("  {}", failure);
                }
                eprintln!();
                eprintln!("Rerun to retry; partitions already on disk are skipped.");
            }
            CliError::Download(DownloadError::Cancelled { .. }) => {
                eprintln!("Rerun to resume; partitions already on disk are skipped.");
            }
            CliError::Fetcher(FetchError::Auth(_)) => {
                eprintln!();
                eprintln!("The DATA_SDK download method needs a HERE platform access token:");
                eprintln!("  export {}=<token>", ACCESS_TOKEN_ENV);
                eprintln!("or switch the config to download_method: OLP_CLI.");
            }
            CliError::Config(ConfigError::Parse(_)) => {
                eprintln!();
                eprintln!("Run `hmctile init` to write a sample config.yaml.");
            }
            _ => {}
        }

        process::exit(self.exit_code())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Usage(msg) => write!(f, "{}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Boundaries(e) => write!(f, "Failed to load country boundaries: {}", e),
            CliError::Resolve(e) => write!(f, "Failed to resolve target: {}", e),
            CliError::Fetcher(e) => write!(f, "Failed to set up downloads: {}", e),
            CliError::Download(e) => write!(f, "Download failed: {}", e),
            CliError::Export(e) => write!(f, "Failed to export tiles: {}", e),
            CliError::Coord(e) => write!(f, "{}", e),
            CliError::FileExists(path) => write!(
                f,
                "'{}' already exists, remove it or choose another path",
                path.display()
            ),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
            CliError::SignalHandler(msg) => write!(f, "Failed to set signal handler: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Boundaries(e) => Some(e),
            CliError::Resolve(e) => Some(e),
            CliError::Fetcher(e) => Some(e),
            CliError::Download(e) => Some(e),
            CliError::Export(e) => Some(e),
            CliError::Coord(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<BoundaryError> for CliError {
    fn from(e: BoundaryError) -> Self {
        CliError::Boundaries(e)
    }
}

impl From<ResolveError> for CliError {
    fn from(e: ResolveError) -> Self {
        CliError::Resolve(e)
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Fetcher(e)
    }
}

impl From<DownloadError> for CliError {
    fn from(e: DownloadError) -> Self {
        CliError::Download(e)
    }
}

impl From<ExportError> for CliError {
    fn from(e: ExportError) -> Self {
        CliError::Export(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Coord(e)
    }
}
