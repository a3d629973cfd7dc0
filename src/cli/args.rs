//! Command-line argument parsing for Wallpaper Gallery
//!
//! This module defines the CLI structure using clap derive macros, providing
//! commands to browse a series, page through a filter, inspect a single
//! wallpaper and report statistics.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::constants::series;

/// Wallpaper Gallery - Browse the wallpaper catalog from the terminal
#[derive(Parser, Debug)]
#[command(
    name = "wallpaper_gallery",
    version,
    about = "Browse the wallpaper gallery catalog",
    long_about = "Loads wallpaper series from the gallery CDN or a bundled data directory.
Categories are fetched in the background while the first results are shown."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Serve catalog data from a directory containing `data/`
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Decode every payload inline instead of on the background worker
    #[arg(long, global = true)]
    pub inline_decode: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the wallpapers of a series
    Browse(BrowseArgs),

    /// List the wallpapers behind a filter key
    Filter(FilterArgs),

    /// Show one wallpaper with its neighbours
    Show(ShowArgs),

    /// Show wallpaper and cache statistics for a series
    Stats(StatsArgs),
}

/// How a series is loaded
#[derive(Args, Debug, Clone, Default)]
pub struct LoadArgs {
    /// Load server pages instead of category files
    #[arg(short, long)]
    pub paginated: bool,

    /// Do not wait for the background refill
    #[arg(long)]
    pub no_wait: bool,
}

/// Arguments for the browse command
#[derive(Args, Debug, Clone)]
pub struct BrowseArgs {
    /// Series to load
    #[arg(default_value = series::DESKTOP)]
    pub series: String,

    #[command(flatten)]
    pub load: LoadArgs,

    /// Page to show (paginated mode)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Load every remaining category in the foreground
    #[arg(long)]
    pub all: bool,

    /// Maximum number of wallpapers to print
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Print the load state as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the filter command
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Series to load
    pub series: String,

    /// Filter key: a category name, a `YYYY-MM` month or `all`
    pub key: String,

    #[command(flatten)]
    pub load: LoadArgs,

    /// Page of the filtered set to show
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Items per page (0 = configured default)
    #[arg(long, default_value = "0")]
    pub page_size: usize,

    /// Maximum number of wallpapers to print
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Print the load state as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the show command
#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Series to load
    pub series: String,

    /// Wallpaper identifier
    pub id: String,

    #[command(flatten)]
    pub load: LoadArgs,
}

/// Arguments for the stats command
#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// Series to load
    #[arg(default_value = series::DESKTOP)]
    pub series: String,

    #[command(flatten)]
    pub load: LoadArgs,

    /// Print statistics as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Logging level requested on the command line, if any
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }
}

impl GlobalArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.data_dir {
            config.catalog.local_data_dir = Some(dir.clone());
        }
        if self.inline_decode {
            config.loading.decode_worker = false;
        }
    }
}

impl BrowseArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.page == 0 {
            return Err("Page numbers start at 1".to_string());
        }
        if self.page > 1 && !self.load.paginated {
            return Err("--page requires --paginated".to_string());
        }
        if self.all && self.load.paginated {
            return Err("Cannot combine --all with --paginated".to_string());
        }
        Ok(())
    }
}

impl FilterArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.page == 0 {
            return Err("Page numbers start at 1".to_string());
        }
        if self.key.trim().is_empty() {
            return Err("Filter key must not be empty".to_string());
        }
        Ok(())
    }
}
