//! Command-line interface components
//!
//! This module contains CLI-specific code for the Wallpaper Gallery
//! application, including argument parsing, command handlers and the
//! background refill spinner.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{
    BrowseArgs, Cli, Commands, FilterArgs, GlobalArgs, LoadArgs, ShowArgs, StatsArgs,
};
pub use commands::{handle_browse, handle_filter, handle_show, handle_stats};
pub use progress::{ProgressConfig, RefillProgress};
