//! Wallpaper Gallery CLI application
//!
//! Command-line interface for browsing the wallpaper catalog. Series are
//! loaded from the gallery CDN or from a bundled data directory.

use std::process;

use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use wallpaper_gallery::cli::{
    handle_browse, handle_filter, handle_show, handle_stats, Cli, Commands,
};
use wallpaper_gallery::config::{AppConfig, LoggingConfig};
use wallpaper_gallery::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();

    let mut config = AppConfig::load(cli.global.config.clone()).await?;
    cli.global.apply_overrides(&mut config);

    init_logging(&cli, &config.logging);
    info!("Wallpaper Gallery v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Browse(args) => {
            debug!("Executing browse command");
            handle_browse(&config, args).await
        }
        Commands::Filter(args) => {
            debug!("Executing filter command");
            handle_filter(&config, args).await
        }
        Commands::Show(args) => {
            debug!("Executing show command");
            handle_show(&config, args).await
        }
        Commands::Stats(args) => {
            debug!("Executing stats command");
            handle_stats(&config, args).await
        }
    }
}

/// Initialize logging from CLI verbosity, falling back to the config level
fn init_logging(cli: &Cli, logging: &LoggingConfig) {
    let level = cli
        .log_level()
        .map(|level| level.to_string().to_lowercase())
        .unwrap_or_else(|| logging.level.clone());

    let mut filter = EnvFilter::from_default_env();
    match format!("wallpaper_gallery={}", level).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Ignoring invalid log level '{}': {}", level, e),
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(logging.colored_output)
        .with_level(cli.global.very_verbose)
        .with_writer(std::io::stderr)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
