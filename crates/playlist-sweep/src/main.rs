//! playlist-sweep CLI entry point.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use playlist_sweep::cli;
use playlist_sweep::cli::scrape_cmd::ScrapeArgs;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "playlist-sweep")]
#[command(about = "Scroll a playlist page in a headless browser and export every video")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Playlist URL (overrides PLAYLIST_SWEEP_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Directory for exported files (overrides PLAYLIST_SWEEP_OUTPUT_DIR)
    #[arg(long, short = 'o', global = true)]
    output_dir: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    headful: bool,

    /// Launch Chromium without its sandbox (containers)
    #[arg(long)]
    no_sandbox: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Suppress the human-readable summary
    #[arg(long, short = 'q')]
    quiet: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API key, browser and output directory
    Doctor {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.quiet {
        std::env::set_var("PLAYLIST_SWEEP_QUIET", "1");
    }

    setup_tracing(cli.log_format, cli.verbose);

    match cli.command {
        Some(Commands::Doctor { json }) => cli::doctor::run(json).await,
        None => {
            cli::scrape_cmd::run(ScrapeArgs {
                url: cli.url,
                output_dir: cli.output_dir,
                headful: cli.headful,
                no_sandbox: cli.no_sandbox,
                json: cli.json,
            })
            .await
        }
    }
}

fn setup_tracing(format: LogFormat, verbose: bool) {
    let default = if verbose {
        "playlist_sweep=debug,info"
    } else {
        "playlist_sweep=info,warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
