mod cache;
mod capture;
mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod extraction;
mod infra;
mod services;
mod workflow;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cmd::capture::{self as capture_cmd, CaptureArgs};
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::license::{self as license_cmd, LicenseArgs};
use crate::cmd::tickets::{self, AnalyzeArgs, PublishArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;

#[derive(Parser)]
#[command(
    name = "storyscribe",
    author,
    version,
    about = "Turn meeting transcripts into GitHub issues"
)]
struct Cli {
    /// Log pipeline details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the transcript found on a saved meeting page.
    Capture(CaptureArgs),
    /// Buffer live caption lines from stdin and print the transcript.
    Listen,
    /// Extract tickets from a transcript and keep them for publishing.
    Analyze(AnalyzeArgs),
    /// Create one issue per ticket from the last analysis.
    Publish(PublishArgs),
    /// Analyze a transcript and publish the tickets immediately.
    Run(AnalyzeArgs),
    /// Check the license key.
    License(LicenseArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(error) = run(cli.command).await {
        if let Some(stage) = error.stage() {
            debug!(%stage, cause = ?error.root(), "pipeline aborted");
        }
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

const DEFAULT_LOG_FILTER: &str = "warn,storyscribe=info";
const VERBOSE_LOG_FILTER: &str = "warn,storyscribe=debug";

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::new(log_directives(verbose, std::env::var("RUST_LOG").ok()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `--verbose` beats `RUST_LOG`, which beats the default.
fn log_directives(verbose: bool, from_env: Option<String>) -> String {
    if verbose {
        return VERBOSE_LOG_FILTER.to_string();
    }
    from_env
        .filter(|directives| !directives.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

async fn run(command: Commands) -> AppResult<()> {
    match command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Capture(args) => capture_cmd::run_capture(args),
        Commands::Listen => capture_cmd::run_listen().await,
        Commands::Analyze(args) => tickets::run_analyze(&load_context()?, args).await,
        Commands::Publish(args) => tickets::run_publish(&load_context()?, args).await,
        Commands::Run(args) => tickets::run_all(&load_context()?, args).await,
        Commands::License(args) => license_cmd::run(&load_context()?, args.command).await,
    }
}

fn load_context() -> AppResult<AppContext> {
    let config = AppConfig::load()?;
    Ok(AppContext::from_config(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_log_directives() {
        assert_eq!(log_directives(false, None), "warn,storyscribe=info");
        assert_eq!(log_directives(false, Some("  ".to_string())), "warn,storyscribe=info");
        assert_eq!(log_directives(false, Some("trace".to_string())), "trace");
        assert_eq!(log_directives(true, Some("trace".to_string())), "warn,storyscribe=debug");
    }
}
