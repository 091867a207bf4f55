//! Site-Checker main entry point
//!
//! This is the command-line interface that starts the Site-Checker HTTP server.

use anyhow::Context;
use clap::Parser;
use site_checker::config::{load_config_with_hash, validate, Config};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Checker: a streaming link and image checker
///
/// Site-Checker serves an HTTP endpoint that fetches a page, resolves the
/// final destination of every link on it, and streams the results back as
/// Server-Sent Events.
#[derive(Parser, Debug)]
#[command(name = "site-checker")]
#[command(version)]
#[command(about = "A streaming link and image checker", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Validate config and print the effective settings without serving
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given; using defaults");
            Config::default()
        }
    };

    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        print_config(&config);
        return Ok(());
    }

    site_checker::server::serve(&config)
        .await
        .context("Server error")?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_checker=info,tower_http=info,warn"),
            1 => EnvFilter::new("site_checker=debug,tower_http=debug,info"),
            2 => EnvFilter::new("site_checker=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: prints the effective configuration
fn print_config(config: &Config) {
    println!("=== Site-Checker Dry Run ===\n");

    println!("Server:");
    println!("  Listen: {}:{}", config.server.host, config.server.port);

    println!("\nResolver:");
    println!("  Concurrency: {}", config.resolver.concurrency);
    println!("  Max attempts: {}", config.resolver.max_attempts);
    println!("  Retry backoff: {} ms", config.resolver.retry_backoff_ms);
    println!("  Max redirects: {}", config.resolver.max_redirects);
    println!("  Request timeout: {} s", config.resolver.request_timeout_secs);

    println!("\nCache:");
    println!("  Scope: {:?}", config.cache.scope);
    println!("  Capacity: {}", config.cache.capacity);
    println!("  TTL: {} s", config.cache.ttl_secs);

    println!("\nUser agent: {}", config.user_agent.header_value());

    println!("\n✓ Configuration is valid");
}
