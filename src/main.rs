//! Static-asset route resolver (v1)
//!
//! Command-line front end for the matching engine.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 EDGE ROUTER                  │
//!                      │                                              │
//!   config file ───────┼─▶ loader ──▶ validation ──▶ Router           │
//!                      │                                │             │
//!                      │                                ▼             │
//!   watcher (notify) ──┼─▶ rebuilt Router ──▶ RouterStore (arc-swap)  │
//!                      │                                │             │
//!   request path ──────┼───────────────────▶ match_route()            │
//!                      │                                │             │
//!                      │                                ▼             │
//!                      │                     Action | NoMatch ────────┼──▶ stdout
//!                      └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use edge_router::config::loader::{load_config, read_config};
use edge_router::config::validation::validate_config;
use edge_router::config::watcher::{apply_updates, ConfigWatcher};
use edge_router::config::RouterStore;
use edge_router::observability::logging::{init_logging, LogFormat};
use edge_router::observability::metrics;
use edge_router::{Action, NoMatch};

#[derive(Parser)]
#[command(name = "edge-router")]
#[command(about = "Resolve request paths against a static-asset routing config", long_about = None)]
struct Cli {
    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format (pretty, json).
    #[arg(long, global = true, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a config file and report every invalid rule
    Validate { config: PathBuf },
    /// Resolve one or more paths
    Resolve {
        config: PathBuf,
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Print the normalized config as JSON
    Dump { config: PathBuf },
    /// Resolve paths read from stdin, reloading the config when it changes.
    /// Each line is used verbatim as the path (only the line ending is removed).
    Watch {
        config: PathBuf,
        /// Expose Prometheus metrics on this address.
        #[arg(long)]
        metrics_address: Option<SocketAddr>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    match cli.command {
        Commands::Validate { config } => validate_command(&config),
        Commands::Resolve { config, paths } => {
            let router = load_config(&config)?;
            for path in &paths {
                print_resolution(path, router.match_route(path))?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Dump { config } => {
            let parsed = read_config(&config)?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Watch {
            config,
            metrics_address,
        } => watch_command(&config, metrics_address).await,
    }
}

fn validate_command(path: &Path) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let parsed = read_config(path)?;
    match validate_config(&parsed) {
        Ok(()) => {
            println!(
                "{}: ok ({} rules, {} manifest entries)",
                path.display(),
                parsed.routes.len(),
                parsed.manifest.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => {
            for error in &errors {
                eprintln!("{}: {}", path.display(), error);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn watch_command(
    path: &Path,
    metrics_address: Option<SocketAddr>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    if let Some(addr) = metrics_address {
        metrics::init_metrics(addr)?;
    }

    let store = Arc::new(RouterStore::new(load_config(path)?));
    tracing::info!(path = %path.display(), "Configuration loaded");

    let (watcher, updates) = ConfigWatcher::new(path);
    let _watcher = watcher.run()?;
    tokio::spawn(apply_updates(store.clone(), updates));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if let Some(request_path) = request_path(&line) {
                    print_resolution(request_path, store.match_route(request_path))?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Strip the line ending and nothing else; blank lines are skipped.
fn request_path(line: &str) -> Option<&str> {
    let path = line.strip_suffix('\r').unwrap_or(line);
    (!path.is_empty()).then_some(path)
}

fn print_resolution(
    path: &str,
    result: Result<Action, NoMatch>,
) -> Result<(), serde_json::Error> {
    match result {
        Ok(action) => println!("{} {}", path, serde_json::to_string(&action)?),
        Err(NoMatch) => println!("{} no match", path),
    }
    Ok(())
}
