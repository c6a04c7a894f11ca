// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wanglai - a LINE bookkeeping bot.
//!
//! This is the binary entry point.

mod recurring;
mod serve;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use wanglai_config::{ConfigError, WanglaiConfig};

/// Wanglai - a LINE bookkeeping bot.
#[derive(Parser, Debug)]
#[command(name = "wanglai", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server and dispatch worker.
    Serve,
    /// Load and validate configuration, then exit.
    CheckConfig,
    /// Copy recurring transactions forward once, then exit.
    GenerateRecurring {
        /// Target date (YYYY-MM-DD). Defaults to today in the summary timezone.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

fn load(path: Option<&Path>) -> Result<WanglaiConfig, Vec<ConfigError>> {
    match path {
        Some(path) => wanglai_config::load_and_validate_path(path),
        None => wanglai_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            wanglai_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            init_tracing(&config.server.log_level);
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::CheckConfig) => {
            if let Err(errors) = wanglai_config::validate_serving_secrets(&config) {
                wanglai_config::render_errors(&errors);
                std::process::exit(1);
            }
            println!(
                "wanglai: config ok (listening on {}:{}{})",
                config.server.host, config.server.port, config.server.webhook_path
            );
        }
        Some(Commands::GenerateRecurring { date }) => {
            init_tracing(&config.server.log_level);
            match recurring::generate_once(&config, date).await {
                Ok(inserted) => println!("wanglai: {inserted} recurring transaction(s) generated"),
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("wanglai: use --help for available commands");
        }
    }
}

/// Crate targets that follow the configured log level; everything else logs
/// warnings only.
const LOG_TARGETS: &[&str] = &[
    "wanglai",
    "wanglai_agent",
    "wanglai_config",
    "wanglai_dify",
    "wanglai_gateway",
    "wanglai_line",
    "wanglai_media",
    "wanglai_reply",
    "wanglai_storage",
    "wanglai_summary",
];

fn default_filter(log_level: &str) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(LOG_TARGETS.iter().map(|target| format!("{target}={log_level}")));
    directives.join(",")
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
