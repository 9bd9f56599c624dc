//! CLI command implementations
//!
//! Every command loads the configuration first. `search` and `serve` then
//! build the in-memory store from it, seeding it when `seed_path` is set.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::http_server::HttpServer;
use crate::planner::{ExplainPlan, FilterPlanner};
use crate::service::ListingService;
use crate::store::MemoryStore;

use super::args::{Cli, Command, SearchArgs};
use super::errors::{CliError, CliResult};
use super::io::{write_json, write_text};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "LISTINGS_LOG";

/// Parse arguments, set up logging and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_tracing();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::Search { config, search: args } => search(&config, &args),
        Command::Explain {
            config,
            search: args,
            json,
        } => explain(&config, &args, json),
    }
}

fn init_tracing() {
    let env = std::env::var(LOG_ENV).unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::from_str(&env).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Start the HTTP API server.
///
/// Refuses to start without at least one API key.
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = AppConfig::load(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }
    if config.api_keys.is_empty() {
        return Err(CliError::config_error(
            "no API keys configured; set api_keys or LISTINGS_API_KEY",
        ));
    }

    let store = build_store(&config)?;
    let server = HttpServer::new(&config, ListingService::new(store));

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Run one search and print the matching listings as JSON
pub fn search(config_path: &Path, args: &SearchArgs) -> CliResult<()> {
    let config = AppConfig::load(config_path)?;
    let store = build_store(&config)?;
    let service = ListingService::new(store);

    let criteria = args.criteria();
    let options = args.options(config.default_limit);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;
    let listings = rt.block_on(service.search(&criteria, &options));

    write_json(&listings)
}

/// Print the plan for a search without executing it
pub fn explain(config_path: &Path, args: &SearchArgs, json: bool) -> CliResult<()> {
    let config = AppConfig::load(config_path)?;
    let plan = FilterPlanner::plan(&args.criteria(), &args.options(config.default_limit));
    let explain = ExplainPlan::from_plan(&plan);

    if json {
        write_json(&explain)
    } else {
        write_text(&explain.to_string())
    }
}

/// Build the in-memory store described by `config`
pub fn build_store(config: &AppConfig) -> CliResult<Arc<MemoryStore>> {
    let store = MemoryStore::new(&config.collection).with_index_policy(config.index_policy.clone());

    if let Some(seed_path) = &config.seed_path {
        let loaded = store.seed_from_file(seed_path)?;
        info!(
            collection = %config.collection,
            path = %seed_path.display(),
            loaded,
            "seeded listing store"
        );
    }

    Ok(Arc::new(store))
}
