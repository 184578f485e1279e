//! Main entry point for the bucket order service.
//!
//! This binary loads the service configuration, wires the configured order
//! store into the order lifecycle, and serves the menu and order endpoints
//! over HTTP.

use bucket_config::Config;
use bucket_core::OrderLifecycle;
use bucket_storage::{get_all_implementations, StorageService};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod server;

/// Command-line arguments for the bucket service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the bucket service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the order lifecycle over the configured store
/// 5. Serves the API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started bucket service");

	let config = Config::from_file(&args.config.to_string_lossy()).await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let lifecycle = Arc::new(build_lifecycle(&config)?);

	match config.api.clone() {
		Some(api_config) if api_config.enabled => {
			server::start_server(api_config, lifecycle).await?;
			tracing::info!("API server finished");
		},
		_ => {
			tracing::warn!("API server is disabled; nothing to serve");
		},
	}

	tracing::info!("Stopped bucket service");
	Ok(())
}

/// Builds the order lifecycle from configuration.
///
/// Looks up the primary storage backend among the registered implementations
/// and pairs it with the configured menu.
fn build_lifecycle(config: &Config) -> Result<OrderLifecycle, Box<dyn std::error::Error>> {
	let primary = config.storage.primary.as_str();
	let factory = get_all_implementations()
		.into_iter()
		.find(|(name, _)| *name == primary)
		.map(|(_, factory)| factory)
		.ok_or_else(|| format!("Unknown storage implementation '{}'", primary))?;

	let storage_config = config
		.storage
		.primary_config()
		.ok_or_else(|| format!("Missing configuration for storage '{}'", primary))?;

	let backend = factory(storage_config)?;
	let storage = Arc::new(StorageService::new(backend));
	tracing::info!(
		component = "storage",
		implementation = %primary,
		location = %storage.describe(),
		"Loaded"
	);

	let menu = config.menu_catalog();
	tracing::info!(
		component = "menu",
		items = menu.item_count(),
		"Loaded"
	);

	Ok(OrderLifecycle::new(Arc::new(menu), storage))
}
