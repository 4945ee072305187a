//! Main entry point for the storefront service.
//!
//! This binary wires the configuration, storage backend, and commerce
//! engine together and serves the HTTP API. Storage backends are selected
//! through a factory registry so the configured name picks the
//! implementation without any compile-time coupling.

use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use storefront_config::Config;
use storefront_core::CommerceEngine;
use storefront_storage::{StorageFactory, StorageService};

mod server;

use storefront_storage::implementations::file::create_storage as create_file_storage;
use storefront_storage::implementations::memory::create_storage as create_memory_storage;

/// Command-line arguments for the storefront service.
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

/// Main entry point for the storefront service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the commerce engine with the configured storage backend
/// 5. Serves the HTTP API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt().with_env_filter(env_filter).with_target(true).init();

	tracing::info!("Started storefront");

	// Load configuration
	let config_path = args
		.config
		.to_str()
		.ok_or("Configuration path is not valid UTF-8")?;
	let config = Config::from_file(config_path).await?;
	tracing::info!("Loaded configuration [{}]", config.store.id);

	// Build the engine with the configured storage backend
	let engine = Arc::new(build_engine(config.clone())?);

	match config.api {
		Some(api) if api.enabled => server::start_server(api, engine).await?,
		_ => {
			tracing::warn!("API server disabled in configuration, nothing to serve");
		}
	}

	tracing::info!("Stopped storefront");
	Ok(())
}

/// Returns the registry of available storage backend factories.
fn storage_factories() -> HashMap<String, StorageFactory> {
	let mut factories: HashMap<String, StorageFactory> = HashMap::new();
	factories.insert("file".to_string(), create_file_storage);
	factories.insert("memory".to_string(), create_memory_storage);
	factories
}

/// Builds the commerce engine over the configured storage backend.
fn build_engine(config: Config) -> Result<CommerceEngine, Box<dyn std::error::Error>> {
	let factories = storage_factories();
	let factory = factories.get(&config.storage.primary).ok_or_else(|| {
		format!(
			"Unknown storage backend '{}' (available: {:?})",
			config.storage.primary,
			factories.keys().collect::<Vec<_>>()
		)
	})?;

	let backend_config = config
		.storage
		.implementations
		.get(&config.storage.primary)
		.cloned()
		.unwrap_or(toml::Value::Table(toml::map::Map::new()));
	let backend = factory(&backend_config)?;

	let storage = Arc::new(StorageService::new(backend));
	Ok(CommerceEngine::new(config, storage))
}

#[cfg(test)]
mod tests {
	use super::*;

	const TEST_CONFIG: &str = r#"
[store]
id = "test-store"

[storage]
primary = "memory"
[storage.implementations.memory]
"#;

	#[test]
	fn test_args_default_values() {
		let args = Args {
			config: PathBuf::from("config.toml"),
			log_level: "info".to_string(),
		};

		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
	}

	#[test]
	fn test_storage_factories_registry() {
		let factories = storage_factories();

		assert_eq!(factories.len(), 2);
		assert!(factories.contains_key("memory"));
		assert!(factories.contains_key("file"));
	}

	#[test]
	fn test_build_engine_with_minimal_config() {
		let config: Config = TEST_CONFIG.parse().unwrap();

		let result = build_engine(config);
		assert!(result.is_ok(), "Failed to build engine: {:?}", result.err());

		let engine = result.unwrap();
		assert_eq!(engine.config().store.id, "test-store");
	}

	#[test]
	fn test_build_engine_rejects_unregistered_backend() {
		let config_str = r#"
[store]
id = "test-store"

[storage]
primary = "redis"
[storage.implementations.redis]
"#;
		let config: Config = config_str.parse().unwrap();

		let result = build_engine(config);
		assert!(result.is_err());
		assert!(result.err().unwrap().to_string().contains("redis"));
	}
}
