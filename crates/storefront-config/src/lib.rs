//! Configuration module for the storefront system.
//!
//! This module provides structures and utilities for managing service
//! configuration. It supports loading configuration from TOML files with
//! `${VAR}` / `${VAR:-default}` environment variable resolution and
//! validates that all required configuration values are properly set.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for the storefront service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration specific to this store instance.
	pub store: StoreConfig,
	/// Configuration for the storage backend.
	pub storage: StorageConfig,
	/// Configuration for the HTTP API server.
	pub api: Option<ApiConfig>,
}

/// Configuration specific to the store instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
	/// Unique identifier for this store instance.
	pub id: String,
	/// Page size for a user's own order history listing.
	#[serde(default = "default_order_history_page_size")]
	pub order_history_page_size: u32,
	/// Page size for the admin order listing.
	#[serde(default = "default_admin_page_size")]
	pub admin_page_size: u32,
}

/// Returns the default order-history page size.
fn default_order_history_page_size() -> u32 {
	10
}

/// Returns the default admin listing page size.
fn default_admin_page_size() -> u32 {
	2
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Whether the API server is enabled.
	#[serde(default)]
	pub enabled: bool,
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
}

/// Returns the default API host.
fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

/// Returns the default API port.
fn default_api_port() -> u16 {
	3000
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable
/// VAR_NAME. Supports default values with ${VAR_NAME:-default_value}.
fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).expect("capture 0 always present");
		let var_name = cap.get(1).expect("variable name group").as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)))
				}
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a file, resolving environment variables
	/// and validating the result.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let contents = tokio::fs::read_to_string(path).await?;
		contents.parse()
	}

	/// Validates the configuration to ensure all required fields are
	/// properly set.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.store.id.is_empty() {
			return Err(ConfigError::Validation("Store ID cannot be empty".into()));
		}
		if self.store.order_history_page_size == 0 {
			return Err(ConfigError::Validation(
				"order_history_page_size must be greater than 0".into(),
			));
		}
		if self.store.admin_page_size == 0 {
			return Err(ConfigError::Validation(
				"admin_page_size must be greater than 0".into(),
			));
		}

		if self.storage.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one storage implementation must be configured".into(),
			));
		}
		if self.storage.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Storage primary implementation cannot be empty".into(),
			));
		}
		if !self
			.storage
			.implementations
			.contains_key(&self.storage.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary storage '{}' not found in implementations",
				self.storage.primary
			)));
		}

		if let Some(ref api) = self.api {
			if api.enabled && api.host.is_empty() {
				return Err(ConfigError::Validation("API host cannot be empty".into()));
			}
		}

		Ok(())
	}
}

/// Implementation of FromStr trait for Config to enable parsing from
/// string.
///
/// Environment variables are resolved and the configuration is
/// automatically validated after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const MINIMAL: &str = r#"
[store]
id = "test-store"

[storage]
primary = "memory"
[storage.implementations.memory]
"#;

	#[test]
	fn test_minimal_config_parses_with_defaults() {
		let config: Config = MINIMAL.parse().unwrap();
		assert_eq!(config.store.id, "test-store");
		assert_eq!(config.store.order_history_page_size, 10);
		assert_eq!(config.store.admin_page_size, 2);
		assert!(config.api.is_none());
	}

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("STOREFRONT_TEST_ID", "env-store");

		let config_str = r#"
[store]
id = "${STOREFRONT_TEST_ID}"

[storage]
primary = "memory"
[storage.implementations.memory]
"#;
		let config: Config = config_str.parse().unwrap();
		assert_eq!(config.store.id, "env-store");

		std::env::remove_var("STOREFRONT_TEST_ID");
	}

	#[test]
	fn test_env_var_with_default() {
		let config_str = r#"
[store]
id = "${STOREFRONT_MISSING_ID:-fallback-store}"

[storage]
primary = "memory"
[storage.implementations.memory]
"#;
		let config: Config = config_str.parse().unwrap();
		assert_eq!(config.store.id, "fallback-store");
	}

	#[test]
	fn test_missing_env_var_error() {
		let config_str = r#"
[store]
id = "${STOREFRONT_MISSING_ID}"

[storage]
primary = "memory"
[storage.implementations.memory]
"#;
		let result = config_str.parse::<Config>();
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("STOREFRONT_MISSING_ID"));
	}

	#[test]
	fn test_empty_store_id_rejected() {
		let config_str = r#"
[store]
id = ""

[storage]
primary = "memory"
[storage.implementations.memory]
"#;
		let result = config_str.parse::<Config>();
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("Store ID"));
	}

	#[test]
	fn test_unknown_primary_storage_rejected() {
		let config_str = r#"
[store]
id = "test-store"

[storage]
primary = "file"
[storage.implementations.memory]
"#;
		let result = config_str.parse::<Config>();
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("Primary storage"));
	}

	#[test]
	fn test_zero_page_size_rejected() {
		let config_str = r#"
[store]
id = "test-store"
admin_page_size = 0

[storage]
primary = "memory"
[storage.implementations.memory]
"#;
		let result = config_str.parse::<Config>();
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("admin_page_size"));
	}

	#[tokio::test]
	async fn test_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");
		std::fs::write(&path, MINIMAL).unwrap();

		let config = Config::from_file(path.to_str().unwrap()).await.unwrap();
		assert_eq!(config.store.id, "test-store");
	}

	#[test]
	fn test_api_section_defaults() {
		let config_str = r#"
[store]
id = "test-store"

[storage]
primary = "memory"
[storage.implementations.memory]

[api]
enabled = true
"#;
		let config: Config = config_str.parse().unwrap();
		let api = config.api.unwrap();
		assert!(api.enabled);
		assert_eq!(api.host, "127.0.0.1");
		assert_eq!(api.port, 3000);
	}
}
