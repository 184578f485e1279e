//! Configuration module for the bucket order service.
//!
//! This module provides structures and utilities for managing service
//! configuration. Configuration is loaded from a TOML file, environment
//! variable references are resolved before parsing, and the result is
//! validated before use.

use bucket_types::{MenuCatalog, MenuCategory};
use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "testing")]
pub mod builders {
	pub mod config;
}
#[cfg(feature = "testing")]
pub use builders::config::ConfigBuilder;

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

/// Main configuration structure for the bucket order service.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	/// Configuration specific to the service instance.
	pub service: ServiceConfig,
	/// Configuration for the order store.
	pub storage: StorageConfig,
	/// Menu served by the service. The standard menu is used when absent.
	#[serde(default)]
	pub menu: Option<MenuConfig>,
	/// Configuration for the HTTP API server.
	pub api: Option<ApiConfig>,
}

/// Configuration specific to the service instance.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
	/// Identifier used in logs.
	pub id: String,
}

/// Configuration for the order store.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

impl StorageConfig {
	/// Returns the raw configuration of the primary implementation.
	pub fn primary_config(&self) -> Option<&toml::Value> {
		self.implementations.get(&self.primary)
	}
}

/// Menu definition.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuConfig {
	/// Categories in lookup order.
	pub categories: Vec<MenuCategory>,
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize)]
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
	/// CORS configuration.
	pub cors: Option<CorsConfig>,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
	/// Allowed origins for CORS.
	pub allowed_origins: Vec<String>,
}

/// Returns the default API host.
fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

/// Returns the default API port.
fn default_api_port() -> u16 {
	5000
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)));
				},
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
	/// Loads configuration from a file, resolving environment variables and
	/// validating the result.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path).await.map_err(|e| {
			ConfigError::Io(std::io::Error::new(
				e.kind(),
				format!("Cannot read configuration file {}: {}", path, e),
			))
		})?;
		content.parse()
	}

	/// Builds the menu catalog served by the service.
	pub fn menu_catalog(&self) -> MenuCatalog {
		match &self.menu {
			Some(menu) => MenuCatalog::new(menu.categories.clone()),
			None => MenuCatalog::standard(),
		}
	}

	/// Validates the configuration to ensure all required fields are properly set.
	///
	/// - Ensures the service ID is not empty
	/// - Validates the primary storage implementation is configured
	/// - Checks menu categories and items when a menu is given
	/// - Checks CORS origins when the API is enabled
	fn validate(&self) -> Result<(), ConfigError> {
		if self.service.id.is_empty() {
			return Err(ConfigError::Validation("Service ID cannot be empty".into()));
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
		if self.storage.primary_config().is_none() {
			return Err(ConfigError::Validation(format!(
				"Primary storage '{}' not found in implementations",
				self.storage.primary
			)));
		}

		if let Some(ref menu) = self.menu {
			self.validate_menu(menu)?;
		}

		if let Some(ref api) = self.api {
			if api.enabled {
				if api.host.is_empty() {
					return Err(ConfigError::Validation("API host cannot be empty".into()));
				}
				if let Some(ref cors) = api.cors {
					if cors.allowed_origins.iter().any(|origin| origin.is_empty()) {
						return Err(ConfigError::Validation(
							"CORS allowed_origins cannot contain empty entries".into(),
						));
					}
				}
			}
		}

		Ok(())
	}

	/// Validates a configured menu.
	///
	/// Category names must be unique and non-empty, every category needs at
	/// least one item, item names must be non-empty and prices non-negative.
	fn validate_menu(&self, menu: &MenuConfig) -> Result<(), ConfigError> {
		if menu.categories.is_empty() {
			return Err(ConfigError::Validation(
				"Menu must define at least one category".into(),
			));
		}

		let mut seen = HashSet::new();
		for category in &menu.categories {
			if category.name.is_empty() {
				return Err(ConfigError::Validation(
					"Menu category name cannot be empty".into(),
				));
			}
			if !seen.insert(category.name.as_str()) {
				return Err(ConfigError::Validation(format!(
					"Duplicate menu category '{}'",
					category.name
				)));
			}
			if category.items.is_empty() {
				return Err(ConfigError::Validation(format!(
					"Menu category '{}' has no items",
					category.name
				)));
			}
			for item in &category.items {
				if item.name.is_empty() {
					return Err(ConfigError::Validation(format!(
						"Menu category '{}' contains an item without a name",
						category.name
					)));
				}
				if item.price.is_sign_negative() {
					return Err(ConfigError::Validation(format!(
						"Menu item '{}' has a negative price",
						item.name
					)));
				}
			}
		}

		Ok(())
	}
}

/// Parses configuration from a TOML string.
///
/// Environment variables are resolved and the configuration is validated
/// after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
