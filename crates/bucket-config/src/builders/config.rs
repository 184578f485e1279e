//! Configuration builder for creating test and development configurations.
//!
//! This module provides utilities for constructing Config instances with
//! sensible defaults, particularly useful for testing scenarios.

use crate::{Config, MenuConfig, ServiceConfig, StorageConfig};
use bucket_types::MenuCategory;
use std::collections::HashMap;

/// Builder for creating `Config` instances with a fluent API.
///
/// Defaults to in-memory storage, the standard menu and no API section.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	service_id: String,
	storage_primary: String,
	storage_implementations: HashMap<String, toml::Value>,
	menu: Option<Vec<MenuCategory>>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a new `ConfigBuilder` with default values suitable for testing.
	pub fn new() -> Self {
		let mut storage_implementations = HashMap::new();
		storage_implementations.insert(
			"memory".to_string(),
			toml::Value::Table(toml::map::Map::new()),
		);

		Self {
			service_id: "test-bucket".to_string(),
			storage_primary: "memory".to_string(),
			storage_implementations,
			menu: None,
		}
	}

	/// Uses the file backend rooted at `storage_path` as primary storage.
	pub fn file_storage(mut self, storage_path: String) -> Self {
		let mut table = toml::map::Map::new();
		table.insert("storage_path".to_string(), toml::Value::String(storage_path));
		self.storage_implementations
			.insert("file".to_string(), toml::Value::Table(table));
		self.storage_primary = "file".to_string();
		self
	}

	/// Replaces the standard menu.
	pub fn menu(mut self, categories: Vec<MenuCategory>) -> Self {
		self.menu = Some(categories);
		self
	}

	/// Builds the `Config`.
	pub fn build(self) -> Config {
		Config {
			service: ServiceConfig {
				id: self.service_id,
			},
			storage: StorageConfig {
				primary: self.storage_primary,
				implementations: self.storage_implementations,
			},
			menu: self.menu.map(|categories| MenuConfig { categories }),
			api: None,
		}
	}
}
