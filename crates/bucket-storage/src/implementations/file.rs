//! File-based order store.
//!
//! Persists the order list as a single JSON array with 4-space indentation.
//! Writes go to a sibling temporary file which is then renamed over the
//! target, so a crash mid-write never leaves a truncated store behind.

use crate::{OrderStoreInterface, StorageError};
use async_trait::async_trait;
use bucket_types::OrderRecord;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Registry name of this backend.
pub const NAME: &str = "file";

/// Default location of the order file.
pub const DEFAULT_STORAGE_PATH: &str = "./data/orders.json";

/// File-based storage implementation.
pub struct FileStorage {
	/// Path of the JSON order file.
	path: PathBuf,
}

impl FileStorage {
	/// Creates a new FileStorage backed by the file at `path`.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Path of the temporary file used for atomic replacement.
	fn temp_path(&self) -> PathBuf {
		let mut name = self
			.path
			.file_name()
			.map(|n| n.to_os_string())
			.unwrap_or_default();
		name.push(".tmp");
		self.path.with_file_name(name)
	}

	/// Serializes records as a JSON array indented with four spaces.
	fn encode(records: &[OrderRecord]) -> Result<Vec<u8>, StorageError> {
		let mut buffer = Vec::new();
		let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
		let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
		records
			.serialize(&mut serializer)
			.map_err(|e| StorageError::Serialization(e.to_string()))?;
		Ok(buffer)
	}
}

#[async_trait]
impl OrderStoreInterface for FileStorage {
	async fn load(&self) -> Result<Vec<OrderRecord>, StorageError> {
		let data = match fs::read(&self.path).await {
			Ok(data) => data,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				tracing::debug!("Order file {:?} does not exist yet", self.path);
				return Ok(Vec::new());
			},
			Err(e) => return Err(StorageError::Backend(e.to_string())),
		};

		if data.iter().all(u8::is_ascii_whitespace) {
			return Ok(Vec::new());
		}

		serde_json::from_slice(&data)
			.map_err(|e| StorageError::Corrupt(format!("{}: {}", self.path.display(), e)))
	}

	async fn save(&self, records: &[OrderRecord]) -> Result<(), StorageError> {
		// Create parent directory if it doesn't exist
		if let Some(parent) = self.path.parent() {
			if !parent.as_os_str().is_empty() {
				fs::create_dir_all(parent)
					.await
					.map_err(|e| StorageError::Backend(e.to_string()))?;
			}
		}

		let data = Self::encode(records)?;

		// Write atomically by writing to temp file then renaming
		let temp_path = self.temp_path();
		fs::write(&temp_path, data)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		fs::rename(&temp_path, &self.path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		Ok(())
	}

	fn describe(&self) -> String {
		self.path.display().to_string()
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: Path of the order file (default: "./data/orders.json")
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn OrderStoreInterface>, StorageError> {
	let storage_path = match config.get("storage_path") {
		None => DEFAULT_STORAGE_PATH,
		Some(value) => value.as_str().ok_or_else(|| {
			StorageError::Configuration(format!(
				"storage_path must be a string, got {}",
				value.type_str()
			))
		})?,
	};

	if storage_path.is_empty() {
		return Err(StorageError::Configuration(
			"storage_path cannot be empty".into(),
		));
	}

	Ok(Box::new(FileStorage::new(storage_path)))
}
