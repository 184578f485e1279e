//! In-memory order store.
//!
//! Keeps the order list in memory, useful for testing and development
//! scenarios where persistence is not required.

use crate::{OrderStoreInterface, StorageError};
use async_trait::async_trait;
use bucket_types::OrderRecord;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Registry name of this backend.
pub const NAME: &str = "memory";

/// In-memory storage implementation.
///
/// Provides fast access but no persistence across restarts.
pub struct MemoryStorage {
	/// The order list protected by a read-write lock.
	records: Arc<RwLock<Vec<OrderRecord>>>,
}

impl MemoryStorage {
	/// Creates a new, empty MemoryStorage instance.
	pub fn new() -> Self {
		Self {
			records: Arc::new(RwLock::new(Vec::new())),
		}
	}
}

impl Default for MemoryStorage {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl OrderStoreInterface for MemoryStorage {
	async fn load(&self) -> Result<Vec<OrderRecord>, StorageError> {
		Ok(self.records.read().await.clone())
	}

	async fn save(&self, records: &[OrderRecord]) -> Result<(), StorageError> {
		*self.records.write().await = records.to_vec();
		Ok(())
	}

	fn describe(&self) -> String {
		"memory".to_string()
	}
}

/// Factory function to create a memory storage backend from configuration.
///
/// Configuration parameters:
/// - None required for memory storage
pub fn create_storage(_config: &toml::Value) -> Result<Box<dyn OrderStoreInterface>, StorageError> {
	Ok(Box::new(MemoryStorage::new()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::order;

	#[tokio::test]
	async fn test_starts_empty() {
		let storage = MemoryStorage::new();
		assert!(storage.load().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_overwrite() {
		let storage = MemoryStorage::new();

		let first = vec![order("Asha", "Fries", 200), order("Ravi", "Coleslaw", 250)];
		storage.save(&first).await.unwrap();
		assert_eq!(storage.load().await.unwrap(), first);

		let second = vec![order("Meera", "Hot Wings", 500)];
		storage.save(&second).await.unwrap();
		assert_eq!(storage.load().await.unwrap(), second);
	}
}
