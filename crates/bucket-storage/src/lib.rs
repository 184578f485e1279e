//! Storage module for the bucket order service.
//!
//! This module provides the order store: durable persistence of the full,
//! ordered list of order records. Every mutation is a whole-list snapshot
//! replace. Backends implement [`OrderStoreInterface`]; [`StorageService`]
//! wraps a backend and serializes load-mutate-save cycles within a process.

use async_trait::async_trait;
use bucket_types::OrderRecord;
use thiserror::Error;
use tokio::sync::Mutex;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Persisted content exists but is not a valid order list.
	#[error("Corrupt order store: {0}")]
	Corrupt(String),
	/// Error that occurs while serializing the order list.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for order store backends.
///
/// A backend holds one ordered sequence of order records and only supports
/// whole-sequence reads and writes.
#[async_trait]
pub trait OrderStoreInterface: Send + Sync {
	/// Reads the persisted order list.
	///
	/// A missing or empty backing resource yields an empty list. Content that
	/// cannot be parsed fails with [`StorageError::Corrupt`].
	async fn load(&self) -> Result<Vec<OrderRecord>, StorageError>;

	/// Replaces the persisted order list with `records`.
	async fn save(&self, records: &[OrderRecord]) -> Result<(), StorageError>;

	/// Human-readable location of the backing resource, for logs.
	fn describe(&self) -> String;
}

/// Type alias for storage factory functions.
///
/// This is the function signature that all storage implementations must provide
/// to create instances of their storage interface.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn OrderStoreInterface>, StorageError>;

/// Get all registered storage implementations.
///
/// Returns a vector of (name, factory) tuples for all available storage implementations.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::{file, memory};

	vec![
		(file::NAME, file::create_storage as StorageFactory),
		(memory::NAME, memory::create_storage as StorageFactory),
	]
}

/// High-level storage service over an order store backend.
///
/// Mutations go through [`StorageService::modify`], which holds a lock for
/// the whole load-mutate-save cycle so concurrent writers in this process
/// cannot overwrite each other's changes.
pub struct StorageService {
	/// The underlying storage backend implementation.
	backend: Box<dyn OrderStoreInterface>,
	/// Held across every load-mutate-save cycle.
	write_lock: Mutex<()>,
}

impl StorageService {
	/// Creates a new StorageService with the specified backend.
	pub fn new(backend: Box<dyn OrderStoreInterface>) -> Self {
		Self {
			backend,
			write_lock: Mutex::new(()),
		}
	}

	/// Reads a snapshot of the full order list.
	pub async fn load(&self) -> Result<Vec<OrderRecord>, StorageError> {
		self.backend.load().await
	}

	/// Loads the order list, applies `mutate`, and saves the result.
	///
	/// The write lock is held for the whole cycle. If `mutate` returns an
	/// error the list is not saved and the error is returned unchanged.
	pub async fn modify<F, T, E>(&self, mutate: F) -> Result<T, E>
	where
		F: FnOnce(&mut Vec<OrderRecord>) -> Result<T, E>,
		E: From<StorageError>,
	{
		let _guard = self.write_lock.lock().await;

		let mut records = self.backend.load().await?;
		let output = mutate(&mut records)?;
		self.backend.save(&records).await?;

		tracing::debug!(
			"Saved {} order records to {}",
			records.len(),
			self.backend.describe()
		);
		Ok(output)
	}

	/// Location of the backing resource, for logs.
	pub fn describe(&self) -> String {
		self.backend.describe()
	}
}


#[cfg(test)]
mod tests {
	use super::test_support::order;
	use super::*;
	use implementations::memory::MemoryStorage;
	use std::sync::Arc;

	#[derive(Debug)]
	enum TestError {
		Storage(StorageError),
		Rejected,
	}

	impl From<StorageError> for TestError {
		fn from(err: StorageError) -> Self {
			TestError::Storage(err)
		}
	}

	#[tokio::test]
	async fn test_modify_persists_changes() {
		let storage = StorageService::new(Box::new(MemoryStorage::new()));

		let count = storage
			.modify(|records| {
				records.push(order("Asha", "Fries", 200));
				Ok::<_, TestError>(records.len())
			})
			.await
			.unwrap();

		assert_eq!(count, 1);
		assert_eq!(storage.load().await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_modify_error_discards_changes() {
		let backend = MemoryStorage::new();
		backend.save(&[order("Asha", "Fries", 200)]).await.unwrap();
		let storage = StorageService::new(Box::new(backend));

		let result: Result<(), TestError> = storage
			.modify(|records| {
				records.clear();
				Err(TestError::Rejected)
			})
			.await;

		assert!(matches!(result, Err(TestError::Rejected)));
		assert_eq!(storage.load().await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_concurrent_modify_keeps_every_update() {
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));

		let mut handles = Vec::new();
		for i in 0..25 {
			let storage = Arc::clone(&storage);
			handles.push(tokio::spawn(async move {
				storage
					.modify(|records| {
						records.push(order(&format!("customer-{}", i), "Fries", 200));
						Ok::<_, TestError>(())
					})
					.await
			}));
		}
		for handle in handles {
			handle.await.unwrap().unwrap();
		}

		assert_eq!(storage.load().await.unwrap().len(), 25);
	}

	#[test]
	fn test_all_implementations_registered() {
		let names: Vec<&str> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["file", "memory"]);
	}

	#[tokio::test]
	async fn test_storage_error_propagates_through_modify() {
		struct BrokenStore;

		#[async_trait]
		impl OrderStoreInterface for BrokenStore {
			async fn load(&self) -> Result<Vec<OrderRecord>, StorageError> {
				Err(StorageError::Corrupt("expected a JSON array".into()))
			}

			async fn save(&self, _records: &[OrderRecord]) -> Result<(), StorageError> {
				Ok(())
			}

			fn describe(&self) -> String {
				"broken".to_string()
			}
		}

		let storage = StorageService::new(Box::new(BrokenStore));
		let result: Result<(), TestError> = storage.modify(|_| Ok(())).await;

		assert!(matches!(
			result,
			Err(TestError::Storage(StorageError::Corrupt(_)))
		));
	}
}
