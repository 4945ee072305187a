//! File-based storage backend implementation for the storefront service.
//!
//! Each key is persisted as one JSON file under the configured base
//! directory. Writes go through a temp file followed by a rename so a
//! crashed write never leaves a torn file behind. Batches are serialized
//! through a mutex so two compound mutations cannot interleave.

use crate::{StorageError, StorageInterface, WriteOp};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;

/// File-based storage implementation.
///
/// This implementation stores data as JSON files on the filesystem,
/// providing simple persistence without requiring external services.
pub struct FileStorage {
	/// Base directory path for storing files.
	base_path: PathBuf,
	/// Serializes writes and batches against each other.
	write_lock: Mutex<()>,
}

impl FileStorage {
	/// Creates a new FileStorage instance with the specified base path.
	pub fn new(base_path: PathBuf) -> Self {
		Self {
			base_path,
			write_lock: Mutex::new(()),
		}
	}

	/// Converts a storage key to a filesystem-safe file path.
	///
	/// Sanitizes the key by replacing problematic characters and appending
	/// a .json extension.
	fn file_path(&self, key: &str) -> PathBuf {
		let safe_key = key.replace(['/', ':'], "_");
		self.base_path.join(format!("{}.json", safe_key))
	}

	/// Writes a file atomically via a temp file and rename.
	async fn write_atomic(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
		let path = self.file_path(key);

		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| StorageError::Backend(e.to_string()))?;
		}

		let temp_path = path.with_extension("tmp");
		fs::write(&temp_path, value)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		fs::rename(&temp_path, &path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		Ok(())
	}

	/// Removes the file for a key; an absent file is not an error.
	async fn remove_file(&self, key: &str) -> Result<(), StorageError> {
		let path = self.file_path(key);
		match fs::remove_file(&path).await {
			Ok(_) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let path = self.file_path(key);

		match fs::read(&path).await {
			Ok(data) => Ok(data),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let _guard = self.write_lock.lock().await;
		self.write_atomic(key, &value).await
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		let _guard = self.write_lock.lock().await;
		self.remove_file(key).await
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		Ok(self.file_path(key).exists())
	}

	async fn list_bytes(&self, namespace: &str) -> Result<Vec<Vec<u8>>, StorageError> {
		let prefix = format!("{}_", namespace.replace(['/', ':'], "_"));
		let mut values = Vec::new();

		let mut entries = match fs::read_dir(&self.base_path).await {
			Ok(entries) => entries,
			// A base directory that was never written to holds nothing.
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(values),
			Err(e) => return Err(StorageError::Backend(e.to_string())),
		};

		while let Some(entry) = entries
			.next_entry()
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?
		{
			let path = entry.path();
			if path.extension() != Some(std::ffi::OsStr::new("json")) {
				continue;
			}
			let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
				continue;
			};
			if !stem.starts_with(&prefix) {
				continue;
			}
			match fs::read(&path).await {
				Ok(data) => values.push(data),
				Err(e) => {
					tracing::debug!("Skipping file {:?}: could not be read: {}", path, e);
				}
			}
		}

		Ok(values)
	}

	async fn apply_batch(&self, ops: Vec<WriteOp>) -> Result<(), StorageError> {
		let _guard = self.write_lock.lock().await;
		for op in &ops {
			match op {
				WriteOp::Put { key, value } => self.write_atomic(key, value).await?,
				WriteOp::Delete { key } => self.remove_file(key).await?,
			}
		}
		Ok(())
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: Base directory for file storage (default: "./data/storage")
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	let storage_path = match config.get("storage_path") {
		Some(value) => value
			.as_str()
			.ok_or_else(|| {
				StorageError::Configuration("storage_path must be a string".to_string())
			})?
			.to_string(),
		None => "./data/storage".to_string(),
	};

	Ok(Box::new(FileStorage::new(PathBuf::from(storage_path))))
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	#[tokio::test]
	async fn test_basic_operations() {
		let dir = tempdir().unwrap();
		let storage = FileStorage::new(dir.path().to_path_buf());

		let key = "orders:test";
		let value = b"test_value".to_vec();
		storage.set_bytes(key, value.clone()).await.unwrap();

		let retrieved = storage.get_bytes(key).await.unwrap();
		assert_eq!(retrieved, value);

		assert!(storage.exists(key).await.unwrap());

		storage.delete(key).await.unwrap();
		assert!(!storage.exists(key).await.unwrap());

		let result = storage.get_bytes(key).await;
		assert!(matches!(result, Err(StorageError::NotFound)));
	}

	#[tokio::test]
	async fn test_values_survive_reopen() {
		let dir = tempdir().unwrap();

		{
			let storage = FileStorage::new(dir.path().to_path_buf());
			storage
				.set_bytes("products:1", b"persisted".to_vec())
				.await
				.unwrap();
		}

		let reopened = FileStorage::new(dir.path().to_path_buf());
		let retrieved = reopened.get_bytes("products:1").await.unwrap();
		assert_eq!(retrieved, b"persisted".to_vec());
	}

	#[tokio::test]
	async fn test_list_is_scoped_to_namespace() {
		let dir = tempdir().unwrap();
		let storage = FileStorage::new(dir.path().to_path_buf());

		storage.set_bytes("carts:1", b"a".to_vec()).await.unwrap();
		storage
			.set_bytes("cart_details:1", b"b".to_vec())
			.await
			.unwrap();
		storage
			.set_bytes("cart_details:2", b"c".to_vec())
			.await
			.unwrap();

		let carts = storage.list_bytes("carts").await.unwrap();
		assert_eq!(carts.len(), 1);

		let details = storage.list_bytes("cart_details").await.unwrap();
		assert_eq!(details.len(), 2);
	}

	#[tokio::test]
	async fn test_list_on_missing_directory_is_empty() {
		let dir = tempdir().unwrap();
		let storage = FileStorage::new(dir.path().join("never_written"));

		let values = storage.list_bytes("orders").await.unwrap();
		assert!(values.is_empty());
	}

	#[tokio::test]
	async fn test_batch_applies_puts_and_deletes_together() {
		let dir = tempdir().unwrap();
		let storage = FileStorage::new(dir.path().to_path_buf());
		storage.set_bytes("carts:1", b"cart".to_vec()).await.unwrap();

		storage
			.apply_batch(vec![
				WriteOp::Put {
					key: "orders:1".to_string(),
					value: b"order".to_vec(),
				},
				WriteOp::Delete {
					key: "carts:1".to_string(),
				},
			])
			.await
			.unwrap();

		assert!(storage.exists("orders:1").await.unwrap());
		assert!(!storage.exists("carts:1").await.unwrap());
	}

	#[tokio::test]
	async fn test_factory_rejects_non_string_path() {
		let table: toml::Table = "storage_path = 7".parse().unwrap();
		let config = toml::Value::Table(table);
		let result = create_storage(&config);
		assert!(matches!(result, Err(StorageError::Configuration(_))));
	}
}
