//! Product catalog store.

use crate::error::CommerceError;
use std::sync::Arc;
use storefront_storage::{StorageError, StorageService};
use storefront_types::{Product, StorageNamespace};
use uuid::Uuid;

/// Store for catalog products.
///
/// Products are the authoritative price source; the order workflows only
/// ever read from this store.
pub struct ProductStore {
	storage: Arc<StorageService>,
}

impl ProductStore {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Persists a product, creating or overwriting it.
	pub async fn save(&self, product: &Product) -> Result<(), CommerceError> {
		self.storage
			.store(
				StorageNamespace::Products.as_str(),
				&product.id.to_string(),
				product,
			)
			.await
			.map_err(CommerceError::from)
	}

	/// Loads a product by id.
	pub async fn find_by_id(&self, id: Uuid) -> Result<Product, CommerceError> {
		self.storage
			.retrieve(StorageNamespace::Products.as_str(), &id.to_string())
			.await
			.map_err(|e| match e {
				StorageError::NotFound => CommerceError::not_found("product", id),
				other => CommerceError::Storage(other),
			})
	}

	/// Lists the whole catalog, sorted by name for stable display.
	pub async fn list_all(&self) -> Result<Vec<Product>, CommerceError> {
		let mut products: Vec<Product> = self
			.storage
			.list(StorageNamespace::Products.as_str())
			.await?;
		products.sort_by(|a, b| a.name.cmp(&b.name));
		Ok(products)
	}
}
