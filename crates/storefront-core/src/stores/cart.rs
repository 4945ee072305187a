//! Cart store.

use crate::error::CommerceError;
use std::sync::Arc;
use storefront_storage::{StorageError, StorageService, WriteOp};
use storefront_types::{Cart, CartDetail, StorageNamespace};
use uuid::Uuid;

/// Store for carts and their line items.
///
/// Carts are mutable working state: lines are saved individually during
/// cart building and checkout recomputation, and the whole aggregate is
/// torn down by the order placement batch.
pub struct CartStore {
	storage: Arc<StorageService>,
}

impl CartStore {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Persists a cart aggregate, creating or overwriting it.
	pub async fn save_cart(&self, cart: &Cart) -> Result<(), CommerceError> {
		self.storage
			.store(StorageNamespace::Carts.as_str(), &cart.id.to_string(), cart)
			.await
			.map_err(CommerceError::from)
	}

	/// Finds the user's active cart, if any. A user owns at most one.
	pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Cart>, CommerceError> {
		let carts: Vec<Cart> = self.storage.list(StorageNamespace::Carts.as_str()).await?;
		Ok(carts.into_iter().find(|cart| cart.user_id == user_id))
	}

	/// Persists a cart line, creating or overwriting it.
	pub async fn save_detail(&self, detail: &CartDetail) -> Result<(), CommerceError> {
		self.storage
			.store(
				StorageNamespace::CartDetails.as_str(),
				&detail.id.to_string(),
				detail,
			)
			.await
			.map_err(CommerceError::from)
	}

	/// Loads the authoritative cart line by id.
	pub async fn find_detail_by_id(&self, id: Uuid) -> Result<CartDetail, CommerceError> {
		self.storage
			.retrieve(StorageNamespace::CartDetails.as_str(), &id.to_string())
			.await
			.map_err(|e| match e {
				StorageError::NotFound => CommerceError::not_found("cart detail", id),
				other => CommerceError::Storage(other),
			})
	}

	/// Loads all lines belonging to a cart.
	pub async fn details_for_cart(&self, cart_id: Uuid) -> Result<Vec<CartDetail>, CommerceError> {
		let details: Vec<CartDetail> = self
			.storage
			.list(StorageNamespace::CartDetails.as_str())
			.await?;
		Ok(details
			.into_iter()
			.filter(|detail| detail.cart_id == cart_id)
			.collect())
	}

	/// Builds the delete operations that tear down a cart and its lines,
	/// for inclusion in an atomic placement batch.
	pub fn teardown_ops(&self, cart: &Cart, details: &[CartDetail]) -> Vec<WriteOp> {
		let mut ops: Vec<WriteOp> = details
			.iter()
			.map(|detail| {
				self.storage
					.delete_op(StorageNamespace::CartDetails.as_str(), &detail.id.to_string())
			})
			.collect();
		ops.push(
			self.storage
				.delete_op(StorageNamespace::Carts.as_str(), &cart.id.to_string()),
		);
		ops
	}
}
