//! User store.

use crate::error::CommerceError;
use std::sync::Arc;
use storefront_storage::{StorageError, StorageService};
use storefront_types::{StorageNamespace, User};
use uuid::Uuid;

/// Store for registered users.
pub struct UserStore {
	storage: Arc<StorageService>,
}

impl UserStore {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Persists a user, creating or overwriting it.
	pub async fn save(&self, user: &User) -> Result<(), CommerceError> {
		self.storage
			.store(StorageNamespace::Users.as_str(), &user.id.to_string(), user)
			.await
			.map_err(CommerceError::from)
	}

	/// Loads a user by id.
	pub async fn find_by_id(&self, id: Uuid) -> Result<User, CommerceError> {
		self.storage
			.retrieve(StorageNamespace::Users.as_str(), &id.to_string())
			.await
			.map_err(|e| match e {
				StorageError::NotFound => CommerceError::not_found("user", id),
				other => CommerceError::Storage(other),
			})
	}
}
