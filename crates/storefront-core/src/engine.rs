//! The commerce engine.
//!
//! Ties configuration, the storage service, and the typed stores together
//! and exposes the workflow entry points. Workflow implementations live in
//! the `checkout` and `orders` modules as further `impl` blocks.

use crate::error::CommerceError;
use crate::stores::{CartStore, OrderStore, ProductStore, UserStore};
use rust_decimal::Decimal;
use std::sync::Arc;
use storefront_config::Config;
use storefront_storage::StorageService;
use storefront_types::{Product, User};

/// Engine coordinating the storefront workflows.
///
/// One engine is shared across all inbound requests; every method takes
/// the per-request context explicitly instead of reading session state.
pub struct CommerceEngine {
	/// Service configuration.
	config: Config,
	/// Shared storage service, used directly for atomic batches.
	storage: Arc<StorageService>,
	/// Registered users.
	users: UserStore,
	/// Catalog products.
	products: ProductStore,
	/// Carts and their lines.
	carts: CartStore,
	/// Placed orders and their frozen lines.
	orders: OrderStore,
}

impl CommerceEngine {
	/// Creates an engine over the given configuration and storage service.
	pub fn new(config: Config, storage: Arc<StorageService>) -> Self {
		Self {
			config,
			users: UserStore::new(Arc::clone(&storage)),
			products: ProductStore::new(Arc::clone(&storage)),
			carts: CartStore::new(Arc::clone(&storage)),
			orders: OrderStore::new(Arc::clone(&storage)),
			storage,
		}
	}

	/// Returns the engine's configuration.
	pub fn config(&self) -> &Config {
		&self.config
	}

	pub(crate) fn storage(&self) -> &StorageService {
		&self.storage
	}

	pub(crate) fn carts(&self) -> &CartStore {
		&self.carts
	}

	pub(crate) fn orders(&self) -> &OrderStore {
		&self.orders
	}

	pub(crate) fn products(&self) -> &ProductStore {
		&self.products
	}

	/// Registers a new user.
	pub async fn register_user(&self, name: &str, email: &str) -> Result<User, CommerceError> {
		let user = User::new(name, email);
		self.users.save(&user).await?;
		tracing::info!(user_id = %user.id, "Registered user");
		Ok(user)
	}

	/// Adds a product to the catalog.
	pub async fn create_product(
		&self,
		name: &str,
		price: Decimal,
	) -> Result<Product, CommerceError> {
		let product = Product::new(name, price);
		self.products.save(&product).await?;
		tracing::info!(product_id = %product.id, %price, "Created product");
		Ok(product)
	}

	/// Lists the catalog.
	pub async fn list_products(&self) -> Result<Vec<Product>, CommerceError> {
		self.products.list_all().await
	}

	/// Loads a user by id, e.g. to validate an inbound identity header.
	pub async fn find_user(&self, id: uuid::Uuid) -> Result<User, CommerceError> {
		self.users.find_by_id(id).await
	}
}
