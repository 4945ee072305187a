//! Shared fixtures for the workflow tests.

use crate::engine::CommerceEngine;
use rust_decimal::Decimal;
use std::sync::Arc;
use storefront_config::Config;
use storefront_storage::implementations::memory::MemoryStorage;
use storefront_storage::StorageService;
use storefront_types::{Product, RequestContext};
use uuid::Uuid;

const TEST_CONFIG: &str = r#"
[store]
id = "test-store"
order_history_page_size = 10
admin_page_size = 2

[storage]
primary = "memory"
[storage.implementations.memory]
"#;

/// Builds an engine over fresh in-memory storage.
pub(crate) fn test_engine() -> CommerceEngine {
	let config: Config = TEST_CONFIG.parse().expect("test config parses");
	let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
	CommerceEngine::new(config, storage)
}

/// Registers a fresh user, creates a product at the given price, and adds
/// it to the user's cart. Returns the context, the product, and the cart
/// line id.
pub(crate) async fn cart_with_product(
	engine: &CommerceEngine,
	price: Decimal,
	quantity: u32,
) -> (RequestContext, Product, Uuid) {
	let user = engine
		.register_user("test-user", "test@example.com")
		.await
		.expect("register user");
	let ctx = RequestContext::new(user.id);
	let product = engine
		.create_product("widget", price)
		.await
		.expect("create product");
	let view = engine
		.add_to_cart(&ctx, product.id, quantity)
		.await
		.expect("add to cart");
	(ctx, product, view.lines[0].id)
}

/// Places a one-line order for a brand-new user and returns the order id.
pub(crate) async fn place_order_for_new_user(engine: &CommerceEngine) -> Uuid {
	let (ctx, _, _) = cart_with_product(engine, Decimal::new(1000, 2), 1).await;
	engine
		.place_order(&ctx, "")
		.await
		.expect("place order")
		.order_id
}
