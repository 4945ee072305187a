//! HTTP server for the storefront API.
//!
//! This module provides the explicit route table and the thin handlers
//! that translate HTTP requests into workflow calls. Identity arrives as
//! an `x-user-id` header and is passed into every workflow as an explicit
//! per-request context; the session cart-size indicator lives in an
//! in-process registry keyed by user.

use axum::{
	extract::{Path, Query, State},
	http::HeaderMap,
	response::Json,
	routing::{get, post},
	Router,
};
use dashmap::DashMap;
use serde::Deserialize;
use std::sync::Arc;
use storefront_config::ApiConfig;
use storefront_core::{CommerceEngine, CommerceError};
use storefront_types::{
	AddToCartRequest, ApiError, BillingView, CartView, ChangeStatusRequest, CheckoutRequest,
	CreateProductRequest, DeleteOrderRequest, Order, OrderSummary, Page, PlaceOrderRequest,
	PlacedOrder, Product, RegisterUserRequest, RequestContext, User,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

/// Header carrying the requesting user's identity.
const USER_HEADER: &str = "x-user-id";

/// In-process registry for the per-user cart-size indicator.
///
/// Add-to-cart writes the current line count, order placement resets it to
/// zero, and reads fall back to zero for users that never touched a cart.
#[derive(Default)]
pub struct SessionRegistry {
	cart_counts: DashMap<Uuid, u32>,
}

impl SessionRegistry {
	/// Records the cart-size indicator for a user.
	pub fn set_cart_count(&self, user_id: Uuid, count: u32) {
		self.cart_counts.insert(user_id, count);
	}

	/// Returns the cart-size indicator for a user, zero if never set.
	pub fn cart_count(&self, user_id: Uuid) -> u32 {
		self.cart_counts
			.get(&user_id)
			.map(|entry| *entry)
			.unwrap_or(0)
	}
}

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Reference to the commerce engine for processing requests.
	pub engine: Arc<CommerceEngine>,
	/// Session cart-count registry.
	pub sessions: Arc<SessionRegistry>,
}

/// Starts the HTTP server for the API.
pub async fn start_server(
	api_config: ApiConfig,
	engine: Arc<CommerceEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = router(engine);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Storefront API server starting on {}", bind_address);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

/// Resolves when the process receives Ctrl+C.
async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::warn!("Failed to listen for shutdown signal: {}", e);
	}
}

/// Builds the application router with the explicit route table.
pub fn router(engine: Arc<CommerceEngine>) -> Router {
	let state = AppState {
		engine,
		sessions: Arc::new(SessionRegistry::default()),
	};

	Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/users", post(handle_register_user))
				.route("/products", get(handle_list_products))
				.route("/cart", get(handle_view_cart))
				.route("/cart/count", get(handle_cart_count))
				.route("/cart/items", post(handle_add_to_cart))
				.route("/checkout", post(handle_checkout))
				.route(
					"/orders",
					post(handle_place_order).get(handle_order_history),
				)
				.route(
					"/orders/{id}",
					get(handle_order_detail).delete(handle_cancel_order),
				)
				.route("/admin/products", post(handle_create_product))
				.route("/admin/orders", get(handle_admin_orders))
				.route("/admin/orders/status", post(handle_change_status))
				.route("/admin/orders/delete", post(handle_delete_order)),
		)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(CorsLayer::permissive()),
		)
		.with_state(state)
}

/// Page selector for the paginated listings.
#[derive(Debug, Deserialize)]
struct PageQuery {
	/// 1-based page number, defaulting to the first page.
	page: Option<u32>,
}

/// Extracts the per-request identity context from the `x-user-id` header.
fn request_context(headers: &HeaderMap) -> Result<RequestContext, ApiError> {
	let raw = headers
		.get(USER_HEADER)
		.and_then(|value| value.to_str().ok())
		.ok_or_else(|| ApiError::BadRequest {
			error: "missing_identity".to_string(),
			message: format!("Missing or malformed {} header", USER_HEADER),
		})?;

	let user_id = raw.parse::<Uuid>().map_err(|_| ApiError::BadRequest {
		error: "invalid_identity".to_string(),
		message: format!("{} header is not a valid UUID", USER_HEADER),
	})?;

	Ok(RequestContext::new(user_id))
}

/// Maps workflow errors onto typed JSON API errors.
fn api_error(err: CommerceError) -> ApiError {
	match err {
		CommerceError::NotFound { .. } => ApiError::NotFound {
			error: "not_found".to_string(),
			message: err.to_string(),
		},
		CommerceError::InvalidQuantity(_) => ApiError::UnprocessableEntity {
			error: "invalid_quantity".to_string(),
			message: err.to_string(),
		},
		CommerceError::InvalidStatusKeyword(_) => ApiError::UnprocessableEntity {
			error: "invalid_status_keyword".to_string(),
			message: err.to_string(),
		},
		CommerceError::EmptyCartCheckout => ApiError::UnprocessableEntity {
			error: "empty_cart".to_string(),
			message: err.to_string(),
		},
		CommerceError::Storage(_) => ApiError::Internal {
			error: "storage".to_string(),
			message: err.to_string(),
		},
	}
}

/// Maps recoverable checkout-flow failures onto a redirect back to the
/// cart view; everything else becomes a JSON error.
fn checkout_flow_error(err: CommerceError) -> ApiError {
	match err {
		CommerceError::EmptyCartCheckout
		| CommerceError::NotFound { .. }
		| CommerceError::InvalidQuantity(_) => {
			tracing::warn!("Checkout flow failed, redirecting to cart: {}", err);
			ApiError::SeeOther {
				location: "/api/cart".to_string(),
			}
		}
		other => api_error(other),
	}
}

/// Handles POST /api/users requests.
async fn handle_register_user(
	State(state): State<AppState>,
	Json(request): Json<RegisterUserRequest>,
) -> Result<Json<User>, ApiError> {
	let user = state
		.engine
		.register_user(&request.name, &request.email)
		.await
		.map_err(api_error)?;
	Ok(Json(user))
}

/// Handles POST /api/admin/products requests.
async fn handle_create_product(
	State(state): State<AppState>,
	Json(request): Json<CreateProductRequest>,
) -> Result<Json<Product>, ApiError> {
	let product = state
		.engine
		.create_product(&request.name, request.price)
		.await
		.map_err(api_error)?;
	Ok(Json(product))
}

/// Handles GET /api/products requests.
async fn handle_list_products(
	State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
	let products = state.engine.list_products().await.map_err(api_error)?;
	Ok(Json(products))
}

/// Handles GET /api/cart requests.
async fn handle_view_cart(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<CartView>, ApiError> {
	let ctx = request_context(&headers)?;
	let view = state.engine.view_cart(&ctx).await.map_err(api_error)?;
	Ok(Json(view))
}

/// Handles GET /api/cart/count requests.
///
/// Reads the session cart-size indicator used for cart badge rendering.
async fn handle_cart_count(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
	let ctx = request_context(&headers)?;
	let count = state.sessions.cart_count(ctx.user_id);
	Ok(Json(serde_json::json!({ "cartCount": count })))
}

/// Handles POST /api/cart/items requests.
async fn handle_add_to_cart(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>, ApiError> {
	let ctx = request_context(&headers)?;
	let view = state
		.engine
		.add_to_cart(&ctx, request.product_id, request.quantity)
		.await
		.map_err(api_error)?;
	state.sessions.set_cart_count(ctx.user_id, view.cart_count);
	Ok(Json(view))
}

/// Handles POST /api/checkout requests.
///
/// Recoverable failures redirect back to the cart view.
async fn handle_checkout(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(request): Json<CheckoutRequest>,
) -> Result<Json<BillingView>, ApiError> {
	let ctx = request_context(&headers)?;
	let view = state
		.engine
		.proceed_checkout(&ctx, &request.lines)
		.await
		.map_err(checkout_flow_error)?;
	Ok(Json(view))
}

/// Handles POST /api/orders requests.
async fn handle_place_order(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(request): Json<PlaceOrderRequest>,
) -> Result<Json<PlacedOrder>, ApiError> {
	let ctx = request_context(&headers)?;
	let placed = state
		.engine
		.place_order(&ctx, &request.order_note)
		.await
		.map_err(checkout_flow_error)?;
	state.sessions.set_cart_count(ctx.user_id, placed.cart_count);
	Ok(Json(placed))
}

/// Handles GET /api/orders requests.
async fn handle_order_history(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(query): Query<PageQuery>,
) -> Result<Json<Page<OrderSummary>>, ApiError> {
	let ctx = request_context(&headers)?;
	let page = state
		.engine
		.order_history(&ctx, query.page.unwrap_or(1))
		.await
		.map_err(api_error)?;
	Ok(Json(page))
}

/// Handles GET /api/orders/{id} requests.
async fn handle_order_detail(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Json<BillingView>, ApiError> {
	let view = state.engine.order_detail(id).await.map_err(api_error)?;
	Ok(Json(view))
}

/// Handles DELETE /api/orders/{id} requests.
///
/// Order rows are history and never removed; deletion from the user's
/// side applies the same soft-delete label the admin action uses.
async fn handle_cancel_order(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
	request_context(&headers)?;
	let order = state
		.engine
		.soft_delete_order(id)
		.await
		.map_err(api_error)?;
	Ok(Json(order))
}

/// Handles GET /api/admin/orders requests.
async fn handle_admin_orders(
	State(state): State<AppState>,
	Query(query): Query<PageQuery>,
) -> Result<Json<Page<OrderSummary>>, ApiError> {
	let page = state
		.engine
		.admin_orders(query.page.unwrap_or(1))
		.await
		.map_err(api_error)?;
	Ok(Json(page))
}

/// Handles POST /api/admin/orders/status requests.
async fn handle_change_status(
	State(state): State<AppState>,
	Json(request): Json<ChangeStatusRequest>,
) -> Result<Json<Order>, ApiError> {
	let order = state
		.engine
		.change_status(request.order_id, &request.status)
		.await
		.map_err(api_error)?;
	Ok(Json(order))
}

/// Handles POST /api/admin/orders/delete requests.
async fn handle_delete_order(
	State(state): State<AppState>,
	Json(request): Json<DeleteOrderRequest>,
) -> Result<Json<Order>, ApiError> {
	let order = state
		.engine
		.soft_delete_order(request.order_id)
		.await
		.map_err(api_error)?;
	Ok(Json(order))
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::body::{to_bytes, Body};
	use axum::http::{Request, StatusCode};
	use rust_decimal::Decimal;
	use storefront_config::Config;
	use storefront_storage::implementations::memory::MemoryStorage;
	use storefront_storage::StorageService;
	use tower::ServiceExt;

	const TEST_CONFIG: &str = r#"
[store]
id = "test-store"
admin_page_size = 2

[storage]
primary = "memory"
[storage.implementations.memory]
"#;

	fn test_engine() -> Arc<CommerceEngine> {
		let config: Config = TEST_CONFIG.parse().unwrap();
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		Arc::new(CommerceEngine::new(config, storage))
	}

	fn json_request(method: &str, uri: &str, user: Option<Uuid>, body: serde_json::Value) -> Request<Body> {
		let mut builder = Request::builder()
			.method(method)
			.uri(uri)
			.header("content-type", "application/json");
		if let Some(user_id) = user {
			builder = builder.header(USER_HEADER, user_id.to_string());
		}
		builder.body(Body::from(body.to_string())).unwrap()
	}

	async fn json_body(response: axum::response::Response) -> serde_json::Value {
		let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
		serde_json::from_slice(&bytes).unwrap()
	}

	#[tokio::test]
	async fn cart_requires_identity_header() {
		let app = router(test_engine());

		let response = app
			.oneshot(
				Request::builder()
					.method("GET")
					.uri("/api/cart")
					.body(Body::empty())
					.unwrap(),
			)
			.await
			.unwrap();

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
		let body = json_body(response).await;
		assert_eq!(body["error"], "missing_identity");
	}

	#[tokio::test]
	async fn checkout_with_empty_cart_redirects_to_cart_view() {
		let engine = test_engine();
		let user = engine.register_user("dave", "dave@example.com").await.unwrap();
		let app = router(engine);

		let response = app
			.oneshot(json_request(
				"POST",
				"/api/checkout",
				Some(user.id),
				serde_json::json!({ "lines": [] }),
			))
			.await
			.unwrap();

		assert_eq!(response.status(), StatusCode::SEE_OTHER);
		assert_eq!(
			response.headers().get("location").unwrap(),
			"/api/cart"
		);
	}

	#[tokio::test]
	async fn full_purchase_flow_over_http() {
		let engine = test_engine();
		let app = router(engine);

		// Register a user.
		let response = app
			.clone()
			.oneshot(json_request(
				"POST",
				"/api/users",
				None,
				serde_json::json!({ "name": "erin", "email": "erin@example.com" }),
			))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
		let user = json_body(response).await;
		let user_id: Uuid = user["id"].as_str().unwrap().parse().unwrap();

		// Create a product.
		let response = app
			.clone()
			.oneshot(json_request(
				"POST",
				"/api/admin/products",
				None,
				serde_json::json!({ "name": "kettle", "price": "40.00" }),
			))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
		let product = json_body(response).await;
		let product_id = product["id"].as_str().unwrap().to_string();

		// Add it to the cart.
		let response = app
			.clone()
			.oneshot(json_request(
				"POST",
				"/api/cart/items",
				Some(user_id),
				serde_json::json!({ "productId": product_id, "quantity": 2 }),
			))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
		let cart = json_body(response).await;
		assert_eq!(cart["cartCount"], 1);
		let line_id = cart["lines"][0]["id"].as_str().unwrap().to_string();

		// The session indicator tracks the add.
		let response = app
			.clone()
			.oneshot(json_request(
				"GET",
				"/api/cart/count",
				Some(user_id),
				serde_json::json!(null),
			))
			.await
			.unwrap();
		let count = json_body(response).await;
		assert_eq!(count["cartCount"], 1);

		// Checkout recomputes the billing view.
		let response = app
			.clone()
			.oneshot(json_request(
				"POST",
				"/api/checkout",
				Some(user_id),
				serde_json::json!({ "lines": [{ "id": line_id, "quantity": 2 }] }),
			))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
		let billing = json_body(response).await;
		assert_eq!(billing["priceTotal"], "80.00");

		// Place the order.
		let response = app
			.clone()
			.oneshot(json_request(
				"POST",
				"/api/orders",
				Some(user_id),
				serde_json::json!({ "orderNote": "ring twice" }),
			))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
		let placed = json_body(response).await;
		assert_eq!(placed["cartCount"], 0);
		assert_eq!(placed["status"], "PENDING");
		let order_id = placed["orderId"].as_str().unwrap().to_string();

		// Placement resets the session indicator.
		let response = app
			.clone()
			.oneshot(json_request(
				"GET",
				"/api/cart/count",
				Some(user_id),
				serde_json::json!(null),
			))
			.await
			.unwrap();
		let count = json_body(response).await;
		assert_eq!(count["cartCount"], 0);

		// The cart is gone.
		let response = app
			.clone()
			.oneshot(json_request(
				"GET",
				"/api/cart",
				Some(user_id),
				serde_json::json!(null),
			))
			.await
			.unwrap();
		let cart = json_body(response).await;
		assert_eq!(cart["cartCount"], 0);
		assert!(cart["cart"].is_null());

		// The admin listing shows the order.
		let response = app
			.clone()
			.oneshot(
				Request::builder()
					.method("GET")
					.uri("/api/admin/orders?page=1")
					.body(Body::empty())
					.unwrap(),
			)
			.await
			.unwrap();
		let page = json_body(response).await;
		assert_eq!(page["totalItems"], 1);
		assert_eq!(page["items"][0]["id"].as_str().unwrap(), order_id);

		// The detail view carries the note and the frozen line.
		let response = app
			.oneshot(
				Request::builder()
					.method("GET")
					.uri(format!("/api/orders/{}", order_id))
					.body(Body::empty())
					.unwrap(),
			)
			.await
			.unwrap();
		let detail = json_body(response).await;
		assert_eq!(detail["orderNote"], "ring twice");
		assert_eq!(detail["lines"][0]["quantity"], 2);
	}

	#[tokio::test]
	async fn unknown_status_keyword_coerces_to_pending_over_http() {
		let engine = test_engine();

		// Seed one placed order directly through the engine.
		let user = engine.register_user("fred", "fred@example.com").await.unwrap();
		let ctx = storefront_types::RequestContext::new(user.id);
		let product = engine
			.create_product("lamp", Decimal::new(1500, 2))
			.await
			.unwrap();
		engine.add_to_cart(&ctx, product.id, 1).await.unwrap();
		let placed = engine.place_order(&ctx, "").await.unwrap();

		let app = router(engine);
		let response = app
			.oneshot(json_request(
				"POST",
				"/api/admin/orders/status",
				None,
				serde_json::json!({ "orderId": placed.order_id, "status": "bogus" }),
			))
			.await
			.unwrap();

		assert_eq!(response.status(), StatusCode::OK);
		let order = json_body(response).await;
		assert_eq!(order["status"], "PENDING");
	}
}
