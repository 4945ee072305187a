//! API types for the storefront HTTP surface.
//!
//! This module defines the request and response types for the storefront
//! endpoints, plus the structured API error type with its HTTP status
//! mapping. View types are named bags of display values; the billing view
//! is shared between checkout and the order detail reconstruction.

use crate::{Cart, OrderStatus, Product};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
	/// Display name.
	pub name: String,
	/// Contact email address.
	pub email: String,
}

/// Request to add a product to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
	/// Display name.
	pub name: String,
	/// Unit price.
	pub price: Decimal,
}

/// Request to add a product to the requesting user's cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
	/// Product to add.
	pub product_id: Uuid,
	/// Requested quantity, must be positive.
	pub quantity: u32,
}

/// One line of the current cart, enriched with its product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
	/// Cart line identifier, used to address the line at checkout.
	pub id: Uuid,
	/// The referenced product.
	pub product: Product,
	/// Current quantity.
	pub quantity: u32,
	/// Line total at the last recompute.
	pub price_total: Decimal,
}

/// The requesting user's current cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
	/// The cart aggregate, absent until the first add-to-cart.
	pub cart: Option<Cart>,
	/// The cart's lines.
	pub lines: Vec<CartLine>,
	/// Number of lines, mirrored into the session indicator.
	pub cart_count: u32,
}

/// One client-supplied checkout line: an existing cart line id plus the
/// requested (untrusted) quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutLine {
	/// Cart line to update.
	pub id: Uuid,
	/// Requested quantity, validated server-side.
	pub quantity: u32,
}

/// Request to recompute the cart ahead of placing an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
	/// Requested quantities per cart line.
	pub lines: Vec<CheckoutLine>,
}

/// One display line of the billing view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingLine {
	/// The referenced product.
	pub product: Product,
	/// Quantity on the line.
	pub quantity: u32,
	/// Line total, recomputed at checkout or frozen on an order.
	pub price_total: Decimal,
}

/// The billing view rendered after checkout, and reused to display a
/// placed order's detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingView {
	/// The user the view belongs to.
	pub user_id: Uuid,
	/// Display lines.
	pub lines: Vec<BillingLine>,
	/// Grand total over all lines.
	pub price_total: Decimal,
	/// Order note, present when viewing a placed order.
	pub order_note: Option<String>,
}

/// Request to convert the cart into an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
	/// Free-text note attached to the order.
	#[serde(default)]
	pub order_note: String,
}

/// Confirmation returned after an order was placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
	/// Identifier of the new order.
	pub order_id: Uuid,
	/// Initial status of the order.
	pub status: OrderStatus,
	/// Grand total frozen into the order.
	pub total_price: Decimal,
	/// Cart count after placement, always zero.
	pub cart_count: u32,
}

/// Order summary row for history and admin listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
	/// Order identifier.
	pub id: Uuid,
	/// The user who placed the order.
	pub user_id: Uuid,
	/// Free-text note supplied at placement.
	pub order_note: String,
	/// Grand total.
	pub total_price: Decimal,
	/// Line count.
	pub product_total: u32,
	/// Current lifecycle label.
	pub status: OrderStatus,
	/// Last status transition time.
	pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<crate::Order> for OrderSummary {
	fn from(order: crate::Order) -> Self {
		Self {
			id: order.id,
			user_id: order.user_id,
			order_note: order.order_note,
			total_price: order.total_price,
			product_total: order.product_total,
			status: order.status,
			updated_at: order.updated_at,
		}
	}
}

/// Request to transition an order's status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusRequest {
	/// Order to update.
	pub order_id: Uuid,
	/// Status keyword; unknown keywords coerce to `PENDING`.
	pub status: String,
}

/// Request to soft-delete an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOrderRequest {
	/// Order to soft-delete.
	pub order_id: Uuid,
}

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error kind.
	pub error: String,
	/// Human-readable description.
	pub message: String,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum ApiError {
	/// Malformed request input (400).
	BadRequest { error: String, message: String },
	/// A referenced entity does not exist (404).
	NotFound { error: String, message: String },
	/// Business-rule rejection (422).
	UnprocessableEntity { error: String, message: String },
	/// Internal failure (500).
	Internal { error: String, message: String },
	/// Redirect to a sensible prior page (303), used for recoverable
	/// checkout failures.
	SeeOther { location: String },
}

impl ApiError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			ApiError::BadRequest { .. } => 400,
			ApiError::NotFound { .. } => 404,
			ApiError::UnprocessableEntity { .. } => 422,
			ApiError::Internal { .. } => 500,
			ApiError::SeeOther { .. } => 303,
		}
	}

	/// Convert to ErrorResponse for JSON serialization. Redirects carry no
	/// body.
	pub fn to_error_response(&self) -> Option<ErrorResponse> {
		match self {
			ApiError::BadRequest { error, message }
			| ApiError::NotFound { error, message }
			| ApiError::UnprocessableEntity { error, message }
			| ApiError::Internal { error, message } => Some(ErrorResponse {
				error: error.clone(),
				message: message.clone(),
			}),
			ApiError::SeeOther { .. } => None,
		}
	}
}

impl fmt::Display for ApiError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ApiError::BadRequest { message, .. } => write!(f, "Bad Request: {}", message),
			ApiError::NotFound { message, .. } => write!(f, "Not Found: {}", message),
			ApiError::UnprocessableEntity { message, .. } => {
				write!(f, "Unprocessable Entity: {}", message)
			}
			ApiError::Internal { message, .. } => write!(f, "Internal Server Error: {}", message),
			ApiError::SeeOther { location } => write!(f, "See Other: {}", location),
		}
	}
}

impl std::error::Error for ApiError {}

impl axum::response::IntoResponse for ApiError {
	fn into_response(self) -> axum::response::Response {
		use axum::{
			http::{header, StatusCode},
			response::{IntoResponse, Json},
		};

		if let ApiError::SeeOther { location } = self {
			return (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response();
		}

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		match self.to_error_response() {
			Some(body) => (status, Json(body)).into_response(),
			None => status.into_response(),
		}
	}
}
