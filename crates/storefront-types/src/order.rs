//! Order types: the immutable history of completed checkouts.
//!
//! An order is a frozen snapshot of a cart at placement time. Its lines
//! never change after creation; only the status label and `updated_at`
//! move, driven by admin transitions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// An immutable business snapshot of a completed checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
	/// Unique identifier for this order.
	pub id: Uuid,
	/// The user who placed the order.
	pub user_id: Uuid,
	/// Free-text note supplied at placement.
	pub order_note: String,
	/// Grand total copied from the cart at placement.
	pub total_price: Decimal,
	/// Line count copied from the cart at placement.
	pub product_total: u32,
	/// Current lifecycle label.
	pub status: OrderStatus,
	/// Timestamp when this order was placed.
	pub created_at: DateTime<Utc>,
	/// Timestamp of the last status transition.
	pub updated_at: DateTime<Utc>,
}

/// One frozen line item within an order.
///
/// `price` snapshots the cart line's total at placement time and must not
/// change if the product's price later changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
	/// Unique identifier for this line.
	pub id: Uuid,
	/// Owning order.
	pub order_id: Uuid,
	/// Referenced product.
	pub product_id: Uuid,
	/// Quantity at placement.
	pub quantity: u32,
	/// Frozen line total at placement.
	pub price: Decimal,
}

/// Lifecycle label of an order.
///
/// The labels are mutually exclusive with no enforced transition graph:
/// any status may be set from any other. `Deleted` is a soft-delete
/// sentinel, never a row removal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
	/// Order has been placed and awaits processing.
	Pending,
	/// Order is being prepared.
	Processing,
	/// Order is on its way to the customer.
	Shipping,
	/// Order has been delivered and closed.
	Completed,
	/// Order was canceled before completion.
	Canceled,
	/// Order is hidden from normal views (soft delete).
	Deleted,
}

/// Error returned by the strict status parse.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid status keyword: {0}")]
pub struct InvalidStatusKeyword(pub String);

impl OrderStatus {
	/// Maps an admin-supplied keyword to a status, coercing unknown input
	/// to `Pending`.
	///
	/// The coercion silently masks operator typos; callers that want
	/// rejection instead should use the `FromStr` implementation.
	pub fn from_keyword(keyword: &str) -> Self {
		keyword.parse().unwrap_or(OrderStatus::Pending)
	}

	/// Returns the canonical keyword for this status.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Pending => "PENDING",
			OrderStatus::Processing => "PROCESSING",
			OrderStatus::Shipping => "SHIPPING",
			OrderStatus::Completed => "COMPLETED",
			OrderStatus::Canceled => "CANCELED",
			OrderStatus::Deleted => "DELETED",
		}
	}
}

impl FromStr for OrderStatus {
	type Err = InvalidStatusKeyword;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"PENDING" => Ok(OrderStatus::Pending),
			"PROCESSING" => Ok(OrderStatus::Processing),
			"SHIPPING" => Ok(OrderStatus::Shipping),
			"COMPLETED" => Ok(OrderStatus::Completed),
			"CANCELED" => Ok(OrderStatus::Canceled),
			"DELETED" => Ok(OrderStatus::Deleted),
			other => Err(InvalidStatusKeyword(other.to_string())),
		}
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}
