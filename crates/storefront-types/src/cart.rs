//! Cart types: the mutable working state of a prospective purchase.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's in-progress cart.
///
/// `price_total` is a derived, cached sum of the cart's line totals and is
/// recomputed whenever a line changes. `product_total` counts the lines in
/// the cart. The cart and its lines are deleted when an order is placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
	/// Unique identifier for this cart.
	pub id: Uuid,
	/// Owning user.
	pub user_id: Uuid,
	/// Cached sum of the lines' `price_total` values.
	pub price_total: Decimal,
	/// Number of lines in the cart.
	pub product_total: u32,
}

impl Cart {
	/// Creates an empty cart for the given user.
	pub fn new(user_id: Uuid) -> Self {
		Self {
			id: Uuid::new_v4(),
			user_id,
			price_total: Decimal::ZERO,
			product_total: 0,
		}
	}
}

/// One line item within a cart.
///
/// Unlike an order line, a cart line is mutable working state: checkout
/// overwrites `quantity` with the validated requested quantity and
/// recomputes `price_total` from the product's current price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartDetail {
	/// Unique identifier for this line.
	pub id: Uuid,
	/// Owning cart.
	pub cart_id: Uuid,
	/// Referenced product.
	pub product_id: Uuid,
	/// Requested quantity, always positive.
	pub quantity: u32,
	/// Line total: `quantity * product.price` at the last recompute.
	pub price_total: Decimal,
}

impl CartDetail {
	/// Creates a new cart line.
	pub fn new(cart_id: Uuid, product_id: Uuid, quantity: u32, price_total: Decimal) -> Self {
		Self {
			id: Uuid::new_v4(),
			cart_id,
			product_id,
			quantity,
			price_total,
		}
	}
}
