//! Product catalog types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog product.
///
/// Products are the authoritative price source: checkout always recomputes
/// line totals from the product's current price, never from client input.
/// The order workflows treat products as read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
	/// Unique identifier for this product.
	pub id: Uuid,
	/// Display name.
	pub name: String,
	/// Current unit price.
	pub price: Decimal,
	/// Timestamp when this product was added to the catalog.
	pub created_at: DateTime<Utc>,
}

impl Product {
	/// Creates a new catalog product with a fresh identity.
	pub fn new(name: impl Into<String>, price: Decimal) -> Self {
		Self {
			id: Uuid::new_v4(),
			name: name.into(),
			price,
			created_at: Utc::now(),
		}
	}
}
