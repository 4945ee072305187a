//! Workflow error taxonomy.
//!
//! Each workflow failure is an explicit kind the caller can surface or
//! translate rather than a masked fallback. The HTTP layer maps the
//! recoverable checkout kinds onto a redirect back to the cart view.

use storefront_storage::StorageError;
use storefront_types::InvalidStatusKeyword;
use thiserror::Error;

/// Errors that can occur in the storefront workflows.
#[derive(Debug, Error)]
pub enum CommerceError {
	/// A referenced entity does not exist.
	#[error("{entity} not found: {id}")]
	NotFound { entity: &'static str, id: String },
	/// A requested quantity was not a positive integer.
	#[error("Invalid quantity: {0}")]
	InvalidQuantity(u32),
	/// A status keyword was rejected by the strict parse.
	#[error(transparent)]
	InvalidStatusKeyword(#[from] InvalidStatusKeyword),
	/// Checkout or placement was attempted on a missing or empty cart.
	#[error("Cart is empty")]
	EmptyCartCheckout,
	/// The storage collaborator failed.
	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),
}

impl CommerceError {
	/// Builds a NotFound error for the given entity and id.
	pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
		Self::NotFound {
			entity,
			id: id.to_string(),
		}
	}
}
