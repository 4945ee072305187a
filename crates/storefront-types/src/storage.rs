//! Storage namespace identifiers.

use std::str::FromStr;

/// Namespaces for the persisted entity collections.
///
/// This enum provides type safety for storage operations by replacing
/// string literals with strongly typed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageNamespace {
	/// Registered users.
	Users,
	/// Catalog products.
	Products,
	/// In-progress carts.
	Carts,
	/// Cart line items.
	CartDetails,
	/// Placed orders.
	Orders,
	/// Frozen order line items.
	OrderDetails,
}

impl StorageNamespace {
	/// Returns the string representation of the namespace.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageNamespace::Users => "users",
			StorageNamespace::Products => "products",
			StorageNamespace::Carts => "carts",
			StorageNamespace::CartDetails => "cart_details",
			StorageNamespace::Orders => "orders",
			StorageNamespace::OrderDetails => "order_details",
		}
	}

	/// Returns an iterator over all namespace variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Users,
			Self::Products,
			Self::Carts,
			Self::CartDetails,
			Self::Orders,
			Self::OrderDetails,
		]
		.into_iter()
	}
}

impl FromStr for StorageNamespace {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"users" => Ok(Self::Users),
			"products" => Ok(Self::Products),
			"carts" => Ok(Self::Carts),
			"cart_details" => Ok(Self::CartDetails),
			"orders" => Ok(Self::Orders),
			"order_details" => Ok(Self::OrderDetails),
			_ => Err(()),
		}
	}
}

impl From<StorageNamespace> for &'static str {
	fn from(namespace: StorageNamespace) -> Self {
		namespace.as_str()
	}
}
