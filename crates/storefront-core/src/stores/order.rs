//! Order store.
//!
//! Orders and their lines are written once by the placement batch and then
//! only re-labeled by admin transitions. Listings run over the whole
//! collection and slice pages after an explicit in-memory sort, keeping
//! the `(page, size, sort key, direction)` contract independent of any
//! query framework.

use crate::error::CommerceError;
use std::sync::Arc;
use storefront_storage::{StorageError, StorageService, WriteOp};
use storefront_types::{
	Order, OrderDetail, OrderSortKey, Page, PageRequest, SortDirection, StorageNamespace,
};
use uuid::Uuid;

/// Store for placed orders and their frozen lines.
pub struct OrderStore {
	storage: Arc<StorageService>,
}

impl OrderStore {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Builds the put operation that persists a new order, for inclusion
	/// in an atomic placement batch.
	pub fn insert_order_op(&self, order: &Order) -> Result<WriteOp, CommerceError> {
		self.storage
			.put_op(StorageNamespace::Orders.as_str(), &order.id.to_string(), order)
			.map_err(CommerceError::from)
	}

	/// Builds the put operation that persists a new order line, for
	/// inclusion in an atomic placement batch.
	pub fn insert_detail_op(&self, detail: &OrderDetail) -> Result<WriteOp, CommerceError> {
		self.storage
			.put_op(
				StorageNamespace::OrderDetails.as_str(),
				&detail.id.to_string(),
				detail,
			)
			.map_err(CommerceError::from)
	}

	/// Loads an order by id.
	pub async fn find_by_id(&self, id: Uuid) -> Result<Order, CommerceError> {
		self.storage
			.retrieve(StorageNamespace::Orders.as_str(), &id.to_string())
			.await
			.map_err(|e| match e {
				StorageError::NotFound => CommerceError::not_found("order", id),
				other => CommerceError::Storage(other),
			})
	}

	/// Overwrites an existing order after a status transition.
	pub async fn update(&self, order: &Order) -> Result<(), CommerceError> {
		self.storage
			.update(StorageNamespace::Orders.as_str(), &order.id.to_string(), order)
			.await
			.map_err(|e| match e {
				StorageError::NotFound => CommerceError::not_found("order", order.id),
				other => CommerceError::Storage(other),
			})
	}

	/// Loads all frozen lines belonging to an order.
	pub async fn details_for_order(
		&self,
		order_id: Uuid,
	) -> Result<Vec<OrderDetail>, CommerceError> {
		let details: Vec<OrderDetail> = self
			.storage
			.list(StorageNamespace::OrderDetails.as_str())
			.await?;
		Ok(details
			.into_iter()
			.filter(|detail| detail.order_id == order_id)
			.collect())
	}

	/// Lists one user's orders as a page.
	pub async fn find_by_user(
		&self,
		user_id: Uuid,
		request: &PageRequest,
	) -> Result<Page<Order>, CommerceError> {
		let orders: Vec<Order> = self.storage.list(StorageNamespace::Orders.as_str()).await?;
		let owned = orders
			.into_iter()
			.filter(|order| order.user_id == user_id)
			.collect();
		Ok(Page::slice(Self::sorted(owned, request), request))
	}

	/// Lists all orders as a page.
	pub async fn find_all(&self, request: &PageRequest) -> Result<Page<Order>, CommerceError> {
		let orders: Vec<Order> = self.storage.list(StorageNamespace::Orders.as_str()).await?;
		Ok(Page::slice(Self::sorted(orders, request), request))
	}

	/// Sorts orders according to the request's sort key and direction.
	fn sorted(mut orders: Vec<Order>, request: &PageRequest) -> Vec<Order> {
		orders.sort_by_key(|order| match request.sort_key {
			OrderSortKey::UpdatedAt => order.updated_at,
			OrderSortKey::CreatedAt => order.created_at,
		});
		if request.direction == SortDirection::Descending {
			orders.reverse();
		}
		orders
	}
}
