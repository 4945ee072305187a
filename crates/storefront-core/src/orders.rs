//! Order placement, listings, and admin workflows.
//!
//! Placement converts the mutable cart into an immutable order snapshot.
//! The order put, every order line put, every cart line delete, and the
//! cart delete are committed as one atomic storage batch, so a failure
//! can never leave the cart half-consumed.

use crate::engine::CommerceEngine;
use crate::error::CommerceError;
use chrono::Utc;
use storefront_types::{
	BillingLine, BillingView, Order, OrderDetail, OrderStatus, OrderSummary, Page, PageRequest,
	PlacedOrder, RequestContext,
};
use uuid::Uuid;

impl CommerceEngine {
	/// Converts the requesting user's cart into a placed order.
	///
	/// The new order copies the cart's totals and the supplied note; each
	/// cart line is frozen into an order line whose `price` snapshots the
	/// cart line's total. The cart and its lines are deleted in the same
	/// batch. The caller resets its cart-size indicator from the returned
	/// `cart_count`, which is always zero.
	pub async fn place_order(
		&self,
		ctx: &RequestContext,
		order_note: &str,
	) -> Result<PlacedOrder, CommerceError> {
		let Some(cart) = self.carts().find_by_user(ctx.user_id).await? else {
			return Err(CommerceError::EmptyCartCheckout);
		};
		let details = self.carts().details_for_cart(cart.id).await?;
		if details.is_empty() {
			return Err(CommerceError::EmptyCartCheckout);
		}

		let now = Utc::now();
		let order = Order {
			id: Uuid::new_v4(),
			user_id: ctx.user_id,
			order_note: order_note.to_string(),
			total_price: cart.price_total,
			product_total: cart.product_total,
			status: OrderStatus::Pending,
			created_at: now,
			updated_at: now,
		};

		let mut ops = vec![self.orders().insert_order_op(&order)?];
		for detail in &details {
			let order_detail = OrderDetail {
				id: Uuid::new_v4(),
				order_id: order.id,
				product_id: detail.product_id,
				quantity: detail.quantity,
				price: detail.price_total,
			};
			ops.push(self.orders().insert_detail_op(&order_detail)?);
		}
		ops.extend(self.carts().teardown_ops(&cart, &details));

		self.storage().commit(ops).await?;

		tracing::info!(
			order_id = %order.id,
			user_id = %ctx.user_id,
			lines = details.len(),
			total = %order.total_price,
			"Placed order"
		);

		Ok(PlacedOrder {
			order_id: order.id,
			status: order.status,
			total_price: order.total_price,
			cart_count: 0,
		})
	}

	/// Lists the requesting user's orders, newest-updated first.
	pub async fn order_history(
		&self,
		ctx: &RequestContext,
		page: u32,
	) -> Result<Page<OrderSummary>, CommerceError> {
		let request =
			PageRequest::newest_updated_first(page, self.config().store.order_history_page_size);
		let orders = self.orders().find_by_user(ctx.user_id, &request).await?;
		Ok(orders.map(OrderSummary::from))
	}

	/// Lists all orders for the admin table, newest-updated first.
	pub async fn admin_orders(&self, page: u32) -> Result<Page<OrderSummary>, CommerceError> {
		let request = PageRequest::newest_updated_first(page, self.config().store.admin_page_size);
		let orders = self.orders().find_all(&request).await?;
		Ok(orders.map(OrderSummary::from))
	}

	/// Reconstructs the billing view for a placed order.
	///
	/// Each frozen order line is projected into the display line shape the
	/// checkout billing view uses, carrying the frozen price untouched.
	pub async fn order_detail(&self, order_id: Uuid) -> Result<BillingView, CommerceError> {
		let order = self.orders().find_by_id(order_id).await?;
		let details = self.orders().details_for_order(order_id).await?;

		let mut lines = Vec::with_capacity(details.len());
		for detail in details {
			let product = self.products().find_by_id(detail.product_id).await?;
			lines.push(BillingLine {
				product,
				quantity: detail.quantity,
				price_total: detail.price,
			});
		}

		Ok(BillingView {
			user_id: order.user_id,
			lines,
			price_total: order.total_price,
			order_note: Some(order.order_note),
		})
	}

	/// Applies an admin status transition.
	///
	/// Unknown keywords coerce to `PENDING`; the coercion is logged
	/// because it can mask an operator typo. `updated_at` is touched so
	/// the order surfaces at the top of newest-updated listings.
	pub async fn change_status(
		&self,
		order_id: Uuid,
		keyword: &str,
	) -> Result<Order, CommerceError> {
		let mut order = self.orders().find_by_id(order_id).await?;

		let status = match keyword.parse::<OrderStatus>() {
			Ok(status) => status,
			Err(_) => {
				tracing::warn!(%order_id, keyword, "Unknown status keyword, coercing to PENDING");
				OrderStatus::Pending
			}
		};

		order.status = status;
		order.updated_at = Utc::now();
		self.orders().update(&order).await?;

		tracing::info!(%order_id, status = %order.status, "Order status changed");
		Ok(order)
	}

	/// Soft-deletes an order: the row stays, only the label changes.
	pub async fn soft_delete_order(&self, order_id: Uuid) -> Result<Order, CommerceError> {
		let mut order = self.orders().find_by_id(order_id).await?;
		order.status = OrderStatus::Deleted;
		self.orders().update(&order).await?;

		tracing::info!(%order_id, "Order soft-deleted");
		Ok(order)
	}
}
