//! Cart building and checkout computation.
//!
//! Checkout is the trust boundary of the purchase flow: the client sends
//! cart line ids and requested quantities, and the line totals and grand
//! total are recomputed from the authoritative product prices.
//! Client-supplied totals never reach storage.

use crate::engine::CommerceEngine;
use crate::error::CommerceError;
use rust_decimal::Decimal;
use storefront_types::{
	BillingLine, BillingView, Cart, CartDetail, CartLine, CartView, CheckoutLine, RequestContext,
};
use uuid::Uuid;

impl CommerceEngine {
	/// Returns the requesting user's current cart with enriched lines.
	pub async fn view_cart(&self, ctx: &RequestContext) -> Result<CartView, CommerceError> {
		let Some(cart) = self.carts().find_by_user(ctx.user_id).await? else {
			return Ok(CartView {
				cart: None,
				lines: Vec::new(),
				cart_count: 0,
			});
		};

		let details = self.carts().details_for_cart(cart.id).await?;
		let mut lines = Vec::with_capacity(details.len());
		for detail in details {
			let product = self.products().find_by_id(detail.product_id).await?;
			lines.push(CartLine {
				id: detail.id,
				product,
				quantity: detail.quantity,
				price_total: detail.price_total,
			});
		}

		let cart_count = lines.len() as u32;
		Ok(CartView {
			cart: Some(cart),
			lines,
			cart_count,
		})
	}

	/// Adds a product to the requesting user's cart, creating the cart on
	/// first use and merging repeated adds of the same product into one
	/// line.
	pub async fn add_to_cart(
		&self,
		ctx: &RequestContext,
		product_id: Uuid,
		quantity: u32,
	) -> Result<CartView, CommerceError> {
		if quantity == 0 {
			return Err(CommerceError::InvalidQuantity(quantity));
		}
		let product = self.products().find_by_id(product_id).await?;

		let mut cart = match self.carts().find_by_user(ctx.user_id).await? {
			Some(cart) => cart,
			None => Cart::new(ctx.user_id),
		};

		let mut details = self.carts().details_for_cart(cart.id).await?;
		match details
			.iter_mut()
			.find(|detail| detail.product_id == product_id)
		{
			Some(existing) => {
				existing.quantity += quantity;
				existing.price_total = product.price * Decimal::from(existing.quantity);
				self.carts().save_detail(existing).await?;
			}
			None => {
				let line_total = product.price * Decimal::from(quantity);
				let detail = CartDetail::new(cart.id, product_id, quantity, line_total);
				self.carts().save_detail(&detail).await?;
				details.push(detail);
			}
		}

		cart.price_total = details.iter().map(|detail| detail.price_total).sum();
		cart.product_total = details.len() as u32;
		self.carts().save_cart(&cart).await?;

		tracing::debug!(
			user_id = %ctx.user_id,
			%product_id,
			quantity,
			cart_total = %cart.price_total,
			"Added product to cart"
		);

		self.view_cart(ctx).await
	}

	/// Recomputes the cart ahead of placing an order.
	///
	/// For each requested line the authoritative cart line is re-fetched
	/// by id, its quantity is overwritten with the validated requested
	/// quantity, and its total is recomputed from the product's current
	/// price. The recomputed lines and grand total are persisted and
	/// returned as the billing view.
	pub async fn proceed_checkout(
		&self,
		ctx: &RequestContext,
		lines: &[CheckoutLine],
	) -> Result<BillingView, CommerceError> {
		let Some(mut cart) = self.carts().find_by_user(ctx.user_id).await? else {
			return Err(CommerceError::EmptyCartCheckout);
		};
		let details = self.carts().details_for_cart(cart.id).await?;
		if details.is_empty() {
			return Err(CommerceError::EmptyCartCheckout);
		}

		let mut billing_lines = Vec::with_capacity(lines.len());
		let mut price_total = Decimal::ZERO;
		for line in lines {
			let mut detail = self.carts().find_detail_by_id(line.id).await?;
			// A line id pointing into another user's cart is treated as absent.
			if detail.cart_id != cart.id {
				return Err(CommerceError::not_found("cart detail", line.id));
			}
			if line.quantity == 0 {
				return Err(CommerceError::InvalidQuantity(line.quantity));
			}

			let product = self.products().find_by_id(detail.product_id).await?;
			detail.quantity = line.quantity;
			detail.price_total = product.price * Decimal::from(line.quantity);
			self.carts().save_detail(&detail).await?;

			price_total += detail.price_total;
			billing_lines.push(BillingLine {
				product,
				quantity: detail.quantity,
				price_total: detail.price_total,
			});
		}

		cart.price_total = price_total;
		self.carts().save_cart(&cart).await?;

		tracing::info!(
			user_id = %ctx.user_id,
			lines = billing_lines.len(),
			%price_total,
			"Checkout recomputed"
		);

		Ok(BillingView {
			user_id: ctx.user_id,
			lines: billing_lines,
			price_total,
			order_note: None,
		})
	}
}
