//! Core workflows for the storefront order-management system.
//!
//! This module provides the business logic that turns a mutable cart into
//! an immutable order: checkout recomputation from authoritative product
//! prices, atomic order placement, paginated history and admin listings,
//! order detail reconstruction, and admin status transitions. Persistence
//! is delegated to the typed stores over the storage service.

/// Cart building and checkout computation workflows.
pub mod checkout;
/// The engine tying configuration, storage, and stores together.
pub mod engine;
/// The workflow error taxonomy.
pub mod error;
/// Order placement, listings, and admin workflows.
pub mod orders;
/// Typed stores over the storage service.
pub mod stores;

#[cfg(test)]
mod testutil;

pub use engine::CommerceEngine;
pub use error::CommerceError;
pub use stores::{CartStore, OrderStore, ProductStore, UserStore};
