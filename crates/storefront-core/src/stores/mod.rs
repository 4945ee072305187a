//! Typed stores over the storage service.
//!
//! Each store wraps the shared `StorageService` with entity-aware
//! operations for one collection, translating storage-level NotFound into
//! entity-specific errors. Compound mutations that must be atomic are
//! assembled by the workflows as write batches instead.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::CartStore;
pub use order::OrderStore;
pub use product::ProductStore;
pub use user::UserStore;
