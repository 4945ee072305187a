//! User identity types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user of the store.
///
/// A user owns at most one active cart and zero or more orders. Identity
/// arrives on each request as an explicit context rather than session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
	/// Unique identifier for this user.
	pub id: Uuid,
	/// Display name.
	pub name: String,
	/// Contact email address.
	pub email: String,
	/// Timestamp when this user was registered.
	pub created_at: DateTime<Utc>,
}

impl User {
	/// Creates a new user with a fresh identity.
	pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
		Self {
			id: Uuid::new_v4(),
			name: name.into(),
			email: email.into(),
			created_at: Utc::now(),
		}
	}
}
