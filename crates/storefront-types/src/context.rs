//! Per-request context.
//!
//! Workflows receive the requesting identity as an explicit argument
//! instead of reading session-scoped globals, so every call site states
//! whose cart and orders it operates on.

use uuid::Uuid;

/// Identity context for one inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
	/// The requesting user.
	pub user_id: Uuid,
}

impl RequestContext {
	/// Creates a context for the given user.
	pub fn new(user_id: Uuid) -> Self {
		Self { user_id }
	}
}
