//! Authentication provider adapter.

use std::fmt::Debug;

use crate::types::AuthCtx;

pub trait AuthProvider: Debug + Send + Sync {
	/// Validate a bearer/session token. Invalid or expired tokens yield `None`.
	fn authenticate(&self, token: &str) -> Option<AuthCtx>;

	/// URL of the login endpoint that returns the visitor to `return_to`
	fn login_url(&self, return_to: &str) -> String;
}

// vim: ts=4
