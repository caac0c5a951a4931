//! Admin permission middleware

use axum::{extract::Request, middleware::Next, response::Response};

use crate::prelude::*;

/// Middleware that lets only visitors with the admin role through
pub async fn require_admin(Auth(auth_ctx): Auth, req: Request, next: Next) -> ClResult<Response> {
	if !auth_ctx.is_admin() {
		warn!(
			subject = %auth_ctx.sub,
			roles = ?auth_ctx.roles,
			"Admin permission denied - admin role required"
		);
		return Err(Error::PermissionDenied);
	}

	Ok(next.run(req).await)
}

// vim: ts=4
