//! Custom middlewares

use axum::{
	body::Body,
	extract::{FromRequestParts, State},
	http::{HeaderMap, HeaderValue, Request, header, request::Parts, response::Response},
	middleware::Next,
};
use std::sync::Arc;

use postshield_core::settings::ShieldSettings;

use crate::auth::TOKEN_COOKIE;
use crate::prelude::*;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extract the visitor's token from the `Authorization` header or the token cookie
fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
	if let Some(auth_header) = headers.get(header::AUTHORIZATION).and_then(|h| h.to_str().ok()) {
		if let Some(token) = auth_header.strip_prefix("Bearer ") {
			return Some(token.trim());
		}
	}

	headers
		.get_all(header::COOKIE)
		.iter()
		.filter_map(|h| h.to_str().ok())
		.flat_map(|h| h.split(';'))
		.filter_map(|pair| pair.trim().split_once('='))
		.find(|(name, _)| *name == TOKEN_COOKIE)
		.map(|(_, value)| value.trim())
}

/// Assign a request ID and echo it in the response
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response<Body> {
	let req_id = req
		.headers()
		.get(REQUEST_ID_HEADER)
		.and_then(|h| h.to_str().ok())
		.filter(|id| !id.is_empty() && id.len() <= 64)
		.map_or_else(|| uuid::Uuid::new_v4().to_string(), ToString::to_string);

	req.extensions_mut().insert(RequestId(req_id.clone()));
	let mut res = next.run(req).await;
	if let Ok(value) = HeaderValue::from_str(&req_id) {
		res.headers_mut().insert(REQUEST_ID_HEADER, value);
	}
	res
}

/// Authenticate the visitor if a token is present.
///
/// Invalid tokens are ignored: the request continues as anonymous.
pub async fn optional_auth(
	State(app): State<App>,
	mut req: Request<Body>,
	next: Next,
) -> Response<Body> {
	if let Some(token) = token_from_headers(req.headers()).filter(|t| !t.is_empty()) {
		if let Some(auth) = app.auth.authenticate(token) {
			debug!(subject = %auth.sub, "Authenticated request");
			req.extensions_mut().insert(Auth(auth));
		} else {
			debug!("Invalid token, continuing as anonymous");
		}
	}

	next.run(req).await
}

// ShieldSnapshot //
//****************//
/// Shield settings read once for the current request
#[derive(Debug, Clone)]
pub struct ShieldSnapshot(pub Arc<ShieldSettings>);

/// Read the shield settings once and attach them to the request
pub async fn shield_snapshot(
	State(app): State<App>,
	mut req: Request<Body>,
	next: Next,
) -> Response<Body> {
	let snapshot = app.settings.snapshot().await;
	req.extensions_mut().insert(ShieldSnapshot(snapshot));
	next.run(req).await
}

impl FromRequestParts<App> for ShieldSnapshot {
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, app: &App) -> Result<Self, Self::Rejection> {
		if let Some(snapshot) = parts.extensions.get::<ShieldSnapshot>().cloned() {
			return Ok(snapshot);
		}
		let snapshot = ShieldSnapshot(app.settings.snapshot().await);
		parts.extensions.insert(snapshot.clone());
		Ok(snapshot)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
		let mut headers = HeaderMap::new();
		for (name, value) in pairs {
			headers.append(name.clone(), HeaderValue::from_str(value).unwrap());
		}
		headers
	}

	#[test]
	fn test_token_from_bearer() {
		let h = headers(&[(header::AUTHORIZATION, "Bearer abc.def ")]);
		assert_eq!(token_from_headers(&h), Some("abc.def"));
	}

	#[test]
	fn test_token_from_cookie() {
		let h = headers(&[(header::COOKIE, "theme=dark; token=abc.def; other=1")]);
		assert_eq!(token_from_headers(&h), Some("abc.def"));

		let h = headers(&[(header::COOKIE, "mytoken=nope")]);
		assert_eq!(token_from_headers(&h), None);
	}

	#[test]
	fn test_bearer_takes_precedence() {
		let h = headers(&[(header::AUTHORIZATION, "Bearer header"), (header::COOKIE, "token=cookie")]);
		assert_eq!(token_from_headers(&h), Some("header"));
	}

	#[test]
	fn test_non_bearer_header_falls_back_to_cookie() {
		let h = headers(&[(header::AUTHORIZATION, "Basic xyz"), (header::COOKIE, "token=cookie")]);
		assert_eq!(token_from_headers(&h), Some("cookie"));
	}
}

// vim: ts=4
