//! JWT authentication provider
//!
//! Visitors authenticate with an HS256 token, sent either as
//! `Authorization: Bearer <token>` or in the `token` cookie. Tokens are issued
//! by the external login endpoint, which shares the secret.

const TOKEN_EXPIRE: u64 = 8; /* hours */

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time;
use url::Url;

use postshield_types::auth_provider::AuthProvider;
use postshield_types::types::AuthCtx;

use crate::prelude::*;

/// Name of the cookie carrying the token
pub const TOKEN_COOKIE: &str = "token";

/// Query parameter carrying the return target on the login URL
pub const RETURN_PARAM: &str = "redirect_to";

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AuthToken {
	pub sub: String,
	#[serde(default)]
	pub roles: Vec<String>,
	pub exp: u64,
}

pub struct JwtAuthProvider {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	validation: Validation,
	login_url: Url,
}

impl std::fmt::Debug for JwtAuthProvider {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("JwtAuthProvider")
			.field("login_url", &self.login_url.as_str())
			.finish_non_exhaustive()
	}
}

impl JwtAuthProvider {
	pub fn new(secret: &[u8], login_url: Url) -> ClResult<Self> {
		if secret.is_empty() {
			return Err(Error::ConfigError("JWT secret must not be empty".into()));
		}

		Ok(Self {
			encoding_key: EncodingKey::from_secret(secret),
			decoding_key: DecodingKey::from_secret(secret),
			validation: Validation::new(Algorithm::HS256),
			login_url,
		})
	}

	/// Issue a token valid for `TOKEN_EXPIRE` hours
	pub fn generate_token(&self, sub: &str, roles: &[&str]) -> ClResult<String> {
		let expire = time::SystemTime::now()
			.duration_since(time::UNIX_EPOCH)
			.map_err(|_| Error::Internal("system clock before epoch".into()))?
			.as_secs() + 3600 * TOKEN_EXPIRE;

		let claims = AuthToken {
			sub: sub.to_string(),
			roles: roles.iter().map(ToString::to_string).collect(),
			exp: expire,
		};

		encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|err| {
			warn!("Token generation failed: {}", err);
			Error::Internal("token generation".into())
		})
	}
}

impl AuthProvider for JwtAuthProvider {
	fn authenticate(&self, token: &str) -> Option<AuthCtx> {
		let token_data = decode::<AuthToken>(token, &self.decoding_key, &self.validation)
			.inspect_err(|err| debug!("Rejected token: {}", err))
			.ok()?;

		Some(AuthCtx {
			sub: token_data.claims.sub.into(),
			roles: token_data.claims.roles.into_iter().map(Into::into).collect(),
		})
	}

	fn login_url(&self, return_to: &str) -> String {
		let mut url = self.login_url.clone();
		if !return_to.is_empty() {
			url.query_pairs_mut().append_pair(RETURN_PARAM, return_to);
		}
		url.into()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn provider() -> JwtAuthProvider {
		let login_url = Url::parse("https://example.com/login").unwrap();
		JwtAuthProvider::new(b"test secret", login_url).unwrap()
	}

	#[test]
	fn test_token_round_trip() {
		let auth = provider();
		let token = auth.generate_token("alice", &["admin"]).unwrap();

		let ctx = auth.authenticate(&token).unwrap();
		assert_eq!(&*ctx.sub, "alice");
		assert!(ctx.is_admin());
	}

	#[test]
	fn test_rejects_foreign_and_garbage_tokens() {
		let other = JwtAuthProvider::new(b"other secret", Url::parse("https://x.test/").unwrap())
			.unwrap();
		let token = other.generate_token("mallory", &["admin"]).unwrap();

		let auth = provider();
		assert!(auth.authenticate(&token).is_none());
		assert!(auth.authenticate("not-a-token").is_none());
		assert!(auth.authenticate("").is_none());
	}

	#[test]
	fn test_rejects_expired_token() {
		let auth = provider();
		let claims = AuthToken { sub: "alice".into(), roles: vec![], exp: 1 };
		let token = encode(&Header::new(Algorithm::HS256), &claims, &auth.encoding_key).unwrap();
		assert!(auth.authenticate(&token).is_none());
	}

	#[test]
	fn test_login_url() {
		let auth = provider();
		assert_eq!(
			auth.login_url("https://example.com/post/hello world?x=1"),
			"https://example.com/login?redirect_to=https%3A%2F%2Fexample.com%2Fpost%2Fhello+world%3Fx%3D1"
		);
		assert_eq!(auth.login_url(""), "https://example.com/login");
	}

	#[test]
	fn test_empty_secret_rejected() {
		assert!(JwtAuthProvider::new(b"", Url::parse("https://example.com/login").unwrap()).is_err());
	}
}

// vim: ts=4
