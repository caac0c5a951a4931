//! Signed form tokens
//!
//! The settings form carries a token bound to the signed-in subject, so a
//! submission is only accepted from a form this server rendered for that
//! subject. Token format: `<exp>.<base64url(HMAC-SHA256(key, sub "\n" exp))>`.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time;

use crate::prelude::*;

/// Name of the hidden form field holding the token
pub const FORM_TOKEN_FIELD: &str = "_form_token";

const FORM_TOKEN_EXPIRE: u64 = 8; /* hours */

type HmacSha256 = Hmac<Sha256>;

pub struct FormTokens {
	key: Box<[u8]>,
}

impl std::fmt::Debug for FormTokens {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FormTokens").finish_non_exhaustive()
	}
}

fn now() -> u64 {
	time::SystemTime::now()
		.duration_since(time::UNIX_EPOCH)
		.map(|d| d.as_secs())
		.unwrap_or_default()
}

impl FormTokens {
	pub fn new(key: &[u8]) -> ClResult<Self> {
		if key.is_empty() {
			return Err(Error::ConfigError("Form token key must not be empty".into()));
		}
		Ok(Self { key: key.into() })
	}

	fn mac(&self, sub: &str, exp: u64) -> ClResult<HmacSha256> {
		let mut mac = HmacSha256::new_from_slice(&self.key)
			.map_err(|e| Error::Internal(format!("form token key: {}", e)))?;
		mac.update(sub.as_bytes());
		mac.update(b"\n");
		mac.update(exp.to_string().as_bytes());
		Ok(mac)
	}

	/// Issue a token for `sub`
	pub fn issue(&self, sub: &str) -> ClResult<String> {
		self.issue_at(sub, now())
	}

	fn issue_at(&self, sub: &str, now: u64) -> ClResult<String> {
		let exp = now + FORM_TOKEN_EXPIRE * 3600;
		let sig = self.mac(sub, exp)?.finalize().into_bytes();
		Ok(format!("{}.{}", exp, URL_SAFE_NO_PAD.encode(sig)))
	}

	/// Check a submitted token against `sub`
	pub fn verify(&self, sub: &str, token: &str) -> bool {
		self.verify_at(sub, token, now())
	}

	fn verify_at(&self, sub: &str, token: &str, now: u64) -> bool {
		let Some((exp, sig)) = token.split_once('.') else {
			return false;
		};
		let Ok(exp) = exp.parse::<u64>() else {
			return false;
		};
		if exp <= now {
			debug!("Expired form token");
			return false;
		}
		let Ok(sig) = URL_SAFE_NO_PAD.decode(sig) else {
			return false;
		};
		self.mac(sub, exp).is_ok_and(|mac| mac.verify_slice(&sig).is_ok())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const NOW: u64 = 1_700_000_000;

	#[test]
	fn test_issued_token_verifies() {
		let tokens = FormTokens::new(b"key").unwrap();
		let token = tokens.issue_at("alice", NOW).unwrap();
		assert!(tokens.verify_at("alice", &token, NOW));
		assert!(tokens.verify_at("alice", &token, NOW + FORM_TOKEN_EXPIRE * 3600 - 1));
		assert!(tokens.verify("alice", &tokens.issue("alice").unwrap()));
	}

	#[test]
	fn test_token_bound_to_subject_and_key() {
		let tokens = FormTokens::new(b"key").unwrap();
		let token = tokens.issue_at("alice", NOW).unwrap();
		assert!(!tokens.verify_at("mallory", &token, NOW));
		assert!(!FormTokens::new(b"other").unwrap().verify_at("alice", &token, NOW));
	}

	#[test]
	fn test_expired_or_malformed_tokens_rejected() {
		let tokens = FormTokens::new(b"key").unwrap();
		let token = tokens.issue_at("alice", NOW).unwrap();
		assert!(!tokens.verify_at("alice", &token, NOW + FORM_TOKEN_EXPIRE * 3600));

		let (exp, sig) = token.split_once('.').unwrap();
		let later = format!("{}.{}", exp.parse::<u64>().unwrap() + 3600, sig);
		assert!(!tokens.verify_at("alice", &later, NOW));

		for bad in ["", ".", "abc", "123.", "x.y", "123.!!!"] {
			assert!(!tokens.verify_at("alice", bad, NOW), "accepted {:?}", bad);
		}
	}

	#[test]
	fn test_empty_key_rejected() {
		assert!(FormTokens::new(b"").is_err());
	}
}

// vim: ts=4
