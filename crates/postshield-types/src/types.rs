//! Common types used throughout Postshield.

use serde::{Deserialize, Serialize};

// Safe keys //
//***********//
/// Normalize an identifier to safe-key form.
///
/// Lowercases ASCII letters and drops every character other than
/// `a-z`, `0-9`, `_` and `-`.
///
/// # Examples
/// - `"Post"` → `"post"`
/// - `"my_type-2"` → `"my_type-2"`
/// - `"bad key!"` → `"badkey"`
pub fn sanitize_key(key: &str) -> String {
	key.chars()
		.map(|c| c.to_ascii_lowercase())
		.filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
		.collect()
}

// ContentType //
//*************//
/// A content category known to the publishing platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentType {
	/// Safe-key identifier (e.g. "post")
	pub name: String,
	/// Human-readable label (e.g. "Posts")
	pub label: String,
	/// Whether the type is publicly viewable
	pub public: bool,
}

impl ContentType {
	/// Create a public content type. The name is normalized with [`sanitize_key`].
	pub fn new(name: &str, label: impl Into<String>) -> Self {
		Self { name: sanitize_key(name), label: label.into(), public: true }
	}

	/// Create a non-public content type
	pub fn private(name: &str, label: impl Into<String>) -> Self {
		Self { public: false, ..Self::new(name, label) }
	}
}

// ContentItem //
//*************//
/// A single content item as delivered by a content store
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
	pub content_type: String,
	pub slug: String,
	pub title: String,
	/// Rendered HTML body
	pub body: String,
}

/// Listing entry (no body)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSummary {
	pub content_type: String,
	pub slug: String,
	pub title: String,
}

impl From<&ContentItem> for ContentSummary {
	fn from(item: &ContentItem) -> Self {
		Self {
			content_type: item.content_type.clone(),
			slug: item.slug.clone(),
			title: item.title.clone(),
		}
	}
}

// AuthCtx //
//*********//
/// Authenticated visitor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCtx {
	/// Subject (user identifier)
	pub sub: Box<str>,
	pub roles: Box<[Box<str>]>,
}

pub const ROLE_ADMIN: &str = "admin";

impl AuthCtx {
	pub fn has_role(&self, role: &str) -> bool {
		self.roles.iter().any(|r| r.as_ref() == role)
	}

	pub fn is_admin(&self) -> bool {
		self.has_role(ROLE_ADMIN)
	}
}

// ApiResponse //
//*************//
/// JSON envelope for API responses
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
	pub data: T,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub req_id: Option<String>,
}

impl<T> ApiResponse<T> {
	pub fn new(data: T) -> Self {
		Self { data, req_id: None }
	}

	pub fn with_req_id(mut self, req_id: Option<String>) -> Self {
		self.req_id = req_id;
		self
	}
}


// vim: ts=4
