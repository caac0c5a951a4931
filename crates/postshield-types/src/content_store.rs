//! Content source and content-type registry adapters.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;
use crate::types::{ContentItem, ContentSummary, ContentType};

/// Registry of the content types the platform currently knows about
pub trait ContentTypeRegistry: Debug + Send + Sync {
	/// All registered content types, in registration order
	fn list(&self) -> Vec<ContentType>;

	/// Look up a content type by exact name
	fn get(&self, name: &str) -> Option<ContentType> {
		self.list().into_iter().find(|ct| ct.name == name)
	}

	/// Exact, case-sensitive check against the public content types
	fn is_public(&self, name: &str) -> bool {
		self.get(name).is_some_and(|ct| ct.public)
	}

	/// Public content types only
	fn list_public(&self) -> Vec<ContentType> {
		self.list().into_iter().filter(|ct| ct.public).collect()
	}
}

#[async_trait]
pub trait ContentStore: Debug + Send + Sync {
	/// Read a single item. Returns `Error::NotFound` if it does not exist.
	async fn read_item(&self, content_type: &str, slug: &str) -> ClResult<ContentItem>;

	/// List the items of a content type, sorted by slug
	async fn list_items(&self, content_type: &str) -> ClResult<Vec<ContentSummary>>;
}

// vim: ts=4
