//! Adapter that persists settings records as JSON values.
//!
//! Records are replaced whole; there is no versioning and no transaction
//! spanning more than one call.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;

#[async_trait]
pub trait SettingsStore: Debug + Send + Sync {
	/// Read a record. Returns `None` if the key was never written or has been deleted.
	async fn get(&self, key: &str) -> ClResult<Option<serde_json::Value>>;

	/// Replace (or create) a record
	async fn set(&self, key: &str, value: &serde_json::Value) -> ClResult<()>;

	/// Create a record only if it does not exist yet.
	/// Returns `true` if the value was written.
	async fn add(&self, key: &str, value: &serde_json::Value) -> ClResult<bool>;

	/// Delete a record. Deleting a missing key is not an error.
	async fn delete(&self, key: &str) -> ClResult<()>;
}

// vim: ts=4
