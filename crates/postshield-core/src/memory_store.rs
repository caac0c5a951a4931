//! In-memory settings store
//!
//! Used by tests and by servers started without a database directory.

use async_trait::async_trait;
use std::collections::HashMap;

use postshield_types::settings_store::SettingsStore;

use crate::prelude::*;

#[derive(Debug, Default)]
pub struct MemorySettingsStore {
	records: parking_lot::RwLock<HashMap<String, serde_json::Value>>,
}

impl MemorySettingsStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
	async fn get(&self, key: &str) -> ClResult<Option<serde_json::Value>> {
		Ok(self.records.read().get(key).cloned())
	}

	async fn set(&self, key: &str, value: &serde_json::Value) -> ClResult<()> {
		self.records.write().insert(key.to_string(), value.clone());
		Ok(())
	}

	async fn add(&self, key: &str, value: &serde_json::Value) -> ClResult<bool> {
		let mut records = self.records.write();
		if records.contains_key(key) {
			return Ok(false);
		}
		records.insert(key.to_string(), value.clone());
		Ok(true)
	}

	async fn delete(&self, key: &str) -> ClResult<()> {
		self.records.write().remove(key);
		Ok(())
	}
}


// vim: ts=4
