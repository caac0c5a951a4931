//! SQLite settings adapter
//!
//! Stores settings records as JSON text in a single `settings` table.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

mod schema;
mod setting;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use postshield::{prelude::*, settings_store::SettingsStore};

#[derive(Debug)]
pub struct SettingsAdapterSqlite {
	db: SqlitePool,
}

impl SettingsAdapterSqlite {
	/// Open (or create) the database at `path`
	pub async fn new(path: impl AsRef<Path>) -> ClResult<Self> {
		if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
			tokio::fs::create_dir_all(parent).await?;
		}

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| warn!("DB: {:#?}", err))
			.map_err(|_| Error::DbError)?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| warn!("DB: {:#?}", err))
			.map_err(|_| Error::DbError)?;

		Ok(Self { db })
	}
}

#[async_trait]
impl SettingsStore for SettingsAdapterSqlite {
	async fn get(&self, key: &str) -> ClResult<Option<serde_json::Value>> {
		setting::read(&self.db, key).await
	}

	async fn set(&self, key: &str, value: &serde_json::Value) -> ClResult<()> {
		setting::update(&self.db, key, value).await
	}

	async fn add(&self, key: &str, value: &serde_json::Value) -> ClResult<bool> {
		setting::insert(&self.db, key, value).await
	}

	async fn delete(&self, key: &str) -> ClResult<()> {
		setting::delete(&self.db, key).await
	}
}

// vim: ts=4
