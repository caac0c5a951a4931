//! Settings record storage
//!
//! Values are stored as JSON text, one row per record.

use sqlx::{Row, SqlitePool};

use postshield::prelude::*;

/// Read a single record by name.
///
/// A value that is not valid JSON reads as missing.
pub(crate) async fn read(db: &SqlitePool, name: &str) -> ClResult<Option<serde_json::Value>> {
	let row = sqlx::query("SELECT value FROM settings WHERE name = ?")
		.bind(name)
		.fetch_optional(db)
		.await
		.inspect_err(|err| warn!("DB: {:#?}", err))
		.map_err(|_| Error::DbError)?;

	Ok(row.and_then(|r| {
		let value: Option<String> = r.get("value");
		value.and_then(|v| {
			serde_json::from_str(&v)
				.inspect_err(|err| warn!("Invalid JSON in setting {}: {}", name, err))
				.ok()
		})
	}))
}

/// Replace or create a record
pub(crate) async fn update(db: &SqlitePool, name: &str, value: &serde_json::Value) -> ClResult<()> {
	sqlx::query(
		"INSERT OR REPLACE INTO settings (name, value, updated_at) VALUES (?, ?, unixepoch())",
	)
	.bind(name)
	.bind(value.to_string())
	.execute(db)
	.await
	.inspect_err(|err| warn!("DB: {:#?}", err))
	.map_err(|_| Error::DbError)?;

	Ok(())
}

/// Create a record if it does not exist. Returns `true` if a row was written.
pub(crate) async fn insert(db: &SqlitePool, name: &str, value: &serde_json::Value) -> ClResult<bool> {
	let res = sqlx::query("INSERT OR IGNORE INTO settings (name, value) VALUES (?, ?)")
		.bind(name)
		.bind(value.to_string())
		.execute(db)
		.await
		.inspect_err(|err| warn!("DB: {:#?}", err))
		.map_err(|_| Error::DbError)?;

	Ok(res.rows_affected() > 0)
}

pub(crate) async fn delete(db: &SqlitePool, name: &str) -> ClResult<()> {
	sqlx::query("DELETE FROM settings WHERE name = ?")
		.bind(name)
		.execute(db)
		.await
		.inspect_err(|err| warn!("DB: {:#?}", err))
		.map_err(|_| Error::DbError)?;

	Ok(())
}

// vim: ts=4
