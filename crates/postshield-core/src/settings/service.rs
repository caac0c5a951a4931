//! Settings service: per-request snapshots and sanitized saves

use std::sync::Arc;

use postshield_types::settings_store::SettingsStore;

use super::sanitize::Sanitizer;
use super::types::{SETTINGS_KEY, ShieldSettings};
use crate::i18n::Locale;
use crate::prelude::*;

/// Settings service - the only way the gate reads or writes its record
#[derive(Debug)]
pub struct ShieldSettingsService {
	store: Arc<dyn SettingsStore>,
	sanitizer: Sanitizer,
}

impl ShieldSettingsService {
	pub fn new(store: Arc<dyn SettingsStore>, sanitizer: Sanitizer) -> Self {
		Self { store, sanitizer }
	}

	pub fn locale(&self) -> Locale {
		self.sanitizer.locale()
	}

	pub fn sanitizer(&self) -> &Sanitizer {
		&self.sanitizer
	}

	pub fn store(&self) -> &Arc<dyn SettingsStore> {
		&self.store
	}

	/// Load the settings for one request.
	///
	/// Fails open: a missing record or a storage error yields disabled settings.
	pub async fn snapshot(&self) -> Arc<ShieldSettings> {
		let locale = self.locale();
		let settings = match self.store.get(SETTINGS_KEY).await {
			Ok(Some(value)) => ShieldSettings::from_stored(value, locale),
			Ok(None) => {
				debug!("No shield settings stored, shield disabled");
				ShieldSettings::disabled(locale)
			}
			Err(err) => {
				warn!("Failed to read shield settings, shield disabled: {}", err);
				ShieldSettings::disabled(locale)
			}
		};
		Arc::new(settings)
	}

	/// Read the stored record for the admin surface. Storage errors are returned.
	pub async fn load(&self) -> ClResult<ShieldSettings> {
		let locale = self.locale();
		Ok(match self.store.get(SETTINGS_KEY).await? {
			Some(value) => ShieldSettings::from_stored(value, locale),
			None => ShieldSettings::disabled(locale),
		})
	}

	/// Sanitize raw input and replace the stored record with the result
	pub async fn save(&self, raw: &serde_json::Value) -> ClResult<ShieldSettings> {
		let settings = self.sanitizer.sanitize(raw);
		self.store.set(SETTINGS_KEY, &settings.to_stored()).await?;
		info!(
			"Shield settings saved: enabled={}, types={:?}, redirect={}",
			settings.enable_shield, settings.shielded_content_types, settings.redirect_to_login
		);
		Ok(settings)
	}
}


// vim: ts=4
