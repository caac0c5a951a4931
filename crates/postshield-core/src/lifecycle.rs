//! Activation and deactivation of the shield

use postshield_types::settings_store::SettingsStore;

use crate::i18n::Locale;
use crate::prelude::*;
use crate::settings::{SETTINGS_KEY, ShieldSettings};

/// Write the activation defaults unless a settings record already exists.
///
/// Returns `true` if the defaults were written. An existing record is never
/// overwritten, so re-activation keeps earlier admin choices.
pub async fn activate(store: &dyn SettingsStore, locale: Locale) -> ClResult<bool> {
	let defaults = ShieldSettings::activation_defaults(locale);
	let written = store.add(SETTINGS_KEY, &defaults.to_stored()).await?;
	if written {
		info!("Shield activated with default settings");
	} else {
		info!("Shield activated, keeping existing settings");
	}
	Ok(written)
}

/// Remove the settings record. The gate then behaves as disabled.
pub async fn deactivate(store: &dyn SettingsStore) -> ClResult<()> {
	store.delete(SETTINGS_KEY).await?;
	info!("Shield deactivated, settings removed");
	Ok(())
}


// vim: ts=4
