//! Shield settings record

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::i18n::Locale;
use crate::prelude::*;

/// Key of the settings record in the settings store
pub const SETTINGS_KEY: &str = "postshield.options";

/// Content type shielded by default on activation
pub const DEFAULT_SHIELDED_TYPE: &str = "post";

/// The singleton settings record.
///
/// Always fully populated: the sanitizer produces complete records, and
/// reading a partial stored record fills the gaps with fail-open defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldSettings {
	#[serde(default)]
	pub enable_shield: bool,
	#[serde(default)]
	pub shielded_content_types: BTreeSet<String>,
	#[serde(default)]
	pub shield_message: String,
	#[serde(default)]
	pub redirect_to_login: bool,
}

impl ShieldSettings {
	/// Defaults written on first activation
	pub fn activation_defaults(locale: Locale) -> Self {
		Self {
			enable_shield: false,
			shielded_content_types: BTreeSet::from([DEFAULT_SHIELDED_TYPE.to_string()]),
			shield_message: locale.default_shield_message().to_string(),
			redirect_to_login: false,
		}
	}

	/// Shield switched off. Used whenever the stored record is missing or unreadable.
	pub fn disabled(locale: Locale) -> Self {
		Self {
			enable_shield: false,
			shielded_content_types: BTreeSet::new(),
			shield_message: locale.default_shield_message().to_string(),
			redirect_to_login: false,
		}
	}

	/// Decode a stored record.
	///
	/// Never fails: a record of the wrong shape reads as [`ShieldSettings::disabled`].
	/// A well-formed record comes back exactly as stored.
	pub fn from_stored(value: serde_json::Value, locale: Locale) -> Self {
		match serde_json::from_value::<ShieldSettings>(value) {
			Ok(mut settings) => {
				if settings.shield_message.is_empty() {
					settings.shield_message = locale.default_shield_message().to_string();
				}
				settings
			}
			Err(err) => {
				warn!("Unreadable shield settings record, shield disabled: {}", err);
				Self::disabled(locale)
			}
		}
	}

	pub fn to_stored(&self) -> serde_json::Value {
		serde_json::json!({
			"enable_shield": self.enable_shield,
			"shielded_content_types": self.shielded_content_types,
			"shield_message": self.shield_message,
			"redirect_to_login": self.redirect_to_login,
		})
	}

	pub fn is_shielded(&self, content_type: &str) -> bool {
		self.shielded_content_types.contains(content_type)
	}
}


// vim: ts=4
