//! Settings sanitizer
//!
//! Turns raw admin input (form fields or JSON) into a complete
//! [`ShieldSettings`] record. Invalid input degrades to safe values; there is
//! no error path.

use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

use postshield_types::content_store::ContentTypeRegistry;
use postshield_types::types::sanitize_key;

use super::html_filter::filter_post_html;
use super::types::ShieldSettings;
use crate::i18n::Locale;
use crate::prelude::*;

/// Loose truthiness of an untyped input value.
///
/// `null`, `false`, `0`, `""`, `"0"` and empty arrays/objects are false,
/// everything else is true.
pub fn truthy(value: Option<&Value>) -> bool {
	match value {
		None | Some(Value::Null) => false,
		Some(Value::Bool(b)) => *b,
		Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
		Some(Value::String(s)) => !(s.is_empty() || s == "0"),
		Some(Value::Array(a)) => !a.is_empty(),
		Some(Value::Object(o)) => !o.is_empty(),
	}
}

#[derive(Debug, Clone)]
pub struct Sanitizer {
	registry: Arc<dyn ContentTypeRegistry>,
	locale: Locale,
}

impl Sanitizer {
	pub fn new(registry: Arc<dyn ContentTypeRegistry>, locale: Locale) -> Self {
		Self { registry, locale }
	}

	pub fn locale(&self) -> Locale {
		self.locale
	}

	pub fn registry(&self) -> &Arc<dyn ContentTypeRegistry> {
		&self.registry
	}

	/// Sanitize raw input into a complete settings record.
	///
	/// Non-object input is treated as an empty object; unknown keys are ignored.
	pub fn sanitize(&self, raw: &Value) -> ShieldSettings {
		let field = |key: &str| raw.as_object().and_then(|obj| obj.get(key));

		ShieldSettings {
			enable_shield: truthy(field("enable_shield")),
			shielded_content_types: self.content_types(field("shielded_content_types")),
			shield_message: self.message(field("shield_message")),
			redirect_to_login: truthy(field("redirect_to_login")),
		}
	}

	fn content_types(&self, value: Option<&Value>) -> BTreeSet<String> {
		let Some(Value::Array(items)) = value else {
			return BTreeSet::new();
		};

		let mut types = BTreeSet::new();
		for item in items {
			match item.as_str() {
				Some(name) if self.registry.is_public(name) => {
					types.insert(sanitize_key(name));
				}
				_ => debug!("Dropping content type {} from shield settings", item),
			}
		}
		types
	}

	fn message(&self, value: Option<&Value>) -> String {
		let filtered = value.and_then(Value::as_str).map(filter_post_html).unwrap_or_default();
		if filtered.trim().is_empty() {
			self.locale.default_shield_message().to_string()
		} else {
			filtered
		}
	}
}


// vim: ts=4
