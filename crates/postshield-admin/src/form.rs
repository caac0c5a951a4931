//! Settings form rendering and submission parsing

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::{Map, Value};

use postshield_core::i18n::{Locale, Text};
use postshield_core::settings::ShieldSettings;
use postshield_types::types::ContentType;

use crate::FORM_PATH;
use crate::form_token::FORM_TOKEN_FIELD;
use crate::prelude::*;

const TEMPLATE_NAME: &str = "settings_form";
const TEMPLATE: &str = include_str!("../templates/settings_form.hbs");

/// Suffix marking a repeated (list) form field
const LIST_SUFFIX: &str = "[]";

#[derive(Serialize)]
struct CheckboxField<'a> {
	label: &'a str,
	hint: &'a str,
	checked: bool,
}

#[derive(Serialize)]
struct ContentTypeOption<'a> {
	name: &'a str,
	label: &'a str,
	selected: bool,
}

#[derive(Serialize)]
struct ContentTypesField<'a> {
	label: &'a str,
	hint: &'a str,
	options: Vec<ContentTypeOption<'a>>,
}

#[derive(Serialize)]
struct MessageField<'a> {
	label: &'a str,
	hint: &'a str,
	value: &'a str,
}

#[derive(Serialize)]
struct FormVars<'a> {
	lang: &'a str,
	title: &'a str,
	intro: &'a str,
	action: &'a str,
	form_token_field: &'a str,
	form_token: &'a str,
	updated: bool,
	saved_notice: &'a str,
	save_label: &'a str,
	enable_shield: CheckboxField<'a>,
	content_types: ContentTypesField<'a>,
	shield_message: MessageField<'a>,
	redirect_to_login: CheckboxField<'a>,
}

pub struct SettingsForm {
	handlebars: Handlebars<'static>,
}

impl std::fmt::Debug for SettingsForm {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SettingsForm").finish_non_exhaustive()
	}
}

impl SettingsForm {
	pub fn new() -> ClResult<Self> {
		let mut handlebars = Handlebars::new();
		handlebars.set_strict_mode(true);
		handlebars
			.register_template_string(TEMPLATE_NAME, TEMPLATE)
			.map_err(|e| Error::ConfigError(format!("Invalid settings form template: {}", e)))?;
		Ok(Self { handlebars })
	}

	/// Render the form for the current settings.
	///
	/// `content_types` are the public types offered in the multi-select.
	pub fn render(
		&self,
		settings: &ShieldSettings,
		content_types: &[ContentType],
		locale: Locale,
		updated: bool,
		form_token: &str,
	) -> ClResult<String> {
		let t = |text| locale.text(text);
		let vars = FormVars {
			lang: locale.code(),
			title: t(Text::SettingsTitle),
			intro: t(Text::SectionIntro),
			action: FORM_PATH,
			form_token_field: FORM_TOKEN_FIELD,
			form_token,
			updated,
			saved_notice: t(Text::SettingsSaved),
			save_label: t(Text::SaveChanges),
			enable_shield: CheckboxField {
				label: t(Text::EnableShield),
				hint: t(Text::EnableShieldHint),
				checked: settings.enable_shield,
			},
			content_types: ContentTypesField {
				label: t(Text::ShieldedTypes),
				hint: t(Text::ShieldedTypesHint),
				options: content_types
					.iter()
					.map(|ct| ContentTypeOption {
						name: &ct.name,
						label: &ct.label,
						selected: settings.is_shielded(&ct.name),
					})
					.collect(),
			},
			shield_message: MessageField {
				label: t(Text::ShieldMessage),
				hint: t(Text::ShieldMessageHint),
				value: &settings.shield_message,
			},
			redirect_to_login: CheckboxField {
				label: t(Text::RedirectToLogin),
				hint: t(Text::RedirectToLoginHint),
				checked: settings.redirect_to_login,
			},
		};

		self.handlebars.render(TEMPLATE_NAME, &vars).map_err(|e| {
			error!("Settings form rendering failed: {}", e);
			Error::Internal(format!("settings form: {}", e))
		})
	}
}

/// Parse an `application/x-www-form-urlencoded` body into raw settings input.
///
/// Fields named `name[]` are collected into an array under `name`; for other
/// fields the last occurrence wins. All values are strings.
pub fn parse_form(body: &[u8]) -> Value {
	let mut fields = Map::new();
	for (key, value) in url::form_urlencoded::parse(body) {
		let value = Value::String(value.into_owned());
		if let Some(name) = key.strip_suffix(LIST_SUFFIX) {
			match fields.entry(name).or_insert_with(|| Value::Array(Vec::new())) {
				Value::Array(items) => items.push(value),
				other => *other = Value::Array(vec![value]),
			}
		} else {
			fields.insert(key.into_owned(), value);
		}
	}
	Value::Object(fields)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use std::collections::BTreeSet;

	fn settings() -> ShieldSettings {
		ShieldSettings {
			enable_shield: true,
			shielded_content_types: BTreeSet::from(["page".to_string()]),
			shield_message: "<b>Members</b> & friends".into(),
			redirect_to_login: false,
		}
	}

	#[test]
	fn test_parse_form() {
		let raw = parse_form(
			b"enable_shield=1&shielded_content_types%5B%5D=post&shielded_content_types[]=page&shield_message=Hello+%3Cb%3Eworld%3C%2Fb%3E",
		);
		assert_eq!(
			raw,
			json!({
				"enable_shield": "1",
				"shielded_content_types": ["post", "page"],
				"shield_message": "Hello <b>world</b>",
			})
		);
	}

	#[test]
	fn test_parse_empty_form() {
		assert_eq!(parse_form(b""), json!({}));
	}

	#[test]
	fn test_parse_form_last_scalar_wins() {
		assert_eq!(parse_form(b"a=1&a=2"), json!({ "a": "2" }));
		assert_eq!(parse_form(b"a=1&a[]=2"), json!({ "a": ["2"] }));
	}

	#[test]
	fn test_render_form() {
		let form = SettingsForm::new().unwrap();
		let types = vec![ContentType::new("post", "Posts"), ContentType::new("page", "Pages")];
		let html = form.render(&settings(), &types, Locale::En, false, "123.abc").unwrap();

		assert!(html.contains("<html lang=\"en\">"));
		assert!(html.contains("<div class=\"wrap shield-settings-wrap\">"));
		assert!(html.contains(".form-table .description {"));
		assert!(html.contains("name=\"enable_shield\" value=\"1\" checked"));
		assert!(html.contains("name=\"redirect_to_login\" value=\"1\">"));
		assert!(html.contains("<option value=\"post\">Posts</option>"));
		assert!(html.contains("<option value=\"page\" selected>Pages</option>"));
		assert!(html.contains("&lt;b&gt;Members&lt;/b&gt; &amp; friends</textarea>"));
		assert!(!html.contains("notice-success"));
		assert!(html.contains("<input type=\"hidden\" name=\"_form_token\" value=\"123.abc\">"));
	}

	#[test]
	fn test_render_updated_notice_localized() {
		let form = SettingsForm::new().unwrap();
		let html = form.render(&settings(), &[], Locale::De, true, "123.abc").unwrap();
		assert!(html.contains("notice-success"));
		assert!(html.contains(Locale::De.text(Text::SettingsSaved)));
	}
}

// vim: ts=4
