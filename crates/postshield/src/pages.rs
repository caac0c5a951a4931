//! Page rendering
//!
//! Each page template renders the page body, which is then wrapped into the
//! shared layout.

use handlebars::Handlebars;
use serde::Serialize;

use postshield_core::i18n::Locale;
use postshield_types::types::{ContentItem, ContentSummary, ContentType};

use crate::prelude::*;

const LAYOUT: &str = "layout";
const INDEX: &str = "index";
const LISTING: &str = "listing";
const ITEM: &str = "item";

const TEMPLATES: [(&str, &str); 4] = [
	(LAYOUT, include_str!("../templates/layout.hbs")),
	(INDEX, include_str!("../templates/index.hbs")),
	(LISTING, include_str!("../templates/listing.hbs")),
	(ITEM, include_str!("../templates/item.hbs")),
];

#[derive(Serialize)]
struct LayoutVars<'a> {
	lang: &'a str,
	title: &'a str,
	body: &'a str,
}

#[derive(Serialize)]
struct IndexVars<'a> {
	title: &'a str,
	content_types: &'a [ContentType],
}

#[derive(Serialize)]
struct ListingVars<'a> {
	title: &'a str,
	items: &'a [ContentSummary],
}

#[derive(Serialize)]
struct ItemVars<'a> {
	content_type: &'a str,
	title: &'a str,
	body: &'a str,
}

pub struct Pages {
	handlebars: Handlebars<'static>,
	locale: Locale,
}

impl std::fmt::Debug for Pages {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Pages").field("locale", &self.locale).finish_non_exhaustive()
	}
}

impl Pages {
	pub fn new(locale: Locale) -> ClResult<Self> {
		let mut handlebars = Handlebars::new();
		handlebars.set_strict_mode(true);
		for (name, template) in TEMPLATES {
			handlebars.register_template_string(name, template).map_err(|e| {
				Error::ConfigError(format!("Invalid page template '{}': {}", name, e))
			})?;
		}
		Ok(Self { handlebars, locale })
	}

	fn render(&self, name: &str, title: &str, vars: &impl Serialize) -> ClResult<String> {
		let body = self.handlebars.render(name, vars).map_err(|e| {
			error!("Failed to render page '{}': {}", name, e);
			Error::Internal(format!("page template '{}'", name))
		})?;

		let layout = LayoutVars { lang: self.locale.code(), title, body: &body };
		self.handlebars.render(LAYOUT, &layout).map_err(|e| {
			error!("Failed to render layout: {}", e);
			Error::Internal("layout template".into())
		})
	}

	pub fn index(&self, site_title: &str, content_types: &[ContentType]) -> ClResult<String> {
		self.render(INDEX, site_title, &IndexVars { title: site_title, content_types })
	}

	pub fn listing(&self, content_type: &ContentType, items: &[ContentSummary]) -> ClResult<String> {
		let title = &content_type.label;
		self.render(LISTING, title, &ListingVars { title, items })
	}

	/// Render a single item. `body` is the already filtered item body.
	pub fn item(&self, item: &ContentItem, body: &str) -> ClResult<String> {
		let vars = ItemVars { content_type: &item.content_type, title: &item.title, body };
		self.render(ITEM, &item.title, &vars)
	}
}


// vim: ts=4
