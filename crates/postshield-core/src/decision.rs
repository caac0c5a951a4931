//! Access decision
//!
//! A pure function of the settings snapshot and the request context. All
//! conditions are AND-ed; any doubt resolves to [`Decision::Allow`].

use serde::Serialize;

use crate::settings::ShieldSettings;

/// Outcome of the shield check for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
	Allow,
	BlockWithMessage,
	BlockWithRedirect,
}

impl Decision {
	pub fn is_blocked(self) -> bool {
		self != Decision::Allow
	}
}

/// What the host knows about the current request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
	pub is_logged_in: bool,
	/// The request targets one content item (not a listing or archive)
	pub is_single_view: bool,
	/// Type of the current content item, if there is one
	pub content_type: Option<String>,
	/// Permanent URL of the current content item
	pub permalink: Option<String>,
}

impl RequestContext {
	/// Context for a single-item view
	pub fn single(is_logged_in: bool, content_type: &str, permalink: impl Into<String>) -> Self {
		Self {
			is_logged_in,
			is_single_view: true,
			content_type: Some(content_type.to_string()),
			permalink: Some(permalink.into()),
		}
	}

	/// Context for a listing/archive/index page
	pub fn listing(is_logged_in: bool, content_type: Option<&str>) -> Self {
		Self {
			is_logged_in,
			is_single_view: false,
			content_type: content_type.map(str::to_string),
			permalink: None,
		}
	}
}

/// Evaluate the shield for a request
pub fn evaluate(settings: &ShieldSettings, ctx: &RequestContext) -> Decision {
	evaluate_parts(settings, ctx.is_logged_in, ctx.is_single_view, ctx.content_type.as_deref())
}

/// Evaluate the shield from its four inputs
pub fn evaluate_parts(
	settings: &ShieldSettings,
	is_logged_in: bool,
	is_single_view: bool,
	content_type: Option<&str>,
) -> Decision {
	if !settings.enable_shield || is_logged_in || !is_single_view {
		return Decision::Allow;
	}
	match content_type {
		Some(content_type) if settings.is_shielded(content_type) => {
			if settings.redirect_to_login {
				Decision::BlockWithRedirect
			} else {
				Decision::BlockWithMessage
			}
		}
		_ => Decision::Allow,
	}
}


// vim: ts=4
