//! Content response transformer
//!
//! Applies a [`Decision`] at the two points of the rendering pipeline:
//! - **pre-render**: before the item is rendered; may answer with a redirect
//! - **content filter**: while the body is rendered; may replace the body
//!
//! Both stages must be given the same settings snapshot.

use handlebars::Handlebars;
use serde::Serialize;
use std::borrow::Cow;
use std::sync::Arc;

use postshield_types::auth_provider::AuthProvider;

use crate::decision::{Decision, RequestContext, evaluate};
use crate::i18n::{Locale, Text};
use crate::prelude::*;
use crate::settings::ShieldSettings;
use crate::settings::html_filter::filter_post_html;

const SHIELD_BLOCK: &str = "shield_block";

const SHIELD_BLOCK_TEMPLATE: &str = r#"<div class="postshield-block" style="border: 1px solid #ddd; padding: 20px; margin: 20px 0; background-color: #f9f9f9; text-align: center; border-radius: 5px; font-family: 'Georgia', serif; color: #555;">
	<p style="font-size: 1.2em; line-height: 1.6;">{{{message}}}</p>
	<p><a href="{{login_url}}" style="display: inline-block; padding: 8px 15px; background-color: #4CAF50; color: #fff; text-decoration: none; border-radius: 3px; transition: background-color 0.3s ease;">{{link_text}}</a></p>
</div>"#;

/// Result of the pre-render stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreRender {
	/// Keep processing the request
	Continue,
	/// Answer with a redirect to this URL and stop
	Redirect(String),
}

#[derive(Serialize)]
struct ShieldBlockVars<'a> {
	message: &'a str,
	login_url: &'a str,
	link_text: &'a str,
}

pub struct ShieldTransformer {
	handlebars: Handlebars<'static>,
	auth: Arc<dyn AuthProvider>,
	locale: Locale,
}

impl std::fmt::Debug for ShieldTransformer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ShieldTransformer")
			.field("auth", &self.auth)
			.field("locale", &self.locale)
			.finish_non_exhaustive()
	}
}

impl ShieldTransformer {
	pub fn new(auth: Arc<dyn AuthProvider>, locale: Locale) -> ClResult<Self> {
		let mut handlebars = Handlebars::new();
		handlebars.set_strict_mode(true);
		handlebars.register_template_string(SHIELD_BLOCK, SHIELD_BLOCK_TEMPLATE).map_err(|e| {
			Error::ConfigError(format!("Invalid shield block template: {}", e))
		})?;

		Ok(Self { handlebars, auth, locale })
	}

	/// Login URL returning the visitor to the current item
	pub fn login_url(&self, ctx: &RequestContext) -> String {
		self.auth.login_url(ctx.permalink.as_deref().unwrap_or_default())
	}

	/// Pre-render stage: redirect blocked visitors when redirect mode is on
	pub fn pre_render(&self, settings: &ShieldSettings, ctx: &RequestContext) -> PreRender {
		match evaluate(settings, ctx) {
			Decision::BlockWithRedirect => {
				let url = self.login_url(ctx);
				info!("Shield redirect for {:?} to login", ctx.permalink);
				PreRender::Redirect(url)
			}
			Decision::Allow | Decision::BlockWithMessage => PreRender::Continue,
		}
	}

	/// Content-filter stage: replace the body of blocked items with the shield block.
	///
	/// In redirect mode the body is never touched here; the pre-render stage owns
	/// blocking in that mode.
	pub fn filter_content<'a>(
		&self,
		settings: &ShieldSettings,
		ctx: &RequestContext,
		body: &'a str,
	) -> Cow<'a, str> {
		if settings.redirect_to_login {
			return Cow::Borrowed(body);
		}

		match evaluate(settings, ctx) {
			Decision::BlockWithMessage => {
				debug!("Shield message for {:?}", ctx.permalink);
				Cow::Owned(self.render_shield_block(&settings.shield_message, &self.login_url(ctx)))
			}
			Decision::Allow | Decision::BlockWithRedirect => Cow::Borrowed(body),
		}
	}

	/// Render the shield block.
	///
	/// The message is filtered again and replaced by the localized default if empty.
	pub fn render_shield_block(&self, message: &str, login_url: &str) -> String {
		let filtered = filter_post_html(message);
		let message = if filtered.trim().is_empty() {
			self.locale.default_shield_message()
		} else {
			filtered.as_str()
		};
		let vars = ShieldBlockVars {
			message,
			login_url,
			link_text: self.locale.text(Text::LoginLink),
		};

		match self.handlebars.render(SHIELD_BLOCK, &vars) {
			Ok(html) => html,
			Err(err) => {
				error!("Shield block rendering failed: {}", err);
				format!(
					"<div class=\"postshield-block\"><p>{}</p><p><a href=\"{}\">{}</a></p></div>",
					message,
					handlebars::html_escape(login_url),
					vars.link_text
				)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use postshield_types::types::AuthCtx;
	use std::collections::BTreeSet;

	#[derive(Debug)]
	struct TestAuth;

	impl AuthProvider for TestAuth {
		fn authenticate(&self, _token: &str) -> Option<AuthCtx> {
			None
		}

		fn login_url(&self, return_to: &str) -> String {
			format!("/login?redirect_to={}", return_to)
		}
	}

	fn transformer() -> ShieldTransformer {
		ShieldTransformer::new(Arc::new(TestAuth), Locale::En).unwrap()
	}

	fn settings(redirect: bool) -> ShieldSettings {
		ShieldSettings {
			enable_shield: true,
			shielded_content_types: BTreeSet::from(["post".to_string()]),
			shield_message: "<strong>Members only</strong>".into(),
			redirect_to_login: redirect,
		}
	}

	fn anonymous_post() -> RequestContext {
		RequestContext::single(false, "post", "https://example.com/post/hello")
	}

	#[test]
	fn test_pre_render_redirects_in_redirect_mode() {
		let t = transformer();
		assert_eq!(
			t.pre_render(&settings(true), &anonymous_post()),
			PreRender::Redirect("/login?redirect_to=https://example.com/post/hello".into())
		);
	}

	#[test]
	fn test_pre_render_continues_otherwise() {
		let t = transformer();
		assert_eq!(t.pre_render(&settings(false), &anonymous_post()), PreRender::Continue);
		let ctx = RequestContext::single(true, "post", "https://example.com/post/hello");
		assert_eq!(t.pre_render(&settings(true), &ctx), PreRender::Continue);
	}

	#[test]
	fn test_filter_replaces_body_in_message_mode() {
		let t = transformer();
		let out = t.filter_content(&settings(false), &anonymous_post(), "<p>secret</p>");
		assert!(!out.contains("secret"));
		assert!(out.contains("<strong>Members only</strong>"));
		assert!(out.contains("Login here"));
		assert!(out.contains("/login?redirect_to&#x3D;https://example.com/post/hello"));
	}

	#[test]
	fn test_filter_passes_allowed_content() {
		let t = transformer();
		let ctx = RequestContext::single(true, "post", "https://example.com/post/hello");
		assert_eq!(t.filter_content(&settings(false), &ctx, "<p>secret</p>"), "<p>secret</p>");
		let ctx = RequestContext::single(false, "page", "https://example.com/page/about");
		assert_eq!(t.filter_content(&settings(false), &ctx, "<p>about</p>"), "<p>about</p>");
	}

	#[test]
	fn test_filter_defers_to_redirect_mode() {
		let t = transformer();
		let out = t.filter_content(&settings(true), &anonymous_post(), "<p>secret</p>");
		assert!(matches!(out, Cow::Borrowed(_)));
		assert_eq!(out, "<p>secret</p>");
	}

	#[test]
	fn test_shield_block_refilters_message() {
		let t = transformer();
		let html = t.render_shield_block("Hi<script>alert(1)</script>", "/login");
		assert!(html.contains("Hi"));
		assert!(!html.contains("<script>"));

		let html = t.render_shield_block("", "/login");
		assert!(html.contains(Locale::En.default_shield_message()));
	}

	#[test]
	fn test_shield_block_escapes_login_url() {
		let t = transformer();
		let html = t.render_shield_block("x", "/login?a=\"><script>");
		assert!(!html.contains("\"><script>"));
	}
}

// vim: ts=4
