//! Content handlers
//!
//! The single-item handler is where both shield stages run: the pre-render
//! stage before the item body is rendered, the content filter while it is.

use axum::{
	extract::{Path, State},
	http::{StatusCode, header},
	response::{Html, IntoResponse, Response},
};

use postshield_core::decision::RequestContext;
use postshield_core::transform::PreRender;
use postshield_types::types::ContentType;

use crate::middleware::ShieldSnapshot;
use crate::prelude::*;

/// Only publicly viewable content types are routed
fn public_type(app: &AppState, name: &str) -> ClResult<ContentType> {
	app.registry.get(name).filter(|ct| ct.public).ok_or(Error::NotFound)
}

/// GET / - Index of the public content types
pub async fn get_index(State(app): State<App>) -> ClResult<Html<String>> {
	let html = app.pages.index(&app.opts.site_title, &app.registry.list_public())?;
	Ok(Html(html))
}

/// GET /{content_type} - Listing of a content type. Listings are never shielded.
pub async fn get_listing(
	State(app): State<App>,
	Path(content_type): Path<String>,
) -> ClResult<Html<String>> {
	let ct = public_type(&app, &content_type)?;
	let items = app.content.list_items(&ct.name).await?;

	Ok(Html(app.pages.listing(&ct, &items)?))
}

/// GET /{content_type}/{slug} - Single item view
pub async fn get_item(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	ShieldSnapshot(settings): ShieldSnapshot,
	Path((content_type, slug)): Path<(String, String)>,
) -> ClResult<Response> {
	let ct = public_type(&app, &content_type)?;
	let item = app.content.read_item(&ct.name, &slug).await?;

	let ctx = RequestContext::single(
		auth.is_some(),
		&ct.name,
		app.permalink(&item.content_type, &item.slug),
	);

	if let PreRender::Redirect(url) = app.transformer.pre_render(&settings, &ctx) {
		return Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response());
	}

	let body = app.transformer.filter_content(&settings, &ctx, &item.body);
	let html = app.pages.item(&item, &body)?;

	Ok(Html(html).into_response())
}

/// GET /health
pub async fn get_health() -> impl IntoResponse {
	axum::Json(serde_json::json!({ "status": "ok", "version": crate::app::VERSION }))
}

// vim: ts=4
