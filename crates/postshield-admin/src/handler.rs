//! Admin settings handlers

use axum::{
	Json,
	body::Bytes,
	extract::{Query, State},
	http::StatusCode,
	response::{Html, Redirect},
};
use serde::Deserialize;

use postshield_core::settings::ShieldSettings;
use postshield_types::types::ApiResponse;

use crate::form::parse_form;
use crate::form_token::FORM_TOKEN_FIELD;
use crate::prelude::*;
use crate::{AdminState, FORM_PATH};

#[derive(Debug, Default, Deserialize)]
pub struct FormQuery {
	#[serde(default)]
	updated: Option<String>,
}

/// GET /admin/shield - Render the settings form
pub async fn get_form(
	State(state): State<AdminState>,
	Auth(auth): Auth,
	Query(query): Query<FormQuery>,
) -> ClResult<Html<String>> {
	let settings = state.settings.load().await?;
	let content_types = state.settings.sanitizer().registry().list_public();
	let updated = query.updated.as_deref() == Some("true");
	let form_token = state.form_tokens.issue(&auth.sub)?;

	let html = state.form.render(
		&settings,
		&content_types,
		state.settings.locale(),
		updated,
		&form_token,
	)?;
	Ok(Html(html))
}

/// POST /admin/shield - Save the submitted form and redirect back to it
///
/// The form token must have been issued to the same subject.
pub async fn post_form(
	State(state): State<AdminState>,
	Auth(auth): Auth,
	body: Bytes,
) -> ClResult<Redirect> {
	let mut raw = parse_form(&body);
	let form_token = raw.as_object_mut().and_then(|fields| fields.remove(FORM_TOKEN_FIELD));
	let valid = form_token
		.as_ref()
		.and_then(serde_json::Value::as_str)
		.is_some_and(|token| state.form_tokens.verify(&auth.sub, token));
	if !valid {
		warn!(subject = %auth.sub, "Settings form submitted without a valid form token");
		return Err(Error::PermissionDenied);
	}

	state.settings.save(&raw).await?;
	info!(subject = %auth.sub, "Shield settings updated from admin form");

	Ok(Redirect::to(&format!("{}?updated=true", FORM_PATH)))
}

/// GET /api/settings/shield - Current settings record
pub async fn get_settings(
	State(state): State<AdminState>,
	OptionalRequestId(req_id): OptionalRequestId,
) -> ClResult<(StatusCode, Json<ApiResponse<ShieldSettings>>)> {
	let settings = state.settings.load().await?;

	Ok((StatusCode::OK, Json(ApiResponse::new(settings).with_req_id(req_id))))
}

/// PUT /api/settings/shield - Replace the settings record
///
/// The body is raw input: it goes through the sanitizer like a form submission,
/// so it never fails validation. The sanitized record is returned.
pub async fn put_settings(
	State(state): State<AdminState>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
	Json(raw): Json<serde_json::Value>,
) -> ClResult<(StatusCode, Json<ApiResponse<ShieldSettings>>)> {
	let settings = state.settings.save(&raw).await?;
	info!(subject = %auth.sub, "Shield settings updated via API");

	Ok((StatusCode::OK, Json(ApiResponse::new(settings).with_req_id(req_id))))
}

// vim: ts=4
