//! Admin surface of the shield: the settings form and the JSON settings API.
//!
//! All routes require the `admin` role. Authentication itself is done by the
//! server, which inserts an [`Auth`](postshield_types::extract::Auth) extension
//! for signed-in visitors.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod form;
pub mod form_token;
pub mod handler;
pub mod perm;

mod prelude;

use axum::{Router, middleware, routing::get};
use std::sync::Arc;

use postshield_core::ShieldSettingsService;

use crate::form::SettingsForm;
use crate::form_token::FormTokens;
use crate::prelude::*;

pub const FORM_PATH: &str = "/admin/shield";
pub const API_PATH: &str = "/api/settings/shield";

#[derive(Debug, Clone)]
pub struct AdminState {
	pub settings: Arc<ShieldSettingsService>,
	pub form: Arc<SettingsForm>,
	pub form_tokens: Arc<FormTokens>,
}

impl AdminState {
	/// `form_key` signs the settings form tokens
	pub fn new(settings: Arc<ShieldSettingsService>, form_key: &[u8]) -> ClResult<Self> {
		Ok(Self {
			settings,
			form: Arc::new(SettingsForm::new()?),
			form_tokens: Arc::new(FormTokens::new(form_key)?),
		})
	}
}

/// Admin routes with their state applied
pub fn router(state: AdminState) -> Router {
	Router::new()
		.route(FORM_PATH, get(handler::get_form).post(handler::post_form))
		.route(API_PATH, get(handler::get_settings).put(handler::put_settings))
		.route_layer(middleware::from_fn(perm::require_admin))
		.with_state(state)
}

// vim: ts=4
