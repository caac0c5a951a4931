use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

use postshield_admin::AdminState;

use crate::content;
use crate::middleware::{optional_auth, request_id, shield_snapshot};
use crate::prelude::*;

fn init_content(app: App) -> Router {
	Router::new()
		.route("/", get(content::get_index))
		.route("/{content_type}", get(content::get_listing))
		.route("/{content_type}/{slug}", get(content::get_item))
		.route_layer(middleware::from_fn_with_state(app.clone(), shield_snapshot))
		.route("/health", get(content::get_health))
		.with_state(app)
}

pub fn init(app: App) -> ClResult<Router> {
	let admin_router = postshield_admin::router(AdminState::new(app.settings.clone(), &app.form_key)?);

	Ok(Router::new()
		.merge(init_content(app.clone()))
		.merge(admin_router)
		.layer(middleware::from_fn_with_state(app, optional_auth))
		.layer(TraceLayer::new_for_http())
		.layer(middleware::from_fn(request_id)))
}

// vim: ts=4
