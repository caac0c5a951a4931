//! Router tests
//!
//! Drive the full router (content routes, admin routes, middlewares) with
//! `oneshot` requests against a temp content directory and an in-memory
//! settings store.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use url::Url;

use postshield::{App, AppBuilder, JwtAuthProvider, routes};
use postshield_admin::form_token::FORM_TOKEN_FIELD;
use postshield_content_adapter_fs::ContentAdapterFs;
use postshield_core::i18n::Locale;
use postshield_core::lifecycle;
use postshield_core::memory_store::MemorySettingsStore;
use postshield_core::registry::StaticContentTypes;
use postshield_core::settings::SETTINGS_KEY;
use postshield_types::settings_store::SettingsStore;

const SECRET: &[u8] = b"router test secret";
const SECRET_BODY: &str = "<p>Top secret body</p>";

struct TestEnv {
	router: Router,
	store: Arc<MemorySettingsStore>,
	auth: JwtAuthProvider,
	_temp: TempDir,
}

async fn create_test_env() -> TestEnv {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	for (ct, slug, content) in [
		("post", "hello", format!("---\ntitle: Hello\n---\n{}", SECRET_BODY)),
		("post", "second", "<p>Second post</p>".to_string()),
		("page", "about", "<p>About page</p>".to_string()),
		("draft", "wip", "<p>Work in progress</p>".to_string()),
	] {
		let dir = temp_dir.path().join(ct);
		tokio::fs::create_dir_all(&dir).await.expect("Failed to create dir");
		tokio::fs::write(dir.join(format!("{}.html", slug)), content)
			.await
			.expect("Failed to write item");
	}

	let store = Arc::new(MemorySettingsStore::new());
	let content = ContentAdapterFs::new(temp_dir.path()).await.expect("Failed to create adapter");
	let registry = StaticContentTypes::parse("post:Posts,page:Pages,draft:Drafts:private")
		.expect("Invalid registry");
	let login_url = Url::parse("https://example.com/login").expect("Invalid URL");

	let mut builder = AppBuilder::new(Url::parse("https://example.com").expect("Invalid URL"));
	builder
		.locale(Locale::En)
		.settings_store(store.clone())
		.content_store(Arc::new(content))
		.registry(Arc::new(registry))
		.auth_provider(Arc::new(
			JwtAuthProvider::new(SECRET, login_url.clone()).expect("Invalid auth provider"),
		));
	let app: App = builder.build().expect("Failed to build app");
	let router = routes::init(app).expect("Failed to init routes");

	TestEnv {
		router,
		store,
		auth: JwtAuthProvider::new(SECRET, login_url).expect("Invalid auth provider"),
		_temp: temp_dir,
	}
}

impl TestEnv {
	async fn shield(&self, redirect: bool) {
		self.store
			.set(
				SETTINGS_KEY,
				&json!({
					"enable_shield": true,
					"shielded_content_types": ["post"],
					"shield_message": "<strong>Members only</strong>",
					"redirect_to_login": redirect,
				}),
			)
			.await
			.expect("Failed to store settings");
	}

	fn token(&self, roles: &[&str]) -> String {
		self.auth.generate_token("alice", roles).expect("Failed to generate token")
	}

	async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
		let mut req = Request::get(uri);
		if let Some(token) = token {
			req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
		}
		self.router.clone().oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
	}
}

async fn body_string(res: Response<Body>) -> String {
	let bytes = res.into_body().collect().await.expect("Failed to read body").to_bytes();
	String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

/// Value of the hidden form token field in a rendered settings form
fn form_token_in(html: &str) -> String {
	let marker = format!("name=\"{}\" value=\"", FORM_TOKEN_FIELD);
	let start = html.find(&marker).expect("Form token field missing") + marker.len();
	let len = html[start..].find('"').expect("Unterminated form token");
	html[start..start + len].to_string()
}

#[tokio::test]
async fn test_health() {
	let env = create_test_env().await;

	let res = env.get("/health", None).await;
	assert_eq!(res.status(), StatusCode::OK);
	assert!(res.headers().contains_key("x-request-id"));
	let body: Value = serde_json::from_str(&body_string(res).await).unwrap();
	assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
	let env = create_test_env().await;

	let req = Request::get("/health").header("x-request-id", "req-42").body(Body::empty()).unwrap();
	let res = env.router.clone().oneshot(req).await.unwrap();
	assert_eq!(res.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn test_no_settings_means_no_shield() {
	let env = create_test_env().await;

	let res = env.get("/post/hello", None).await;
	assert_eq!(res.status(), StatusCode::OK);
	assert!(body_string(res).await.contains(SECRET_BODY));
}

#[tokio::test]
async fn test_activation_defaults_do_not_shield() {
	let env = create_test_env().await;
	lifecycle::activate(env.store.as_ref(), Locale::En).await.unwrap();

	let res = env.get("/post/hello", None).await;
	assert!(body_string(res).await.contains(SECRET_BODY));
}

#[tokio::test]
async fn test_anonymous_gets_shield_message() {
	let env = create_test_env().await;
	env.shield(false).await;

	let res = env.get("/post/hello", None).await;
	assert_eq!(res.status(), StatusCode::OK);
	let html = body_string(res).await;
	assert!(!html.contains("Top secret"));
	assert!(html.contains("<strong>Members only</strong>"));
	assert!(html.contains("Login here"));
	assert!(html.contains("redirect_to"));
	assert!(html.contains("<title>Hello</title>"));
}

#[tokio::test]
async fn test_anonymous_is_redirected_in_redirect_mode() {
	let env = create_test_env().await;
	env.shield(true).await;

	let res = env.get("/post/hello", None).await;
	assert_eq!(res.status(), StatusCode::FOUND);
	assert_eq!(
		res.headers()[header::LOCATION],
		"https://example.com/login?redirect_to=https%3A%2F%2Fexample.com%2Fpost%2Fhello"
	);
}

#[tokio::test]
async fn test_logged_in_visitor_sees_content() {
	let env = create_test_env().await;
	env.shield(true).await;
	let token = env.token(&[]);

	let res = env.get("/post/hello", Some(&token)).await;
	assert_eq!(res.status(), StatusCode::OK);
	assert!(body_string(res).await.contains(SECRET_BODY));

	// Token in the cookie works too
	let req = Request::get("/post/hello")
		.header(header::COOKIE, format!("token={}", token))
		.body(Body::empty())
		.unwrap();
	let res = env.router.clone().oneshot(req).await.unwrap();
	assert!(body_string(res).await.contains(SECRET_BODY));
}

#[tokio::test]
async fn test_invalid_token_is_anonymous() {
	let env = create_test_env().await;
	env.shield(false).await;

	let res = env.get("/post/hello", Some("garbage")).await;
	assert_eq!(res.status(), StatusCode::OK);
	assert!(!body_string(res).await.contains("Top secret"));
}

#[tokio::test]
async fn test_unshielded_type_and_listings_pass() {
	let env = create_test_env().await;
	env.shield(true).await;

	let res = env.get("/page/about", None).await;
	assert_eq!(res.status(), StatusCode::OK);
	assert!(body_string(res).await.contains("<p>About page</p>"));

	let res = env.get("/post", None).await;
	assert_eq!(res.status(), StatusCode::OK);
	let html = body_string(res).await;
	assert!(html.contains("<a href=\"/post/hello\">Hello</a>"));
	assert!(html.contains("<a href=\"/post/second\">second</a>"));

	let res = env.get("/", None).await;
	assert_eq!(res.status(), StatusCode::OK);
	let html = body_string(res).await;
	assert!(html.contains("<a href=\"/post\">Posts</a>"));
	assert!(!html.contains("Drafts"));
}

#[tokio::test]
async fn test_missing_and_private_items_are_not_found() {
	let env = create_test_env().await;

	assert_eq!(env.get("/post/missing", None).await.status(), StatusCode::NOT_FOUND);
	assert_eq!(env.get("/unknown/hello", None).await.status(), StatusCode::NOT_FOUND);
	assert_eq!(env.get("/draft/wip", None).await.status(), StatusCode::NOT_FOUND);
	assert_eq!(env.get("/draft", None).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_requires_admin_role() {
	let env = create_test_env().await;

	assert_eq!(env.get("/admin/shield", None).await.status(), StatusCode::UNAUTHORIZED);

	let token = env.token(&["editor"]);
	assert_eq!(env.get("/admin/shield", Some(&token)).await.status(), StatusCode::FORBIDDEN);

	let token = env.token(&["admin"]);
	let res = env.get("/admin/shield", Some(&token)).await;
	assert_eq!(res.status(), StatusCode::OK);
	assert!(body_string(res).await.contains("Shield Settings"));
}

#[tokio::test]
async fn test_admin_form_enables_shield() {
	let env = create_test_env().await;
	let token = env.token(&["admin"]);

	let form = body_string(env.get("/admin/shield", Some(&token)).await).await;
	let req = Request::post("/admin/shield")
		.header(header::AUTHORIZATION, format!("Bearer {}", token))
		.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
		.body(Body::from(format!(
			"enable_shield=1&shielded_content_types%5B%5D=post&shielded_content_types%5B%5D=draft&shield_message=&{}={}",
			FORM_TOKEN_FIELD,
			form_token_in(&form)
		)))
		.unwrap();
	let res = env.router.clone().oneshot(req).await.unwrap();
	assert_eq!(res.status(), StatusCode::SEE_OTHER);

	let stored = env.store.get(SETTINGS_KEY).await.unwrap().expect("Record should be stored");
	assert_eq!(stored["shielded_content_types"], json!(["post"]));
	assert!(stored.get(FORM_TOKEN_FIELD).is_none());

	// The next request sees the new settings
	let res = env.get("/post/hello", None).await;
	let html = body_string(res).await;
	assert!(!html.contains("Top secret"));
	assert!(html.contains(Locale::En.default_shield_message()));
}

#[tokio::test]
async fn test_cookie_form_post_requires_form_token() {
	let env = create_test_env().await;
	let cookie = format!("token={}", env.token(&["admin"]));
	let post = |body: String| {
		Request::post("/admin/shield")
			.header(header::COOKIE, cookie.as_str())
			.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
			.body(Body::from(body))
			.unwrap()
	};

	// A cross-site form can carry the cookie but not the token
	let res = env.router.clone().oneshot(post("enable_shield=1".to_string())).await.unwrap();
	assert_eq!(res.status(), StatusCode::FORBIDDEN);
	assert_eq!(env.store.get(SETTINGS_KEY).await.unwrap(), None);

	// A token issued to another subject is not accepted either
	let other = env.auth.generate_token("bob", &["admin"]).expect("Failed to generate token");
	let other_form = body_string(env.get("/admin/shield", Some(&other)).await).await;
	let body = format!("enable_shield=1&{}={}", FORM_TOKEN_FIELD, form_token_in(&other_form));
	let res = env.router.clone().oneshot(post(body)).await.unwrap();
	assert_eq!(res.status(), StatusCode::FORBIDDEN);
	assert_eq!(env.store.get(SETTINGS_KEY).await.unwrap(), None);

	let req = Request::get("/admin/shield")
		.header(header::COOKIE, cookie.as_str())
		.body(Body::empty())
		.unwrap();
	let form = body_string(env.router.clone().oneshot(req).await.unwrap()).await;
	let body = format!("enable_shield=1&{}={}", FORM_TOKEN_FIELD, form_token_in(&form));
	let res = env.router.clone().oneshot(post(body)).await.unwrap();
	assert_eq!(res.status(), StatusCode::SEE_OTHER);
	let stored = env.store.get(SETTINGS_KEY).await.unwrap().expect("Record should be stored");
	assert_eq!(stored["enable_shield"], true);
}

// vim: ts=4
