//! App state type

use std::sync::Arc;
use url::Url;

use postshield_core::i18n::Locale;
use postshield_core::settings::{Sanitizer, ShieldSettingsService};
use postshield_core::transform::ShieldTransformer;
use postshield_types::auth_provider::AuthProvider;
use postshield_types::content_store::{ContentStore, ContentTypeRegistry};
use postshield_types::settings_store::SettingsStore;

use crate::pages::Pages;
use crate::prelude::*;
use crate::routes;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub opts: AppBuilderOpts,
	pub settings: Arc<ShieldSettingsService>,
	pub transformer: ShieldTransformer,
	pub pages: Pages,
	/// Signs the admin form tokens
	pub form_key: Box<[u8]>,

	pub registry: Arc<dyn ContentTypeRegistry>,
	pub content: Arc<dyn ContentStore>,
	pub auth: Arc<dyn AuthProvider>,
}

impl std::fmt::Debug for AppState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppState").field("opts", &self.opts).finish_non_exhaustive()
	}
}

impl AppState {
	/// Permanent URL of a content item
	pub fn permalink(&self, content_type: &str, slug: &str) -> String {
		format!("{}/{}/{}", self.opts.base_url.as_str().trim_end_matches('/'), content_type, slug)
	}
}

pub type App = Arc<AppState>;

pub struct Adapters {
	pub settings_store: Option<Arc<dyn SettingsStore>>,
	pub content_store: Option<Arc<dyn ContentStore>>,
	pub registry: Option<Arc<dyn ContentTypeRegistry>>,
	pub auth_provider: Option<Arc<dyn AuthProvider>>,
}

#[derive(Debug)]
pub struct AppBuilderOpts {
	pub listen: Box<str>,
	pub base_url: Url,
	pub site_title: Box<str>,
	pub locale: Locale,
}

pub struct AppBuilder {
	opts: AppBuilderOpts,
	adapters: Adapters,
	form_key: Option<Box<[u8]>>,
}

impl AppBuilder {
	pub fn new(base_url: Url) -> Self {
		AppBuilder {
			opts: AppBuilderOpts {
				listen: "127.0.0.1:8080".into(),
				base_url,
				site_title: "Postshield".into(),
				locale: Locale::default(),
			},
			adapters: Adapters {
				settings_store: None,
				content_store: None,
				registry: None,
				auth_provider: None,
			},
			form_key: None,
		}
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self { self.opts.listen = listen.into(); self }
	pub fn site_title(&mut self, site_title: impl Into<Box<str>>) -> &mut Self { self.opts.site_title = site_title.into(); self }
	pub fn locale(&mut self, locale: Locale) -> &mut Self { self.opts.locale = locale; self }
	pub fn form_key(&mut self, key: &[u8]) -> &mut Self { self.form_key = Some(key.into()); self }

	// Adapters
	pub fn settings_store(&mut self, store: Arc<dyn SettingsStore>) -> &mut Self { self.adapters.settings_store = Some(store); self }
	pub fn content_store(&mut self, store: Arc<dyn ContentStore>) -> &mut Self { self.adapters.content_store = Some(store); self }
	pub fn registry(&mut self, registry: Arc<dyn ContentTypeRegistry>) -> &mut Self { self.adapters.registry = Some(registry); self }
	pub fn auth_provider(&mut self, auth: Arc<dyn AuthProvider>) -> &mut Self { self.adapters.auth_provider = Some(auth); self }

	/// Assemble the app state
	pub fn build(self) -> ClResult<App> {
		let missing = |name: &str| Error::ConfigError(format!("No {} configured", name));
		let settings_store = self.adapters.settings_store.ok_or_else(|| missing("settings store"))?;
		let content = self.adapters.content_store.ok_or_else(|| missing("content store"))?;
		let registry = self.adapters.registry.ok_or_else(|| missing("content type registry"))?;
		let auth = self.adapters.auth_provider.ok_or_else(|| missing("auth provider"))?;
		let locale = self.opts.locale;
		let form_key = self.form_key.filter(|key| !key.is_empty()).unwrap_or_else(|| {
			debug!("No form key configured, using a random one");
			let mut key = Vec::with_capacity(32);
			key.extend_from_slice(uuid::Uuid::new_v4().as_bytes());
			key.extend_from_slice(uuid::Uuid::new_v4().as_bytes());
			key.into()
		});

		let sanitizer = Sanitizer::new(registry.clone(), locale);
		Ok(Arc::new(AppState {
			settings: Arc::new(ShieldSettingsService::new(settings_store, sanitizer)),
			transformer: ShieldTransformer::new(auth.clone(), locale)?,
			pages: Pages::new(locale)?,
			form_key,
			opts: self.opts,

			registry,
			content,
			auth,
		}))
	}

	/// Build the app and serve it until shutdown
	pub async fn run(self) -> ClResult<()> {
		let app = self.build()?;
		info!("Postshield V{}", VERSION);

		let router = routes::init(app.clone())?;
		let listener = tokio::net::TcpListener::bind(app.opts.listen.as_ref()).await?;
		info!("Listening on HTTP {}", app.opts.listen);

		axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;
		info!("Server stopped");

		Ok(())
	}
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		error!("Failed to listen for shutdown signal: {}", err);
		std::future::pending::<()>().await;
	}
	info!("Shutdown signal received");
}

// vim: ts=4
