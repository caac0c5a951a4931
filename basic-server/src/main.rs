use clap::{Parser, Subcommand};
use std::{path::PathBuf, process::ExitCode, sync::Arc};
use tracing::{error, info};
use url::Url;

use postshield::{AppBuilder, JwtAuthProvider};
use postshield_content_adapter_fs::ContentAdapterFs;
use postshield_core::{i18n::Locale, lifecycle, registry::StaticContentTypes};
use postshield_settings_adapter_sqlite::SettingsAdapterSqlite;
use postshield_types::error::{ClResult, Error};

#[derive(Parser, Debug)]
#[command(name = "postshield")]
#[command(version, about = "Content gate for single-item views", long_about = None)]
struct Config {
	#[command(subcommand)]
	command: Option<Command>,

	/// Address to listen on
	#[arg(long, env = "LISTEN", default_value = "127.0.0.1:8080")]
	listen: String,

	/// Directory of the settings database
	#[arg(long, env = "DB_DIR", default_value = "./data")]
	db_dir: PathBuf,

	/// Content root: `<dir>/<type>/<slug>.html`
	#[arg(long, env = "CONTENT_DIR", default_value = "./content")]
	content_dir: PathBuf,

	/// Public base URL, used for permalinks
	#[arg(long, env = "BASE_URL", default_value = "http://127.0.0.1:8080")]
	base_url: Url,

	/// Login endpoint, absolute or relative to the base URL
	#[arg(long, env = "LOGIN_URL", default_value = "/login")]
	login_url: String,

	/// HS256 secret shared with the login endpoint
	#[arg(long, env = "JWT_SECRET", hide_env_values = true)]
	jwt_secret: Option<String>,

	/// Language of the shield texts (en, de, hu)
	#[arg(long, env = "SHIELD_LOCALE", default_value = "en")]
	locale: String,

	/// Content types as `name:Label[:private]`, comma separated
	#[arg(long, env = "CONTENT_TYPES", default_value = "post:Posts,page:Pages")]
	content_types: String,

	#[arg(long, env = "SITE_TITLE", default_value = "Postshield")]
	site_title: String,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Activate the shield and serve content (default)
	Serve,
	/// Write the default shield settings unless they exist
	Activate,
	/// Remove the shield settings
	Deactivate,
	/// Issue an access token for development
	Token {
		/// Subject of the token
		sub: String,
		/// Role to grant, may be repeated
		#[arg(long = "role")]
		roles: Vec<String>,
	},
}

impl Config {
	fn locale(&self) -> Locale {
		Locale::parse(&self.locale)
	}

	async fn settings_store(&self) -> ClResult<SettingsAdapterSqlite> {
		SettingsAdapterSqlite::new(self.db_dir.join("settings.db")).await
	}

	fn jwt_secret(&self) -> ClResult<&str> {
		self.jwt_secret.as_deref().ok_or_else(|| Error::ConfigError("JWT_SECRET is not set".into()))
	}

	fn auth_provider(&self) -> ClResult<JwtAuthProvider> {
		let secret = self.jwt_secret()?;
		let login_url = self
			.base_url
			.join(&self.login_url)
			.map_err(|e| Error::ConfigError(format!("Invalid login URL: {}", e)))?;
		JwtAuthProvider::new(secret.as_bytes(), login_url)
	}
}

async fn serve(config: &Config) -> ClResult<()> {
	let settings_store = Arc::new(config.settings_store().await?);
	lifecycle::activate(settings_store.as_ref(), config.locale()).await?;

	let content_store = ContentAdapterFs::new(&config.content_dir).await?;
	let registry = StaticContentTypes::parse(&config.content_types)?;

	let mut builder = AppBuilder::new(config.base_url.clone());
	builder
		.listen(config.listen.as_str())
		.site_title(config.site_title.as_str())
		.locale(config.locale())
		.form_key(config.jwt_secret()?.as_bytes())
		.settings_store(settings_store)
		.content_store(Arc::new(content_store))
		.registry(Arc::new(registry))
		.auth_provider(Arc::new(config.auth_provider()?));
	builder.run().await
}

async fn run(config: Config) -> ClResult<()> {
	match &config.command {
		None | Some(Command::Serve) => serve(&config).await,
		Some(Command::Activate) => {
			let store = config.settings_store().await?;
			if lifecycle::activate(&store, config.locale()).await? {
				info!("Default shield settings written");
			} else {
				info!("Shield settings already exist, left unchanged");
			}
			Ok(())
		}
		Some(Command::Deactivate) => {
			let store = config.settings_store().await?;
			lifecycle::deactivate(&store).await
		}
		Some(Command::Token { sub, roles }) => {
			let roles: Vec<&str> = roles.iter().map(String::as_str).collect();
			let token = config.auth_provider()?.generate_token(sub, &roles)?;
			println!("{}", token);
			Ok(())
		}
	}
}

#[tokio::main]
async fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.init();

	let config = Config::parse();
	match run(config).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			error!("FATAL: {}", err);
			ExitCode::FAILURE
		}
	}
}

// vim: ts=4
