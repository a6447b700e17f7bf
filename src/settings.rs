//! Layered service configuration.
//!
//! Sources are merged in order, later ones winning:
//!
//! 1. built-in defaults,
//! 2. an optional file (`config/roster.{toml,json,yaml,...}`, overridable via `ROSTER_CONFIG`),
//! 3. `ROSTER__*` environment variables, with `__` separating nested keys (for example
//!    `ROSTER__SECURITY__SIGNING_SECRET`).

// std
use std::net::SocketAddr;
// crates.io
use config::{Config, Environment, File, Source};
// self
use crate::{
	_prelude::*,
	auth::{ClientId, ClientSecret, ScopeSet, SigningSecret},
	error::ConfigError,
	issuer::{MAX_VALIDITY, SecurityContext},
};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "ROSTER_CONFIG";
/// Configuration file consulted when [`CONFIG_PATH_ENV`] is unset; any supported extension.
pub const DEFAULT_CONFIG_PATH: &str = "config/roster";

const ENV_PREFIX: &str = "ROSTER";
const ENV_SEPARATOR: &str = "__";

/// Top-level settings for the service binary.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
	/// Socket address the HTTP server binds to.
	pub bind_addr: SocketAddr,
	/// Default `tracing` filter directive, overridden by `RUST_LOG`.
	pub log_filter: String,
	/// Require a bearer credential on the employee routes.
	pub protect_employees: bool,
	/// Credential signing settings.
	pub security: SecuritySettings,
	/// GitHub OAuth App registration.
	pub github: GithubSettings,
}
impl Settings {
	/// Loads settings from the default file location and the process environment.
	pub fn load() -> Result<Self, ConfigError> {
		let path =
			std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());

		Self::load_with(File::with_name(&path).required(false), environment())
	}

	/// Loads settings from an explicit file source and environment source.
	pub fn load_with<F>(file: F, env: Environment) -> Result<Self, ConfigError>
	where
		F: 'static + Source + Send + Sync,
	{
		let settings = Config::builder()
			.set_default("bind_addr", "127.0.0.1:8080")?
			.set_default("log_filter", "info")?
			.set_default("protect_employees", true)?
			.set_default("security.token_ttl_secs", 3_600_i64)?
			.set_default("github.redirect_uri", "http://localhost:8080/api/v1/auth/success")?
			.set_default("github.scopes", vec!["read:user"])?
			.add_source(file)
			.add_source(env)
			.build()?
			.try_deserialize::<Self>()?;

		settings.validate()?;

		Ok(settings)
	}

	/// Builds the [`SecurityContext`] described by [`Settings::security`].
	pub fn security_context(&self) -> Result<SecurityContext> {
		Ok(SecurityContext::new(self.security.signing_secret.clone())?
			.with_validity(Duration::seconds(self.security.token_ttl_secs)))
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.security.signing_secret.is_empty() {
			return Err(ConfigError::invalid_value("security.signing_secret", "must not be empty"));
		}
		if self.security.token_ttl_secs <= 0 {
			return Err(ConfigError::invalid_value("security.token_ttl_secs", "must be positive"));
		}
		if self.security.token_ttl_secs > MAX_VALIDITY.whole_seconds() {
			return Err(ConfigError::invalid_value(
				"security.token_ttl_secs",
				format!("must not exceed {} seconds", MAX_VALIDITY.whole_seconds()),
			));
		}
		if self.github.client_secret.as_ref().is_some_and(ClientSecret::is_empty) {
			return Err(ConfigError::invalid_value("github.client_secret", "must not be empty"));
		}

		Ok(())
	}
}

/// Credential signing settings.
#[derive(Clone, Debug, Deserialize)]
pub struct SecuritySettings {
	/// HMAC key used to sign credentials.
	pub signing_secret: SigningSecret,
	/// Credential validity window in seconds.
	pub token_ttl_secs: i64,
}

/// GitHub OAuth App registration.
#[derive(Clone, Debug, Deserialize)]
pub struct GithubSettings {
	/// OAuth client identifier.
	pub client_id: ClientId,
	/// OAuth client secret; omit for PKCE-only public clients.
	#[serde(default)]
	pub client_secret: Option<ClientSecret>,
	/// Callback URL registered with GitHub.
	pub redirect_uri: Url,
	/// Scopes requested on login.
	pub scopes: ScopeSet,
}

/// Environment source used by [`Settings::load`].
pub fn environment() -> Environment {
	Environment::with_prefix(ENV_PREFIX)
		.prefix_separator(ENV_SEPARATOR)
		.separator(ENV_SEPARATOR)
		.try_parsing(true)
		.list_separator(",")
		.with_list_parse_key("github.scopes")
}
