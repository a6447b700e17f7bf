//! `oauth2-roster` service binary.

// std
use std::sync::Arc;
// crates.io
use tokio::net::TcpListener;
// self
use oauth2_roster::{
	error::{Result, TransportError},
	issuer::TokenIssuer,
	login::LoginBroker,
	oauth::OAuth2Provider,
	obs,
	provider::ProviderDescriptor,
	server::{self, AppState},
	settings::Settings,
	store::{EmployeeStore, MemoryStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	let settings = Settings::load()?;

	obs::init_tracing(&settings.log_filter)?;

	let issuer = Arc::new(TokenIssuer::new(settings.security_context()?));
	let github = settings.github.clone();
	let provider = OAuth2Provider::new(
		ProviderDescriptor::github()?,
		github.client_id,
		github.client_secret,
		github.redirect_uri,
		github.scopes,
	)?;
	let login = Arc::new(LoginBroker::new(Arc::new(provider)));
	let store: Arc<dyn EmployeeStore> = Arc::new(MemoryStore::default());
	let state =
		AppState::new(issuer, store, login).protect_employees(settings.protect_employees);
	let listener = TcpListener::bind(settings.bind_addr).await.map_err(TransportError::Io)?;

	server::serve(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %e, "failed to listen for Ctrl-C");
	}

	tracing::info!("shutdown requested");
}
