//! Helpers shared by the integration tests.

#![allow(dead_code)]

// std
use std::{future, sync::Arc};
// crates.io
use serde_json::{Value, json};
use tokio::net::TcpListener;
// self
use oauth2_roster::{
	auth::{ClientId, ProviderId, ScopeSet},
	error::Result,
	issuer::{SecurityContext, TokenIssuer},
	login::{AuthorizationSession, LoginBroker},
	provider::{IdentityProvider, Principal, ProviderDescriptor, ProviderFuture},
	server::{self, AppState},
	store::{EmployeeStore, MemoryStore},
	url::Url,
};

pub const SECRET: &str = "my-secret-key-which-is-very-secure";

pub fn issuer_with(secret: &str) -> TokenIssuer {
	TokenIssuer::new(SecurityContext::new(secret).expect("Secret fixture should be accepted."))
}

pub fn issuer() -> TokenIssuer {
	issuer_with(SECRET)
}

pub fn loopback_descriptor(base: &str) -> ProviderDescriptor {
	let url = |path: &str| Url::parse(&format!("{base}{path}")).expect("Mock endpoint should parse.");

	ProviderDescriptor::builder(ProviderId::new("mock").expect("Provider fixture should be valid."))
		.authorization_endpoint(url("/authorize"))
		.token_endpoint(url("/token"))
		.user_info_endpoint(url("/user"))
		.build()
		.expect("Loopback descriptor should build.")
}

/// Provider that accepts one code and answers with a fixed profile.
pub struct StubProvider {
	descriptor: ProviderDescriptor,
	accepted_code: &'static str,
	profile: Value,
}
impl StubProvider {
	pub fn new(accepted_code: &'static str, profile: Value) -> Self {
		Self { descriptor: loopback_descriptor("http://127.0.0.1:1"), accepted_code, profile }
	}

	pub fn ada() -> Self {
		Self::new("good-code", json!({ "login": "ada", "name": "Ada Lovelace", "id": 1 }))
	}
}
impl IdentityProvider for StubProvider {
	fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}

	fn start_session(&self) -> Result<AuthorizationSession> {
		Ok(AuthorizationSession::generate(
			&self.descriptor,
			&ClientId::new("stub-client").expect("Client fixture should be valid."),
			ScopeSet::new(["read:user"]).expect("Scope fixture should be valid."),
			Url::parse("http://localhost/api/v1/auth/success").expect("Redirect should parse."),
		))
	}

	fn authenticate(
		&self,
		_session: AuthorizationSession,
		code: String,
	) -> ProviderFuture<'_, Principal> {
		Box::pin(async move {
			if code != self.accepted_code {
				return Err(oauth2_roster::error::Error::InvalidGrant {
					reason: "bad_verification_code".into(),
				});
			}

			Ok(serde_json::from_value(self.profile.clone()).expect("Profile should be an object."))
		})
	}
}

pub struct TestApp {
	pub base: String,
	pub issuer: Arc<TokenIssuer>,
	pub store: Arc<MemoryStore>,
	pub login: Arc<LoginBroker>,
}

/// Serves the router on an ephemeral loopback port.
pub async fn spawn_app(provider: impl IdentityProvider + 'static, protect: bool) -> TestApp {
	let issuer = Arc::new(issuer());
	let store = Arc::new(MemoryStore::default());
	let login = Arc::new(LoginBroker::new(Arc::new(provider)));
	let dyn_store: Arc<dyn EmployeeStore> = store.clone();
	let state = AppState::new(issuer.clone(), dyn_store, login.clone()).protect_employees(protect);
	let listener =
		TcpListener::bind("127.0.0.1:0").await.expect("Ephemeral listener should bind.");
	let addr = listener.local_addr().expect("Listener should expose its address.");

	tokio::spawn(async move {
		let _ = server::serve(listener, state, future::pending()).await;
	});

	TestApp { base: format!("http://{addr}"), issuer, store, login }
}

/// Provider transport that accepts the self-signed certificates `httpmock` serves.
#[cfg(feature = "reqwest")]
pub fn test_http_client() -> oauth2_roster::http::ReqwestHttpClient {
	let client = reqwest::Client::builder()
		.danger_accept_invalid_certs(true)
		.redirect(reqwest::redirect::Policy::none())
		.build()
		.expect("Test provider client should build.");

	oauth2_roster::http::ReqwestHttpClient::with_client(client)
}

#[cfg(feature = "reqwest")]
pub fn http_client() -> reqwest::Client {
	reqwest::Client::builder()
		.redirect(reqwest::redirect::Policy::none())
		.build()
		.expect("Test HTTP client should build.")
}
