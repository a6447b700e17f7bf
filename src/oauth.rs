//! OAuth 2.0 identity provider backed by the `oauth2` crate and reqwest.

pub use oauth2;

// std
use std::borrow::Cow;
// crates.io
use oauth2::{
	AuthType, AuthUrl, AuthorizationCode, ClientId as OAuthClientId,
	ClientSecret as OAuthClientSecret, EndpointNotSet, EndpointSet, HttpClientError,
	PkceCodeVerifier, RedirectUrl, RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	auth::{ClientId, ClientSecret, ProviderToken, ScopeSet},
	error::{ConfigError, TransientError, TransportError},
	http::{self, ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
	login::AuthorizationSession,
	provider::{
		ClientAuthMethod, IdentityProvider, Principal, ProviderDescriptor, ProviderFuture,
	},
};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Authorization Code + PKCE login against a provider described by a [`ProviderDescriptor`].
pub struct OAuth2Provider {
	descriptor: ProviderDescriptor,
	client_id: ClientId,
	scope: ScopeSet,
	redirect_uri: Url,
	oauth_client: ConfiguredBasicClient,
	http_client: ReqwestHttpClient,
}
impl OAuth2Provider {
	/// Configures the provider with a client that does not follow redirects.
	pub fn new(
		descriptor: ProviderDescriptor,
		client_id: ClientId,
		client_secret: Option<ClientSecret>,
		redirect_uri: Url,
		scope: ScopeSet,
	) -> Result<Self> {
		let http_client = ReqwestHttpClient::new()?;

		Self::with_http_client(descriptor, client_id, client_secret, redirect_uri, scope, http_client)
	}

	/// Configures the provider with a caller-supplied transport.
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		client_id: ClientId,
		client_secret: Option<ClientSecret>,
		redirect_uri: Url,
		scope: ScopeSet,
		http_client: ReqwestHttpClient,
	) -> Result<Self> {
		let auth_url = AuthUrl::new(descriptor.endpoints.authorization.to_string())
			.map_err(|source| ConfigError::InvalidDescriptor { source })?;
		let token_url = TokenUrl::new(descriptor.endpoints.token.to_string())
			.map_err(|source| ConfigError::InvalidDescriptor { source })?;
		let redirect_url = RedirectUrl::new(redirect_uri.to_string())
			.map_err(|source| ConfigError::InvalidRedirect { source })?;
		let mut oauth_client = BasicClient::new(OAuthClientId::new(client_id.to_string()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url)
			.set_redirect_uri(redirect_url);

		match (descriptor.preferred_client_auth_method, client_secret) {
			(ClientAuthMethod::NoneWithPkce, _) | (_, None) => {},
			(method, Some(secret)) => {
				oauth_client =
					oauth_client.set_client_secret(OAuthClientSecret::new(secret.expose().to_owned()));

				if matches!(method, ClientAuthMethod::ClientSecretPost) {
					oauth_client = oauth_client.set_auth_type(AuthType::RequestBody);
				}
			},
		}

		Ok(Self { descriptor, client_id, scope, redirect_uri, oauth_client, http_client })
	}

	/// Scopes requested on every login.
	pub fn scope(&self) -> &ScopeSet {
		&self.scope
	}

	async fn exchange_code(
		&self,
		session: &AuthorizationSession,
		code: String,
	) -> Result<ProviderToken> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.instrumented(meta.clone());
		let redirect_url = RedirectUrl::new(session.redirect_uri.to_string())
			.map_err(|source| ConfigError::InvalidRedirect { source })?;
		let response = self
			.oauth_client
			.exchange_code(AuthorizationCode::new(code))
			.set_pkce_verifier(PkceCodeVerifier::new(session.pkce_verifier().to_owned()))
			.set_redirect_uri(Cow::Owned(redirect_url))
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(meta.take(), err))?;

		Ok(ProviderToken::new(response.access_token().secret().to_owned()))
	}
}
impl IdentityProvider for OAuth2Provider {
	fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}

	fn start_session(&self) -> Result<AuthorizationSession> {
		Ok(AuthorizationSession::generate(
			&self.descriptor,
			&self.client_id,
			self.scope.clone(),
			self.redirect_uri.clone(),
		))
	}

	fn authenticate(
		&self,
		session: AuthorizationSession,
		code: String,
	) -> ProviderFuture<'_, Principal> {
		Box::pin(async move {
			let token = self.exchange_code(&session, code).await?;

			tracing::debug!(provider = %self.descriptor.id, "authorization code exchanged");

			let attributes = self
				.http_client
				.get_json_object(self.descriptor.endpoints.user_info.clone(), token.expose())
				.await?;

			Ok(Principal::new(attributes))
		})
	}
}
impl Debug for OAuth2Provider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2Provider")
			.field("descriptor", &self.descriptor)
			.field("client_id", &self.client_id)
			.field("scope", &self.scope)
			.field("redirect_uri", &self.redirect_uri)
			.finish()
	}
}

/// Provider error categories the service distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ProviderErrorKind {
	InvalidGrant,
	InvalidClient,
	Transient,
}

fn classify_oauth_error(code: &str) -> ProviderErrorKind {
	match code {
		"invalid_grant" | "bad_verification_code" | "access_denied" =>
			ProviderErrorKind::InvalidGrant,
		"invalid_client" | "unauthorized_client" | "incorrect_client_credentials" =>
			ProviderErrorKind::InvalidClient,
		_ => ProviderErrorKind::Transient,
	}
}

fn map_request_error(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
) -> Error {
	let status = meta.and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(&response, status),
		RequestTokenError::Request(error) => map_transport_error(error, status),
		// Some providers (GitHub among them) report OAuth errors with a 200 status.
		RequestTokenError::Parse(source, body) =>
			match serde_json::from_slice::<BasicErrorResponse>(&body) {
				Ok(response) => map_server_response_error(&response, status),
				Err(_) => TransientError::TokenResponseParse { source, status }.into(),
			},
		RequestTokenError::Other(message) => TransientError::ProviderEndpoint {
			message: format!("token endpoint returned an unexpected response: {message}"),
			status,
		}
		.into(),
	}
}

fn map_server_response_error(response: &BasicErrorResponse, status: Option<u16>) -> Error {
	let code: &str = response.error().as_ref();
	let message = match response.error_description() {
		Some(description) => format!("{code}: {description}"),
		None => code.to_owned(),
	};

	match classify_oauth_error(code) {
		ProviderErrorKind::InvalidGrant => Error::InvalidGrant { reason: message },
		ProviderErrorKind::InvalidClient => Error::InvalidClient { reason: message },
		ProviderErrorKind::Transient => TransientError::ProviderEndpoint { message, status }.into(),
	}
}

fn map_transport_error(err: HttpClientError<ReqwestError>, status: Option<u16>) -> Error {
	match err {
		HttpClientError::Reqwest(inner) => http::map_reqwest_error(*inner),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransientError::ProviderEndpoint {
			message: format!("HTTP client error while calling the token endpoint: {message}"),
			status,
		}
		.into(),
		_ => TransientError::ProviderEndpoint {
			message: "HTTP client error while calling the token endpoint".into(),
			status,
		}
		.into(),
	}
}
