//! Pending Authorization Code + PKCE handshakes.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	auth::{ClientId, ScopeSet},
	provider::ProviderDescriptor,
};

const STATE_LEN: usize = 32;
const PKCE_VERIFIER_LEN: usize = 64;

/// Supported PKCE challenge methods surfaced via [`AuthorizationSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PkceCodeChallengeMethod {
	/// SHA-256 based PKCE (RFC 7636 S256).
	S256,
}
impl PkceCodeChallengeMethod {
	/// Returns the RFC 7636 identifier for the challenge method.
	pub fn as_str(self) -> &'static str {
		match self {
			PkceCodeChallengeMethod::S256 => "S256",
		}
	}
}

/// Handshake metadata kept between the login redirect and the provider callback.
#[derive(Clone)]
pub struct AuthorizationSession {
	/// Requested scope set.
	pub scope: ScopeSet,
	/// Opaque state value that must round-trip via the callback.
	pub state: String,
	/// Callback URI supplied when constructing the authorize URL.
	pub redirect_uri: Url,
	/// Fully-formed authorize URL end-users are sent to.
	pub authorize_url: Url,
	/// Instant the session was generated.
	pub created_at: OffsetDateTime,
	pkce: PkcePair,
}
impl AuthorizationSession {
	/// Generates a session with a random state and a fresh S256 PKCE pair.
	pub fn generate(
		descriptor: &ProviderDescriptor,
		client_id: &ClientId,
		scope: ScopeSet,
		redirect_uri: Url,
	) -> Self {
		let state = random_string(STATE_LEN);
		let pkce = PkcePair::generate();
		let authorize_url =
			build_authorize_url(descriptor, client_id, &redirect_uri, &scope, &state, &pkce);

		Self {
			scope,
			state,
			redirect_uri,
			authorize_url,
			created_at: OffsetDateTime::now_utc(),
			pkce,
		}
	}

	/// PKCE code challenge derived from the secret verifier.
	pub fn code_challenge(&self) -> &str {
		&self.pkce.challenge
	}

	/// PKCE challenge method (currently always `S256`).
	pub fn code_challenge_method(&self) -> PkceCodeChallengeMethod {
		self.pkce.method
	}

	/// Secret PKCE verifier sent with the code exchange. Callers must avoid logging it.
	pub fn pkce_verifier(&self) -> &str {
		&self.pkce.verifier
	}

	/// Returns true once `ttl` has elapsed since the session was generated.
	pub fn is_expired_at(&self, now: OffsetDateTime, ttl: Duration) -> bool {
		now - self.created_at >= ttl
	}
}
impl Debug for AuthorizationSession {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationSession")
			.field("scope", &self.scope)
			.field("state", &self.state)
			.field("redirect_uri", &self.redirect_uri)
			.field("authorize_url", &self.authorize_url)
			.field("created_at", &self.created_at)
			.field("code_challenge", &self.pkce.challenge)
			.field("code_challenge_method", &self.pkce.method)
			.finish()
	}
}

#[derive(Clone)]
struct PkcePair {
	verifier: String,
	challenge: String,
	method: PkceCodeChallengeMethod,
}
impl PkcePair {
	fn generate() -> Self {
		let verifier = random_string(PKCE_VERIFIER_LEN);
		let challenge = compute_pkce_challenge(&verifier);

		Self { verifier, challenge, method: PkceCodeChallengeMethod::S256 }
	}
}

fn build_authorize_url(
	descriptor: &ProviderDescriptor,
	client_id: &ClientId,
	redirect_uri: &Url,
	scope: &ScopeSet,
	state: &str,
	pkce: &PkcePair,
) -> Url {
	let mut url = descriptor.endpoints.authorization.clone();
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("response_type", "code");
	pairs.append_pair("client_id", client_id);
	pairs.append_pair("redirect_uri", redirect_uri.as_str());

	if let Some(scope_value) = scope.joined(descriptor.scope_delimiter) {
		pairs.append_pair("scope", &scope_value);
	}

	pairs.append_pair("state", state);
	pairs.append_pair("code_challenge", &pkce.challenge);
	pairs.append_pair("code_challenge_method", pkce.method.as_str());

	drop(pairs);

	url
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

fn compute_pkce_challenge(verifier: &str) -> String {
	URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;
	use crate::auth::ProviderId;

	fn session() -> AuthorizationSession {
		let descriptor = ProviderDescriptor::builder(
			ProviderId::new("mock").expect("Provider fixture should be valid."),
		)
		.authorization_endpoint(
			Url::parse("https://idp.example.com/authorize?prompt=login")
				.expect("Authorization URL fixture should parse."),
		)
		.token_endpoint(
			Url::parse("https://idp.example.com/token").expect("Token URL fixture should parse."),
		)
		.user_info_endpoint(
			Url::parse("https://idp.example.com/user").expect("User URL fixture should parse."),
		)
		.build()
		.expect("Descriptor fixture should build.");

		AuthorizationSession::generate(
			&descriptor,
			&ClientId::new("client-1").expect("Client fixture should be valid."),
			ScopeSet::new(["user:email", "read:user"]).expect("Scope fixture should be valid."),
			Url::parse("http://localhost:8080/api/v1/auth/success")
				.expect("Redirect fixture should parse."),
		)
	}

	#[test]
	fn authorize_url_carries_handshake_parameters() {
		let session = session();
		let query = session.authorize_url.query_pairs().into_owned().collect::<HashMap<_, _>>();

		assert_eq!(query.get("prompt").map(String::as_str), Some("login"));
		assert_eq!(query.get("response_type").map(String::as_str), Some("code"));
		assert_eq!(query.get("client_id").map(String::as_str), Some("client-1"));
		assert_eq!(query.get("scope").map(String::as_str), Some("read:user user:email"));
		assert_eq!(query.get("state"), Some(&session.state));
		assert_eq!(query.get("code_challenge").map(String::as_str), Some(session.code_challenge()));
		assert_eq!(query.get("code_challenge_method").map(String::as_str), Some("S256"));
		assert_eq!(session.state.len(), STATE_LEN);
	}

	#[test]
	fn challenge_is_the_hashed_verifier() {
		let session = session();

		assert_eq!(session.pkce_verifier().len(), PKCE_VERIFIER_LEN);
		assert_eq!(session.code_challenge(), compute_pkce_challenge(session.pkce_verifier()));
		assert!(!format!("{session:?}").contains(session.pkce_verifier()));
	}

	#[test]
	fn rfc7636_reference_challenge() {
		assert_eq!(
			compute_pkce_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
			"E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
		);
	}

	#[test]
	fn expiry_starts_at_the_ttl() {
		let session = session();

		assert!(!session.is_expired_at(session.created_at + Duration::minutes(9), Duration::minutes(10)));
		assert!(session.is_expired_at(session.created_at + Duration::minutes(10), Duration::minutes(10)));
	}
}
