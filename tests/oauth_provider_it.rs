#![cfg(feature = "reqwest")]

mod common;

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use reqwest::StatusCode;
use serde_json::{Value, json};
// self
use common::{http_client, loopback_descriptor, spawn_app, test_http_client};
use oauth2_roster::{
	auth::{ClientId, ClientSecret, ScopeSet},
	error::{Error, TransientError},
	login::LoginBroker,
	oauth::OAuth2Provider,
	provider::Principal,
	url::Url,
};

const ACCESS_TOKEN: &str = "gho_mock_access";

fn provider(server: &MockServer) -> OAuth2Provider {
	OAuth2Provider::with_http_client(
		loopback_descriptor(&server.url("")),
		ClientId::new("Iv1.mock").expect("Client fixture should be valid."),
		Some(ClientSecret::new("mock-secret")),
		Url::parse("http://localhost:8080/api/v1/auth/success").expect("Redirect should parse."),
		ScopeSet::new(["read:user"]).expect("Scope fixture should be valid."),
		test_http_client(),
	)
	.expect("Provider should be configured against the mock server.")
}

async fn login(server: &MockServer) -> Result<Principal, Error> {
	let broker = LoginBroker::new(Arc::new(provider(server)));
	let session = broker.begin().expect("Login should start.");

	assert!(session.authorize_url.as_str().starts_with(&server.url("/authorize?")));

	broker.complete(&session.state, "mock-code").await
}

async fn mock_token_success(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"access_token\":\"{ACCESS_TOKEN}\",\"token_type\":\"bearer\",\"scope\":\"read:user\"}}"
			));
		})
		.await
}

#[tokio::test]
async fn code_exchange_then_profile_fetch_yields_principal() {
	let server = MockServer::start_async().await;
	let token = mock_token_success(&server).await;
	let user = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/user")
				.header("authorization", format!("Bearer {ACCESS_TOKEN}"));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"login\":\"octocat\",\"name\":\"The Octocat\",\"id\":583231}");
		})
		.await;
	let principal = login(&server).await.expect("Login should succeed.");

	assert_eq!(principal.attribute_str("login"), Some("octocat"));
	assert_eq!(principal.attribute_str("name"), Some("The Octocat"));
	assert_eq!(principal.attribute("id"), Some(&json!(583231)));

	token.assert_async().await;
	user.assert_async().await;
}

#[tokio::test]
async fn rejected_code_reported_with_ok_status_is_invalid_grant() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"error\":\"bad_verification_code\",\"error_description\":\"The code passed is incorrect or expired.\"}",
			);
		})
		.await;
	let err = login(&server).await.expect_err("Bad code must be rejected.");

	assert!(
		matches!(&err, Error::InvalidGrant { reason } if reason.starts_with("bad_verification_code")),
		"Unexpected error: {err:?}."
	);

	token.assert_async().await;
}

#[tokio::test]
async fn client_authentication_failure_is_invalid_client() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_client\"}");
		})
		.await;
	let err = login(&server).await.expect_err("Client failure must surface.");

	assert!(matches!(err, Error::InvalidClient { .. }), "Unexpected error: {err:?}.");

	token.assert_async().await;
}

#[tokio::test]
async fn profile_endpoint_failures_are_transient() {
	let server = MockServer::start_async().await;
	let _token = mock_token_success(&server).await;
	let user = server
		.mock_async(|when, then| {
			when.method(GET).path("/user");
			then.status(500);
		})
		.await;
	let err = login(&server).await.expect_err("Server error must surface.");

	assert!(
		matches!(err, Error::Transient(TransientError::ProviderEndpoint { status: Some(500), .. })),
		"Unexpected error: {err:?}."
	);

	user.delete_async().await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/user");
			then.status(200).header("content-type", "application/json").body("[1, 2, 3]");
		})
		.await;

	let err = login(&server).await.expect_err("Non-object profile must be rejected.");

	assert!(
		matches!(err, Error::Transient(TransientError::ProfileParse { .. })),
		"Unexpected error: {err:?}."
	);
}

#[tokio::test]
async fn http_login_against_mock_provider_mints_a_credential() {
	let server = MockServer::start_async().await;
	let _token = mock_token_success(&server).await;
	let _user = server
		.mock_async(|when, then| {
			when.method(GET).path("/user");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"login\":\"octocat\",\"name\":null,\"id\":1}");
		})
		.await;
	let app = spawn_app(provider(&server), true).await;
	let client = http_client();
	let response = client
		.get(format!("{}/api/v1/auth/login", app.base))
		.send()
		.await
		.expect("Login request should complete.");
	let location = response
		.headers()
		.get("location")
		.and_then(|value| value.to_str().ok())
		.map(ToOwned::to_owned)
		.expect("Redirect should carry a Location header.");
	let state = Url::parse(&location)
		.expect("Location should be absolute.")
		.query_pairs()
		.find_map(|(key, value)| (key == "state").then(|| value.into_owned()))
		.expect("Authorize URL should carry a state.");
	let response = client
		.get(format!("{}/api/v1/auth/success", app.base))
		.query(&[("code", "mock-code"), ("state", state.as_str())])
		.send()
		.await
		.expect("Callback request should complete.");

	assert_eq!(response.status(), StatusCode::OK);

	let body: Value = response.json().await.expect("Callback should answer with JSON.");
	let verified = app
		.issuer
		.verify(body["jwt"].as_str().expect("`jwt` should be a string."))
		.expect("Minted credential should verify.");

	assert_eq!(verified.subject, "octocat");
	assert_eq!(verified.claims.get("name"), Some(&Value::Null));
}
