//! Login redirect, provider callback, and credential introspection handlers.

// crates.io
use axum::{
	Json,
	extract::{Query, State, rejection::JsonRejection},
	response::Redirect,
};
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{Claims, Credential},
	provider::Principal,
	server::{ApiError, AppState},
};

#[derive(Debug, Deserialize)]
pub(super) struct CallbackParams {
	code: Option<String>,
	state: Option<String>,
	error: Option<String>,
	error_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct LoginResponse {
	message: &'static str,
	jwt: Credential,
	user: Principal,
}

#[derive(Debug, Deserialize)]
pub(super) struct VerifyRequest {
	token: String,
}

#[derive(Debug, Serialize)]
pub(super) struct VerifyResponse {
	subject: String,
	claims: Claims,
	#[serde(with = "time::serde::timestamp")]
	issued_at: OffsetDateTime,
	#[serde(with = "time::serde::timestamp")]
	expires_at: OffsetDateTime,
}

pub(super) async fn login(State(state): State<AppState>) -> Result<Redirect, ApiError> {
	let session = state.login.begin()?;

	Ok(Redirect::to(session.authorize_url.as_str()))
}

pub(super) async fn success(
	State(state): State<AppState>,
	Query(params): Query<CallbackParams>,
) -> Result<Json<LoginResponse>, ApiError> {
	if let Some(error) = params.error {
		let reason = match params.error_description {
			Some(description) => format!("{error}: {description}"),
			None => error,
		};

		if let Some(login_state) = params.state.as_deref() {
			state.login.abandon(login_state);
		}

		return Err(Error::InvalidGrant { reason }.into());
	}

	let (Some(code), Some(login_state)) = (params.code, params.state) else {
		return Err(Error::Validation { reason: "callback requires `code` and `state`".into() }.into());
	};
	let principal = state.login.complete(&login_state, &code).await?;
	let (claims, subject) = login_claims(&principal);
	let jwt = state.issuer.issue(claims, &subject)?;

	tracing::info!(%subject, "login succeeded");

	Ok(Json(LoginResponse { message: "Login successful", jwt, user: principal }))
}

pub(super) async fn verify(
	State(state): State<AppState>,
	body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, ApiError> {
	let Json(VerifyRequest { token }) =
		body.map_err(|e| Error::Validation { reason: e.body_text() })?;
	let verified = state.issuer.verify(&token)?;

	Ok(Json(VerifyResponse {
		subject: verified.subject,
		claims: verified.claims,
		issued_at: verified.issued_at,
		expires_at: verified.expires_at,
	}))
}

/// Claims `{name, login}` (null when the provider omits them) and the `login` subject.
fn login_claims(principal: &Principal) -> (Claims, String) {
	let attribute = |key: &str| principal.attribute(key).cloned().unwrap_or(Value::Null);
	let claims = Claims::new().with("name", attribute("name")).with("login", attribute("login"));
	let subject = principal.attribute_str("login").unwrap_or_default().to_owned();

	(claims, subject)
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn claims_come_from_name_and_login() {
		let principal: Principal =
			serde_json::from_value(json!({ "login": "ada", "name": "Ada", "id": 1 }))
				.expect("Principal fixture should deserialize.");
		let (claims, subject) = login_claims(&principal);

		assert_eq!(subject, "ada");
		assert_eq!(claims, Claims::new().with("name", "Ada").with("login", "ada"));
	}

	#[test]
	fn missing_attributes_become_null_and_empty_subject() {
		let (claims, subject) = login_claims(&Principal::default());

		assert_eq!(subject, "");
		assert_eq!(claims.get("name"), Some(&Value::Null));
		assert_eq!(claims.get("login"), Some(&Value::Null));
	}
}
