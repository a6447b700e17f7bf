//! Bearer-credential middleware for protected routes.

// crates.io
use axum::{
	extract::{Request, State},
	http::header::AUTHORIZATION,
	middleware::Next,
	response::Response,
};
// self
use crate::{
	_prelude::*,
	error::VerificationError,
	server::{ApiError, AppState},
};

/// Verifies `Authorization: Bearer <credential>` and exposes the result as a request extension.
pub(super) async fn require_bearer(
	State(state): State<AppState>,
	mut request: Request,
	next: Next,
) -> Result<Response, ApiError> {
	if !state.protect_employees {
		return Ok(next.run(request).await);
	}

	let header = request
		.headers()
		.get(AUTHORIZATION)
		.ok_or_else(|| VerificationError::malformed("missing Authorization header"))?;
	let token = header
		.to_str()
		.ok()
		.and_then(bearer_token)
		.ok_or_else(|| VerificationError::malformed("expected a Bearer credential"))?;
	let verified = state.issuer.verify(token)?;

	tracing::debug!(subject = %verified.subject, "bearer accepted");

	request.extensions_mut().insert(verified);

	Ok(next.run(request).await)
}

/// Extracts the credential from an `Authorization` value; the scheme is case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
	let (scheme, token) = value.trim_start().split_once(' ')?;
	let token = token.trim();

	(scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
