//! Mapping from service errors to HTTP responses.

// crates.io
use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde_json::json;
// self
use crate::{_prelude::*, store::StoreError};

/// Handler error rendered as a JSON body with the matching status code.
#[derive(Debug)]
pub struct ApiError(pub Error);
impl ApiError {
	/// Status code the wrapped error is reported with.
	pub fn status(&self) -> StatusCode {
		match &self.0 {
			Error::Storage(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
			Error::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
			Error::Verification(_) | Error::InvalidGrant { .. } => StatusCode::UNAUTHORIZED,
			Error::InvalidClient { .. } | Error::Transient(_) | Error::Transport(_) =>
				StatusCode::BAD_GATEWAY,
			Error::Storage(StoreError::IdSpaceExhausted) | Error::Signing(_) | Error::Config(_) =>
				StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}
impl<E> From<E> for ApiError
where
	E: Into<Error>,
{
	fn from(e: E) -> Self {
		Self(e.into())
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status();

		if status.is_server_error() {
			tracing::warn!(%status, error = %self.0, "request failed");
		} else {
			tracing::info!(%status, error = %self.0, "request rejected");
		}

		let body = match &self.0 {
			Error::Storage(StoreError::NotFound { .. }) => json!({ "error": "Employee not found" }),
			// Internal failures keep their details in the log only.
			_ if status == StatusCode::INTERNAL_SERVER_ERROR => json!({
				"error": status.canonical_reason().unwrap_or("Error"),
				"message": "Internal server error.",
			}),
			e => json!({
				"error": status.canonical_reason().unwrap_or("Error"),
				"message": e.to_string(),
			}),
		};
		let mut response = (status, Json(body)).into_response();

		if status == StatusCode::UNAUTHORIZED {
			response
				.headers_mut()
				.insert(axum::http::header::WWW_AUTHENTICATE, axum::http::HeaderValue::from_static("Bearer"));
		}

		response
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::{ConfigError, VerificationError};

	#[test]
	fn statuses_follow_the_error_taxonomy() {
		assert_eq!(ApiError::from(StoreError::NotFound { id: 3 }).status(), StatusCode::NOT_FOUND);
		assert_eq!(
			ApiError::from(VerificationError::BadSignature).status(),
			StatusCode::UNAUTHORIZED
		);
		assert_eq!(
			ApiError::from(Error::InvalidClient { reason: "bad secret".into() }).status(),
			StatusCode::BAD_GATEWAY
		);
		assert_eq!(
			ApiError::from(Error::Validation { reason: "missing name".into() }).status(),
			StatusCode::UNPROCESSABLE_ENTITY
		);
		assert_eq!(
			ApiError::from(ConfigError::invalid_value("bind_addr", "bad")).status(),
			StatusCode::INTERNAL_SERVER_ERROR
		);
	}

	#[test]
	fn unauthorized_responses_carry_a_challenge() {
		let response = ApiError::from(VerificationError::BadSignature).into_response();

		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
		assert_eq!(
			response.headers().get(axum::http::header::WWW_AUTHENTICATE).map(|v| v.as_bytes()),
			Some(&b"Bearer"[..])
		);
	}
}
