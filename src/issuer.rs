//! HS256 credential issuance and verification.
//!
//! [`TokenIssuer::issue_at`] and [`TokenIssuer::verify_at`] are pure functions of their inputs
//! and the [`SecurityContext`]; the clock-reading variants only stamp the current instant.
//! Payloads carry the caller's claims plus the reserved `sub`, `iat`, and `exp` fields, with
//! timestamps in whole seconds since the Unix epoch.

// crates.io
use jsonwebtoken::{
	Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::Error as JwtError,
	errors::ErrorKind,
};
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	auth::{
		Claims, Credential, SigningSecret, VerifiedCredential,
		claims::{EXPIRATION, ISSUED_AT, SUBJECT},
	},
	error::{SigningError, VerificationError},
	obs::{self, FlowKind, FlowOutcome},
};

/// Validity window applied when none is configured.
pub const DEFAULT_VALIDITY: Duration = Duration::hours(1);
/// Longest validity window a context accepts.
pub const MAX_VALIDITY: Duration = Duration::days(365);

/// Signing key plus validity window, constructed once at start-up and shared by reference.
#[derive(Clone, Debug)]
pub struct SecurityContext {
	secret: SigningSecret,
	validity: Duration,
}
impl SecurityContext {
	/// Creates a context with the [`DEFAULT_VALIDITY`] window.
	pub fn new(secret: impl Into<SigningSecret>) -> Result<Self, SigningError> {
		let secret = secret.into();

		if secret.is_empty() {
			return Err(SigningError::EmptySecret);
		}

		Ok(Self { secret, validity: DEFAULT_VALIDITY })
	}

	/// Overrides the validity window, clamped to between one second and [`MAX_VALIDITY`].
	pub fn with_validity(mut self, validity: Duration) -> Self {
		self.validity = validity.clamp(Duration::SECOND, MAX_VALIDITY);

		self
	}

	/// Returns the validity window.
	pub fn validity(&self) -> Duration {
		self.validity
	}

	/// Returns the signing secret.
	pub fn secret(&self) -> &SigningSecret {
		&self.secret
	}
}

/// Mints and checks credentials for a single [`SecurityContext`].
#[derive(Clone)]
pub struct TokenIssuer {
	context: SecurityContext,
	encoding: EncodingKey,
	decoding: DecodingKey,
	validation: Validation,
}
impl TokenIssuer {
	/// Prepares HMAC keys for the provided context.
	pub fn new(context: SecurityContext) -> Self {
		let encoding = EncodingKey::from_secret(context.secret.expose());
		let decoding = DecodingKey::from_secret(context.secret.expose());
		let mut validation = Validation::new(Algorithm::HS256);

		// Reserved fields and expiry are checked against the caller's clock in `verify_at`.
		validation.validate_exp = false;
		validation.validate_aud = false;
		validation.leeway = 0;
		validation.required_spec_claims.clear();

		Self { context, encoding, decoding, validation }
	}

	/// Returns the context the issuer was built from.
	pub fn context(&self) -> &SecurityContext {
		&self.context
	}

	/// Signs `claims` for `subject`, stamping the current UTC instant.
	pub fn issue(&self, claims: Claims, subject: &str) -> Result<Credential, SigningError> {
		const KIND: FlowKind = FlowKind::Issue;

		let _span = obs::flow_span(KIND, "issue").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.issue_at(claims, subject, OffsetDateTime::now_utc());

		match &result {
			Ok(_) => {
				tracing::debug!(%subject, "credential issued");
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
			},
			Err(e) => {
				tracing::warn!(error = %e, "credential issuance failed");
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
		}

		result
	}

	/// Signs `claims` for `subject` as if issued at `now`.
	///
	/// Identical inputs within the same second produce byte-identical credentials.
	pub fn issue_at(
		&self,
		claims: Claims,
		subject: &str,
		now: OffsetDateTime,
	) -> Result<Credential, SigningError> {
		let issued_at = now.unix_timestamp();
		let expires_at = issued_at.saturating_add(self.context.validity.whole_seconds());
		let mut payload = claims.into_payload();

		payload.insert(SUBJECT.into(), Value::from(subject));
		payload.insert(ISSUED_AT.into(), Value::from(issued_at));
		payload.insert(EXPIRATION.into(), Value::from(expires_at));

		jsonwebtoken::encode(&Header::default(), &payload, &self.encoding)
			.map(Credential::new)
			.map_err(|source| SigningError::Encode { source })
	}

	/// Checks `token` against the current UTC instant.
	pub fn verify(&self, token: &str) -> Result<VerifiedCredential, VerificationError> {
		const KIND: FlowKind = FlowKind::Verify;

		let _span = obs::flow_span(KIND, "verify").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.verify_at(token, OffsetDateTime::now_utc());

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(e) => {
				tracing::info!(error = %e, "credential rejected");
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
		}

		result
	}

	/// Checks the signature of `token`, then rejects it if `now` is at or past its expiry.
	pub fn verify_at(
		&self,
		token: &str,
		now: OffsetDateTime,
	) -> Result<VerifiedCredential, VerificationError> {
		let payload = jsonwebtoken::decode::<Map<String, Value>>(token, &self.decoding, &self.validation)
			.map_err(map_decode_error)?
			.claims;
		let subject = match payload.get(SUBJECT) {
			Some(Value::String(subject)) => subject.to_owned(),
			Some(_) => return Err(VerificationError::malformed("`sub` is not a string")),
			None => return Err(VerificationError::malformed("`sub` is missing")),
		};
		let issued_at = read_instant(&payload, ISSUED_AT)?;
		let expires_at = read_instant(&payload, EXPIRATION)?;

		if now >= expires_at {
			return Err(VerificationError::Expired { expired_at: expires_at });
		}

		Ok(VerifiedCredential {
			subject,
			claims: Claims::from_payload(payload),
			issued_at,
			expires_at,
		})
	}
}
impl Debug for TokenIssuer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenIssuer").field("context", &self.context).finish()
	}
}

fn read_instant(
	payload: &Map<String, Value>,
	key: &'static str,
) -> Result<OffsetDateTime, VerificationError> {
	let secs = payload
		.get(key)
		.ok_or_else(|| VerificationError::malformed(format!("`{key}` is missing")))?
		.as_i64()
		.ok_or_else(|| VerificationError::malformed(format!("`{key}` is not an integer")))?;

	OffsetDateTime::from_unix_timestamp(secs)
		.map_err(|_| VerificationError::malformed(format!("`{key}` is out of range")))
}

fn map_decode_error(err: JwtError) -> VerificationError {
	match err.kind() {
		ErrorKind::InvalidSignature => VerificationError::BadSignature,
		_ => VerificationError::malformed(err.to_string()),
	}
}
