//! Signed credential strings and the data recovered from them after verification.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, auth::Claims, error::VerificationError};

/// Compact `header.payload.signature` token minted by the issuer.
///
/// The string is a bearer credential, so `Debug` and `Display` never print it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);
impl Credential {
	/// Wraps an encoded token string without checking it.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the encoded token. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Consumes the credential and returns the encoded token.
	pub fn into_string(self) -> String {
		self.0
	}

	/// Decodes the payload segment without checking the signature.
	///
	/// Useful for diagnostics only; trust nothing returned here until
	/// [`TokenIssuer::verify`](crate::issuer::TokenIssuer::verify) accepts the credential.
	pub fn peek_payload(&self) -> Result<Map<String, Value>, VerificationError> {
		let segments = self.0.split('.').collect::<Vec<_>>();

		if segments.len() != 3 {
			return Err(VerificationError::malformed(format!(
				"expected 3 segments, found {}",
				segments.len()
			)));
		}

		let bytes = URL_SAFE_NO_PAD
			.decode(segments[1])
			.map_err(|e| VerificationError::malformed(format!("payload is not base64url: {e}")))?;

		serde_json::from_slice(&bytes)
			.map_err(|e| VerificationError::malformed(format!("payload is not a JSON object: {e}")))
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Credential").field(&"<redacted>").finish()
	}
}
impl Display for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Contents of a credential that passed signature and expiry checks.
#[derive(Clone, Debug, PartialEq)]
pub struct VerifiedCredential {
	/// Subject the credential was issued for (may be empty).
	pub subject: String,
	/// Caller claims with the reserved fields removed.
	pub claims: Claims,
	/// Issued-at instant.
	pub issued_at: OffsetDateTime,
	/// Expiry instant; the credential is rejected from this instant on.
	pub expires_at: OffsetDateTime,
}
impl VerifiedCredential {
	/// Remaining validity at `instant`, clamped to zero.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - instant;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}
}
