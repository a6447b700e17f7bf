//! Service-level error types shared across the issuer, login flow, store, and HTTP layer.

// self
use crate::_prelude::*;

/// Service-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Credential could not be signed.
	#[error(transparent)]
	Signing(#[from] SigningError),
	/// Credential was rejected during verification.
	#[error(transparent)]
	Verification(#[from] VerificationError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Provider rejected the grant, or the login state is unknown.
	#[error("Provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider- or service-supplied reason string.
		reason: String,
	},
	/// Client authentication against the provider failed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider- or service-supplied reason string.
		reason: String,
	},
	/// Caller input could not be accepted.
	#[error("Request is invalid: {reason}.")]
	Validation {
		/// Human-readable description of the problem.
		reason: String,
	},
}

/// Configuration and validation failures raised while wiring the service.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Layered configuration sources could not be merged or deserialized.
	#[error("Configuration could not be loaded.")]
	Load {
		/// Underlying loader failure.
		#[source]
		source: config::ConfigError,
	},
	/// A configuration value is out of range or malformed.
	#[error("Configuration key `{key}` is invalid: {reason}.")]
	InvalidValue {
		/// Dotted configuration key.
		key: &'static str,
		/// Human-readable description of the problem.
		reason: String,
	},
	/// The global tracing subscriber could not be installed.
	#[error("Tracing subscriber could not be installed: {reason}.")]
	TracingInit {
		/// Human-readable description of the problem.
		reason: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Provider descriptor contains an invalid URL.
	#[error("Descriptor contains an invalid URL.")]
	InvalidDescriptor {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Provider descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::ProviderDescriptorError),
	/// Redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Requested scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Identifier validation failed.
	#[error("Identifier is invalid.")]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Builds an [`ConfigError::InvalidValue`] for the provided key.
	pub fn invalid_value(key: &'static str, reason: impl Into<String>) -> Self {
		Self::InvalidValue { key, reason: reason.into() }
	}
}
impl From<config::ConfigError> for ConfigError {
	fn from(source: config::ConfigError) -> Self {
		Self::Load { source }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised while minting a credential.
#[derive(Debug, ThisError)]
pub enum SigningError {
	/// The HMAC key is empty and cannot authenticate anything.
	#[error("Signing secret must not be empty.")]
	EmptySecret,
	/// The JWS encoder rejected the header, payload, or key.
	#[error("Credential could not be signed.")]
	Encode {
		/// Underlying encoder failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
}

/// Reasons a presented credential is not accepted.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum VerificationError {
	/// The credential is not a well-formed HS256 token carrying the reserved fields.
	#[error("Credential is malformed: {reason}.")]
	Malformed {
		/// Human-readable description of the defect.
		reason: String,
	},
	/// The signature does not match the configured secret.
	#[error("Credential signature is invalid.")]
	BadSignature,
	/// The credential's validity window has elapsed.
	#[error("Credential expired at {expired_at}.")]
	Expired {
		/// Expiry instant carried in the `exp` field.
		expired_at: OffsetDateTime,
	},
}
impl VerificationError {
	/// Convenience constructor for [`VerificationError::Malformed`].
	pub fn malformed(reason: impl Into<String>) -> Self {
		Self::Malformed { reason: reason.into() }
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Provider returned an unexpected but non-fatal response.
	#[error("Identity provider returned an unexpected response: {message}.")]
	ProviderEndpoint {
		/// Provider- or service-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// User-info endpoint responded with a body that is not a JSON object.
	#[error("User-info endpoint returned a malformed profile.")]
	ProfileParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the identity provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport or while serving.
	#[error("I/O error occurred.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
