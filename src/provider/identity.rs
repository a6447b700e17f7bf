//! Identity-provider contract driven by the login broker.

// self
use crate::{
	_prelude::*,
	login::AuthorizationSession,
	provider::{Principal, ProviderDescriptor},
};

/// Boxed future returned by [`IdentityProvider::authenticate`].
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Third-party login performed through an Authorization Code + PKCE handshake.
///
/// Implementations must be `Send + Sync` so a single instance can back every request the
/// HTTP surface serves.
pub trait IdentityProvider
where
	Self: Send + Sync,
{
	/// Descriptor of the provider being driven.
	fn descriptor(&self) -> &ProviderDescriptor;

	/// Generates a fresh session (state, PKCE pair, authorize URL).
	fn start_session(&self) -> Result<AuthorizationSession>;

	/// Exchanges `code` for an access token and resolves the user's profile.
	///
	/// The session has already been matched against the callback's `state`.
	fn authenticate(
		&self,
		session: AuthorizationSession,
		code: String,
	) -> ProviderFuture<'_, Principal>;
}
