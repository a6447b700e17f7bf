//! Provider descriptor data structures and presets.

/// Builder API for assembling provider descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, auth::ProviderId, error::ConfigError};

/// Preferred client authentication modes for token endpoint calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	#[default]
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
	/// Public clients that prove possession via PKCE only.
	NoneWithPkce,
}

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint end-users are redirected to.
	pub authorization: Url,
	/// Token endpoint used for the code exchange.
	pub token: Url,
	/// Endpoint returning the authenticated user's profile as a JSON object.
	pub user_info: Url,
}

/// Immutable provider descriptor consumed by the OAuth 2.0 adapter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Descriptor identifier.
	pub id: ProviderId,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Preferred client authentication mechanism.
	pub preferred_client_auth_method: ClientAuthMethod,
	/// Delimiter used when joining scopes in the authorize URL.
	pub scope_delimiter: char,
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}

	/// GitHub OAuth App preset.
	pub fn github() -> Result<Self, ConfigError> {
		let parse = |raw: &str| Url::parse(raw).map_err(|source| ConfigError::InvalidDescriptor { source });

		Ok(Self::builder(ProviderId::new("github")?)
			.authorization_endpoint(parse("https://github.com/login/oauth/authorize")?)
			.token_endpoint(parse("https://github.com/login/oauth/access_token")?)
			.user_info_endpoint(parse("https://api.github.com/user")?)
			.preferred_client_auth_method(ClientAuthMethod::ClientSecretPost)
			.build()?)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn github_preset_is_valid() {
		let descriptor = ProviderDescriptor::github().expect("GitHub preset should build.");

		assert_eq!(&*descriptor.id, "github");
		assert_eq!(descriptor.endpoints.user_info.as_str(), "https://api.github.com/user");
		assert_eq!(descriptor.preferred_client_auth_method, ClientAuthMethod::ClientSecretPost);
		assert_eq!(descriptor.scope_delimiter, ' ');
	}
}
