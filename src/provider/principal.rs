//! Authenticated end-user profile returned by the identity provider.

// crates.io
use serde_json::{Map, Value};
// self
use crate::_prelude::*;

/// Attribute map describing the user who completed a login.
///
/// Attributes are kept exactly as the provider's user-info endpoint returned them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(Map<String, Value>);
impl Principal {
	/// Wraps a provider attribute map.
	pub fn new(attributes: Map<String, Value>) -> Self {
		Self(attributes)
	}

	/// Returns the attribute stored under `key`.
	pub fn attribute(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Returns the attribute stored under `key` when it is a JSON string.
	pub fn attribute_str(&self, key: &str) -> Option<&str> {
		self.attribute(key).and_then(Value::as_str)
	}

	/// Borrows every attribute.
	pub fn attributes(&self) -> &Map<String, Value> {
		&self.0
	}

	/// Consumes the principal and returns its attributes.
	pub fn into_attributes(self) -> Map<String, Value> {
		self.0
	}
}
impl FromIterator<(String, Value)> for Principal {
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (String, Value)>,
	{
		Self(iter.into_iter().collect())
	}
}
