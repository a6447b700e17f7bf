//! Caller-supplied claim maps embedded into credentials.

// crates.io
use serde_json::{Map, Value};
// self
use crate::_prelude::*;

/// Payload key carrying the credential subject.
pub const SUBJECT: &str = "sub";
/// Payload key carrying the issued-at instant (seconds since the Unix epoch).
pub const ISSUED_AT: &str = "iat";
/// Payload key carrying the expiry instant (seconds since the Unix epoch).
pub const EXPIRATION: &str = "exp";
/// Keys owned by the issuer; caller claims with these names are overwritten.
pub const RESERVED: [&str; 3] = [SUBJECT, ISSUED_AT, EXPIRATION];

/// Arbitrary key/value data describing a principal.
///
/// Keys are kept sorted so two maps with the same entries always serialize to the same bytes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(BTreeMap<String, Value>);
impl Claims {
	/// Creates an empty claim map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a claim, returning the previous value for the key.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.0.insert(key.into(), value.into())
	}

	/// Builder-style variant of [`Claims::insert`].
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(key, value);

		self
	}

	/// Returns the value stored for `key`.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Returns the value stored for `key` when it is a JSON string.
	pub fn get_str(&self, key: &str) -> Option<&str> {
		self.get(key).and_then(Value::as_str)
	}

	/// Removes and returns the value stored for `key`.
	pub fn remove(&mut self, key: &str) -> Option<Value> {
		self.0.remove(key)
	}

	/// Number of claims.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when the map holds no claims.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterator over claims in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub(crate) fn into_payload(self) -> Map<String, Value> {
		self.0.into_iter().collect()
	}

	pub(crate) fn from_payload(payload: Map<String, Value>) -> Self {
		Self(payload.into_iter().filter(|(k, _)| !RESERVED.contains(&k.as_str())).collect())
	}
}
impl<K, V> FromIterator<(K, V)> for Claims
where
	K: Into<String>,
	V: Into<Value>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn payload_conversion_drops_reserved_keys() {
		let mut payload = Map::new();

		payload.insert("name".into(), json!("Ada"));
		payload.insert(SUBJECT.into(), json!("ada"));
		payload.insert(ISSUED_AT.into(), json!(1));
		payload.insert(EXPIRATION.into(), json!(2));

		let claims = Claims::from_payload(payload);

		assert_eq!(claims.len(), 1);
		assert_eq!(claims.get_str("name"), Some("Ada"));
	}

	#[test]
	fn claims_serialize_in_key_order() {
		let claims = Claims::new().with("login", "ada").with("name", "Ada").with("admin", false);

		assert_eq!(
			serde_json::to_string(&claims).expect("Claims should serialize."),
			"{\"admin\":false,\"login\":\"ada\",\"name\":\"Ada\"}"
		);
	}
}
