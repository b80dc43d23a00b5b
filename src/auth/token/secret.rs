//! Redacted strings for client secrets and bearer tokens.

// self
use crate::_prelude::*;

/// String whose formatters never print the value.
///
/// Client secrets and bearer tokens both travel in this type, so formatting a credential, a
/// config, or a cached token shows `<redacted>` in place of the secret. Only [`Secret::expose`]
/// hands out the raw value.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);
impl Secret {
	/// Wraps `value`.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Raw value, for building request headers and form bodies.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when no value is set.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl From<String> for Secret {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<&str> for Secret {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Secret(<redacted>)")
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
