//! Immutable client credentials used for the `client_credentials` grant.

// self
use crate::{
	_prelude::*,
	auth::{ScopeList, Secret},
	error::ConfigError,
};

/// Client identity presented to the token endpoint.
///
/// Built once when the executor is constructed and shared read-only afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
	/// Token endpoint receiving the `client_credentials` grant.
	pub token_url: Url,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: Secret,
	/// Scopes requested with every token.
	pub scopes: ScopeList,
}
impl Credential {
	/// Creates a credential, rejecting empty identifiers or secrets.
	pub fn new(
		token_url: Url,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		scopes: ScopeList,
	) -> Result<Self, ConfigError> {
		let client_id = client_id.into();
		let client_secret = Secret::new(client_secret);

		if client_id.is_empty() {
			return Err(ConfigError::MissingField { field: "client_id" });
		}
		if client_secret.is_empty() {
			return Err(ConfigError::MissingField { field: "client_secret" });
		}

		Ok(Self { token_url, client_id, client_secret, scopes })
	}

	/// Parses `token_url` before delegating to [`Credential::new`].
	pub fn parse(
		token_url: &str,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		scopes: ScopeList,
	) -> Result<Self, ConfigError> {
		if token_url.is_empty() {
			return Err(ConfigError::MissingField { field: "token_url" });
		}

		let token_url = Url::parse(token_url)
			.map_err(|source| ConfigError::InvalidUrl { field: "token_url", source })?;

		Self::new(token_url, client_id, client_secret, scopes)
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("token_url", &self.token_url.as_str())
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("scopes", &self.scopes)
			.finish()
	}
}
