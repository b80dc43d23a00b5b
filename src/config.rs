//! Executor configuration loaded from programmatic defaults and `SSE_*` environment variables.
//!
//! Precedence, lowest to highest:
//!
//! 1. [`ClientConfig::default`]
//! 2. `SSE_*` environment variables (`SSE_CLIENT_ID`, `SSE_TIMEOUT_SECS`, ...)
//! 3. `SSE_CLIENT_KEY`, which replaces `SSE_CLIENT_ID` when both are set
//!
//! Variables that are set but empty are skipped, so they leave the lower layer in place.

// crates.io
use figment::{
	Figment,
	providers::{Env, Serialized},
	value::UncasedStr,
};
// self
use crate::{
	_prelude::*,
	api::DEFAULT_API_BASE,
	auth::{Credential, ScopeList, Secret},
	error::ConfigError,
	http::DEFAULT_TIMEOUT,
};

/// Prefix shared by every environment variable read by [`ClientConfig::load`].
pub const ENV_PREFIX: &str = "SSE_";
/// Token endpoint used when none is configured.
pub const DEFAULT_TOKEN_URL: &str = "https://api.sse.cisco.com/auth/v2/token";
/// Region used by regional scopes when none is configured.
pub const DEFAULT_REGION: &str = "us";
/// Scopes requested when none are configured.
pub const DEFAULT_SCOPES: &[&str] = &[
	"policies.destinationlists:read",
	"policies.destinationlists:write",
	"policies.objects.networkObjects:read",
	"policies.objects.networkObjects:write",
	"policies.securityProfiles:read",
	"policies.objects.serviceObjects:read",
	"policies.objects.serviceObjects:write",
	"policies.rules:read",
	"policies.rules:write",
	"policies.privateresources:read",
	"policies.privateresources:write",
	"policies.privateresourcegroups:read",
	"policies.privateresourcegroups:write",
	"deployments.privateresources:read",
	"deployments.privateresources:write",
	"deployments.identities:read",
	"deployments.networktunnelgroups:read",
	"reports.utilities:read",
	"admin.users:read",
	"deployments.roamingcomputers:read",
];

/// Settings needed to build a [`ReqwestExecutor`](crate::executor::ReqwestExecutor).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: Secret,
	/// Token endpoint URL.
	pub token_url: String,
	/// Region for regional scopes; empty or absent disables the regional segment.
	pub region: Option<String>,
	/// Origin that relative request paths are resolved against.
	pub api_base: String,
	/// Per-request timeout in seconds.
	pub timeout_secs: u64,
	/// Scopes requested with every token.
	pub scopes: ScopeList,
}
impl ClientConfig {
	/// Loads the configuration from the defaults and the process environment.
	pub fn load() -> Result<Self, ConfigError> {
		Self::from_figment(&Self::figment())
	}

	/// Figment layering the defaults under the `SSE_*` environment variables.
	pub fn figment() -> Figment {
		Figment::new()
			.merge(Serialized::defaults(Self::default()))
			.merge(Env::prefixed(ENV_PREFIX).filter(is_set).ignore(&["client_key"]))
			.merge(
				Env::prefixed(ENV_PREFIX)
					.filter(is_set)
					.only(&["client_key"])
					.map(|_| "client_id".into()),
			)
	}

	/// Extracts and validates a configuration from any figment.
	pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
		let config = figment.extract::<Self>()?;

		config.validate()?;

		Ok(config)
	}

	/// Checks that the credential fields are set and the URLs and timeout are usable.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.client_id.is_empty() {
			return Err(ConfigError::MissingField { field: "client_id" });
		}
		if self.client_secret.is_empty() {
			return Err(ConfigError::MissingField { field: "client_secret" });
		}
		if self.timeout_secs == 0 {
			return Err(ConfigError::NonPositiveTimeout);
		}

		parse_url("token_url", &self.token_url)?;
		parse_url("api_base", &self.api_base)?;

		Ok(())
	}

	/// Per-request timeout.
	pub fn timeout(&self) -> StdDuration {
		StdDuration::from_secs(self.timeout_secs)
	}

	/// Builds the credential presented to the token endpoint.
	pub fn credential(&self) -> Result<Credential, ConfigError> {
		Credential::new(
			parse_url("token_url", &self.token_url)?,
			self.client_id.as_str(),
			self.client_secret.expose(),
			self.scopes.clone(),
		)
	}

	/// Parsed API origin.
	pub fn api_base_url(&self) -> Result<Url, ConfigError> {
		parse_url("api_base", &self.api_base)
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			client_id: String::new(),
			client_secret: Secret::default(),
			token_url: DEFAULT_TOKEN_URL.into(),
			region: Some(DEFAULT_REGION.into()),
			api_base: DEFAULT_API_BASE.into(),
			timeout_secs: DEFAULT_TIMEOUT.as_secs(),
			scopes: ScopeList::new(DEFAULT_SCOPES.iter().copied()).unwrap_or_default(),
		}
	}
}

fn is_set(key: &UncasedStr) -> bool {
	Env::var(&format!("{ENV_PREFIX}{key}")).is_some_and(|value| !value.is_empty())
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
	if raw.is_empty() {
		return Err(ConfigError::MissingField { field });
	}

	Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { field, source })
}

#[cfg(test)]
mod tests {
	// crates.io
	use figment::Jail;
	// self
	use super::*;

	#[test]
	fn defaults_match_the_public_endpoint() {
		let config = ClientConfig::default();

		assert_eq!(config.token_url, DEFAULT_TOKEN_URL);
		assert_eq!(config.region.as_deref(), Some("us"));
		assert_eq!(config.timeout(), StdDuration::from_secs(30));
		assert_eq!(config.scopes.len(), DEFAULT_SCOPES.len());
		assert!(config.scopes.contains("deployments.roamingcomputers:read"));
		assert!(matches!(
			config.validate(),
			Err(ConfigError::MissingField { field: "client_id" })
		));
	}

	#[test]
	fn environment_overrides_defaults() {
		Jail::expect_with(|jail| {
			jail.set_env("SSE_CLIENT_ID", "abc");
			jail.set_env("SSE_CLIENT_SECRET", "xyz");
			jail.set_env("SSE_REGION", "eu");
			jail.set_env("SSE_TIMEOUT_SECS", "5");
			jail.set_env("SSE_SCOPES", "policies.rules:read admin.users:read");

			let config = ClientConfig::load().expect("Environment config should load.");

			assert_eq!(config.client_id, "abc");
			assert_eq!(config.client_secret.expose(), "xyz");
			assert_eq!(config.region.as_deref(), Some("eu"));
			assert_eq!(config.timeout(), StdDuration::from_secs(5));
			assert_eq!(
				config.scopes.iter().collect::<Vec<_>>(),
				vec!["policies.rules:read", "admin.users:read"]
			);
			assert_eq!(config.token_url, DEFAULT_TOKEN_URL);

			Ok(())
		});
	}

	#[test]
	fn client_key_wins_over_client_id() {
		Jail::expect_with(|jail| {
			jail.set_env("SSE_CLIENT_ID", "from-id");
			jail.set_env("SSE_CLIENT_KEY", "from-key");
			jail.set_env("SSE_CLIENT_SECRET", "xyz");

			let config = ClientConfig::load().expect("Environment config should load.");

			assert_eq!(config.client_id, "from-key");

			Ok(())
		});
	}

	#[test]
	fn empty_variables_keep_lower_layers() {
		Jail::expect_with(|jail| {
			jail.set_env("SSE_CLIENT_ID", "abc");
			jail.set_env("SSE_CLIENT_KEY", "");
			jail.set_env("SSE_CLIENT_SECRET", "xyz");
			jail.set_env("SSE_REGION", "");
			jail.set_env("SSE_TOKEN_URL", "");

			let config = ClientConfig::load().expect("Empty variables should fall back.");

			assert_eq!(config.client_id, "abc");
			assert_eq!(config.region.as_deref(), Some(DEFAULT_REGION));
			assert_eq!(config.token_url, DEFAULT_TOKEN_URL);

			Ok(())
		});
	}

	#[test]
	fn empty_client_key_falls_back_to_client_id() {
		Jail::expect_with(|jail| {
			jail.set_env("SSE_CLIENT_ID", "abc");
			jail.set_env("SSE_CLIENT_KEY", "");
			jail.set_env("SSE_CLIENT_SECRET", "xyz");

			let config = ClientConfig::load().expect("Client id should survive an empty key.");

			assert_eq!(config.client_id, "abc");
			assert_eq!(config.credential().expect("Credential should build.").client_id, "abc");

			Ok(())
		});
	}

	#[test]
	fn missing_secret_is_rejected() {
		Jail::expect_with(|jail| {
			jail.set_env("SSE_CLIENT_KEY", "abc");

			let err = ClientConfig::load().expect_err("A missing secret must fail validation.");

			assert!(matches!(err, ConfigError::MissingField { field: "client_secret" }));

			Ok(())
		});
	}

	#[test]
	fn validation_rejects_bad_urls_and_timeouts() {
		let base = ClientConfig {
			client_id: "abc".into(),
			client_secret: Secret::new("xyz"),
			..ClientConfig::default()
		};

		assert!(base.validate().is_ok());
		assert!(matches!(
			ClientConfig { token_url: String::new(), ..base.clone() }.validate(),
			Err(ConfigError::MissingField { field: "token_url" })
		));
		assert!(matches!(
			ClientConfig { api_base: "not a url".into(), ..base.clone() }.validate(),
			Err(ConfigError::InvalidUrl { field: "api_base", .. })
		));
		assert!(matches!(
			ClientConfig { timeout_secs: 0, ..base.clone() }.validate(),
			Err(ConfigError::NonPositiveTimeout)
		));

		let credential = base.credential().expect("Credential should build.");

		assert_eq!(credential.token_url.as_str(), DEFAULT_TOKEN_URL);
		assert_eq!(credential.client_id, "abc");
	}
}
