//! The authenticated request executor.

pub mod retry;
pub mod token_cache;

mod execute;
mod metrics;

pub use metrics::ExecutorMetrics;
pub use retry::*;
pub use token_cache::TokenCache;

// self
use crate::{
	_prelude::*,
	api::ApiBase,
	auth::Credential,
	http::{ApiHttpClient, TransportErrorMapper},
};
#[cfg(feature = "reqwest")]
use crate::{
	auth::ScopeList,
	config::ClientConfig,
	error::ConfigError,
	http::{DEFAULT_TIMEOUT, ReqwestHttpClient},
	oauth::ReqwestTransportErrorMapper,
};

#[cfg(feature = "reqwest")]
/// Executor specialized for the crate's default reqwest transport stack.
pub type ReqwestExecutor = Executor<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Issues authenticated requests against the Secure Access API.
///
/// The executor owns the credential, the HTTP transport, and the cached bearer token, so resource
/// wrappers only describe *what* to call. Every clone shares the same token cache and metrics.
pub struct Executor<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for the token endpoint and every API call.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before they reach the retry loop.
	pub transport_mapper: Arc<M>,
	/// Client credentials presented to the token endpoint.
	pub credential: Arc<Credential>,
	/// Origin and region used to resolve relative request paths.
	pub api_base: ApiBase,
	/// Attempt budget and backoff delays.
	pub retry_policy: RetryPolicy,
	/// Strategy used for every backoff delay.
	pub sleeper: Arc<dyn Sleeper>,
	/// Shared counters for token acquisitions, attempts, and retries.
	pub metrics: Arc<ExecutorMetrics>,
	token_cache: Arc<TokenCache>,
}
impl<C, M> Executor<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates an executor that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		credential: Credential,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			credential: Arc::new(credential),
			api_base: ApiBase::default(),
			retry_policy: RetryPolicy::default(),
			sleeper: Arc::new(TokioSleeper),
			metrics: Default::default(),
			token_cache: Default::default(),
		}
	}

	/// Points relative paths at another API origin; the region is kept.
	pub fn with_api_base(mut self, origin: Url) -> Self {
		let region = self.api_base.region().map(str::to_owned);

		self.api_base = ApiBase::new(&origin).with_region(region);

		self
	}

	/// Sets or clears the region used by regional scopes.
	pub fn with_region(mut self, region: Option<impl Into<String>>) -> Self {
		self.api_base = self.api_base.with_region(region);

		self
	}

	/// Replaces the retry policy.
	pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
		self.retry_policy = policy;

		self
	}

	/// Replaces the sleep strategy used for backoff delays.
	pub fn with_sleeper<S>(mut self, sleeper: Arc<S>) -> Self
	where
		S: Sleeper,
	{
		self.sleeper = sleeper;

		self
	}

	/// Token cache shared by every clone of this executor.
	pub fn token_cache(&self) -> &TokenCache {
		&self.token_cache
	}
}
#[cfg(feature = "reqwest")]
impl Executor<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates an executor with its own reqwest transport (30 second timeout).
	pub fn new(credential: Credential) -> Result<Self> {
		let http_client = ReqwestHttpClient::new(DEFAULT_TIMEOUT)?;

		Ok(Self::with_http_client(credential, http_client, Arc::new(ReqwestTransportErrorMapper)))
	}

	/// Creates an executor from raw construction parameters.
	///
	/// Fails when the token URL, client id, or client secret is empty.
	pub fn from_parts<I, S>(
		token_url: &str,
		client_id: &str,
		client_secret: &str,
		scopes: I,
		region: Option<&str>,
	) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let scopes = ScopeList::new(scopes).map_err(ConfigError::from)?;
		let credential = Credential::parse(token_url, client_id, client_secret, scopes)?;

		Ok(Self::new(credential)?.with_region(region))
	}

	/// Creates an executor from a loaded [`ClientConfig`].
	pub fn from_config(config: &ClientConfig) -> Result<Self> {
		config.validate()?;

		let http_client = ReqwestHttpClient::new(config.timeout())?;
		let executor = Self::with_http_client(
			config.credential()?,
			http_client,
			Arc::new(ReqwestTransportErrorMapper),
		);

		Ok(executor.with_api_base(config.api_base_url()?).with_region(config.region.as_deref()))
	}
}
impl<C, M> Clone for Executor<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			credential: self.credential.clone(),
			api_base: self.api_base.clone(),
			retry_policy: self.retry_policy.clone(),
			sleeper: self.sleeper.clone(),
			metrics: self.metrics.clone(),
			token_cache: self.token_cache.clone(),
		}
	}
}
impl<C, M> Debug for Executor<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Executor")
			.field("credential", &self.credential)
			.field("api_base", &self.api_base)
			.field("retry_policy", &self.retry_policy)
			.finish()
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::{build_reqwest_test_executor, test_credential},
		api::ApiScope,
		auth::{CachedToken, Secret},
	};

	#[test]
	fn from_parts_rejects_missing_secret() {
		let err = ReqwestExecutor::from_parts("https://auth.example/token", "abc", "", ["read"], None)
			.expect_err("Empty secrets must be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::MissingField { field: "client_secret" })));
	}

	#[test]
	fn builder_keeps_region_across_base_changes() {
		let origin = Url::parse("http://127.0.0.1:9000").expect("Origin fixture should parse.");
		let executor = ReqwestExecutor::from_parts(
			"https://auth.example/token",
			"abc",
			"xyz",
			["read"],
			Some("eu"),
		)
		.expect("Executor should build.")
		.with_api_base(origin);

		assert_eq!(
			executor.api_base.resolve(ApiScope::Reports, "things"),
			"http://127.0.0.1:9000/reports.eu/v2/things"
		);
	}

	#[tokio::test]
	async fn clones_share_token_cache() {
		let credential = test_credential("https://auth.example/token", &["read"]);
		let (executor, _sleeper) = build_reqwest_test_executor(credential, "http://127.0.0.1:9000");
		let clone = executor.clone();

		assert!(std::ptr::eq(executor.token_cache(), clone.token_cache()));
		assert!(Arc::ptr_eq(&executor.metrics, &clone.metrics));

		clone
			.token_cache()
			.replace(CachedToken {
				access_token: Secret::new("T1"),
				token_type: "Bearer".into(),
				ttl: Duration::hours(1),
				issued_at: OffsetDateTime::now_utc(),
			})
			.await;
		executor.invalidate_token().await;

		assert!(clone.token_cache().current().await.is_none());
	}
}
