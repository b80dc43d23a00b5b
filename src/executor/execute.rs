//! The `execute` retry loop and token acquisition.
//!
//! Each call resolves the request URL once, then loops over the attempt budget. An attempt
//! makes sure a valid token is cached (failure here ends the call), sends the request, and
//! classifies the outcome:
//!
//! - transport failure: remember it and back off linearly;
//! - 401: drop the token this attempt used and retry at once;
//! - 429: wait the rate-limit delay and retry;
//! - 409 whose body mentions the lock marker: wait the lock delay and retry;
//! - anything else: return the response, after a settling delay for state-changing methods.
//!
//! The 401/429/409 branches only apply while attempts remain; the final attempt hands its
//! response to the caller as-is.

// crates.io
use oauth2::{
	AsyncHttpClient, HttpRequest,
	http::{
		Method, StatusCode,
		header::{AUTHORIZATION, CONTENT_TYPE},
	},
};
// self
use crate::{
	_prelude::*,
	api::{ApiMethod, ApiResponse, RequestDescriptor},
	auth::CachedToken,
	error::{ConfigError, TransportError},
	executor::Executor,
	http::{ApiHttpClient, ResponseMetadataSlot, TransportErrorMapper},
	oauth,
	obs::{self, OpKind, OpOutcome, OpSpan, RetryReason},
};

/// Content type of API request bodies.
const JSON_CONTENT_TYPE: &str = "application/json";

impl<C, M> Executor<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Executes an authenticated request, absorbing token expiry, rate limiting, and resource
	/// locks.
	///
	/// Any HTTP status, including 4xx/5xx, is returned as a response; only failures to obtain a
	/// token, to build or read a request, or to reach the API within the attempt budget are
	/// errors. Dropping the returned future cancels the call, including any pending backoff.
	pub async fn execute(&self, descriptor: RequestDescriptor) -> Result<ApiResponse> {
		const KIND: OpKind = OpKind::Execute;

		let span = OpSpan::new(KIND, "execute");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span.instrument(self.run(descriptor, &span)).await;

		match &result {
			Ok(_) => {
				self.metrics.record_success();
				obs::record_op_outcome(KIND, OpOutcome::Success);
			},
			Err(_) => {
				self.metrics.record_failure();
				obs::record_op_outcome(KIND, OpOutcome::Failure);
			},
		}

		result
	}

	/// Returns a valid bearer token, acquiring one when none is cached or the cached one expired.
	pub async fn token(&self) -> Result<Arc<CachedToken>> {
		self.token_cache.get_or_acquire(|| self.acquire_token()).await
	}

	/// Discards the cached token so the next call acquires a new one.
	pub async fn invalidate_token(&self) {
		self.token_cache.clear().await;
	}

	async fn run(&self, descriptor: RequestDescriptor, span: &OpSpan) -> Result<ApiResponse> {
		let url = self.api_base.resolve(descriptor.scope, &descriptor.path);
		let body = descriptor.encode_body()?;
		let policy = &self.retry_policy;
		let max_attempts = policy.attempts();
		let mut last_error = None;

		for attempt in 0..max_attempts {
			let token = self.token().await?;
			let has_next = attempt + 1 < max_attempts;
			let request = build_api_request(descriptor.method, &url, &token, body.as_deref())?;

			span.record_attempt(attempt);
			self.metrics.record_attempt();

			let response = match self.dispatch(request).await {
				Ok(response) => response,
				Err(Error::Transport(err)) => {
					last_error = Some(err);

					if has_next {
						self.retry_after(RetryReason::Transport, attempt, policy.transport_backoff(attempt))
							.await;
					}

					continue;
				},
				Err(err) => return Err(err),
			};

			span.record_status(response.status().as_u16());

			if has_next {
				match response.status() {
					StatusCode::UNAUTHORIZED => {
						self.token_cache.invalidate_if_current(&token).await;
						self.retry_after(RetryReason::Unauthorized, attempt, StdDuration::ZERO).await;

						continue;
					},
					StatusCode::TOO_MANY_REQUESTS => {
						self.retry_after(RetryReason::RateLimited, attempt, policy.rate_limit_delay)
							.await;

						continue;
					},
					StatusCode::CONFLICT if response.body_contains(&policy.lock_marker) => {
						self.retry_after(RetryReason::Locked, attempt, policy.lock_delay).await;

						continue;
					},
					StatusCode::CONFLICT => return Ok(response),
					_ => {},
				}
			}

			if descriptor.method.is_mutating() && !policy.settle_delay.is_zero() {
				self.sleeper.sleep(policy.settle_delay).await;
			}

			return Ok(response);
		}

		let source = last_error
			.unwrap_or_else(|| TransportError::Other { message: "no attempt was made".into() });

		Err(Error::RetriesExhausted { attempts: max_attempts, source })
	}

	async fn dispatch(&self, request: HttpRequest) -> Result<ApiResponse> {
		let meta = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(meta.clone());

		handle
			.call(request)
			.await
			.map(ApiResponse::from)
			.map_err(|err| self.transport_mapper.map_transport_error(meta.take().as_ref(), err))
	}

	async fn retry_after(&self, reason: RetryReason, attempt: u32, delay: StdDuration) {
		self.metrics.record_retry();
		obs::record_retry(reason, attempt, delay);

		if !delay.is_zero() {
			self.sleeper.sleep(delay).await;
		}
	}

	async fn acquire_token(&self) -> Result<CachedToken> {
		const KIND: OpKind = OpKind::TokenAcquisition;

		let span = OpSpan::new(KIND, "acquire_token");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);
		self.metrics.record_token_acquisition();

		let result = span
			.instrument(oauth::request_token(
				&self.credential,
				self.http_client.as_ref(),
				self.transport_mapper.as_ref(),
			))
			.await;

		match &result {
			Ok(_token) => {
				#[cfg(feature = "tracing")]
				tracing::debug!(expires_at = %_token.expires_at(), "acquired bearer token");

				obs::record_op_outcome(KIND, OpOutcome::Success);
			},
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}
}

fn build_api_request(
	method: ApiMethod,
	url: &str,
	token: &CachedToken,
	body: Option<&[u8]>,
) -> Result<HttpRequest> {
	let request = oauth2::http::Request::builder()
		.method(Method::from(method))
		.uri(url)
		.header(AUTHORIZATION, token.bearer_header())
		.header(CONTENT_TYPE, JSON_CONTENT_TYPE)
		.body(body.map(<[u8]>::to_vec).unwrap_or_default())
		.map_err(ConfigError::from)?;

	Ok(request)
}
