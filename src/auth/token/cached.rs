//! Cached bearer tokens and their expiry predicate.

// self
use crate::{_prelude::*, auth::Secret};

/// Token response body returned by the token endpoint.
///
/// `token_type` and `expires_in` are optional on the wire; a missing `expires_in` yields a token
/// that is already stale, so the next call fetches a new one.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
	/// Bearer token value.
	pub access_token: Secret,
	/// Token kind reported by the endpoint (usually `Bearer`).
	#[serde(default)]
	pub token_type: Option<String>,
	/// Lifetime in seconds.
	#[serde(default)]
	pub expires_in: Option<i64>,
}
impl Debug for TokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResponse")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("expires_in", &self.expires_in)
			.finish()
	}
}

/// Immutable bearer token held by the executor's token cache.
///
/// The cache swaps whole values; a token is never edited in place.
#[derive(Clone, PartialEq, Eq)]
pub struct CachedToken {
	/// Access token secret; callers must avoid logging it.
	pub access_token: Secret,
	/// Token kind reported by the endpoint.
	pub token_type: String,
	/// Lifetime reported by the endpoint.
	pub ttl: Duration,
	/// Instant the token response was received.
	pub issued_at: OffsetDateTime,
}
impl CachedToken {
	/// Tokens are treated as expired this long before their real expiry.
	pub const EXPIRY_MARGIN: Duration = Duration::seconds(60);

	/// Builds a token from an endpoint response stamped with `issued_at`.
	pub fn from_response(response: TokenResponse, issued_at: OffsetDateTime) -> Self {
		Self {
			access_token: response.access_token,
			token_type: response.token_type.unwrap_or_else(|| "Bearer".into()),
			ttl: Duration::seconds(response.expires_in.unwrap_or_default()),
			issued_at,
		}
	}

	/// Instant from which the token must no longer be used (`issued_at + ttl - 60s`).
	pub fn expires_at(&self) -> OffsetDateTime {
		self.issued_at.saturating_add(self.ttl).saturating_sub(Self::EXPIRY_MARGIN)
	}

	/// Returns `true` if the token is expired, or within the margin, at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at()
	}

	/// Convenience helper that checks expiry against the current UTC clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	/// Renders the `Authorization` header value for API calls.
	pub fn bearer_header(&self) -> String {
		format!("Bearer {}", self.access_token.expose())
	}
}
impl Debug for CachedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedToken")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("ttl", &self.ttl)
			.field("issued_at", &self.issued_at)
			.finish()
	}
}
