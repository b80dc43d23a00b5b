//! Mutex-guarded bearer token cache with singleflight acquisition.

// self
use crate::{_prelude::*, auth::CachedToken};

/// Holds the executor's current bearer token.
///
/// "Check expiry, acquire if needed, read" runs under one async lock, so concurrent callers
/// that find the token missing share a single token-endpoint round trip. Tokens are swapped
/// as whole `Arc`s and never edited in place.
#[derive(Debug, Default)]
pub struct TokenCache {
	slot: AsyncMutex<Option<Arc<CachedToken>>>,
}
impl TokenCache {
	/// Returns the cached token, or runs `acquire` and caches its result when the token is
	/// missing or expired.
	///
	/// A failed acquisition leaves the slot unchanged and returns the error.
	pub async fn get_or_acquire<F, Fut>(&self, acquire: F) -> Result<Arc<CachedToken>>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<CachedToken>>,
	{
		let mut slot = self.slot.lock().await;
		let now = OffsetDateTime::now_utc();

		if let Some(current) = slot.as_ref().filter(|token| !token.is_expired_at(now)) {
			return Ok(current.clone());
		}

		let fresh = Arc::new(acquire().await?);

		*slot = Some(fresh.clone());

		Ok(fresh)
	}

	/// Discards the cached token only if it is still `used`.
	///
	/// A token acquired by another caller after `used` was read stays in place. Returns `true`
	/// when the slot was cleared.
	pub async fn invalidate_if_current(&self, used: &Arc<CachedToken>) -> bool {
		let mut slot = self.slot.lock().await;

		if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, used)) {
			*slot = None;

			return true;
		}

		false
	}

	/// Discards whatever token is cached.
	pub async fn clear(&self) {
		*self.slot.lock().await = None;
	}

	/// Replaces the cached token.
	pub async fn replace(&self, token: CachedToken) -> Arc<CachedToken> {
		let token = Arc::new(token);

		*self.slot.lock().await = Some(token.clone());

		token
	}

	/// Returns the cached token without checking expiry.
	pub async fn current(&self) -> Option<Arc<CachedToken>> {
		self.slot.lock().await.clone()
	}
}
