//! Retry budget, backoff delays, and the injectable sleep strategy.

// self
use crate::_prelude::*;

/// Boxed future returned by [`Sleeper::sleep`].
pub type SleepFuture<'a> = Pin<Box<dyn Future<Output = ()> + 'a + Send>>;

/// Strategy used for every backoff delay of the retry loop.
///
/// Production code uses [`TokioSleeper`]; tests inject `RecordingSleeper` (behind the `test`
/// feature) so retry sequences run without wall-clock waits.
pub trait Sleeper
where
	Self: 'static + Send + Sync,
{
	/// Waits for `delay`. Dropping the returned future must cancel the wait.
	fn sleep(&self, delay: StdDuration) -> SleepFuture<'_>;
}

/// Wall-clock sleeper backed by the tokio timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;
impl Sleeper for TokioSleeper {
	fn sleep(&self, delay: StdDuration) -> SleepFuture<'_> {
		Box::pin(tokio::time::sleep(delay))
	}
}

/// Sleeper that records requested delays and returns immediately.
#[cfg(any(test, feature = "test"))]
#[derive(Debug, Default)]
pub struct RecordingSleeper {
	delays: Mutex<Vec<StdDuration>>,
}
#[cfg(any(test, feature = "test"))]
impl RecordingSleeper {
	/// Delays requested so far, in order.
	pub fn delays(&self) -> Vec<StdDuration> {
		self.delays.lock().clone()
	}

	/// Sum of all requested delays.
	pub fn total(&self) -> StdDuration {
		self.delays.lock().iter().sum()
	}
}
#[cfg(any(test, feature = "test"))]
impl Sleeper for RecordingSleeper {
	fn sleep(&self, delay: StdDuration) -> SleepFuture<'_> {
		self.delays.lock().push(delay);

		Box::pin(async {})
	}
}

/// Retry budget and fixed delays applied by [`Executor::execute`].
///
/// [`Executor::execute`]: crate::executor::Executor::execute
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Total attempts per call, including the first one.
	pub max_attempts: u32,
	/// Linear backoff step after a transport failure; attempt `n` (0-based) waits `(n + 1) * step`.
	pub transport_backoff_step: StdDuration,
	/// Delay after a 429 response.
	pub rate_limit_delay: StdDuration,
	/// Delay after a 409 response whose body carries [`lock_marker`](Self::lock_marker).
	pub lock_delay: StdDuration,
	/// Delay after a state-changing call before its response is returned.
	pub settle_delay: StdDuration,
	/// Substring identifying a locked-resource 409.
	///
	/// The API offers no machine-readable lock signal, so this is a plain text match against
	/// the error message and will break if the upstream wording changes. An empty marker turns
	/// lock detection off, so every 409 is returned to the caller.
	pub lock_marker: String,
}
impl RetryPolicy {
	/// Default attempt budget.
	pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

	/// Attempt budget, never less than one.
	pub fn attempts(&self) -> u32 {
		self.max_attempts.max(1)
	}

	/// Backoff after a transport failure on `attempt` (0-based).
	pub fn transport_backoff(&self, attempt: u32) -> StdDuration {
		self.transport_backoff_step.saturating_mul(attempt.saturating_add(1))
	}

	/// Policy with every delay set to zero; the attempt budget is unchanged.
	pub fn without_delays(self) -> Self {
		Self {
			transport_backoff_step: StdDuration::ZERO,
			rate_limit_delay: StdDuration::ZERO,
			lock_delay: StdDuration::ZERO,
			settle_delay: StdDuration::ZERO,
			..self
		}
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
			transport_backoff_step: StdDuration::from_secs(1),
			rate_limit_delay: StdDuration::from_secs(10),
			lock_delay: StdDuration::from_secs(5),
			settle_delay: StdDuration::from_secs(2),
			lock_marker: "locked".into(),
		}
	}
}
