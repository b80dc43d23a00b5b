//! Optional observability helpers for executor operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `sse_client.op` with the `op` (operation) and
//!   `stage` (call site) fields, plus a `warn` event for every retry.
//! - Enable `metrics` to increment the `sse_client_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`, and `sse_client_retry_total`
//!   labeled by `reason`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the executor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Token endpoint exchange.
	TokenAcquisition,
	/// Authenticated API call (the whole retry loop).
	Execute,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::TokenAcquisition => "token_acquisition",
			OpKind::Execute => "execute",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to an executor operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Why the retry loop scheduled another attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RetryReason {
	/// Request failed before a response arrived.
	Transport,
	/// API answered 401; the cached token was discarded.
	Unauthorized,
	/// API answered 429.
	RateLimited,
	/// API answered 409 with a lock message.
	Locked,
}
impl RetryReason {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RetryReason::Transport => "transport",
			RetryReason::Unauthorized => "unauthorized",
			RetryReason::RateLimited => "rate_limited",
			RetryReason::Locked => "locked",
		}
	}
}
impl Display for RetryReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
