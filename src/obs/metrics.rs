// self
use crate::{
	_prelude::*,
	obs::{OpKind, OpOutcome, RetryReason},
};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_op_outcome(kind: OpKind, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"sse_client_op_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records a scheduled retry and, with `tracing` enabled, logs it at `warn`.
pub fn record_retry(reason: RetryReason, attempt: u32, delay: StdDuration) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("sse_client_retry_total", "reason" => reason.as_str()).increment(1);
	}
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			reason = reason.as_str(),
			attempt,
			delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
			"retrying API request"
		);
	}

	#[cfg(not(any(feature = "metrics", feature = "tracing")))]
	{
		let _ = (reason, attempt, delay);
	}
}
