// self
use crate::{_prelude::*, obs::OpKind};

/// Future wrapped in the operation span when `tracing` is enabled; the bare future otherwise.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Future wrapped in the operation span when `tracing` is enabled; the bare future otherwise.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// Span covering one executor operation.
///
/// `attempt` and `status` start empty and are filled in as the retry loop progresses, so the
/// closed span reports the attempt that finished the call and the status it saw.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Opens a span for `kind` at call site `stage`.
	pub fn new(kind: OpKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"sse_client.op",
				op = kind.as_str(),
				stage,
				attempt = tracing::field::Empty,
				status = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Records the 0-based attempt currently in flight.
	pub fn record_attempt(&self, attempt: u32) {
		#[cfg(feature = "tracing")]
		self.span.record("attempt", attempt);
		#[cfg(not(feature = "tracing"))]
		let _ = attempt;
	}

	/// Records the HTTP status of the latest response.
	pub fn record_status(&self, status: u16) {
		#[cfg(feature = "tracing")]
		self.span.record("status", status);
		#[cfg(not(feature = "tracing"))]
		let _ = status;
	}

	/// Runs `fut` inside the span without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
