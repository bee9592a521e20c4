// self
use crate::{
	_prelude::*,
	auth::{PrincipalId, SourceId},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedResolve<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedResolve<F> = F;

/// Span wrapping one client resolution.
#[derive(Clone, Debug)]
pub struct ResolveSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl ResolveSpan {
	/// Creates a new span tagged with the asset source + stage.
	pub fn new(source: &SourceId, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("pixxio_source.resolve", source = source.as_ref(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (source, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedResolve<Fut>
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

/// Notes that the shared refresh token stands in for `principal`.
pub fn note_shared_fallback(principal: &PrincipalId) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(principal = principal.as_ref(), "using shared refresh token");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = principal;
	}
}

/// Notes a failed resolution; the cache stays empty so the next call retries.
pub fn note_resolve_failure(error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(%error, "client resolution failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}
}
