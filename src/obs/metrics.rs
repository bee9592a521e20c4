// self
use crate::obs::ResolveOutcome;

/// Records a resolution outcome via the global metrics recorder (when enabled).
pub fn record_resolve_outcome(outcome: ResolveOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("pixxio_source_resolve_total", "outcome" => outcome.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}
