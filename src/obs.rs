//! Optional observability helpers for client resolution.
//!
//! # Feature Flags
//!
//! - `tracing` (default) wraps every resolution in a span named `pixxio_source.resolve` with the
//!   `source` and `stage` fields, and emits events for the shared-token fallback and for failed
//!   resolutions.
//! - `metrics` increments the `pixxio_source_resolve_total` counter for every
//!   attempt/cache hit/success/failure, labeled by `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolveOutcome {
	/// Entry to [`AssetSource::client`](crate::source::AssetSource::client).
	Attempt,
	/// The cached client was returned without resolving.
	CacheHit,
	/// A client was authenticated and committed to the cache.
	Success,
	/// Resolution failed and the cache stays empty.
	Failure,
}
impl ResolveOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ResolveOutcome::Attempt => "attempt",
			ResolveOutcome::CacheHit => "cache_hit",
			ResolveOutcome::Success => "success",
			ResolveOutcome::Failure => "failure",
		}
	}
}
impl Display for ResolveOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
