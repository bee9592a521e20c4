// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for client resolutions on one asset source.
#[derive(Debug, Default)]
pub struct ResolveMetrics {
	attempts: AtomicU64,
	cache_hits: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
}
impl ResolveMetrics {
	/// Returns the total number of client requests.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of requests answered from the cache.
	pub fn cache_hits(&self) -> u64 {
		self.cache_hits.load(Ordering::Relaxed)
	}

	/// Returns the number of resolutions that authenticated and committed a client.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of failed resolutions.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_cache_hit(&self) {
		self.cache_hits.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}
}
