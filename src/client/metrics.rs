// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::obs::{self, RetryReason};

/// Thread-safe counters for token exchanges and executor retries.
///
/// Retries and refresh fallbacks are also exported through [`obs`] when the `metrics` feature is
/// enabled.
#[derive(Debug, Default)]
pub struct ClientMetrics {
	logins: AtomicU64,
	refreshes: AtomicU64,
	refresh_fallbacks: AtomicU64,
	auth_retries: AtomicU64,
	connection_retries: AtomicU64,
}
impl ClientMetrics {
	/// Returns the number of login exchanges attempted (including refresh fallbacks).
	pub fn logins(&self) -> u64 {
		self.logins.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh exchanges attempted.
	pub fn refreshes(&self) -> u64 {
		self.refreshes.load(Ordering::Relaxed)
	}

	/// Returns how many refresh rejections fell back to a login.
	pub fn refresh_fallbacks(&self) -> u64 {
		self.refresh_fallbacks.load(Ordering::Relaxed)
	}

	/// Returns how many protected requests were resent after a 401.
	pub fn auth_retries(&self) -> u64 {
		self.auth_retries.load(Ordering::Relaxed)
	}

	/// Returns how many protected requests were resent after a connection failure.
	pub fn connection_retries(&self) -> u64 {
		self.connection_retries.load(Ordering::Relaxed)
	}

	pub(crate) fn record_login(&self) {
		self.logins.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh(&self) {
		self.refreshes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_fallback(&self) {
		self.refresh_fallbacks.fetch_add(1, Ordering::Relaxed);
		obs::record_refresh_fallback();
	}

	pub(crate) fn record_auth_retry(&self) {
		self.auth_retries.fetch_add(1, Ordering::Relaxed);
		obs::record_retry(RetryReason::Unauthorized);
	}

	pub(crate) fn record_connection_retry(&self) {
		self.connection_retries.fetch_add(1, Ordering::Relaxed);
		obs::record_retry(RetryReason::Connection);
	}
}
