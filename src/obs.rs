//! Optional observability helpers for token exchanges and protected calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to emit `bearer_client.call` spans (see [`CallSpan`]) plus
//!   debug/warn events for retries and fallbacks.
//! - Enable `metrics` to export these counters through the `metrics` facade:
//!   - `bearer_client_operation_total{operation, outcome}` for logins, refreshes, and calls;
//!   - `bearer_client_retry_total{reason}` for every resend (`unauthorized` or `connection`);
//!   - `bearer_client_refresh_fallback_total` for rejected refreshes that fell back to a login.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Emits a `tracing` event when the `tracing` feature is enabled; compiles to nothing otherwise.
macro_rules! trace_event {
	($level:ident, $($arg:tt)+) => {
		#[cfg(feature = "tracing")]
		{
			::tracing::$level!($($arg)+);
		}
	};
}
pub(crate) use trace_event;

/// Operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Credential login against the token endpoint.
	Login,
	/// Refresh-token exchange.
	Refresh,
	/// Protected API call through the request executor.
	Request,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Login => "login",
			Operation::Refresh => "refresh",
			Operation::Request => "request",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Why the executor resent a protected request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RetryReason {
	/// The previous attempt was answered with 401 and the token was refreshed.
	Unauthorized,
	/// The previous attempt failed at the connection level.
	Connection,
}
impl RetryReason {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RetryReason::Unauthorized => "unauthorized",
			RetryReason::Connection => "connection",
		}
	}
}
impl Display for RetryReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
