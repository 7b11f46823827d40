// self
use crate::obs::{Operation, Outcome, RetryReason};

/// Counts a login, refresh, or protected-call outcome.
pub fn record_outcome(operation: Operation, outcome: Outcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"bearer_client_operation_total",
			"operation" => operation.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (operation, outcome);
	}
}

/// Counts one resend of a protected request.
pub fn record_retry(reason: RetryReason) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("bearer_client_retry_total", "reason" => reason.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = reason;
	}
}

/// Counts a rejected refresh that fell back to a credential login.
pub fn record_refresh_fallback() {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("bearer_client_refresh_fallback_total").increment(1);
	}
}
