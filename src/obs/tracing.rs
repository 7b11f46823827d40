// crates.io
use oauth2::http::Method;
// self
use crate::{_prelude::*, error::TokenEndpoint, obs::Operation};

/// Future returned by [`CallSpan::instrument`]; plain `F` without the `tracing` feature.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`CallSpan::instrument`]; plain `F` without the `tracing` feature.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// `bearer_client.call` span covering one token exchange or one protected call with all of its
/// retries.
///
/// Exchange spans carry `operation` and `endpoint`. Request spans carry `method` and `url`, and
/// get `status` and `attempts` filled in once the call settles.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Span for a login or refresh exchange.
	pub fn exchange(endpoint: TokenEndpoint) -> Self {
		let operation = match endpoint {
			TokenEndpoint::Login => Operation::Login,
			TokenEndpoint::Refresh => Operation::Refresh,
		};

		#[cfg(feature = "tracing")]
		{
			Self {
				span: tracing::info_span!(
					"bearer_client.call",
					operation = operation.as_str(),
					endpoint = endpoint.as_str()
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = operation;

			Self {}
		}
	}

	/// Span for a protected call.
	pub fn request(method: &Method, url: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			Self {
				span: tracing::info_span!(
					"bearer_client.call",
					operation = Operation::Request.as_str(),
					method = %method,
					url,
					status = tracing::field::Empty,
					attempts = tracing::field::Empty
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, url);

			Self {}
		}
	}

	/// Records the status of the response handed back to the caller.
	pub fn record_status(&self, status: u16) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("status", status);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = status;
		}
	}

	/// Records how many attempts the call started.
	pub fn record_attempts(&self, attempts: u32) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("attempts", attempts);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = attempts;
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
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
