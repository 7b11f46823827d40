//! Refresh-token exchange with the configurable login fallback.

// self
use crate::{
	_prelude::*,
	auth::{RefreshTokenRequest, Token},
	client::{ApiClient, common::TokenExchange},
	error::{ConfigError, TokenEndpoint},
	http::{ApiHttpClient, TransportErrorMapper},
	obs::{self, CallSpan, Operation, Outcome, trace_event},
};

impl<C, M> ApiClient<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Exchanges `refresh_token` for a new token.
	///
	/// A `200 OK` with a decodable body replaces the held token. When the refresh endpoint answers
	/// with any other status and the configured [`RefreshFallback`](crate::config::RefreshFallback)
	/// allows it, exactly one login with the configured credentials is performed instead and its
	/// result (or failure) is returned. Transport failures and malformed `200` bodies never fall
	/// back.
	pub async fn request_token_by_refresh_token(&self, refresh_token: &str) -> Result<Token> {
		const OPERATION: Operation = Operation::Refresh;

		let span = CallSpan::exchange(TokenEndpoint::Refresh);

		obs::record_outcome(OPERATION, Outcome::Attempt);
		self.metrics.record_refresh();

		let exchange = span
			.instrument(async move {
				let payload = serde_json::to_vec(&RefreshTokenRequest { refresh_token })
					.map_err(|source| ConfigError::InvalidBody { source })?;

				self.exchange_token(TokenEndpoint::Refresh, payload).await
			})
			.await;
		let (status, body) = match exchange {
			Ok(TokenExchange::Issued(token)) => {
				obs::record_outcome(OPERATION, Outcome::Success);

				return Ok(self.store_token(token));
			},
			Ok(TokenExchange::Rejected { status, body }) => (status, body),
			Err(err) => {
				obs::record_outcome(OPERATION, Outcome::Failure);

				return Err(err);
			},
		};

		obs::record_outcome(OPERATION, Outcome::Failure);

		if !self.config.refresh_fallback.allows(status) {
			return Err(Error::TokenEndpoint { endpoint: TokenEndpoint::Refresh, status, body });
		}

		trace_event!(warn, status, "Refresh token rejected; falling back to credential login.");
		self.metrics.record_refresh_fallback();

		self.request_token_by_login().await
	}
}
