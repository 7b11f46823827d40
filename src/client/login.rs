//! Credential login against the token endpoint.

// self
use crate::{
	_prelude::*,
	auth::Token,
	client::{ApiClient, common::TokenExchange},
	error::{ConfigError, TokenEndpoint},
	http::{ApiHttpClient, TransportErrorMapper},
	obs::{self, CallSpan, Operation, Outcome},
};

impl<C, M> ApiClient<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Exchanges the configured credentials for a new token.
	///
	/// Success is exactly `200 OK` with a decodable body; the token then replaces the one held by
	/// the client and is returned. Any other status yields [`Error::TokenEndpoint`] carrying the
	/// status code and the literal response body.
	pub async fn request_token_by_login(&self) -> Result<Token> {
		const OPERATION: Operation = Operation::Login;

		let span = CallSpan::exchange(TokenEndpoint::Login);

		obs::record_outcome(OPERATION, Outcome::Attempt);
		self.metrics.record_login();

		let result = span
			.instrument(async move {
				let payload = serde_json::to_vec(&self.credentials)
					.map_err(|source| ConfigError::InvalidBody { source })?;

				match self.exchange_token(TokenEndpoint::Login, payload).await? {
					TokenExchange::Issued(token) => Ok(self.store_token(token)),
					TokenExchange::Rejected { status, body } =>
						Err(Error::TokenEndpoint { endpoint: TokenEndpoint::Login, status, body }),
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_outcome(OPERATION, Outcome::Success),
			Err(_) => obs::record_outcome(OPERATION, Outcome::Failure),
		}

		result
	}
}
