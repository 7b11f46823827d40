//! Shared helpers for the login and refresh exchanges.

// crates.io
use oauth2::{
	AsyncHttpClient, HttpRequest,
	http::{Method, StatusCode, header::CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::Token,
	client::ApiClient,
	config::ClientConfigError,
	error::{ConfigError, TokenEndpoint},
	http::{ApiHttpClient, TransportErrorMapper},
	obs::trace_event,
};

pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";

/// Result of a token exchange that reached the endpoint.
#[derive(Debug)]
pub(crate) enum TokenExchange {
	/// `200 OK` with a decodable token.
	Issued(Token),
	/// Any other status; carries the literal response body.
	Rejected { status: u16, body: String },
}

impl<C, M> ApiClient<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Posts a JSON payload to a token endpoint and decodes the answer.
	///
	/// Transport failures and malformed `200` bodies are errors; any other status is returned as
	/// [`TokenExchange::Rejected`] so callers can apply their own policy.
	pub(crate) async fn exchange_token(
		&self,
		endpoint: TokenEndpoint,
		payload: Vec<u8>,
	) -> Result<TokenExchange> {
		let url = match endpoint {
			TokenEndpoint::Login =>
				self.config.token_endpoint.as_ref().ok_or(ClientConfigError::MissingTokenEndpoint),
			TokenEndpoint::Refresh => self
				.config
				.refresh_endpoint
				.as_ref()
				.ok_or(ClientConfigError::MissingRefreshEndpoint),
		}
		.map_err(ConfigError::from)?;
		let request: HttpRequest = oauth2::http::Request::builder()
			.method(Method::POST)
			.uri(url.as_str())
			.header(CONTENT_TYPE, JSON_CONTENT_TYPE)
			.body(payload)
			.map_err(ConfigError::from)?;

		trace_event!(debug, endpoint = endpoint.as_str(), url = %url, "Posting token request.");

		let handle = self.http_client.handle();
		let response = handle
			.call(request)
			.await
			.map_err(|err| self.transport_mapper.map_transport_error(err))?;
		let status = response.status();

		if status != StatusCode::OK {
			let body = String::from_utf8_lossy(response.body()).into_owned();

			trace_event!(
				debug,
				endpoint = endpoint.as_str(),
				status = status.as_u16(),
				"Token endpoint rejected the request."
			);

			return Ok(TokenExchange::Rejected { status: status.as_u16(), body });
		}

		let mut deserializer = serde_json::Deserializer::from_slice(response.body());
		let token = serde_path_to_error::deserialize::<_, Token>(&mut deserializer)
			.map_err(|source| Error::TokenDecode { endpoint, source })?;

		if self.config.debug {
			trace_event!(
				debug,
				endpoint = endpoint.as_str(),
				token = ?token,
				"Token endpoint issued a token."
			);
		}

		Ok(TokenExchange::Issued(token))
	}
}
