//! Authenticated request executor.
//!
//! Every protected call runs as a bounded loop: build the request with the configured
//! [`AuthMode`](crate::config::AuthMode) credentials, send it, classify the outcome, and either
//! return, resend after a fixed backoff (connection failure), or resend after refreshing the token
//! (401 in bearer mode). Both retry counters are independent and capped at [`MAX_RETRIES`]. The
//! body is materialized once and resent byte-for-byte.
//!
//! The backoff sleeps on the tokio timer, so calls must run inside a tokio runtime whatever
//! [`ApiHttpClient`] carries them.

// std
use std::io::Read;
// crates.io
use oauth2::{
	AsyncHttpClient, HttpRequest, HttpResponse,
	http::{
		HeaderValue, Method, StatusCode,
		header::{AUTHORIZATION, CONTENT_TYPE},
	},
};
// self
use crate::{
	_prelude::*,
	auth::Token,
	client::{ApiClient, common::JSON_CONTENT_TYPE},
	decode::ResultDecoder,
	error::ConfigError,
	http::{ApiHttpClient, TransportErrorMapper},
	obs::{self, CallSpan, Operation, Outcome, trace_event},
};

/// Maximum resends per call for each retry reason (401 refreshes and connection failures).
pub const MAX_RETRIES: u32 = 2;
/// Fixed wait before resending after a connection failure; slept on the tokio timer.
pub const CONNECTION_BACKOFF: std::time::Duration = std::time::Duration::from_millis(500);

/// Immutable request body, resent verbatim on every attempt.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RequestBody(Vec<u8>);
impl RequestBody {
	/// Returns a body with no bytes.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Wraps raw bytes.
	pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
		Self(bytes.into())
	}

	/// Serializes `value` as JSON.
	pub fn json<T>(value: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		let bytes = serde_json::to_vec(value).map_err(|source| ConfigError::InvalidBody { source })?;

		Ok(Self(bytes))
	}

	/// Drains a reader into a body.
	///
	/// A reader that fails midway yields an empty body instead of failing the call.
	pub fn from_reader(mut reader: impl Read) -> Self {
		let mut bytes = Vec::new();

		match reader.read_to_end(&mut bytes) {
			Ok(_) => Self(bytes),
			Err(e) => {
				trace_event!(warn, error = %e, "Request body could not be read; sending it empty.");

				#[cfg(not(feature = "tracing"))]
				let _ = e;

				Self::empty()
			},
		}
	}

	/// Returns the body bytes.
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// Returns `true` when the body has no bytes.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl Debug for RequestBody {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "RequestBody({} bytes)", self.0.len())
	}
}
impl From<Vec<u8>> for RequestBody {
	fn from(bytes: Vec<u8>) -> Self {
		Self(bytes)
	}
}
impl From<&[u8]> for RequestBody {
	fn from(bytes: &[u8]) -> Self {
		Self(bytes.to_vec())
	}
}
impl From<String> for RequestBody {
	fn from(text: String) -> Self {
		Self(text.into_bytes())
	}
}
impl From<&str> for RequestBody {
	fn from(text: &str) -> Self {
		Self(text.as_bytes().to_vec())
	}
}
impl From<()> for RequestBody {
	fn from(_: ()) -> Self {
		Self::empty()
	}
}

/// Logical protected call: method, absolute URL, body, and content type.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute request URL.
	pub url: String,
	/// Body resent on every attempt.
	pub body: RequestBody,
	/// Value of the `Content-Type` header.
	pub content_type: &'static str,
}
impl ApiRequest {
	/// Creates a bodiless JSON request.
	pub fn new(method: Method, url: impl Into<String>) -> Self {
		Self { method, url: url.into(), body: RequestBody::empty(), content_type: JSON_CONTENT_TYPE }
	}

	/// Creates a request from a textual method such as `"PATCH"`.
	pub fn parse(method: &str, url: impl Into<String>) -> Result<Self> {
		let method = Method::from_bytes(method.as_bytes())
			.map_err(|e| ConfigError::from(oauth2::http::Error::from(e)))?;

		Ok(Self::new(method, url))
	}

	/// Attaches a body.
	pub fn with_body(mut self, body: impl Into<RequestBody>) -> Self {
		self.body = body.into();

		self
	}

	/// Overrides the `Content-Type` header (JSON by default).
	pub fn with_content_type(mut self, content_type: &'static str) -> Self {
		self.content_type = content_type;

		self
	}
}

#[derive(Debug)]
struct RequestAttempt {
	request: ApiRequest,
	started: u32,
	retry_count: u32,
	conn_fail_count: u32,
}
impl RequestAttempt {
	fn new(request: ApiRequest) -> Self {
		Self { request, started: 0, retry_count: 0, conn_fail_count: 0 }
	}


	// Default headers go first so the authorization and content-type headers always win.
	fn build(
		&self,
		authorization: Option<&str>,
		default_headers: &[(String, String)],
	) -> Result<HttpRequest> {
		let mut builder = oauth2::http::Request::builder()
			.method(self.request.method.clone())
			.uri(self.request.url.as_str());

		for (name, value) in default_headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		let mut request =
			builder.body(self.request.body.as_bytes().to_vec()).map_err(ConfigError::from)?;
		let content_type = header_value(self.request.content_type)?;

		if let Some(authorization) = authorization {
			request.headers_mut().insert(AUTHORIZATION, header_value(authorization)?);
		}

		request.headers_mut().insert(CONTENT_TYPE, content_type);

		Ok(request)
	}
}

#[derive(Debug)]
enum AttemptOutcome {
	Success(HttpResponse),
	RetryConnection(Error),
	RetryAuth,
	Fail(Error),
}

impl<C, M> ApiClient<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Sends a protected request and returns the final response.
	///
	/// A 401 that survives both refresh retries is returned as-is, not as an error. Outside bearer
	/// mode a 401 is returned on the first answer.
	///
	/// Must be awaited inside a tokio runtime (see [`CONNECTION_BACKOFF`]).
	pub async fn execute(
		&self,
		method: Method,
		url: &str,
		body: impl Into<RequestBody>,
	) -> Result<HttpResponse> {
		self.execute_request(ApiRequest::new(method, url).with_body(body)).await
	}

	/// Sends a fully described protected request and returns the final response.
	pub async fn execute_request(&self, request: ApiRequest) -> Result<HttpResponse> {
		const OPERATION: Operation = Operation::Request;

		let span = CallSpan::request(&request.method, &request.url);

		obs::record_outcome(OPERATION, Outcome::Attempt);

		let mut attempt = RequestAttempt::new(request);
		let result = span.instrument(self.run_attempts(&mut attempt)).await;

		span.record_attempts(attempt.started);

		match &result {
			Ok(response) => {
				span.record_status(response.status().as_u16());
				obs::record_outcome(OPERATION, Outcome::Success);
			},
			Err(_) => obs::record_outcome(OPERATION, Outcome::Failure),
		}

		result
	}

	/// Sends a protected request and hands the final response to `decoder`.
	pub async fn send_decoded<D>(&self, request: ApiRequest, decoder: &D) -> Result<D::Output>
	where
		D: ResultDecoder,
	{
		let response = self.execute_request(request).await?;

		Ok(decoder.decode(response))
	}

	async fn run_attempts(&self, attempt: &mut RequestAttempt) -> Result<HttpResponse> {
		loop {
			let snapshot = self.token.snapshot();

			attempt.started += 1;

			match self.send_attempt(attempt, &snapshot.token).await {
				AttemptOutcome::Success(response) => return Ok(response),
				AttemptOutcome::Fail(err) => return Err(err),
				AttemptOutcome::RetryConnection(err) => {
					attempt.conn_fail_count += 1;
					self.metrics.record_connection_retry();

					trace_event!(
						warn,
						error = %err,
						conn_fail_count = attempt.conn_fail_count,
						"Connection failed; retrying after backoff."
					);

					#[cfg(not(feature = "tracing"))]
					let _ = err;

					tokio::time::sleep(CONNECTION_BACKOFF).await;
				},
				AttemptOutcome::RetryAuth => {
					attempt.retry_count += 1;
					self.metrics.record_auth_retry();

					trace_event!(
						warn,
						retry_count = attempt.retry_count,
						"Protected call answered 401; refreshing the token."
					);

					self.refresh_after_unauthorized(snapshot.generation).await?;
				},
			}
		}
	}

	async fn send_attempt(&self, attempt: &RequestAttempt, token: &Token) -> AttemptOutcome {
		let authorization = self.config.auth_mode.authorization_value(token);
		let request = match attempt.build(authorization.as_deref(), &self.config.default_headers) {
			Ok(request) => request,
			Err(err) => return AttemptOutcome::Fail(err),
		};

		trace_event!(
			debug,
			method = %attempt.request.method,
			url = %attempt.request.url,
			retry_count = attempt.retry_count,
			conn_fail_count = attempt.conn_fail_count,
			"Sending protected request."
		);

		if self.config.debug {
			trace_event!(
				debug,
				body = %String::from_utf8_lossy(attempt.request.body.as_bytes()),
				"Protected request body."
			);
		}

		let handle = self.http_client.handle();

		match handle.call(request).await {
			Ok(response)
				if response.status() == StatusCode::UNAUTHORIZED
					&& self.config.auth_mode.refreshes_on_unauthorized()
					&& attempt.retry_count < MAX_RETRIES =>
				AttemptOutcome::RetryAuth,
			Ok(response) => AttemptOutcome::Success(response),
			Err(err) => {
				let err = self.transport_mapper.map_transport_error(err);

				if err.is_connection_failure() && attempt.conn_fail_count < MAX_RETRIES {
					AttemptOutcome::RetryConnection(err)
				} else {
					AttemptOutcome::Fail(err)
				}
			},
		}
	}

	// Single-flight: only the first caller that saw generation `seen` refreshes; later callers
	// resend with whatever token replaced it.
	async fn refresh_after_unauthorized(&self, seen: u64) -> Result<()> {
		let _singleflight = self.refresh_guard.lock().await;
		let current = self.token.snapshot();

		if current.generation != seen {
			trace_event!(
				debug,
				seen,
				current = current.generation,
				"Token already replaced by a concurrent refresh."
			);

			return Ok(());
		}

		let refresh_token = current.token.refresh_token.expose().to_owned();

		self.request_token_by_refresh_token(&refresh_token).await?;

		Ok(())
	}
}

fn header_value(value: &str) -> Result<HeaderValue> {
	HeaderValue::from_str(value).map_err(|e| ConfigError::from(oauth2::http::Error::from(e)).into())
}
