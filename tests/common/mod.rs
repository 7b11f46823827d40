//! Shared fixtures for the integration tests.

#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	future::Future,
	io::{Error as IoError, ErrorKind},
	pin::Pin,
	sync::{
		Arc,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
};
// crates.io
use bearer_client::{
	auth::CredentialRequest,
	client::ApiClient,
	config::{ClientConfig, ClientConfigBuilder},
	error::Error,
	http::{ApiHttpClient, TransportErrorMapper, map_common_transport_error},
	oauth2::{
		AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
		http::{
			Method, StatusCode,
			header::{AUTHORIZATION, CONTENT_TYPE},
		},
	},
	url::Url,
};
#[cfg(feature = "reqwest")] use bearer_client::client::ReqwestApiClient;
use parking_lot::Mutex;
use serde_json::{Value, json};

pub const CLIENT_ID: &str = "c0";
pub const CLIENT_SECRET: &str = "s0";
pub const SCOPES: &str = "user";

/// Credentials used by every scenario (`c0` / `s0` / `user`).
pub fn credentials() -> CredentialRequest {
	CredentialRequest::new(CLIENT_ID, CLIENT_SECRET).with_scopes(SCOPES)
}

/// JSON the token endpoint expects for [`credentials`].
pub fn credentials_json() -> Value {
	json!({
		"ClientID": CLIENT_ID,
		"ClientSecret": CLIENT_SECRET,
		"Scopes": SCOPES,
		"AppUserID": "",
		"RefreshToken": "",
	})
}

/// Token endpoint response body.
pub fn token_json(access: &str, refresh: &str) -> Value {
	json!({
		"token_type": "bearer",
		"access_token": access,
		"expires_in": 3600,
		"refresh_token": refresh,
	})
}

/// Builder whose token, refresh, and API endpoints all live under `base`.
///
/// TLS verification is off because `httpmock` serves HTTPS with a self-signed certificate.
pub fn config_builder(base: &str) -> ClientConfigBuilder {
	ClientConfig::builder()
		.token_endpoint(Url::parse(&format!("{base}/token")).expect("Valid token URL."))
		.refresh_endpoint(Url::parse(&format!("{base}/refresh")).expect("Valid refresh URL."))
		.base_url(base)
		.allow_insecure_tls(true)
}

/// Builds a reqwest-backed client over `builder` with the scenario [`credentials`].
#[cfg(feature = "reqwest")]
pub fn reqwest_client(builder: ClientConfigBuilder) -> ReqwestApiClient {
	let config = builder.build().expect("Test configuration should build.");

	ReqwestApiClient::new(config, credentials()).expect("Reqwest client should build.")
}

#[derive(Debug)]
pub struct ScriptedTransportError;
impl Display for ScriptedTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Scripted transport error.")
	}
}
impl StdError for ScriptedTransportError {}

/// Outcome scripted for one protected API call.
#[derive(Clone, Debug)]
pub enum Scripted {
	Respond(u16, &'static str),
	Refuse,
	TimeOut,
}

/// Protected request as seen by the transport.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
	pub method: Method,
	pub path: String,
	pub authorization: String,
	pub content_type: String,
	pub body: Vec<u8>,
}

#[derive(Default)]
struct ScriptState {
	api: Mutex<VecDeque<Scripted>>,
	requests: Mutex<Vec<RecordedRequest>>,
	logins: AtomicUsize,
	refreshes: AtomicUsize,
	reject_refresh: AtomicBool,
}

/// In-memory transport: `/token` and `/refresh` always issue numbered tokens, every other path
/// pops the next scripted outcome.
#[derive(Clone, Default)]
pub struct ScriptedHttpClient(Arc<ScriptState>);
impl ScriptedHttpClient {
	pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
		let client = Self::default();

		client.0.api.lock().extend(script);

		client
	}

	/// Makes the refresh endpoint answer `400` from now on.
	pub fn reject_refresh(self) -> Self {
		self.0.reject_refresh.store(true, Ordering::SeqCst);

		self
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.0.requests.lock().clone()
	}

	pub fn logins(&self) -> usize {
		self.0.logins.load(Ordering::SeqCst)
	}

	pub fn refreshes(&self) -> usize {
		self.0.refreshes.load(Ordering::SeqCst)
	}
}
impl ApiHttpClient for ScriptedHttpClient {
	type Handle = ScriptedHandle;
	type TransportError = ScriptedTransportError;

	fn handle(&self) -> Self::Handle {
		ScriptedHandle(self.0.clone())
	}
}

pub struct ScriptedHandle(Arc<ScriptState>);
impl<'c> AsyncHttpClient<'c> for ScriptedHandle {
	type Error = HttpClientError<ScriptedTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let state = self.0.clone();

		Box::pin(async move {
			match request.uri().path() {
				"/token" => {
					let n = state.logins.fetch_add(1, Ordering::SeqCst) + 1;

					Ok(json_response(
						200,
						token_json(&format!("tok-login-{n}"), &format!("ref-login-{n}")),
					))
				},
				"/refresh" => {
					let n = state.refreshes.fetch_add(1, Ordering::SeqCst) + 1;

					if state.reject_refresh.load(Ordering::SeqCst) {
						return Ok(response(400, "refresh token expired"));
					}

					Ok(json_response(
						200,
						token_json(&format!("tok-refresh-{n}"), &format!("ref-refresh-{n}")),
					))
				},
				path => {
					state.requests.lock().push(RecordedRequest {
						method: request.method().clone(),
						path: path.to_owned(),
						authorization: header(&request, AUTHORIZATION.as_str()),
						content_type: header(&request, CONTENT_TYPE.as_str()),
						body: request.body().clone(),
					});

					let next = state.api.lock().pop_front();

					match next.expect("Protected call was not scripted.") {
						Scripted::Respond(status, body) => Ok(response(status, body)),
						Scripted::Refuse =>
							Err(HttpClientError::Io(IoError::from(ErrorKind::ConnectionRefused))),
						Scripted::TimeOut =>
							Err(HttpClientError::Io(IoError::from(ErrorKind::TimedOut))),
					}
				},
			}
		})
	}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ScriptedMapper;
impl TransportErrorMapper<ScriptedTransportError> for ScriptedMapper {
	fn map_transport_error(&self, error: HttpClientError<ScriptedTransportError>) -> Error {
		map_common_transport_error(error)
	}
}

pub type ScriptedApiClient = ApiClient<ScriptedHttpClient, ScriptedMapper>;

/// Builds a client over `transport` using the fake `http://fake.test` endpoints.
pub fn scripted_client(transport: &ScriptedHttpClient) -> ScriptedApiClient {
	scripted_client_with(transport, config_builder("http://fake.test"))
}

pub fn scripted_client_with(
	transport: &ScriptedHttpClient,
	builder: ClientConfigBuilder,
) -> ScriptedApiClient {
	let config = builder.build().expect("Scripted config should build.");

	ApiClient::with_http_client(config, credentials(), transport.clone(), ScriptedMapper)
		.expect("Scripted client should build.")
}

fn header(request: &HttpRequest, name: &str) -> String {
	request
		.headers()
		.get(name)
		.and_then(|value| value.to_str().ok())
		.unwrap_or_default()
		.to_owned()
}

fn response(status: u16, body: &str) -> HttpResponse {
	let mut response = HttpResponse::new(body.as_bytes().to_vec());

	*response.status_mut() = StatusCode::from_u16(status).expect("Valid scripted status.");

	response
}

fn json_response(status: u16, body: Value) -> HttpResponse {
	response(status, &body.to_string())
}
