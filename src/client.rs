//! Bearer-token API client: token exchanges, the authenticated request executor, and the verb
//! helpers built on top of it.

pub mod execute;
mod metrics;

mod common;
mod login;
mod refresh;
mod verbs;

pub use execute::*;
pub use metrics::ClientMetrics;

// self
use crate::{
	_prelude::*,
	auth::{CredentialRequest, Token},
	config::ClientConfig,
	error::ConfigError,
	http::{ApiHttpClient, TransportErrorMapper},
	store::{TokenSlot, TokenSnapshot},
};
#[cfg(feature = "reqwest")]
use crate::http::{ReqwestHttpClient, ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestApiClient = ApiClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Calls bearer-protected APIs while managing the token lifecycle for the caller.
///
/// One instance owns exactly one current token. The token is acquired lazily (the first
/// protected call answered with 401 triggers the refresh/login exchange) or eagerly through
/// [`ApiClient::request_token_by_login`]. The HTTP transport and its connection pool are built
/// once and shared by every call; wrap the client in an [`Arc`] to share it across tasks.
///
/// Protected calls must be awaited inside a tokio runtime because the connection backoff uses
/// the tokio timer.
pub struct ApiClient<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Endpoints, timeout, and behavior switches.
	pub config: ClientConfig,
	/// Counters describing logins, refreshes, and retries performed by this client.
	pub metrics: Arc<ClientMetrics>,
	credentials: CredentialRequest,
	token: TokenSlot,
	refresh_guard: AsyncMutex<()>,
}
impl<C, M> ApiClient<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: ClientConfig,
		credentials: CredentialRequest,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		config.validate().map_err(ConfigError::from)?;

		Ok(Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			config,
			metrics: Default::default(),
			credentials,
			token: TokenSlot::default(),
			refresh_guard: AsyncMutex::new(()),
		})
	}

	/// Returns the credentials posted on every login.
	pub fn credentials(&self) -> &CredentialRequest {
		&self.credentials
	}

	/// Returns a copy of the currently held token (empty before the first exchange).
	pub fn token(&self) -> Token {
		Token::clone(&self.token.snapshot().token)
	}

	/// Returns the current token snapshot including its generation and issue instant.
	pub fn token_snapshot(&self) -> TokenSnapshot {
		self.token.snapshot()
	}

	/// Returns when the held token was obtained, if one was ever issued.
	pub fn token_obtained_at(&self) -> Option<OffsetDateTime> {
		self.token.snapshot().obtained_at
	}

	fn store_token(&self, token: Token) -> Token {
		let snapshot = self.token.replace(token);

		Token::clone(&snapshot.token)
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client backed by a reqwest transport built from `config`.
	///
	/// The transport honors the configuration's TLS toggle and timeout.
	pub fn new(config: ClientConfig, credentials: CredentialRequest) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_config(&config)?;

		Self::with_http_client(config, credentials, http_client, ReqwestTransportErrorMapper)
	}
}
impl<C, M> Debug for ApiClient<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("config", &self.config)
			.field("credentials", &self.credentials)
			.field("token_generation", &self.token.generation())
			.finish()
	}
}
