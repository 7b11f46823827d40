// crates.io
use oauth2::http::{HeaderName, HeaderValue};
// self
use crate::{
	_prelude::*,
	config::{AuthMode, ClientConfig, RefreshFallback, ResponseMode},
};

/// Errors raised while constructing or validating client configurations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ClientConfigError {
	/// Token endpoint is mandatory in bearer mode.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Refresh endpoint is mandatory in bearer mode.
	#[error("Missing refresh endpoint.")]
	MissingRefreshEndpoint,
	/// Endpoints must use HTTP or HTTPS.
	#[error("The {endpoint} endpoint must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// A default header name or value is not valid HTTP.
	#[error("Default header `{name}` is not a valid HTTP header.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
	},
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
	/// Endpoint that exchanges credentials for a token.
	pub token_endpoint: Option<Url>,
	/// Endpoint that exchanges a refresh token for a new token.
	pub refresh_endpoint: Option<Url>,
	/// How protected requests authenticate.
	pub auth_mode: AuthMode,
	/// Skips TLS verification when `true`.
	pub allow_insecure_tls: bool,
	/// Per-request timeout.
	pub timeout: Duration,
	/// Verbose logging toggle.
	pub debug: bool,
	/// Prefix for verb helper paths.
	pub base_url: String,
	/// Decoder used by the verb helpers.
	pub response_mode: ResponseMode,
	/// Refresh rejection policy.
	pub refresh_fallback: RefreshFallback,
	/// Extra headers attached to every protected request.
	pub default_headers: Vec<(String, String)>,
}
impl ClientConfigBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the refresh endpoint.
	pub fn refresh_endpoint(mut self, url: Url) -> Self {
		self.refresh_endpoint = Some(url);

		self
	}

	/// Selects how protected requests authenticate (bearer by default).
	pub fn auth_mode(mut self, mode: AuthMode) -> Self {
		self.auth_mode = mode;

		self
	}

	/// Authenticates protected requests with static HTTP basic credentials.
	pub fn basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
		self.auth_mode(AuthMode::basic(username, password))
	}

	/// Toggles TLS verification bypass.
	pub fn allow_insecure_tls(mut self, allow: bool) -> Self {
		self.allow_insecure_tls = allow;

		self
	}

	/// Sets the per-request timeout; zero or negative keeps the default.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Toggles verbose logging.
	pub fn debug(mut self, debug: bool) -> Self {
		self.debug = debug;

		self
	}

	/// Sets the base URL prepended to verb helper paths.
	pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();

		self
	}

	/// Selects the decoder used by the verb helpers.
	pub fn response_mode(mut self, mode: ResponseMode) -> Self {
		self.response_mode = mode;

		self
	}

	/// Overrides the refresh rejection policy.
	pub fn refresh_fallback(mut self, policy: RefreshFallback) -> Self {
		self.refresh_fallback = policy;

		self
	}

	/// Adds a header attached to every protected request.
	pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.default_headers.push((name.into(), value.into()));

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ClientConfigError> {
		let config = ClientConfig {
			token_endpoint: self.token_endpoint,
			refresh_endpoint: self.refresh_endpoint,
			auth_mode: self.auth_mode,
			allow_insecure_tls: self.allow_insecure_tls,
			timeout: self.timeout,
			debug: self.debug,
			base_url: self.base_url,
			response_mode: self.response_mode,
			refresh_fallback: self.refresh_fallback,
			default_headers: self.default_headers,
		};

		config.validate()?;

		Ok(config)
	}
}

impl ClientConfig {
	/// Validates invariants for configurations built by hand or decoded from files.
	pub fn validate(&self) -> Result<(), ClientConfigError> {
		if self.auth_mode.uses_token_endpoints() {
			if self.token_endpoint.is_none() {
				return Err(ClientConfigError::MissingTokenEndpoint);
			}
			if self.refresh_endpoint.is_none() {
				return Err(ClientConfigError::MissingRefreshEndpoint);
			}
		}
		if let Some(url) = &self.token_endpoint {
			validate_endpoint("token", url)?;
		}
		if let Some(url) = &self.refresh_endpoint {
			validate_endpoint("refresh", url)?;
		}

		for (name, value) in &self.default_headers {
			if HeaderName::from_bytes(name.as_bytes()).is_err()
				|| HeaderValue::from_str(value).is_err()
			{
				return Err(ClientConfigError::InvalidHeader { name: name.clone() });
			}
		}

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ClientConfigError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(ClientConfigError::UnsupportedScheme { endpoint: name, url: url.to_string() }),
	}
}
