//! Client configuration consumed by the token exchanges and the request executor.
//!
//! `builder` assembles and validates a [`ClientConfig`]; `policy` holds the small enums that
//! switch client behavior (authentication, response decoding, refresh fallback).

/// Builder API for assembling client configurations.
pub mod builder;
/// Behavior switches carried by the configuration.
pub mod policy;

pub use builder::*;
pub use policy::*;

// self
use crate::_prelude::*;

/// Immutable configuration shared by every call made through one client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
	/// Endpoint that exchanges credentials for a token; required in bearer mode.
	#[serde(default)]
	pub token_endpoint: Option<Url>,
	/// Endpoint that exchanges a refresh token for a new token; required in bearer mode.
	#[serde(default)]
	pub refresh_endpoint: Option<Url>,
	/// How protected requests authenticate.
	#[serde(default)]
	pub auth_mode: AuthMode,
	/// Skips TLS certificate and hostname verification when `true`.
	#[serde(default)]
	pub allow_insecure_tls: bool,
	/// Per-request timeout; non-positive values fall back to [`ClientConfig::DEFAULT_TIMEOUT`].
	#[serde(default)]
	pub timeout: Duration,
	/// Emits request bodies and token lifecycle details at debug level.
	#[serde(default)]
	pub debug: bool,
	/// Prefix prepended to the paths passed to the verb helpers.
	#[serde(default)]
	pub base_url: String,
	/// Decoder used by the verb helpers.
	#[serde(default)]
	pub response_mode: ResponseMode,
	/// What to do when the refresh endpoint rejects a refresh token.
	#[serde(default)]
	pub refresh_fallback: RefreshFallback,
	/// Extra headers attached to every protected request.
	#[serde(default)]
	pub default_headers: Vec<(String, String)>,
}
impl ClientConfig {
	/// Timeout applied when the configured one is zero or negative.
	pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(10);

	/// Creates a new builder.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::new()
	}

	/// Returns the timeout handed to the transport, never zero or negative.
	pub fn effective_timeout(&self) -> std::time::Duration {
		let timeout =
			if self.timeout.is_positive() { self.timeout } else { Self::DEFAULT_TIMEOUT };

		std::time::Duration::try_from(timeout).unwrap_or(std::time::Duration::from_secs(10))
	}

	/// Joins the configured base URL with an API path.
	pub fn resolve(&self, path: &str) -> String {
		format!("{}{path}", self.base_url)
	}
}
