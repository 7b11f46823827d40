//! Client-level error types shared by the token exchanges, the request executor, and the
//! transport layer.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request-construction problem; never retried.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Token or refresh endpoint answered with a status other than `200 OK`.
	#[error("The {endpoint} endpoint rejected the token request ({status}): {body}")]
	TokenEndpoint {
		/// Which endpoint produced the response.
		endpoint: TokenEndpoint,
		/// HTTP status code returned by the endpoint.
		status: u16,
		/// Raw response body text.
		body: String,
	},
	/// Token or refresh endpoint answered `200 OK` with a body that is not a token.
	#[error("The {endpoint} endpoint returned a malformed token.")]
	TokenDecode {
		/// Which endpoint produced the response.
		endpoint: TokenEndpoint,
		/// Structured parsing failure, including the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl Error {
	/// Returns `true` when the failure happened while establishing the connection.
	///
	/// Only these failures are eligible for the executor's connection-retry path.
	pub fn is_connection_failure(&self) -> bool {
		matches!(self, Self::Transport(err) if err.is_connection_failure())
	}

	/// Returns the HTTP status attached to a token endpoint rejection, if any.
	pub fn token_endpoint_status(&self) -> Option<u16> {
		match self {
			Self::TokenEndpoint { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Identifies the endpoint involved in a token exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenEndpoint {
	/// Credential login endpoint.
	Login,
	/// Refresh-token exchange endpoint.
	Refresh,
}
impl TokenEndpoint {
	/// Returns a stable label suitable for logs and error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Login => "token",
			Self::Refresh => "refresh",
		}
	}
}
impl Display for TokenEndpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed (malformed method, URL, or header).
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be serialized.")]
	InvalidBody {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// Client configuration failed validation.
	#[error(transparent)]
	Client(#[from] crate::config::ClientConfigError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Connection could not be established or was dropped before a response arrived.
	#[error("Connection to the remote server failed.")]
	Connect {
		/// Transport-specific connection failure.
		#[source]
		source: BoxError,
	},
	/// Request did not complete within the configured timeout.
	#[error("Request timed out.")]
	Timeout {
		/// Transport-specific timeout failure.
		#[source]
		source: BoxError,
	},
	/// Any other network failure reported by the HTTP client.
	#[error("Network error occurred while calling the remote server.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the remote server.")]
	Io(#[source] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific connection failure.
	pub fn connect(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Connect { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}

	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Returns `true` for connection-level failures.
	pub fn is_connection_failure(&self) -> bool {
		match self {
			Self::Connect { .. } => true,
			Self::Io(err) => is_connection_io_kind(err.kind()),
			_ => false,
		}
	}
}
impl From<std::io::Error> for TransportError {
	fn from(e: std::io::Error) -> Self {
		if e.kind() == std::io::ErrorKind::TimedOut {
			Self::timeout(e)
		} else {
			Self::Io(e)
		}
	}
}

/// Returns `true` when any error in `err`'s source chain is a connection-level I/O error.
#[cfg_attr(not(feature = "reqwest"), allow(dead_code))]
pub(crate) fn has_connection_io_source(err: &(dyn StdError + 'static)) -> bool {
	let mut current = err.source();

	while let Some(cause) = current {
		if let Some(io) = cause.downcast_ref::<std::io::Error>() {
			if is_connection_io_kind(io.kind()) {
				return true;
			}
		}

		current = cause.source();
	}

	false
}

fn is_connection_io_kind(kind: std::io::ErrorKind) -> bool {
	use std::io::ErrorKind;

	matches!(
		kind,
		ErrorKind::ConnectionRefused
			| ErrorKind::ConnectionReset
			| ErrorKind::ConnectionAborted
			| ErrorKind::NotConnected
	)
}
