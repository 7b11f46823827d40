//! Maps transport failures into client [`Error`] values.
//!
//! Connection-level failures are recognized structurally (error categories reported by the
//! transport, or a connection-level [`std::io::Error`] anywhere in the source chain), never by
//! matching error message text.

// crates.io
use oauth2::HttpClientError;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};
#[cfg(feature = "reqwest")] use crate::error::has_connection_io_source;

/// Maps HTTP transport failures into client [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a client error.
	///
	/// Implementations decide which failures become [`TransportError::Connect`]; only those are
	/// retried by the request executor.
	fn map_transport_error(&self, error: HttpClientError<E>) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, err: HttpClientError<ReqwestError>) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(*inner),
			other => map_common_transport_error(other),
		}
	}
}

/// Maps the transport-agnostic [`HttpClientError`] variants.
///
/// Custom mappers can delegate to this helper for everything except their own transport
/// variant.
pub fn map_common_transport_error<E>(err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::from(inner).into(),
		HttpClientError::Other(message) => TransportError::Network {
			source: format!("HTTP client error occurred: {message}.").into(),
		}
		.into(),
		_ => TransportError::Network { source: "Unknown HTTP client error occurred.".into() }
			.into(),
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransportError::timeout(err).into();
	}
	if err.is_connect() || has_connection_io_source(&err) {
		return TransportError::connect(err).into();
	}

	TransportError::network(err).into()
}
