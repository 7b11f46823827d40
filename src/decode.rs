//! Result decoders that turn executor responses into caller-facing results.
//!
//! The executor always yields the raw `http::Response<Vec<u8>>`; a [`ResultDecoder`] chooses how
//! that response is presented. [`RawDecoder`] keeps the body as text, [`StructuredDecoder`]
//! parses the `{HTTPStatus, ErrCode, ErrText, Data}` envelope returned by structured APIs.

// crates.io
use oauth2::{HttpResponse, http::StatusCode};
// self
use crate::{_prelude::*, config::ResponseMode};

/// Field whose presence marks a structured error payload.
const ERROR_MARKER: &str = "ErrText";

/// Result of a protected API call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResult {
	/// HTTP status of the final response.
	#[serde(rename = "HTTPStatus", default)]
	pub http_status: u16,
	/// Application error code; `0` on success.
	#[serde(rename = "ErrCode", default)]
	pub err_code: i64,
	/// Application error text.
	#[serde(rename = "ErrText", default)]
	pub err_text: String,
	/// Payload; raw body text in raw mode, the envelope's `Data` field in structured mode.
	#[serde(rename = "Data", default)]
	pub data: String,
	/// Whether the result came from structured decoding.
	#[serde(skip)]
	pub structured: bool,
}
impl ApiResult {
	/// Returns `true` for a `200 OK` result without an application error code.
	pub fn is_success(&self) -> bool {
		self.http_status == StatusCode::OK.as_u16() && self.err_code == 0
	}
}

/// Strategy that decodes the final response of a protected call.
pub trait ResultDecoder
where
	Self: Send + Sync,
{
	/// Value handed back to the caller.
	type Output;

	/// Decodes the response. Decoding never fails; malformed bodies degrade to best effort.
	fn decode(&self, response: HttpResponse) -> Self::Output;
}

/// Returns the status code and the body as text.
#[derive(Clone, Copy, Debug, Default)]
pub struct RawDecoder;
impl ResultDecoder for RawDecoder {
	type Output = ApiResult;

	fn decode(&self, response: HttpResponse) -> Self::Output {
		let status = response.status().as_u16();

		ApiResult {
			http_status: status,
			data: String::from_utf8_lossy(response.body()).into_owned(),
			..Default::default()
		}
	}
}

/// Decodes the structured `{HTTPStatus, ErrCode, ErrText, Data}` envelope.
#[derive(Clone, Copy, Debug, Default)]
pub struct StructuredDecoder;
impl ResultDecoder for StructuredDecoder {
	type Output = ApiResult;

	fn decode(&self, response: HttpResponse) -> Self::Output {
		let status = response.status();
		let mut result = if status == StatusCode::OK {
			serde_json::from_slice::<ApiResult>(response.body()).unwrap_or_default()
		} else {
			decode_error_payload(status.as_u16(), response.body())
		};

		if result.http_status == 0 {
			result.http_status = status.as_u16();
		}

		result.structured = true;

		result
	}
}

/// Decoder picked at runtime from the configured [`ResponseMode`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ModeDecoder(pub ResponseMode);
impl ResultDecoder for ModeDecoder {
	type Output = ApiResult;

	fn decode(&self, response: HttpResponse) -> Self::Output {
		match self.0 {
			ResponseMode::Raw => RawDecoder.decode(response),
			ResponseMode::Structured => StructuredDecoder.decode(response),
		}
	}
}

fn decode_error_payload(status: u16, body: &[u8]) -> ApiResult {
	let text = String::from_utf8_lossy(body);

	if text.contains(ERROR_MARKER) {
		if let Ok(parsed) = serde_json::from_str::<ApiResult>(&text) {
			return parsed;
		}
	}

	ApiResult { http_status: status, err_code: 1, err_text: text.into_owned(), ..Default::default() }
}
