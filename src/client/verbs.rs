//! Convenience helpers for the common HTTP verbs.
//!
//! Path-based helpers prepend [`ClientConfig::base_url`](crate::config::ClientConfig::base_url);
//! the `*_url` variants take absolute URLs. Every helper goes through the executor and decodes
//! with the configured [`ResponseMode`](crate::config::ResponseMode).

// crates.io
use oauth2::http::Method;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	client::{ApiClient, ApiRequest, RequestBody},
	decode::{ApiResult, ModeDecoder},
	http::{ApiHttpClient, TransportErrorMapper},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

impl<C, M> ApiClient<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Sends `GET base_url + path`.
	pub async fn get(&self, path: &str) -> Result<ApiResult> {
		self.get_url(&self.config.resolve(path)).await
	}

	/// Sends `GET url`.
	pub async fn get_url(&self, url: &str) -> Result<ApiResult> {
		self.send_configured(ApiRequest::new(Method::GET, url)).await
	}

	/// Sends `POST base_url + path` with a raw body.
	pub async fn post(&self, path: &str, body: impl Into<RequestBody>) -> Result<ApiResult> {
		self.post_url(&self.config.resolve(path), body).await
	}

	/// Sends `POST url` with a raw body.
	pub async fn post_url(&self, url: &str, body: impl Into<RequestBody>) -> Result<ApiResult> {
		self.send_configured(ApiRequest::new(Method::POST, url).with_body(body)).await
	}

	/// Sends `POST base_url + path` with `value` serialized as JSON.
	pub async fn post_json<T>(&self, path: &str, value: &T) -> Result<ApiResult>
	where
		T: ?Sized + Serialize,
	{
		let body = RequestBody::json(value)?;

		self.post(path, body).await
	}

	/// Sends `POST base_url + path` with URL-encoded form fields.
	pub async fn post_form<K, V>(&self, path: &str, fields: &[(K, V)]) -> Result<ApiResult>
	where
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let encoded = form_urlencoded::Serializer::new(String::new()).extend_pairs(fields).finish();
		let request = ApiRequest::new(Method::POST, self.config.resolve(path))
			.with_body(encoded)
			.with_content_type(FORM_CONTENT_TYPE);

		self.send_configured(request).await
	}

	/// Sends `PUT base_url + path` with a raw body.
	pub async fn put(&self, path: &str, body: impl Into<RequestBody>) -> Result<ApiResult> {
		self.put_url(&self.config.resolve(path), body).await
	}

	/// Sends `PUT url` with a raw body.
	pub async fn put_url(&self, url: &str, body: impl Into<RequestBody>) -> Result<ApiResult> {
		self.send_configured(ApiRequest::new(Method::PUT, url).with_body(body)).await
	}

	/// Sends `PUT base_url + path` with `value` serialized as JSON.
	pub async fn put_json<T>(&self, path: &str, value: &T) -> Result<ApiResult>
	where
		T: ?Sized + Serialize,
	{
		let body = RequestBody::json(value)?;

		self.put(path, body).await
	}

	/// Sends `DELETE base_url + path`.
	pub async fn delete(&self, path: &str) -> Result<ApiResult> {
		self.delete_url(&self.config.resolve(path)).await
	}

	/// Sends `DELETE url`.
	pub async fn delete_url(&self, url: &str) -> Result<ApiResult> {
		self.send_configured(ApiRequest::new(Method::DELETE, url)).await
	}

	async fn send_configured(&self, request: ApiRequest) -> Result<ApiResult> {
		self.send_decoded(request, &ModeDecoder(self.config.response_mode)).await
	}
}
