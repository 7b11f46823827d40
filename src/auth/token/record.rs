//! Immutable bearer token issued by the token or refresh endpoint.

// crates.io
use serde::de::{self, Deserializer, Visitor};
// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Token returned by a successful login or refresh exchange.
///
/// Tokens are never edited in place; every exchange produces a new value that replaces the
/// previous one wholesale. Fields missing from the endpoint response decode as empty strings.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
	/// Token type label reported by the server (usually `bearer`).
	#[serde(default)]
	pub token_type: String,
	/// Access token presented on every protected request.
	#[serde(default)]
	pub access_token: TokenSecret,
	/// Lifetime hint as reported by the server, kept verbatim.
	#[serde(default, deserialize_with = "expires_in_from_string_or_number")]
	pub expires_in: String,
	/// Refresh token exchanged for a new access token once this one expires.
	#[serde(default)]
	pub refresh_token: TokenSecret,
}
impl Token {
	/// Creates a token holding only an access token.
	pub fn with_access_token(access_token: impl Into<String>) -> Self {
		Self { access_token: TokenSecret::new(access_token), ..Default::default() }
	}

	/// Returns `true` while no token has been issued yet.
	pub fn is_empty(&self) -> bool {
		self.access_token.is_empty()
	}

	/// Parses the lifetime hint into a duration when the server sent a whole number of seconds.
	pub fn expires_in_duration(&self) -> Option<Duration> {
		self.expires_in.trim().parse::<i64>().ok().map(Duration::seconds)
	}

	/// Formats the `Authorization` header value for this token.
	pub fn authorization_value(&self) -> String {
		format!("bearer {}", self.access_token.expose())
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("token_type", &self.token_type)
			.field("access_token", &"<redacted>")
			.field("expires_in", &self.expires_in)
			.field("refresh_token", &"<redacted>")
			.finish()
	}
}

fn expires_in_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	struct ExpiresInVisitor;
	impl Visitor<'_> for ExpiresInVisitor {
		type Value = String;

		fn expecting(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("a string or a number of seconds")
		}

		fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
		where
			E: de::Error,
		{
			Ok(value.to_owned())
		}

		fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
		where
			E: de::Error,
		{
			Ok(value)
		}

		fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
		where
			E: de::Error,
		{
			Ok(value.to_string())
		}

		fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
		where
			E: de::Error,
		{
			Ok(value.to_string())
		}

		fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
		where
			E: de::Error,
		{
			Ok(value.to_string())
		}

		fn visit_unit<E>(self) -> Result<Self::Value, E>
		where
			E: de::Error,
		{
			Ok(String::new())
		}
	}

	deserializer.deserialize_any(ExpiresInVisitor)
}
