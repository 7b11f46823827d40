//! Credentials posted to the token endpoint during a login exchange.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Credential record sent as the JSON body of a login exchange.
///
/// The wire names follow the token server's contract (`ClientID`, `ClientSecret`, `Scopes`,
/// `AppUserID`, `RefreshToken`).
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRequest {
	/// OAuth client identifier.
	#[serde(rename = "ClientID")]
	pub client_id: String,
	/// Client secret; redacted from debug output.
	#[serde(rename = "ClientSecret")]
	pub client_secret: TokenSecret,
	/// Space-delimited scopes requested for the token.
	#[serde(rename = "Scopes")]
	pub scopes: String,
	/// Application user the token is minted for, if any.
	#[serde(rename = "AppUserID")]
	pub app_user_id: String,
	/// Refresh token forwarded with the login, if any.
	#[serde(rename = "RefreshToken")]
	pub refresh_token: TokenSecret,
}
impl CredentialRequest {
	/// Creates credentials for the provided client identifier and secret.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
			..Default::default()
		}
	}

	/// Sets the requested scopes.
	pub fn with_scopes(mut self, scopes: impl Into<String>) -> Self {
		self.scopes = scopes.into();

		self
	}

	/// Sets the application user identifier.
	pub fn with_app_user_id(mut self, app_user_id: impl Into<String>) -> Self {
		self.app_user_id = app_user_id.into();

		self
	}

	/// Sets the refresh token forwarded with the login.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
		self.refresh_token = TokenSecret::new(refresh_token);

		self
	}
}
impl Debug for CredentialRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialRequest")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("scopes", &self.scopes)
			.field("app_user_id", &self.app_user_id)
			.field("refresh_token_set", &!self.refresh_token.is_empty())
			.finish()
	}
}

/// Body posted to the refresh endpoint.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct RefreshTokenRequest<'a> {
	#[serde(rename = "RefreshToken")]
	pub(crate) refresh_token: &'a str,
}
