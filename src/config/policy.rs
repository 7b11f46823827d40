// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	auth::{Token, TokenSecret},
};

/// Selects how protected requests authenticate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AuthMode {
	/// `Authorization: bearer <token>` from the managed token; a 401 triggers a refresh.
	#[default]
	Bearer,
	/// Static HTTP basic credentials; a 401 is returned to the caller.
	Basic {
		/// Basic-auth user name.
		username: String,
		/// Basic-auth password; redacted from debug output.
		password: TokenSecret,
	},
	/// No `Authorization` header is added; a 401 is returned to the caller.
	Anonymous,
}
impl AuthMode {
	/// Creates a basic-auth mode.
	pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self::Basic { username: username.into(), password: TokenSecret::new(password) }
	}

	/// Returns `true` when a 401 answer should refresh the token and resend.
	pub fn refreshes_on_unauthorized(&self) -> bool {
		matches!(self, Self::Bearer)
	}

	/// Returns `true` when the mode needs the token and refresh endpoints.
	pub fn uses_token_endpoints(&self) -> bool {
		matches!(self, Self::Bearer)
	}

	/// `Authorization` header value for one attempt, or `None` when the header is omitted.
	pub(crate) fn authorization_value(&self, token: &Token) -> Option<String> {
		match self {
			Self::Bearer => Some(token.authorization_value()),
			Self::Basic { username, password } => Some(format!(
				"Basic {}",
				STANDARD.encode(format!("{username}:{}", password.expose()))
			)),
			Self::Anonymous => None,
		}
	}
}

/// Selects how the verb helpers decode responses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
	/// Status code plus the body as text.
	#[default]
	Raw,
	/// Body decoded as a structured API result.
	Structured,
}

/// Policy applied when the refresh endpoint answers with a status other than `200 OK`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshFallback {
	/// Any rejection falls back to a full login with the configured credentials.
	#[default]
	Always,
	/// Only 4xx rejections fall back; server errors surface to the caller.
	OnClientError,
	/// Rejections always surface to the caller.
	Never,
}
impl RefreshFallback {
	/// Returns `true` when a refresh rejected with `status` should fall back to a login.
	pub fn allows(self, status: u16) -> bool {
		match self {
			Self::Always => true,
			Self::OnClientError => (400..500).contains(&status),
			Self::Never => false,
		}
	}
}
