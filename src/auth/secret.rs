//! Redacting wrapper for provider access tokens and token secrets.

// self
use crate::_prelude::*;

/// Provider-issued credential kept out of logs and debug output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl From<&str> for TokenSecret {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for TokenSecret {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Access token plus the optional OAuth1 token secret handed out by a token getter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
	/// Access token value.
	pub token: TokenSecret,
	/// Token secret for protocols that sign requests.
	pub secret: Option<TokenSecret>,
}
impl AccessToken {
	/// Creates a token without a secret.
	pub fn new(token: impl Into<TokenSecret>) -> Self {
		Self { token: token.into(), secret: None }
	}

	/// Attaches the token secret.
	pub fn with_secret(mut self, secret: impl Into<TokenSecret>) -> Self {
		self.secret = Some(secret.into());

		self
	}
}
