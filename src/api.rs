//! Minimal REST client handed out by the built-in integrations.
//!
//! [`RestApi`] pairs a provider's API base URL with the access token of one connection. It
//! resolves endpoint paths, attaches the token the way the provider expects, and (with the
//! `reqwest` feature) fetches JSON documents. Request signing for OAuth 1.0a APIs is left to
//! the application.

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, TokenSecret},
	connection::Connection,
	error::ConfigError,
};
#[cfg(feature = "reqwest")] use crate::error::TransportError;

/// How the access token travels with API requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenPlacement {
	/// `Authorization: Bearer <token>` header.
	Bearer,
	/// Query parameter with the given name.
	Query(&'static str),
}

/// API client bound to one connection.
#[derive(Clone)]
pub struct RestApi {
	provider: ProviderId,
	base_url: Url,
	access_token: TokenSecret,
	secret: Option<TokenSecret>,
	placement: TokenPlacement,
	#[cfg(feature = "reqwest")]
	client: Option<ReqwestClient>,
}
impl RestApi {
	/// Maximum number of characters kept from an error body.
	pub const BODY_PREVIEW_LIMIT: usize = 256;

	/// Creates a client for `connection` rooted at `base_url`.
	pub fn new(base_url: Url, connection: &Connection, placement: TokenPlacement) -> Self {
		let mut base_url = base_url;

		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		Self {
			provider: connection.provider_id.clone(),
			base_url,
			access_token: connection.access_token.clone(),
			secret: connection.secret.clone(),
			placement,
			#[cfg(feature = "reqwest")]
			client: None,
		}
	}

	/// Shares `client` with [`RestApi::get_json`]; without one, each call builds its own.
	#[cfg(feature = "reqwest")]
	pub fn with_client(mut self, client: ReqwestClient) -> Self {
		self.client = Some(client);

		self
	}

	/// Shared HTTP client, if one was attached.
	#[cfg(feature = "reqwest")]
	pub fn client(&self) -> Option<&ReqwestClient> {
		self.client.as_ref()
	}

	/// Provider the client talks to.
	pub fn provider(&self) -> &ProviderId {
		&self.provider
	}

	/// API base URL (always ends with `/`).
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Access token of the connection.
	pub fn access_token(&self) -> &TokenSecret {
		&self.access_token
	}

	/// Token secret of the connection, for APIs that sign requests.
	pub fn secret(&self) -> Option<&TokenSecret> {
		self.secret.as_ref()
	}

	/// Token placement.
	pub fn placement(&self) -> TokenPlacement {
		self.placement
	}

	/// Resolves `path` against the base URL; query placement appends the token.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		let mut url = self
			.base_url
			.join(path.trim_start_matches('/'))
			.map_err(|e| ConfigError::invalid_url(format!("{}.api_path", self.provider), e))?;

		if let TokenPlacement::Query(name) = self.placement {
			url.query_pairs_mut().append_pair(name, self.access_token.expose());
		}

		Ok(url)
	}

	/// `Authorization` header value for bearer placement.
	pub fn authorization(&self) -> Option<String> {
		match self.placement {
			TokenPlacement::Bearer => Some(format!("Bearer {}", self.access_token.expose())),
			TokenPlacement::Query(_) => None,
		}
	}

	/// Fetches `path` and decodes the body as JSON.
	#[cfg(feature = "reqwest")]
	pub async fn get_json(&self, path: &str) -> Result<Value> {
		let client = match &self.client {
			Some(client) => client.clone(),
			None => default_http_client()?,
		};
		let mut request = client.get(self.endpoint(path)?);

		if let Some(authorization) = self.authorization() {
			request = request.header(reqwest::header::AUTHORIZATION, authorization);
		}

		let response = request.send().await.map_err(TransportError::from)?;
		let status = response.status();
		let body = response.bytes().await.map_err(TransportError::from)?;

		if !status.is_success() {
			let preview = truncate_preview(&String::from_utf8_lossy(&body));

			return Err(TransportError::Status { status: status.as_u16(), body_preview: preview }
				.into());
		}

		let value =
			serde_json::from_slice(&body).map_err(|source| TransportError::Parse { source })?;

		Ok(value)
	}
}
impl Debug for RestApi {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RestApi")
			.field("provider", &self.provider)
			.field("base_url", &self.base_url)
			.field("placement", &self.placement)
			.finish_non_exhaustive()
	}
}

/// Builds the shared HTTP client used by the built-in integrations.
#[cfg(feature = "reqwest")]
pub fn default_http_client() -> Result<ReqwestClient, ConfigError> {
	ReqwestClient::builder().build().map_err(ConfigError::http_client_build)
}

#[cfg(feature = "reqwest")]
fn truncate_preview(body: &str) -> String {
	if body.chars().count() <= RestApi::BODY_PREVIEW_LIMIT {
		return body.to_owned();
	}

	let mut buf = body.chars().take(RestApi::BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::auth::{ProviderUserId, UserId};

	fn connection() -> Connection {
		Connection {
			user_id: UserId::new("42").expect("User fixture should be valid."),
			provider_id: ProviderId::new("facebook").expect("Provider fixture should be valid."),
			provider_user_id: ProviderUserId::new("1234")
				.expect("Provider user fixture should be valid."),
			access_token: TokenSecret::new("token-1"),
			secret: None,
			display_name: None,
			profile_url: None,
			image_url: None,
			created_at: macros::datetime!(2025-01-01 00:00 UTC),
		}
	}

	fn base(url: &str) -> Url {
		Url::parse(url).expect("Base URL fixture should parse.")
	}

	#[test]
	fn endpoints_resolve_below_the_base_path() {
		let api = RestApi::new(
			base("https://graph.facebook.com/v2"),
			&connection(),
			TokenPlacement::Query("access_token"),
		);
		let url = api.endpoint("/me").expect("Endpoint should resolve.");

		assert_eq!(api.base_url().as_str(), "https://graph.facebook.com/v2/");
		assert_eq!(url.as_str(), "https://graph.facebook.com/v2/me?access_token=token-1");
		assert!(api.authorization().is_none());
	}

	#[test]
	fn bearer_placement_keeps_the_token_out_of_urls() {
		let base = base("https://api.twitter.com/1.1/");
		let api = RestApi::new(base, &connection(), TokenPlacement::Bearer);
		let url =
			api.endpoint("account/verify_credentials.json").expect("Endpoint should resolve.");

		assert_eq!(url.query(), None);
		assert_eq!(api.authorization().as_deref(), Some("Bearer token-1"));
		assert!(!format!("{api:?}").contains("token-1"));
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn clients_are_only_held_when_attached() {
		let base = base("https://graph.facebook.com/");
		let api = RestApi::new(base, &connection(), TokenPlacement::Bearer);

		assert!(api.client().is_none());

		let client = default_http_client().expect("HTTP client should build.");

		assert!(api.with_client(client).client().is_some());
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn previews_are_truncated() {
		let long = "x".repeat(RestApi::BODY_PREVIEW_LIMIT + 10);
		let preview = truncate_preview(&long);

		assert_eq!(preview.chars().count(), RestApi::BODY_PREVIEW_LIMIT + 1);
		assert!(preview.ends_with('…'));
		assert_eq!(truncate_preview("short"), "short");
	}
}
