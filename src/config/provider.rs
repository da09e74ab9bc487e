//! Per-provider configuration mappings and the OAuth client settings they carry.

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, TokenSecret},
	config::CONFIG_PREFIX,
	error::ConfigError,
};

/// Key of the nested OAuth client mapping inside every provider config.
pub const OAUTH_KEY: &str = "oauth";

/// Derives the provider id from an application config key (`SOCIAL_TWITTER` → `twitter`).
pub fn provider_id_from_key(key: &str) -> Option<String> {
	key.strip_prefix(CONFIG_PREFIX).filter(|rest| !rest.is_empty()).map(str::to_lowercase)
}

/// Validated provider configuration.
///
/// The raw mapping is kept exactly as supplied (or as produced by merging built-in defaults),
/// so downstream configurators can read provider-specific keys the crate knows nothing about.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderConfig {
	id: ProviderId,
	raw: Map<String, Value>,
}
impl ProviderConfig {
	/// Validates `value` as the configuration stored under the app config `key`.
	///
	/// The provider id comes from the mapping's `id` entry when present, otherwise from the key.
	pub fn from_value(key: &str, value: Value) -> Result<Self, ConfigError> {
		let Value::Object(raw) = value else {
			return Err(ConfigError::NotAnObject { key: key.into() });
		};

		if !matches!(raw.get(OAUTH_KEY), Some(Value::Object(_))) {
			return Err(ConfigError::MissingOAuth { key: key.into() });
		}

		let id = match raw.get("id").and_then(Value::as_str) {
			Some(id) => ProviderId::new(id)?,
			None => {
				let derived = provider_id_from_key(key).unwrap_or_else(|| key.to_lowercase());

				ProviderId::new(derived)?
			},
		};

		Ok(Self { id, raw })
	}

	/// Provider identifier.
	pub fn id(&self) -> &ProviderId {
		&self.id
	}

	/// Human-readable provider name used in notices; falls back to the id.
	pub fn display_name(&self) -> &str {
		self.raw.get("name").and_then(Value::as_str).unwrap_or(&self.id)
	}

	/// Returns a top-level entry.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.raw.get(key)
	}

	/// Nested OAuth client mapping.
	pub fn oauth(&self) -> Option<&Map<String, Value>> {
		self.raw.get(OAUTH_KEY).and_then(Value::as_object)
	}

	/// Raw mapping.
	pub fn raw(&self) -> &Map<String, Value> {
		&self.raw
	}

	/// Parses the nested OAuth mapping into typed client settings.
	pub fn oauth_settings(&self) -> Result<OAuthSettings, ConfigError> {
		let oauth = self.raw.get(OAUTH_KEY).cloned().unwrap_or(Value::Null);

		serde_path_to_error::deserialize(oauth).map_err(|source| {
			ConfigError::InvalidOAuthSettings { provider: self.id.clone(), source }
		})
	}

	/// Consumes the config, returning the raw mapping as a JSON value.
	pub fn into_value(self) -> Value {
		Value::Object(self.raw)
	}
}

/// OAuth protocol generation implied by a provider's settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OAuthProtocol {
	/// Three-legged OAuth 1.0a with a request-token step.
	OAuth1,
	/// OAuth 2.0 authorization code grant.
	OAuth2,
}
impl OAuthProtocol {
	/// Returns a stable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			OAuthProtocol::OAuth1 => "oauth1",
			OAuthProtocol::OAuth2 => "oauth2",
		}
	}
}

/// OAuth client parameters read from a provider's `oauth` mapping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthSettings {
	/// Consumer key / client id issued by the provider.
	pub consumer_key: String,
	/// Consumer secret / client secret.
	#[serde(default)]
	pub consumer_secret: Option<TokenSecret>,
	/// Base URL of the provider API; relative endpoints resolve against it.
	#[serde(default)]
	pub base_url: Option<String>,
	/// Request-token endpoint; only OAuth1 providers set it.
	#[serde(default)]
	pub request_token_url: Option<String>,
	/// Access-token endpoint.
	#[serde(default)]
	pub access_token_url: Option<String>,
	/// Authorization endpoint users are redirected to.
	pub authorize_url: String,
	/// Extra parameters appended to the authorization request (e.g. `scope`).
	#[serde(default)]
	pub request_token_params: BTreeMap<String, String>,
	/// Adds a PKCE S256 challenge to OAuth2 authorization requests.
	#[serde(default)]
	pub pkce: bool,
}
impl OAuthSettings {
	/// Returns the protocol implied by the configured endpoints.
	pub fn protocol(&self) -> OAuthProtocol {
		if self.request_token_url.is_some() { OAuthProtocol::OAuth1 } else { OAuthProtocol::OAuth2 }
	}

	/// Parsed API base URL, if configured.
	pub fn base_endpoint(&self) -> Result<Option<Url>, ConfigError> {
		self.base_url
			.as_deref()
			.map(|url| Url::parse(url).map_err(|e| ConfigError::invalid_url("oauth.base_url", e)))
			.transpose()
	}

	/// Authorization endpoint, resolved against the base URL when relative.
	pub fn authorize_endpoint(&self) -> Result<Url, ConfigError> {
		self.resolve("oauth.authorize_url", &self.authorize_url)
	}

	/// Access-token endpoint, resolved against the base URL when relative.
	pub fn access_token_endpoint(&self) -> Result<Option<Url>, ConfigError> {
		self.access_token_url
			.as_deref()
			.map(|url| self.resolve("oauth.access_token_url", url))
			.transpose()
	}

	fn resolve(&self, field: &'static str, value: &str) -> Result<Url, ConfigError> {
		match Url::parse(value) {
			Ok(url) => Ok(url),
			Err(url::ParseError::RelativeUrlWithoutBase) => {
				let base = self.base_endpoint()?.ok_or_else(|| {
					ConfigError::invalid_url(field, url::ParseError::RelativeUrlWithoutBase)
				})?;

				base.join(value).map_err(|e| ConfigError::invalid_url(field, e))
			},
			Err(e) => Err(ConfigError::invalid_url(field, e)),
		}
	}
}
