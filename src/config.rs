//! Application configuration store, global social options, and per-provider settings.
//!
//! The application hands the crate a string-keyed [`AppConfig`]. Global options live under
//! the `SOCIAL_` prefix and are seeded with defaults during startup; every other
//! `SOCIAL_<NAME>` key configures the provider `<name>` (see [`ProviderConfig`]).

pub mod provider;

pub use provider::*;

// self
use crate::{_prelude::*, auth::ProviderId, error::ConfigError, obs::HandlerKind};

/// Prefix shared by every key the crate reads.
pub const CONFIG_PREFIX: &str = "SOCIAL_";
/// Optional path prefix for the social routes.
pub const URL_PREFIX: &str = "SOCIAL_URL_PREFIX";
/// Base URL of the application, used to build OAuth callback URLs.
pub const APP_URL: &str = "SOCIAL_APP_URL";
/// Redirect target after a successful connect flow.
pub const CONNECT_ALLOW_REDIRECT: &str = "SOCIAL_CONNECT_ALLOW_REDIRECT";
/// Redirect target after a denied or rejected connect flow.
pub const CONNECT_DENY_REDIRECT: &str = "SOCIAL_CONNECT_DENY_REDIRECT";
/// Enables user-facing notices.
pub const FLASH_MESSAGES: &str = "SOCIAL_FLASH_MESSAGES";
/// Session key holding the redirect target remembered across a connect flow.
pub const POST_OAUTH_CONNECT_SESSION_KEY: &str = "SOCIAL_POST_OAUTH_CONNECT_SESSION_KEY";
/// Session key holding the redirect target remembered across a login flow.
pub const POST_OAUTH_LOGIN_SESSION_KEY: &str = "SOCIAL_POST_OAUTH_LOGIN_SESSION_KEY";
/// Login view used when a provider denies a login attempt.
pub const LOGIN_VIEW: &str = "SOCIAL_LOGIN_VIEW";
/// Fallback redirect target after a successful login.
pub const POST_LOGIN_VIEW: &str = "SOCIAL_POST_LOGIN_VIEW";

/// Global option keys; these are never interpreted as provider configurations.
pub const GLOBAL_KEYS: [&str; 9] = [
	URL_PREFIX,
	APP_URL,
	CONNECT_ALLOW_REDIRECT,
	CONNECT_DENY_REDIRECT,
	FLASH_MESSAGES,
	POST_OAUTH_CONNECT_SESSION_KEY,
	POST_OAUTH_LOGIN_SESSION_KEY,
	LOGIN_VIEW,
	POST_LOGIN_VIEW,
];

/// Returns the documented default for every global option.
pub fn global_defaults() -> [(&'static str, Value); 9] {
	[
		(URL_PREFIX, Value::Null),
		(APP_URL, Value::from("http://127.0.0.1:5000")),
		(CONNECT_ALLOW_REDIRECT, Value::from("/profile")),
		(CONNECT_DENY_REDIRECT, Value::from("/profile")),
		(FLASH_MESSAGES, Value::Bool(true)),
		(POST_OAUTH_CONNECT_SESSION_KEY, Value::from("post_oauth_connect_url")),
		(POST_OAUTH_LOGIN_SESSION_KEY, Value::from("post_oauth_login_url")),
		(LOGIN_VIEW, Value::from("/login")),
		(POST_LOGIN_VIEW, Value::from("/")),
	]
}

/// Returns true when `key` names a global option rather than a provider.
pub fn is_global_key(key: &str) -> bool {
	GLOBAL_KEYS.contains(&key)
}

/// String-keyed application configuration store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppConfig(BTreeMap<String, Value>);
impl AppConfig {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Stores `value` under `key`, returning the previous value.
	pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
		self.0.insert(key.into(), value)
	}

	/// Stores `value` only when `key` is unset. Returns true when the default was applied.
	pub fn set_default(&mut self, key: impl Into<String>, value: Value) -> bool {
		let mut applied = false;

		self.0.entry(key.into()).or_insert_with(|| {
			applied = true;

			value
		});

		applied
	}

	/// Returns true when `key` is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Iterates over all keys in lexical order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	/// Seeds every unset global option with its documented default.
	pub fn seed_social_defaults(&mut self) {
		for (key, value) in global_defaults() {
			self.set_default(key, value);
		}
	}

	fn string(&self, key: &str) -> Result<String, ConfigError> {
		match self.get(key) {
			Some(Value::String(value)) => Ok(value.clone()),
			_ => Err(ConfigError::InvalidGlobal { key: key.into(), expected: "a string" }),
		}
	}

	fn optional_string(&self, key: &str) -> Result<Option<String>, ConfigError> {
		match self.get(key) {
			None | Some(Value::Null) => Ok(None),
			Some(Value::String(value)) => Ok(Some(value.clone())),
			_ => Err(ConfigError::InvalidGlobal { key: key.into(), expected: "a string or null" }),
		}
	}

	fn boolean(&self, key: &str) -> Result<bool, ConfigError> {
		match self.get(key) {
			Some(Value::Bool(value)) => Ok(*value),
			_ => Err(ConfigError::InvalidGlobal { key: key.into(), expected: "a boolean" }),
		}
	}
}
impl<K> FromIterator<(K, Value)> for AppConfig
where
	K: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, Value)>,
	{
		Self(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
	}
}

/// Typed view of the global social options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SocialConfig {
	/// Optional path prefix for the social routes.
	pub url_prefix: Option<String>,
	/// Base URL of the application.
	pub app_url: Url,
	/// Redirect target after a successful connect flow.
	pub connect_allow_redirect: String,
	/// Redirect target after a denied or rejected connect flow.
	pub connect_deny_redirect: String,
	/// Whether user-facing notices are emitted.
	pub flash_messages: bool,
	/// Session key remembering the post-connect redirect target.
	pub post_oauth_connect_session_key: String,
	/// Session key remembering the post-login redirect target.
	pub post_oauth_login_session_key: String,
	/// Login view.
	pub login_view: String,
	/// Fallback redirect target after a successful login.
	pub post_login_view: String,
}
impl SocialConfig {
	/// Reads the global options from an application config.
	///
	/// Unset options fall back to their defaults, so the store does not need to be seeded first.
	pub fn from_app_config(app: &AppConfig) -> Result<Self, ConfigError> {
		let mut seeded = app.clone();

		seeded.seed_social_defaults();

		let app_url = seeded.string(APP_URL)?;

		Ok(Self {
			url_prefix: seeded.optional_string(URL_PREFIX)?,
			app_url: Url::parse(&app_url).map_err(|e| ConfigError::invalid_url(APP_URL, e))?,
			connect_allow_redirect: seeded.string(CONNECT_ALLOW_REDIRECT)?,
			connect_deny_redirect: seeded.string(CONNECT_DENY_REDIRECT)?,
			flash_messages: seeded.boolean(FLASH_MESSAGES)?,
			post_oauth_connect_session_key: seeded.string(POST_OAUTH_CONNECT_SESSION_KEY)?,
			post_oauth_login_session_key: seeded.string(POST_OAUTH_LOGIN_SESSION_KEY)?,
			login_view: seeded.string(LOGIN_VIEW)?,
			post_login_view: seeded.string(POST_LOGIN_VIEW)?,
		})
	}

	/// Builds the OAuth callback URL for a provider's login or connect route.
	///
	/// The route is appended below the path of `app_url`, after the optional prefix.
	pub fn callback_url(&self, kind: HandlerKind, provider: &ProviderId) -> Url {
		let mut path = self.app_url.path().trim_end_matches('/').to_owned();
		let prefix = self.url_prefix.as_deref().map(|prefix| prefix.trim_matches('/'));

		if let Some(prefix) = prefix.filter(|prefix| !prefix.is_empty()) {
			path.push('/');
			path.push_str(prefix);
		}

		path.push_str(&format!("/{kind}/{provider}"));

		let mut url = self.app_url.clone();

		url.set_path(&path);

		url
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn seeding_keeps_explicit_values() {
		let mut app = AppConfig::from_iter([(CONNECT_ALLOW_REDIRECT, Value::from("/account"))]);

		app.seed_social_defaults();

		assert_eq!(app.get(CONNECT_ALLOW_REDIRECT), Some(&Value::from("/account")));
		assert_eq!(app.get(CONNECT_DENY_REDIRECT), Some(&Value::from("/profile")));
		assert_eq!(app.get(URL_PREFIX), Some(&Value::Null));
		assert!(GLOBAL_KEYS.iter().all(|key| app.contains_key(key)));
	}

	#[test]
	fn set_default_reports_whether_it_applied() {
		let mut app = AppConfig::new();

		assert!(app.set_default("SOCIAL_FLASH_MESSAGES", Value::Bool(false)));
		assert!(!app.set_default("SOCIAL_FLASH_MESSAGES", Value::Bool(true)));
		assert_eq!(app.get("SOCIAL_FLASH_MESSAGES"), Some(&Value::Bool(false)));
	}

	#[test]
	fn social_config_defaults_match_seeded_values() {
		let config = SocialConfig::from_app_config(&AppConfig::new())
			.expect("Defaults should produce a valid social config.");

		assert_eq!(config.url_prefix, None);
		assert_eq!(config.app_url.as_str(), "http://127.0.0.1:5000/");
		assert_eq!(config.connect_allow_redirect, "/profile");
		assert_eq!(config.connect_deny_redirect, "/profile");
		assert!(config.flash_messages);
		assert_eq!(config.post_oauth_connect_session_key, "post_oauth_connect_url");
		assert_eq!(config.post_oauth_login_session_key, "post_oauth_login_url");
		assert_eq!(config.login_view, "/login");
		assert_eq!(config.post_login_view, "/");
	}

	#[test]
	fn social_config_rejects_wrong_types() {
		let app = AppConfig::from_iter([(FLASH_MESSAGES, Value::from("yes"))]);
		let err = SocialConfig::from_app_config(&app)
			.expect_err("A string flash flag should be rejected.");

		assert!(matches!(err, ConfigError::InvalidGlobal { expected: "a boolean", .. }));
	}

	#[test]
	fn callback_url_honors_prefix() {
		let app = AppConfig::from_iter([
			(APP_URL, Value::from("https://app.example.com")),
			(URL_PREFIX, Value::from("/social/")),
		]);
		let config =
			SocialConfig::from_app_config(&app).expect("Prefixed config should be valid.");
		let provider = ProviderId::new("twitter").expect("Provider fixture should be valid.");
		let login = config.callback_url(HandlerKind::Login, &provider);
		let connect = SocialConfig::from_app_config(&AppConfig::new())
			.expect("Default config should be valid.")
			.callback_url(HandlerKind::Connect, &provider);

		assert_eq!(login.as_str(), "https://app.example.com/social/login/twitter");
		assert_eq!(connect.as_str(), "http://127.0.0.1:5000/connect/twitter");
	}

	#[test]
	fn callback_url_keeps_the_app_url_path() {
		let provider = ProviderId::new("twitter").expect("Provider fixture should be valid.");
		let cases = [
			(
				"https://example.com/app",
				Some("social"),
				"https://example.com/app/social/login/twitter",
			),
			("https://example.com/app/", None, "https://example.com/app/login/twitter"),
			("https://example.com/app/", Some("/"), "https://example.com/app/login/twitter"),
		];

		for (app_url, prefix, expected) in cases {
			let app = AppConfig::from_iter([
				(APP_URL, Value::from(app_url)),
				(URL_PREFIX, prefix.map_or(Value::Null, Value::from)),
			]);
			let config = SocialConfig::from_app_config(&app).expect("Config should be valid.");

			assert_eq!(config.callback_url(HandlerKind::Login, &provider).as_str(), expected);
		}
	}
}
