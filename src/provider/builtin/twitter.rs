//! Twitter (OAuth 1.0a).

// crates.io
use serde_json::json;
// self
use crate::{
	_prelude::*,
	api::TokenPlacement,
	provider::{
		CapabilityFactory,
		builtin::{self, FieldMap, FieldSource},
	},
};

/// Provider id.
pub const ID: &str = "twitter";

static FIELDS: FieldMap = FieldMap {
	provider_user_id: "user_id",
	access_token: "oauth_token",
	secret: Some("oauth_token_secret"),
	display_name: Some(FieldSource::Template("@{}", "screen_name")),
	profile_url: Some(FieldSource::Template("https://twitter.com/{}", "screen_name")),
	image_url: None,
};

/// Compiled-in defaults; the application supplies `consumer_key` and `consumer_secret`.
pub fn default_config() -> Map<String, Value> {
	builtin::object(json!({
		"id": ID,
		"name": "Twitter",
		"install": "https://developer.twitter.com/",
		"oauth": {
			"base_url": "https://api.twitter.com/1.1/",
			"request_token_url": "https://api.twitter.com/oauth/request_token",
			"access_token_url": "https://api.twitter.com/oauth/access_token",
			"authorize_url": "https://api.twitter.com/oauth/authenticate",
		},
	}))
}

/// Capability factory.
pub fn capabilities() -> CapabilityFactory {
	builtin::response_integration(&FIELDS, TokenPlacement::Bearer)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		config::{OAuthProtocol, ProviderConfig},
		oauth::OAuthResponse,
	};

	#[test]
	fn reads_oauth1_token_responses() {
		let mut raw = default_config();

		raw["oauth"]["consumer_key"] = json!("client-1");

		let config = ProviderConfig::from_value("SOCIAL_TWITTER", Value::Object(raw))
			.expect("Twitter defaults should validate.");

		assert_eq!(
			config.oauth_settings().expect("Twitter settings should parse.").protocol(),
			OAuthProtocol::OAuth1
		);

		let capabilities = capabilities()(&config).expect("Twitter capabilities should build.");
		let response = OAuthResponse::try_from(json!({
			"user_id": "783214",
			"screen_name": "jane",
			"oauth_token": "t-1",
			"oauth_token_secret": "s-1",
		}))
		.expect("Response fixture should be an object.");
		let values = capabilities
			.connect
			.get_connection_values(&response)
			.expect("Twitter responses should map.");

		assert_eq!(values.provider_user_id.as_ref(), "783214");
		assert_eq!(values.secret.as_ref().map(|s| s.expose()), Some("s-1"));
		assert_eq!(values.display_name.as_deref(), Some("@jane"));
		assert_eq!(values.profile_url.as_deref(), Some("https://twitter.com/jane"));
	}
}
