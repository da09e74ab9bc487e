//! Facebook (OAuth 2.0, Graph API).

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
pub const ID: &str = "facebook";

// The token response carries no identity; the OAuth client merges the `/me` document into it.
static FIELDS: FieldMap = FieldMap {
	provider_user_id: "user_id",
	access_token: "access_token",
	secret: None,
	display_name: Some(FieldSource::Path("name")),
	profile_url: Some(FieldSource::Path("link")),
	image_url: Some(FieldSource::Template("https://graph.facebook.com/{}/picture", "user_id")),
};

/// Compiled-in defaults; the application supplies `consumer_key` and `consumer_secret`.
pub fn default_config() -> Map<String, Value> {
	builtin::object(json!({
		"id": ID,
		"name": "Facebook",
		"install": "https://developers.facebook.com/",
		"oauth": {
			"base_url": "https://graph.facebook.com/",
			"access_token_url": "/oauth/access_token",
			"authorize_url": "https://www.facebook.com/dialog/oauth",
			"request_token_params": { "scope": "email" },
		},
	}))
}

/// Capability factory.
pub fn capabilities() -> CapabilityFactory {
	builtin::response_integration(&FIELDS, TokenPlacement::Query("access_token"))
}
