//! foursquare (OAuth 2.0, API v2).

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
pub const ID: &str = "foursquare";

static FIELDS: FieldMap = FieldMap {
	provider_user_id: "user.id",
	access_token: "access_token",
	secret: None,
	display_name: Some(FieldSource::Path("user.firstName")),
	profile_url: Some(FieldSource::Template("https://foursquare.com/user/{}", "user.id")),
	image_url: Some(FieldSource::Path("user.photo")),
};

/// Compiled-in defaults; the application supplies `consumer_key` and `consumer_secret`.
pub fn default_config() -> Map<String, Value> {
	builtin::object(json!({
		"id": ID,
		"name": "foursquare",
		"install": "https://foursquare.com/developers/",
		"oauth": {
			"base_url": "https://api.foursquare.com/v2/",
			"access_token_url": "https://foursquare.com/oauth2/access_token",
			"authorize_url": "https://foursquare.com/oauth2/authenticate",
		},
	}))
}

/// Capability factory.
pub fn capabilities() -> CapabilityFactory {
	builtin::response_integration(&FIELDS, TokenPlacement::Query("oauth_token"))
}
