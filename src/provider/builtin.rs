//! Built-in provider integrations.
//!
//! Each built-in reads identity and connection attributes straight from the OAuth response the
//! client handed back, following a per-provider [`FieldMap`], and wraps resolved connections in
//! a [`RestApi`] rooted at the provider's `oauth.base_url`.

pub mod facebook;
pub mod foursquare;
pub mod twitter;

// self
use crate::{
	_prelude::*,
	api::{RestApi, TokenPlacement},
	auth::{ProviderId, ProviderUserId, TokenSecret},
	config::ProviderConfig,
	connection::{ApiHandle, Connection, ConnectionValues},
	error::{ConfigError, IntegrationError},
	oauth::OAuthResponse,
	provider::{ApiFactory, Capabilities, CapabilityFactory, ConnectStrategy, LoginStrategy},
};

/// Where a connection attribute comes from in the OAuth response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldSource {
	/// Dotted path read verbatim.
	Path(&'static str),
	/// Dotted path substituted into the `{}` of a template.
	Template(&'static str, &'static str),
}
impl FieldSource {
	fn read(self, response: &OAuthResponse) -> Option<String> {
		match self {
			FieldSource::Path(path) => response.text(path),
			FieldSource::Template(template, path) =>
				response.text(path).map(|value| template.replacen("{}", &value, 1)),
		}
	}
}

/// Response layout of one provider.
#[derive(Clone, Copy, Debug)]
pub struct FieldMap {
	/// Provider-side user id.
	pub provider_user_id: &'static str,
	/// Access token.
	pub access_token: &'static str,
	/// Token secret (OAuth 1.0a).
	pub secret: Option<&'static str>,
	/// Account display name.
	pub display_name: Option<FieldSource>,
	/// Profile page.
	pub profile_url: Option<FieldSource>,
	/// Avatar image.
	pub image_url: Option<FieldSource>,
}

/// Integration driven by a [`FieldMap`].
#[derive(Clone, Debug)]
pub struct ResponseIntegration {
	provider: ProviderId,
	fields: &'static FieldMap,
	api_base: Url,
	placement: TokenPlacement,
	#[cfg(feature = "reqwest")]
	client: ReqwestClient,
}
impl ResponseIntegration {
	/// Builds the integration for a normalized provider config.
	pub fn from_config(
		config: &ProviderConfig,
		fields: &'static FieldMap,
		placement: TokenPlacement,
	) -> Result<Self> {
		let settings = config.oauth_settings()?;
		let api_base = settings.base_endpoint()?.ok_or_else(|| {
			ConfigError::invalid_url("oauth.base_url", url::ParseError::RelativeUrlWithoutBase)
		})?;

		Ok(Self {
			provider: config.id().clone(),
			fields,
			api_base,
			placement,
			#[cfg(feature = "reqwest")]
			client: crate::api::default_http_client()?,
		})
	}

	/// Provider the integration serves.
	pub fn provider(&self) -> &ProviderId {
		&self.provider
	}

	fn required(&self, response: &OAuthResponse, field: &'static str) -> Result<String> {
		response.text(field).ok_or_else(|| {
			IntegrationError::MissingField { provider: self.provider.clone(), field }.into()
		})
	}

	fn provider_user_id(&self, response: &OAuthResponse) -> Result<ProviderUserId> {
		let field = self.fields.provider_user_id;
		let value = self.required(response, field)?;

		ProviderUserId::new(value).map_err(|source| {
			IntegrationError::InvalidIdentifier { provider: self.provider.clone(), field, source }
				.into()
		})
	}
}
impl ApiFactory for ResponseIntegration {
	fn create_api(&self, connection: &Connection) -> Result<ApiHandle> {
		let api = RestApi::new(self.api_base.clone(), connection, self.placement);
		#[cfg(feature = "reqwest")]
		let api = api.with_client(self.client.clone());

		Ok(Arc::new(api))
	}
}
impl LoginStrategy for ResponseIntegration {
	fn get_provider_user_id(&self, response: &OAuthResponse) -> Result<ProviderUserId> {
		self.provider_user_id(response)
	}
}
impl ConnectStrategy for ResponseIntegration {
	fn get_connection_values(&self, response: &OAuthResponse) -> Result<ConnectionValues> {
		let fields = self.fields;

		Ok(ConnectionValues {
			provider_id: self.provider.clone(),
			provider_user_id: self.provider_user_id(response)?,
			access_token: TokenSecret::new(self.required(response, fields.access_token)?),
			secret: fields.secret.and_then(|path| response.text(path)).map(TokenSecret::new),
			display_name: fields.display_name.and_then(|source| source.read(response)),
			profile_url: fields.profile_url.and_then(|source| source.read(response)),
			image_url: fields.image_url.and_then(|source| source.read(response)),
		})
	}
}

/// Capability factory for a [`ResponseIntegration`].
pub fn response_integration(
	fields: &'static FieldMap,
	placement: TokenPlacement,
) -> CapabilityFactory {
	Arc::new(move |config: &ProviderConfig| -> Result<Capabilities> {
		Ok(Capabilities::from_integration(ResponseIntegration::from_config(
			config, fields, placement,
		)?))
	})
}

/// Every built-in as `(id, default config, capability factory)`.
pub fn all() -> Vec<(ProviderId, Map<String, Value>, CapabilityFactory)> {
	[
		(twitter::ID, twitter::default_config(), twitter::capabilities()),
		(facebook::ID, facebook::default_config(), facebook::capabilities()),
		(foursquare::ID, foursquare::default_config(), foursquare::capabilities()),
	]
	.into_iter()
	.filter_map(|(id, defaults, factory)| Some((ProviderId::new(id).ok()?, defaults, factory)))
	.collect()
}

fn object(value: Value) -> Map<String, Value> {
	match value {
		Value::Object(map) => map,
		_ => Map::new(),
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	static FIELDS: FieldMap = FieldMap {
		provider_user_id: "user.id",
		access_token: "access_token",
		secret: None,
		display_name: Some(FieldSource::Path("user.name")),
		profile_url: Some(FieldSource::Template("https://acme.example.com/u/{}", "user.id")),
		image_url: None,
	};

	fn integration() -> ResponseIntegration {
		let config = ProviderConfig::from_value(
			"SOCIAL_ACME",
			json!({
				"oauth": {
					"consumer_key": "client-1",
					"base_url": "https://api.acme.example.com/",
					"authorize_url": "/authorize",
				},
			}),
		)
		.expect("Config fixture should validate.");

		ResponseIntegration::from_config(&config, &FIELDS, TokenPlacement::Bearer)
			.expect("Integration fixture should build.")
	}

	fn response(value: Value) -> OAuthResponse {
		OAuthResponse::try_from(value).expect("Response fixture should be an object.")
	}

	#[test]
	fn connection_values_follow_the_field_map() {
		let values = integration()
			.get_connection_values(&response(json!({
				"access_token": "token-1",
				"user": { "id": 99, "name": "Jane" },
			})))
			.expect("Complete responses should map.");

		assert_eq!(values.provider_user_id.as_ref(), "99");
		assert_eq!(values.access_token.expose(), "token-1");
		assert_eq!(values.display_name.as_deref(), Some("Jane"));
		assert_eq!(values.profile_url.as_deref(), Some("https://acme.example.com/u/99"));
		assert_eq!(values.image_url, None);
		assert_eq!(values.secret, None);
	}

	#[test]
	fn missing_and_invalid_identities_are_integration_errors() {
		let integration = integration();
		let missing = integration
			.get_provider_user_id(&response(json!({ "access_token": "t" })))
			.expect_err("Missing ids should fail.");
		let invalid = integration
			.get_provider_user_id(&response(json!({ "user": { "id": "has space" } })))
			.expect_err("Invalid ids should fail.");

		assert!(matches!(
			missing,
			Error::Integration(IntegrationError::MissingField { field: "user.id", .. })
		));
		assert!(matches!(
			invalid,
			Error::Integration(IntegrationError::InvalidIdentifier { field: "user.id", .. })
		));
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn api_clients_share_the_integration_http_client() {
		let integration = integration();
		let connection = integration
			.get_connection_values(&response(json!({
				"access_token": "token-1",
				"user": { "id": 99 },
			})))
			.expect("Complete responses should map.")
			.into_connection(
				crate::auth::UserId::new("42").expect("User fixture should be valid."),
				OffsetDateTime::UNIX_EPOCH,
			);
		let handle = integration.create_api(&connection).expect("API client should build.");
		let api = handle.downcast_ref::<RestApi>().expect("Built-ins should hand out a RestApi.");

		assert!(api.client().is_some());
		assert_eq!(api.base_url().as_str(), "https://api.acme.example.com/");
	}

	#[test]
	fn configs_without_a_base_url_are_rejected() {
		let config = ProviderConfig::from_value(
			"SOCIAL_ACME",
			json!({ "oauth": { "consumer_key": "k", "authorize_url": "https://a.example.com/" } }),
		)
		.expect("Config fixture should validate.");
		let err = ResponseIntegration::from_config(&config, &FIELDS, TokenPlacement::Bearer)
			.expect_err("Integrations need an API base URL.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidUrl { .. })));
	}
}
