//! Crate-level error types shared across providers, handlers, stores, and startup.

// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, ProviderId},
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem; fatal during startup.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure while calling a provider API.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// A provider integration could not interpret an OAuth response.
	#[error(transparent)]
	Integration(#[from] IntegrationError),

	/// No persisted connection matches the requested lookup.
	#[error("No {provider} connection found for {lookup}.")]
	ConnectionNotFound {
		/// Provider the lookup was scoped to.
		provider: ProviderId,
		/// Human-readable description of the lookup.
		lookup: String,
	},
	/// A provider user ID was supplied without the local user ID it belongs to.
	#[error("Resolving a {provider} connection by provider user ID requires a local user ID.")]
	UnsupportedLookup {
		/// Provider the lookup was scoped to.
		provider: ProviderId,
	},
	/// The `state` returned by the provider does not match the one sent.
	#[error("Authorization state mismatch.")]
	StateMismatch,
}

/// Configuration and validation failures raised while wiring providers.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A global option holds a value of the wrong type.
	#[error("Config key `{key}` must be {expected}.")]
	InvalidGlobal {
		/// Offending configuration key.
		key: String,
		/// Expected value shape.
		expected: &'static str,
	},
	/// A provider configuration is not a mapping.
	#[error("Provider config `{key}` must be a mapping.")]
	NotAnObject {
		/// Offending configuration key.
		key: String,
	},
	/// A provider configuration lacks the nested `oauth` mapping.
	#[error("Provider config `{key}` is missing the `oauth` mapping.")]
	MissingOAuth {
		/// Offending configuration key.
		key: String,
	},
	/// The `oauth` mapping could not be parsed into client settings.
	#[error("Provider `{provider}` has invalid OAuth settings.")]
	InvalidOAuthSettings {
		/// Provider identifier.
		provider: ProviderId,
		/// Path-aware parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A configured URL cannot be parsed.
	#[error("Config value `{field}` is not a valid URL.")]
	InvalidUrl {
		/// Field holding the URL.
		field: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// An identifier in the configuration failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] IdentifierError),
	/// No integration is registered for the provider.
	#[error("No integration is registered for provider `{provider}`.")]
	MissingIntegration {
		/// Provider identifier.
		provider: ProviderId,
	},
	/// The remote app cannot drive the provider's OAuth protocol on its own.
	#[error("Provider `{provider}` uses {protocol}; drive its handshake with an external client.")]
	UnsupportedProtocol {
		/// Provider identifier.
		provider: ProviderId,
		/// Protocol label.
		protocol: &'static str,
	},
	/// The remote app received a callback before an authorized handler was registered.
	#[error("Provider `{provider}` has no authorized handler registered.")]
	MissingAuthorizedHandler {
		/// Provider identifier.
		provider: ProviderId,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Builds an [`ConfigError::InvalidUrl`] for the named field.
	pub fn invalid_url(field: impl Into<String>, source: url::ParseError) -> Self {
		Self::InvalidUrl { field: field.into(), source }
	}
}

/// Failures raised by provider integrations while reading OAuth responses.
#[derive(Debug, ThisError)]
pub enum IntegrationError {
	/// The OAuth response lacks a field the integration requires.
	#[error("The {provider} response is missing `{field}`.")]
	MissingField {
		/// Provider identifier.
		provider: ProviderId,
		/// Dotted path of the missing field.
		field: &'static str,
	},
	/// A response field could not be turned into an identifier.
	#[error("The {provider} response field `{field}` is not a valid identifier.")]
	InvalidIdentifier {
		/// Provider identifier.
		provider: ProviderId,
		/// Dotted path of the invalid field.
		field: &'static str,
		/// Validation failure.
		#[source]
		source: IdentifierError,
	},
	/// Connection values were produced for a different provider than the handler serves.
	#[error("The {expected} integration produced connection values for {actual}.")]
	ProviderMismatch {
		/// Provider the handler serves.
		expected: ProviderId,
		/// Provider named by the connection values.
		actual: ProviderId,
	},
}

/// Transport-level failures while calling provider APIs.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Provider API answered with a non-success status.
	#[error("Provider API returned HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Truncated response body.
		body_preview: String,
	},
	/// Provider API returned a body that is not valid JSON.
	#[error("Provider API returned malformed JSON.")]
	Parse {
		/// Parsing failure.
		#[source]
		source: serde_json::Error,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
