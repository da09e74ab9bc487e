//! Capability hooks every provider integration supplies.
//!
//! A provider integration decides how a persisted connection becomes an API client and how
//! the provider's OAuth response maps onto a provider identity or connection attributes. The
//! hooks are required trait methods, so an integration missing one fails to compile instead of
//! failing at the call site.

// self
use crate::{
	_prelude::*,
	auth::ProviderUserId,
	config::ProviderConfig,
	connection::{ApiHandle, Connection, ConnectionValues},
	oauth::OAuthResponse,
};

/// Builds the live API client wrapped around a resolved connection.
pub trait ApiFactory: Send + Sync {
	/// Creates the API client for `connection`.
	fn create_api(&self, connection: &Connection) -> Result<ApiHandle>;
}

/// Extracts the provider-side identity during a login flow.
pub trait LoginStrategy: Send + Sync {
	/// Returns the provider user ID carried by `response`.
	fn get_provider_user_id(&self, response: &OAuthResponse) -> Result<ProviderUserId>;
}

/// Extracts the attributes of a new connection during a connect flow.
pub trait ConnectStrategy: Send + Sync {
	/// Returns the values needed to persist a connection for `response`.
	fn get_connection_values(&self, response: &OAuthResponse) -> Result<ConnectionValues>;
}

/// Builds the capability set for a validated provider config.
pub type CapabilityFactory = Arc<dyn Fn(&ProviderConfig) -> Result<Capabilities> + Send + Sync>;

/// Full capability set of one provider integration.
#[derive(Clone)]
pub struct Capabilities {
	/// Connection → API client hook.
	pub api: Arc<dyn ApiFactory>,
	/// Login identity hook.
	pub login: Arc<dyn LoginStrategy>,
	/// Connect attributes hook.
	pub connect: Arc<dyn ConnectStrategy>,
}
impl Capabilities {
	/// Shares one integration value across all three hooks.
	pub fn from_integration<T>(integration: T) -> Self
	where
		T: 'static + ApiFactory + LoginStrategy + ConnectStrategy,
	{
		let shared = Arc::new(integration);

		Self { api: shared.clone(), login: shared.clone(), connect: shared }
	}
}
impl Debug for Capabilities {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Capabilities(..)")
	}
}
