//! Persisted links between local users and provider identities.

pub mod factory;

pub use factory::*;

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, ProviderUserId, TokenSecret, UserId},
};

/// Live API client built around a connection; downcast with [`ResolvedConnection::api`].
pub type ApiHandle = Arc<dyn Any + Send + Sync>;

/// Persisted link between a local user and one provider identity.
///
/// `(user_id, provider_id, provider_user_id)` is unique. Among the connections a user holds
/// for one provider, the earliest `created_at` is the primary one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
	/// Local user identifier.
	pub user_id: UserId,
	/// Provider the identity belongs to.
	pub provider_id: ProviderId,
	/// Identity assigned by the provider.
	pub provider_user_id: ProviderUserId,
	/// Access token issued by the provider.
	pub access_token: TokenSecret,
	/// Token secret for protocols that sign requests.
	pub secret: Option<TokenSecret>,
	/// Name shown for the provider account.
	pub display_name: Option<String>,
	/// Public profile page.
	pub profile_url: Option<String>,
	/// Avatar image.
	pub image_url: Option<String>,
	/// Instant the connection was established.
	pub created_at: OffsetDateTime,
}

/// Attributes extracted from an OAuth response that are needed to persist a [`Connection`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionValues {
	/// Provider the identity belongs to.
	pub provider_id: ProviderId,
	/// Identity assigned by the provider.
	pub provider_user_id: ProviderUserId,
	/// Access token issued by the provider.
	pub access_token: TokenSecret,
	/// Token secret for protocols that sign requests.
	pub secret: Option<TokenSecret>,
	/// Name shown for the provider account.
	pub display_name: Option<String>,
	/// Public profile page.
	pub profile_url: Option<String>,
	/// Avatar image.
	pub image_url: Option<String>,
}
impl ConnectionValues {
	/// Attaches the values to `user_id`, stamping the creation instant.
	pub fn into_connection(self, user_id: UserId, created_at: OffsetDateTime) -> Connection {
		let ConnectionValues {
			provider_id,
			provider_user_id,
			access_token,
			secret,
			display_name,
			profile_url,
			image_url,
		} = self;

		Connection {
			user_id,
			provider_id,
			provider_user_id,
			access_token,
			secret,
			display_name,
			profile_url,
			image_url,
			created_at,
		}
	}
}

/// Connection resolved by a [`ConnectionFactory`] together with its live API client.
#[derive(Clone)]
pub struct ResolvedConnection {
	/// API client built by the provider integration.
	pub api: ApiHandle,
	/// Persisted fields, copied verbatim.
	pub connection: Connection,
}
impl ResolvedConnection {
	/// Downcasts the API client to the integration's concrete type.
	pub fn api<T>(&self) -> Option<&T>
	where
		T: 'static,
	{
		self.api.downcast_ref::<T>()
	}
}
impl Debug for ResolvedConnection {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ResolvedConnection")
			.field("api", &"..")
			.field("connection", &self.connection)
			.finish()
	}
}
