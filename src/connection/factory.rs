//! Resolution of persisted connections into live, provider-specific API clients.

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, ProviderUserId, UserId},
	connection::{Connection, ResolvedConnection},
	handler::Session,
	provider::ApiFactory,
	store::ConnectionStore,
};

/// Resolves connections for one provider and wraps them with the provider's API client.
///
/// | `user_id` | `provider_user_id` | resolves to |
/// |---|---|---|
/// | `None` | `None` | primary connection of the current user |
/// | `Some` | `None` | primary connection of that user |
/// | `Some` | `Some` | that exact connection |
/// | `None` | `Some` | rejected with [`Error::UnsupportedLookup`] |
#[derive(Clone)]
pub struct ConnectionFactory {
	provider_id: ProviderId,
	api: Arc<dyn ApiFactory>,
	store: Arc<dyn ConnectionStore>,
	session: Arc<dyn Session>,
}
impl ConnectionFactory {
	/// Creates a factory bound to `provider_id`.
	pub fn new(
		provider_id: ProviderId,
		api: Arc<dyn ApiFactory>,
		store: Arc<dyn ConnectionStore>,
		session: Arc<dyn Session>,
	) -> Self {
		Self { provider_id, api, store, session }
	}

	/// Provider the factory is bound to.
	pub fn provider_id(&self) -> &ProviderId {
		&self.provider_id
	}

	/// Resolves a connection, failing with [`Error::ConnectionNotFound`] when none matches.
	pub async fn get_connection(
		&self,
		user_id: Option<&UserId>,
		provider_user_id: Option<&ProviderUserId>,
	) -> Result<ResolvedConnection> {
		let connection = match (user_id, provider_user_id) {
			(None, None) => self.current_user_primary_connection().await?,
			(Some(user_id), None) => self.primary_connection(user_id).await?,
			(Some(user_id), Some(provider_user_id)) =>
				self.specific_connection(user_id, provider_user_id).await?,
			(None, Some(_)) =>
				return Err(Error::UnsupportedLookup { provider: self.provider_id.clone() }),
		};
		let api = self.api.create_api(&connection)?;

		Ok(ResolvedConnection { api, connection })
	}

	/// Lenient form of [`ConnectionFactory::get_connection`]: a missing connection is `None`.
	///
	/// Every other failure still propagates.
	pub async fn find(
		&self,
		user_id: Option<&UserId>,
		provider_user_id: Option<&ProviderUserId>,
	) -> Result<Option<ResolvedConnection>> {
		match self.get_connection(user_id, provider_user_id).await {
			Ok(resolved) => Ok(Some(resolved)),
			Err(Error::ConnectionNotFound { .. }) => Ok(None),
			Err(e) => Err(e),
		}
	}

	async fn current_user_primary_connection(&self) -> Result<Connection> {
		match self.session.current_user() {
			Some(user_id) => self.primary_connection(&user_id).await,
			None => Err(self.not_found("the anonymous user".into())),
		}
	}

	async fn primary_connection(&self, user_id: &UserId) -> Result<Connection> {
		self.store
			.get_primary_connection(user_id, &self.provider_id)
			.await?
			.ok_or_else(|| self.not_found(format!("user `{user_id}`")))
	}

	async fn specific_connection(
		&self,
		user_id: &UserId,
		provider_user_id: &ProviderUserId,
	) -> Result<Connection> {
		self.store
			.get_connection(user_id, &self.provider_id, provider_user_id)
			.await?
			.ok_or_else(|| {
				self.not_found(format!("user `{user_id}` and provider user `{provider_user_id}`"))
			})
	}

	fn not_found(&self, lookup: String) -> Error {
		Error::ConnectionNotFound { provider: self.provider_id.clone(), lookup }
	}
}
impl Debug for ConnectionFactory {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ConnectionFactory").field("provider_id", &self.provider_id).finish()
	}
}
