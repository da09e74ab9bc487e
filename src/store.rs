//! Storage contract and built-in store implementation for connection records.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, ProviderUserId, UserId},
	connection::Connection,
};

/// Boxed future returned by [`ConnectionStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for connection records.
///
/// `(user_id, provider_id, provider_user_id)` identifies a record. The primary connection of a
/// user for a provider is the one with the earliest `created_at`.
pub trait ConnectionStore
where
	Self: Send + Sync,
{
	/// Fetches the primary connection `user_id` holds for `provider_id`.
	fn get_primary_connection<'a>(
		&'a self,
		user_id: &'a UserId,
		provider_id: &'a ProviderId,
	) -> StoreFuture<'a, Option<Connection>>;

	/// Fetches the exact connection identified by the triple.
	fn get_connection<'a>(
		&'a self,
		user_id: &'a UserId,
		provider_id: &'a ProviderId,
		provider_user_id: &'a ProviderUserId,
	) -> StoreFuture<'a, Option<Connection>>;

	/// Fetches the connection of whichever local user holds the provider identity.
	fn find_connection<'a>(
		&'a self,
		provider_id: &'a ProviderId,
		provider_user_id: &'a ProviderUserId,
	) -> StoreFuture<'a, Option<Connection>>;

	/// Persists or replaces the record for the connection's triple.
	fn save_connection(&self, connection: Connection) -> StoreFuture<'_, ()>;

	/// Removes the record identified by the triple, returning it when present.
	fn remove_connection<'a>(
		&'a self,
		user_id: &'a UserId,
		provider_id: &'a ProviderId,
		provider_user_id: &'a ProviderUserId,
	) -> StoreFuture<'a, Option<Connection>>;
}

/// Error type produced by [`ConnectionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Unique key identifying a stored connection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreKey {
	/// Local user component.
	pub user_id: UserId,
	/// Provider component.
	pub provider_id: ProviderId,
	/// Provider identity component.
	pub provider_user_id: ProviderUserId,
}
impl StoreKey {
	/// Builds the key of `connection`.
	pub fn of(connection: &Connection) -> Self {
		Self {
			user_id: connection.user_id.clone(),
			provider_id: connection.provider_id.clone(),
			provider_user_id: connection.provider_user_id.clone(),
		}
	}
}
