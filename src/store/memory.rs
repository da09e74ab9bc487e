//! Thread-safe in-memory [`ConnectionStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, ProviderUserId, UserId},
	connection::Connection,
	store::{ConnectionStore, StoreError, StoreFuture, StoreKey},
};

type StoreMap = Arc<RwLock<BTreeMap<StoreKey, Connection>>>;

/// Thread-safe storage backend that keeps connections in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Number of stored connections.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns true when no connection is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn primary_now(map: StoreMap, user_id: UserId, provider_id: ProviderId) -> Option<Connection> {
		map.read()
			.values()
			.filter(|c| c.user_id == user_id && c.provider_id == provider_id)
			.min_by_key(|c| c.created_at)
			.cloned()
	}

	fn find_now(
		map: StoreMap,
		provider_id: ProviderId,
		provider_user_id: ProviderUserId,
	) -> Option<Connection> {
		map.read()
			.values()
			.filter(|c| c.provider_id == provider_id && c.provider_user_id == provider_user_id)
			.min_by_key(|c| c.created_at)
			.cloned()
	}

	fn save_now(map: StoreMap, connection: Connection) -> Result<(), StoreError> {
		let key = StoreKey::of(&connection);
		let mut guard = map.write();

		match guard.get_mut(&key) {
			// Replacing keeps the original creation instant so primary ordering is stable.
			Some(existing) => {
				let created_at = existing.created_at;

				*existing = Connection { created_at, ..connection };
			},
			None => {
				guard.insert(key, connection);
			},
		}

		Ok(())
	}
}
impl ConnectionStore for MemoryStore {
	fn get_primary_connection<'a>(
		&'a self,
		user_id: &'a UserId,
		provider_id: &'a ProviderId,
	) -> StoreFuture<'a, Option<Connection>> {
		let map = self.0.clone();
		let user_id = user_id.to_owned();
		let provider_id = provider_id.to_owned();

		Box::pin(async move { Ok(Self::primary_now(map, user_id, provider_id)) })
	}

	fn get_connection<'a>(
		&'a self,
		user_id: &'a UserId,
		provider_id: &'a ProviderId,
		provider_user_id: &'a ProviderUserId,
	) -> StoreFuture<'a, Option<Connection>> {
		let map = self.0.clone();
		let key = StoreKey {
			user_id: user_id.to_owned(),
			provider_id: provider_id.to_owned(),
			provider_user_id: provider_user_id.to_owned(),
		};

		Box::pin(async move { Ok(map.read().get(&key).cloned()) })
	}

	fn find_connection<'a>(
		&'a self,
		provider_id: &'a ProviderId,
		provider_user_id: &'a ProviderUserId,
	) -> StoreFuture<'a, Option<Connection>> {
		let map = self.0.clone();
		let provider_id = provider_id.to_owned();
		let provider_user_id = provider_user_id.to_owned();

		Box::pin(async move { Ok(Self::find_now(map, provider_id, provider_user_id)) })
	}

	fn save_connection(&self, connection: Connection) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::save_now(map, connection) })
	}

	fn remove_connection<'a>(
		&'a self,
		user_id: &'a UserId,
		provider_id: &'a ProviderId,
		provider_user_id: &'a ProviderUserId,
	) -> StoreFuture<'a, Option<Connection>> {
		let map = self.0.clone();
		let key = StoreKey {
			user_id: user_id.to_owned(),
			provider_id: provider_id.to_owned(),
			provider_user_id: provider_user_id.to_owned(),
		};

		Box::pin(async move { Ok(map.write().remove(&key)) })
	}
}
