mod common;

// crates.io
use time::{Duration, OffsetDateTime, macros};
// self
use common::*;
use oauth2_social::{
	auth::TokenSecret,
	connection::Connection,
	store::{ConnectionStore, MemoryStore},
};

const EPOCH: OffsetDateTime = macros::datetime!(2025-06-01 09:00 UTC);

fn connection(user_id: &str, provider_user_id: &str, offset_minutes: i64) -> Connection {
	Connection {
		user_id: user(user_id),
		provider_id: provider("twitter"),
		provider_user_id: provider_user(provider_user_id),
		access_token: TokenSecret::new(format!("token-{provider_user_id}")),
		secret: Some(TokenSecret::new("secret")),
		display_name: None,
		profile_url: None,
		image_url: None,
		created_at: EPOCH + Duration::minutes(offset_minutes),
	}
}

#[tokio::test]
async fn primary_connection_is_the_earliest_one() {
	let store = MemoryStore::default();

	store.save_connection(connection("42", "later", 10)).await.expect("Save should succeed.");
	store.save_connection(connection("42", "first", 0)).await.expect("Save should succeed.");
	store.save_connection(connection("7", "other", -60)).await.expect("Save should succeed.");

	let primary = store
		.get_primary_connection(&user("42"), &provider("twitter"))
		.await
		.expect("Lookup should succeed.")
		.expect("User 42 should hold a connection.");

	assert_eq!(primary.provider_user_id.as_ref(), "first");
	assert!(
		store
			.get_primary_connection(&user("42"), &provider("facebook"))
			.await
			.expect("Lookup should succeed.")
			.is_none()
	);
}

#[tokio::test]
async fn saving_the_same_triple_replaces_attributes_but_keeps_creation_time() {
	let store = MemoryStore::default();

	store.save_connection(connection("42", "1234", 0)).await.expect("Save should succeed.");

	let mut refreshed = connection("42", "1234", 30);

	refreshed.access_token = TokenSecret::new("rotated");
	refreshed.display_name = Some("@jane".into());

	store.save_connection(refreshed).await.expect("Upsert should succeed.");

	let stored = store
		.get_connection(&user("42"), &provider("twitter"), &provider_user("1234"))
		.await
		.expect("Lookup should succeed.")
		.expect("The connection should still exist.");

	assert_eq!(store.len(), 1);
	assert_eq!(stored.access_token.expose(), "rotated");
	assert_eq!(stored.display_name.as_deref(), Some("@jane"));
	assert_eq!(stored.created_at, EPOCH);
}

#[tokio::test]
async fn provider_identities_are_found_across_users() {
	let store = MemoryStore::default();

	store.save_connection(connection("7", "1234", 0)).await.expect("Save should succeed.");
	store.save_connection(connection("42", "5678", 0)).await.expect("Save should succeed.");

	let owner = store
		.find_connection(&provider("twitter"), &provider_user("1234"))
		.await
		.expect("Lookup should succeed.")
		.expect("Identity 1234 should be linked.");

	assert_eq!(owner.user_id, user("7"));
	assert!(
		store
			.find_connection(&provider("facebook"), &provider_user("1234"))
			.await
			.expect("Lookup should succeed.")
			.is_none()
	);
}

#[tokio::test]
async fn removing_returns_the_record_once() {
	let store = MemoryStore::default();

	store.save_connection(connection("42", "1234", 0)).await.expect("Save should succeed.");

	let removed = store
		.remove_connection(&user("42"), &provider("twitter"), &provider_user("1234"))
		.await
		.expect("Removal should succeed.");

	assert_eq!(removed.map(|c| c.user_id), Some(user("42")));
	assert!(store.is_empty());
	assert!(
		store
			.remove_connection(&user("42"), &provider("twitter"), &provider_user("1234"))
			.await
			.expect("Removal should succeed.")
			.is_none()
	);
}

#[tokio::test]
async fn clones_share_the_same_records() {
	let store = MemoryStore::default();
	let clone = store.clone();

	clone.save_connection(connection("42", "1234", 0)).await.expect("Save should succeed.");

	assert_eq!(store.len(), 1);
}
