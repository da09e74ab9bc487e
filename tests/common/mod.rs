//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::{collections::HashMap, sync::Arc};
// crates.io
use parking_lot::RwLock;
use serde_json::{Value, json};
// self
use oauth2_social::{
	auth::{ProviderId, ProviderUserId, UserId},
	config::AppConfig,
	handler::{Notifier, Session, Severity},
	oauth::OAuthResponse,
	store::MemoryStore,
};

/// Notifier that records every notice.
#[derive(Debug, Default)]
pub struct RecordingNotifier(RwLock<Vec<(String, Severity)>>);
impl RecordingNotifier {
	pub fn messages(&self) -> Vec<(String, Severity)> {
		self.0.read().clone()
	}
}
impl Notifier for RecordingNotifier {
	fn notify(&self, message: &str, severity: Severity) {
		self.0.write().push((message.to_owned(), severity));
	}
}

/// Session backed by in-memory state.
#[derive(Debug, Default)]
pub struct MemorySession {
	current: RwLock<Option<UserId>>,
	stash: RwLock<HashMap<String, String>>,
}
impl MemorySession {
	pub fn signed_in(user_id: &str) -> Self {
		let session = Self::default();

		*session.current.write() = Some(user(user_id));

		session
	}

	pub fn stash(&self, key: &str, value: &str) {
		self.stash.write().insert(key.into(), value.into());
	}
}
impl Session for MemorySession {
	fn current_user(&self) -> Option<UserId> {
		self.current.read().clone()
	}

	fn log_in(&self, user_id: &UserId) -> bool {
		*self.current.write() = Some(user_id.clone());

		true
	}

	fn pop(&self, key: &str) -> Option<String> {
		self.stash.write().remove(key)
	}
}

pub struct Fixture {
	pub store: Arc<MemoryStore>,
	pub session: Arc<MemorySession>,
	pub notifier: Arc<RecordingNotifier>,
}
impl Fixture {
	pub fn new(session: MemorySession) -> Self {
		Self {
			store: Arc::new(MemoryStore::default()),
			session: Arc::new(session),
			notifier: Arc::new(RecordingNotifier::default()),
		}
	}
}

pub fn provider(id: &str) -> ProviderId {
	ProviderId::new(id).expect("Provider fixture should be valid.")
}

pub fn user(id: &str) -> UserId {
	UserId::new(id).expect("User fixture should be valid.")
}

pub fn provider_user(id: &str) -> ProviderUserId {
	ProviderUserId::new(id).expect("Provider user fixture should be valid.")
}

pub fn response(value: Value) -> OAuthResponse {
	OAuthResponse::try_from(value).expect("Response fixture should be an object.")
}

/// App config with client credentials for the built-in twitter and facebook providers.
pub fn builtin_app_config() -> AppConfig {
	AppConfig::from_iter([
		(
			"SOCIAL_TWITTER",
			json!({ "oauth": { "consumer_key": "tw-key", "consumer_secret": "tw-secret" } }),
		),
		(
			"SOCIAL_FACEBOOK",
			json!({ "oauth": { "consumer_key": "fb-key", "consumer_secret": "fb-secret" } }),
		),
	])
}
