//! Default login/connect callbacks used when the application does not supply its own.
//!
//! [`LoginFlow`] signs the owner of a known provider identity into the session. [`ConnectFlow`]
//! links a provider identity to a local user and persists the connection. Both read redirect
//! targets from [`SocialConfig`](crate::config::SocialConfig) and the post-auth targets the
//! application stored in the session before starting the OAuth round trip.

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, ProviderUserId, UserId},
	connection::ConnectionValues,
	handler::{
		CallbackFuture, ConnectCallback, HandlerContext, LoginCallback, Redirect, Session,
		Severity,
	},
	oauth::OAuthResponse,
	store::ConnectionStore,
};

/// Logs in the local user linked to a provider identity.
#[derive(Clone)]
pub struct LoginFlow {
	display_name: String,
	store: Arc<dyn ConnectionStore>,
	session: Arc<dyn Session>,
	context: HandlerContext,
}
impl LoginFlow {
	/// Creates the flow for one provider.
	pub fn new(
		display_name: impl Into<String>,
		store: Arc<dyn ConnectionStore>,
		session: Arc<dyn Session>,
		context: HandlerContext,
	) -> Self {
		Self { display_name: display_name.into(), store, session, context }
	}

	/// Finishes the login for `provider_user_id`.
	pub async fn complete(
		&self,
		provider_id: ProviderId,
		provider_user_id: ProviderUserId,
	) -> Result<Redirect> {
		let config = &self.context.config;
		let Some(connection) = self.store.find_connection(&provider_id, &provider_user_id).await?
		else {
			self.context.flash(
				format!("{} account not associated with an existing user", self.display_name),
				Severity::Error,
			);

			return Ok(Redirect::to(&config.login_view));
		};

		if !self.session.log_in(&connection.user_id) {
			self.context.flash(
				format!("Could not log in with your {} account", self.display_name),
				Severity::Error,
			);

			return Ok(Redirect::to(&config.login_view));
		}

		let target = self
			.session
			.pop(&config.post_oauth_login_session_key)
			.unwrap_or_else(|| config.post_login_view.clone());

		Ok(Redirect::to(target))
	}

	/// Converts the flow into a handler callback.
	pub fn into_callback(self) -> LoginCallback {
		let flow = Arc::new(self);

		Arc::new(
			move |provider_id: ProviderId,
			      provider_user_id: ProviderUserId,
			      _: OAuthResponse|
			      -> CallbackFuture {
				let flow = flow.clone();

				Box::pin(async move { flow.complete(provider_id, provider_user_id).await })
			},
		)
	}
}
impl Debug for LoginFlow {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginFlow")
			.field("display_name", &self.display_name)
			.finish_non_exhaustive()
	}
}

/// Persists a new connection for the local user.
#[derive(Clone)]
pub struct ConnectFlow {
	display_name: String,
	store: Arc<dyn ConnectionStore>,
	session: Arc<dyn Session>,
	context: HandlerContext,
}
impl ConnectFlow {
	/// Creates the flow for one provider.
	pub fn new(
		display_name: impl Into<String>,
		store: Arc<dyn ConnectionStore>,
		session: Arc<dyn Session>,
		context: HandlerContext,
	) -> Self {
		Self { display_name: display_name.into(), store, session, context }
	}

	/// Links `values` to `user_id`, or to the session's user when absent.
	pub async fn complete(
		&self,
		values: ConnectionValues,
		user_id: Option<UserId>,
	) -> Result<Redirect> {
		let config = &self.context.config;
		let Some(user_id) = user_id.or_else(|| self.session.current_user()) else {
			return Ok(Redirect::to(&config.login_view));
		};

		if let Some(existing) =
			self.store.find_connection(&values.provider_id, &values.provider_user_id).await?
		{
			if existing.user_id != user_id {
				self.context.flash(
					format!(
						"This {} account is already connected to another user",
						self.display_name
					),
					Severity::Error,
				);

				return Ok(Redirect::to(&config.connect_deny_redirect));
			}

			self.context.flash(
				format!(
					"A connection is already established with your {} account",
					self.display_name
				),
				Severity::Notice,
			);

			return Ok(Redirect::to(self.post_connect_target()));
		}

		let connection = values.into_connection(user_id, OffsetDateTime::now_utc());

		self.store.save_connection(connection).await?;
		self.context
			.flash(format!("Connection established to {}", self.display_name), Severity::Success);

		Ok(Redirect::to(self.post_connect_target()))
	}

	/// Converts the flow into a handler callback.
	pub fn into_callback(self) -> ConnectCallback {
		let flow = Arc::new(self);

		Arc::new(move |values: ConnectionValues, user_id: Option<UserId>| -> CallbackFuture {
			let flow = flow.clone();

			Box::pin(async move { flow.complete(values, user_id).await })
		})
	}

	fn post_connect_target(&self) -> String {
		let config = &self.context.config;

		self.session
			.pop(&config.post_oauth_connect_session_key)
			.unwrap_or_else(|| config.connect_allow_redirect.clone())
	}
}
impl Debug for ConnectFlow {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ConnectFlow")
			.field("display_name", &self.display_name)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::{
		auth::TokenSecret,
		config::{AppConfig, SocialConfig},
		handler::Notifier,
		store::MemoryStore,
	};

	#[derive(Default)]
	struct Recorder(RwLock<Vec<(String, Severity)>>);
	impl Notifier for Recorder {
		fn notify(&self, message: &str, severity: Severity) {
			self.0.write().push((message.to_owned(), severity));
		}
	}

	#[derive(Default)]
	struct FakeSession {
		current: Option<UserId>,
		refuse: bool,
		logged_in: RwLock<Option<UserId>>,
		stash: RwLock<HashMap<String, String>>,
	}
	impl Session for FakeSession {
		fn current_user(&self) -> Option<UserId> {
			self.current.clone()
		}

		fn log_in(&self, user_id: &UserId) -> bool {
			if self.refuse {
				return false;
			}

			*self.logged_in.write() = Some(user_id.clone());

			true
		}

		fn pop(&self, key: &str) -> Option<String> {
			self.stash.write().remove(key)
		}
	}

	fn user(id: &str) -> UserId {
		UserId::new(id).expect("User fixture should be valid.")
	}

	fn values(provider_user_id: &str) -> ConnectionValues {
		ConnectionValues {
			provider_id: ProviderId::new("acme").expect("Provider fixture should be valid."),
			provider_user_id: ProviderUserId::new(provider_user_id)
				.expect("Provider user fixture should be valid."),
			access_token: TokenSecret::new("token-1"),
			secret: None,
			display_name: None,
			profile_url: None,
			image_url: None,
		}
	}

	fn context() -> (HandlerContext, Arc<Recorder>) {
		let config = SocialConfig::from_app_config(&AppConfig::new())
			.expect("Default social config should be valid.");
		let recorder = Arc::new(Recorder::default());

		(HandlerContext::new(Arc::new(config), recorder.clone()), recorder)
	}

	async fn store_with(owner: &str, provider_user_id: &str) -> Arc<MemoryStore> {
		let store = Arc::new(MemoryStore::default());

		store
			.save_connection(
				values(provider_user_id)
					.into_connection(user(owner), macros::datetime!(2025-01-01 00:00 UTC)),
			)
			.await
			.expect("Seeding the memory store should succeed.");

		store
	}

	#[tokio::test]
	async fn login_signs_in_the_owner_and_honors_the_stored_target() {
		let store = store_with("42", "123").await;
		let session = Arc::new(FakeSession::default());
		let (context, _) = context();

		session.stash.write().insert("post_oauth_login_url".into(), "/dashboard".into());

		let flow = LoginFlow::new("Acme", store, session.clone(), context);
		let redirect = flow
			.complete(values("123").provider_id, values("123").provider_user_id)
			.await
			.expect("Login of a linked identity should succeed.");

		assert_eq!(redirect, Redirect::to("/dashboard"));
		assert_eq!(session.logged_in.read().clone(), Some(user("42")));
	}

	#[tokio::test]
	async fn login_of_unknown_identity_returns_to_the_login_view() {
		let store = Arc::new(MemoryStore::default());
		let session = Arc::new(FakeSession::default());
		let (context, recorder) = context();
		let flow = LoginFlow::new("Acme", store, session.clone(), context);
		let redirect = flow
			.complete(values("123").provider_id, values("123").provider_user_id)
			.await
			.expect("Unknown identities should not be errors.");

		assert_eq!(redirect, Redirect::to("/login"));
		assert!(session.logged_in.read().is_none());
		assert_eq!(
			recorder.0.read().as_slice(),
			[("Acme account not associated with an existing user".to_owned(), Severity::Error)]
		);
	}

	#[tokio::test]
	async fn refused_login_returns_to_the_login_view() {
		let store = store_with("42", "123").await;
		let session = Arc::new(FakeSession { refuse: true, ..Default::default() });
		let (context, _) = context();
		let flow = LoginFlow::new("Acme", store, session, context);
		let redirect = flow
			.complete(values("123").provider_id, values("123").provider_user_id)
			.await
			.expect("Refused logins should not be errors.");

		assert_eq!(redirect, Redirect::to("/login"));
	}

	#[tokio::test]
	async fn connect_persists_for_the_current_user() {
		let store = Arc::new(MemoryStore::default());
		let session = Arc::new(FakeSession { current: Some(user("42")), ..Default::default() });
		let (context, recorder) = context();
		let flow = ConnectFlow::new("Acme", store.clone(), session, context);
		let redirect =
			flow.complete(values("123"), None).await.expect("Connect should persist the link.");
		let saved = store
			.get_primary_connection(&user("42"), &values("123").provider_id)
			.await
			.expect("Reading the memory store should succeed.")
			.expect("Connection should be persisted.");

		assert_eq!(redirect, Redirect::to("/profile"));
		assert_eq!(saved.provider_user_id.as_ref(), "123");
		assert_eq!(
			recorder.0.read().as_slice(),
			[("Connection established to Acme".to_owned(), Severity::Success)]
		);
	}

	#[tokio::test]
	async fn connect_without_any_user_redirects_to_login() {
		let store = Arc::new(MemoryStore::default());
		let (context, _) = context();
		let flow =
			ConnectFlow::new("Acme", store.clone(), Arc::new(FakeSession::default()), context);
		let redirect =
			flow.complete(values("123"), None).await.expect("Anonymous connect is not an error.");

		assert_eq!(redirect, Redirect::to("/login"));
		assert!(store.is_empty());
	}

	#[tokio::test]
	async fn connect_rejects_identities_owned_by_another_user() {
		let store = store_with("7", "123").await;
		let (context, recorder) = context();
		let flow =
			ConnectFlow::new("Acme", store.clone(), Arc::new(FakeSession::default()), context);
		let redirect = flow
			.complete(values("123"), Some(user("42")))
			.await
			.expect("Conflicting links are not errors.");

		assert_eq!(redirect, Redirect::to("/profile"));
		assert_eq!(store.len(), 1);
		assert_eq!(recorder.0.read()[0].1, Severity::Error);
	}

	#[tokio::test]
	async fn repeated_connect_is_a_notice() {
		let store = store_with("42", "123").await;
		let (context, recorder) = context();
		let flow =
			ConnectFlow::new("Acme", store.clone(), Arc::new(FakeSession::default()), context);
		let redirect = flow
			.complete(values("123"), Some(user("42")))
			.await
			.expect("Repeated links are not errors.");

		assert_eq!(redirect, Redirect::to("/profile"));
		assert_eq!(store.len(), 1);
		assert_eq!(
			recorder.0.read().as_slice(),
			[(
				"A connection is already established with your Acme account".to_owned(),
				Severity::Notice
			)]
		);
	}
}
