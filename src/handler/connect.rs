//! Connect handler: maps a provider response onto the attributes of a new connection.

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, UserId},
	connection::ConnectionValues,
	error::IntegrationError,
	handler::{CallbackFuture, HandlerContext, Redirect, Severity},
	oauth::OAuthResponse,
	obs::{self, HandlerKind, HandlerOutcome, HandlerSpan},
	provider::ConnectStrategy,
};

/// Finishes a connect flow; owns persistence and the success redirect.
///
/// Receives `(connection_values, user_id)`; `user_id` is absent unless the caller supplied one.
pub type ConnectCallback =
	Arc<dyn Fn(ConnectionValues, Option<UserId>) -> CallbackFuture + Send + Sync>;

/// Wraps a closure as a [`ConnectCallback`].
pub fn connect_callback<F, Fut>(f: F) -> ConnectCallback
where
	F: 'static + Send + Sync + Fn(ConnectionValues, Option<UserId>) -> Fut,
	Fut: 'static + Send + Future<Output = Result<Redirect>>,
{
	Arc::new(move |values: ConnectionValues, user_id: Option<UserId>| -> CallbackFuture {
		Box::pin(f(values, user_id))
	})
}

/// Per-provider handler invoked when the provider redirects back from a connect attempt.
#[derive(Clone)]
pub struct ConnectHandler {
	provider_id: ProviderId,
	display_name: String,
	strategy: Arc<dyn ConnectStrategy>,
	callback: ConnectCallback,
	context: HandlerContext,
}
impl ConnectHandler {
	/// Creates a handler for `provider_id`.
	pub fn new(
		provider_id: ProviderId,
		display_name: impl Into<String>,
		strategy: Arc<dyn ConnectStrategy>,
		callback: ConnectCallback,
		context: HandlerContext,
	) -> Self {
		Self { provider_id, display_name: display_name.into(), strategy, callback, context }
	}

	/// Provider the handler serves.
	pub fn provider_id(&self) -> &ProviderId {
		&self.provider_id
	}

	/// Name used in user-facing notices.
	pub fn display_name(&self) -> &str {
		&self.display_name
	}

	/// Handles the provider's response for an optional local user.
	///
	/// A denial flashes a notice and redirects to the connect-deny target without invoking the
	/// callback.
	pub async fn handle(
		&self,
		response: Option<OAuthResponse>,
		user_id: Option<UserId>,
	) -> Result<Redirect> {
		let span = HandlerSpan::new(HandlerKind::Connect, &self.provider_id);

		span.instrument(self.dispatch(response, user_id)).await
	}

	async fn dispatch(
		&self,
		response: Option<OAuthResponse>,
		user_id: Option<UserId>,
	) -> Result<Redirect> {
		self.record(HandlerOutcome::Attempt);
		obs::trace_response(HandlerKind::Connect, &self.display_name, response.as_ref());

		let Some(response) = response else {
			self.record(HandlerOutcome::Denied);
			self.context
				.flash(format!("Access was denied by {}", self.display_name), Severity::Error);

			return Ok(Redirect::to(&self.context.config.connect_deny_redirect));
		};
		let result = match self.connection_values(&response) {
			Ok(values) => (self.callback)(values, user_id).await,
			Err(e) => Err(e),
		};
		let outcome =
			if result.is_ok() { HandlerOutcome::Success } else { HandlerOutcome::Failure };

		self.record(outcome);

		result
	}

	fn connection_values(&self, response: &OAuthResponse) -> Result<ConnectionValues> {
		let values = self.strategy.get_connection_values(response)?;

		if values.provider_id != self.provider_id {
			return Err(IntegrationError::ProviderMismatch {
				expected: self.provider_id.clone(),
				actual: values.provider_id,
			}
			.into());
		}

		Ok(values)
	}

	fn record(&self, outcome: HandlerOutcome) {
		obs::record_handler_outcome(HandlerKind::Connect, &self.provider_id, outcome);
	}
}
impl Debug for ConnectHandler {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ConnectHandler")
			.field("provider_id", &self.provider_id)
			.field("display_name", &self.display_name)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{
		auth::{ProviderUserId, TokenSecret},
		config::{AppConfig, CONNECT_DENY_REDIRECT, SocialConfig},
		handler::SilentNotifier,
	};

	type Seen = Arc<RwLock<Vec<(String, Option<UserId>)>>>;

	/// Reads `uid` and labels the values with the wrapped provider id.
	struct UidStrategy(&'static str);
	impl ConnectStrategy for UidStrategy {
		fn get_connection_values(&self, response: &OAuthResponse) -> Result<ConnectionValues> {
			let provider_id = ProviderId::new(self.0).expect("Provider fixture should be valid.");
			let uid = response.text("uid").ok_or_else(|| IntegrationError::MissingField {
				provider: provider_id.clone(),
				field: "uid",
			})?;

			Ok(ConnectionValues {
				provider_id,
				provider_user_id: ProviderUserId::new(uid)
					.expect("Provider user fixture should be valid."),
				access_token: TokenSecret::new("token-1"),
				secret: None,
				display_name: None,
				profile_url: None,
				image_url: None,
			})
		}
	}

	fn handler(seen: Seen) -> ConnectHandler {
		handler_with(seen, UidStrategy("acme"))
	}

	fn handler_with(seen: Seen, strategy: UidStrategy) -> ConnectHandler {
		let app = AppConfig::from_iter([(CONNECT_DENY_REDIRECT, Value::from("/denied"))]);
		let config =
			SocialConfig::from_app_config(&app).expect("Connect fixture config should be valid.");
		let callback = connect_callback(move |values: ConnectionValues, user_id: Option<UserId>| {
			seen.write().push((values.provider_user_id.to_string(), user_id));

			async { Ok(Redirect::to("/connected")) }
		});

		ConnectHandler::new(
			ProviderId::new("acme").expect("Provider fixture should be valid."),
			"Acme",
			Arc::new(strategy),
			callback,
			HandlerContext::new(Arc::new(config), Arc::new(SilentNotifier)),
		)
	}

	#[tokio::test]
	async fn values_and_absent_user_reach_the_callback() {
		let seen = Seen::default();
		let handler = handler(seen.clone());
		let response = OAuthResponse::try_from(json!({ "uid": "123" }))
			.expect("Response fixture should be an object.");
		let redirect =
			handler.handle(Some(response), None).await.expect("Connect should succeed.");

		assert_eq!(redirect, Redirect::to("/connected"));
		assert_eq!(seen.read().as_slice(), [("123".to_owned(), None)]);
	}

	#[tokio::test]
	async fn denial_redirects_to_the_deny_target() {
		let seen = Seen::default();
		let handler = handler(seen.clone());
		let user = UserId::new("42").expect("User fixture should be valid.");
		let redirect =
			handler.handle(None, Some(user)).await.expect("Denial should not be an error.");

		assert_eq!(redirect, Redirect::to("/denied"));
		assert!(seen.read().is_empty());
	}

	#[tokio::test]
	async fn values_for_another_provider_never_reach_the_callback() {
		let seen = Seen::default();
		let handler = handler_with(seen.clone(), UidStrategy("twitter"));
		let response = OAuthResponse::try_from(json!({ "uid": "123" }))
			.expect("Response fixture should be an object.");
		let err = handler
			.handle(Some(response), None)
			.await
			.expect_err("Values labelled with another provider should be rejected.");

		assert!(matches!(
			err,
			Error::Integration(IntegrationError::ProviderMismatch { ref expected, ref actual })
				if expected.as_str() == "acme" && actual.as_str() == "twitter"
		));
		assert!(seen.read().is_empty());
	}
}
