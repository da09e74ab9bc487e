//! Login handler: maps a provider response onto a provider identity.

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, ProviderUserId},
	handler::{CallbackFuture, HandlerContext, Redirect, Severity},
	oauth::OAuthResponse,
	obs::{self, HandlerKind, HandlerOutcome, HandlerSpan},
	provider::LoginStrategy,
};

/// Finishes a login once the provider identity is known.
///
/// Receives `(provider_id, provider_user_id, response)`.
pub type LoginCallback =
	Arc<dyn Fn(ProviderId, ProviderUserId, OAuthResponse) -> CallbackFuture + Send + Sync>;

/// Wraps a closure as a [`LoginCallback`].
pub fn login_callback<F, Fut>(f: F) -> LoginCallback
where
	F: 'static + Send + Sync + Fn(ProviderId, ProviderUserId, OAuthResponse) -> Fut,
	Fut: 'static + Send + Future<Output = Result<Redirect>>,
{
	Arc::new(
		move |provider_id: ProviderId,
		      provider_user_id: ProviderUserId,
		      response: OAuthResponse|
		      -> CallbackFuture { Box::pin(f(provider_id, provider_user_id, response)) },
	)
}

/// Per-provider handler invoked when the provider redirects back from a login attempt.
#[derive(Clone)]
pub struct LoginHandler {
	provider_id: ProviderId,
	display_name: String,
	strategy: Arc<dyn LoginStrategy>,
	callback: LoginCallback,
	context: HandlerContext,
}
impl LoginHandler {
	/// Creates a handler for `provider_id`.
	pub fn new(
		provider_id: ProviderId,
		display_name: impl Into<String>,
		strategy: Arc<dyn LoginStrategy>,
		callback: LoginCallback,
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

	/// Handles the provider's response; `None` means the provider denied authorization.
	///
	/// A denial flashes a notice and redirects to the login view without invoking the callback.
	pub async fn handle(&self, response: Option<OAuthResponse>) -> Result<Redirect> {
		let span = HandlerSpan::new(HandlerKind::Login, &self.provider_id);

		span.instrument(self.dispatch(response)).await
	}

	async fn dispatch(&self, response: Option<OAuthResponse>) -> Result<Redirect> {
		self.record(HandlerOutcome::Attempt);
		obs::trace_response(HandlerKind::Login, &self.display_name, response.as_ref());

		let Some(response) = response else {
			self.record(HandlerOutcome::Denied);
			self.context.flash(
				format!("Access was denied to your {} account", self.display_name),
				Severity::Error,
			);

			return Ok(Redirect::to(&self.context.config.login_view));
		};
		let result = match self.strategy.get_provider_user_id(&response) {
			Ok(provider_user_id) =>
				(self.callback)(self.provider_id.clone(), provider_user_id, response).await,
			Err(e) => Err(e),
		};
		let outcome =
			if result.is_ok() { HandlerOutcome::Success } else { HandlerOutcome::Failure };

		self.record(outcome);

		result
	}

	fn record(&self, outcome: HandlerOutcome) {
		obs::record_handler_outcome(HandlerKind::Login, &self.provider_id, outcome);
	}
}
impl Debug for LoginHandler {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginHandler")
			.field("provider_id", &self.provider_id)
			.field("display_name", &self.display_name)
			.finish_non_exhaustive()
	}
}
