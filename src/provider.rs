//! Provider registry entries and the integrations behind them.
//!
//! `capability` defines the hooks an integration implements ([`ApiFactory`], [`LoginStrategy`],
//! [`ConnectStrategy`]). `catalog` maps provider ids to compiled-in default configs and
//! capability factories, and `builtin` ships the twitter/facebook/foursquare integrations.
//! A [`Provider`] bundles a remote client handle with the connection factory and both
//! handlers for one configured provider.

pub mod builtin;
pub mod capability;
pub mod catalog;

pub use capability::*;
pub use catalog::*;

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, ProviderUserId, UserId},
	connection::{ConnectionFactory, ResolvedConnection},
	handler::{ConnectHandler, LoginHandler, Redirect},
	oauth::{AuthorizationRequest, AuthorizedHandler, OAuthResponse, RemoteApp, TokenGetter},
};

/// Registry entry for one configured provider.
///
/// Immutable once built; shared between the [`Social`](crate::social::Social) registry and
/// request-handling code.
#[derive(Clone)]
pub struct Provider {
	remote: Arc<dyn RemoteApp>,
	connection_factory: Arc<ConnectionFactory>,
	login_handler: Arc<LoginHandler>,
	connect_handler: Arc<ConnectHandler>,
}
impl Provider {
	/// Bundles the remote client handle with the provider's factory and handlers.
	pub fn new(
		remote: Arc<dyn RemoteApp>,
		connection_factory: Arc<ConnectionFactory>,
		login_handler: Arc<LoginHandler>,
		connect_handler: Arc<ConnectHandler>,
	) -> Self {
		Self { remote, connection_factory, login_handler, connect_handler }
	}

	/// Provider id the factory and handlers are bound to.
	pub fn id(&self) -> &ProviderId {
		self.connection_factory.provider_id()
	}

	/// Name of the remote client handle.
	pub fn name(&self) -> &str {
		self.remote.name()
	}

	/// Remote client handle.
	pub fn remote(&self) -> &Arc<dyn RemoteApp> {
		&self.remote
	}

	/// Connection factory.
	pub fn connection_factory(&self) -> &Arc<ConnectionFactory> {
		&self.connection_factory
	}

	/// Login handler.
	pub fn login_handler(&self) -> &Arc<LoginHandler> {
		&self.login_handler
	}

	/// Connect handler.
	pub fn connect_handler(&self) -> &Arc<ConnectHandler> {
		&self.connect_handler
	}

	/// Resolves a connection through the factory's lenient form; missing connections are `None`.
	pub async fn get_connection(
		&self,
		user_id: Option<&UserId>,
		provider_user_id: Option<&ProviderUserId>,
	) -> Result<Option<ResolvedConnection>> {
		self.connection_factory.find(user_id, provider_user_id).await
	}

	/// Runs the login handler.
	pub async fn login(&self, response: Option<OAuthResponse>) -> Result<Redirect> {
		self.login_handler.handle(response).await
	}

	/// Runs the connect handler.
	pub async fn connect(
		&self,
		response: Option<OAuthResponse>,
		user_id: Option<UserId>,
	) -> Result<Redirect> {
		self.connect_handler.handle(response, user_id).await
	}

	/// Forwards to [`RemoteApp::tokengetter`].
	pub fn tokengetter(&self, getter: TokenGetter) {
		self.remote.tokengetter(getter)
	}

	/// Forwards to [`RemoteApp::authorized_handler`].
	pub fn authorized_handler(&self, handler: AuthorizedHandler) {
		self.remote.authorized_handler(handler)
	}

	/// Forwards to [`RemoteApp::authorize`].
	pub fn authorize(&self, callback: &Url) -> Result<AuthorizationRequest> {
		self.remote.authorize(callback)
	}
}
impl Debug for Provider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Provider")
			.field("name", &self.remote.name())
			.field("connection_factory", &self.connection_factory)
			.field("login_handler", &self.login_handler)
			.field("connect_handler", &self.connect_handler)
			.finish()
	}
}
impl Display for Provider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "<Provider name={}>", self.remote.name())
	}
}
