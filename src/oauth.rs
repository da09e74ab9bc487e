//! OAuth client registry, remote client handles, and the responses they hand back.
//!
//! The wire protocol itself is out of scope: a [`RemoteApp`] only exposes token-getter and
//! authorized-handler registration plus the authorization redirect. [`OAuthRemoteApp`] is the
//! built-in handle that builds OAuth 2.0 authorization requests (random `state`, optional PKCE
//! S256); OAuth 1.0a providers need an external client implementing [`RemoteApp`].

pub mod remote;
pub mod response;

pub use remote::*;
pub use response::*;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ProviderId},
	config::OAuthSettings,
	error::ConfigError,
	handler::CallbackFuture,
};

/// Returns the access token the application stored for the current request.
pub type TokenGetter = Arc<dyn Fn() -> Option<AccessToken> + Send + Sync>;

/// Receives the provider's OAuth response (or `None` on denial) once the user returns.
pub type AuthorizedHandler = Arc<dyn Fn(Option<OAuthResponse>) -> CallbackFuture + Send + Sync>;

/// Remote OAuth client handle for one provider.
pub trait RemoteApp: Send + Sync {
	/// Provider name the handle was registered under.
	fn name(&self) -> &str;

	/// Registers the function used to look up the current access token.
	fn tokengetter(&self, getter: TokenGetter);

	/// Registers the function that receives the provider's response.
	fn authorized_handler(&self, handler: AuthorizedHandler);

	/// Starts the authorization redirect; the provider returns the user to `callback`.
	fn authorize(&self, callback: &Url) -> Result<AuthorizationRequest>;
}

/// OAuth client registry: one remote app per configured provider.
#[derive(Clone, Debug, Default)]
pub struct OAuthRegistry {
	apps: HashMap<ProviderId, Arc<OAuthRemoteApp>>,
}
impl OAuthRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds and registers the remote app for `name`, replacing any previous one.
	pub fn remote_app(
		&mut self,
		name: ProviderId,
		settings: OAuthSettings,
	) -> Result<Arc<OAuthRemoteApp>, ConfigError> {
		let app = Arc::new(OAuthRemoteApp::new(name.clone(), settings)?);

		self.apps.insert(name, app.clone());

		Ok(app)
	}

	/// Returns the remote app registered for `name`.
	pub fn get(&self, name: &str) -> Option<&Arc<OAuthRemoteApp>> {
		self.apps.get(name)
	}

	/// Number of registered remote apps.
	pub fn len(&self) -> usize {
		self.apps.len()
	}

	/// Returns true when no remote app is registered.
	pub fn is_empty(&self) -> bool {
		self.apps.is_empty()
	}
}
