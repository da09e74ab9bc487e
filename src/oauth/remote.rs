//! Built-in remote client handle that builds OAuth 2.0 authorization redirects.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ProviderId},
	config::{OAuthProtocol, OAuthSettings},
	error::ConfigError,
	handler::Redirect,
	oauth::{AuthorizedHandler, OAuthResponse, RemoteApp, TokenGetter},
};

const STATE_LEN: usize = 32;
const PKCE_VERIFIER_LEN: usize = 64;

/// Authorization redirect produced by [`RemoteApp::authorize`].
///
/// Persist `state` (and the PKCE verifier, when present) in the user's session so the
/// callback can validate the round trip and complete the token exchange.
#[derive(Clone)]
pub struct AuthorizationRequest {
	/// Fully-formed authorization URL to send the user to.
	pub url: Url,
	/// Callback URL the provider returns the user to.
	pub redirect_uri: Url,
	/// Opaque state value that must round-trip via the callback.
	pub state: String,
	code_verifier: Option<String>,
}
impl AuthorizationRequest {
	/// PKCE verifier to present during the token exchange.
	pub fn code_verifier(&self) -> Option<&str> {
		self.code_verifier.as_deref()
	}

	/// Validates the returned `state` parameter after the authorization redirect.
	pub fn validate_state(&self, returned_state: &str) -> Result<()> {
		if returned_state == self.state { Ok(()) } else { Err(Error::StateMismatch) }
	}

	/// Redirect that sends the user to the provider.
	pub fn redirect(&self) -> Redirect {
		Redirect::to(self.url.as_str())
	}
}
impl Debug for AuthorizationRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationRequest")
			.field("url", &self.url)
			.field("redirect_uri", &self.redirect_uri)
			.field("state", &self.state)
			.field("code_verifier_set", &self.code_verifier.is_some())
			.finish()
	}
}

/// Remote app backed by a provider's [`OAuthSettings`].
pub struct OAuthRemoteApp {
	name: ProviderId,
	settings: OAuthSettings,
	authorize_endpoint: Url,
	token_getter: RwLock<Option<TokenGetter>>,
	authorized: RwLock<Option<AuthorizedHandler>>,
}
impl OAuthRemoteApp {
	/// Validates the settings' endpoints and builds the handle.
	pub fn new(name: ProviderId, settings: OAuthSettings) -> Result<Self, ConfigError> {
		let authorize_endpoint = settings.authorize_endpoint()?;

		settings.base_endpoint()?;
		settings.access_token_endpoint()?;

		Ok(Self {
			name,
			settings,
			authorize_endpoint,
			token_getter: RwLock::new(None),
			authorized: RwLock::new(None),
		})
	}

	/// Client settings the handle was built from.
	pub fn settings(&self) -> &OAuthSettings {
		&self.settings
	}

	/// Resolved authorization endpoint.
	pub fn authorize_endpoint(&self) -> &Url {
		&self.authorize_endpoint
	}

	/// Looks up the current access token through the registered token getter.
	pub fn token(&self) -> Option<AccessToken> {
		let getter = self.token_getter.read().clone()?;

		getter()
	}

	/// Hands the provider's response to the registered authorized handler.
	pub async fn handle_authorized(&self, response: Option<OAuthResponse>) -> Result<Redirect> {
		let handler = self
			.authorized
			.read()
			.clone()
			.ok_or_else(|| ConfigError::MissingAuthorizedHandler { provider: self.name.clone() })?;

		handler(response).await
	}

	fn build_authorize_url(&self, callback: &Url, state: &str, pkce: Option<&PkcePair>) -> Url {
		let mut url = self.authorize_endpoint.clone();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("response_type", "code");
		pairs.append_pair("client_id", &self.settings.consumer_key);
		pairs.append_pair("redirect_uri", callback.as_str());

		for (key, value) in &self.settings.request_token_params {
			pairs.append_pair(key, value);
		}

		pairs.append_pair("state", state);

		if let Some(pkce) = pkce {
			pairs.append_pair("code_challenge", &pkce.challenge);
			pairs.append_pair("code_challenge_method", "S256");
		}

		drop(pairs);

		url
	}
}
impl RemoteApp for OAuthRemoteApp {
	fn name(&self) -> &str {
		&self.name
	}

	fn tokengetter(&self, getter: TokenGetter) {
		*self.token_getter.write() = Some(getter);
	}

	fn authorized_handler(&self, handler: AuthorizedHandler) {
		*self.authorized.write() = Some(handler);
	}

	fn authorize(&self, callback: &Url) -> Result<AuthorizationRequest> {
		let protocol = self.settings.protocol();

		if protocol == OAuthProtocol::OAuth1 {
			return Err(ConfigError::UnsupportedProtocol {
				provider: self.name.clone(),
				protocol: protocol.as_str(),
			}
			.into());
		}

		let state = random_string(STATE_LEN);
		let pkce = self.settings.pkce.then(PkcePair::generate);
		let url = self.build_authorize_url(callback, &state, pkce.as_ref());

		Ok(AuthorizationRequest {
			url,
			redirect_uri: callback.clone(),
			state,
			code_verifier: pkce.map(|pair| pair.verifier),
		})
	}
}
impl Debug for OAuthRemoteApp {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthRemoteApp")
			.field("name", &self.name)
			.field("settings", &self.settings)
			.field("token_getter_set", &self.token_getter.read().is_some())
			.field("authorized_handler_set", &self.authorized.read().is_some())
			.finish()
	}
}

struct PkcePair {
	verifier: String,
	challenge: String,
}
impl PkcePair {
	fn generate() -> Self {
		let verifier = random_string(PKCE_VERIFIER_LEN);
		let challenge = compute_pkce_challenge(&verifier);

		Self { verifier, challenge }
	}
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

fn compute_pkce_challenge(verifier: &str) -> String {
	URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}
