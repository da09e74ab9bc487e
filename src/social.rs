//! One-time wiring of the provider registry.
//!
//! [`SocialBuilder::init`] seeds the global options, normalizes every `SOCIAL_<PROVIDER>` entry
//! of the application config, asks a [`ProviderConfigurator`] to build each provider, and
//! returns the resulting [`Social`] registry. The registry is read-only afterwards.
//!
//! Normalization rules:
//!
//! - Keys that are global options are skipped.
//! - Providers without compiled-in defaults pass through unchanged.
//! - Built-in providers are shallow-merged over their defaults, with the nested `oauth` mapping
//!   merged separately, and the merged mapping is written back into the application config.

// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	config::{
		AppConfig, CONFIG_PREFIX, OAUTH_KEY, ProviderConfig, SocialConfig, is_global_key,
		provider_id_from_key,
	},
	connection::ConnectionFactory,
	error::ConfigError,
	flows::{ConnectFlow, LoginFlow},
	handler::{
		ConnectCallback, ConnectHandler, HandlerContext, LoginCallback, LoginHandler, Notifier,
		Session, SilentNotifier,
	},
	oauth::{OAuthRegistry, RemoteApp},
	obs,
	provider::{Provider, ProviderCatalog},
	store::ConnectionStore,
};

/// Shared collaborators every provider is wired with.
#[derive(Clone)]
pub struct SocialContext {
	/// Global options.
	pub config: Arc<SocialConfig>,
	/// Connection persistence.
	pub store: Arc<dyn ConnectionStore>,
	/// Request-scoped session.
	pub session: Arc<dyn Session>,
	/// Options and notice sink handed to handlers.
	pub handler: HandlerContext,
	/// Known provider integrations.
	pub catalog: ProviderCatalog,
	/// Login callback overriding [`LoginFlow`].
	pub login_callback: Option<LoginCallback>,
	/// Connect callback overriding [`ConnectFlow`].
	pub connect_callback: Option<ConnectCallback>,
}
impl Debug for SocialContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SocialContext")
			.field("config", &self.config)
			.field("catalog", &self.catalog)
			.field("login_callback_set", &self.login_callback.is_some())
			.field("connect_callback_set", &self.connect_callback.is_some())
			.finish_non_exhaustive()
	}
}

/// Builds one [`Provider`] from a normalized provider config.
pub trait ProviderConfigurator: Send + Sync {
	/// Registers the provider's OAuth client in `oauth` and assembles its registry entry.
	fn configure(
		&self,
		context: &SocialContext,
		oauth: &mut OAuthRegistry,
		config: &ProviderConfig,
	) -> Result<(ProviderId, Provider)>;
}

/// Configurator that uses the catalog's capabilities and the default flows.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultConfigurator;
impl ProviderConfigurator for DefaultConfigurator {
	fn configure(
		&self,
		context: &SocialContext,
		oauth: &mut OAuthRegistry,
		config: &ProviderConfig,
	) -> Result<(ProviderId, Provider)> {
		let id = config.id().clone();
		let display_name = config.display_name().to_owned();
		let remote: Arc<dyn RemoteApp> = oauth.remote_app(id.clone(), config.oauth_settings()?)?;
		let capabilities = context.catalog.capabilities(config)?;
		let login_callback = context.login_callback.clone().unwrap_or_else(|| {
			LoginFlow::new(
				display_name.clone(),
				context.store.clone(),
				context.session.clone(),
				context.handler.clone(),
			)
			.into_callback()
		});
		let connect_callback = context.connect_callback.clone().unwrap_or_else(|| {
			ConnectFlow::new(
				display_name.clone(),
				context.store.clone(),
				context.session.clone(),
				context.handler.clone(),
			)
			.into_callback()
		});
		let connection_factory = ConnectionFactory::new(
			id.clone(),
			capabilities.api,
			context.store.clone(),
			context.session.clone(),
		);
		let login_handler = LoginHandler::new(
			id.clone(),
			display_name.clone(),
			capabilities.login,
			login_callback,
			context.handler.clone(),
		);
		let connect_handler = ConnectHandler::new(
			id.clone(),
			display_name,
			capabilities.connect,
			connect_callback,
			context.handler.clone(),
		);
		let provider = Provider::new(
			remote,
			Arc::new(connection_factory),
			Arc::new(login_handler),
			Arc::new(connect_handler),
		);

		Ok((id, provider))
	}
}

/// Provider registry built once at startup.
#[derive(Clone)]
pub struct Social {
	providers: HashMap<ProviderId, Arc<Provider>>,
	config: Arc<SocialConfig>,
	store: Arc<dyn ConnectionStore>,
	oauth: OAuthRegistry,
}
impl Social {
	/// Creates an empty registry.
	pub fn new(config: Arc<SocialConfig>, store: Arc<dyn ConnectionStore>) -> Self {
		Self { providers: HashMap::new(), config, store, oauth: OAuthRegistry::new() }
	}

	/// Inserts `provider` under `id`; a later registration fully replaces an earlier one.
	pub fn register_provider(
		&mut self,
		id: ProviderId,
		provider: Provider,
	) -> Option<Arc<Provider>> {
		self.providers.insert(id, Arc::new(provider))
	}

	/// Looks up a provider by name, ignoring ASCII case; unknown names yield `None`.
	pub fn provider(&self, name: &str) -> Option<&Arc<Provider>> {
		self.providers
			.get(name)
			.or_else(|| self.providers.get(name.to_ascii_lowercase().as_str()))
	}

	/// Iterates over the registered providers.
	pub fn providers(&self) -> impl Iterator<Item = (&ProviderId, &Arc<Provider>)> {
		self.providers.iter()
	}

	/// Number of registered providers.
	pub fn len(&self) -> usize {
		self.providers.len()
	}

	/// Returns true when no provider is registered.
	pub fn is_empty(&self) -> bool {
		self.providers.is_empty()
	}

	/// Global options.
	pub fn config(&self) -> &Arc<SocialConfig> {
		&self.config
	}

	/// Connection persistence.
	pub fn store(&self) -> &Arc<dyn ConnectionStore> {
		&self.store
	}

	/// OAuth client registry.
	pub fn oauth(&self) -> &OAuthRegistry {
		&self.oauth
	}
}
impl Debug for Social {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let mut ids = self.providers.keys().collect::<Vec<_>>();

		ids.sort_unstable();

		f.debug_struct("Social")
			.field("providers", &ids)
			.field("config", &self.config)
			.field("oauth", &self.oauth)
			.finish_non_exhaustive()
	}
}

/// Collects the collaborators and runs the one-time setup.
pub struct SocialBuilder {
	store: Arc<dyn ConnectionStore>,
	session: Arc<dyn Session>,
	notifier: Arc<dyn Notifier>,
	catalog: ProviderCatalog,
	configurator: Arc<dyn ProviderConfigurator>,
	login_callback: Option<LoginCallback>,
	connect_callback: Option<ConnectCallback>,
}
impl SocialBuilder {
	/// Starts a builder with the built-in catalog, silent notices, and the default flows.
	pub fn new(store: Arc<dyn ConnectionStore>, session: Arc<dyn Session>) -> Self {
		Self {
			store,
			session,
			notifier: Arc::new(SilentNotifier),
			catalog: ProviderCatalog::builtin(),
			configurator: Arc::new(DefaultConfigurator),
			login_callback: None,
			connect_callback: None,
		}
	}

	/// Sets the user-facing notice sink.
	pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
		self.notifier = notifier;

		self
	}

	/// Replaces the provider catalog.
	pub fn with_catalog(mut self, catalog: ProviderCatalog) -> Self {
		self.catalog = catalog;

		self
	}

	/// Replaces the provider configurator.
	pub fn with_configurator(mut self, configurator: Arc<dyn ProviderConfigurator>) -> Self {
		self.configurator = configurator;

		self
	}

	/// Uses `callback` for every provider's login handler instead of [`LoginFlow`].
	pub fn with_login_callback(mut self, callback: LoginCallback) -> Self {
		self.login_callback = Some(callback);

		self
	}

	/// Uses `callback` for every provider's connect handler instead of [`ConnectFlow`].
	pub fn with_connect_callback(mut self, callback: ConnectCallback) -> Self {
		self.connect_callback = Some(callback);

		self
	}

	/// Seeds defaults, normalizes provider configs in `app`, and registers every provider.
	///
	/// Any configuration problem aborts initialization.
	pub fn init(self, app: &mut AppConfig) -> Result<Social> {
		app.seed_social_defaults();

		let config = Arc::new(SocialConfig::from_app_config(app)?);
		let provider_configs = normalize_provider_configs(app, &self.catalog)?;
		let context = SocialContext {
			config: config.clone(),
			store: self.store.clone(),
			session: self.session,
			handler: HandlerContext::new(config.clone(), self.notifier),
			catalog: self.catalog,
			login_callback: self.login_callback,
			connect_callback: self.connect_callback,
		};
		let mut oauth = OAuthRegistry::new();
		let mut social = Social::new(config, self.store);

		for provider_config in &provider_configs {
			let (id, provider) =
				self.configurator.configure(&context, &mut oauth, provider_config)?;

			obs::trace_registration(&provider);
			social.register_provider(id, provider);
		}

		social.oauth = oauth;

		Ok(social)
	}
}
impl Debug for SocialBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SocialBuilder").field("catalog", &self.catalog).finish_non_exhaustive()
	}
}

/// Normalizes every provider entry in `app` against `catalog`.
///
/// Built-in entries are rewritten in place with their merged form. Returns the configs in key
/// order.
pub fn normalize_provider_configs(
	app: &mut AppConfig,
	catalog: &ProviderCatalog,
) -> Result<Vec<ProviderConfig>, ConfigError> {
	let keys = app
		.keys()
		.filter(|key| key.starts_with(CONFIG_PREFIX) && !is_global_key(key))
		.map(ToOwned::to_owned)
		.collect::<Vec<_>>();
	let mut configs = Vec::with_capacity(keys.len());

	for key in keys {
		let (Some(provider_id), Some(value)) = (provider_id_from_key(&key), app.get(&key).cloned())
		else {
			continue;
		};
		let Some(defaults) = catalog.default_config(&provider_id) else {
			configs.push(ProviderConfig::from_value(&key, value)?);

			continue;
		};
		let merged = Value::Object(merge_over_defaults(&key, defaults, value)?);

		app.insert(key.clone(), merged.clone());
		configs.push(ProviderConfig::from_value(&key, merged)?);
	}

	Ok(configs)
}

fn merge_over_defaults(
	key: &str,
	defaults: &Map<String, Value>,
	overrides: Value,
) -> Result<Map<String, Value>, ConfigError> {
	let Value::Object(mut overrides) = overrides else {
		return Err(ConfigError::NotAnObject { key: key.into() });
	};
	let Some(Value::Object(oauth_overrides)) = overrides.remove(OAUTH_KEY) else {
		return Err(ConfigError::MissingOAuth { key: key.into() });
	};
	let mut oauth = match defaults.get(OAUTH_KEY) {
		Some(Value::Object(oauth)) => oauth.clone(),
		_ => Map::new(),
	};
	let mut merged = defaults.clone();

	oauth.extend(oauth_overrides);
	merged.extend(overrides);
	merged.insert(OAUTH_KEY.into(), Value::Object(oauth));

	Ok(merged)
}
