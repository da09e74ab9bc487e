//! Static mapping from provider ids to default configs and capability factories.

// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	config::ProviderConfig,
	error::ConfigError,
	provider::{Capabilities, CapabilityFactory, builtin},
};

#[derive(Clone)]
struct CatalogEntry {
	defaults: Option<Map<String, Value>>,
	factory: CapabilityFactory,
}

/// Known provider integrations.
///
/// Entries registered with defaults are built-ins: their configs are merged over the defaults
/// during normalization. Entries without defaults only contribute capabilities, and their
/// configs pass through unchanged.
#[derive(Clone, Default)]
pub struct ProviderCatalog {
	entries: HashMap<ProviderId, CatalogEntry>,
}
impl ProviderCatalog {
	/// Creates an empty catalog.
	pub fn new() -> Self {
		Self::default()
	}

	/// Catalog holding the twitter, facebook, and foursquare integrations.
	pub fn builtin() -> Self {
		builtin::all().into_iter().fold(Self::new(), |catalog, (id, defaults, factory)| {
			catalog.with_builtin(id, defaults, factory)
		})
	}

	/// Registers a built-in provider with compiled-in defaults.
	pub fn with_builtin(
		mut self,
		id: ProviderId,
		defaults: Map<String, Value>,
		factory: CapabilityFactory,
	) -> Self {
		self.entries.insert(id, CatalogEntry { defaults: Some(defaults), factory });

		self
	}

	/// Registers the capabilities of a custom provider.
	pub fn with_integration(mut self, id: ProviderId, factory: CapabilityFactory) -> Self {
		self.entries.insert(id, CatalogEntry { defaults: None, factory });

		self
	}

	/// Compiled-in default config of a built-in provider.
	pub fn default_config(&self, id: &str) -> Option<&Map<String, Value>> {
		self.entries.get(id)?.defaults.as_ref()
	}

	/// Returns true when `id` has compiled-in defaults.
	pub fn is_builtin(&self, id: &str) -> bool {
		self.default_config(id).is_some()
	}

	/// Returns true when `id` has any registered integration.
	pub fn contains(&self, id: &str) -> bool {
		self.entries.contains_key(id)
	}

	/// Builds the capabilities for a normalized provider config.
	pub fn capabilities(&self, config: &ProviderConfig) -> Result<Capabilities> {
		let entry = self
			.entries
			.get(config.id())
			.ok_or_else(|| ConfigError::MissingIntegration { provider: config.id().clone() })?;

		(entry.factory)(config)
	}
}
impl Debug for ProviderCatalog {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let mut ids = self.entries.keys().collect::<Vec<_>>();

		ids.sort_unstable();

		f.debug_struct("ProviderCatalog").field("providers", &ids).finish()
	}
}
