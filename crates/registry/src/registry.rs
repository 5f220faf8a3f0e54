use std::fmt;
use std::sync::{Arc, OnceLock};

use lumen_plugin::{PluginRegistry, TypeHandle};
use tracing::{debug, info};

use crate::adapter::{FactoryTable, InstanceAdapter, PrimAdapter};
use crate::bridge;
use crate::config::RegistryConfig;
use crate::discover::{PRIM_ADAPTER_BASE, discover};
use crate::error::ConstructError;
use crate::key::{AdapterKey, is_reserved};
use crate::mapping::{DiscoveryReport, Mapping, MappingTable};
use crate::sources::RegistrySources;

/// Resolves prim type keys to adapter implementations.
///
/// The mapping table is built on first access and never changes afterwards.
/// Concurrent first callers block until the single build finishes; later
/// reads take no locks. [`AdapterRegistry::construct`] manufactures a fresh
/// adapter on every call and keeps no instances.
pub struct AdapterRegistry {
	sources: RegistrySources,
	config: RegistryConfig,
	base: TypeHandle,
	table: OnceLock<MappingTable>,
}

impl AdapterRegistry {
	pub fn new(sources: RegistrySources, config: RegistryConfig) -> Self {
		Self {
			sources,
			config,
			base: TypeHandle::from(PRIM_ADAPTER_BASE),
			table: OnceLock::new(),
		}
	}

	/// Discovers adapters under `base` instead of [`PRIM_ADAPTER_BASE`].
	pub fn with_base(mut self, base: impl Into<TypeHandle>) -> Self {
		self.base = base.into();
		self
	}

	/// Returns the process-wide registry.
	///
	/// Wired to [`PluginRegistry::global`], [`FactoryTable::global`] and
	/// [`RegistryConfig::global`]. The table itself is still built lazily.
	pub fn global() -> &'static AdapterRegistry {
		static GLOBAL: OnceLock<AdapterRegistry> = OnceLock::new();
		GLOBAL.get_or_init(|| {
			let sources = RegistrySources::from_plugins(PluginRegistry::global(), FactoryTable::global());
			AdapterRegistry::new(sources, RegistryConfig::global())
		})
	}

	pub fn config(&self) -> RegistryConfig {
		self.config
	}

	/// True once the table has been built.
	pub fn is_built(&self) -> bool {
		self.table.get().is_some()
	}

	/// The mapping table, building it if needed.
	pub fn table(&self) -> &MappingTable {
		self.table.get_or_init(|| self.build_table())
	}

	fn build_table(&self) -> MappingTable {
		let sources = &self.sources;
		let discovery = discover(&*sources.types, &*sources.modules, &self.base, self.config);
		let table = MappingTable::build(discovery, &*sources.types, &*sources.schema);
		info!(
			base = %self.base,
			keys = table.len(),
			issues = table.report().issues().len(),
			"adapter registry built"
		);
		table
	}

	/// True for reserved keys and mapped keys.
	pub fn has_key(&self, key: &str) -> bool {
		let table = self.table();
		is_reserved(key) || table.contains_key(key)
	}

	/// Every mapped key, lexicographically ordered. Reserved keys are not
	/// listed unless something maps them explicitly.
	pub fn keys(&self) -> &[AdapterKey] {
		self.table().keys()
	}

	/// The entry for `key` and how it was mapped.
	pub fn resolve(&self, key: &str) -> Option<&Mapping> {
		self.table().get(key)
	}

	pub fn report(&self) -> &DiscoveryReport {
		self.table().report()
	}

	pub fn len(&self) -> usize {
		self.table().len()
	}

	pub fn is_empty(&self) -> bool {
		self.table().is_empty()
	}

	/// Manufactures a new adapter for `key`.
	///
	/// Reserved keys always succeed without touching the table. Otherwise the
	/// key is looked up, the owning plugin loaded and its factory invoked; the
	/// first failing step ends the call with a [`ConstructError`].
	pub fn construct(&self, key: &str) -> Result<Arc<dyn PrimAdapter>, ConstructError> {
		if is_reserved(key) {
			return Ok(Arc::new(InstanceAdapter));
		}

		let Some((key, mapping)) = self.table().get_key_value(key) else {
			debug!(key, "[load] unknown key");
			return Err(ConstructError::UnknownKey { key: key.to_string() });
		};

		bridge::manufacture(&*self.sources.modules, &*self.sources.factories, key, &mapping.adapter_type)
	}
}

impl fmt::Debug for AdapterRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AdapterRegistry")
			.field("base", &self.base)
			.field("config", &self.config)
			.field("table", &self.table.get())
			.finish_non_exhaustive()
	}
}
