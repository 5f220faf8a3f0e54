//! Fixtures for building registries from in-memory plugin declarations.

use std::sync::Arc;

use indexmap::IndexMap;
use lumen_plugin::{Metadata, PluginDecl, PluginKind, PluginManifest, PluginRegistry, PluginRegistryBuilder, TypeDecl};
use serde_json::{Value, json};

use crate::adapter::{FactoryTable, PrimAdapter};
use crate::config::RegistryConfig;
use crate::discover::PRIM_ADAPTER_BASE;
use crate::registry::AdapterRegistry;
use crate::sources::RegistrySources;

/// Adapter that only remembers which type it was manufactured as.
#[derive(Debug)]
pub(crate) struct TestAdapter {
	type_name: String,
}

impl TestAdapter {
	pub(crate) fn new(type_name: impl Into<String>) -> Self {
		Self {
			type_name: type_name.into(),
		}
	}
}

impl PrimAdapter for TestAdapter {
	fn type_name(&self) -> &str {
		&self.type_name
	}
}

fn object(value: Value) -> Metadata {
	serde_json::from_value(value).expect("fixture metadata must be a JSON object")
}

/// Adapter type handling `key`.
pub(crate) fn adapter(key: &str) -> TypeDecl {
	adapter_with(json!({ "primTypeName": key }))
}

/// Adapter type handling `key` and opting into derived prim types.
pub(crate) fn inheriting(key: &str) -> TypeDecl {
	adapter_with(json!({ "primTypeName": key, "includeDerivedPrimTypes": true }))
}

/// Adapter type with arbitrary metadata.
pub(crate) fn adapter_with(metadata: Value) -> TypeDecl {
	TypeDecl {
		bases: vec![PRIM_ADAPTER_BASE.to_string()],
		metadata: object(metadata),
	}
}

/// Prim schema type named `schema`.
pub(crate) fn prim(bases: &[&str], schema: &str) -> TypeDecl {
	TypeDecl {
		bases: bases.iter().map(|b| b.to_string()).collect(),
		metadata: object(json!({ "schemaName": schema })),
	}
}

/// Prim type without a schema name.
pub(crate) fn unnamed_prim(bases: &[&str]) -> TypeDecl {
	TypeDecl {
		bases: bases.iter().map(|b| b.to_string()).collect(),
		metadata: Metadata::new(),
	}
}

/// Builds an [`AdapterRegistry`] over resource and library plugins.
///
/// Every adapter type gets a [`TestAdapter`] factory unless it is listed with
/// [`Fixture::no_factory`] or given its own with [`Fixture::factory`].
pub(crate) struct Fixture {
	plugins: Vec<PluginDecl>,
	builder: PluginRegistryBuilder,
	factories: FactoryTable,
	missing: Vec<String>,
	config: RegistryConfig,
}

impl Fixture {
	pub(crate) fn new() -> Self {
		Self {
			plugins: Vec::new(),
			builder: PluginRegistryBuilder::new(),
			factories: FactoryTable::new(),
			missing: Vec::new(),
			config: RegistryConfig::default(),
		}
	}

	/// Adds a plugin that loads without a hook.
	pub(crate) fn resource(self, name: &str, types: Vec<(&str, TypeDecl)>) -> Self {
		self.plugin(name, PluginKind::Resource, types)
	}

	/// Adds a library plugin loaded by `hook`.
	pub(crate) fn library<F>(mut self, name: &str, types: Vec<(&str, TypeDecl)>, hook: F) -> Self
	where
		F: Fn() -> Result<(), String> + Send + Sync + 'static,
	{
		self.builder.load_hook(name, hook);
		self.plugin(name, PluginKind::Library, types)
	}

	fn plugin(mut self, name: &str, kind: PluginKind, types: Vec<(&str, TypeDecl)>) -> Self {
		let types: IndexMap<String, TypeDecl> = types.into_iter().map(|(n, d)| (n.to_string(), d)).collect();
		self.plugins.push(PluginDecl {
			name: name.to_string(),
			kind,
			types,
		});
		self
	}

	pub(crate) fn external_plugins(mut self, enabled: bool) -> Self {
		self.config.external_plugins_enabled = enabled;
		self
	}

	pub(crate) fn no_factory(mut self, ty: &str) -> Self {
		self.missing.push(ty.to_string());
		self
	}

	pub(crate) fn factory<F>(mut self, ty: &str, factory: F) -> Self
	where
		F: Fn() -> Option<Arc<dyn PrimAdapter>> + Send + Sync + 'static,
	{
		self.factories.register(ty, factory);
		self
	}

	pub(crate) fn config(&self) -> RegistryConfig {
		self.config
	}

	/// Plugin registry plus the full factory table.
	pub(crate) fn parts(self) -> (Arc<PluginRegistry>, FactoryTable, RegistryConfig) {
		let mut builder = self.builder;
		builder.add_manifest(
			"fixture",
			PluginManifest {
				plugins: self.plugins,
			},
		);
		let plugins = Arc::new(builder.build());

		let mut factories = self.factories;
		for ty in plugins.graph().all_derived(PRIM_ADAPTER_BASE) {
			if factories.contains(ty.name()) || self.missing.iter().any(|m| m == ty.name()) {
				continue;
			}
			let name = ty.name().to_string();
			factories.register(ty, move || Some(Arc::new(TestAdapter::new(name.clone())) as Arc<dyn PrimAdapter>));
		}
		(plugins, factories, self.config)
	}

	pub(crate) fn sources(self) -> (RegistrySources, RegistryConfig) {
		let (plugins, factories, config) = self.parts();
		(RegistrySources::from_plugins(plugins, Arc::new(factories)), config)
	}

	pub(crate) fn build(self) -> AdapterRegistry {
		let (sources, config) = self.sources();
		AdapterRegistry::new(sources, config)
	}
}

/// Type name of the adapter manufactured for `key`.
pub(crate) fn constructed(registry: &AdapterRegistry, key: &str) -> String {
	registry
		.construct(key)
		.unwrap_or_else(|e| panic!("construct({key}) failed: {e}"))
		.type_name()
		.to_string()
}

/// Adapter type `key` resolves to, if any.
pub(crate) fn resolved(registry: &AdapterRegistry, key: &str) -> Option<String> {
	registry.resolve(key).map(|m| m.adapter_type.name().to_string())
}
