//! Collaborator seams.
//!
//! The registry never reaches into plugin internals directly. It asks four
//! narrow questions through these traits, which [`lumen_plugin`] types and
//! [`FactoryTable`] implement, and which tests can replace.

use std::collections::BTreeSet;
use std::sync::Arc;

use lumen_plugin::{LoadError, Metadata, Plugin, PluginRegistry, TypeGraph, TypeHandle};

use crate::adapter::{AdapterFactory, FactoryTable};
use crate::key::AdapterKey;

/// Type-hierarchy oracle.
pub trait TypeHierarchy: Send + Sync {
	/// Every type deriving from `base`, directly or indirectly, excluding `base`.
	fn all_derived_types(&self, base: &TypeHandle) -> BTreeSet<TypeHandle>;

	/// Direct children of `ty`, in the hierarchy's own order.
	fn directly_derived_types(&self, ty: &TypeHandle) -> Vec<TypeHandle>;
}

/// A unit of code and metadata that owns types.
pub trait Module: Send + Sync {
	fn name(&self) -> &str;

	/// Metadata the module declared for `ty`.
	fn metadata_for(&self, ty: &TypeHandle) -> Option<&Metadata>;

	/// Makes the module's code available; idempotent.
	fn ensure_loaded(&self) -> Result<(), LoadError>;
}

/// Module metadata store.
pub trait ModuleCatalog: Send + Sync {
	fn owning_module(&self, ty: &TypeHandle) -> Option<&dyn Module>;
}

/// Schema layer mapping keys to and from the prim types they name.
pub trait SchemaTranslator: Send + Sync {
	fn key_for_type(&self, ty: &TypeHandle) -> Option<AdapterKey>;
	fn type_for_key(&self, key: &str) -> Option<TypeHandle>;
}

/// Handler factory registry.
pub trait FactorySource: Send + Sync {
	fn factory_for(&self, ty: &TypeHandle) -> Option<AdapterFactory>;
}

/// The collaborators an [`crate::AdapterRegistry`] is wired to.
#[derive(Clone)]
pub struct RegistrySources {
	pub types: Arc<dyn TypeHierarchy>,
	pub modules: Arc<dyn ModuleCatalog>,
	pub schema: Arc<dyn SchemaTranslator>,
	pub factories: Arc<dyn FactorySource>,
}

impl RegistrySources {
	/// Uses `plugins` for hierarchy, modules and schema.
	pub fn from_plugins(plugins: Arc<PluginRegistry>, factories: Arc<dyn FactorySource>) -> Self {
		Self {
			types: plugins.clone(),
			modules: plugins.clone(),
			schema: plugins,
			factories,
		}
	}
}

impl TypeHierarchy for TypeGraph {
	fn all_derived_types(&self, base: &TypeHandle) -> BTreeSet<TypeHandle> {
		self.all_derived(base.name())
	}

	fn directly_derived_types(&self, ty: &TypeHandle) -> Vec<TypeHandle> {
		self.directly_derived(ty.name()).to_vec()
	}
}

impl TypeHierarchy for PluginRegistry {
	fn all_derived_types(&self, base: &TypeHandle) -> BTreeSet<TypeHandle> {
		self.graph().all_derived_types(base)
	}

	fn directly_derived_types(&self, ty: &TypeHandle) -> Vec<TypeHandle> {
		self.graph().directly_derived_types(ty)
	}
}

impl Module for Plugin {
	fn name(&self) -> &str {
		Plugin::name(self)
	}

	fn metadata_for(&self, ty: &TypeHandle) -> Option<&Metadata> {
		Plugin::metadata_for(self, ty.name())
	}

	fn ensure_loaded(&self) -> Result<(), LoadError> {
		self.load()
	}
}

impl ModuleCatalog for PluginRegistry {
	fn owning_module(&self, ty: &TypeHandle) -> Option<&dyn Module> {
		self.plugin_for_type(ty.name()).map(|p| p as &dyn Module)
	}
}

impl SchemaTranslator for PluginRegistry {
	fn key_for_type(&self, ty: &TypeHandle) -> Option<AdapterKey> {
		self.schema_name(ty.name()).map(AdapterKey::from)
	}

	fn type_for_key(&self, key: &str) -> Option<TypeHandle> {
		self.type_for_schema_name(key).cloned()
	}
}

impl FactorySource for FactoryTable {
	fn factory_for(&self, ty: &TypeHandle) -> Option<AdapterFactory> {
		self.get(ty.name()).cloned()
	}
}
