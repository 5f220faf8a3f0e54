use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashMap as HashMap;
use tracing::{debug, warn};

use crate::discovery;
use crate::error::ManifestError;
use crate::manifest::{PluginManifest, SCHEMA_NAME_KEY, StaticManifest};
use crate::plugin::{LoadHook, LoadHookDef, Plugin};
use crate::types::{TypeGraph, TypeHandle};

/// Collects manifests and load hooks, then produces a [`PluginRegistry`].
#[derive(Default)]
pub struct PluginRegistryBuilder {
	manifests: Vec<(String, PluginManifest)>,
	hooks: HashMap<String, LoadHook>,
}

impl PluginRegistryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of manifests queued so far.
	pub fn len(&self) -> usize {
		self.manifests.len()
	}

	pub fn is_empty(&self) -> bool {
		self.manifests.is_empty()
	}

	/// Queues an already parsed manifest.
	pub fn add_manifest(&mut self, origin: impl Into<String>, manifest: PluginManifest) -> &mut Self {
		self.manifests.push((origin.into(), manifest));
		self
	}

	/// Parses and queues a JSON manifest.
	pub fn add_json(&mut self, origin: &str, json: &str) -> Result<&mut Self, ManifestError> {
		let manifest = PluginManifest::from_json(origin, json)?;
		Ok(self.add_manifest(origin, manifest))
	}

	/// Registers the load hook for `plugin`, replacing any earlier one.
	pub fn load_hook<F>(&mut self, plugin: impl Into<String>, hook: F) -> &mut Self
	where
		F: Fn() -> Result<(), String> + Send + Sync + 'static,
	{
		self.hooks.insert(plugin.into(), Arc::new(hook));
		self
	}

	/// Queues every manifest submitted through [`StaticManifest`].
	///
	/// Malformed static manifests are logged and skipped.
	pub fn add_static_manifests(&mut self) -> &mut Self {
		for def in inventory::iter::<StaticManifest> {
			if let Err(e) = self.add_json(def.origin, def.json) {
				warn!("skipping static manifest: {e}");
			}
		}
		self
	}

	/// Registers every hook submitted through [`LoadHookDef`].
	pub fn add_static_hooks(&mut self) -> &mut Self {
		for def in inventory::iter::<LoadHookDef> {
			let load = def.load;
			self.load_hook(def.plugin, load);
		}
		self
	}

	/// Reads manifests found under `roots`.
	///
	/// Returns how many manifests were queued; unreadable or malformed ones
	/// are logged and skipped.
	pub fn discover(&mut self, roots: &[PathBuf]) -> usize {
		let mut queued = 0;
		for path in discovery::find_manifests(roots) {
			match PluginManifest::from_path(&path) {
				Ok(manifest) => {
					debug!(path = %path.display(), "discovered plugin manifest");
					self.add_manifest(path.display().to_string(), manifest);
					queued += 1;
				}
				Err(e) => warn!("skipping plugin manifest: {e}"),
			}
		}
		queued
	}

	/// Builds the registry.
	///
	/// Manifests are processed in the order they were queued. The first
	/// declaration of a plugin name, a type, or a schema name wins; later
	/// duplicates are logged and ignored.
	pub fn build(self) -> PluginRegistry {
		let mut hooks = self.hooks;
		let mut registry = PluginRegistry::default();

		for (origin, manifest) in self.manifests {
			for decl in manifest.plugins {
				if registry.by_name.contains_key(&decl.name) {
					warn!(plugin = %decl.name, %origin, "plugin already registered; ignoring duplicate");
					continue;
				}

				let index = registry.plugins.len();
				let mut plugin = Plugin::new(decl.name.clone(), decl.kind, origin.clone());

				for (type_name, type_decl) in decl.types {
					let ty = TypeHandle::from(type_name);
					if let Some(&owner) = registry.owners.get(&ty) {
						warn!(
							ty = %ty,
							plugin = %decl.name,
							owner = %registry.plugins[owner].name(),
							"type already declared; ignoring duplicate"
						);
						continue;
					}

					registry
						.graph
						.declare(ty.clone(), type_decl.bases.into_iter().map(TypeHandle::from));

					match type_decl.metadata.get(SCHEMA_NAME_KEY) {
						None => {}
						Some(serde_json::Value::String(schema)) => registry.add_schema_name(&ty, schema),
						Some(_) => warn!(ty = %ty, "{SCHEMA_NAME_KEY} metadata is not a string"),
					}

					registry.owners.insert(ty.clone(), index);
					plugin.insert_type(ty, type_decl.metadata);
				}

				if let Some(hook) = hooks.remove(&decl.name) {
					plugin.set_hook(hook);
				}
				registry.by_name.insert(decl.name, index);
				registry.plugins.push(plugin);
			}
		}

		for name in hooks.keys() {
			debug!(plugin = %name, "load hook registered for unknown plugin");
		}

		registry
	}
}

/// Immutable catalog of plugins and the types they declare.
///
/// Answers the questions type discovery needs: which plugin owns a type, what
/// metadata it declared, how types derive from each other, and which schema
/// name a type carries.
#[derive(Debug, Default)]
pub struct PluginRegistry {
	plugins: Vec<Plugin>,
	by_name: HashMap<String, usize>,
	owners: HashMap<TypeHandle, usize>,
	graph: TypeGraph,
	schema_names: HashMap<TypeHandle, String>,
	schema_types: HashMap<String, TypeHandle>,
}

impl PluginRegistry {
	/// Returns the process-wide registry.
	///
	/// Built on first use from the static manifests and hooks plus every
	/// manifest found on [`discovery::PLUGIN_PATH_ENV`].
	pub fn global() -> Arc<PluginRegistry> {
		static GLOBAL: OnceLock<Arc<PluginRegistry>> = OnceLock::new();
		GLOBAL
			.get_or_init(|| {
				let mut builder = PluginRegistryBuilder::new();
				builder.add_static_manifests().add_static_hooks();
				builder.discover(&discovery::search_path_from_env());
				let registry = builder.build();
				debug!(plugins = registry.len(), types = registry.graph.len(), "plugin registry built");
				Arc::new(registry)
			})
			.clone()
	}

	fn add_schema_name(&mut self, ty: &TypeHandle, schema: &str) {
		if let Some(existing) = self.schema_types.get(schema) {
			warn!(ty = %ty, %existing, schema, "schema name already taken; ignoring");
			return;
		}
		self.schema_types.insert(schema.to_string(), ty.clone());
		self.schema_names.insert(ty.clone(), schema.to_string());
	}

	pub fn len(&self) -> usize {
		self.plugins.len()
	}

	pub fn is_empty(&self) -> bool {
		self.plugins.is_empty()
	}

	pub fn plugins(&self) -> &[Plugin] {
		&self.plugins
	}

	pub fn plugin(&self, name: &str) -> Option<&Plugin> {
		self.by_name.get(name).map(|&i| &self.plugins[i])
	}

	/// Plugin that declared `ty`.
	pub fn plugin_for_type(&self, ty: &str) -> Option<&Plugin> {
		self.owners.get(ty).map(|&i| &self.plugins[i])
	}

	pub fn graph(&self) -> &TypeGraph {
		&self.graph
	}

	/// Schema name declared for `ty` through `schemaName` metadata.
	pub fn schema_name(&self, ty: &str) -> Option<&str> {
		self.schema_names.get(ty).map(String::as_str)
	}

	/// Type that declared `schema` as its schema name.
	pub fn type_for_schema_name(&self, schema: &str) -> Option<&TypeHandle> {
		self.schema_types.get(schema)
	}
}
