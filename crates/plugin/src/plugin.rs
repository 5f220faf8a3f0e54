use std::fmt;
use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashMap as HashMap;

use crate::error::LoadError;
use crate::manifest::{Metadata, PluginKind};
use crate::types::TypeHandle;

/// Brings a plugin's code into the process. The error string is the reason.
pub type LoadHook = Arc<dyn Fn() -> Result<(), String> + Send + Sync>;

/// A load hook compiled into the binary.
///
/// Submitted with `inventory::submit!` and picked up by
/// [`crate::PluginRegistryBuilder::add_static_hooks`].
pub struct LoadHookDef {
	pub plugin: &'static str,
	pub load: fn() -> Result<(), String>,
}

inventory::collect!(LoadHookDef);

/// A registered plugin: the types it owns, their metadata, and its load state.
///
/// Loading happens at most once. Concurrent callers of [`Plugin::load`] block
/// on the first attempt and all observe its outcome; a failure is not retried.
pub struct Plugin {
	name: String,
	kind: PluginKind,
	origin: String,
	metadata: HashMap<TypeHandle, Metadata>,
	hook: Option<LoadHook>,
	state: OnceLock<Result<(), LoadError>>,
}

impl Plugin {
	pub(crate) fn new(name: String, kind: PluginKind, origin: String) -> Self {
		Self {
			name,
			kind,
			origin,
			metadata: HashMap::default(),
			hook: None,
			state: OnceLock::new(),
		}
	}

	pub(crate) fn insert_type(&mut self, ty: TypeHandle, metadata: Metadata) {
		self.metadata.insert(ty, metadata);
	}

	pub(crate) fn set_hook(&mut self, hook: LoadHook) {
		self.hook = Some(hook);
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> PluginKind {
		self.kind
	}

	/// Manifest the plugin was declared in.
	pub fn origin(&self) -> &str {
		&self.origin
	}

	/// Metadata declared for `ty`, if this plugin declares it.
	pub fn metadata_for(&self, ty: &str) -> Option<&Metadata> {
		self.metadata.get(ty)
	}

	pub fn declares(&self, ty: &str) -> bool {
		self.metadata.contains_key(ty)
	}

	/// Types declared by this plugin, in no particular order.
	pub fn types(&self) -> impl Iterator<Item = &TypeHandle> {
		self.metadata.keys()
	}

	pub fn is_loaded(&self) -> bool {
		matches!(self.state.get(), Some(Ok(())))
	}

	/// Loads the plugin if it has not been loaded yet.
	pub fn load(&self) -> Result<(), LoadError> {
		self.state.get_or_init(|| self.run_load()).clone()
	}

	fn run_load(&self) -> Result<(), LoadError> {
		let result = match (&self.hook, self.kind) {
			(Some(hook), _) => hook().map_err(|reason| LoadError::Failed {
				plugin: self.name.clone(),
				reason,
			}),
			(None, PluginKind::Library) => Err(LoadError::NoLoader {
				plugin: self.name.clone(),
			}),
			(None, PluginKind::Resource | PluginKind::Builtin) => Ok(()),
		};

		match &result {
			Ok(()) => tracing::debug!(plugin = %self.name, kind = %self.kind, "plugin loaded"),
			Err(e) => tracing::error!(plugin = %self.name, origin = %self.origin, "{e}"),
		}
		result
	}
}

impl fmt::Debug for Plugin {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Plugin")
			.field("name", &self.name)
			.field("kind", &self.kind)
			.field("origin", &self.origin)
			.field("types", &self.metadata.len())
			.field("has_hook", &self.hook.is_some())
			.field("state", &self.state.get())
			.finish()
	}
}
