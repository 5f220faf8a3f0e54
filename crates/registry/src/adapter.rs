use std::fmt;
use std::sync::{Arc, OnceLock};

use lumen_plugin::TypeHandle;
use rustc_hash::FxHashMap as HashMap;
use tracing::warn;

/// Type name of the built-in [`InstanceAdapter`].
pub const INSTANCE_ADAPTER_TYPE: &str = "InstanceAdapter";

/// A handler manufactured for one kind of prim.
///
/// What an adapter does with its prims belongs to the rendering layer; the
/// registry only needs to know which implementation type it is.
pub trait PrimAdapter: Send + Sync + fmt::Debug {
	/// Implementation type this adapter was manufactured as.
	fn type_name(&self) -> &str;
}

/// Built-in adapter behind [`crate::INSTANCE_ADAPTER_KEY`].
#[derive(Debug, Default, Clone, Copy)]
pub struct InstanceAdapter;

impl PrimAdapter for InstanceAdapter {
	fn type_name(&self) -> &str {
		INSTANCE_ADAPTER_TYPE
	}
}

/// Manufactures a fresh adapter; `None` reports an instantiation failure.
pub type AdapterFactory = Arc<dyn Fn() -> Option<Arc<dyn PrimAdapter>> + Send + Sync>;

/// An adapter factory compiled into the binary.
///
/// ```ignore
/// inventory::submit! {
///     AdapterFactoryDef { type_name: "MeshAdapter", new: || Some(Arc::new(MeshAdapter)) }
/// }
/// ```
pub struct AdapterFactoryDef {
	pub type_name: &'static str,
	pub new: fn() -> Option<Arc<dyn PrimAdapter>>,
}

inventory::collect!(AdapterFactoryDef);

/// Factories keyed by adapter implementation type.
#[derive(Default, Clone)]
pub struct FactoryTable {
	factories: HashMap<TypeHandle, AdapterFactory>,
}

impl FactoryTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Table holding every [`AdapterFactoryDef`] submission.
	pub fn from_inventory() -> Self {
		let mut table = Self::new();
		for def in inventory::iter::<AdapterFactoryDef> {
			let new = def.new;
			if table.register(def.type_name, new).is_some() {
				warn!(ty = def.type_name, "adapter factory submitted twice; keeping the last");
			}
		}
		table
	}

	/// Process-wide table, collected from `inventory` on first use.
	pub fn global() -> Arc<FactoryTable> {
		static GLOBAL: OnceLock<Arc<FactoryTable>> = OnceLock::new();
		GLOBAL.get_or_init(|| Arc::new(Self::from_inventory())).clone()
	}

	/// Registers the factory for `ty`, returning the one it replaced.
	pub fn register<F>(&mut self, ty: impl Into<TypeHandle>, factory: F) -> Option<AdapterFactory>
	where
		F: Fn() -> Option<Arc<dyn PrimAdapter>> + Send + Sync + 'static,
	{
		self.factories.insert(ty.into(), Arc::new(factory))
	}

	/// Registers `A::default()` as the factory for `ty`.
	pub fn register_default<A>(&mut self, ty: impl Into<TypeHandle>) -> Option<AdapterFactory>
	where
		A: PrimAdapter + Default + 'static,
	{
		self.register(ty, || Some(Arc::new(A::default()) as Arc<dyn PrimAdapter>))
	}

	pub fn get(&self, ty: &str) -> Option<&AdapterFactory> {
		self.factories.get(ty)
	}

	pub fn contains(&self, ty: &str) -> bool {
		self.factories.contains_key(ty)
	}

	pub fn len(&self) -> usize {
		self.factories.len()
	}

	pub fn is_empty(&self) -> bool {
		self.factories.is_empty()
	}
}

impl fmt::Debug for FactoryTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut types: Vec<&str> = self.factories.keys().map(TypeHandle::name).collect();
		types.sort_unstable();
		f.debug_struct("FactoryTable").field("types", &types).finish()
	}
}
