//! Type handles and the derivation graph they form.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap as HashMap;

/// Opaque, globally unique identity of a declared type.
///
/// Handles compare and order by type name, so iteration over a set of handles
/// is stable across runs.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeHandle(Arc<str>);

impl TypeHandle {
	pub fn new(name: impl AsRef<str>) -> Self {
		Self(Arc::from(name.as_ref()))
	}

	pub fn name(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for TypeHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TypeHandle({})", self.0)
	}
}

impl fmt::Display for TypeHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for TypeHandle {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for TypeHandle {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<&str> for TypeHandle {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

impl From<String> for TypeHandle {
	fn from(name: String) -> Self {
		Self(Arc::from(name))
	}
}

/// Directed derivation graph over [`TypeHandle`]s (base → derived).
///
/// Types referenced only as a base are implicitly known roots. Children are
/// kept in declaration order; [`TypeGraph::directly_derived`] reports them in
/// that order.
///
/// # Invariants
///
/// - The graph is expected to be acyclic. Traversals keep a visited set, so a
///   malformed cyclic declaration terminates instead of looping.
/// - A type is declared at most once; [`TypeGraph::declare`] refuses
///   redeclarations.
#[derive(Debug, Default, Clone)]
pub struct TypeGraph {
	bases: HashMap<TypeHandle, Vec<TypeHandle>>,
	derived: HashMap<TypeHandle, Vec<TypeHandle>>,
}

impl TypeGraph {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares `ty` with the given direct bases.
	///
	/// Returns `false` without modifying the graph when `ty` was already
	/// declared. Self-derivation is dropped.
	pub fn declare<I>(&mut self, ty: TypeHandle, bases: I) -> bool
	where
		I: IntoIterator<Item = TypeHandle>,
	{
		if self.bases.contains_key(&ty) {
			return false;
		}

		let mut own_bases = Vec::new();
		for base in bases {
			if base == ty || own_bases.contains(&base) {
				continue;
			}
			self.derived.entry(base.clone()).or_default().push(ty.clone());
			own_bases.push(base);
		}
		self.derived.entry(ty.clone()).or_default();
		self.bases.insert(ty, own_bases);
		true
	}

	/// Returns true if `ty` was declared or referenced as a base.
	pub fn contains(&self, ty: &str) -> bool {
		self.bases.contains_key(ty) || self.derived.contains_key(ty)
	}

	/// Returns true if `ty` was explicitly declared.
	pub fn is_declared(&self, ty: &str) -> bool {
		self.bases.contains_key(ty)
	}

	pub fn bases(&self, ty: &str) -> &[TypeHandle] {
		self.bases.get(ty).map_or(&[], Vec::as_slice)
	}

	pub fn directly_derived(&self, ty: &str) -> &[TypeHandle] {
		self.derived.get(ty).map_or(&[], Vec::as_slice)
	}

	/// Returns every type deriving from `base`, directly or indirectly.
	///
	/// `base` itself is not part of the result.
	pub fn all_derived(&self, base: &str) -> BTreeSet<TypeHandle> {
		let mut found = BTreeSet::new();
		let mut stack: Vec<&TypeHandle> = self.directly_derived(base).iter().collect();

		while let Some(ty) = stack.pop() {
			if ty.name() == base || !found.insert(ty.clone()) {
				continue;
			}
			stack.extend(self.directly_derived(ty.name()));
		}
		found
	}

	/// Number of known types, declared or implicit.
	pub fn len(&self) -> usize {
		self.derived.len()
	}

	pub fn is_empty(&self) -> bool {
		self.derived.is_empty()
	}
}
