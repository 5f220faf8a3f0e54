use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Reserved key resolving to the built-in [`crate::InstanceAdapter`].
///
/// Never looked up in the mapping table.
pub const INSTANCE_ADAPTER_KEY: &str = "__instanceAdapter";

/// Every reserved key.
pub const RESERVED_KEYS: &[&str] = &[INSTANCE_ADAPTER_KEY];

/// Returns true if `key` bypasses the mapping table.
pub fn is_reserved(key: &str) -> bool {
	RESERVED_KEYS.contains(&key)
}

/// Names the kind of prim an adapter handles (e.g. `Mesh`).
///
/// Ordered lexicographically; maps keyed by `AdapterKey` can be queried with
/// a plain `&str`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AdapterKey(Arc<str>);

impl AdapterKey {
	pub fn new(key: impl AsRef<str>) -> Self {
		Self(Arc::from(key.as_ref()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for AdapterKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "AdapterKey({})", self.0)
	}
}

impl fmt::Display for AdapterKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for AdapterKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for AdapterKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<&str> for AdapterKey {
	fn from(key: &str) -> Self {
		Self::new(key)
	}
}

impl From<String> for AdapterKey {
	fn from(key: String) -> Self {
		Self(Arc::from(key))
	}
}

impl PartialEq<str> for AdapterKey {
	fn eq(&self, other: &str) -> bool {
		&*self.0 == other
	}
}

impl PartialEq<&str> for AdapterKey {
	fn eq(&self, other: &&str) -> bool {
		&*self.0 == *other
	}
}
