//! Mapping table construction.
//!
//! # Mental Model
//!
//! 1. **Explicit pass:** every accepted declaration is written unconditionally,
//!    in discovery order. A later duplicate replaces the earlier entry.
//! 2. **Inheritance pass:** each opted-in key walks the derivation graph below
//!    its prim type with an explicit LIFO stack. A descendant whose key is
//!    still free is mapped to the ancestor's adapter and its own children are
//!    pushed; a descendant whose key is taken stops the walk on that branch.
//! 3. **Key index:** the table's keys in lexicographic order.
//!
//! # Invariants
//!
//! - Explicit declarations beat inherited ones.
//!   - Enforced in: [`MappingTable::build`] (explicit pass runs first; inherited
//!     inserts are insert-if-absent).
//!   - Tested by: `tests::test_explicit_beats_inherited`
//!   - Failure symptom: a prim with its own adapter renders with an ancestor's.
//! - Propagation stops at the first claimed descendant.
//!   - Enforced in: [`propagate`].
//!   - Tested by: `tests::test_claimed_descendant_blocks_propagation`
//!   - Failure symptom: grandchildren of an explicitly handled type pick up a
//!     more distant ancestor's adapter.
//! - When two opted-in ancestors share a free descendant, the one processed
//!   first wins. Processing order is discovery order, so the outcome depends on
//!   the hierarchy's set order rather than on any declared precedence.
//!   - Tested by: `tests::test_first_ancestor_wins_shared_descendant`

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use lumen_plugin::TypeHandle;
use tracing::{debug, warn};

use crate::discover::Discovery;
use crate::error::DiscoveryIssue;
use crate::key::AdapterKey;
use crate::sources::{SchemaTranslator, TypeHierarchy};

/// How a key came to be mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingOrigin {
	/// The adapter declared the key itself.
	Explicit,
	/// Inherited from the adapter of an opted-in ancestor key.
	Inherited { from: AdapterKey },
}

/// One resolved entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
	pub adapter_type: TypeHandle,
	pub origin: MappingOrigin,
}

impl Mapping {
	pub fn is_inherited(&self) -> bool {
		matches!(self.origin, MappingOrigin::Inherited { .. })
	}
}

/// Diagnostics gathered while building a [`MappingTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
	issues: Vec<DiscoveryIssue>,
}

impl DiscoveryReport {
	pub fn issues(&self) -> &[DiscoveryIssue] {
		&self.issues
	}

	/// Issues caused by malformed or conflicting metadata.
	pub fn data_errors(&self) -> impl Iterator<Item = &DiscoveryIssue> {
		self.issues.iter().filter(|i| i.is_data_error())
	}

	/// True when no data errors were found.
	pub fn is_clean(&self) -> bool {
		self.data_errors().next().is_none()
	}
}

/// Immutable key → adapter type table with its ordered key index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
	entries: BTreeMap<AdapterKey, Mapping>,
	keys: Vec<AdapterKey>,
	report: DiscoveryReport,
}

impl MappingTable {
	/// Builds the table from one catalog walk.
	pub fn build(discovery: Discovery, types: &dyn TypeHierarchy, schema: &dyn SchemaTranslator) -> Self {
		let Discovery {
			explicit,
			include_derived,
			mut issues,
		} = discovery;
		let mut entries = BTreeMap::new();

		for (key, adapter_type) in explicit {
			let mapping = Mapping {
				adapter_type: adapter_type.clone(),
				origin: MappingOrigin::Explicit,
			};
			if let Some(previous) = entries.insert(key.clone(), mapping) {
				let issue = DiscoveryIssue::DuplicateKey {
					key,
					replaced: previous.adapter_type,
					winner: adapter_type,
				};
				warn!("[discover] {issue}");
				issues.push(issue);
			}
		}

		for key in &include_derived {
			propagate(&mut entries, key, types, schema);
		}

		let keys = entries.keys().cloned().collect();
		Self {
			entries,
			keys,
			report: DiscoveryReport { issues },
		}
	}

	pub fn get(&self, key: &str) -> Option<&Mapping> {
		self.entries.get(key)
	}

	/// Like [`MappingTable::get`], also returning the stored key.
	pub fn get_key_value(&self, key: &str) -> Option<(&AdapterKey, &Mapping)> {
		self.entries.get_key_value(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Every mapped key, lexicographically ordered.
	pub fn keys(&self) -> &[AdapterKey] {
		&self.keys
	}

	pub fn iter(&self) -> impl Iterator<Item = (&AdapterKey, &Mapping)> {
		self.entries.iter()
	}

	pub fn report(&self) -> &DiscoveryReport {
		&self.report
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Extends `from`'s adapter to the free descendants of its prim type.
fn propagate(
	entries: &mut BTreeMap<AdapterKey, Mapping>,
	from: &AdapterKey,
	types: &dyn TypeHierarchy,
	schema: &dyn SchemaTranslator,
) {
	let Some(prim_type) = schema.type_for_key(from.as_str()) else {
		debug!(key = %from, "[discover] no prim type for key; nothing to propagate");
		return;
	};
	let Some(adapter_type) = entries.get(from).map(|m| m.adapter_type.clone()) else {
		return;
	};

	let mut stack = types.directly_derived_types(&prim_type);
	while let Some(derived) = stack.pop() {
		let Some(key) = schema.key_for_type(&derived) else {
			continue;
		};

		if let Entry::Vacant(slot) = entries.entry(key) {
			debug!(from = %from, to = %slot.key(), "[discover] mapping adapter to derived type");
			slot.insert(Mapping {
				adapter_type: adapter_type.clone(),
				origin: MappingOrigin::Inherited { from: from.clone() },
			});
			stack.extend(types.directly_derived_types(&derived));
		}
	}
}
