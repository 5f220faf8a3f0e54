//! Type catalog walk: turns plugin metadata into candidate adapters.
//!
//! # Metadata
//!
//! Adapter types derive from [`PRIM_ADAPTER_BASE`] and declare in their
//! plugin manifest:
//!
//! | Key | Type | Meaning |
//! |-----|------|---------|
//! | `primTypeName` | string | Key the adapter handles (required) |
//! | `includeDerivedPrimTypes` | bool | Also cover derived prim types without an adapter |
//! | `isInternal` | bool | Keeps the adapter enabled when external plugins are disabled |

use lumen_plugin::{Metadata, TypeHandle};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::error::DiscoveryIssue;
use crate::key::AdapterKey;
use crate::sources::{ModuleCatalog, TypeHierarchy};

/// Base type every prim adapter derives from.
pub const PRIM_ADAPTER_BASE: &str = "LumenPrimAdapter";

pub const IS_INTERNAL_KEY: &str = "isInternal";
pub const PRIM_TYPE_NAME_KEY: &str = "primTypeName";
pub const INCLUDE_DERIVED_KEY: &str = "includeDerivedPrimTypes";

/// Result of walking the catalog once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
	/// Accepted `(key, adapter type)` declarations, in discovery order.
	pub explicit: Vec<(AdapterKey, TypeHandle)>,
	/// Keys whose adapter opted into covering derived prim types, in discovery order.
	pub include_derived: Vec<AdapterKey>,
	pub issues: Vec<DiscoveryIssue>,
}

impl Discovery {
	fn skip(&mut self, issue: DiscoveryIssue) {
		if issue.is_data_error() {
			warn!("[discover] {issue}");
		} else {
			debug!("[discover] {issue}");
		}
		self.issues.push(issue);
	}
}

/// Walks every type deriving from `base` and reads its adapter metadata.
///
/// Discovery order is the hierarchy's set order. Nothing here is fatal:
/// problems are logged, recorded in [`Discovery::issues`] and the candidate is
/// skipped, or for a bad `includeDerivedPrimTypes` only its propagation is.
pub fn discover(
	types: &dyn TypeHierarchy,
	modules: &dyn ModuleCatalog,
	base: &TypeHandle,
	config: RegistryConfig,
) -> Discovery {
	let mut out = Discovery::default();

	for adapter_type in types.all_derived_types(base) {
		let Some(module) = modules.owning_module(&adapter_type) else {
			out.skip(DiscoveryIssue::NoOwningModule { adapter_type });
			continue;
		};
		let empty = Metadata::new();
		let metadata = module.metadata_for(&adapter_type).unwrap_or(&empty);

		if let Err(issue) = check_enabled(&adapter_type, metadata, config) {
			out.skip(issue);
			continue;
		}

		let key = match metadata.get(PRIM_TYPE_NAME_KEY) {
			Some(Value::String(key)) => AdapterKey::from(key.as_str()),
			Some(_) => {
				out.skip(DiscoveryIssue::CorruptKey { adapter_type });
				continue;
			}
			None => {
				out.skip(DiscoveryIssue::MissingKey { adapter_type });
				continue;
			}
		};

		debug!(ty = %adapter_type, module = module.name(), %key, "[discover] adapter discovered");
		out.explicit.push((key.clone(), adapter_type.clone()));

		match metadata.get(INCLUDE_DERIVED_KEY) {
			None | Some(Value::Bool(false)) => {}
			Some(Value::Bool(true)) => out.include_derived.push(key),
			Some(_) => out.skip(DiscoveryIssue::CorruptIncludeDerived { adapter_type }),
		}
	}

	out
}

/// Applies the external-plugin toggle to one candidate.
///
/// Returns the issue explaining why the candidate is left out.
fn check_enabled(
	adapter_type: &TypeHandle,
	metadata: &Metadata,
	config: RegistryConfig,
) -> Result<(), DiscoveryIssue> {
	if config.external_plugins_enabled {
		return Ok(());
	}
	match metadata.get(IS_INTERNAL_KEY) {
		None | Some(Value::Bool(true)) => Ok(()),
		Some(Value::Bool(false)) => Err(DiscoveryIssue::Disabled {
			adapter_type: adapter_type.clone(),
		}),
		Some(_) => Err(DiscoveryIssue::CorruptInternalFlag {
			adapter_type: adapter_type.clone(),
		}),
	}
}

#[cfg(test)]
mod tests;
