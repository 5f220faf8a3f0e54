use lumen_plugin::{LoadError, TypeHandle};

use crate::key::AdapterKey;

/// Something discovery noticed about a candidate adapter.
///
/// None of these abort the build. Data errors mean a manifest is wrong;
/// the remaining variants record candidates that were legitimately left out or
/// overridden.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiscoveryIssue {
	#[error("no plugin owns adapter type '{adapter_type}'")]
	NoOwningModule { adapter_type: TypeHandle },

	#[error("adapter type '{adapter_type}' disabled because external plugins are disabled")]
	Disabled { adapter_type: TypeHandle },

	#[error("isInternal metadata of '{adapter_type}' is corrupted; not holding bool")]
	CorruptInternalFlag { adapter_type: TypeHandle },

	#[error("primTypeName metadata is not present for '{adapter_type}'")]
	MissingKey { adapter_type: TypeHandle },

	#[error("primTypeName metadata of '{adapter_type}' is corrupted; not holding string")]
	CorruptKey { adapter_type: TypeHandle },

	#[error("includeDerivedPrimTypes metadata of '{adapter_type}' is corrupted; not holding bool")]
	CorruptIncludeDerived { adapter_type: TypeHandle },

	/// Two adapters declared the same key; the later one replaced the earlier.
	#[error("key '{key}' declared by both '{replaced}' and '{winner}'; using '{winner}'")]
	DuplicateKey {
		key: AdapterKey,
		replaced: TypeHandle,
		winner: TypeHandle,
	},
}

impl DiscoveryIssue {
	/// True for malformed or missing metadata, as opposed to policy outcomes.
	pub fn is_data_error(&self) -> bool {
		matches!(
			self,
			Self::CorruptInternalFlag { .. }
				| Self::MissingKey { .. }
				| Self::CorruptKey { .. }
				| Self::CorruptIncludeDerived { .. }
				| Self::DuplicateKey { .. }
		)
	}

	/// Adapter type the issue is about; the winner for duplicates.
	pub fn adapter_type(&self) -> &TypeHandle {
		match self {
			Self::NoOwningModule { adapter_type }
			| Self::Disabled { adapter_type }
			| Self::CorruptInternalFlag { adapter_type }
			| Self::MissingKey { adapter_type }
			| Self::CorruptKey { adapter_type }
			| Self::CorruptIncludeDerived { adapter_type } => adapter_type,
			Self::DuplicateKey { winner, .. } => winner,
		}
	}
}

/// Why [`crate::AdapterRegistry::construct`] produced no adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructError {
	/// The key is neither reserved nor mapped. Not a fault by itself.
	#[error("unknown key '{key}'")]
	UnknownKey { key: String },

	#[error("no plugin owns adapter type '{adapter_type}'")]
	ModuleMissing { adapter_type: TypeHandle },

	#[error("plugin for adapter type '{adapter_type}' could not be loaded: {source}")]
	ModuleLoad {
		adapter_type: TypeHandle,
		#[source]
		source: LoadError,
	},

	#[error("cannot manufacture type '{adapter_type}' for key '{key}': no factory registered")]
	NoFactory { adapter_type: TypeHandle, key: AdapterKey },

	#[error("failed to instantiate type '{adapter_type}' for key '{key}'")]
	Instantiation { adapter_type: TypeHandle, key: AdapterKey },
}

impl ConstructError {
	/// True for a plain lookup miss, false for configuration or coding errors.
	pub fn is_unknown_key(&self) -> bool {
		matches!(self, Self::UnknownKey { .. })
	}

	/// Adapter type the failure concerns; `None` for unknown keys.
	pub fn adapter_type(&self) -> Option<&TypeHandle> {
		match self {
			Self::UnknownKey { .. } => None,
			Self::ModuleMissing { adapter_type }
			| Self::ModuleLoad { adapter_type, .. }
			| Self::NoFactory { adapter_type, .. }
			| Self::Instantiation { adapter_type, .. } => Some(adapter_type),
		}
	}
}
