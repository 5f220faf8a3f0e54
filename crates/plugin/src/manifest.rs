//! Plugin manifest schema.
//!
//! A manifest is a JSON document listing plugins and the types each plugin
//! provides:
//!
//! ```json
//! {
//!   "plugins": [
//!     {
//!       "name": "lumenGeom",
//!       "kind": "library",
//!       "types": {
//!         "MeshAdapter": {
//!           "bases": ["LumenPrimAdapter"],
//!           "primTypeName": "Mesh",
//!           "includeDerivedPrimTypes": true
//!         },
//!         "Mesh": { "bases": ["Gprim"], "schemaName": "Mesh" }
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! Every key of a type entry other than `bases` is kept verbatim as per-type
//! [`Metadata`]. Values are not validated here; consumers decode the keys they
//! care about and report malformed values themselves.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ManifestError;

/// Free-form per-type metadata.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Metadata key naming the schema key of a declared type.
pub const SCHEMA_NAME_KEY: &str = "schemaName";

/// How a plugin becomes usable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginKind {
	/// Code that must be brought in by a registered load hook.
	#[default]
	Library,
	/// Data only; always loadable.
	Resource,
	/// Compiled into the host; always loadable.
	Builtin,
}

impl std::fmt::Display for PluginKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Library => write!(f, "library"),
			Self::Resource => write!(f, "resource"),
			Self::Builtin => write!(f, "builtin"),
		}
	}
}

/// One declared type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TypeDecl {
	#[serde(default)]
	pub bases: Vec<String>,
	#[serde(flatten)]
	pub metadata: Metadata,
}

/// One plugin entry.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginDecl {
	pub name: String,
	#[serde(default)]
	pub kind: PluginKind,
	/// Declared types, in declaration order.
	#[serde(default)]
	pub types: IndexMap<String, TypeDecl>,
}

/// Top-level manifest document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PluginManifest {
	#[serde(default)]
	pub plugins: Vec<PluginDecl>,
}

impl PluginManifest {
	/// Parses a manifest; `origin` names the document in error messages.
	pub fn from_json(origin: &str, json: &str) -> Result<Self, ManifestError> {
		serde_json::from_str(json).map_err(|source| ManifestError::Json {
			origin: origin.to_string(),
			source,
		})
	}

	/// Reads and parses a manifest file.
	pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
		let json = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_json(&path.display().to_string(), &json)
	}
}

/// A manifest compiled into the binary.
///
/// Submitted with `inventory::submit!` and picked up by
/// [`crate::PluginRegistryBuilder::add_static_manifests`].
pub struct StaticManifest {
	/// Label used in diagnostics.
	pub origin: &'static str,
	pub json: &'static str,
}

inventory::collect!(StaticManifest);
