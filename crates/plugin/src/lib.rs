//! Plugin manifests, the type derivation graph and the plugin registry.
//!
//! # Purpose
//!
//! Plugins describe the types they provide in JSON manifests. This crate reads
//! those manifests, builds the derivation graph between the declared types,
//! and keeps per-type metadata and per-plugin load state so higher layers can
//! discover implementations without opening any plugin code.
//!
//! # Mental Model
//!
//! 1. **Collect:** [`PluginRegistryBuilder`] queues manifests from JSON, from the
//!    filesystem ([`discovery`]) or from `inventory` submissions, plus load hooks.
//! 2. **Build:** [`PluginRegistryBuilder::build`] produces an immutable
//!    [`PluginRegistry`] that owns the [`TypeGraph`] and the schema name table.
//! 3. **Load:** [`Plugin::load`] runs a plugin's load hook at most once.
//!
//! # Invariants
//!
//! - A type is owned by exactly one plugin (first declaration wins).
//!   - Enforced in: [`PluginRegistryBuilder::build`].
//!   - Failure symptom: metadata of a later duplicate silently ignored.
//! - A plugin's load hook runs at most once per process.
//!   - Enforced in: [`Plugin::load`] (`OnceLock`).
//!   - Failure symptom: side effects of plugin initialization repeated.

pub mod discovery;
mod error;
mod manifest;
mod plugin;
mod registry;
mod types;

pub use error::{LoadError, ManifestError};
pub use manifest::{
	Metadata, PluginDecl, PluginKind, PluginManifest, SCHEMA_NAME_KEY, StaticManifest, TypeDecl,
};
pub use plugin::{LoadHook, LoadHookDef, Plugin};
pub use registry::{PluginRegistry, PluginRegistryBuilder};
pub use types::{TypeGraph, TypeHandle};
