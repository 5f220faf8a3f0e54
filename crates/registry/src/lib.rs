//! Prim adapter registry.
//!
//! # Purpose
//!
//! Maps a prim type key (e.g. `Mesh`) to the adapter implementation that
//! handles it and manufactures adapters on demand. Adapters are discovered from
//! plugin metadata, and an adapter may opt into covering every derived prim
//! type that has no adapter of its own.
//!
//! # Mental Model
//!
//! 1. **Walk:** [`discover`] enumerates every type deriving from
//!    [`PRIM_ADAPTER_BASE`] and reads its metadata into explicit declarations
//!    and opt-in keys.
//! 2. **Map:** [`MappingTable::build`] writes explicit declarations, then
//!    propagates opted-in adapters down the prim type hierarchy.
//! 3. **Serve:** [`AdapterRegistry`] builds the table once, lazily, and answers
//!    [`AdapterRegistry::has_key`], [`AdapterRegistry::keys`] and
//!    [`AdapterRegistry::construct`].
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`AdapterRegistry`] | Lazily built, immutable resolution surface. |
//! | [`MappingTable`] | Key → adapter type entries with provenance. |
//! | [`RegistrySources`] | Collaborators: hierarchy, modules, schema, factories. |
//! | [`FactoryTable`] | Adapter factories keyed by implementation type. |
//! | [`ConstructError`] | Why no adapter could be manufactured. |
//!
//! # Concurrency
//!
//! - **Build:** once per registry under `OnceLock`; concurrent first callers
//!   block until it completes and never see a partial table.
//! - **Reads:** lock-free over the immutable table.

mod adapter;
mod bridge;
pub mod config;
mod discover;
mod error;
mod key;
mod mapping;
mod registry;
mod sources;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use adapter::{
	AdapterFactory, AdapterFactoryDef, FactoryTable, INSTANCE_ADAPTER_TYPE, InstanceAdapter, PrimAdapter,
};
pub use config::RegistryConfig;
pub use discover::{
	Discovery, INCLUDE_DERIVED_KEY, IS_INTERNAL_KEY, PRIM_ADAPTER_BASE, PRIM_TYPE_NAME_KEY, discover,
};
pub use error::{ConstructError, DiscoveryIssue};
pub use key::{AdapterKey, INSTANCE_ADAPTER_KEY, RESERVED_KEYS, is_reserved};
pub use lumen_plugin::{LoadError, Metadata, TypeHandle};
pub use mapping::{DiscoveryReport, Mapping, MappingOrigin, MappingTable};
pub use registry::AdapterRegistry;
pub use sources::{
	FactorySource, Module, ModuleCatalog, RegistrySources, SchemaTranslator, TypeHierarchy,
};
