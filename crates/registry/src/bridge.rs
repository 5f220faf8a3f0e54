use std::sync::Arc;

use lumen_plugin::TypeHandle;
use tracing::{debug, error};

use crate::adapter::PrimAdapter;
use crate::error::ConstructError;
use crate::key::AdapterKey;
use crate::sources::{FactorySource, ModuleCatalog};

/// Loads the module owning `adapter_type` and runs its factory.
///
/// Every failure is logged as an error: once a key resolved to a type, not
/// being able to manufacture it is a configuration or coding fault.
pub(crate) fn manufacture(
	modules: &dyn ModuleCatalog,
	factories: &dyn FactorySource,
	key: &AdapterKey,
	adapter_type: &TypeHandle,
) -> Result<Arc<dyn PrimAdapter>, ConstructError> {
	let result = load_and_instantiate(modules, factories, key, adapter_type);
	match &result {
		Ok(_) => debug!(%key, ty = %adapter_type, "[load] adapter manufactured"),
		Err(e) => error!("[load] {e}"),
	}
	result
}

fn load_and_instantiate(
	modules: &dyn ModuleCatalog,
	factories: &dyn FactorySource,
	key: &AdapterKey,
	adapter_type: &TypeHandle,
) -> Result<Arc<dyn PrimAdapter>, ConstructError> {
	let module = modules
		.owning_module(adapter_type)
		.ok_or_else(|| ConstructError::ModuleMissing {
			adapter_type: adapter_type.clone(),
		})?;
	module
		.ensure_loaded()
		.map_err(|source| ConstructError::ModuleLoad {
			adapter_type: adapter_type.clone(),
			source,
		})?;

	let factory = factories
		.factory_for(adapter_type)
		.ok_or_else(|| ConstructError::NoFactory {
			adapter_type: adapter_type.clone(),
			key: key.clone(),
		})?;

	factory().ok_or_else(|| ConstructError::Instantiation {
		adapter_type: adapter_type.clone(),
		key: key.clone(),
	})
}
