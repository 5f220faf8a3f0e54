use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

use super::{Discovery, PRIM_ADAPTER_BASE, discover};
use crate::config::RegistryConfig;
use crate::error::DiscoveryIssue;
use crate::key::AdapterKey;
use crate::test_fixtures::{Fixture, adapter, adapter_with, inheriting, prim};
use lumen_plugin::{TypeGraph, TypeHandle};

fn run(fixture: Fixture) -> Discovery {
	let (plugins, _, config) = fixture.parts();
	discover(&*plugins, &*plugins, &TypeHandle::from(PRIM_ADAPTER_BASE), config)
}

fn pair(key: &str, ty: &str) -> (AdapterKey, TypeHandle) {
	(AdapterKey::from(key), TypeHandle::from(ty))
}

/// Candidates come out in ascending type order with their opt-in keys.
#[test]
fn test_discovery_order_and_opt_in() {
	let discovery = run(Fixture::new().resource(
		"adapters",
		vec![
			("SphereAdapter", adapter("Sphere")),
			("CubeAdapter", inheriting("Cube")),
			("MeshAdapter", inheriting("Mesh")),
		],
	));

	assert_eq!(
		discovery.explicit,
		vec![
			pair("Cube", "CubeAdapter"),
			pair("Mesh", "MeshAdapter"),
			pair("Sphere", "SphereAdapter"),
		]
	);
	assert_eq!(discovery.include_derived, vec![AdapterKey::from("Cube"), AdapterKey::from("Mesh")]);
	assert!(discovery.issues.is_empty());
}

/// Types outside the adapter hierarchy are never candidates.
#[test]
fn test_only_adapter_descendants_are_walked() {
	let discovery = run(Fixture::new().resource(
		"mixed",
		vec![
			("CubeAdapter", adapter("Cube")),
			("Cube", prim(&[], "Cube")),
		],
	));
	assert_eq!(discovery.explicit, vec![pair("Cube", "CubeAdapter")]);
}

/// A candidate without `primTypeName` is reported and dropped.
#[test]
fn test_missing_key_is_skipped() {
	let discovery = run(Fixture::new().resource(
		"adapters",
		vec![("Anonymous", adapter_with(json!({ "includeDerivedPrimTypes": true })))],
	));

	assert!(discovery.explicit.is_empty());
	assert!(discovery.include_derived.is_empty());
	assert_eq!(
		discovery.issues,
		vec![DiscoveryIssue::MissingKey {
			adapter_type: TypeHandle::from("Anonymous")
		}]
	);
}

/// A non-string `primTypeName` is reported and dropped.
#[test]
fn test_corrupt_key_is_skipped() {
	let discovery = run(Fixture::new().resource(
		"adapters",
		vec![("Numbered", adapter_with(json!({ "primTypeName": 7 })))],
	));

	assert!(discovery.explicit.is_empty());
	assert_eq!(
		discovery.issues,
		vec![DiscoveryIssue::CorruptKey {
			adapter_type: TypeHandle::from("Numbered")
		}]
	);
}

/// A corrupt opt-in flag only costs the candidate its propagation.
#[test]
fn test_corrupt_include_derived_keeps_explicit_mapping() {
	let discovery = run(Fixture::new().resource(
		"adapters",
		vec![(
			"CubeAdapter",
			adapter_with(json!({ "primTypeName": "Cube", "includeDerivedPrimTypes": "yes" })),
		)],
	));

	assert_eq!(discovery.explicit, vec![pair("Cube", "CubeAdapter")]);
	assert!(discovery.include_derived.is_empty());
	assert_eq!(
		discovery.issues,
		vec![DiscoveryIssue::CorruptIncludeDerived {
			adapter_type: TypeHandle::from("CubeAdapter")
		}]
	);
}

/// Enablement matrix for the external-plugin toggle and `isInternal`.
#[rstest]
#[case::external_on_absent(true, None, Some(true))]
#[case::external_on_external(true, Some(json!(false)), Some(true))]
#[case::external_on_corrupt(true, Some(json!("nope")), Some(true))]
#[case::external_off_absent(false, None, Some(true))]
#[case::external_off_internal(false, Some(json!(true)), Some(true))]
#[case::external_off_external(false, Some(json!(false)), Some(false))]
#[case::external_off_corrupt(false, Some(json!(1)), None)]
fn test_enablement(#[case] external: bool, #[case] is_internal: Option<Value>, #[case] accepted: Option<bool>) {
	let mut metadata = json!({ "primTypeName": "Cube" });
	if let Some(flag) = is_internal {
		metadata["isInternal"] = flag;
	}
	let discovery = run(Fixture::new()
		.resource("adapters", vec![("CubeAdapter", adapter_with(metadata))])
		.external_plugins(external));

	let adapter_type = TypeHandle::from("CubeAdapter");
	match accepted {
		Some(true) => {
			assert_eq!(discovery.explicit, vec![pair("Cube", "CubeAdapter")]);
			assert!(discovery.issues.is_empty());
		}
		Some(false) => {
			assert!(discovery.explicit.is_empty());
			assert_eq!(discovery.issues, vec![DiscoveryIssue::Disabled { adapter_type }]);
		}
		None => {
			assert!(discovery.explicit.is_empty());
			assert_eq!(discovery.issues, vec![DiscoveryIssue::CorruptInternalFlag { adapter_type }]);
		}
	}
}

/// Types the hierarchy knows but no plugin owns are skipped without error.
#[test]
fn test_unowned_type_is_skipped() {
	let (plugins, _, _) = Fixture::new().resource("adapters", vec![("CubeAdapter", adapter("Cube"))]).parts();

	let mut graph = TypeGraph::new();
	graph.declare("CubeAdapter".into(), [TypeHandle::from(PRIM_ADAPTER_BASE)]);
	graph.declare("GhostAdapter".into(), [TypeHandle::from(PRIM_ADAPTER_BASE)]);

	let base = TypeHandle::from(PRIM_ADAPTER_BASE);
	let discovery = discover(&graph, &*plugins, &base, RegistryConfig::default());
	assert_eq!(discovery.explicit, vec![pair("Cube", "CubeAdapter")]);

	let issue = &discovery.issues[0];
	assert_eq!(
		issue,
		&DiscoveryIssue::NoOwningModule {
			adapter_type: TypeHandle::from("GhostAdapter")
		}
	);
	assert!(!issue.is_data_error());
}
