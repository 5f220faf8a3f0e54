//! Lumen adapter registry inspector.
//!
//! Builds the adapter registry from plugin manifests and prints:
//! - the key table with each key's provenance
//! - the resolution of a single key
//! - discovery diagnostics

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use lumen_plugin::{PluginRegistryBuilder, discovery};
use lumen_registry::{
	AdapterRegistry, FactoryTable, MappingOrigin, RegistryConfig, RegistrySources, is_reserved,
};
use tracing::info;

/// Inspector command line arguments.
#[derive(Parser, Debug)]
#[command(name = "lumen-inspect")]
#[command(about = "Inspect prim adapter mappings discovered from plugin manifests")]
struct Args {
	/// Manifest file or directory to search, in addition to LUMEN_PLUGIN_PATH
	#[arg(short, long = "manifest", value_name = "PATH")]
	manifests: Vec<PathBuf>,

	/// Only accept adapters of internal plugins
	#[arg(long)]
	no_external: bool,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// List every mapped key
	Keys,
	/// Show which adapter a key resolves to
	Resolve { key: String },
	/// Manufacture the adapter for a key
	Construct { key: String },
	/// Show discovery diagnostics
	Report,
}

fn main() -> ExitCode {
	let args = Args::parse();
	setup_tracing(args.verbose);

	let registry = build_registry(&args);
	match &args.command {
		Command::Keys => {
			for (key, mapping) in registry.table().iter() {
				println!("{key}\t{}\t{}", mapping.adapter_type, origin(&mapping.origin));
			}
			ExitCode::SUCCESS
		}
		Command::Resolve { key } => resolve(&registry, key),
		Command::Construct { key } => match registry.construct(key) {
			Ok(adapter) => {
				println!("{key}\t{}", adapter.type_name());
				ExitCode::SUCCESS
			}
			Err(e) => {
				eprintln!("{e}");
				ExitCode::FAILURE
			}
		},
		Command::Report => {
			let report = registry.report();
			for issue in report.issues() {
				let level = if issue.is_data_error() { "error" } else { "note" };
				println!("{level}: {issue}");
			}
			if report.is_clean() {
				ExitCode::SUCCESS
			} else {
				ExitCode::FAILURE
			}
		}
	}
}

fn build_registry(args: &Args) -> AdapterRegistry {
	let mut roots = args.manifests.clone();
	roots.extend(discovery::search_path_from_env());

	let mut builder = PluginRegistryBuilder::new();
	builder.add_static_manifests().add_static_hooks();
	let found = builder.discover(&roots);
	let plugins = Arc::new(builder.build());
	info!(manifests = found, plugins = plugins.len(), "plugins loaded");

	let config = if args.no_external {
		RegistryConfig {
			external_plugins_enabled: false,
		}
	} else {
		RegistryConfig::from_env()
	};
	let sources = RegistrySources::from_plugins(plugins, FactoryTable::global());
	AdapterRegistry::new(sources, config)
}

fn resolve(registry: &AdapterRegistry, key: &str) -> ExitCode {
	if is_reserved(key) {
		println!("{key}\t{}\treserved", lumen_registry::INSTANCE_ADAPTER_TYPE);
		return ExitCode::SUCCESS;
	}
	match registry.resolve(key) {
		Some(mapping) => {
			println!("{key}\t{}\t{}", mapping.adapter_type, origin(&mapping.origin));
			ExitCode::SUCCESS
		}
		None => {
			eprintln!("unknown key '{key}'");
			ExitCode::FAILURE
		}
	}
}

fn origin(origin: &MappingOrigin) -> String {
	match origin {
		MappingOrigin::Explicit => "explicit".to_string(),
		MappingOrigin::Inherited { from } => format!("inherited from {from}"),
	}
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("lumen_registry=debug,lumen_plugin=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}
