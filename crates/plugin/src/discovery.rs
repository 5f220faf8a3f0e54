//! Manifest search on the filesystem.

use std::path::PathBuf;

use tracing::debug;
use walkdir::WalkDir;

/// Environment variable holding the plugin search path.
///
/// Uses the platform path-list separator. Entries may name manifest files
/// directly or directories to search.
pub const PLUGIN_PATH_ENV: &str = "LUMEN_PLUGIN_PATH";

/// File name looked for inside search directories.
pub const MANIFEST_FILE_NAME: &str = "pluginInfo.json";

/// Splits [`PLUGIN_PATH_ENV`] into its entries; empty when unset.
pub fn search_path_from_env() -> Vec<PathBuf> {
	std::env::var_os(PLUGIN_PATH_ENV)
		.map(|value| std::env::split_paths(&value).filter(|p| !p.as_os_str().is_empty()).collect())
		.unwrap_or_default()
}

/// Resolves search roots into manifest files.
///
/// File roots are taken as-is. Directory roots are walked recursively for
/// [`MANIFEST_FILE_NAME`], in file-name order so the result is stable. Missing
/// roots are skipped.
pub fn find_manifests(roots: &[PathBuf]) -> Vec<PathBuf> {
	let mut found = Vec::new();
	for root in roots {
		if root.is_file() {
			found.push(root.clone());
			continue;
		}
		if !root.is_dir() {
			debug!(root = %root.display(), "plugin search root does not exist");
			continue;
		}

		let manifests = WalkDir::new(root)
			.follow_links(true)
			.sort_by_file_name()
			.into_iter()
			.filter_map(Result::ok)
			.filter(|entry| entry.file_type().is_file() && entry.file_name() == MANIFEST_FILE_NAME)
			.map(walkdir::DirEntry::into_path);
		found.extend(manifests);
	}
	found
}
