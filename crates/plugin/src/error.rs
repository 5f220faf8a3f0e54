use std::path::PathBuf;

/// Failure to read or decode a plugin manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
	#[error("failed to read manifest {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("malformed manifest {origin}: {source}")]
	Json {
		origin: String,
		#[source]
		source: serde_json::Error,
	},
}

/// Failure to bring a plugin into a usable state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
	/// Library plugins need a load hook; none was registered.
	#[error("plugin '{plugin}' has no load hook registered")]
	NoLoader { plugin: String },

	/// The registered load hook reported a failure.
	#[error("plugin '{plugin}' failed to load: {reason}")]
	Failed { plugin: String, reason: String },
}
