//! Registry configuration.
//!
//! One toggle controls whether plugins outside the internal set take part in
//! discovery. It is read from [`ENABLE_PLUGINS_ENV`] once per process and
//! cached; [`RegistryConfig`] can also be built directly, which is what tests
//! and embedders with their own configuration source do.

use std::sync::OnceLock;

use tracing::debug;

/// Environment variable gating external plugins. Defaults to enabled.
pub const ENABLE_PLUGINS_ENV: &str = "LUMEN_ENABLE_PLUGINS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
	/// When true every discovered adapter is accepted. When false only adapters
	/// without an `isInternal` declaration, or declaring `isInternal: true`,
	/// are accepted.
	pub external_plugins_enabled: bool,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			external_plugins_enabled: true,
		}
	}
}

impl RegistryConfig {
	/// Reads the configuration from the environment, uncached.
	pub fn from_env() -> Self {
		Self::from_value(std::env::var(ENABLE_PLUGINS_ENV).ok().as_deref())
	}

	/// Builds the configuration from the raw [`ENABLE_PLUGINS_ENV`] value.
	///
	/// `None` means the variable is unset.
	pub fn from_value(value: Option<&str>) -> Self {
		Self {
			external_plugins_enabled: value.is_none_or(|v| parse_bool(v, true)),
		}
	}

	/// Process-wide configuration, read from the environment on first use.
	pub fn global() -> Self {
		static CONFIG: OnceLock<RegistryConfig> = OnceLock::new();
		*CONFIG.get_or_init(|| {
			let config = Self::from_env();
			debug!(
				external_plugins_enabled = config.external_plugins_enabled,
				"registry configuration loaded"
			);
			config
		})
	}
}

/// Decodes an environment boolean.
///
/// Blank values fall back to `default`. `1`, `true`, `yes` and `on` (any case)
/// are true; every other value is false.
pub(crate) fn parse_bool(value: &str, default: bool) -> bool {
	let value = value.trim();
	if value.is_empty() {
		return default;
	}
	matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
