//! Build and capability information reported by `webenv version`.

use crate::options::DEFAULT_TEMPLATE_DIR;
use crate::platform::Platform;
use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What this build of webenv is and what it targets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: &'static str,
    /// Commit the binary was built from, when the build provided one.
    pub git_hash: Option<&'static str>,
    pub platforms: Vec<&'static str>,
    pub default_template_dir: &'static str,
}

impl VersionInfo {
    #[must_use]
    pub fn current() -> Self {
        Self {
            version: VERSION,
            git_hash: option_env!("WEBENV_BUILD_GIT_HASH"),
            platforms: Platform::ALL.iter().map(Platform::as_str).collect(),
            default_template_dir: DEFAULT_TEMPLATE_DIR,
        }
    }
}

/// One-line version, e.g. `webenv 0.2.0 (abc123)`.
#[must_use]
pub fn version_string() -> String {
    let info = VersionInfo::current();
    match info.git_hash {
        Some(hash) => format!("webenv {} ({hash})", info.version),
        None => format!("webenv {}", info.version),
    }
}
