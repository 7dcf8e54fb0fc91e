use crate::mode::Mode;
use crate::platform::Platform;
use std::path::PathBuf;

/// Directory holding the packaged default web template.
pub const DEFAULT_TEMPLATE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/web-default");

/// Bundler environment: where the project lives and what is being built.
#[derive(Debug, Clone)]
pub struct WebEnv {
    /// Project root directory.
    pub project_root: PathBuf,
    /// Target platform.
    pub platform: Platform,
    /// Explicit mode, if any.
    pub mode: Option<Mode>,
    /// Force production mode.
    pub production: bool,
    /// Force development mode.
    pub development: bool,
    /// Whether HTTPS was requested for the dev server.
    pub https: bool,
    /// Fallback template folder used when the project has no override.
    pub default_template_dir: PathBuf,
}

impl WebEnv {
    /// Create an environment for `project_root` with web defaults.
    #[must_use]
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            platform: Platform::default(),
            mode: None,
            production: false,
            development: false,
            https: false,
            default_template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
        }
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    #[must_use]
    pub fn with_https(mut self, https: bool) -> Self {
        self.https = https;
        self
    }

    #[must_use]
    pub fn with_default_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.default_template_dir = dir.into();
        self
    }
}
