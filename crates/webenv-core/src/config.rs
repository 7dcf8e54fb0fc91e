//! Project configuration loading.
//!
//! Reads the fields webenv cares about from `package.json` and the optional
//! `app.json` app manifest (either flat or nested under an `expo` key).

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use webenv_util::read_to_string_lossy;

/// Default output folder for production builds, relative to the project root.
pub const DEFAULT_WEB_OUTPUT: &str = "web-build";

/// Fields read from `package.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageJson {
    #[serde(default)]
    pub name: Option<String>,
    /// Public URL the app is served from.
    #[serde(default)]
    pub homepage: Option<String>,
    /// Entry module.
    #[serde(default)]
    pub main: Option<String>,
}

/// Fields read from the app manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppManifest {
    #[serde(default, rename = "entryPoint")]
    pub entry_point: Option<String>,
    #[serde(default)]
    pub web: Option<WebManifest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebManifest {
    #[serde(default)]
    pub build: Option<WebBuildManifest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebBuildManifest {
    #[serde(default)]
    pub output: Option<String>,
}

impl AppManifest {
    /// Output folder for web builds, `web-build` unless configured.
    #[must_use]
    pub fn web_output_path(&self) -> &str {
        self.web
            .as_ref()
            .and_then(|web| web.build.as_ref())
            .and_then(|build| build.output.as_deref())
            .unwrap_or(DEFAULT_WEB_OUTPUT)
    }
}

/// Output folder for an optional manifest.
#[must_use]
pub fn web_output_path(exp: Option<&AppManifest>) -> &str {
    exp.map_or(DEFAULT_WEB_OUTPUT, AppManifest::web_output_path)
}

/// Loaded project configuration.
#[derive(Debug, Clone, Default)]
pub struct ProjectConfig {
    /// App manifest; defaults when the project has no `app.json`.
    pub exp: AppManifest,
    /// Package manifest.
    pub pkg: PackageJson,
}

/// Load `package.json` and `app.json` from `project_root`.
///
/// A missing or malformed `package.json` is an error; a missing `app.json` is not.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let pkg_path = project_root.join("package.json");
    let pkg: PackageJson = read_json(&pkg_path)?;

    let app_path = project_root.join("app.json");
    let exp = if app_path.is_file() {
        let value: serde_json::Value = read_json(&app_path)?;
        let inner = match value {
            serde_json::Value::Object(mut obj) if obj.contains_key("expo") => {
                obj.remove("expo").unwrap_or_default()
            }
            other => other,
        };
        serde_json::from_value(inner).map_err(|source| Error::ConfigParse {
            path: app_path.clone(),
            source,
        })?
    } else {
        AppManifest::default()
    };

    Ok(ProjectConfig { exp, pkg })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_to_string_lossy(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}
