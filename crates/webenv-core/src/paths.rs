//! Project path resolution.
//!
//! Computes the absolute locations used throughout a bundler config: the
//! package manifest, the (workspace-aware) `node_modules` folder, the HTML
//! template folder and the production output folder.

use crate::config::{load_project_config, web_output_path, ProjectConfig};
use crate::entry::get_entry_point;
use crate::env::EnvSnapshot;
use crate::error::{Error, Result};
use crate::options::WebEnv;
use crate::public_path::served_path_for;
use crate::workspace::find_workspace_root;
use serde::Serialize;
use std::path::{Path, PathBuf};
use webenv_util::resolve_path;

/// Entry candidates probed when the manifest names none.
const ENTRY_FILES: &[&str] = &["./index", "./src/index"];

/// Find the project root by walking up from `cwd` looking for `package.json`.
///
/// Returns the first directory containing one, or `None` if there is none.
#[must_use]
pub fn project_root(cwd: &Path) -> Option<PathBuf> {
    let mut current = cwd.to_path_buf();

    loop {
        if current.join("package.json").is_file() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Infer the project root from the current working directory.
pub fn possible_project_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    project_root(&cwd).ok_or(Error::ProjectRootNotFound { start: cwd })
}

/// Resolve a path relative to `project_root`, leaving remote URLs untouched.
///
/// A single component starting with `http` is returned as-is.
#[must_use]
pub fn get_absolute(project_root: &Path, components: &[&str]) -> PathBuf {
    if let [single] = components {
        if single.starts_with("http") {
            return PathBuf::from(single);
        }
    }
    resolve_path(project_root, components)
}

/// Absolute production output folder of the project.
pub fn get_production_path(project_root: &Path) -> Result<PathBuf> {
    let config = load_project_config(project_root)?;
    Ok(get_absolute(project_root, &[config.exp.web_output_path()]))
}

/// `node_modules` of the enclosing workspace, or of the project itself.
pub fn modules_path(project_root: &Path) -> Result<PathBuf> {
    let root = resolve_path::<&str>(project_root, &[]);
    let base = find_workspace_root(&root)?.unwrap_or(root);
    Ok(base.join("node_modules"))
}

#[derive(Debug, Clone)]
enum GroupSource {
    /// Project override folder first, packaged default second.
    Template { override_dir: PathBuf, default_dir: PathBuf },
    /// Always the output folder.
    Production { folder: PathBuf },
}

/// Well-known files of a template or output folder.
///
/// Template and production groups share this shape so callers can treat
/// them uniformly.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathGroup {
    #[serde(skip)]
    source: GroupSource,
    pub folder: PathBuf,
    pub index_html: PathBuf,
    pub manifest: PathBuf,
    pub serve_json: PathBuf,
    pub favicon: PathBuf,
}

impl PathGroup {
    fn new(source: GroupSource) -> Self {
        let mut group = Self {
            source,
            folder: PathBuf::new(),
            index_html: PathBuf::new(),
            manifest: PathBuf::new(),
            serve_json: PathBuf::new(),
            favicon: PathBuf::new(),
        };
        group.folder = group.get("");
        group.index_html = group.get("index.html");
        group.manifest = group.get("manifest.json");
        group.serve_json = group.get("serve.json");
        group.favicon = group.get("favicon.ico");
        group
    }

    /// Resolve `filename` inside this group.
    ///
    /// Template lookups check the project override on every call, so files
    /// created after resolution are still picked up.
    #[must_use]
    pub fn get(&self, filename: &str) -> PathBuf {
        match &self.source {
            GroupSource::Template {
                override_dir,
                default_dir,
            } => {
                let candidate = resolve_path(override_dir, &[filename]);
                if candidate.exists() {
                    candidate
                } else {
                    resolve_path(default_dir, &[filename])
                }
            }
            GroupSource::Production { folder } => resolve_path(folder, &[filename]),
        }
    }
}

/// Resolved project locations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub package_json: PathBuf,
    /// `node_modules` folder, shared with the workspace when there is one.
    pub modules: PathBuf,
    /// URL path the app is served from, always ending in `/`.
    pub served_path: String,
    pub app_main: Option<PathBuf>,
    pub template: PathGroup,
    pub production: PathGroup,
}

impl ProjectPaths {
    /// Resolve `components` against the project root; see [`get_absolute`].
    #[must_use]
    pub fn absolute(&self, components: &[&str]) -> PathBuf {
        get_absolute(&self.root, components)
    }

    /// Resolve a path inside the `node_modules` folder.
    #[must_use]
    pub fn include_module(&self, components: &[&str]) -> PathBuf {
        resolve_path(&self.modules, components)
    }
}

/// Resolve every project path.
///
/// Without `project_root` the root is inferred from the working directory.
/// Failing to read the project config is an error.
pub fn resolve_paths(
    project_root: Option<&Path>,
    env: &WebEnv,
    snapshot: &EnvSnapshot,
) -> Result<ProjectPaths> {
    let root = match project_root {
        Some(root) => root.to_path_buf(),
        None => possible_project_root()?,
    };
    let config = load_project_config(&root)?;
    parse_paths(&root, Some(&config), env, snapshot)
}

/// Async variant of [`resolve_paths`].
///
/// A project config that cannot be loaded is treated as absent instead of
/// failing: the default output folder is used and `homepage` is ignored.
pub async fn resolve_paths_async(
    project_root: Option<PathBuf>,
    env: WebEnv,
    snapshot: EnvSnapshot,
) -> Result<ProjectPaths> {
    tokio::task::spawn_blocking(move || {
        let root = match project_root {
            Some(root) => root,
            None => possible_project_root()?,
        };
        let config = match load_project_config(&root) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::debug!(error = %e, "project config unavailable, using defaults");
                None
            }
        };
        parse_paths(&root, config.as_ref(), &env, &snapshot)
    })
    .await
    .map_err(|e| Error::other(format!("path resolution task failed: {e}")))?
}

fn parse_paths(
    root: &Path,
    config: Option<&ProjectConfig>,
    env: &WebEnv,
    snapshot: &EnvSnapshot,
) -> Result<ProjectPaths> {
    let root = resolve_path::<&str>(root, &[]);
    let modules = modules_path(&root)?;
    let output = get_absolute(&root, &[web_output_path(config.map(|c| &c.exp))]);

    let template = PathGroup::new(GroupSource::Template {
        override_dir: resolve_path(&root, &[env.platform.as_str()]),
        default_dir: env.default_template_dir.clone(),
    });
    let production = PathGroup::new(GroupSource::Production { folder: output });

    let platforms = env.platform.extensions();
    let app_main = match get_entry_point(&root, ENTRY_FILES, &platforms, config) {
        Ok(entry) => entry,
        Err(e) => {
            tracing::debug!(error = %e, "no entry point");
            None
        }
    };

    Ok(ProjectPaths {
        package_json: root.join("package.json"),
        served_path: served_path_for(config.map(|c| &c.pkg), snapshot),
        modules,
        app_main,
        template,
        production,
        root,
    })
}
