//! Workspace root detection for monorepos.
//!
//! Walks up from a project directory looking for a `package.json` whose
//! `workspaces` field covers the project. The first manifest declaring
//! workspaces decides: if its patterns do not match, there is no workspace.

use crate::error::{Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use webenv_util::{normalize_lexically, read_to_string_lossy};

const MATCH_OPTIONS: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Find the workspace root that contains `start`.
///
/// Returns `Ok(None)` when no ancestor declares a matching workspace. An
/// ancestor `package.json` that ends prematurely (empty or truncated) also
/// counts as "no workspace"; any other parse failure is an error.
pub fn find_workspace_root(start: &Path) -> Result<Option<PathBuf>> {
    let start = normalize_lexically(start);
    let mut current = start.clone();

    loop {
        let manifest = current.join("package.json");
        if manifest.is_file() {
            let content = read_to_string_lossy(&manifest)?;
            let package: Value = match serde_json::from_str(&content) {
                Ok(value) => value,
                Err(e) if e.is_eof() => {
                    tracing::debug!(path = %manifest.display(), "incomplete package.json, assuming no workspace");
                    return Ok(None);
                }
                Err(source) => {
                    return Err(Error::WorkspaceParse {
                        path: manifest,
                        source,
                    })
                }
            };

            if let Some(patterns) = workspace_patterns(&package) {
                let relative = start.strip_prefix(&current).unwrap_or(&start);
                return Ok(covers(relative, &patterns).then_some(current));
            }
        }

        if !current.pop() {
            return Ok(None);
        }
    }
}

/// Extract glob patterns from a `workspaces` field.
///
/// Workspaces can be an array or an object with a `packages` field.
fn workspace_patterns(package: &Value) -> Option<Vec<String>> {
    let to_strings = |arr: &Vec<Value>| {
        arr.iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect()
    };

    match package.get("workspaces")? {
        Value::Array(arr) => Some(to_strings(arr)),
        Value::Object(obj) => obj.get("packages").and_then(Value::as_array).map(to_strings),
        _ => None,
    }
}

/// Whether a path relative to the workspace root is one of its packages.
///
/// The root itself always counts.
fn covers(relative: &Path, patterns: &[String]) -> bool {
    if relative.as_os_str().is_empty() {
        return true;
    }

    let relative = relative.to_string_lossy().replace('\\', "/");
    patterns.iter().any(|pattern| {
        let pattern = pattern.trim_start_matches("./").trim_end_matches('/');
        glob::Pattern::new(pattern)
            .map(|p| p.matches_with(&relative, MATCH_OPTIONS))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_finds_array_workspace() {
        let root = tempdir().unwrap();
        fs::write(
            root.path().join("package.json"),
            r#"{"private":true,"workspaces":["apps/*"]}"#,
        )
        .unwrap();
        let app = root.path().join("apps").join("mobile");
        fs::create_dir_all(&app).unwrap();
        fs::write(app.join("package.json"), r#"{"name":"mobile"}"#).unwrap();

        assert_eq!(
            find_workspace_root(&app).unwrap(),
            Some(root.path().to_path_buf())
        );
    }

    #[test]
    fn test_invalid_utf8_manifest_is_read_lossily() {
        let root = tempdir().unwrap();
        fs::write(
            root.path().join("package.json"),
            b"{\"description\":\"caf\xe9\",\"workspaces\":[\"apps/*\"]}",
        )
        .unwrap();
        let app = root.path().join("apps").join("web");
        fs::create_dir_all(&app).unwrap();

        assert_eq!(
            find_workspace_root(&app).unwrap(),
            Some(root.path().to_path_buf())
        );
    }

    #[test]
    fn test_finds_object_workspace() {
        let root = tempdir().unwrap();
        fs::write(
            root.path().join("package.json"),
            r#"{"workspaces":{"packages":["packages/**"]}}"#,
        )
        .unwrap();
        let pkg = root.path().join("packages").join("ui").join("web");
        fs::create_dir_all(&pkg).unwrap();

        assert_eq!(
            find_workspace_root(&pkg).unwrap(),
            Some(root.path().to_path_buf())
        );
    }

    #[test]
    fn test_unmatched_pattern_is_none() {
        let root = tempdir().unwrap();
        fs::write(
            root.path().join("package.json"),
            r#"{"workspaces":["packages/*"]}"#,
        )
        .unwrap();
        let app = root.path().join("tools").join("app");
        fs::create_dir_all(&app).unwrap();

        assert_eq!(find_workspace_root(&app).unwrap(), None);
    }

    #[test]
    fn test_root_itself_is_workspace() {
        let root = tempdir().unwrap();
        fs::write(
            root.path().join("package.json"),
            r#"{"workspaces":["packages/*"]}"#,
        )
        .unwrap();

        assert_eq!(
            find_workspace_root(root.path()).unwrap(),
            Some(root.path().to_path_buf())
        );
    }

    #[test]
    fn test_no_workspace() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("package.json"), r#"{"name":"solo"}"#).unwrap();
        let nested = root.path().join("app");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("package.json"), r#"{"name":"app"}"#).unwrap();

        assert_eq!(find_workspace_root(&nested).unwrap(), None);
    }

    #[test]
    fn test_single_star_stays_one_level() {
        let root = tempdir().unwrap();
        fs::write(
            root.path().join("package.json"),
            r#"{"workspaces":["apps/*"]}"#,
        )
        .unwrap();
        let deep = root.path().join("apps").join("mobile").join("nested");
        fs::create_dir_all(&deep).unwrap();

        assert_eq!(find_workspace_root(&deep).unwrap(), None);
    }

    #[test]
    fn test_empty_package_json_is_none() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("package.json"), "").unwrap();
        let app = root.path().join("app");
        fs::create_dir_all(&app).unwrap();

        assert_eq!(find_workspace_root(&app).unwrap(), None);
    }

    #[test]
    fn test_malformed_package_json_is_error() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("package.json"), "{ workspaces: oops }").unwrap();
        let app = root.path().join("app");
        fs::create_dir_all(&app).unwrap();

        let err = find_workspace_root(&app).unwrap_err();
        assert!(matches!(err, Error::WorkspaceParse { .. }));
    }
}
