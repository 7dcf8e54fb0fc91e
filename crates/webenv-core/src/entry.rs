//! Entry point discovery.

use crate::config::ProjectConfig;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Source extensions probed for every entry candidate, in priority order.
const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Expand platform suffixes into the ordered extension list.
///
/// `["ios", "native"]` yields `ios.ts`, `ios.tsx`, ..., `native.jsx`, then the
/// bare extensions.
#[must_use]
pub fn bare_extensions(platforms: &[&str]) -> Vec<String> {
    let mut extensions: Vec<String> = platforms
        .iter()
        .flat_map(|platform| {
            SOURCE_EXTENSIONS
                .iter()
                .map(move |ext| format!("{platform}.{ext}"))
        })
        .collect();
    extensions.extend(SOURCE_EXTENSIONS.iter().map(|ext| (*ext).to_string()));
    extensions
}

/// Find the app entry point.
///
/// The manifest's `entryPoint` and the package `main` field are honoured
/// first; otherwise each of `entry_files` is probed with the platform
/// extensions. `Ok(None)` means nothing was found.
///
/// # Errors
/// Returns [`Error::EntryPointNotFound`] when `main` points at a missing file.
pub fn get_entry_point(
    project_root: &Path,
    entry_files: &[&str],
    platforms: &[&str],
    config: Option<&ProjectConfig>,
) -> Result<Option<PathBuf>> {
    let extensions = bare_extensions(platforms);

    if let Some(config) = config {
        if let Some(entry) = config.exp.entry_point.as_deref() {
            return Ok(file_with_extensions(project_root, entry, &extensions));
        }

        if let Some(main) = config.pkg.main.as_deref().filter(|m| !m.is_empty()) {
            return file_with_extensions(project_root, main, &extensions)
                .map(Some)
                .ok_or_else(|| {
                    Error::EntryPointNotFound(format!(
                        "The `main` field defined in your `package.json` points to a non-existent path: {main}"
                    ))
                });
        }
    }

    Ok(entry_files
        .iter()
        .find_map(|file| file_with_extensions(project_root, file, &extensions)))
}

fn file_with_extensions(dir: &Path, module_id: &str, extensions: &[String]) -> Option<PathBuf> {
    let module_path = dir.join(module_id);
    if module_path.exists() {
        return Some(module_path);
    }

    extensions.iter().find_map(|ext| {
        let mut candidate = module_path.clone().into_os_string();
        candidate.push(".");
        candidate.push(ext);
        let candidate = PathBuf::from(candidate);
        candidate.is_file().then_some(candidate)
    })
}
