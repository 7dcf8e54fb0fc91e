pub mod dev_server;
pub mod font_rule;
pub mod paths;
pub mod serve;
pub mod verify_cert;
pub mod version;

use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use webenv_core::Error;

/// Nearest directory at or above `cwd` holding a `package.json`.
pub fn project_root(cwd: &Path) -> Result<PathBuf, Error> {
    webenv_core::paths::project_root(cwd).ok_or_else(|| Error::ProjectRootNotFound {
        start: cwd.to_path_buf(),
    })
}

/// Report a library error.
///
/// In JSON mode the error is printed as a stable object on stdout and the
/// process exits with status 1; otherwise it becomes a diagnostic.
pub fn fail<T>(json: bool, err: Error) -> Result<T> {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": false,
                "error": {
                    "code": error_code(&err),
                    "message": err.to_string()
                }
            })
        );
        std::process::exit(1);
    }
    Err(err).into_diagnostic()
}

/// Stable error code for JSON output.
fn error_code(err: &Error) -> &'static str {
    match err {
        Error::Io(_) => "IO_ERROR",
        Error::ConfigRead { .. } => "CONFIG_READ",
        Error::ConfigParse { .. } => "CONFIG_PARSE",
        Error::ProjectRootNotFound { .. } => "PROJECT_ROOT_NOT_FOUND",
        Error::MissingEnvFile { .. } => "MISSING_ENV_FILE",
        Error::WorkspaceParse { .. } => "WORKSPACE_PARSE",
        Error::ModuleNotFound { .. } => "MODULE_NOT_FOUND",
        Error::EntryPointNotFound(_) => "ENTRY_POINT_NOT_FOUND",
        Error::Other(_) => "ERROR",
    }
}
