use std::path::PathBuf;
use thiserror::Error;

/// Core error type for webenv operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Project root not found from {start}")]
    ProjectRootNotFound { start: PathBuf },

    /// A file named by an environment variable does not exist.
    #[error("You specified {var} in your env, but the file \"{}\" can't be found.", path.display())]
    MissingEnvFile { var: &'static str, path: PathBuf },

    /// An ancestor `package.json` could not be parsed while looking for a workspace root.
    #[error("Failed to parse {path} while looking for a workspace root: {source}")]
    WorkspaceParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot find module '{name}' in {}", dir.display())]
    ModuleNotFound { name: String, dir: PathBuf },

    #[error("Cannot resolve entry file: {0}")]
    EntryPointNotFound(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    #[must_use]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
