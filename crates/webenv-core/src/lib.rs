#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! Configuration assembly for web bundler builds.
//!
//! Resolves project paths and public URLs, builds dev server options and
//! creates asset loader rules. Nothing here runs a bundler; every function
//! turns a project root, an [`EnvSnapshot`] and a few options into plain
//! configuration values.

pub mod config;
pub mod dev;
pub mod entry;
pub mod env;
pub mod error;
pub mod loaders;
pub mod mode;
pub mod options;
pub mod paths;
pub mod platform;
pub mod public_path;
pub mod version;
pub mod workspace;

pub use config::{load_project_config, ProjectConfig};
pub use dev::{
    build_dev_server_config, is_dev_mode_config, resolve_https, validate_certificate_key_pair,
    with_dev_server, BundlerConfig, DevServerApp, DevServerConfig, DevServerOptions, HttpsConfig,
    Middleware,
};
pub use env::EnvSnapshot;
pub use error::{Error, Result};
pub use loaders::{create_font_loader_rule, node_modules_resolver, FontLoaderRule};
pub use mode::{get_mode, Mode};
pub use options::WebEnv;
pub use paths::{resolve_paths, resolve_paths_async, PathGroup, ProjectPaths};
pub use platform::Platform;
pub use public_path::{get_public_paths, get_served_path, PublicPaths};
pub use version::{VersionInfo, VERSION};
pub use workspace::find_workspace_root;
