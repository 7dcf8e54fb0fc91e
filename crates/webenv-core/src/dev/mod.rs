//! Dev server configuration.
//!
//! Builds the option set handed to the dev server runtime, including the
//! host-check policy, HTTPS credentials and the middleware registered by the
//! `before`/`after` lifecycle hooks.

pub mod https;
pub mod middleware;
pub mod server;

pub use https::{resolve_https, validate_certificate_key_pair, CertificatePair, HttpsConfig};
pub use middleware::{redirect_target, service_worker_path, DevServerApp, Middleware, RecordingApp};
pub use server::{
    build_dev_server_config, dev_server_config_for, ignored_files, is_dev_mode_config,
    with_dev_server, BundlerConfig, DevServerConfig, DevServerOptions, HistoryApiFallback,
    MimeTypes, ProxyConfig, WatchOptions,
};
