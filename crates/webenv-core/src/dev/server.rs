use super::https::{resolve_https, HttpsConfig};
use super::middleware::{DevServerApp, Middleware};
use crate::env::EnvSnapshot;
use crate::error::Result;
use crate::mode::Mode;
use crate::options::WebEnv;
use crate::paths::{resolve_paths, ProjectPaths};
use crate::public_path::get_public_paths;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Bind host used when `HOST` is not set.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Proxy table: request path prefix to backend URL.
pub type ProxyConfig = BTreeMap<String, String>;

/// Caller-supplied dev server options.
#[derive(Debug, Clone, Default)]
pub struct DevServerOptions {
    /// Host name the server is reachable under, for the host check.
    pub allowed_host: Option<String>,
    /// Backends to proxy requests to.
    pub proxy: Option<ProxyConfig>,
}

/// Extension-to-type overrides of the static file server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MimeTypes {
    pub type_map: BTreeMap<String, Vec<String>>,
    /// Replace existing mappings instead of merging.
    pub force: bool,
}

impl MimeTypes {
    /// Serve native `.bundle` files as JavaScript.
    #[must_use]
    pub fn native_bundles() -> Self {
        Self {
            type_map: BTreeMap::from([(
                "application/javascript".to_string(),
                vec!["bundle".to_string()],
            )]),
            force: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchOptions {
    /// Pattern of paths the file watcher skips.
    pub ignored: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryApiFallback {
    /// Paths with dots still fall back to the index.
    pub disable_dot_rule: bool,
    pub index: String,
}

/// Options handed to the dev server runtime.
///
/// Field names serialize to the runtime's schema. `before` and `after` are
/// the lifecycle hooks the runtime calls once each on startup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevServerConfig {
    pub disable_host_check: bool,
    pub compress: bool,
    pub client_log_level: &'static str,
    pub content_base: PathBuf,
    pub content_base_public_path: String,
    pub watch_content_base: bool,
    pub hot: bool,
    pub transport_mode: &'static str,
    pub inject_client: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sock_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sock_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sock_port: Option<String>,
    pub public_path: &'static str,
    pub no_info: bool,
    pub stats: &'static str,
    pub watch_options: WatchOptions,
    pub https: HttpsConfig,
    pub host: String,
    pub overlay: bool,
    pub history_api_fallback: HistoryApiFallback,
    #[serde(rename = "public", skip_serializing_if = "Option::is_none")]
    pub allowed_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
    pub inline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_types: Option<MimeTypes>,
    #[serde(skip)]
    is_native: bool,
    #[serde(skip)]
    served_public_path: String,
}

impl DevServerConfig {
    /// Register middleware that must run before the proxy and static files.
    ///
    /// Native platforms get none of these. The source map and error overlay
    /// endpoints must precede the served-path redirect or they would be
    /// redirected away.
    pub fn before<A: DevServerApp + ?Sized>(&self, app: &mut A) {
        if self.is_native {
            return;
        }
        app.use_middleware(Middleware::EvalSourceMap);
        app.use_middleware(Middleware::ErrorOverlay);
        app.use_middleware(Middleware::NoopServiceWorker {
            public_path: self.served_public_path.clone(),
        });
    }

    /// Register middleware that runs after everything else.
    pub fn after<A: DevServerApp + ?Sized>(&self, app: &mut A) {
        app.use_middleware(Middleware::RedirectServedPath {
            public_path: self.served_public_path.clone(),
        });
    }

    /// Public path the hooks serve under.
    #[must_use]
    pub fn served_public_path(&self) -> &str {
        &self.served_public_path
    }

    #[must_use]
    pub fn is_native(&self) -> bool {
        self.is_native
    }
}

/// Watcher pattern ignoring every `node_modules` outside `root`.
///
/// `node_modules` inside the project root stays watched to support
/// absolute imports from `src/node_modules`.
#[must_use]
pub fn ignored_files(root: &Path) -> String {
    let mut prefix = root.to_string_lossy().replace('\\', "/");
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    format!("^(?!{}).+/node_modules/", regex_lite::escape(&prefix))
}

/// Whether the bundler config is in development mode.
#[must_use]
pub fn is_dev_mode_config(config: &BundlerConfig) -> bool {
    config.mode == Some(Mode::Development)
}

/// Attach a dev server section to a development bundler config.
///
/// Configs in any other mode are returned unchanged.
pub fn with_dev_server(
    mut config: BundlerConfig,
    env: &WebEnv,
    options: &DevServerOptions,
    snapshot: &EnvSnapshot,
) -> Result<BundlerConfig> {
    if is_dev_mode_config(&config) {
        config.dev_server = Some(build_dev_server_config(env, options, snapshot)?);
    }
    Ok(config)
}

/// Build the dev server config for `env`, resolving project paths first.
pub fn build_dev_server_config(
    env: &WebEnv,
    options: &DevServerOptions,
    snapshot: &EnvSnapshot,
) -> Result<DevServerConfig> {
    let paths = resolve_paths(Some(&env.project_root), env, snapshot)?;
    dev_server_config_for(env, &paths, options, snapshot)
}

/// Build the dev server config from already resolved paths.
pub fn dev_server_config_for(
    env: &WebEnv,
    paths: &ProjectPaths,
    options: &DevServerOptions,
    snapshot: &EnvSnapshot,
) -> Result<DevServerConfig> {
    let is_native = env.platform.is_native();
    let public_path = get_public_paths(env, snapshot)?.public_path;

    // Proxying exposes a backend to DNS rebinding, so the host check only
    // stays off without a proxy unless explicitly overridden.
    let disable_host_check = options.proxy.is_none() || snapshot.dangerously_disable_host_check;

    Ok(DevServerConfig {
        disable_host_check,
        compress: true,
        client_log_level: "silent",
        content_base: paths.template.folder.clone(),
        content_base_public_path: public_path.clone(),
        watch_content_base: true,
        hot: true,
        transport_mode: "ws",
        inject_client: false,
        sock_host: snapshot.sock_host.clone(),
        sock_path: snapshot.sock_path.clone(),
        sock_port: snapshot.sock_port.clone(),
        public_path: "/",
        no_info: true,
        stats: "none",
        watch_options: WatchOptions {
            ignored: ignored_files(&paths.root),
        },
        https: resolve_https(&env.project_root, env.https, snapshot)?,
        host: snapshot
            .host
            .clone()
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        overlay: false,
        history_api_fallback: HistoryApiFallback {
            disable_dot_rule: true,
            index: public_path.clone(),
        },
        allowed_host: options.allowed_host.clone(),
        proxy: options.proxy.clone(),
        inline: !is_native,
        mime_types: is_native.then(MimeTypes::native_bundles),
        is_native,
        served_public_path: public_path,
    })
}

/// Bundler configuration a dev server section can be attached to.
///
/// Only `mode` and `devServer` are interpreted; every other field is carried
/// through untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_server: Option<DevServerConfig>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

impl BundlerConfig {
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::default()
        }
    }
}
