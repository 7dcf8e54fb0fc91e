//! `webenv serve` command implementation.
//!
//! Runs a preview dev server over the template folder using the resolved
//! dev server config. The config's `before`/`after` hooks register their
//! middleware on an axum host; there is no bundling and no hot reload.

use super::project_root;
use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderValue, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use miette::{IntoDiagnostic, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::services::{ServeDir, ServeFile};
use webenv_core::dev::{
    dev_server_config_for, redirect_target, service_worker_path, MimeTypes,
    middleware::{GET_INTERNAL_SOURCE_PATH, NOOP_SERVICE_WORKER_SCRIPT, OPEN_STACK_FRAME_PATH},
};
use webenv_core::{
    resolve_paths, DevServerApp, DevServerConfig, DevServerOptions, EnvSnapshot, Middleware,
    Platform, ProjectPaths, WebEnv,
};

/// Serve command action.
#[derive(Debug, Clone)]
pub struct ServeAction {
    /// Working directory.
    pub cwd: PathBuf,
    /// Port to listen on.
    pub port: u16,
    pub platform: Platform,
}

/// Run the serve command.
pub async fn run(action: ServeAction, snapshot: EnvSnapshot) -> Result<()> {
    let root = project_root(&action.cwd).into_diagnostic()?;
    let env = WebEnv::new(&root).with_platform(action.platform);
    let paths = resolve_paths(Some(&root), &env, &snapshot).into_diagnostic()?;
    let config = dev_server_config_for(&env, &paths, &DevServerOptions::default(), &snapshot)
        .into_diagnostic()?;

    let app = build_router(&config, &paths);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), action.port))
        .await
        .into_diagnostic()?;
    let addr = listener.local_addr().into_diagnostic()?;
    tracing::info!(%addr, content_base = %config.content_base.display(), "preview server listening");

    println!();
    println!(
        "  Preview server running at http://localhost:{}{}",
        addr.port(),
        config.served_public_path()
    );
    println!("  Serving {}", config.content_base.display());
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app).await.into_diagnostic()?;
    Ok(())
}

/// Build the preview router for `config`.
///
/// Routes registered by `before` are matched first. Everything else goes
/// through the `after` middleware and then to the static files mounted at
/// the content base public path, with unknown paths falling back to the
/// template's `index.html`.
pub fn build_router(config: &DevServerConfig, paths: &ProjectPaths) -> Router {
    let mut app = AxumApp::new(paths.root.clone());
    config.before(&mut app);
    config.after(&mut app);

    let static_files = ServeDir::new(&config.content_base)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(&paths.template.index_html));

    let mut fallback = Router::new().fallback_service(static_files);
    if let Some(mime_types) = config.mime_types.clone() {
        fallback = fallback.layer(middleware::from_fn_with_state(
            Arc::new(mime_types),
            override_mime_type,
        ));
    }
    // The content base is mounted under its public path.
    let mount = config.content_base_public_path.trim_end_matches('/');
    if !mount.is_empty() {
        fallback = fallback.layer(middleware::from_fn_with_state(
            Arc::<str>::from(mount),
            strip_mount_prefix,
        ));
    }
    if let Some(public_path) = app.redirect.take() {
        fallback = fallback.layer(middleware::from_fn_with_state(
            Arc::<str>::from(public_path),
            redirect_served_path,
        ));
    }

    let router = app.router.fallback_service(fallback);
    if config.compress {
        router.layer(CompressionLayer::new())
    } else {
        router
    }
}

/// axum host for the dev server lifecycle hooks.
struct AxumApp {
    root: Arc<PathBuf>,
    router: Router,
    redirect: Option<String>,
}

impl AxumApp {
    fn new(root: PathBuf) -> Self {
        Self {
            root: Arc::new(root),
            router: Router::new(),
            redirect: None,
        }
    }

    fn route(&mut self, path: &str, method_router: axum::routing::MethodRouter) {
        let router = std::mem::replace(&mut self.router, Router::new());
        self.router = router.route(path, method_router);
    }
}

impl DevServerApp for AxumApp {
    fn use_middleware(&mut self, middleware: Middleware) {
        tracing::debug!(?middleware, "registering middleware");
        match middleware {
            Middleware::EvalSourceMap => {
                let root = Arc::clone(&self.root);
                self.route(
                    GET_INTERNAL_SOURCE_PATH,
                    get(move |query: Query<SourceQuery>| get_internal_source(root, query)),
                );
            }
            Middleware::ErrorOverlay => {
                self.route(OPEN_STACK_FRAME_PATH, get(open_stack_frame));
            }
            Middleware::NoopServiceWorker { public_path } => {
                self.route(&service_worker_path(&public_path), get(noop_service_worker));
            }
            Middleware::RedirectServedPath { public_path } => {
                self.redirect = Some(public_path);
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SourceQuery {
    file_name: String,
}

/// Source of a project file for the error overlay.
async fn get_internal_source(root: Arc<PathBuf>, Query(query): Query<SourceQuery>) -> Response {
    let Some(path) = source_file(&root, &query.file_name) else {
        return (StatusCode::NOT_FOUND, "").into_response();
    };
    match tokio::fs::read_to_string(&path).await {
        Ok(source) => (
            [(header::CONTENT_TYPE, "application/javascript")],
            source,
        )
            .into_response(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "cannot read source");
            (StatusCode::NOT_FOUND, "").into_response()
        }
    }
}

/// Project file named by `file_name`, if it stays inside `root`.
fn source_file(root: &Path, file_name: &str) -> Option<PathBuf> {
    let root = dunce::canonicalize(root).ok()?;
    let path = dunce::canonicalize(root.join(file_name)).ok()?;
    path.starts_with(&root).then_some(path)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StackFrameQuery {
    file_name: Option<String>,
    line_number: Option<u32>,
    col_number: Option<u32>,
}

async fn open_stack_frame(Query(frame): Query<StackFrameQuery>) -> StatusCode {
    tracing::info!(
        file = frame.file_name.as_deref().unwrap_or_default(),
        line = frame.line_number.unwrap_or(1),
        column = frame.col_number.unwrap_or(1),
        "open stack frame requested"
    );
    StatusCode::OK
}

async fn noop_service_worker() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/javascript"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        NOOP_SERVICE_WORKER_SCRIPT,
    )
}

async fn redirect_served_path(
    State(public_path): State<Arc<str>>,
    req: Request,
    next: Next,
) -> Response {
    let uri = req.uri();
    let request_uri = uri.path_and_query().map_or_else(|| uri.path(), |pq| pq.as_str());
    let target = redirect_target(&public_path, request_uri, uri.path());
    match target {
        Some(target) => (StatusCode::FOUND, [(header::LOCATION, target)]).into_response(),
        None => next.run(req).await,
    }
}

async fn strip_mount_prefix(
    State(mount): State<Arc<str>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(uri) = unmounted_uri(req.uri(), &mount) {
        *req.uri_mut() = uri;
    }
    next.run(req).await
}

/// `uri` relative to `mount`, or `None` when it lies outside of it.
fn unmounted_uri(uri: &Uri, mount: &str) -> Option<Uri> {
    let rest = uri.path().strip_prefix(mount)?;
    let path = match rest {
        "" => "/",
        rest if rest.starts_with('/') => rest,
        _ => return None,
    };
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };
    Uri::builder().path_and_query(path_and_query).build().ok()
}

/// Apply the configured extension-to-type overrides.
async fn override_mime_type(
    State(mime_types): State<Arc<MimeTypes>>,
    req: Request,
    next: Next,
) -> Response {
    let extension = Path::new(req.uri().path())
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_string);
    let mut response = next.run(req).await;

    let Some(extension) = extension else {
        return response;
    };
    let mime = mime_types
        .type_map
        .iter()
        .find(|(_, extensions)| extensions.iter().any(|e| *e == extension))
        .map(|(mime, _)| mime);
    if let Some(value) = mime.and_then(|mime| HeaderValue::from_str(mime).ok()) {
        let headers = response.headers_mut();
        if mime_types.force || !headers.contains_key(header::CONTENT_TYPE) {
            headers.insert(header::CONTENT_TYPE, value);
        }
    }
    response
}
