//! Middleware registered by the dev server lifecycle hooks.
//!
//! The dev server runtime owns the app; the hooks only say which middleware
//! to install and in what order through [`DevServerApp`].

use serde::Serialize;

/// Route serving original module sources to the runtime error overlay.
pub const GET_INTERNAL_SOURCE_PATH: &str = "/__get-internal-source";

/// Route the error overlay calls to open a stack frame in the editor.
pub const OPEN_STACK_FRAME_PATH: &str = "/__open-stack-frame-in-editor";

/// Service worker that unregisters whatever production worker was
/// previously installed on the same host and port.
pub const NOOP_SERVICE_WORKER_SCRIPT: &str = r"// This service worker file is effectively a 'no-op' that will reset any
// previous service worker registered for the same host:port combination.
self.addEventListener('install', () => self.skipWaiting());

self.addEventListener('activate', () => {
  self.clients.matchAll({ type: 'window' }).then(windowClients => {
    for (let windowClient of windowClients) {
      // Force open pages to refresh, so that they have a chance to load the
      // fresh navigation response from the local dev server.
      windowClient.navigate(windowClient.url);
    }
  });
});
";

/// A middleware the dev server should install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Middleware {
    /// Serves source contents for the error overlay.
    EvalSourceMap,
    /// Opens files from the runtime error overlay.
    ErrorOverlay,
    /// Serves a no-op `service-worker.js` under the public path.
    #[serde(rename_all = "camelCase")]
    NoopServiceWorker { public_path: String },
    /// Redirects requests outside the public path into it.
    #[serde(rename_all = "camelCase")]
    RedirectServedPath { public_path: String },
}

/// Live application handle of a dev server runtime.
pub trait DevServerApp {
    /// Append a middleware to the request chain.
    fn use_middleware(&mut self, middleware: Middleware);
}

/// App handle that only records registrations.
#[derive(Debug, Default, Clone)]
pub struct RecordingApp {
    pub middleware: Vec<Middleware>,
}

impl DevServerApp for RecordingApp {
    fn use_middleware(&mut self, middleware: Middleware) {
        self.middleware.push(middleware);
    }
}

/// URL of the no-op service worker for `public_path`.
#[must_use]
pub fn service_worker_path(public_path: &str) -> String {
    format!("{}/service-worker.js", public_path.trim_end_matches('/'))
}

/// Where a request outside the served path should be redirected.
///
/// `request_uri` is the path plus query, `request_path` the bare path.
/// Returns `None` when the request is already inside the served path or the
/// app is served from `/`.
#[must_use]
pub fn redirect_target(public_path: &str, request_uri: &str, request_path: &str) -> Option<String> {
    let served = public_path.strip_suffix('/').unwrap_or(public_path);
    if served.is_empty() || request_uri.starts_with(served) {
        return None;
    }

    let target = if request_path == "/" {
        served.to_string()
    } else {
        format!("{served}/{}", request_path.trim_start_matches('/'))
    };
    Some(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_app_keeps_order() {
        let mut app = RecordingApp::default();
        app.use_middleware(Middleware::EvalSourceMap);
        app.use_middleware(Middleware::ErrorOverlay);
        assert_eq!(
            app.middleware,
            vec![Middleware::EvalSourceMap, Middleware::ErrorOverlay]
        );
    }

    #[test]
    fn test_service_worker_path() {
        assert_eq!(service_worker_path("/"), "/service-worker.js");
        assert_eq!(service_worker_path("/app/"), "/app/service-worker.js");
    }

    #[test]
    fn test_no_redirect_at_root() {
        assert_eq!(redirect_target("/", "/anything", "/anything"), None);
    }

    #[test]
    fn test_no_redirect_inside_served_path() {
        assert_eq!(redirect_target("/app/", "/app", "/app"), None);
        assert_eq!(redirect_target("/app/", "/app/static/main.js", "/app/static/main.js"), None);
    }

    #[test]
    fn test_redirect_outside_served_path() {
        assert_eq!(
            redirect_target("/app/", "/todos/42?x=1", "/todos/42"),
            Some("/app/todos/42".to_string())
        );
        assert_eq!(redirect_target("/app/", "/", "/"), Some("/app".to_string()));
    }

    #[test]
    fn test_middleware_serializes_with_kind() {
        let json = serde_json::to_value(Middleware::NoopServiceWorker {
            public_path: "/".to_string(),
        })
        .unwrap();
        assert_eq!(json["kind"], "noopServiceWorker");
        assert_eq!(json["publicPath"], "/");
    }
}
