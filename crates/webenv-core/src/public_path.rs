//! Served path and public path conventions.
//!
//! The served path is where built assets are reachable at runtime. Bundlers
//! need it to emit correct `<script>` hrefs even for nested client-side
//! routes, where a relative path would point into the route.

use crate::config::{load_project_config, PackageJson};
use crate::env::EnvSnapshot;
use crate::error::Result;
use crate::mode::{get_mode, Mode};
use crate::options::WebEnv;
use serde::Serialize;
use std::path::Path;
use webenv_util::ensure_slash;

/// Public path and URL used by a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPaths {
    /// Prefix for emitted asset URLs, always ending in `/`.
    pub public_path: String,
    /// `public_path` without its trailing slash; empty in development.
    pub public_url: String,
}

impl PublicPaths {
    fn development() -> Self {
        Self {
            public_path: "/".to_string(),
            public_url: String::new(),
        }
    }
}

/// URL path the project is served from.
///
/// `WEB_PUBLIC_URL` wins, then the path of `homepage` in `package.json`,
/// then `/`. The result always ends in `/`.
pub fn get_served_path(project_root: &Path, snapshot: &EnvSnapshot) -> Result<String> {
    let config = load_project_config(project_root)?;
    Ok(served_path_for(Some(&config.pkg), snapshot))
}

pub(crate) fn served_path_for(pkg: Option<&PackageJson>, snapshot: &EnvSnapshot) -> String {
    if let Some(public_url) = snapshot.web_public_url.as_deref() {
        return ensure_slash(public_url, true);
    }

    let served = pkg
        .and_then(|pkg| pkg.homepage.as_deref())
        .filter(|homepage| !homepage.is_empty())
        .map_or_else(|| "/".to_string(), url_pathname);

    ensure_slash(&served, true)
}

/// Path component of a URL, or of a relative reference like `/app?x=1`.
fn url_pathname(input: &str) -> String {
    match url::Url::parse(input) {
        Ok(url) => url.path().to_string(),
        Err(_) => input
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

/// Public paths for the mode of `env`.
///
/// Development (and `none`) always serves from `/` so dev builds never
/// depend on `homepage`; production derives both values from the served path.
pub fn get_public_paths(env: &WebEnv, snapshot: &EnvSnapshot) -> Result<PublicPaths> {
    if get_mode(env, snapshot) != Mode::Production {
        return Ok(PublicPaths::development());
    }

    let public_path = get_served_path(&env.project_root, snapshot)?;
    let public_url = public_path[..public_path.len() - 1].to_string();
    Ok(PublicPaths {
        public_path,
        public_url,
    })
}
