//! Process environment snapshot.
//!
//! Every environment variable the builders consume is read once into an
//! [`EnvSnapshot`] and passed explicitly, so resolution never depends on
//! whatever the process environment holds at call time.

use std::collections::HashMap;

pub const HOST: &str = "HOST";
pub const WDS_SOCKET_HOST: &str = "WDS_SOCKET_HOST";
pub const WDS_SOCKET_PATH: &str = "WDS_SOCKET_PATH";
pub const WDS_SOCKET_PORT: &str = "WDS_SOCKET_PORT";
pub const SSL_CRT_FILE: &str = "SSL_CRT_FILE";
pub const SSL_KEY_FILE: &str = "SSL_KEY_FILE";
pub const DANGEROUSLY_DISABLE_HOST_CHECK: &str = "DANGEROUSLY_DISABLE_HOST_CHECK";
pub const WEB_PUBLIC_URL: &str = "WEB_PUBLIC_URL";
pub const NODE_ENV: &str = "NODE_ENV";

/// Immutable view of the environment variables webenv reads.
///
/// Empty values are treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    /// `HOST`: dev server bind host.
    pub host: Option<String>,
    /// `WDS_SOCKET_HOST`: hot reload socket host.
    pub sock_host: Option<String>,
    /// `WDS_SOCKET_PATH`: hot reload socket path.
    pub sock_path: Option<String>,
    /// `WDS_SOCKET_PORT`: hot reload socket port.
    pub sock_port: Option<String>,
    /// `SSL_CRT_FILE`: certificate path, relative to the project root.
    pub ssl_crt_file: Option<String>,
    /// `SSL_KEY_FILE`: private key path, relative to the project root.
    pub ssl_key_file: Option<String>,
    /// `DANGEROUSLY_DISABLE_HOST_CHECK`, parsed with [`boolish`].
    pub dangerously_disable_host_check: bool,
    /// `WEB_PUBLIC_URL`: public URL override.
    pub web_public_url: Option<String>,
    /// `NODE_ENV`: fallback bundler mode.
    pub node_env: Option<String>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a snapshot from explicit key/value pairs.
    #[must_use]
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_lookup(|key| map.get(key).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        Self {
            host: get(HOST),
            sock_host: get(WDS_SOCKET_HOST),
            sock_path: get(WDS_SOCKET_PATH),
            sock_port: get(WDS_SOCKET_PORT),
            ssl_crt_file: get(SSL_CRT_FILE),
            ssl_key_file: get(SSL_KEY_FILE),
            dangerously_disable_host_check: boolish(
                get(DANGEROUSLY_DISABLE_HOST_CHECK).as_deref(),
                false,
            ),
            web_public_url: get(WEB_PUBLIC_URL),
            node_env: get(NODE_ENV),
        }
    }
}

/// Parse a loosely formatted boolean flag.
///
/// Accepts `true`/`1`/`yes`/`on` and `false`/`0`/`no`/`off` in any case.
/// Missing or unrecognized values yield `default`.
#[must_use]
pub fn boolish(value: Option<&str>, default: bool) -> bool {
    let Some(raw) = value else {
        return default;
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => {
            tracing::debug!(value = raw, "ignoring non-boolean env value");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_boolish_values() {
        assert!(boolish(Some("true"), false));
        assert!(boolish(Some("YES"), false));
        assert!(boolish(Some("1"), false));
        assert!(!boolish(Some("off"), true));
        assert!(!boolish(Some("0"), true));
        assert!(boolish(None, true));
        assert!(!boolish(Some("maybe"), false));
    }

    #[test]
    fn test_from_vars_ignores_empty_values() {
        let env = EnvSnapshot::from_vars([(HOST, ""), (WEB_PUBLIC_URL, "/app")]);
        assert_eq!(env.host, None);
        assert_eq!(env.web_public_url.as_deref(), Some("/app"));
    }

    #[test]
    fn test_from_vars_parses_host_check_flag() {
        let env = EnvSnapshot::from_vars([(DANGEROUSLY_DISABLE_HOST_CHECK, "true")]);
        assert!(env.dangerously_disable_host_check);

        let env = EnvSnapshot::from_vars(Vec::<(String, String)>::new());
        assert!(!env.dangerously_disable_host_check);
    }

    #[test]
    #[serial]
    fn test_from_process_reads_environment() {
        std::env::set_var(WDS_SOCKET_PORT, "19006");
        std::env::set_var(SSL_CRT_FILE, "certs/dev.crt");

        let env = EnvSnapshot::from_process();
        assert_eq!(env.sock_port.as_deref(), Some("19006"));
        assert_eq!(env.ssl_crt_file.as_deref(), Some("certs/dev.crt"));

        std::env::remove_var(WDS_SOCKET_PORT);
        std::env::remove_var(SSL_CRT_FILE);
    }
}
