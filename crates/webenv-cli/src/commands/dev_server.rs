//! `webenv dev-server` command implementation.
//!
//! Prints the dev server options the bundler would hand to its runtime,
//! together with the middleware the lifecycle hooks register.

use super::{fail, project_root};
use miette::{miette, Result};
use std::path::PathBuf;
use webenv_core::dev::{ProxyConfig, RecordingApp};
use webenv_core::{
    build_dev_server_config, DevServerConfig, DevServerOptions, EnvSnapshot, Mode, Platform,
    WebEnv,
};

/// Dev server command action.
#[derive(Debug, Clone)]
pub struct DevServerAction {
    /// Working directory.
    pub cwd: PathBuf,
    pub platform: Platform,
    pub mode: Option<Mode>,
    /// Whether HTTPS was requested.
    pub https: bool,
    /// Raw `PREFIX=URL` proxy entries.
    pub proxy: Vec<String>,
    pub allowed_host: Option<String>,
}

/// Parse `PREFIX=URL` entries into a proxy table.
///
/// No entries means no proxy at all, which keeps the host check disabled.
pub fn parse_proxy(entries: &[String]) -> Result<Option<ProxyConfig>> {
    if entries.is_empty() {
        return Ok(None);
    }
    let mut proxy = ProxyConfig::new();
    for entry in entries {
        let (context, target) = entry
            .split_once('=')
            .filter(|(context, target)| !context.is_empty() && !target.is_empty())
            .ok_or_else(|| miette!("invalid proxy entry '{entry}', expected PREFIX=URL"))?;
        proxy.insert(context.to_string(), target.to_string());
    }
    Ok(Some(proxy))
}

/// Run the dev-server command.
pub fn run(action: DevServerAction, snapshot: &EnvSnapshot, json: bool) -> Result<()> {
    let root = match project_root(&action.cwd) {
        Ok(root) => root,
        Err(e) => return fail(json, e),
    };
    let mut env = WebEnv::new(&root)
        .with_platform(action.platform)
        .with_https(action.https);
    env.mode = action.mode;

    let options = DevServerOptions {
        allowed_host: action.allowed_host,
        proxy: parse_proxy(&action.proxy)?,
    };

    let config = match build_dev_server_config(&env, &options, snapshot) {
        Ok(config) => config,
        Err(e) => return fail(json, e),
    };
    let (before, after) = hook_registrations(&config);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "devServer": config,
                "middleware": {
                    "before": before.middleware,
                    "after": after.middleware
                }
            })
        );
    } else {
        print_config(&config, &before, &after);
    }
    Ok(())
}

fn hook_registrations(config: &DevServerConfig) -> (RecordingApp, RecordingApp) {
    let mut before = RecordingApp::default();
    config.before(&mut before);
    let mut after = RecordingApp::default();
    config.after(&mut after);
    (before, after)
}

fn print_config(config: &DevServerConfig, before: &RecordingApp, after: &RecordingApp) {
    println!("host:               {}", config.host);
    println!("content base:       {}", config.content_base.display());
    println!("public path:        {}", config.served_public_path());
    println!("host check:         {}", if config.disable_host_check { "disabled" } else { "enabled" });
    println!("https:              {}", if config.https.is_enabled() { "on" } else { "off" });
    if let Some(proxy) = &config.proxy {
        println!("proxy:");
        for (context, target) in proxy {
            println!("  {context} -> {target}");
        }
    }
    if let Some(public) = &config.allowed_host {
        println!("public:             {public}");
    }
    if config.mime_types.is_some() {
        println!("mime override:      application/javascript for .bundle");
    }
    println!("ignored:            {}", config.watch_options.ignored);
    println!();
    println!("middleware before:  {}", describe(before));
    println!("middleware after:   {}", describe(after));
}

fn describe(app: &RecordingApp) -> String {
    if app.middleware.is_empty() {
        return "(none)".to_string();
    }
    app.middleware
        .iter()
        .map(|m| format!("{m:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_proxy_empty_is_none() {
        assert!(parse_proxy(&[]).unwrap().is_none());
    }

    #[test]
    fn test_parse_proxy_entries() {
        let proxy = parse_proxy(&[
            "/api=http://localhost:4000".to_string(),
            "/ws=ws://localhost:4001".to_string(),
        ])
        .unwrap()
        .unwrap();
        assert_eq!(proxy["/api"], "http://localhost:4000");
        assert_eq!(proxy["/ws"], "ws://localhost:4001");
    }

    #[test]
    fn test_parse_proxy_rejects_malformed() {
        assert!(parse_proxy(&["/api".to_string()]).is_err());
        assert!(parse_proxy(&["=http://x".to_string()]).is_err());
    }
}
