//! `webenv paths` and `webenv public-paths` command implementations.

use super::{fail, project_root};
use miette::{IntoDiagnostic, Result};
use std::path::Path;
use webenv_core::{
    get_mode, get_public_paths, resolve_paths, resolve_paths_async, EnvSnapshot, Mode, Platform,
    ProjectPaths, WebEnv,
};

/// Run the paths command.
pub fn run(
    cwd: &Path,
    platform: Platform,
    async_lookup: bool,
    snapshot: &EnvSnapshot,
    json: bool,
) -> Result<()> {
    let root = match project_root(cwd) {
        Ok(root) => root,
        Err(e) => return fail(json, e),
    };
    let env = WebEnv::new(&root).with_platform(platform);

    let resolved = if async_lookup {
        let rt = tokio::runtime::Runtime::new().into_diagnostic()?;
        rt.block_on(resolve_paths_async(Some(root), env, snapshot.clone()))
    } else {
        resolve_paths(Some(&root), &env, snapshot)
    };
    let paths = match resolved {
        Ok(paths) => paths,
        Err(e) => return fail(json, e),
    };

    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "platform": platform.as_str(),
                "paths": paths
            })
        );
    } else {
        print_paths(&paths);
    }
    Ok(())
}

fn print_paths(paths: &ProjectPaths) {
    println!("root:         {}", paths.root.display());
    println!("package.json: {}", paths.package_json.display());
    println!("node_modules: {}", paths.modules.display());
    println!("served path:  {}", paths.served_path);
    match &paths.app_main {
        Some(main) => println!("entry point:  {}", main.display()),
        None => println!("entry point:  (none)"),
    }
    println!();
    println!("template:     {}", paths.template.folder.display());
    println!("  index.html  {}", paths.template.index_html.display());
    println!("  manifest    {}", paths.template.manifest.display());
    println!("  serve.json  {}", paths.template.serve_json.display());
    println!("  favicon     {}", paths.template.favicon.display());
    println!("production:   {}", paths.production.folder.display());
}

/// Run the public-paths command.
pub fn run_public(cwd: &Path, mode: Option<Mode>, snapshot: &EnvSnapshot, json: bool) -> Result<()> {
    let root = match project_root(cwd) {
        Ok(root) => root,
        Err(e) => return fail(json, e),
    };
    let mut env = WebEnv::new(&root);
    env.mode = mode;
    let resolved_mode = get_mode(&env, snapshot);

    let public = match get_public_paths(&env, snapshot) {
        Ok(public) => public,
        Err(e) => return fail(json, e),
    };

    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "mode": resolved_mode.as_str(),
                "publicPath": public.public_path,
                "publicUrl": public.public_url
            })
        );
    } else {
        println!("mode:        {resolved_mode}");
        println!("public path: {}", public.public_path);
        println!("public url:  {}", public.public_url);
    }
    Ok(())
}
