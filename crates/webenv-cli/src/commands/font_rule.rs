//! `webenv font-rule` command implementation.

use super::{fail, project_root};
use miette::Result;
use std::path::Path;
use webenv_core::paths::modules_path;
use webenv_core::{create_font_loader_rule, node_modules_resolver};

/// Run the font-rule command.
pub fn run(cwd: &Path, json: bool) -> Result<()> {
    let root = match project_root(cwd) {
        Ok(root) => root,
        Err(e) => return fail(json, e),
    };
    let modules = match modules_path(&root) {
        Ok(modules) => modules,
        Err(e) => return fail(json, e),
    };
    let rule = match create_font_loader_rule(&root, node_modules_resolver(&modules)) {
        Ok(rule) => rule,
        Err(e) => return fail(json, e),
    };

    if json {
        println!("{}", serde_json::json!({ "ok": true, "rule": rule }));
    } else {
        println!("test:    {}", rule.test.as_str());
        for loader in &rule.loaders {
            println!(
                "loader:  {} (limit {} bytes, name {})",
                loader.loader, loader.options.limit, loader.options.name
            );
        }
        println!("include:");
        for dir in &rule.include {
            println!("  {}", dir.display());
        }
    }
    Ok(())
}
