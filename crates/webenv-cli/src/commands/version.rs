use miette::Result;
use webenv_core::version::{version_string, VersionInfo};

pub fn run(json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::json!({ "ok": true, "version": VersionInfo::current() })
        );
    } else {
        println!("{}", version_string());
    }
    Ok(())
}
