//! `webenv verify-cert` command implementation.

use super::fail;
use miette::Result;
use std::path::{Path, PathBuf};
use webenv_core::{validate_certificate_key_pair, Error};

fn read(cwd: &Path, path: &Path) -> Result<(PathBuf, Vec<u8>), Error> {
    let path = cwd.join(path);
    let bytes = std::fs::read(&path).map_err(|source| Error::ConfigRead {
        path: path.clone(),
        source,
    })?;
    Ok((path, bytes))
}

/// Run the verify-cert command.
///
/// Exits with status 1 when the pair is not usable.
pub fn run(cwd: &Path, cert: &Path, key: &Path, json: bool) -> Result<()> {
    let (cert_file, cert) = match read(cwd, cert) {
        Ok(read) => read,
        Err(e) => return fail(json, e),
    };
    let (key_file, key) = match read(cwd, key) {
        Ok(read) => read,
        Err(e) => return fail(json, e),
    };

    let valid = validate_certificate_key_pair(&cert, &key);
    tracing::debug!(cert = %cert_file.display(), key = %key_file.display(), valid, "checked key pair");

    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": valid,
                "valid": valid,
                "certFile": cert_file.to_string_lossy(),
                "keyFile": key_file.to_string_lossy()
            })
        );
    } else if valid {
        println!("{} and {} form a valid pair", cert_file.display(), key_file.display());
    } else {
        eprintln!(
            "error: {} and {} do not form a valid pair",
            cert_file.display(),
            key_file.display()
        );
    }

    if !valid {
        std::process::exit(1);
    }
    Ok(())
}
