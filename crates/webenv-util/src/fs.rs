use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Read a file to string, replacing invalid UTF-8 sequences with the replacement character.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_to_string_lossy(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Resolve `parts` against `base` into an absolute, lexically normalized path.
///
/// Later absolute parts replace everything before them. A relative result is
/// anchored at the current working directory. Symlinks are not followed.
#[must_use]
pub fn resolve_path<P: AsRef<Path>>(base: &Path, parts: &[P]) -> PathBuf {
    let mut joined = base.to_path_buf();
    for part in parts {
        joined.push(part);
    }

    if joined.is_relative() {
        if let Ok(cwd) = std::env::current_dir() {
            joined = cwd.join(joined);
        }
    }

    normalize_lexically(&joined)
}

/// Collapse `.` and `..` components and trailing separators without touching the disk.
///
/// `..` at the root stays at the root.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pop past the root or a drive prefix
                let at_root = matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                );
                if !at_root {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_to_string_lossy_valid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{\"name\":\"app\"}").unwrap();
        file.flush().unwrap();

        let content = read_to_string_lossy(file.path()).unwrap();
        assert_eq!(content, "{\"name\":\"app\"}");
    }

    #[test]
    fn test_read_to_string_lossy_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0x48, 0x65, 0x6c, 0x6c, 0x6f, 0x80, 0x81])
            .unwrap();
        file.flush().unwrap();

        let content = read_to_string_lossy(file.path()).unwrap();
        assert!(content.starts_with("Hello"));
        assert!(content.contains('\u{FFFD}'));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_path_joins_and_normalizes() {
        let resolved = resolve_path(Path::new("/srv/app"), &["./web", "../web-build", "index.html"]);
        assert_eq!(resolved, PathBuf::from("/srv/app/web-build/index.html"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_path_absolute_part_wins() {
        let resolved = resolve_path(Path::new("/srv/app"), &["/opt/out", "favicon.ico"]);
        assert_eq!(resolved, PathBuf::from("/opt/out/favicon.ico"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_path_empty_part_is_folder() {
        let resolved = resolve_path(Path::new("/srv/app/web-build"), &[""]);
        assert_eq!(resolved, PathBuf::from("/srv/app/web-build"));
    }

    #[test]
    fn test_resolve_path_relative_base_is_absolute() {
        let resolved = resolve_path(Path::new("some/project"), &["node_modules"]);
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/project/node_modules"));
    }

    #[cfg(unix)]
    #[test]
    fn test_normalize_parent_at_root() {
        assert_eq!(normalize_lexically(Path::new("/../a/./b/..")), PathBuf::from("/a"));
    }
}
