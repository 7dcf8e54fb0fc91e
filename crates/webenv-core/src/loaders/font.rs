//! Font loading rule.
//!
//! Fonts under the project and the vector icon packages are inlined as data
//! URLs up to [`INLINE_LIMIT`] bytes and emitted to `fonts/` otherwise.

use crate::error::{Error, Result};
use regex_lite::Regex;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

/// File names handled by the rule.
pub const FONT_PATTERN: &str = r"\.(woff2?|eot|ttf|otf)$";

/// Largest font, in bytes, inlined as a data URL.
pub const INLINE_LIMIT: u64 = 50_000;

/// Packages shipping icon fonts that must go through the rule.
pub const ICON_FONT_PACKAGES: &[&str] = &["react-native-vector-icons", "@expo/vector-icons"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlLoaderOptions {
    /// Emit CommonJS so assets interop the way native bundlers expect.
    pub es_module: bool,
    pub limit: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoaderSpec {
    pub loader: String,
    pub options: UrlLoaderOptions,
}

/// Asset rule for font files.
#[derive(Debug, Clone, Serialize)]
pub struct FontLoaderRule {
    #[serde(serialize_with = "serialize_regex")]
    pub test: Regex,
    #[serde(rename = "use")]
    pub loaders: Vec<LoaderSpec>,
    pub include: Vec<PathBuf>,
}

impl FontLoaderRule {
    /// Whether `path` is a font file this rule handles.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.test.is_match(path)
    }
}

fn serialize_regex<S: Serializer>(regex: &Regex, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(regex.as_str())
}

/// Create the font rule for `project_root`.
///
/// `resolve_module` maps a package name to its directory; its errors are
/// returned as-is.
pub fn create_font_loader_rule<F>(project_root: &Path, resolve_module: F) -> Result<FontLoaderRule>
where
    F: Fn(&str) -> Result<PathBuf>,
{
    let mut include = vec![project_root.to_path_buf()];
    for package in ICON_FONT_PACKAGES {
        include.push(resolve_module(package)?);
    }

    let test = Regex::new(FONT_PATTERN)
        .map_err(|e| Error::other(format!("invalid font pattern: {e}")))?;

    Ok(FontLoaderRule {
        test,
        loaders: vec![LoaderSpec {
            loader: "url-loader".to_string(),
            options: UrlLoaderOptions {
                es_module: false,
                limit: INLINE_LIMIT,
                name: "./fonts/[name].[ext]".to_string(),
            },
        }],
        include,
    })
}

/// Resolver looking packages up directly under `modules`.
///
/// Fails with [`Error::ModuleNotFound`] when the package directory is absent.
pub fn node_modules_resolver(modules: &Path) -> impl Fn(&str) -> Result<PathBuf> + '_ {
    move |name| {
        let dir = modules.join(name);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(Error::ModuleNotFound {
                name: name.to_string(),
                dir: modules.to_path_buf(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> FontLoaderRule {
        create_font_loader_rule(Path::new("/srv/app"), |name| {
            Ok(Path::new("/srv/app/node_modules").join(name))
        })
        .unwrap()
    }

    #[test]
    fn test_matches_font_extensions() {
        let rule = rule();
        for file in ["foo.woff", "foo.woff2", "foo.eot", "foo.ttf", "foo.otf"] {
            assert!(rule.matches(file), "{file} should match");
        }
    }

    #[test]
    fn test_rejects_other_files() {
        let rule = rule();
        for file in ["foo.png", "foo.woff3", "foo.ttf.map", "woff"] {
            assert!(!rule.matches(file), "{file} should not match");
        }
    }

    #[test]
    fn test_loader_options() {
        let rule = rule();
        assert_eq!(rule.loaders.len(), 1);
        let loader = &rule.loaders[0];
        assert_eq!(loader.loader, "url-loader");
        assert!(!loader.options.es_module);
        assert_eq!(loader.options.limit, 50_000);
        assert_eq!(loader.options.name, "./fonts/[name].[ext]");
    }

    #[test]
    fn test_include_scope() {
        let rule = rule();
        assert_eq!(
            rule.include,
            vec![
                PathBuf::from("/srv/app"),
                PathBuf::from("/srv/app/node_modules/react-native-vector-icons"),
                PathBuf::from("/srv/app/node_modules/@expo/vector-icons"),
            ]
        );
    }

    #[test]
    fn test_resolver_errors_propagate() {
        let result = create_font_loader_rule(Path::new("/srv/app"), |name| {
            Err(Error::other(format!("cannot resolve {name}")))
        });
        let err = result.unwrap_err();
        assert!(err.to_string().contains("react-native-vector-icons"));
    }

    #[test]
    fn test_node_modules_resolver() {
        let dir = tempfile::tempdir().unwrap();
        let modules = dir.path().join("node_modules");
        std::fs::create_dir_all(modules.join("react-native-vector-icons")).unwrap();

        let resolve = node_modules_resolver(&modules);
        assert_eq!(
            resolve("react-native-vector-icons").unwrap(),
            modules.join("react-native-vector-icons")
        );

        let err = create_font_loader_rule(dir.path(), node_modules_resolver(&modules)).unwrap_err();
        assert!(matches!(err, Error::ModuleNotFound { ref name, .. } if name == "@expo/vector-icons"));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(rule()).unwrap();
        assert_eq!(json["test"], FONT_PATTERN);
        assert_eq!(json["use"][0]["options"]["esModule"], false);
        assert_eq!(json["use"][0]["options"]["limit"], 50_000);
        assert_eq!(json["include"].as_array().unwrap().len(), 3);
    }
}
