//! Trailing-slash helpers for URL paths.

/// Add or remove a trailing `/` so the result matches `needs_slash`.
///
/// Strings that already match are returned unchanged.
#[must_use]
pub fn ensure_slash(input: &str, needs_slash: bool) -> String {
    let has_slash = input.ends_with('/');
    if has_slash && !needs_slash {
        input[..input.len() - 1].to_string()
    } else if !has_slash && needs_slash {
        format!("{input}/")
    } else {
        input.to_string()
    }
}
