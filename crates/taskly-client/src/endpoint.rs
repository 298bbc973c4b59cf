//! Endpoint resolution.

/// Join `base` and `path` with exactly one `/` between them.
///
/// A missing leading slash on `path` is added; a trailing slash on `base`
/// is dropped, so `("http://h/", "api")` and `("http://h", "/api")` both
/// resolve to `http://h/api`.
#[must_use]
pub fn resolve_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BASE: &str = "https://example.com";

    #[test]
    fn prepends_missing_slash() {
        assert_eq!(resolve_endpoint(BASE, "api/test"), "https://example.com/api/test");
    }

    #[test]
    fn keeps_existing_slash() {
        assert_eq!(resolve_endpoint(BASE, "/api/test"), "https://example.com/api/test");
    }

    #[test]
    fn drops_trailing_base_slash() {
        assert_eq!(
            resolve_endpoint("https://example.com/", "/api/tasks/"),
            "https://example.com/api/tasks/"
        );
    }

    #[test]
    fn empty_path_resolves_to_root() {
        assert_eq!(resolve_endpoint(BASE, ""), "https://example.com/");
    }

    proptest! {
        #[test]
        fn relative_paths_get_one_slash(path in "[a-z0-9_-][a-z0-9/_.-]{0,30}") {
            prop_assert_eq!(resolve_endpoint(BASE, &path), format!("{BASE}/{path}"));
        }

        #[test]
        fn absolute_paths_are_appended(path in "/[a-z0-9_.-][a-z0-9/_.-]{0,30}") {
            prop_assert_eq!(resolve_endpoint(BASE, &path), format!("{BASE}{path}"));
        }
    }
}
