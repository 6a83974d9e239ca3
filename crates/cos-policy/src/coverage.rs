// coverage.rs — Heuristic "did tests change too?" rule.
//
// This is not a coverage measurement. It only checks that a change touching
// code-bearing paths also touches at least one test path.

use std::path::Path;

use crate::pattern;

/// True when `path` follows one of the test layout conventions:
/// `tests/...`, `.../tests/...`, `*_test.<ext>` or `test_*`.
pub fn is_test_path(path: &str) -> bool {
    if path.starts_with("tests/") || path.contains("/tests/") {
        return true;
    }
    let file = Path::new(path);
    let stem_is_test = file
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.ends_with("_test"));
    let name_is_test = file
        .file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.starts_with("test_"));
    stem_is_test || name_is_test
}

/// True iff some path matches `code_patterns` and no path is a test path.
pub fn requires_tests(changed: &[String], code_patterns: &[String]) -> bool {
    let touches_code = changed.iter().any(|f| pattern::matches_any(code_patterns, f));
    let has_tests = changed.iter().any(|f| is_test_path(f));
    touches_code && !has_tests
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code() -> Vec<String> {
        vec!["app/**".to_string(), "ring1/tools/**".to_string()]
    }

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_path_conventions() {
        assert!(is_test_path("tests/test_foo"));
        assert!(is_test_path("tests/unit/helpers.py"));
        assert!(is_test_path("app/api/tests/fixtures.json"));
        assert!(is_test_path("app/api/users_test.py"));
        assert!(is_test_path("pkg/handler_test"));
        assert!(is_test_path("app/test_users.py"));
        assert!(!is_test_path("app/api/users.py"));
        assert!(!is_test_path("app/contest/latest.py"));
        assert!(!is_test_path("mytests/foo.py"));
    }

    #[test]
    fn code_without_tests_requires_tests() {
        assert!(requires_tests(&paths(&["app/main.py"]), &code()));
    }

    #[test]
    fn code_with_tests_is_fine() {
        assert!(!requires_tests(
            &paths(&["app/main.py", "tests/test_foo"]),
            &code()
        ));
    }

    #[test]
    fn non_code_change_never_requires_tests() {
        assert!(!requires_tests(&paths(&["docs/readme.md"]), &code()));
        assert!(!requires_tests(&[], &code()));
    }
}
