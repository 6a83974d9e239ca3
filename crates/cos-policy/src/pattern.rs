// pattern.rs — Glob matching of changed paths.
//
// Policy patterns use fnmatch rules: `*` matches any run of characters
// including `/`, `**` is the same as `*`, `?` is one character, `[...]` and
// `[!...]` are sets, and a `[` with no closing `]` is a literal bracket.
// Paths are matched as literal strings: no normalization, case-sensitive.
//
// Patterns are rewritten into the `glob` crate's dialect before compiling.
// Every fnmatch pattern has a rewrite, so no policy pattern is rejected.

use glob::{MatchOptions, Pattern};

const OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Rewrite an fnmatch pattern into `glob` syntax.
///
/// Runs of `*` collapse to a single `*` (which already crosses `/` under
/// [`OPTIONS`]); an unclosed `[` becomes the literal set `[[]`.
fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 2);
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                out.push('*');
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
            }
            '[' => {
                // A set is `[`, optional `!`, optional leading `]`, then up to the next `]`.
                let mut j = i + 1;
                if chars.get(j) == Some(&'!') {
                    j += 1;
                }
                if chars.get(j) == Some(&']') {
                    j += 1;
                }
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }
                if j >= chars.len() {
                    out.push_str("[[]");
                } else {
                    out.extend(&chars[i..=j]);
                    i = j;
                }
            }
            c => out.push(c),
        }
        i += 1;
    }
    out
}

/// Glob-match a pattern against a path. Fail-closed if the rewrite does not compile.
pub fn matches(pattern: &str, path: &str) -> bool {
    match Pattern::new(&translate(pattern)) {
        Ok(p) => p.matches_with(path, OPTIONS),
        Err(e) => {
            tracing::warn!(pattern, error = %e.msg, "pattern did not compile, treating as no match");
            false
        }
    }
}

/// First pattern in `patterns` that matches `path`.
pub fn first_match<'a>(patterns: &'a [String], path: &str) -> Option<&'a str> {
    patterns
        .iter()
        .find(|pat| matches(pat, path))
        .map(String::as_str)
}

pub fn matches_any(patterns: &[String], path: &str) -> bool {
    first_match(patterns, path).is_some()
}
