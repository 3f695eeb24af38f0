//! Path template compiler.
//!
//! Turns a template like `/users/:id/files/*` into an anchored,
//! case-insensitive matcher plus the ordered list of parameter names
//! it captures.

use regex_lite::Regex;

/// Reserved parameter name for `*` wildcard segments.
pub const WILDCARD_PARAM: &str = "wild";

/// The compiled, read-only artifact of a path template.
///
/// Holds the capture parameter names in template order and a matcher
/// equivalent to an anchored, case-insensitive match of the template's
/// literal/capture structure, tolerant of one optional trailing `/`.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    keys: Vec<String>,
    regex: Regex,
}

impl CompiledPattern {
    /// Capture parameter names, in template left-to-right order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Whether the pattern matches the given request path.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match the path and return the captured values in template order.
    ///
    /// Returns `None` when the path does not match. A capture that did
    /// not participate in the match yields an empty string.
    pub fn captures(&self, path: &str) -> Option<Vec<String>> {
        self.regex.captures(path).map(|caps| {
            (1..caps.len())
                .map(|i| caps.get(i).map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect()
        })
    }
}

/// Compile a path template.
///
/// Segment rules, applied in order after splitting on `/` (one leading
/// empty segment from a leading `/` is discarded):
///
/// - `*…` captures the remainder of the path, including `/`, under the
///   reserved name [`WILDCARD_PARAM`].
/// - `:name` captures one or more non-`/` characters under `name`.
/// - Anything else matches itself literally (case-insensitively).
///
/// Templates are never rejected: an empty segment becomes an empty
/// literal component, and `:` with nothing after it captures under an
/// empty parameter name.
pub fn compile(template: &str) -> CompiledPattern {
    let mut segments: Vec<&str> = template.split('/').collect();
    if segments.first() == Some(&"") {
        segments.remove(0);
    }

    let mut keys = Vec::new();
    let mut body = String::new();
    for segment in segments {
        if segment.starts_with('*') {
            keys.push(WILDCARD_PARAM.to_string());
            body.push_str("/(.*)");
        } else if let Some(name) = segment.strip_prefix(':') {
            keys.push(name.to_string());
            body.push_str("/([^/]+?)");
        } else {
            body.push('/');
            body.push_str(&regex_lite::escape(segment));
        }
    }

    let regex = Regex::new(&format!("(?i)^{body}/?$")).expect("escaped template always compiles");

    CompiledPattern { keys, regex }
}
